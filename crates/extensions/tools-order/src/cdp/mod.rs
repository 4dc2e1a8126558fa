//! Chrome DevTools Protocol plumbing.
//!
//! One WebSocket connection per Chrome instance, one attached page session
//! for the ordering workflow. Waits are bounded polls, never unbounded.

mod client;
mod error;
mod page;
mod protocol;

pub use client::CdpClient;
pub use error::CdpError;
pub use page::PageTab;
pub use protocol::{BrowserVersion, CdpRequest, CdpResponse, CookieRecord};
