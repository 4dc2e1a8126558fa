//! Browser-driven coffee ordering for brewhands.
//!
//! Places pickup orders on the Starbucks web site by driving a real Chrome
//! instance over the Chrome DevTools Protocol (CDP) — there is no documented
//! ordering API, so the workflow is simulated browser interaction end to end:
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │  order workflow │ ◄──────────────► │   Chrome         │
//! │  (this crate)   │       CDP        │  (headless or    │
//! └─────────────────┘                  │   visible)       │
//!                                      └──────────────────┘
//! ```
//!
//! The workflow is a small state machine: authenticate a session, bind a
//! pickup store, populate the cart from a structured item list, scrape a
//! human-readable summary back out of the rendered pages, and hold the
//! irreversible "place order" click behind an explicit confirm/cancel step.
//!
//! Selectors and URL patterns target the site as it renders today and are
//! best-effort by design; price scraping is advisory and never blocks an
//! order.
//!
//! ## Tools
//!
//! - `order_login` / `order_complete_login` - interactive sign-in
//! - `order_check_auth` - report stored-session state
//! - `order_list_favorites` / `order_add_favorite` - named item bundles
//! - `order_place_favorite` / `order_place_custom` - build a pending order
//! - `order_confirm` / `order_cancel` - finalize or discard the pending order

mod cart;
pub mod cdp;
mod config;
mod error;
mod extension;
mod favorites;
mod matcher;
pub mod menu;
mod order;
mod scrape;
mod session;
mod store;
mod tools;
mod types;

pub use cdp::{CdpClient, CdpError, CookieRecord, PageTab};
pub use config::{Credentials, OrderConfig, EMAIL_ENV, PASSWORD_ENV};
pub use error::OrderError;
pub use extension::OrderToolsExtension;
pub use favorites::FavoriteStore;
pub use order::OrderFlow;
pub use session::SessionManager;
pub use types::{
    DrinkSize, FavoriteOrder, OrderItem, OrderSummary, PendingOrder, PlacedOrder,
};
pub use tools::*;
