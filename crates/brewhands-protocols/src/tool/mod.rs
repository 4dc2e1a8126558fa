//! Tool protocol definitions.
//!
//! Tools are the only entry points a caller has into the ordering workflow.

mod context;
mod definition;
mod result;
mod traits;

pub use context::*;
pub use definition::*;
pub use result::*;
pub use traits::*;
