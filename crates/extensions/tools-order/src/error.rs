//! Ordering workflow errors.

use thiserror::Error;

use crate::cdp::CdpError;

/// Errors surfaced by the ordering workflow.
///
/// Every variant aborts the current top-level operation; fail-soft sub-steps
/// (cart clearing, post-cancel navigation) log their own failures instead of
/// raising these.
#[derive(Debug, Error)]
pub enum OrderError {
    /// A sign-in control is present and no credentials are configured.
    #[error("Not signed in, and no credentials are configured for automatic sign-in")]
    NotAuthenticated,

    /// Headless credential sign-in did not complete.
    #[error("Automatic sign-in failed: {0}")]
    AutoLoginFailed(String),

    /// Interactive sign-in was not finished before the deadline.
    #[error("Sign-in was not completed within {0} seconds")]
    LoginTimeout(u64),

    /// The store locator search never became usable.
    #[error("Store locator did not load while binding \"{0}\"")]
    StoreNotFound(String),

    /// No actionable "Order Here" control appeared for the searched address.
    #[error("No orderable store appeared for \"{0}\"")]
    StoreUnavailable(String),

    /// No menu listing matched the requested item.
    #[error("Item not found on menu: {0}")]
    ItemNotFound(String),

    /// The size selector never appeared for a sized drink.
    #[error("Size selector did not appear for {0}")]
    SizeUnavailable(String),

    /// The add-to-order control never appeared on the product page.
    #[error("Add-to-order control not found for {0}")]
    AddToCartFailed(String),

    /// The cart indicator reads zero after items were supposedly added.
    #[error("Cart is empty after adding items; the add-to-cart steps did not take effect")]
    CartEmpty,

    /// Confirm or cancel was called with no order pending review.
    #[error("No order is pending review")]
    NoPendingOrder,

    /// An order was requested with no items in it.
    #[error("Order contains no items")]
    EmptyOrder,

    #[error("Browser error: {0}")]
    Cdp(#[from] CdpError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
