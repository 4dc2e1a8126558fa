//! The order state machine.
//!
//! Idle -> Building -> PendingReview -> {Confirmed, Cancelled} -> Idle.
//! The pending slot is the whole observable state: `None` is Idle,
//! `Some` is PendingReview; Building only exists inside `place_order`.
//! Holding the slot's lock across each top-level operation serializes them,
//! so a second `place_order` can never interleave cart mutations with the
//! first and the slot is overwritten deterministically.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cart;
use crate::cdp::PageTab;
use crate::error::OrderError;
use crate::menu;
use crate::scrape;
use crate::session::SessionManager;
use crate::store;
use crate::types::{OrderItem, OrderSummary, PendingOrder, PlacedOrder};

const CHECKOUT_WAIT: Duration = Duration::from_secs(10);
const CHECKOUT_POLL: Duration = Duration::from_millis(400);

/// Top-level controller for the ordering workflow.
pub struct OrderFlow {
    session: Arc<SessionManager>,
    pending: Mutex<Option<PendingOrder>>,
}

impl OrderFlow {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            pending: Mutex::new(None),
        }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Build an order: authenticate, bind the store, populate the cart,
    /// scrape a summary, and hold it for review.
    ///
    /// A previous order still pending review is discarded — the remote cart
    /// is cleared at the start of this pass, but anything it held between
    /// the two calls is not reconciled. The returned order always requires
    /// confirmation.
    pub async fn place_order(
        &self,
        items: Vec<OrderItem>,
        location: String,
    ) -> Result<PlacedOrder, OrderError> {
        if items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }

        let mut pending = self.pending.lock().await;
        if let Some(prior) = pending.take() {
            warn!(
                "Discarding order pending review ({} items for \"{}\"); its cart items are not rolled back",
                prior.items.len(),
                prior.location
            );
        }

        let page = self.session.ensure_page(false).await?;

        self.ensure_authenticated(&page).await?;

        cart::clear_cart(&page).await;

        store::bind_store(&page, &location).await?;

        for item in &items {
            cart::add_item(&page, item).await?;
        }

        self.open_order_preview(&page).await?;

        let summary = scrape::scrape_summary(&page, &items).await?;

        *pending = Some(PendingOrder {
            items,
            location: location.clone(),
            created_at: SystemTime::now(),
        });

        info!(
            "Order pending review: {} items for \"{}\"",
            summary.items.len(),
            location
        );
        Ok(PlacedOrder {
            summary,
            location,
            approval_required: true,
        })
    }

    /// Finalize the pending order: drive checkout and the final place-order
    /// control. The final control being absent is tolerated — some flows
    /// place the order directly from checkout.
    pub async fn confirm_order(&self) -> Result<(OrderSummary, String), OrderError> {
        let mut pending = self.pending.lock().await;
        let order = pending.as_ref().ok_or(OrderError::NoPendingOrder)?.clone();

        let page = self.session.ensure_page(false).await?;

        if !self
            .click_checkout_control(&page, menu::CHECKOUT_TEXT)
            .await?
        {
            debug!("No checkout control; assuming the preview already is the checkout");
        }
        if !self
            .click_checkout_control(&page, menu::PLACE_ORDER_TEXT)
            .await?
        {
            warn!("No place-order control; treating the order as already placed");
        }

        *pending = None;

        // Confirmation reflects the stored snapshot, never a re-scrape.
        let summary = OrderSummary {
            items: scrape::describe_items(&order.items),
            total: None,
        };
        info!("Order confirmed for \"{}\"", order.location);
        Ok((summary, order.location))
    }

    /// Discard the pending order. The remote cart is not guaranteed to be
    /// emptied; the returned text says so.
    pub async fn cancel_order(&self) -> Result<String, OrderError> {
        let mut pending = self.pending.lock().await;
        let order = pending.take().ok_or(OrderError::NoPendingOrder)?;
        info!(
            "Cancelled order of {} items for \"{}\"",
            order.items.len(),
            order.location
        );

        // Fail-soft: move the browser off the checkout page if one is live,
        // but never let that failure outlive the cancel.
        if let Some(page) = self.session.current_page().await {
            if let Err(e) = page.navigate(menu::BASE_URL).await {
                warn!("Post-cancel navigation failed: {}", e);
            }
        }

        Ok(
            "Order cancelled. Items may still be in the site cart; they are cleared at the \
             start of the next order."
                .to_string(),
        )
    }

    /// Whether an order is pending review.
    pub async fn has_pending(&self) -> bool {
        self.pending.lock().await.is_some()
    }

    /// Re-authenticate on demand: the stored-cookie heuristic can be stale,
    /// so the menu page's own sign-in control is the authority.
    async fn ensure_authenticated(&self, page: &PageTab) -> Result<(), OrderError> {
        page.navigate(menu::MENU_URL).await?;
        if !self.signin_control_visible(page).await? {
            return Ok(());
        }

        debug!("Sign-in control on the menu page; session is not authenticated");
        if self.session.credentials_configured() {
            self.session.auto_login().await
        } else {
            Err(OrderError::NotAuthenticated)
        }
    }

    /// Navigate to the order preview, re-authenticating once if the site
    /// redirected to sign-in mid-flow.
    async fn open_order_preview(&self, page: &PageTab) -> Result<(), OrderError> {
        page.navigate(menu::CART_URL).await?;
        if page.current_url().await?.contains("signin") {
            debug!("Redirected to sign-in at checkout; re-authenticating");
            self.session.auto_login().await?;
            page.navigate(menu::CART_URL).await?;
        }
        Ok(())
    }

    async fn signin_control_visible(&self, page: &PageTab) -> Result<bool, OrderError> {
        let expression = format!(
            "document.querySelector({}) !== null",
            serde_json::Value::String(menu::SIGNIN_LINK_SELECTOR.to_string())
        );
        Ok(page.evaluate(&expression).await?.as_bool() == Some(true))
    }

    async fn click_checkout_control(
        &self,
        page: &PageTab,
        needle: &str,
    ) -> Result<bool, OrderError> {
        let deadline = Instant::now() + CHECKOUT_WAIT;
        loop {
            if page.click_by_text("button, a", needle).await? {
                page.wait_for_load().await?;
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(CHECKOUT_POLL).await;
        }
    }
}
