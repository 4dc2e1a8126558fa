//! Cart population.
//!
//! One strict pass per item: category page, fuzzy product match, size
//! variant for drinks, add to order. Each step gets a single bounded wait;
//! a deterministic page load does not benefit from retry-with-backoff.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::cdp::PageTab;
use crate::error::OrderError;
use crate::matcher;
use crate::menu;
use crate::types::{DrinkSize, OrderItem};

const LISTING_WAIT: Duration = Duration::from_secs(12);
const SIZE_WAIT: Duration = Duration::from_secs(8);
const ADD_WAIT: Duration = Duration::from_secs(8);
const CONTROL_POLL: Duration = Duration::from_millis(400);

/// Time for the cart badge to pick up an added item before the next
/// navigation tears the page down.
const SETTLE: Duration = Duration::from_millis(750);

/// Add one item to the cart, strictly: any failed step aborts the order.
pub async fn add_item(page: &PageTab, item: &OrderItem) -> Result<(), OrderError> {
    let category = menu::category_for(item);
    debug!("Adding \"{}\" from {}", item.display_line(), category);

    page.navigate(category).await?;
    page.wait_for_selector(menu::PRODUCT_LINK_SELECTOR, LISTING_WAIT)
        .await
        .map_err(|_| OrderError::ItemNotFound(item.name().to_string()))?;

    let listings = page.element_texts(menu::PRODUCT_LINK_SELECTOR).await?;
    let index = matcher::find_match(item.name(), &listings, menu::DISALLOWED_MATCH_KEYWORDS)
        .ok_or_else(|| OrderError::ItemNotFound(item.name().to_string()))?;
    debug!("Matched \"{}\" -> \"{}\"", item.name(), listings[index]);

    if !page.click_nth(menu::PRODUCT_LINK_SELECTOR, index).await? {
        return Err(OrderError::ItemNotFound(item.name().to_string()));
    }
    page.wait_for_load().await?;

    if let OrderItem::Drink { size, .. } = item {
        select_size(page, item.name(), *size).await?;
    }

    click_within(page, "button", menu::ADD_TO_ORDER_TEXT, ADD_WAIT)
        .await?
        .then_some(())
        .ok_or_else(|| OrderError::AddToCartFailed(item.display_line()))?;

    tokio::time::sleep(SETTLE).await;
    debug!("Added \"{}\"", item.display_line());
    Ok(())
}

/// Activate the size control whose visible label matches the size name.
async fn select_size(page: &PageTab, name: &str, size: DrinkSize) -> Result<(), OrderError> {
    let clicked = click_within(page, "button, label", size.label(), SIZE_WAIT).await?;
    if !clicked {
        return Err(OrderError::SizeUnavailable(format!("{} {}", size.label(), name)));
    }
    Ok(())
}

/// Best-effort cart clear: click every visible remove control, swallowing
/// each sub-step's failure. The strict add pass that follows detects any
/// residue via the scraped summary, not here.
pub async fn clear_cart(page: &PageTab) {
    if let Err(e) = page.navigate(menu::CART_URL).await {
        warn!("Cart clear skipped, cart page did not load: {}", e);
        return;
    }
    match page.click_all(menu::REMOVE_BUTTON_SELECTOR).await {
        Ok(0) => debug!("Cart already empty"),
        Ok(n) => {
            debug!("Removed {} cart entries", n);
            tokio::time::sleep(SETTLE).await;
        }
        Err(e) => warn!("Cart clear failed: {}", e),
    }
}

/// Poll a text-located control until it is clicked or the wait elapses.
async fn click_within(
    page: &PageTab,
    selector: &str,
    needle: &str,
    wait: Duration,
) -> Result<bool, OrderError> {
    let deadline = Instant::now() + wait;
    loop {
        if page.click_by_text(selector, needle).await? {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        tokio::time::sleep(CONTROL_POLL).await;
    }
}
