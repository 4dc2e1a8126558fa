//! Store resolution and binding.
//!
//! Location names resolve against a small static table; resolution is total
//! by policy — an unknown name falls back to the default address so an order
//! is always attempted rather than blocked on a location string.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::cdp::PageTab;
use crate::error::OrderError;
use crate::menu;

/// Location name used when the caller does not supply one.
pub const DEFAULT_LOCATION_NAME: &str = "Polk Street";

/// Fallback address for unmapped location names.
const DEFAULT_ADDRESS: &str = "2165 Polk St, San Francisco, CA 94109";

/// Known pickup locations, keyed by lowercase name.
const LOCATIONS: &[(&str, &str)] = &[
    ("polk street", "2165 Polk St, San Francisco, CA 94109"),
    ("castro", "4094 18th St, San Francisco, CA 94114"),
    ("union square", "333 Post St, San Francisco, CA 94108"),
    ("ferry building", "1 Ferry Building, San Francisco, CA 94111"),
];

const SEARCH_WAIT: Duration = Duration::from_secs(10);
const RESULTS_WAIT: Duration = Duration::from_secs(15);
const RESULTS_POLL: Duration = Duration::from_millis(500);

/// Resolve a location name to a street address. Case-insensitive and total:
/// unknown names map to the default address.
pub fn resolve_address(name: &str) -> &'static str {
    let key = name.trim().to_lowercase();
    match LOCATIONS.iter().find(|(known, _)| *known == key) {
        Some((_, address)) => address,
        None => {
            debug!("Unmapped location \"{}\", using default address", name);
            DEFAULT_ADDRESS
        }
    }
}

/// Bind the active session to a pickup store.
///
/// Drives the store locator: search for the resolved address, then activate
/// the first "Order Here" affordance. This binds the session, not the order;
/// cart operations apply to whichever store was bound last.
pub async fn bind_store(page: &PageTab, location_name: &str) -> Result<(), OrderError> {
    let address = resolve_address(location_name);
    debug!("Binding store \"{}\" -> {}", location_name, address);

    page.navigate(menu::STORE_LOCATOR_URL).await?;

    page.wait_for_selector(menu::STORE_SEARCH_SELECTOR, SEARCH_WAIT)
        .await
        .map_err(|_| OrderError::StoreNotFound(location_name.to_string()))?;

    if !page.fill(menu::STORE_SEARCH_SELECTOR, address).await? {
        return Err(OrderError::StoreNotFound(location_name.to_string()));
    }
    page.press_enter(menu::STORE_SEARCH_SELECTOR).await?;

    // Result cards render asynchronously; poll until one is actionable.
    let deadline = Instant::now() + RESULTS_WAIT;
    loop {
        if page
            .click_by_text("button, a", menu::ORDER_HERE_TEXT)
            .await?
        {
            debug!("Store bound for \"{}\"", location_name);
            return Ok(());
        }
        if Instant::now() >= deadline {
            warn!("No orderable store for \"{}\"", location_name);
            return Err(OrderError::StoreUnavailable(location_name.to_string()));
        }
        tokio::time::sleep(RESULTS_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_location_resolves() {
        assert_eq!(
            resolve_address("Polk Street"),
            "2165 Polk St, San Francisco, CA 94109"
        );
        assert_eq!(
            resolve_address("UNION SQUARE"),
            "333 Post St, San Francisco, CA 94108"
        );
    }

    #[test]
    fn test_resolution_is_total() {
        // Partial and unknown names still resolve, to the default address.
        assert_eq!(resolve_address("polk"), DEFAULT_ADDRESS);
        assert_eq!(resolve_address("Unknown District"), DEFAULT_ADDRESS);
        assert_eq!(resolve_address(""), DEFAULT_ADDRESS);
    }

    #[test]
    fn test_resolution_trims_whitespace() {
        assert_eq!(
            resolve_address("  castro  "),
            "4094 18th St, San Francisco, CA 94114"
        );
    }
}
