//! Order summary scraping.
//!
//! Item descriptions come from the caller's input — the cart UI does not
//! reliably expose per-item names. The total is best-effort text extraction
//! with a fixed pattern priority; a missing total is a summary without one,
//! never an error. An explicit zero cart count is the one hard failure: it
//! means the add-to-cart steps silently did not take effect.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cdp::PageTab;
use crate::error::OrderError;
use crate::types::{OrderItem, OrderSummary};

/// "Total $7.45" — `\b` keeps "Subtotal" from matching here.
static TOTAL_LABELED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\btotal\s*:?\s*\$\s*([0-9]+\.[0-9]{2})").unwrap());

/// "$7.45 total"
static TOTAL_TRAILING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\$\s*([0-9]+\.[0-9]{2})\s*total\b").unwrap());

/// "Subtotal ... $6.95" within a short window.
static SUBTOTAL_WINDOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)subtotal.{0,80}?\$\s*([0-9]+\.[0-9]{2})").unwrap());

/// "Review order (3)"
static REVIEW_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)review\s+order\s*\((\d+)\)").unwrap());

/// Extract a rendered total, by pattern priority. Returns "$X.XX".
pub fn extract_total(text: &str) -> Option<String> {
    for pattern in [&*TOTAL_LABELED, &*TOTAL_TRAILING, &*SUBTOTAL_WINDOWED] {
        if let Some(captures) = pattern.captures(text) {
            return Some(format!("${}", &captures[1]));
        }
    }
    None
}

/// The cart-count indicator, when one rendered.
pub fn cart_count(text: &str) -> Option<u32> {
    REVIEW_COUNT
        .captures(text)
        .and_then(|captures| captures[1].parse().ok())
}

/// Item descriptions derived from the caller's input.
pub fn describe_items(items: &[OrderItem]) -> Vec<String> {
    items.iter().map(OrderItem::display_line).collect()
}

/// Scrape the summary for a populated cart.
pub async fn scrape_summary(
    page: &PageTab,
    items: &[OrderItem],
) -> Result<OrderSummary, OrderError> {
    let text = page.visible_text().await?;

    if cart_count(&text) == Some(0) {
        return Err(OrderError::CartEmpty);
    }

    Ok(OrderSummary {
        items: describe_items(items),
        total: extract_total(&text),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DrinkSize;

    #[test]
    fn test_labeled_total() {
        assert_eq!(extract_total("Pickup in 10 min\nTotal $7.45"), Some("$7.45".to_string()));
    }

    #[test]
    fn test_trailing_total() {
        assert_eq!(extract_total("your order: $12.10 total"), Some("$12.10".to_string()));
    }

    #[test]
    fn test_windowed_subtotal() {
        let text = "Subtotal\n(estimated before tax)\n$6.95";
        assert_eq!(extract_total(text), Some("$6.95".to_string()));
    }

    #[test]
    fn test_pattern_priority_prefers_labeled_total() {
        let text = "Subtotal $6.95\nTax $0.50\nTotal $7.45";
        assert_eq!(extract_total(text), Some("$7.45".to_string()));
    }

    #[test]
    fn test_no_pattern_yields_none() {
        assert_eq!(extract_total("Thanks for your order!"), None);
    }

    #[test]
    fn test_cart_count() {
        assert_eq!(cart_count("Review order (3)"), Some(3));
        assert_eq!(cart_count("Review order (0)"), Some(0));
        assert_eq!(cart_count("no badge here"), None);
    }

    #[test]
    fn test_describe_items() {
        let items = vec![
            OrderItem::Drink {
                name: "Cold Brew".to_string(),
                size: DrinkSize::Venti,
            },
            OrderItem::Food {
                name: "Butter Croissant".to_string(),
            },
        ];
        assert_eq!(
            describe_items(&items),
            vec!["Venti Cold Brew".to_string(), "Butter Croissant".to_string()]
        );
    }
}
