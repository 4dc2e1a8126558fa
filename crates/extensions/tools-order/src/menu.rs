//! Static site map: URLs, selectors, and classification keywords.
//!
//! Selectors here are best-effort against the current site markup and are
//! the expected maintenance point after a redesign.

use crate::types::OrderItem;

pub const BASE_URL: &str = "https://www.starbucks.com";
pub const MENU_URL: &str = "https://www.starbucks.com/menu";
pub const SIGNIN_URL: &str = "https://www.starbucks.com/account/signin";
pub const STORE_LOCATOR_URL: &str = "https://www.starbucks.com/store-locator";
pub const CART_URL: &str = "https://www.starbucks.com/menu/cart";

pub const HOT_DRINKS_URL: &str = "https://www.starbucks.com/menu/drinks/hot-coffee";
pub const COLD_DRINKS_URL: &str = "https://www.starbucks.com/menu/drinks/cold-coffee";
pub const BAKERY_URL: &str = "https://www.starbucks.com/menu/food/bakery";

/// Product tiles on a menu category page.
pub const PRODUCT_LINK_SELECTOR: &str = r#"a[href*="/menu/product/"]"#;

/// Sign-in affordance; its presence on the menu page means the session is
/// not (or no longer) authenticated.
pub const SIGNIN_LINK_SELECTOR: &str = r#"a[href*="/account/signin"]"#;

/// Credential fields and submit control on the sign-in page.
pub const USERNAME_SELECTOR: &str = "input#username, input[name='username'], input[type='email']";
pub const PASSWORD_SELECTOR: &str = "input#password, input[name='password'], input[type='password']";
pub const SIGNIN_SUBMIT_SELECTOR: &str = "button[type='submit']";

/// Address search field on the store locator.
pub const STORE_SEARCH_SELECTOR: &str = r#"input#place, input[placeholder*="city" i]"#;

/// Remove controls on the cart page.
pub const REMOVE_BUTTON_SELECTOR: &str = r#"button[aria-label*="Remove" i]"#;

/// Visible-text needles for controls located by label rather than markup.
pub const ORDER_HERE_TEXT: &str = "order here";
pub const ADD_TO_ORDER_TEXT: &str = "add to order";
pub const CHECKOUT_TEXT: &str = "checkout";
pub const PLACE_ORDER_TEXT: &str = "place order";

/// Drink names containing any of these route to the cold-drinks category.
/// A heuristic, not a catalog lookup.
pub const COLD_DRINK_KEYWORDS: &[&str] = &["iced", "cold brew", "frappuccino"];

/// Listings containing any of these are never a match: they are multipack
/// or at-home variants that shadow the single-serving product.
pub const DISALLOWED_MATCH_KEYWORDS: &[&str] = &["pack", "bundle", "case of"];

/// Pick the category page an item is ordered from.
pub fn category_for(item: &OrderItem) -> &'static str {
    match item {
        OrderItem::Food { .. } => BAKERY_URL,
        OrderItem::Drink { name, .. } => {
            let lowered = name.to_lowercase();
            if COLD_DRINK_KEYWORDS.iter().any(|k| lowered.contains(k)) {
                COLD_DRINKS_URL
            } else {
                HOT_DRINKS_URL
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DrinkSize;

    fn drink(name: &str) -> OrderItem {
        OrderItem::Drink {
            name: name.to_string(),
            size: DrinkSize::Grande,
        }
    }

    #[test]
    fn test_cold_keywords_route_to_cold_menu() {
        assert_eq!(category_for(&drink("Iced Caramel Macchiato")), COLD_DRINKS_URL);
        assert_eq!(category_for(&drink("Vanilla Sweet Cream Cold Brew")), COLD_DRINKS_URL);
        assert_eq!(category_for(&drink("Mocha Frappuccino")), COLD_DRINKS_URL);
    }

    #[test]
    fn test_hot_is_the_default_drink_category() {
        assert_eq!(category_for(&drink("Caffè Latte")), HOT_DRINKS_URL);
        assert_eq!(category_for(&drink("Flat White")), HOT_DRINKS_URL);
    }

    #[test]
    fn test_food_always_uses_bakery() {
        let food = OrderItem::Food {
            name: "Iced Lemon Loaf".to_string(),
        };
        // "Iced" in a food name must not reroute it to a drinks category.
        assert_eq!(category_for(&food), BAKERY_URL);
    }
}
