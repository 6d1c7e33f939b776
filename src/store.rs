//! Shared store snapshot
//!
//! A read-only snapshot of the surrounding cart-and-user state, injected
//! into the view layer. The controller and view never mutate it;
//! mutation happens through the external store, out of scope here.

use serde::{Deserialize, Serialize};

/// One cart line item. Only the quantity matters for the badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Number of units of this product in the cart.
    pub quantity: u32,
}

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A shopping customer; sees the cart and account menu.
    Customer,
    /// A seller account.
    Seller,
    /// An administrator account.
    Admin,
}

/// Read-only snapshot of cart and user state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StoreSnapshot {
    /// Current cart contents.
    #[serde(default)]
    pub cart_items: Vec<CartItem>,

    /// Display name of the signed-in user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user: Option<String>,

    /// Role of the signed-in user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_role: Option<Role>,
}

impl StoreSnapshot {
    /// Total quantity across all cart items — the cart badge number.
    #[must_use]
    pub fn badge_count(&self) -> u32 {
        self.cart_items.iter().map(|item| item.quantity).sum()
    }

    /// Whether the customer menu (cart, account) is shown.
    #[must_use]
    pub fn shows_customer_menu(&self) -> bool {
        self.current_role == Some(Role::Customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_count_sums_quantities() {
        let snapshot = StoreSnapshot {
            cart_items: vec![
                CartItem { quantity: 2 },
                CartItem { quantity: 1 },
                CartItem { quantity: 4 },
            ],
            ..StoreSnapshot::default()
        };
        assert_eq!(snapshot.badge_count(), 7);
    }

    #[test]
    fn test_badge_count_empty_cart() {
        assert_eq!(StoreSnapshot::default().badge_count(), 0);
    }

    #[test]
    fn test_customer_menu_gate() {
        let mut snapshot = StoreSnapshot {
            current_user: Some("Asha".to_string()),
            current_role: Some(Role::Customer),
            ..StoreSnapshot::default()
        };
        assert!(snapshot.shows_customer_menu());

        snapshot.current_role = Some(Role::Seller);
        assert!(!snapshot.shows_customer_menu());

        snapshot.current_role = None;
        assert!(!snapshot.shows_customer_menu());
    }

    #[test]
    fn test_snapshot_deserializes() {
        let yaml = r#"
cart_items:
  - quantity: 3
  - quantity: 1
current_user: "Asha"
current_role: customer
"#;
        let snapshot: StoreSnapshot = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(snapshot.badge_count(), 4);
        assert!(snapshot.shows_customer_menu());
    }
}
