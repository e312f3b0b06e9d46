//! Bill item types for the UPI session engine
//!
//! An item is one line of the merchant's bill. Items carry no derived state;
//! the session total is always recomputed from the live collection by the
//! ledger store.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bill item identifier
///
/// Assigned by the ledger store on insert, monotonically increasing.
pub type ItemId = u64;

/// One line of the itemized bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Identifier assigned by the ledger store
    pub id: ItemId,

    /// Item name, non-empty
    pub name: String,

    /// Price per unit, strictly positive
    pub unit_price: Decimal,

    /// Number of units, at least 1
    pub quantity: u32,
}

impl Item {
    /// The line total for this item: `unit_price * quantity`
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Partial update for an item
///
/// Each field is optional; present fields are merged onto the stored item
/// one by one, after the merged result passes validation. Absent fields
/// leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUpdate {
    /// New item name
    pub name: Option<String>,

    /// New unit price
    pub unit_price: Option<Decimal>,

    /// New quantity
    pub quantity: Option<u32>,
}

impl ItemUpdate {
    /// Apply this update to an item, producing the merged result
    ///
    /// The caller validates the result before committing it; merging
    /// itself never fails.
    pub fn merged_into(&self, item: &Item) -> Item {
        Item {
            id: item.id,
            name: self.name.clone().unwrap_or_else(|| item.name.clone()),
            unit_price: self.unit_price.unwrap_or(item.unit_price),
            quantity: self.quantity.unwrap_or(item.quantity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn chai() -> Item {
        Item {
            id: 7,
            name: "Chai".to_string(),
            unit_price: Decimal::new(1050, 2), // 10.50
            quantity: 2,
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(chai().line_total(), Decimal::new(2100, 2)); // 21.00
    }

    #[test]
    fn test_empty_update_is_identity() {
        let item = chai();
        assert_eq!(ItemUpdate::default().merged_into(&item), item);
    }

    #[test]
    fn test_update_merges_present_fields_only() {
        let item = chai();
        let update = ItemUpdate {
            name: None,
            unit_price: Some(Decimal::new(1200, 2)),
            quantity: Some(3),
        };

        let merged = update.merged_into(&item);
        assert_eq!(merged.id, item.id);
        assert_eq!(merged.name, "Chai");
        assert_eq!(merged.unit_price, Decimal::new(1200, 2));
        assert_eq!(merged.quantity, 3);
    }
}
