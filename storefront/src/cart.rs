//! The shopping cart.
//!
//! Entries are unique by product id, kept in insertion order, and never hold a
//! quantity below one.

use crate::types::{CartItem, Money, Product, ProductId};

/// Ordered collection of cart entries
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add `quantity` of `product`, merging into an existing entry
    ///
    /// A quantity of zero is treated as one. Returns the quantity actually
    /// added.
    pub fn add(&mut self, product: &Product, quantity: u32) -> u32 {
        let quantity = quantity.max(1);
        match self.items.iter_mut().find(|item| item.product.id == product.id) {
            Some(item) => item.quantity = item.quantity.saturating_add(quantity),
            None => self.items.push(CartItem {
                product: product.clone(),
                quantity,
            }),
        }
        quantity
    }

    /// Adjust an entry's quantity by `delta`, never going below one
    ///
    /// Returns `false` (and does nothing) when the product is not in the cart.
    pub fn update_quantity(&mut self, product_id: &ProductId, delta: i64) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| &item.product.id == product_id) else {
            return false;
        };
        let next = i64::from(item.quantity).saturating_add(delta).max(1);
        item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        true
    }

    /// Remove an entry, returning it if it was present
    pub fn remove(&mut self, product_id: &ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| &item.product.id == product_id)?;
        Some(self.items.remove(index))
    }

    /// Σ price × quantity
    #[must_use]
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Σ quantity (the header badge)
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().fold(0, |n, item| n.saturating_add(item.quantity))
    }

    /// Entries in insertion order
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns `true` when the cart has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Empty the cart, handing back its entries
    pub fn take(&mut self) -> Vec<CartItem> {
        std::mem::take(&mut self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use proptest::prelude::*;

    fn product(id: &str) -> Product {
        Catalog::shield_point()
            .get(&ProductId::from(id))
            .cloned()
            .unwrap_or_else(|| unreachable!("catalog has product {id}"))
    }

    #[test]
    fn add_merges_existing_entries() {
        let mut cart = Cart::new();
        cart.add(&product("1"), 2);
        cart.add(&product("5"), 1);
        cart.add(&product("1"), 3);

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.item_count(), 6);
        assert_eq!(cart.total(), Money::new(5 * 155_000 + 45_000));
    }

    #[test]
    fn add_zero_counts_as_one() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(&product("2"), 0), 1);
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn update_quantity_clamps_at_one() {
        let mut cart = Cart::new();
        cart.add(&product("3"), 2);

        assert!(cart.update_quantity(&ProductId::from("3"), -10));
        assert_eq!(cart.items()[0].quantity, 1);
        assert!(cart.update_quantity(&ProductId::from("3"), 4));
        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn missing_ids_are_noops() {
        let mut cart = Cart::new();
        cart.add(&product("4"), 1);
        let before = cart.clone();

        assert!(!cart.update_quantity(&ProductId::from("99"), 1));
        assert!(cart.remove(&ProductId::from("99")).is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn take_empties_the_cart() {
        let mut cart = Cart::new();
        cart.add(&product("6"), 2);

        let items = cart.take();
        assert_eq!(items.len(), 1);
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::ZERO);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Add(u8, u32),
        Update(u8, i64),
        Remove(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1u8..=8, 0u32..5).prop_map(|(id, qty)| Op::Add(id, qty)),
            (1u8..=8, -5i64..5).prop_map(|(id, delta)| Op::Update(id, delta)),
            (1u8..=8).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn entries_stay_unique_and_positive(ops in prop::collection::vec(op(), 0..64)) {
            let catalog = Catalog::shield_point();
            let mut cart = Cart::new();

            for op in ops {
                match op {
                    Op::Add(id, qty) => {
                        if let Some(p) = catalog.get(&ProductId::new(id.to_string())) {
                            cart.add(p, qty);
                        }
                    },
                    Op::Update(id, delta) => {
                        cart.update_quantity(&ProductId::new(id.to_string()), delta);
                    },
                    Op::Remove(id) => {
                        cart.remove(&ProductId::new(id.to_string()));
                    },
                }

                let mut ids: Vec<_> = cart.items().iter().map(|i| i.product.id.clone()).collect();
                let len = ids.len();
                ids.sort();
                ids.dedup();
                prop_assert_eq!(ids.len(), len);
                prop_assert!(cart.items().iter().all(|i| i.quantity >= 1));
            }

            let expected: u64 = cart
                .items()
                .iter()
                .map(|i| i.product.price.amount() * u64::from(i.quantity))
                .sum();
            prop_assert_eq!(cart.total(), Money::new(expected));
        }
    }
}
