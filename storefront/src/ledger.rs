//! The order ledger.
//!
//! Orders are created by checking out a cart, listed most-recent-first, and
//! never deleted. Identifiers and redemption codes are random and regenerated
//! on collision.

use crate::cart::Cart;
use crate::environment::TokenSource;
use crate::types::{Order, OrderId, OrderStatus, RedemptionCode};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Length of an order id
pub const ORDER_ID_LEN: usize = 8;

/// Length of the random part of a redemption code
pub const CODE_TOKEN_LEN: usize = 6;

const MAX_RANDOM_ATTEMPTS: usize = 64;

/// Result of [`OrderLedger::mark_collected`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    /// The order went from pending to collected
    Collected,
    /// No order has that id
    NotFound,
    /// The order had already been collected
    AlreadyCollected,
}

/// Append-only collection of orders, newest first
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderLedger {
    orders: VecDeque<Order>,
}

impl OrderLedger {
    /// Create an empty ledger
    #[must_use]
    pub const fn new() -> Self {
        Self {
            orders: VecDeque::new(),
        }
    }

    /// Turn the cart into a pending order and clear it
    ///
    /// Returns `None` (and changes nothing) for an empty cart.
    pub fn checkout(
        &mut self,
        cart: &mut Cart,
        tokens: &dyn TokenSource,
        now: DateTime<Utc>,
    ) -> Option<&Order> {
        if cart.is_empty() {
            return None;
        }

        let id = self.fresh_id(tokens);
        let code = self.fresh_code(tokens, &id, now);
        let total = cart.total();
        let items = cart.take();

        self.orders.push_front(Order {
            id,
            items,
            total,
            created_at: now,
            code,
            status: OrderStatus::Pending,
        });
        self.orders.front()
    }

    /// Move a pending order to collected
    pub fn mark_collected(&mut self, id: &OrderId) -> MarkOutcome {
        match self.orders.iter_mut().find(|order| &order.id == id) {
            None => MarkOutcome::NotFound,
            Some(order) if order.status == OrderStatus::Collected => MarkOutcome::AlreadyCollected,
            Some(order) => {
                order.status = OrderStatus::Collected;
                MarkOutcome::Collected
            },
        }
    }

    /// Look up an order by id
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.id.as_str() == id)
    }

    /// Look up an order by redemption code
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.code.as_str() == code)
    }

    /// The pending order a kiosk would dispense for `presented`
    ///
    /// Matches either the order id or its redemption code.
    #[must_use]
    pub fn redeemable(&self, presented: &str) -> Option<&Order> {
        self.find(presented)
            .or_else(|| self.find_by_code(presented))
            .filter(|order| order.is_pending())
    }

    /// Pending orders, newest first
    pub fn pending(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|order| order.is_pending())
    }

    /// All orders, newest first
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Number of orders
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Returns `true` before the first checkout
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn is_taken(&self, candidate: &str) -> bool {
        self.orders
            .iter()
            .any(|order| order.id.as_str() == candidate || order.code.as_str() == candidate)
    }

    fn fresh_id(&self, tokens: &dyn TokenSource) -> OrderId {
        for _ in 0..MAX_RANDOM_ATTEMPTS {
            let candidate = tokens.token(ORDER_ID_LEN);
            if !self.is_taken(&candidate) {
                return OrderId::new(candidate);
            }
        }

        tracing::warn!("Random order ids kept colliding, falling back to a sequence");
        let mut n = self.orders.len();
        loop {
            let candidate = format!("{n:0>width$}", width = ORDER_ID_LEN);
            if !self.is_taken(&candidate) {
                return OrderId::new(candidate);
            }
            n += 1;
        }
    }

    fn fresh_code(&self, tokens: &dyn TokenSource, id: &OrderId, now: DateTime<Utc>) -> RedemptionCode {
        let millis = now.timestamp_millis();
        let usable = |candidate: &str| candidate != id.as_str() && !self.is_taken(candidate);

        for _ in 0..MAX_RANDOM_ATTEMPTS {
            let candidate = format!("TSC-{}-{millis}", tokens.token(CODE_TOKEN_LEN));
            if usable(&candidate) {
                return RedemptionCode::new(candidate);
            }
        }

        let mut n = self.orders.len();
        loop {
            let candidate = format!("TSC-{n:0>width$}-{millis}", width = CODE_TOKEN_LEN);
            if usable(&candidate) {
                return RedemptionCode::new(candidate);
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::mocks::ScriptedTokens;
    use crate::types::{Money, ProductId};
    use shield_point_core::environment::Clock;
    use shield_point_testing::test_clock;

    fn cart_with(id: &str, qty: u32) -> Cart {
        let catalog = Catalog::shield_point();
        let mut cart = Cart::new();
        if let Some(product) = catalog.get(&ProductId::from(id)) {
            cart.add(product, qty);
        }
        cart
    }

    #[test]
    fn empty_cart_checkout_is_a_noop() {
        let mut ledger = OrderLedger::new();
        let mut cart = Cart::new();

        assert!(ledger.checkout(&mut cart, &ScriptedTokens::default(), test_clock().now()).is_none());
        assert!(ledger.is_empty());
    }

    #[test]
    fn checkout_freezes_total_and_clears_cart() {
        let mut ledger = OrderLedger::new();
        let mut cart = cart_with("1", 2);
        let tokens = ScriptedTokens::new(["ABCD1234", "QR0001"]);

        let order = ledger.checkout(&mut cart, &tokens, test_clock().now()).cloned();

        let order = order.unwrap_or_else(|| unreachable!("cart was not empty"));
        assert_eq!(order.id.as_str(), "ABCD1234");
        assert_eq!(order.code.as_str(), "TSC-QR0001-1735689600000");
        assert_eq!(order.total, Money::new(310_000));
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(cart.is_empty());
    }

    #[test]
    fn newest_order_comes_first() {
        let mut ledger = OrderLedger::new();
        let tokens = ScriptedTokens::new(["FIRST000", "AAAAAA", "SECOND00", "BBBBBB"]);

        ledger.checkout(&mut cart_with("1", 1), &tokens, test_clock().now());
        ledger.checkout(&mut cart_with("2", 1), &tokens, test_clock().now());

        let ids: Vec<_> = ledger.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["SECOND00", "FIRST000"]);
    }

    #[test]
    fn colliding_ids_are_regenerated() {
        let mut ledger = OrderLedger::new();
        let tokens = ScriptedTokens::new(["SAMEID00", "CODE01", "SAMEID00", "OTHER000", "CODE02"]);

        ledger.checkout(&mut cart_with("1", 1), &tokens, test_clock().now());
        ledger.checkout(&mut cart_with("1", 1), &tokens, test_clock().now());

        assert!(ledger.find("SAMEID00").is_some());
        assert!(ledger.find("OTHER000").is_some());
    }

    #[test]
    fn mark_collected_is_idempotent() {
        let mut ledger = OrderLedger::new();
        let tokens = ScriptedTokens::new(["ORDER001", "CODE01"]);
        ledger.checkout(&mut cart_with("3", 1), &tokens, test_clock().now());
        let id = OrderId::new("ORDER001".to_string());

        assert_eq!(ledger.mark_collected(&id), MarkOutcome::Collected);
        assert_eq!(ledger.mark_collected(&id), MarkOutcome::AlreadyCollected);
        assert_eq!(ledger.pending().count(), 0);
    }

    #[test]
    fn unknown_id_leaves_ledger_unchanged() {
        let mut ledger = OrderLedger::new();
        ledger.checkout(&mut cart_with("3", 1), &ScriptedTokens::default(), test_clock().now());
        let before = ledger.clone();

        assert_eq!(
            ledger.mark_collected(&OrderId::new("NOPE".to_string())),
            MarkOutcome::NotFound
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn redeemable_matches_id_or_code_of_pending_orders() {
        let mut ledger = OrderLedger::new();
        let tokens = ScriptedTokens::new(["ORDER001", "CODE01"]);
        ledger.checkout(&mut cart_with("5", 1), &tokens, test_clock().now());

        assert!(ledger.redeemable("ORDER001").is_some());
        assert!(ledger.redeemable("TSC-CODE01-1735689600000").is_some());
        assert!(ledger.redeemable("ORDER002").is_none());

        ledger.mark_collected(&OrderId::new("ORDER001".to_string()));
        assert!(ledger.redeemable("ORDER001").is_none());
    }

    #[test]
    fn snapshot_is_isolated_from_later_cart_changes() {
        let mut ledger = OrderLedger::new();
        let mut cart = cart_with("1", 2);
        ledger.checkout(&mut cart, &ScriptedTokens::default(), test_clock().now());

        let catalog = Catalog::shield_point();
        if let Some(product) = catalog.get(&ProductId::from("1")) {
            cart.add(product, 7);
        }

        let order = ledger.iter().next().map(|o| (o.items[0].quantity, o.total));
        assert_eq!(order, Some((2, Money::new(310_000))));
    }
}
