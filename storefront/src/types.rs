//! Core domain types for the Shield Point storefront.
//!
//! Products are immutable catalog entries. A cart holds [`CartItem`]s; checking
//! out freezes them into an [`Order`] that moves `Pending → Collected` exactly
//! once, at the kiosk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

/// Stable product identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a new `ProductId` from a string
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Amount in Vietnamese đồng
///
/// VND has no minor unit, so the value is the whole amount. Arithmetic
/// saturates at `u64::MAX`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero đồng
    pub const ZERO: Self = Self(0);

    /// Creates a money amount
    #[must_use]
    pub const fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Returns the raw amount
    #[must_use]
    pub const fn amount(self) -> u64 {
        self.0
    }

    /// `self × quantity`, saturating
    #[must_use]
    pub const fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }

    /// `self + other`, saturating
    #[must_use]
    pub const fn plus(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::plus)
    }
}

impl fmt::Display for Money {
    /// Renders `310000` as `310.000₫`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        write!(f, "{grouped}₫")
    }
}

/// A sellable catalog entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Manufacturer
    pub brand: String,
    /// Unit price
    pub price: Money,
    /// Marketing description
    pub description: String,
    /// Catalog category
    pub category: String,
    /// Image URL
    pub image: String,
    /// Short feature bullets
    pub features: Vec<String>,
}

/// A product and how many of it are in the cart (always ≥ 1)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// The product
    pub product: Product,
    /// Quantity in the cart
    pub quantity: u32,
}

impl CartItem {
    /// `price × quantity`
    #[must_use]
    pub const fn line_total(&self) -> Money {
        self.product.price.times(self.quantity)
    }
}

/// Order identifier (8 characters from `[0-9A-Z]`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Creates a new `OrderId` from a string
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Returns the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque payload encoded into an order's QR code
///
/// Format: `TSC-<6 chars [0-9A-Z]>-<creation unix millis>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RedemptionCode(String);

impl RedemptionCode {
    /// Creates a new `RedemptionCode` from a string
    #[must_use]
    pub const fn new(code: String) -> Self {
        Self(code)
    }

    /// Returns the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RedemptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of an order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Awaiting pickup at a kiosk
    Pending,
    /// Dispensed
    Collected,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Collected => write!(f, "collected"),
        }
    }
}

/// A checked-out cart
///
/// `items` and `total` are frozen at checkout; only `status` ever changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique within the ledger
    pub id: OrderId,
    /// Snapshot of the cart at checkout
    pub items: Vec<CartItem>,
    /// Frozen total
    pub total: Money,
    /// Checkout time
    pub created_at: DateTime<Utc>,
    /// QR payload presented at the kiosk
    pub code: RedemptionCode,
    /// Current status
    pub status: OrderStatus,
}

impl Order {
    /// Sum of item quantities (shown as "N PCS")
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().fold(0, |n, item| n.saturating_add(item.quantity))
    }

    /// Returns `true` while the order awaits pickup
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

/// Top-level screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Landing page
    #[default]
    Home,
    /// Product list with search and staging quantities
    Catalog,
    /// Cart contents and checkout
    Cart,
    /// Orders with their QR codes
    OrderHistory,
    /// Kiosk simulator
    Kiosk,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Home => "home",
            Self::Catalog => "catalog",
            Self::Cart => "cart",
            Self::OrderHistory => "orders",
            Self::Kiosk => "kiosk",
        };
        f.write_str(name)
    }
}

/// Toast flavour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    /// Something the user asked for happened
    Success,
    /// Neutral information
    Info,
}
