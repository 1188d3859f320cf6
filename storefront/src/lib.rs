//! # Shield Point
//!
//! An anonymous vending-style storefront: browse the catalog, fill a cart,
//! check out into an order with a QR redemption code, then scan and collect it
//! at a kiosk. A hosted model answers free-text product questions.
//!
//! All behaviour lives in [`AppReducer`]; the [`Store`](shield_point_runtime::Store)
//! runs its effects (kiosk and toast timers, advisor requests).
//!
//! ## Example
//!
//! ```ignore
//! use shield_point::{AppAction, AppReducer, AppState, ShopConfig, ShopEnvironment};
//! use shield_point_runtime::Store;
//!
//! let config = ShopConfig::load()?;
//! let store = Store::new(
//!     AppState::default(),
//!     AppReducer::new(),
//!     ShopEnvironment::production(&config),
//! );
//!
//! store.send(AppAction::AddToCart { product_id: "1".into(), quantity: Some(2) }).await?;
//! store.send(AppAction::Checkout).await?;
//! ```

pub mod app;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod console;
pub mod environment;
pub mod kiosk;
pub mod ledger;
pub mod mocks;
pub mod notifications;
pub mod recommendation;
pub mod types;

pub use app::{AppAction, AppReducer, AppState, KIOSK_TIMER};
pub use cart::Cart;
pub use catalog::Catalog;
pub use config::{ConfigError, ShopConfig};
pub use environment::{QrRenderer, Recommender, ShopEnvironment, Timings, TokenSource};
pub use kiosk::{Kiosk, KioskPhase, ScanOutcome};
pub use ledger::{MarkOutcome, OrderLedger};
pub use notifications::{Notifications, Toast};
pub use recommendation::{AdvisorState, FALLBACK_ANSWER};
pub use types::{
    CartItem, Money, Order, OrderId, OrderStatus, Product, ProductId, RedemptionCode, Screen,
    ToastKind,
};
