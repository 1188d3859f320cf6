//! # Shield Point Testing
//!
//! Testing utilities and helpers for Shield Point reducers.
//!
//! This crate provides:
//! - A fixed clock for deterministic timestamps
//! - The [`ReducerTest`] Given-When-Then harness
//! - Assertion helpers for effect descriptions
//!
//! Timer-driven behaviour is tested against a real `Store` with tokio's
//! paused clock (`#[tokio::test(start_paused = true)]`).
//!
//! ## Example
//!
//! ```ignore
//! use shield_point_testing::test_clock;
//! use shield_point_runtime::Store;
//!
//! #[tokio::test(start_paused = true)]
//! async fn checkout_flow() {
//!     let store = Store::new(AppState::default(), AppReducer::new(), test_environment());
//!
//!     store.send(AppAction::AddToCart { product_id, quantity: 2 }).await?;
//!     store.send(AppAction::Checkout).await?;
//!
//!     assert_eq!(store.state(|s| s.ledger.len()).await, 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use shield_point_core::environment::Clock;

mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use shield_point_testing::mocks::FixedClock;
    /// use shield_point_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
