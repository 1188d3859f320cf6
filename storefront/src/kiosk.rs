//! Kiosk redemption state machine.
//!
//! ```text
//! Idle --present--> Scanning --resolve(match)--> Matched --collect--> Dispensing --finish--> Idle
//!                       \--resolve(no match)--> Idle
//! ```
//!
//! The machine itself never schedules anything. The app reducer turns a new
//! session into a cancellable timer whose action carries the session number;
//! a resolve or finish with any other session is stale and ignored.

use crate::ledger::OrderLedger;
use crate::types::OrderId;

/// Where the kiosk is in a redemption
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum KioskPhase {
    /// Waiting for a code
    #[default]
    Idle,
    /// Reading `code`
    Scanning {
        /// What was presented
        code: String,
        /// Timer session
        session: u64,
    },
    /// A pending order was found and awaits `collect`
    Matched {
        /// The matched order
        order_id: OrderId,
    },
    /// Releasing the goods
    Dispensing {
        /// The order being dispensed
        order_id: OrderId,
        /// Timer session
        session: u64,
    },
}

/// Outcome of a scan timer firing
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A pending order matched the code
    Matched(OrderId),
    /// Nothing pending matched; back to idle
    Missed,
    /// The timer belonged to an earlier session
    Stale,
}

/// The kiosk and its session counter
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Kiosk {
    phase: KioskPhase,
    last_session: u64,
}

impl Kiosk {
    /// An idle kiosk
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    #[must_use]
    pub const fn phase(&self) -> &KioskPhase {
        &self.phase
    }

    /// Returns `true` when no redemption is in progress
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.phase, KioskPhase::Idle)
    }

    /// Start scanning `code`
    ///
    /// Returns the new session, or `None` when the kiosk is busy or the code is
    /// blank.
    pub fn present(&mut self, code: &str) -> Option<u64> {
        let code = code.trim();
        if !self.is_idle() || code.is_empty() {
            return None;
        }
        let session = self.next_session();
        self.phase = KioskPhase::Scanning {
            code: code.to_string(),
            session,
        };
        Some(session)
    }

    /// Finish the scan started in `session`
    ///
    /// The ledger is consulted now, not when the code was presented.
    pub fn resolve(&mut self, session: u64, ledger: &OrderLedger) -> ScanOutcome {
        let KioskPhase::Scanning { code, session: current } = &self.phase else {
            return ScanOutcome::Stale;
        };
        if *current != session {
            return ScanOutcome::Stale;
        }

        match ledger.redeemable(code) {
            Some(order) => {
                let order_id = order.id.clone();
                self.phase = KioskPhase::Matched {
                    order_id: order_id.clone(),
                };
                ScanOutcome::Matched(order_id)
            },
            None => {
                self.phase = KioskPhase::Idle;
                ScanOutcome::Missed
            },
        }
    }

    /// Start dispensing the matched order
    ///
    /// Returns the new session, or `None` outside `Matched`.
    pub fn collect(&mut self) -> Option<u64> {
        let KioskPhase::Matched { order_id } = &self.phase else {
            return None;
        };
        let order_id = order_id.clone();
        let session = self.next_session();
        self.phase = KioskPhase::Dispensing { order_id, session };
        Some(session)
    }

    /// Finish the dispense started in `session`, returning the order to mark
    pub fn finish(&mut self, session: u64) -> Option<OrderId> {
        match std::mem::take(&mut self.phase) {
            KioskPhase::Dispensing {
                order_id,
                session: current,
            } if current == session => Some(order_id),
            other => {
                self.phase = other;
                None
            },
        }
    }

    /// Abandon whatever is in progress
    ///
    /// Returns `true` if the kiosk was not already idle.
    pub fn reset(&mut self) -> bool {
        !matches!(std::mem::take(&mut self.phase), KioskPhase::Idle)
    }

    fn next_session(&mut self) -> u64 {
        self.last_session += 1;
        self.last_session
    }
}
