//! Application state, actions and the reducer that ties the storefront
//! together.
//!
//! `AppReducer::reduce` is the only code that mutates [`AppState`]. Every timer
//! it schedules is cancellable: the kiosk uses a single [`KIOSK_TIMER`] group
//! and each toast gets its own.

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::environment::ShopEnvironment;
use crate::kiosk::{Kiosk, ScanOutcome};
use crate::ledger::{MarkOutcome, OrderLedger};
use crate::notifications::{Notifications, timer_for};
use crate::recommendation::AdvisorState;
use crate::types::{Product, ProductId, Screen, ToastKind};
use shield_point_core::effect::{Effect, EffectId};
use shield_point_core::reducer::Reducer;
use shield_point_core::{SmallVec, async_effect, cancellable_delay, smallvec};
use std::collections::HashMap;

/// Cancellation group for the kiosk's scan and dispense timers
pub const KIOSK_TIMER: &str = "kiosk-timer";

/// Everything the storefront knows
#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Current screen
    pub screen: Screen,
    /// Products on sale
    pub catalog: Catalog,
    /// Catalog quantity selectors (absent means 1)
    pub catalog_quantities: HashMap<ProductId, u32>,
    /// Catalog search filter
    pub search_query: String,
    /// The cart
    pub cart: Cart,
    /// All orders, newest first
    pub ledger: OrderLedger,
    /// Kiosk simulator
    pub kiosk: Kiosk,
    /// Visible toasts
    pub notifications: Notifications,
    /// Product advisor
    pub advisor: AdvisorState,
}

impl AppState {
    /// Fresh state over `catalog`
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// Quantity staged for `product_id` in the catalog view
    #[must_use]
    pub fn staged_quantity(&self, product_id: &ProductId) -> u32 {
        self.catalog_quantities.get(product_id).copied().unwrap_or(1)
    }

    /// Products matching the current search
    pub fn visible_products(&self) -> impl Iterator<Item = &Product> {
        self.catalog.search(&self.search_query)
    }
}

/// Every input to the storefront: user events and timer callbacks
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppAction {
    // ========== Navigation ==========
    /// Switch screens (leaving the kiosk resets it)
    Navigate {
        /// Target screen
        screen: Screen,
    },
    /// Filter the catalog
    Search {
        /// Case-insensitive substring
        query: String,
    },

    // ========== Cart ==========
    /// Change a catalog quantity selector (clamped to ≥ 1)
    AdjustStagedQuantity {
        /// Product
        product_id: ProductId,
        /// Signed change
        delta: i32,
    },
    /// Add to the cart; `None` uses the staged quantity
    AddToCart {
        /// Product
        product_id: ProductId,
        /// Explicit quantity
        quantity: Option<u32>,
    },
    /// Change a cart line's quantity (clamped to ≥ 1)
    UpdateQuantity {
        /// Product
        product_id: ProductId,
        /// Signed change
        delta: i32,
    },
    /// Drop a cart line
    RemoveFromCart {
        /// Product
        product_id: ProductId,
    },
    /// Turn the cart into an order
    Checkout,

    // ========== Kiosk ==========
    /// Present an order id or QR payload
    PresentCode {
        /// What the kiosk read
        code: String,
    },
    /// Scan timer fired
    ScanResolved {
        /// Session that scheduled it
        session: u64,
    },
    /// Start dispensing the matched order
    Collect,
    /// Dispense timer fired
    DispenseFinished {
        /// Session that scheduled it
        session: u64,
    },
    /// Abandon the current redemption
    ResetKiosk,

    // ========== Advisor ==========
    /// Ask the advisor
    AskAdvisor {
        /// Free text
        question: String,
    },
    /// Advisor replied (or fell back)
    AdvisorAnswered {
        /// Prose answer
        answer: String,
    },

    // ========== Notifications ==========
    /// Close a toast (manually or by its timer)
    DismissToast {
        /// Toast id
        id: u64,
    },
}

/// The storefront reducer
#[derive(Clone, Debug, Default)]
pub struct AppReducer;

impl AppReducer {
    /// Creates a new reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn kiosk_timer() -> EffectId {
        EffectId::new(KIOSK_TIMER)
    }

    /// Show a toast and schedule its dismissal
    fn notify(
        state: &mut AppState,
        env: &ShopEnvironment,
        message: String,
        kind: ToastKind,
    ) -> Effect<AppAction> {
        let toast = state.notifications.push(message, kind);
        Effect::Delay {
            duration: env.timings.toast_ttl,
            action: Box::new(AppAction::DismissToast { id: toast.id }),
        }
        .cancellable(toast.timer())
    }

    fn add_to_cart(
        state: &mut AppState,
        env: &ShopEnvironment,
        product_id: &ProductId,
        quantity: Option<u32>,
    ) -> Effect<AppAction> {
        let Some(product) = state.catalog.get(product_id) else {
            tracing::debug!(%product_id, "Ignoring add of unknown product");
            return Effect::None;
        };
        let quantity = quantity.unwrap_or_else(|| state.staged_quantity(product_id));
        let added = state.cart.add(product, quantity);
        let message = format!("Added {added}x {} to cart", product.name);

        state.catalog_quantities.insert(product_id.clone(), 1);
        Self::notify(state, env, message, ToastKind::Success)
    }

    fn checkout(state: &mut AppState, env: &ShopEnvironment) -> SmallVec<[Effect<AppAction>; 4]> {
        let Some(order) = state
            .ledger
            .checkout(&mut state.cart, env.tokens.as_ref(), env.clock.now())
        else {
            tracing::debug!("Ignoring checkout of empty cart");
            return smallvec![Effect::None];
        };

        tracing::info!(
            order_id = %order.id,
            total = order.total.amount(),
            items = order.item_count(),
            "Order placed"
        );
        state.screen = Screen::OrderHistory;
        smallvec![Self::notify(
            state,
            env,
            "Order placed! Your QR code is ready.".to_string(),
            ToastKind::Success,
        )]
    }

    fn leave_kiosk(state: &mut AppState) -> Effect<AppAction> {
        if state.kiosk.reset() {
            tracing::info!("Kiosk session abandoned");
        }
        Effect::Cancel(Self::kiosk_timer())
    }
}

impl Reducer for AppReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = ShopEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Navigation ==========
            AppAction::Navigate { screen } => {
                let leaving_kiosk = state.screen == Screen::Kiosk && screen != Screen::Kiosk;
                state.screen = screen;
                if leaving_kiosk {
                    smallvec![Self::leave_kiosk(state)]
                } else {
                    smallvec![Effect::None]
                }
            },
            AppAction::Search { query } => {
                state.search_query = query.trim().to_string();
                smallvec![Effect::None]
            },

            // ========== Cart ==========
            AppAction::AdjustStagedQuantity { product_id, delta } => {
                if state.catalog.get(&product_id).is_none() {
                    tracing::debug!(%product_id, "Ignoring quantity change for unknown product");
                    return smallvec![Effect::None];
                }
                let next = i64::from(state.staged_quantity(&product_id))
                    .saturating_add(i64::from(delta))
                    .max(1);
                state
                    .catalog_quantities
                    .insert(product_id, u32::try_from(next).unwrap_or(u32::MAX));
                smallvec![Effect::None]
            },
            AppAction::AddToCart {
                product_id,
                quantity,
            } => smallvec![Self::add_to_cart(state, env, &product_id, quantity)],
            AppAction::UpdateQuantity { product_id, delta } => {
                if !state.cart.update_quantity(&product_id, i64::from(delta)) {
                    tracing::debug!(%product_id, "Ignoring update of product not in cart");
                }
                smallvec![Effect::None]
            },
            AppAction::RemoveFromCart { product_id } => match state.cart.remove(&product_id) {
                Some(item) => smallvec![Self::notify(
                    state,
                    env,
                    format!("Removed {}", item.product.name),
                    ToastKind::Info,
                )],
                None => {
                    tracing::debug!(%product_id, "Ignoring removal of product not in cart");
                    smallvec![Effect::None]
                },
            },
            AppAction::Checkout => Self::checkout(state, env),

            // ========== Kiosk ==========
            AppAction::PresentCode { code } => {
                if state.screen != Screen::Kiosk {
                    tracing::debug!("Ignoring code presented away from the kiosk");
                    return smallvec![Effect::None];
                }
                match state.kiosk.present(&code) {
                    Some(session) => {
                        tracing::info!(session, "Kiosk scanning");
                        smallvec![cancellable_delay! {
                            id: KIOSK_TIMER,
                            duration: env.timings.scan_delay,
                            action: AppAction::ScanResolved { session }
                        }]
                    },
                    None => {
                        tracing::debug!("Ignoring code: kiosk busy or code blank");
                        smallvec![Effect::None]
                    },
                }
            },
            AppAction::ScanResolved { session } => {
                match state.kiosk.resolve(session, &state.ledger) {
                    ScanOutcome::Matched(order_id) => {
                        tracing::info!(%order_id, "Kiosk matched order");
                    },
                    ScanOutcome::Missed => {
                        tracing::info!(session, "No pending order matches the presented code");
                    },
                    ScanOutcome::Stale => {
                        tracing::debug!(session, "Ignoring stale scan timer");
                    },
                }
                smallvec![Effect::None]
            },
            AppAction::Collect => match state.kiosk.collect() {
                Some(session) => {
                    tracing::info!(session, "Kiosk dispensing");
                    smallvec![cancellable_delay! {
                        id: KIOSK_TIMER,
                        duration: env.timings.dispense_delay,
                        action: AppAction::DispenseFinished { session }
                    }]
                },
                None => {
                    tracing::debug!("Ignoring collect: no matched order");
                    smallvec![Effect::None]
                },
            },
            AppAction::DispenseFinished { session } => {
                let Some(order_id) = state.kiosk.finish(session) else {
                    tracing::debug!(session, "Ignoring stale dispense timer");
                    return smallvec![Effect::None];
                };
                match state.ledger.mark_collected(&order_id) {
                    MarkOutcome::Collected => {
                        tracing::info!(%order_id, "Order collected");
                        smallvec![Self::notify(
                            state,
                            env,
                            "Collected successfully. Enjoy!".to_string(),
                            ToastKind::Success,
                        )]
                    },
                    outcome => {
                        tracing::debug!(%order_id, ?outcome, "Order not marked collected");
                        smallvec![Effect::None]
                    },
                }
            },
            AppAction::ResetKiosk => smallvec![Self::leave_kiosk(state)],

            // ========== Advisor ==========
            AppAction::AskAdvisor { question } => {
                let Some(question) = state.advisor.begin(&question) else {
                    tracing::debug!("Ignoring blank question or advisor busy");
                    return smallvec![Effect::None];
                };
                let catalog_json = state.catalog.to_json().unwrap_or_else(|error| {
                    tracing::warn!(%error, "Failed to serialize catalog for advisor");
                    "[]".to_string()
                });
                let recommender = env.recommender.clone();

                smallvec![async_effect! {
                    let answer = recommender.recommend(question, catalog_json).await;
                    Some(AppAction::AdvisorAnswered { answer })
                }]
            },
            AppAction::AdvisorAnswered { answer } => {
                state.advisor.finish(answer);
                smallvec![Effect::None]
            },

            // ========== Notifications ==========
            AppAction::DismissToast { id } => {
                if state.notifications.dismiss(id) {
                    smallvec![Effect::Cancel(timer_for(id))]
                } else {
                    smallvec![Effect::None]
                }
            },
        }
    }
}
