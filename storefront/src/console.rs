//! Text console: command parsing and screen rendering.

use crate::app::{AppAction, AppState};
use crate::environment::QrRenderer;
use crate::kiosk::KioskPhase;
use crate::types::{OrderStatus, ProductId, Screen, ToastKind};
use std::fmt::Write as _;
use thiserror::Error;

/// Help text for the console
pub const HELP: &str = "\
commands:
  home                     landing page
  catalog [query]          list products (optionally filtered)
  stage <id> <+n|-n>       change a catalog quantity selector
  add <id> [qty]           add to cart (default: staged quantity)
  inc <id> | dec <id>      change a cart line by one
  remove <id>              drop a cart line
  cart                     show the cart
  checkout                 place an order
  orders                   order history
  qr <order-id>            show an order's QR code
  kiosk                    open the kiosk simulator
  scan <code>              present an order id or QR payload
  collect                  dispense the matched order
  reset                    reset the kiosk
  ask <question>           ask the product advisor
  toasts                   show notifications
  dismiss <toast-id>       close a notification
  help                     this text
  quit                     exit";

/// A parsed console line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Dispatch these actions, then render the resulting screen
    Dispatch(Vec<AppAction>),
    /// Print an order's QR code
    Qr(String),
    /// Print notifications
    Toasts,
    /// Print help
    Help,
    /// Leave the console
    Quit,
}

/// Why a line could not be parsed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Unrecognised command word
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),
    /// Required argument missing
    #[error("usage: {0}")]
    Usage(&'static str),
    /// Argument is not a number
    #[error("{0:?} is not a number")]
    NotANumber(String),
}

fn number<T: std::str::FromStr>(arg: &str) -> Result<T, ParseError> {
    arg.trim_start_matches('+')
        .parse()
        .map_err(|_| ParseError::NotANumber(arg.to_string()))
}

fn navigate(screen: Screen) -> AppAction {
    AppAction::Navigate { screen }
}

/// Parse one console line
///
/// Returns `Ok(None)` for a blank line.
///
/// # Errors
///
/// Returns a [`ParseError`] for unknown commands and malformed arguments.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let args: Vec<&str> = rest.split_whitespace().collect();
    let product = |usage| {
        args.first()
            .map(|id| ProductId::from(*id))
            .ok_or(ParseError::Usage(usage))
    };

    let command = match word.to_lowercase().as_str() {
        "" => return Ok(None),
        "home" => Command::Dispatch(vec![navigate(Screen::Home)]),
        "catalog" | "search" => Command::Dispatch(vec![
            AppAction::Search {
                query: rest.to_string(),
            },
            navigate(Screen::Catalog),
        ]),
        "stage" => {
            let product_id = product("stage <id> <+n|-n>")?;
            let delta = args
                .get(1)
                .ok_or(ParseError::Usage("stage <id> <+n|-n>"))
                .and_then(|arg| number(arg))?;
            Command::Dispatch(vec![AppAction::AdjustStagedQuantity { product_id, delta }])
        },
        "add" => {
            let product_id = product("add <id> [qty]")?;
            let quantity = args.get(1).map(|arg| number(arg)).transpose()?;
            Command::Dispatch(vec![AppAction::AddToCart {
                product_id,
                quantity,
            }])
        },
        "inc" | "dec" => {
            let product_id = product("inc <id> | dec <id>")?;
            let delta = if word.eq_ignore_ascii_case("inc") { 1 } else { -1 };
            Command::Dispatch(vec![
                AppAction::UpdateQuantity { product_id, delta },
                navigate(Screen::Cart),
            ])
        },
        "remove" | "rm" => Command::Dispatch(vec![AppAction::RemoveFromCart {
            product_id: product("remove <id>")?,
        }]),
        "cart" => Command::Dispatch(vec![navigate(Screen::Cart)]),
        "checkout" => Command::Dispatch(vec![AppAction::Checkout]),
        "orders" | "history" => Command::Dispatch(vec![navigate(Screen::OrderHistory)]),
        "qr" => Command::Qr(args.first().ok_or(ParseError::Usage("qr <order-id>"))?.to_string()),
        "kiosk" => Command::Dispatch(vec![navigate(Screen::Kiosk)]),
        "scan" => {
            if rest.is_empty() {
                return Err(ParseError::Usage("scan <code>"));
            }
            Command::Dispatch(vec![
                navigate(Screen::Kiosk),
                AppAction::PresentCode {
                    code: rest.to_string(),
                },
            ])
        },
        "collect" => Command::Dispatch(vec![AppAction::Collect]),
        "reset" => Command::Dispatch(vec![AppAction::ResetKiosk]),
        "ask" => {
            if rest.is_empty() {
                return Err(ParseError::Usage("ask <question>"));
            }
            Command::Dispatch(vec![AppAction::AskAdvisor {
                question: rest.to_string(),
            }])
        },
        "toasts" => Command::Toasts,
        "dismiss" => {
            let id = args.first().ok_or(ParseError::Usage("dismiss <toast-id>"))?;
            Command::Dispatch(vec![AppAction::DismissToast { id: number(id)? }])
        },
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Header line: screen, cart badge, kiosk status
#[must_use]
pub fn render_header(state: &AppState) -> String {
    let kiosk = match state.kiosk.phase() {
        KioskPhase::Idle => "idle".to_string(),
        KioskPhase::Scanning { .. } => "scanning".to_string(),
        KioskPhase::Matched { order_id } => format!("matched {order_id}"),
        KioskPhase::Dispensing { order_id, .. } => format!("dispensing {order_id}"),
    };
    format!(
        "[THE SHIELD POINT] {} | cart: {} | kiosk: {kiosk}",
        state.screen,
        state.cart.item_count()
    )
}

/// The current screen
#[must_use]
pub fn render_screen(state: &AppState) -> String {
    match state.screen {
        Screen::Home => render_home(state),
        Screen::Catalog => render_catalog(state),
        Screen::Cart => render_cart(state),
        Screen::OrderHistory => render_orders(state),
        Screen::Kiosk => render_kiosk(state),
    }
}

fn render_home(state: &AppState) -> String {
    let mut out = String::from("Order in the app, scan at the machine.\n");
    let _ = writeln!(out, "{} products on sale. Type `catalog` to browse.", state.catalog.len());
    if let Some(answer) = &state.advisor.answer {
        let _ = writeln!(out, "\nAdvisor: {answer}");
    }
    out
}

/// Catalog list honouring the search filter
#[must_use]
pub fn render_catalog(state: &AppState) -> String {
    let mut out = String::new();
    if !state.search_query.is_empty() {
        let _ = writeln!(out, "search: {:?}", state.search_query);
    }
    let mut shown = 0;
    for product in state.visible_products() {
        shown += 1;
        let _ = writeln!(
            out,
            "{:>2}  {:<28} {:<9} {:<11} {:>10}  qty {}",
            product.id,
            product.name,
            product.brand,
            product.category,
            product.price.to_string(),
            state.staged_quantity(&product.id)
        );
    }
    if shown == 0 {
        out.push_str("No products match.\n");
    }
    out
}

/// Cart lines and total
#[must_use]
pub fn render_cart(state: &AppState) -> String {
    if state.cart.is_empty() {
        return "Your cart is empty.\n".to_string();
    }
    let mut out = String::new();
    for item in state.cart.items() {
        let _ = writeln!(
            out,
            "{:>2}  {:<28} x{:<3} {:>12}",
            item.product.id,
            item.product.name,
            item.quantity,
            item.line_total().to_string()
        );
    }
    let _ = writeln!(out, "total: {}", state.cart.total());
    out
}

/// Order history, newest first
#[must_use]
pub fn render_orders(state: &AppState) -> String {
    if state.ledger.is_empty() {
        return "No orders yet.\n".to_string();
    }
    let mut out = String::new();
    for order in state.ledger.iter() {
        let status = match order.status {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Collected => "COLLECTED",
        };
        let _ = writeln!(
            out,
            "#{}  {}  {:>12}  {}  {}",
            order.id,
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.total.to_string(),
            status,
            order.code
        );
    }
    out
}

/// Kiosk phase and the pending-order buttons
#[must_use]
pub fn render_kiosk(state: &AppState) -> String {
    let mut out = String::new();
    let _ = match state.kiosk.phase() {
        KioskPhase::Idle => writeln!(out, "READY. Present your QR code."),
        KioskPhase::Scanning { code, .. } => writeln!(out, "SCANNING {code} ..."),
        KioskPhase::Matched { order_id } => {
            writeln!(out, "ORDER #{order_id} VERIFIED. Type `collect` to dispense.")
        },
        KioskPhase::Dispensing { order_id, .. } => writeln!(out, "DISPENSING #{order_id} ..."),
    };

    let mut pending = state.ledger.pending().peekable();
    if pending.peek().is_none() {
        out.push_str("No pending orders.\n");
    }
    for order in pending {
        let _ = writeln!(out, "  [{}]  {} PCS", order.id, order.item_count());
    }
    out
}

/// Visible toasts
#[must_use]
pub fn render_toasts(state: &AppState) -> String {
    if state.notifications.is_empty() {
        return "No notifications.\n".to_string();
    }
    let mut out = String::new();
    for toast in state.notifications.toasts() {
        let marker = match toast.kind {
            ToastKind::Success => "✔",
            ToastKind::Info => "ℹ",
        };
        let _ = writeln!(out, "{marker} ({}) {}", toast.id, toast.message);
    }
    out
}

/// An order's redemption code as a QR image plus its text
#[must_use]
pub fn render_qr(state: &AppState, order_id: &str, renderer: &dyn QrRenderer) -> String {
    let Some(order) = state.ledger.find(order_id) else {
        return format!("No order #{order_id}.\n");
    };
    let mut out = renderer.render(order.code.as_str()).unwrap_or_default();
    let _ = writeln!(out, "#{}  {}  ({})", order.id, order.code, order.status);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppReducer;
    use crate::mocks::{MockRecommender, test_environment};
    use shield_point_core::reducer::Reducer;
    use std::sync::Arc;

    fn dispatch(line: &str) -> Vec<AppAction> {
        match parse(line) {
            Ok(Some(Command::Dispatch(actions))) => actions,
            other => unreachable!("{line:?} parsed as {other:?}"),
        }
    }

    #[test]
    fn parses_cart_commands() {
        assert_eq!(
            dispatch("add 3 2"),
            vec![AppAction::AddToCart {
                product_id: ProductId::from("3"),
                quantity: Some(2),
            }]
        );
        assert_eq!(
            dispatch("stage 1 +2"),
            vec![AppAction::AdjustStagedQuantity {
                product_id: ProductId::from("1"),
                delta: 2,
            }]
        );
        assert_eq!(
            dispatch("ADD 5"),
            vec![AppAction::AddToCart {
                product_id: ProductId::from("5"),
                quantity: None,
            }]
        );
    }

    #[test]
    fn scan_keeps_the_whole_code() {
        assert_eq!(
            dispatch("scan  TSC-ABC123-1735689600000 "),
            vec![
                AppAction::Navigate {
                    screen: Screen::Kiosk
                },
                AppAction::PresentCode {
                    code: "TSC-ABC123-1735689600000".to_string(),
                },
            ]
        );
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(parse("   "), Ok(None));
        assert_eq!(parse("fly"), Err(ParseError::Unknown("fly".to_string())));
        assert_eq!(parse("add"), Err(ParseError::Usage("add <id> [qty]")));
        assert_eq!(parse("add 1 many"), Err(ParseError::NotANumber("many".to_string())));
        assert_eq!(parse("quit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn kiosk_lists_pending_orders_with_piece_counts() {
        let env = test_environment(Arc::new(MockRecommender::answering("ok")));
        let reducer = AppReducer::new();
        let mut state = AppState::default();
        for action in dispatch("add 1 2").into_iter().chain(dispatch("checkout")) {
            let _ = reducer.reduce(&mut state, action, &env);
        }

        let screen = render_kiosk(&state);
        assert!(screen.starts_with("READY."));
        let order_id = state.ledger.iter().next().map(|o| o.id.to_string()).unwrap_or_default();
        assert!(screen.contains(&format!("  [{order_id}]  2 PCS")));
        assert!(render_cart(&state).contains("empty"));
        assert!(render_orders(&state).contains("310.000₫"));
    }

    #[test]
    fn catalog_reports_no_matches() {
        let state = AppState {
            search_query: "zzz".to_string(),
            ..AppState::default()
        };
        assert!(render_catalog(&state).contains("No products match."));
    }
}
