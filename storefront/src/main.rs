//! Shield Point interactive console.
//!
//! # Usage
//!
//! ```bash
//! ANTHROPIC_API_KEY=... cargo run --bin shield-point
//! ```
//!
//! Settings come from `SHIELD_POINT_CONFIG` (a TOML file) and `SHIELD_POINT_*`
//! overrides; a `.env` file in the working directory is loaded first. Logs go
//! to stderr and honour `RUST_LOG`.

use anyhow::Context;
use shield_point::console::{self, Command};
use shield_point::environment::TerminalQr;
use shield_point::{AppAction, AppReducer, AppState, ShopConfig, ShopEnvironment};
use shield_point_runtime::Store;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type ShopStore = Store<AppState, AppAction, ShopEnvironment, AppReducer>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shield_point=info,shield_point_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ShopConfig::load().context("loading configuration")?;
    tracing::info!(
        scan_delay_ms = config.kiosk.scan_delay_ms,
        dispense_delay_ms = config.kiosk.dispense_delay_ms,
        model = %config.advisor.model,
        "Starting Shield Point"
    );

    let store: ShopStore = Store::with_broadcast_capacity(
        AppState::default(),
        AppReducer::new(),
        ShopEnvironment::production(&config),
        64,
    );
    tokio::spawn(print_timer_results(store.clone()));

    println!("=== THE SHIELD POINT ===\n{}\n", console::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        match console::parse(&line) {
            Ok(None) => {},
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => println!("{}", console::HELP),
            Ok(Some(Command::Toasts)) => print!("{}", store.state(console::render_toasts).await),
            Ok(Some(Command::Qr(order_id))) => {
                print!("{}", store.state(|s| console::render_qr(s, &order_id, &TerminalQr)).await);
            },
            Ok(Some(Command::Dispatch(actions))) => {
                for action in actions {
                    store.send(action).await?;
                }
                print_screen(&store).await;
            },
            Err(error) => println!("{error}"),
        }
    }

    if let Err(error) = store.shutdown(Duration::from_secs(5)).await {
        tracing::warn!(%error, "Pending timers did not finish before exit");
    }
    Ok(())
}

async fn print_screen(store: &ShopStore) {
    let (header, screen) = store
        .state(|s| (console::render_header(s), console::render_screen(s)))
        .await;
    println!("{header}\n{screen}");
}

/// Report timer and advisor results as they arrive
async fn print_timer_results(store: ShopStore) {
    let mut actions = store.subscribe_actions();
    loop {
        match actions.recv().await {
            Ok(AppAction::AdvisorAnswered { answer }) => println!("\nAdvisor: {answer}\n"),
            Ok(AppAction::ScanResolved { .. } | AppAction::DispenseFinished { .. }) => {
                print_screen(&store).await;
            },
            Ok(_) => {},
            Err(RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "Console observer lagged");
            },
            Err(RecvError::Closed) => break,
        }
    }
}
