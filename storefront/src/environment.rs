//! Injected dependencies for the storefront reducer.
//!
//! Everything nondeterministic (time, random tokens, the hosted advisor) sits
//! behind a trait here so tests can swap it for a mock.

use crate::config::{AdvisorConfig, ShopConfig};
use crate::recommendation::{FALLBACK_ANSWER, SYSTEM_INSTRUCTION, build_prompt};
use futures::future::BoxFuture;
use qrcode::QrCode;
use qrcode::render::unicode;
use rand::Rng;
use shield_point_advisor::{AdvisorClient, Message, MessagesRequest};
use shield_point_core::environment::{Clock, SystemClock};
use std::sync::Arc;
use std::time::Duration;

/// Alphabet for order ids and redemption codes
pub const TOKEN_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Source of random identifier fragments
pub trait TokenSource: Send + Sync {
    /// A token of `len` characters from [`TOKEN_ALPHABET`]
    fn token(&self, len: usize) -> String;
}

/// Product recommendation collaborator
///
/// Implementations never fail: any problem is turned into
/// [`FALLBACK_ANSWER`] before it reaches the reducer.
pub trait Recommender: Send + Sync {
    /// Answer `question` given the catalog serialized as JSON
    fn recommend(&self, question: String, catalog_json: String) -> BoxFuture<'static, String>;
}

/// Renders a redemption code for display
pub trait QrRenderer: Send + Sync {
    /// Printable image of `payload`, or `None` if it cannot be encoded
    fn render(&self, payload: &str) -> Option<String>;
}

/// Simulated hardware and notification delays
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// Presenting a code → scan resolution
    pub scan_delay: Duration,
    /// Collect → dispensing finished
    pub dispense_delay: Duration,
    /// Toast lifetime
    pub toast_ttl: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self::from(&ShopConfig::default())
    }
}

impl From<&ShopConfig> for Timings {
    fn from(config: &ShopConfig) -> Self {
        Self {
            scan_delay: config.kiosk.scan_delay(),
            dispense_delay: config.kiosk.dispense_delay(),
            toast_ttl: config.notifications.ttl(),
        }
    }
}

/// Environment for the storefront reducer
#[derive(Clone)]
pub struct ShopEnvironment {
    /// Timestamps for new orders
    pub clock: Arc<dyn Clock>,
    /// Randomness for ids and codes
    pub tokens: Arc<dyn TokenSource>,
    /// Product advisor
    pub recommender: Arc<dyn Recommender>,
    /// Delays
    pub timings: Timings,
}

impl ShopEnvironment {
    /// Creates a new environment
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        tokens: Arc<dyn TokenSource>,
        recommender: Arc<dyn Recommender>,
        timings: Timings,
    ) -> Self {
        Self {
            clock,
            tokens,
            recommender,
            timings,
        }
    }

    /// Wall clock, OS randomness and the hosted advisor
    #[must_use]
    pub fn production(config: &ShopConfig) -> Self {
        Self::new(
            Arc::new(SystemClock),
            Arc::new(RandomTokens),
            Arc::new(AdvisorRecommender::from_config(&config.advisor)),
            Timings::from(config),
        )
    }
}

impl std::fmt::Debug for ShopEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopEnvironment")
            .field("timings", &self.timings)
            .finish_non_exhaustive()
    }
}

/// Thread-local RNG tokens
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomTokens;

impl TokenSource for RandomTokens {
    fn token(&self, len: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..len)
            .map(|_| char::from(TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())]))
            .collect()
    }
}

/// Recommender backed by the hosted Messages API
///
/// Without an API key every question gets the fallback answer.
#[derive(Clone, Debug)]
pub struct AdvisorRecommender {
    client: Option<AdvisorClient>,
    model: String,
    max_tokens: u32,
}

impl AdvisorRecommender {
    /// Creates a recommender around an existing client
    #[must_use]
    pub const fn new(client: Option<AdvisorClient>, model: String, max_tokens: u32) -> Self {
        Self {
            client,
            model,
            max_tokens,
        }
    }

    /// Reads the key from `ANTHROPIC_API_KEY`; other settings from `config`
    #[must_use]
    pub fn from_config(config: &AdvisorConfig) -> Self {
        let client = match AdvisorClient::from_env() {
            Ok(client) => Some(
                client
                    .with_base_url(config.base_url.clone())
                    .with_timeout(config.timeout()),
            ),
            Err(error) => {
                tracing::warn!(%error, "Product advisor disabled");
                None
            },
        };
        Self::new(client, config.model.clone(), config.max_tokens)
    }
}

impl Recommender for AdvisorRecommender {
    fn recommend(&self, question: String, catalog_json: String) -> BoxFuture<'static, String> {
        let client = self.client.clone();
        let request = MessagesRequest::new(vec![Message::user(build_prompt(&question, &catalog_json))])
            .with_model(self.model.clone())
            .with_max_tokens(self.max_tokens)
            .with_system(SYSTEM_INSTRUCTION.to_string());

        Box::pin(async move {
            let Some(client) = client else {
                tracing::warn!("No advisor client configured, using fallback answer");
                return FALLBACK_ANSWER.to_string();
            };

            match client.messages(request).await.and_then(|response| response.text()) {
                Ok(text) => text,
                Err(error) => {
                    tracing::warn!(%error, "Advisor request failed, using fallback answer");
                    FALLBACK_ANSWER.to_string()
                },
            }
        })
    }
}

/// Half-block Unicode QR codes for terminals
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalQr;

impl QrRenderer for TerminalQr {
    fn render(&self, payload: &str) -> Option<String> {
        let code = QrCode::new(payload.as_bytes()).ok()?;
        Some(
            code.render::<unicode::Dense1x2>()
                .dark_color(unicode::Dense1x2::Light)
                .light_color(unicode::Dense1x2::Dark)
                .quiet_zone(true)
                .build(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_tokens_use_the_alphabet() {
        let token = RandomTokens.token(8);
        assert_eq!(token.len(), 8);
        assert!(token.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
    }

    #[test]
    fn terminal_qr_renders_a_block() {
        let rendered = TerminalQr.render("TSC-ABC123-1735689600000");
        assert!(rendered.is_some_and(|qr| qr.lines().count() > 10));
    }

    #[tokio::test]
    async fn missing_client_falls_back() {
        let recommender = AdvisorRecommender::new(None, "m".to_string(), 16);
        let answer = recommender
            .recommend("thin?".to_string(), "[]".to_string())
            .await;
        assert_eq!(answer, FALLBACK_ANSWER);
    }

    #[test]
    fn default_timings_follow_config_defaults() {
        let timings = Timings::default();
        assert_eq!(timings.scan_delay, Duration::from_millis(2000));
        assert_eq!(timings.dispense_delay, Duration::from_millis(3500));
        assert_eq!(timings.toast_ttl, Duration::from_millis(3000));
    }
}
