//! Test doubles for [`ShopEnvironment`](crate::environment::ShopEnvironment).

use crate::environment::{Recommender, ShopEnvironment, TOKEN_ALPHABET, Timings, TokenSource};
use futures::future::BoxFuture;
use shield_point_testing::test_clock;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Hands out scripted tokens, then a deterministic base-36 sequence
///
/// Scripted tokens are returned verbatim whatever length is requested.
#[derive(Debug, Default)]
pub struct ScriptedTokens {
    state: Mutex<(VecDeque<String>, u64)>,
}

impl ScriptedTokens {
    /// Tokens to return first, in order
    #[must_use]
    pub fn new<I, T>(script: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            state: Mutex::new((script.into_iter().map(Into::into).collect(), 0)),
        }
    }
}

impl TokenSource for ScriptedTokens {
    fn token(&self, len: usize) -> String {
        let mut state = lock(&self.state);
        if let Some(token) = state.0.pop_front() {
            return token;
        }
        state.1 += 1;

        let mut n = state.1;
        let mut token = vec![b'0'; len];
        for slot in token.iter_mut().rev() {
            *slot = TOKEN_ALPHABET[usize::try_from(n % 36).unwrap_or(0)];
            n /= 36;
        }
        String::from_utf8(token).unwrap_or_default()
    }
}

/// Canned advisor that records what it was asked
#[derive(Debug, Clone)]
pub struct MockRecommender {
    answer: String,
    latency: Duration,
    questions: Arc<Mutex<Vec<String>>>,
}

impl MockRecommender {
    /// Always answers `answer` immediately
    #[must_use]
    pub fn answering(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            latency: Duration::ZERO,
            questions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer only after `latency` (driven by tokio's clock)
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Questions received so far
    #[must_use]
    pub fn questions(&self) -> Vec<String> {
        lock(&self.questions).clone()
    }
}

impl Recommender for MockRecommender {
    fn recommend(&self, question: String, _catalog_json: String) -> BoxFuture<'static, String> {
        lock(&self.questions).push(question);
        let answer = self.answer.clone();
        let latency = self.latency;
        Box::pin(async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            answer
        })
    }
}

/// Environment with a fixed clock, scripted tokens and a canned advisor
#[must_use]
pub fn test_environment(recommender: Arc<dyn Recommender>) -> ShopEnvironment {
    ShopEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(ScriptedTokens::default()),
        recommender,
        Timings::default(),
    )
}
