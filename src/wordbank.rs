// src/wordbank.rs
// Time-bounded cache over the lexicon provider, keyed by pattern id
//
// Owned by the caller and injected per compile, with an explicit clock
// so tests control expiry. Concurrent misses for the same key may both
// fetch; the provider is idempotent and the last writer wins.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::debug;

use crate::provider::LexiconProvider;
use crate::rules::PartialRuleConfig;

/// Cache TTL used in production.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Time source for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Stamped<T> {
    value: T,
    fetched_at: Instant,
}

/// TTL cache for approved-word lists and rule-config overrides.
pub struct Wordbank {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    words: RwLock<HashMap<String, Stamped<Vec<String>>>>,
    rules: RwLock<HashMap<String, Stamped<PartialRuleConfig>>>,
}

impl Wordbank {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            words: RwLock::new(HashMap::new()),
            rules: RwLock::new(HashMap::new()),
        }
    }

    /// Production configuration: five-minute TTL on the system clock.
    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_TTL, Arc::new(SystemClock))
    }

    /// Approved words for a pattern, fetching on miss or expiry.
    pub async fn approved_words(
        &self,
        provider: &dyn LexiconProvider,
        pattern_id: &str,
    ) -> Result<Vec<String>> {
        let now = self.clock.now();
        {
            let cache = self.words.read().await;
            if let Some(entry) = cache.get(pattern_id) {
                if now.duration_since(entry.fetched_at) < self.ttl {
                    debug!(pattern_id, "wordbank hit: approved words");
                    return Ok(entry.value.clone());
                }
            }
        }

        // Fetch outside the lock; a concurrent miss may fetch too.
        let words = provider.get_approved_words(pattern_id).await?;
        debug!(pattern_id, count = words.len(), "wordbank fetch: approved words");
        self.words.write().await.insert(
            pattern_id.to_string(),
            Stamped { value: words.clone(), fetched_at: now },
        );
        Ok(words)
    }

    /// Rule-config overrides for a pattern; an absent provider record
    /// is cached as the empty override set.
    pub async fn rule_config(
        &self,
        provider: &dyn LexiconProvider,
        pattern_id: &str,
    ) -> Result<PartialRuleConfig> {
        let now = self.clock.now();
        {
            let cache = self.rules.read().await;
            if let Some(entry) = cache.get(pattern_id) {
                if now.duration_since(entry.fetched_at) < self.ttl {
                    debug!(pattern_id, "wordbank hit: rule config");
                    return Ok(entry.value.clone());
                }
            }
        }

        let rules = provider
            .get_rule_config(pattern_id)
            .await?
            .unwrap_or_default();
        debug!(pattern_id, "wordbank fetch: rule config");
        self.rules.write().await.insert(
            pattern_id.to_string(),
            Stamped { value: rules.clone(), fetched_at: now },
        );
        Ok(rules)
    }
}
