//! Short-lived record of delivered submissions keyed by client idempotency key

use crate::config::IdempotencyConfig;
use crate::models::{ContactResponse, ContactSubmission};
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

pub const IDEMPOTENCY_HEADER: &str = "idempotency-key";
const MAX_KEY_LEN: usize = 128;

#[derive(Debug, Clone)]
struct Entry {
    fingerprint: u64,
    response: ContactResponse,
    recorded_at: Instant,
}

#[derive(Debug, Clone)]
pub struct IdempotencyWindow {
    entries: Arc<Mutex<LruCache<String, Entry>>>,
    window: Duration,
}

impl IdempotencyWindow {
    pub fn new(config: &IdempotencyConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(NonZeroUsize::MIN);

        Self {
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
            window: Duration::from_secs(config.window_seconds),
        }
    }

    /// Accepts only short, visible-ASCII keys; anything else is treated as absent.
    pub fn normalize_key(raw: &str) -> Option<String> {
        let key = raw.trim();
        if key.is_empty() || key.len() > MAX_KEY_LEN || !key.bytes().all(|b| b.is_ascii_graphic()) {
            return None;
        }
        Some(key.to_string())
    }

    /// Identifies the submission content a key was recorded for.
    pub fn fingerprint(submission: &ContactSubmission) -> u64 {
        let mut hasher = DefaultHasher::new();
        submission.hash(&mut hasher);
        hasher.finish()
    }

    /// The response recorded for `key`, if it is still inside the window and
    /// was recorded for the same content. A reused key with new content is a
    /// new submission.
    pub fn lookup(&self, key: &str, fingerprint: u64) -> Option<ContactResponse> {
        let mut entries = self.entries.lock();

        let expired = match entries.get(key) {
            Some(entry) if entry.recorded_at.elapsed() > self.window => true,
            Some(entry) if entry.fingerprint == fingerprint => {
                debug!(key, "Idempotency key replayed");
                return Some(entry.response.clone());
            }
            Some(_) => {
                debug!(key, "Idempotency key reused with different content");
                return None;
            }
            None => false,
        };

        if expired {
            entries.pop(key);
        }
        None
    }

    pub fn record(&self, key: String, fingerprint: u64, response: ContactResponse) {
        self.entries.lock().put(
            key,
            Entry {
                fingerprint,
                response,
                recorded_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
