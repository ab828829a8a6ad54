//! Shared state for one enumeration run.
//!
//! Every component receives the same [`RunContext`]. It owns the set of seen
//! endpoints (which doubles as the ordered result list), the discovered
//! domains, the cancellation flag and the progress sink. All mutation goes
//! through one mutex, held only for the check-and-insert itself and never
//! across a network call.

use crate::endpoint::Endpoint;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Emitted whenever the engine moves to a new endpoint or confirms one.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub depth: usize,
    /// The endpoint being crawled or guessed under.
    pub current: String,
    pub confirmed: Option<Endpoint>,
    /// `(position, wordlist length)` while guessing.
    pub brute_force: Option<(usize, usize)>,
}

/// Ordered results of a run.
#[derive(Debug, Clone, Default)]
pub struct Findings {
    pub endpoints: Vec<Endpoint>,
    pub domains: Vec<String>,
}

#[derive(Default)]
struct Discoveries {
    keys: HashSet<String>,
    endpoints: Vec<Endpoint>,
    domain_set: HashSet<String>,
    domains: Vec<String>,
}

#[derive(Default)]
pub struct RunContext {
    discoveries: Mutex<Discoveries>,
    cancelled: AtomicBool,
    progress_callback: Option<ProgressCallback>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Discoveries> {
        // A panicking worker cannot leave the sets half-updated, so the data
        // behind a poisoned lock is still sound.
        self.discoveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn contains(&self, endpoint: &Endpoint) -> bool {
        self.contains_key(&endpoint.canonical_key())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().keys.contains(key)
    }

    /// Insert `endpoint` unless its canonical key is already known. Returns
    /// true when this call stored it.
    pub fn register(&self, endpoint: Endpoint) -> bool {
        let key = endpoint.canonical_key();
        let mut discoveries = self.lock();
        if !discoveries.keys.insert(key) {
            return false;
        }
        discoveries.endpoints.push(endpoint);
        true
    }

    /// Returns true when `host` was not known before.
    pub fn register_domain(&self, host: &str) -> bool {
        let mut discoveries = self.lock();
        if !discoveries.domain_set.insert(host.to_string()) {
            return false;
        }
        discoveries.domains.push(host.to_string());
        true
    }

    pub fn endpoint_count(&self) -> usize {
        self.lock().endpoints.len()
    }

    pub fn domain_count(&self) -> usize {
        self.lock().domains.len()
    }

    /// Copy of everything discovered so far, in discovery order.
    pub fn snapshot(&self) -> Findings {
        let discoveries = self.lock();
        Findings {
            endpoints: discoveries.endpoints.clone(),
            domains: discoveries.domains.clone(),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn emit(&self, event: ProgressEvent) {
        if let Some(ref callback) = self.progress_callback {
            callback(event);
        }
    }
}
