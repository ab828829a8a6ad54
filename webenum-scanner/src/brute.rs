//! Dictionary-driven directory guessing.

use crate::endpoint::{Endpoint, ProbeStatus};
use crate::error::{Result, ScanError};
use crate::fetch::Fetcher;
use crate::registry::{ProgressEvent, RunContext};
use crate::resolver;
use crate::validate::NotFoundPredicate;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Statuses that prove a path exists but are not worth descending into.
const ACCESS_DENIED: [u16; 3] = [400, 401, 403];

/// Files are not guessed into, and the root is only guessed once, at depth 0.
pub fn should_guess(base: &Endpoint, origin: &Endpoint, depth: usize) -> bool {
    if depth == 0 {
        return true;
    }
    let is_root = base.host() == origin.host() && base.path() == "/";
    !base.looks_like_file() && !is_root
}

pub struct BruteForcer<F: Fetcher> {
    fetcher: Arc<F>,
    ctx: Arc<RunContext>,
    predicate: Arc<NotFoundPredicate>,
    wordlist: Arc<[String]>,
    threads: usize,
}

impl<F: Fetcher> BruteForcer<F> {
    pub fn new(
        fetcher: Arc<F>,
        ctx: Arc<RunContext>,
        predicate: Arc<NotFoundPredicate>,
        wordlist: Arc<[String]>,
        threads: usize,
    ) -> Self {
        Self {
            fetcher,
            ctx,
            predicate,
            wordlist,
            threads: threads.max(1),
        }
    }

    /// Guess every word under `base`, `threads` requests at a time. Each chunk
    /// is fully joined before the next starts. Confirmed endpoints are
    /// registered as they come in; the returned list holds the ones worth
    /// exploring further, in completion order.
    pub async fn guess(&self, base: &Endpoint, depth: usize) -> Result<Vec<Endpoint>> {
        let total = self.wordlist.len();
        let mut found = Vec::new();

        for start in (0..total).step_by(self.threads) {
            if self.ctx.is_cancelled() {
                debug!("Guessing under {} interrupted at {}/{}", base, start, total);
                break;
            }

            let end = (start + self.threads).min(total);
            let mut workers = JoinSet::new();
            for index in start..end {
                workers.spawn(probe_word(
                    self.fetcher.clone(),
                    self.ctx.clone(),
                    self.predicate.clone(),
                    self.wordlist.clone(),
                    index,
                    base.clone(),
                    depth,
                ));
            }

            let mut first_error: Option<ScanError> = None;
            while let Some(joined) = workers.join_next().await {
                match joined {
                    Ok(Ok(Some(endpoint))) => found.push(endpoint),
                    Ok(Ok(None)) => {}
                    Ok(Err(e)) => {
                        first_error.get_or_insert(e);
                    }
                    Err(e) => {
                        first_error.get_or_insert(e.into());
                    }
                }
            }
            if let Some(e) = first_error {
                warn!("Guessing under {} failed: {}", base, e);
                return Err(e);
            }
        }

        Ok(found)
    }
}

async fn probe_word<F: Fetcher>(
    fetcher: Arc<F>,
    ctx: Arc<RunContext>,
    predicate: Arc<NotFoundPredicate>,
    wordlist: Arc<[String]>,
    index: usize,
    base: Endpoint,
    depth: usize,
) -> Result<Option<Endpoint>> {
    let path = resolver::join_path(base.path(), &wordlist[index]);
    let mut candidate = resolver::parse(&format!("{}{}", base.origin_prefix(), path));
    let position = Some((index + 1, wordlist.len()));

    ctx.emit(ProgressEvent {
        depth,
        current: base.to_string(),
        confirmed: None,
        brute_force: position,
    });

    if ctx.contains(&candidate) {
        return Ok(None);
    }

    let url = candidate.to_string();
    let response = match fetcher.fetch(&url).await {
        Ok(response) => response,
        Err(e) if e.is_timeout() => {
            debug!("Dropping {}: {}", url, e);
            return Ok(None);
        }
        Err(e) => {
            return Err(ScanError::ConnectionLost {
                url,
                reason: e.to_string(),
            });
        }
    };

    if !predicate.is_found(&response) {
        return Ok(None);
    }

    candidate.record_probe(ProbeStatus::Code(response.status), Some(response.size()));
    if !ctx.register(candidate.clone()) {
        return Ok(None);
    }
    ctx.emit(ProgressEvent {
        depth,
        current: base.to_string(),
        confirmed: Some(candidate.clone()),
        brute_force: position,
    });

    if ACCESS_DENIED.contains(&response.status) {
        return Ok(None);
    }
    Ok(Some(candidate))
}
