//! Pre-flight checks that stop a run from exploring a host that answers
//! "found" for everything.

use crate::endpoint::{Endpoint, ProbeStatus};
use crate::error::{Result, ScanError};
use crate::fetch::{Fetcher, Response};
use crate::resolver;
use tracing::{debug, info};

/// Decides whether a response means the resource exists.
#[derive(Debug, Clone, Default)]
pub struct NotFoundPredicate {
    failure_marker: Option<String>,
}

impl NotFoundPredicate {
    pub fn new(failure_marker: Option<String>) -> Self {
        Self {
            failure_marker: failure_marker.filter(|m| !m.is_empty()),
        }
    }

    /// A 404 or a body containing the failure marker is "not found";
    /// everything else counts as found.
    pub fn is_found(&self, response: &Response) -> bool {
        if response.status == 404 {
            return false;
        }
        match self.failure_marker {
            Some(ref marker) => !response.body.contains(marker.as_str()),
            None => true,
        }
    }
}

/// Path segment that no sane host serves.
pub fn random_probe_segment() -> String {
    format!("/{}{}", uuid::Uuid::new_v4().simple(), uuid::Uuid::new_v4().simple())
}

/// Check that the seed exists and that a nonsense path does not. On success
/// the seed carries the status and size of its response.
pub async fn validate<F: Fetcher>(
    fetcher: &F,
    predicate: &NotFoundPredicate,
    origin: &mut Endpoint,
) -> Result<()> {
    let seed_url = origin.to_string();
    let response = fetcher
        .fetch(&seed_url)
        .await
        .map_err(|e| ScanError::SeedUnreachable {
            url: seed_url.clone(),
            reason: e.to_string(),
        })?;
    if !predicate.is_found(&response) {
        return Err(ScanError::SeedNotFound {
            url: seed_url,
            status: response.status,
        });
    }
    origin.record_probe(ProbeStatus::Code(response.status), Some(response.size()));
    debug!("Seed {} answered {}", seed_url, response.status);

    let probe = resolver::resolve(&random_probe_segment(), origin).to_string();
    let response = fetcher
        .fetch(&probe)
        .await
        .map_err(|e| ScanError::SeedUnreachable {
            url: probe.clone(),
            reason: e.to_string(),
        })?;
    if predicate.is_found(&response) {
        return Err(ScanError::CatchAllHost {
            url: probe,
            status: response.status,
        });
    }

    info!("Validated not-found signature for {}", seed_url);
    Ok(())
}
