pub mod brute;
pub mod endpoint;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod options;
pub mod registry;
pub mod resolver;
pub mod scope;
pub mod traversal;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use endpoint::{Endpoint, ProbeStatus, Scheme};
pub use error::{Result, ScanError};
pub use fetch::{Fetcher, HttpFetcher, Response};
pub use options::{DEFAULT_USER_AGENT, ScanOptions};
pub use registry::{Findings, ProgressCallback, ProgressEvent, RunContext};
pub use resolver::{parse, resolve};
pub use traversal::Enumerator;
pub use validate::NotFoundPredicate;
