use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Error sending request to {url}: {reason}")]
    SeedUnreachable { url: String, reason: String },

    #[error("URL provided results in not found (status {status}): {url}")]
    SeedNotFound { url: String, status: u16 },

    #[error("Could not validate 404 on bad url: {url} Status Code: {status}")]
    CatchAllHost { url: String, status: u16 },

    #[error("Lost connection to server while requesting {url}: {reason}")]
    ConnectionLost { url: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("Other error: {0}")]
    Other(String),
}

impl ScanError {
    /// Errors that end the whole run rather than a single candidate.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScanError::InvalidUrl(_)
                | ScanError::SeedUnreachable { .. }
                | ScanError::SeedNotFound { .. }
                | ScanError::CatchAllHost { .. }
                | ScanError::ConnectionLost { .. }
                | ScanError::IoError(_)
                | ScanError::JoinError(_)
        )
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            ScanError::Timeout(_) => true,
            ScanError::HttpError(e) => e.is_timeout(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
