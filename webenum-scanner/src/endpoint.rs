use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// URL scheme of an [`Endpoint`]. `Inherit` means the raw text carried none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scheme {
    Http,
    Https,
    #[default]
    Inherit,
}

impl Scheme {
    pub fn prefix(&self) -> &'static str {
        match self {
            Scheme::Http => "http://",
            Scheme::Https => "https://",
            Scheme::Inherit => "",
        }
    }

    pub(crate) fn from_prefix(prefix: &str) -> Self {
        match prefix.to_ascii_lowercase().as_str() {
            "http://" => Scheme::Http,
            "https://" => Scheme::Https,
            _ => Scheme::Inherit,
        }
    }
}

/// Outcome of requesting an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Code(u16),
    Timeout,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Code(code) => write!(f, "{}", code),
            ProbeStatus::Timeout => write!(f, "Timeout"),
        }
    }
}

/// A canonical URL plus what we learned by requesting it.
///
/// Identity (equality, hashing, ordering) is the canonical key:
/// scheme + host + port + path. The query/fragment tail and the probe
/// metadata never take part in it. The key fields are only writable inside
/// this crate, so an endpoint stored in the registry cannot change identity
/// and its probe result can only be set through [`Endpoint::record_probe`].
#[derive(Debug, Clone, Default)]
pub struct Endpoint {
    pub(crate) scheme: Scheme,
    pub(crate) host: String,
    pub(crate) port: String,
    pub(crate) path: String,
    pub(crate) query: String,
    status: Option<ProbeStatus>,
    size: Option<usize>,
}

impl Endpoint {
    pub(crate) fn from_parts(
        scheme: Scheme,
        host: impl Into<String>,
        port: impl Into<String>,
        path: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            scheme,
            host: host.into(),
            port: port.into(),
            path: path.into(),
            query: query.into(),
            status: None,
            size: None,
        }
    }

    /// Shorthand for [`crate::resolver::parse`].
    pub fn parse(raw: &str) -> Self {
        crate::resolver::parse(raw)
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit port marker including the colon (`":8080"`), empty for default.
    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Trailing `?query` / `#fragment` text, empty if there was none.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn status(&self) -> Option<ProbeStatus> {
        self.status
    }

    pub fn status_code(&self) -> Option<u16> {
        match self.status {
            Some(ProbeStatus::Code(code)) => Some(code),
            _ => None,
        }
    }

    pub fn size(&self) -> Option<usize> {
        self.size
    }

    /// scheme + host + port + path
    pub fn canonical_key(&self) -> String {
        format!("{}{}", self.origin_prefix(), self.path)
    }

    /// scheme + host + port
    pub fn origin_prefix(&self) -> String {
        format!("{}{}{}", self.scheme.prefix(), self.host, self.port)
    }

    /// An endpoint without a host cannot be requested.
    pub fn is_usable(&self) -> bool {
        !self.host.is_empty()
    }

    /// A dot anywhere in the path marks it as a file rather than a directory.
    pub fn looks_like_file(&self) -> bool {
        self.path.contains('.')
    }

    /// Record the probe result. Only the first call has any effect; returns
    /// whether it was applied.
    pub fn record_probe(&mut self, status: ProbeStatus, size: Option<usize>) -> bool {
        if self.status.is_some() {
            return false;
        }
        self.status = Some(status);
        self.size = size;
        true
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.canonical_key(), self.query)
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_key() == other.canonical_key()
    }
}

impl Eq for Endpoint {}

impl Hash for Endpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_key().hash(state);
    }
}

impl PartialOrd for Endpoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Endpoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical_key().cmp(&other.canonical_key())
    }
}
