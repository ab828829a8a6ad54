use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/101.0.4951.67 Safari/537.36";

/// Everything that shapes a run.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub seed_url: String,
    /// 0 = unbounded
    pub max_depth: usize,
    /// 0 = same as `max_depth`
    pub brute_force_depth: usize,
    pub threads: usize,
    pub timeout: Duration,
    pub allow_subdomains: bool,
    pub allow_other_ports: bool,
    pub check_all_urls: bool,
    pub follow_redirects: bool,
    pub verify_ssl: bool,
    /// Body text that marks a response as "not found" regardless of status.
    pub failure_marker: Option<String>,
    pub basic_auth: Option<(String, String)>,
    pub cookies: BTreeMap<String, String>,
    pub user_agent: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            seed_url: String::new(),
            max_depth: 3,
            brute_force_depth: 0,
            threads: 10,
            timeout: Duration::from_secs(10),
            allow_subdomains: false,
            allow_other_ports: false,
            check_all_urls: false,
            follow_redirects: false,
            verify_ssl: true,
            failure_marker: None,
            basic_auth: None,
            cookies: BTreeMap::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ScanOptions {
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_brute_force_depth(mut self, depth: usize) -> Self {
        self.brute_force_depth = depth;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_allow_subdomains(mut self, allow: bool) -> Self {
        self.allow_subdomains = allow;
        self
    }

    pub fn with_allow_other_ports(mut self, allow: bool) -> Self {
        self.allow_other_ports = allow;
        self
    }

    pub fn with_check_all_urls(mut self, check: bool) -> Self {
        self.check_all_urls = check;
        self
    }

    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    pub fn with_verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    pub fn with_failure_marker(mut self, marker: Option<String>) -> Self {
        self.failure_marker = marker.filter(|m| !m.is_empty());
        self
    }

    pub fn with_basic_auth(mut self, auth: Option<(String, String)>) -> Self {
        self.basic_auth = auth;
        self
    }

    pub fn with_cookies(mut self, cookies: BTreeMap<String, String>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Whether the directory guesser runs at `depth`.
    pub fn brute_forces_at(&self, depth: usize) -> bool {
        self.brute_force_depth == 0 || depth <= self.brute_force_depth
    }

    /// Whether endpoints at `depth` are leaves that must not be expanded.
    pub fn is_depth_limit(&self, depth: usize) -> bool {
        self.max_depth > 0 && depth >= self.max_depth
    }
}
