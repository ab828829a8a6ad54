use crate::error::{Result, ScanError};
use crate::options::ScanOptions;
use reqwest::Client;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use std::future::Future;
use tracing::debug;

/// What the engine needs to know about an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.body.len()
    }
}

/// The transport seam. The engine only ever issues plain GETs.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Response>> + Send;
}

/// reqwest-backed [`Fetcher`] configured from [`ScanOptions`].
pub struct HttpFetcher {
    client: Client,
    basic_auth: Option<(String, String)>,
}

impl HttpFetcher {
    pub fn new(options: &ScanOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if !options.cookies.is_empty() {
            let cookie = options
                .cookies
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect::<Vec<_>>()
                .join("; ");
            let value = HeaderValue::from_str(&cookie)
                .map_err(|e| ScanError::Other(format!("Invalid cookie value: {}", e)))?;
            headers.insert(COOKIE, value);
        }

        let redirect = if options.follow_redirects {
            reqwest::redirect::Policy::limited(10)
        } else {
            reqwest::redirect::Policy::none()
        };

        let client = Client::builder()
            .user_agent(options.user_agent.as_str())
            .default_headers(headers)
            .timeout(options.timeout)
            .connect_timeout(options.timeout)
            .pool_max_idle_per_host(options.threads.max(1))
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .tcp_keepalive(std::time::Duration::from_secs(60))
            .danger_accept_invalid_certs(!options.verify_ssl)
            .redirect(redirect)
            .build()?;

        Ok(Self {
            client,
            basic_auth: options.basic_auth.clone(),
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Response>> + Send {
        let mut request = self.client.get(url);
        if let Some((ref user, ref pass)) = self.basic_auth {
            request = request.basic_auth(user, Some(pass));
        }
        let url = url.to_string();

        async move {
            debug!("GET {}", url);
            let response = request
                .send()
                .await
                .map_err(|e| transport_error(e, &url))?;
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| transport_error(e, &url))?;
            Ok(Response { status, body })
        }
    }
}

fn transport_error(err: reqwest::Error, url: &str) -> ScanError {
    if err.is_timeout() {
        ScanError::Timeout(url.to_string())
    } else {
        ScanError::HttpError(err)
    }
}
