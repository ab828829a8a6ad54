use crate::brute::{BruteForcer, should_guess};
use crate::endpoint::{Endpoint, ProbeStatus};
use crate::error::{Result, ScanError};
use crate::extract;
use crate::fetch::{Fetcher, Response};
use crate::options::ScanOptions;
use crate::registry::{Findings, ProgressEvent, RunContext};
use crate::resolver;
use crate::scope;
use crate::validate::{self, NotFoundPredicate};
use std::sync::Arc;
use tracing::{debug, info};

/// Drives one enumeration run: validate the seed, then alternate link
/// following and directory guessing down to the configured depth.
pub struct Enumerator<F: Fetcher> {
    fetcher: Arc<F>,
    options: ScanOptions,
    ctx: Arc<RunContext>,
    predicate: Arc<NotFoundPredicate>,
    wordlist: Arc<[String]>,
}

impl<F: Fetcher> Enumerator<F> {
    pub fn new(fetcher: F, options: ScanOptions, ctx: Arc<RunContext>) -> Self {
        let predicate = Arc::new(NotFoundPredicate::new(options.failure_marker.clone()));
        Self {
            fetcher: Arc::new(fetcher),
            options,
            ctx,
            predicate,
            wordlist: Arc::from(Vec::new()),
        }
    }

    pub fn with_wordlist(mut self, wordlist: Vec<String>) -> Self {
        self.wordlist = Arc::from(wordlist);
        self
    }

    pub fn context(&self) -> &Arc<RunContext> {
        &self.ctx
    }

    /// Run to completion (or until cancelled) and return what was found.
    /// On error, whatever was discovered before it is still in the context.
    pub async fn run(&self) -> Result<Findings> {
        let mut origin = resolver::parse(&self.options.seed_url);
        if !origin.is_usable() {
            return Err(ScanError::InvalidUrl(self.options.seed_url.clone()));
        }

        info!(
            "Starting enumeration of {} (depth {}, {} words, {} workers)",
            origin,
            self.options.max_depth,
            self.wordlist.len(),
            self.options.threads
        );

        validate::validate(self.fetcher.as_ref(), &self.predicate, &mut origin).await?;
        self.ctx.register(origin.clone());
        self.ctx.register_domain(origin.host());
        self.ctx.emit(ProgressEvent {
            depth: 0,
            current: origin.to_string(),
            confirmed: Some(origin.clone()),
            brute_force: None,
        });

        self.explore(&origin).await?;

        let findings = self.ctx.snapshot();
        info!(
            "Enumeration complete. {} URLs, {} domains",
            findings.endpoints.len(),
            findings.domains.len()
        );
        Ok(findings)
    }

    /// Depth-first, in discovery order. Endpoints at the depth limit are
    /// recorded by their parent but never expanded themselves.
    async fn explore(&self, origin: &Endpoint) -> Result<()> {
        let forcer = BruteForcer::new(
            self.fetcher.clone(),
            self.ctx.clone(),
            self.predicate.clone(),
            self.wordlist.clone(),
            self.options.threads,
        );

        let mut pending = vec![(origin.clone(), 0usize)];
        while let Some((endpoint, depth)) = pending.pop() {
            if self.ctx.is_cancelled() {
                info!("Enumeration interrupted with {} URLs found", self.ctx.endpoint_count());
                break;
            }

            let frontier = self.expand(&forcer, origin, &endpoint, depth).await?;
            if self.options.is_depth_limit(depth + 1) {
                continue;
            }
            pending.extend(frontier.into_iter().rev().map(|child| (child, depth + 1)));
        }

        Ok(())
    }

    async fn expand(
        &self,
        forcer: &BruteForcer<F>,
        origin: &Endpoint,
        endpoint: &Endpoint,
        depth: usize,
    ) -> Result<Vec<Endpoint>> {
        debug!("Exploring {} at depth {}", endpoint, depth);
        self.ctx.emit(ProgressEvent {
            depth,
            current: endpoint.to_string(),
            confirmed: None,
            brute_force: None,
        });

        let url = endpoint.to_string();
        let is_seed = depth == 0;
        let page = match self.fetcher.fetch(&url).await {
            Ok(response) if is_seed && !self.predicate.is_found(&response) => {
                return Err(ScanError::SeedNotFound {
                    url,
                    status: response.status,
                });
            }
            Ok(response) => Some(response),
            Err(e) if is_seed => {
                return Err(ScanError::SeedUnreachable {
                    url,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                debug!("Skipping {}: {}", url, e);
                None
            }
        };

        let guessed = if !self.wordlist.is_empty()
            && self.options.brute_forces_at(depth)
            && should_guess(endpoint, origin, depth)
        {
            forcer.guess(endpoint, depth).await?
        } else {
            Vec::new()
        };
        if self.ctx.is_cancelled() {
            return Ok(guessed);
        }

        let mut frontier = match page {
            Some(ref response) => self.follow_links(response, endpoint, origin, depth).await,
            None => Vec::new(),
        };
        frontier.extend(guessed);
        Ok(frontier)
    }

    async fn follow_links(
        &self,
        response: &Response,
        page: &Endpoint,
        origin: &Endpoint,
        depth: usize,
    ) -> Vec<Endpoint> {
        let mut discovered = Vec::new();

        for raw in extract::extract_links(&response.body) {
            if self.ctx.is_cancelled() {
                debug!("Link following on {} interrupted", page);
                break;
            }

            let mut candidate = resolver::resolve(&raw, page);
            if !candidate.is_usable()
                || !scope::in_scope(&candidate, origin, &self.options, &self.ctx)
                || self.ctx.contains(&candidate)
            {
                continue;
            }

            if self.options.check_all_urls {
                self.check(&mut candidate).await;
            }

            if self.ctx.register(candidate.clone()) {
                self.ctx.emit(ProgressEvent {
                    depth,
                    current: page.to_string(),
                    confirmed: Some(candidate.clone()),
                    brute_force: None,
                });
                discovered.push(candidate);
            }
        }

        discovered
    }

    async fn check(&self, candidate: &mut Endpoint) {
        match self.fetcher.fetch(&candidate.to_string()).await {
            Ok(response) => {
                candidate.record_probe(ProbeStatus::Code(response.status), Some(response.size()));
            }
            Err(e) => {
                debug!("Check of {} failed: {}", candidate, e);
                candidate.record_probe(ProbeStatus::Timeout, None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockFetcher;
    use std::sync::Mutex;

    fn paths(findings: &Findings) -> Vec<String> {
        findings.endpoints.iter().map(|e| e.path().to_string()).collect()
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[tokio::test]
    async fn test_crawl_and_guess_end_to_end() {
        let fetcher = MockFetcher::new()
            .page("http://site.test/", 200, "<html><body>home</body></html>")
            .page("http://site.test/admin", 404, "")
            .page(
                "http://site.test/login",
                200,
                r#"<html><a href="/login/sub">sub</a></html>"#,
            )
            .page("http://site.test/login/sub", 200, "<html>leaf</html>");
        let options = ScanOptions::new("http://site.test/");
        let ctx = Arc::new(RunContext::new());
        let enumerator =
            Enumerator::new(fetcher, options, ctx).with_wordlist(words(&["admin", "login"]));

        let findings = enumerator.run().await.unwrap();

        let mut found = paths(&findings);
        found.sort();
        assert_eq!(found, vec!["/", "/login", "/login/sub"]);
        assert_eq!(findings.domains, vec!["site.test"]);
        assert_eq!(findings.endpoints[0].status_code(), Some(200));
    }

    #[tokio::test]
    async fn test_catch_all_host_aborts_before_exploring() {
        let fetcher = MockFetcher::new().catch_all(200, "<a href='/x'>x</a>");
        let ctx = Arc::new(RunContext::new());
        let enumerator = Enumerator::new(fetcher, ScanOptions::new("http://site.test/"), ctx.clone())
            .with_wordlist(words(&["admin"]));

        let err = enumerator.run().await.unwrap_err();

        assert!(matches!(err, ScanError::CatchAllHost { .. }));
        assert_eq!(enumerator.fetcher.requests().len(), 2);
        assert_eq!(ctx.endpoint_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_seed() {
        let enumerator = Enumerator::new(
            MockFetcher::new(),
            ScanOptions::new("::::"),
            Arc::new(RunContext::new()),
        );
        assert!(matches!(enumerator.run().await, Err(ScanError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_max_depth_one_stops_at_children() {
        let fetcher = MockFetcher::new()
            .page("http://site.test/", 200, r#"<a href="/a">a</a>"#)
            .page("http://site.test/a", 200, r#"<a href="/a/b">b</a>"#)
            .page("http://site.test/a/b", 200, "");
        let options = ScanOptions::new("http://site.test/").with_max_depth(1);
        let enumerator = Enumerator::new(fetcher, options, Arc::new(RunContext::new()));

        let findings = enumerator.run().await.unwrap();

        assert_eq!(paths(&findings), vec!["/", "/a"]);
        assert_eq!(enumerator.fetcher.request_count("http://site.test/a"), 0);
    }

    #[tokio::test]
    async fn test_unbounded_depth_follows_chain() {
        let fetcher = MockFetcher::new()
            .page("http://site.test/", 200, r#"<a href="/1">1</a>"#)
            .page("http://site.test/1", 200, r#"<a href="/2">2</a>"#)
            .page("http://site.test/2", 200, r#"<a href="/3">3</a>"#)
            .page("http://site.test/3", 200, r#"<a href="/4">4</a>"#)
            .page("http://site.test/4", 200, "");
        let options = ScanOptions::new("http://site.test/").with_max_depth(0);
        let enumerator = Enumerator::new(fetcher, options, Arc::new(RunContext::new()));

        let findings = enumerator.run().await.unwrap();

        assert_eq!(paths(&findings), vec!["/", "/1", "/2", "/3", "/4"]);
    }

    #[tokio::test]
    async fn test_frontier_explored_in_link_order() {
        let fetcher = MockFetcher::new()
            .page(
                "http://site.test/",
                200,
                r#"<a href="/b">b</a><a href="/a">a</a>"#,
            )
            .page("http://site.test/b", 200, r#"<a href="/b/deep">d</a>"#)
            .page("http://site.test/a", 200, "");
        let enumerator = Enumerator::new(
            fetcher,
            ScanOptions::new("http://site.test/"),
            Arc::new(RunContext::new()),
        );

        let findings = enumerator.run().await.unwrap();

        let requests = enumerator.fetcher.requests();
        let pos = |url: &str| requests.iter().position(|r| r == url).unwrap();
        assert!(pos("http://site.test/b") < pos("http://site.test/b/deep"));
        assert!(pos("http://site.test/b/deep") < pos("http://site.test/a"));
        assert_eq!(paths(&findings), vec!["/", "/b", "/a", "/b/deep"]);
    }

    #[tokio::test]
    async fn test_subdomain_links_register_domain_once() {
        let fetcher = MockFetcher::new()
            .page(
                "http://a.com/",
                200,
                r#"<a href="http://sub.a.com/one">1</a><a href="/page">p</a><a href="http://b.org/">x</a>"#,
            )
            .page("http://a.com/page", 200, r#"<a href="http://sub.a.com/two">2</a>"#);
        let options = ScanOptions::new("http://a.com/").with_allow_subdomains(true);
        let enumerator = Enumerator::new(fetcher, options, Arc::new(RunContext::new()));

        let findings = enumerator.run().await.unwrap();

        assert_eq!(findings.domains, vec!["a.com", "sub.a.com"]);
        assert!(findings.endpoints.iter().all(|e| e.host() != "b.org"));
        assert_eq!(enumerator.fetcher.request_count("http://b.org/"), 0);
    }

    #[tokio::test]
    async fn test_check_all_urls_records_status() {
        let fetcher = MockFetcher::new()
            .page(
                "http://site.test/",
                200,
                r#"<a href="/ok">1</a><a href="/missing">2</a><a href="/slow">3</a><a href="http://x.org/">4</a>"#,
            )
            .page("http://site.test/ok", 200, "fine")
            .timeout("http://site.test/slow");
        let options = ScanOptions::new("http://site.test/")
            .with_check_all_urls(true)
            .with_max_depth(1);
        let enumerator = Enumerator::new(fetcher, options, Arc::new(RunContext::new()));

        let findings = enumerator.run().await.unwrap();

        let status = |path: &str| {
            findings
                .endpoints
                .iter()
                .find(|e| e.path() == path)
                .and_then(|e| e.status())
        };
        assert_eq!(status("/ok"), Some(ProbeStatus::Code(200)));
        assert_eq!(status("/missing"), Some(ProbeStatus::Code(404)));
        assert_eq!(status("/slow"), Some(ProbeStatus::Timeout));
        assert_eq!(enumerator.fetcher.request_count("http://x.org/"), 0);
    }

    #[tokio::test]
    async fn test_links_without_check_have_no_status() {
        let fetcher = MockFetcher::new().page("http://site.test/", 200, r#"<a href="/x">x</a>"#);
        let options = ScanOptions::new("http://site.test/").with_max_depth(1);
        let enumerator = Enumerator::new(fetcher, options, Arc::new(RunContext::new()));

        let findings = enumerator.run().await.unwrap();

        assert_eq!(findings.endpoints[1].path(), "/x");
        assert!(findings.endpoints[1].status().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_child_is_skipped() {
        let fetcher = MockFetcher::new()
            .page(
                "http://site.test/",
                200,
                r#"<a href="/down">d</a><a href="/up">u</a>"#,
            )
            .refuse("http://site.test/down")
            .page("http://site.test/up", 200, r#"<a href="/up/more">m</a>"#);
        let enumerator = Enumerator::new(
            fetcher,
            ScanOptions::new("http://site.test/"),
            Arc::new(RunContext::new()),
        );

        let findings = enumerator.run().await.unwrap();

        assert_eq!(paths(&findings), vec!["/", "/down", "/up", "/up/more"]);
    }

    #[tokio::test]
    async fn test_brute_force_depth_limits_guessing() {
        let fetcher = MockFetcher::new()
            .page("http://site.test/", 200, r#"<a href="/docs">d</a>"#)
            .page("http://site.test/docs", 200, "")
            .page("http://site.test/docs/w", 200, "");
        let options = ScanOptions::new("http://site.test/")
            .with_max_depth(0)
            .with_brute_force_depth(1);
        let enumerator = Enumerator::new(fetcher, options, Arc::new(RunContext::new()))
            .with_wordlist(words(&["w"]));

        enumerator.run().await.unwrap();

        let requests = enumerator.fetcher.requests();
        assert!(requests.contains(&"http://site.test/w".to_string()));
        assert!(requests.contains(&"http://site.test/docs/w".to_string()));
        assert_eq!(enumerator.fetcher.request_count("http://site.test/docs/w/w"), 0);
    }

    #[tokio::test]
    async fn test_files_are_not_guessed_into() {
        let fetcher = MockFetcher::new()
            .page("http://site.test/", 200, r#"<a href="/index.php">i</a>"#)
            .page("http://site.test/index.php", 200, "");
        let enumerator = Enumerator::new(
            fetcher,
            ScanOptions::new("http://site.test/"),
            Arc::new(RunContext::new()),
        )
        .with_wordlist(words(&["w"]));

        enumerator.run().await.unwrap();

        assert_eq!(enumerator.fetcher.request_count("http://site.test/index.php/w"), 0);
    }

    #[tokio::test]
    async fn test_cancelled_run_keeps_seed_only() {
        let fetcher = MockFetcher::new().page("http://site.test/", 200, r#"<a href="/x">x</a>"#);
        let ctx = Arc::new(RunContext::new());
        ctx.cancel();
        let enumerator = Enumerator::new(fetcher, ScanOptions::new("http://site.test/"), ctx.clone());

        let findings = enumerator.run().await.unwrap();

        assert_eq!(paths(&findings), vec!["/"]);
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_interrupt_during_link_checks_stops_fetching() {
        let ctx = Arc::new(RunContext::new());
        let mut body = String::from(r#"<a href="/a">a</a>"#);
        for i in 0..50 {
            body.push_str(&format!(r#"<a href="/link{}">l</a>"#, i));
        }
        let fetcher = MockFetcher::new()
            .page("http://site.test/", 200, &body)
            .page("http://site.test/a", 200, "")
            .cancel_on("http://site.test/a", ctx.clone());
        let options = ScanOptions::new("http://site.test/").with_check_all_urls(true);
        let enumerator = Enumerator::new(fetcher, options, ctx.clone());

        let findings = enumerator.run().await.unwrap();

        let requests = enumerator.fetcher.requests();
        assert_eq!(requests.last().map(String::as_str), Some("http://site.test/a"));
        assert_eq!(enumerator.fetcher.request_count("http://site.test/link0"), 0);
        assert_eq!(paths(&findings), vec!["/", "/a"]);
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_interrupt_during_guessing_skips_links() {
        let ctx = Arc::new(RunContext::new());
        let fetcher = MockFetcher::new()
            .page("http://site.test/", 200, r#"<a href="/x">x</a>"#)
            .page("http://site.test/x", 200, "")
            .cancel_on("http://site.test/w1", ctx.clone());
        let options = ScanOptions::new("http://site.test/")
            .with_check_all_urls(true)
            .with_threads(1);
        let enumerator =
            Enumerator::new(fetcher, options, ctx.clone()).with_wordlist(words(&["w1", "w2", "w3"]));

        enumerator.run().await.unwrap();

        assert_eq!(enumerator.fetcher.request_count("http://site.test/w1"), 1);
        assert_eq!(enumerator.fetcher.request_count("http://site.test/w2"), 0);
        assert_eq!(enumerator.fetcher.request_count("http://site.test/w3"), 0);
        assert_eq!(enumerator.fetcher.request_count("http://site.test/x"), 0);
    }

    #[tokio::test]
    async fn test_progress_reports_confirmed_endpoints() {
        let confirmed = Arc::new(Mutex::new(Vec::new()));
        let confirmed_clone = confirmed.clone();
        let ctx = Arc::new(RunContext::new().with_progress_callback(Arc::new(move |event| {
            if let Some(endpoint) = event.confirmed {
                confirmed_clone.lock().unwrap().push(endpoint.path().to_string());
            }
        })));
        let fetcher = MockFetcher::new()
            .page("http://site.test/", 200, "")
            .page("http://site.test/login", 200, "");
        let enumerator = Enumerator::new(fetcher, ScanOptions::new("http://site.test/"), ctx)
            .with_wordlist(words(&["login"]));

        enumerator.run().await.unwrap();

        assert_eq!(*confirmed.lock().unwrap(), vec!["/", "/login"]);
    }
}
