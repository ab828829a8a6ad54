// Running an enumeration end to end with progress rendering

use crate::report;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;
use webenum_scanner::{
    Enumerator, Fetcher, Findings, HttpFetcher, ProgressCallback, ProgressEvent, RunContext,
    ScanError, ScanOptions,
};

/// Options for configuring an enumeration run
pub struct EnumOptions {
    pub scan: ScanOptions,
    pub wordlist: Vec<String>,
    /// Print only confirmed URLs
    pub quiet: bool,
    pub show_progress_bars: bool,
}

/// What a run produced. Findings are always present, even when the run
/// failed or was interrupted part way.
#[derive(Debug)]
pub struct EnumOutcome {
    pub findings: Findings,
    pub error: Option<ScanError>,
    pub interrupted: bool,
    pub elapsed: Duration,
}

impl EnumOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// A prepared run. The context is available before the run starts so a
/// front end can hook cancellation up to it.
pub struct EnumRun {
    options: EnumOptions,
    ctx: Arc<RunContext>,
    progress_bar: Option<Arc<ProgressBar>>,
}

impl EnumRun {
    pub fn new(options: EnumOptions) -> Self {
        let progress_bar = if options.show_progress_bars && !options.quiet {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message("Starting enumeration...");
            pb.enable_steady_tick(Duration::from_millis(120));
            Some(Arc::new(pb))
        } else {
            None
        };

        let callback = progress_printer(progress_bar.clone(), options.quiet);
        let ctx = Arc::new(RunContext::new().with_progress_callback(callback));

        Self {
            options,
            ctx,
            progress_bar,
        }
    }

    pub fn context(&self) -> Arc<RunContext> {
        self.ctx.clone()
    }

    /// Run against the network.
    pub async fn execute(self) -> EnumOutcome {
        let started = Instant::now();
        match HttpFetcher::new(&self.options.scan) {
            Ok(fetcher) => self.execute_with(fetcher).await,
            Err(e) => {
                self.finish();
                EnumOutcome {
                    findings: self.ctx.snapshot(),
                    error: Some(e),
                    interrupted: false,
                    elapsed: started.elapsed(),
                }
            }
        }
    }

    /// Run with the given transport.
    pub async fn execute_with<F: Fetcher>(self, fetcher: F) -> EnumOutcome {
        let started = Instant::now();
        let EnumOptions { scan, wordlist, .. } = self.options;

        let enumerator = Enumerator::new(fetcher, scan, self.ctx.clone()).with_wordlist(wordlist);
        let error = enumerator.run().await.err();
        if let Some(ref e) = error {
            warn!("Enumeration stopped: {}", e);
        }

        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }

        EnumOutcome {
            findings: self.ctx.snapshot(),
            error,
            interrupted: self.ctx.is_cancelled(),
            elapsed: started.elapsed(),
        }
    }

    fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }
}

fn progress_printer(progress_bar: Option<Arc<ProgressBar>>, quiet: bool) -> ProgressCallback {
    let started = Instant::now();
    Arc::new(move |event: ProgressEvent| {
        if let Some(ref endpoint) = event.confirmed {
            let line = if quiet {
                endpoint.to_string()
            } else {
                report::endpoint_line(endpoint, true)
            };
            match progress_bar {
                Some(ref pb) => pb.println(line),
                None => println!("{}", line),
            }
        }
        if let Some(ref pb) = progress_bar {
            pb.set_message(status_message(&event, started.elapsed()));
        }
    })
}

/// The spinner text: elapsed seconds, depth, and either the brute-force
/// position or the page being crawled.
pub fn status_message(event: &ProgressEvent, elapsed: Duration) -> String {
    match event.brute_force {
        Some((done, total)) => format!(
            "{:.2} | Depth: {:2} | Brute Forcing: {}/{} | URL: {}",
            elapsed.as_secs_f64(),
            event.depth,
            done,
            total,
            event.current
        ),
        None => format!(
            "{:.2} | Depth: {:2} | crawling: {}",
            elapsed.as_secs_f64(),
            event.depth,
            event.current
        ),
    }
}
