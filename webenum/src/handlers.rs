use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;
use webenum_core::config::{parse_basic_auth, parse_cookies};
use webenum_core::report::{
    ReportFormat, generate_statistics, render_domains, render_endpoints, save_report,
};
use webenum_core::{EnumOptions, EnumRun, load_wordlist};
use webenum_scanner::{Findings, ScanOptions};

const BANNER: &str = r"
 _      __ ______ ____
| | /| / // ____// __ ) ___   ____   __  __ ____ ___
| |/ |/ // __/  / __  |/ _ \ / __ \ / / / // __ `__ \
|__/|__//_____//_____/ \___//_/ /_/ \__,_//_/ /_/ /_/
";

/// Everything the command line can say about a run.
#[derive(Debug, Clone, Default)]
pub struct EnumArgs {
    pub url: String,
    pub quiet: bool,
    pub allow_subdomains: bool,
    pub allow_other_ports: bool,
    pub depth: usize,
    pub brute_force_depth: usize,
    pub wordlist: Option<String>,
    pub check_all_urls: bool,
    pub timeout: u64,
    pub out_file: Option<String>,
    pub out_file_domains: Option<String>,
    pub format: String,
    pub threads: usize,
    pub no_verify_ssl: bool,
    pub follow_redirects: bool,
    pub basic_auth: Option<String>,
    pub cookies: Option<String>,
    pub fail_cond: Option<String>,
}

impl EnumArgs {
    pub fn from_matches(args: &ArgMatches) -> Self {
        let text = |id: &str| args.get_one::<String>(id).cloned();
        Self {
            url: text("url").unwrap_or_default(),
            quiet: args.get_flag("quiet"),
            allow_subdomains: args.get_flag("allow-subdomains"),
            allow_other_ports: args.get_flag("allow-other-ports"),
            depth: args.get_one::<usize>("depth").copied().unwrap_or(3),
            brute_force_depth: args.get_one::<usize>("brute-force-depth").copied().unwrap_or(0),
            wordlist: text("wordlist"),
            check_all_urls: args.get_flag("check-all-urls"),
            timeout: args.get_one::<u64>("timeout").copied().unwrap_or(10),
            out_file: text("out-file"),
            out_file_domains: text("out-file-domains"),
            format: text("format").unwrap_or_else(|| "text".to_string()),
            threads: args.get_one::<usize>("threads").copied().unwrap_or(10),
            no_verify_ssl: args.get_flag("no-verify-ssl"),
            follow_redirects: args.get_flag("follow-redirects"),
            basic_auth: text("basic-auth"),
            cookies: text("cookies"),
            fail_cond: text("fail-cond"),
        }
    }

    pub fn scan_options(&self) -> Result<ScanOptions, String> {
        let seed = normalize_seed(&self.url)?;
        let basic_auth = self.basic_auth.as_deref().map(parse_basic_auth).transpose()?;
        let cookies = self
            .cookies
            .as_deref()
            .map(parse_cookies)
            .transpose()?
            .unwrap_or_default();

        Ok(ScanOptions::new(seed)
            .with_max_depth(self.depth)
            .with_brute_force_depth(self.brute_force_depth)
            .with_threads(self.threads)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_allow_subdomains(self.allow_subdomains)
            .with_allow_other_ports(self.allow_other_ports)
            .with_check_all_urls(self.check_all_urls)
            .with_follow_redirects(self.follow_redirects)
            .with_verify_ssl(!self.no_verify_ssl)
            .with_failure_marker(self.fail_cond.clone())
            .with_basic_auth(basic_auth)
            .with_cookies(cookies))
    }

    pub fn report_format(&self) -> Result<ReportFormat, String> {
        ReportFormat::from_str(&self.format)
            .ok_or_else(|| format!("Unknown output format '{}'", self.format))
    }

    /// The options worth echoing in the banner, in command-line order.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("url", self.url.clone()),
            ("depth", self.depth.to_string()),
            ("brute_force_depth", self.brute_force_depth.to_string()),
            ("threads", self.threads.to_string()),
            ("timeout", self.timeout.to_string()),
        ];
        let flags = [
            ("allow_subdomains", self.allow_subdomains),
            ("allow_other_ports", self.allow_other_ports),
            ("check_all_urls", self.check_all_urls),
            ("no_verify_ssl", self.no_verify_ssl),
            ("follow_redirects", self.follow_redirects),
        ];
        rows.extend(
            flags
                .into_iter()
                .filter(|(_, on)| *on)
                .map(|(name, _)| (name, "true".to_string())),
        );
        let optional = [
            ("wordlist", &self.wordlist),
            ("out_file", &self.out_file),
            ("out_file_domains", &self.out_file_domains),
            ("fail_cond", &self.fail_cond),
            ("cookies", &self.cookies),
        ];
        rows.extend(
            optional
                .into_iter()
                .filter_map(|(name, value)| value.clone().map(|v| (name, v))),
        );
        if self.basic_auth.is_some() {
            rows.push(("basic_auth", "********".to_string()));
        }
        rows
    }
}

/// Accept a seed with or without scheme; anything but http(s) is refused.
pub fn normalize_seed(raw: &str) -> Result<String, String> {
    let raw = raw.trim();
    let mut candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{}", raw)
    };

    let url = Url::parse(&candidate).map_err(|e| format!("Invalid URL '{}': {}", raw, e))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("Unsupported scheme '{}' in {}", url.scheme(), raw));
    }
    if url.host_str().is_none() {
        return Err(format!("No host in URL '{}'", raw));
    }

    // bare host means the root
    let authority = candidate.split_once("://").map_or("", |(_, rest)| rest);
    if !authority.contains(['/', '?', '#']) {
        candidate.push('/');
    }
    Ok(candidate)
}

pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

pub fn render_banner(args: &EnumArgs) -> String {
    let mut banner = String::new();
    banner.push_str(BANNER);
    banner.push('\n');
    banner.push_str(&"=".repeat(75));
    banner.push('\n');
    for (name, value) in args.summary() {
        banner.push_str(&format!("{:<20} {}\n", format!("{}:", name), value));
    }
    banner.push_str(&"=".repeat(75));
    banner.push('\n');
    banner
}

/// Write the endpoint and domain lists to whichever files were asked for.
pub fn write_outputs(
    findings: &Findings,
    out_file: Option<&Path>,
    out_file_domains: Option<&Path>,
    format: ReportFormat,
) -> anyhow::Result<()> {
    if let Some(path) = out_file {
        let content = render_endpoints(&findings.endpoints, format).map_err(anyhow::Error::msg)?;
        save_report(&content, path)
            .with_context(|| format!("Error writing to file {}", path.display()))?;
        debug!("Wrote {} urls to {}", findings.endpoints.len(), path.display());
    }
    if let Some(path) = out_file_domains {
        let content = render_domains(&findings.domains, format).map_err(anyhow::Error::msg)?;
        save_report(&content, path)
            .with_context(|| format!("Error writing to file {}", path.display()))?;
        debug!("Wrote {} domains to {}", findings.domains.len(), path.display());
    }
    Ok(())
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("{} {}", "✗".red().bold(), message.red());
    std::process::exit(1);
}

pub async fn handle_enum(args: &ArgMatches) {
    let args = EnumArgs::from_matches(args);

    let scan = args
        .scan_options()
        .unwrap_or_else(|e| exit_with_error(&e));
    let format = args.report_format().unwrap_or_else(|e| exit_with_error(&e));
    let wordlist = match args.wordlist {
        Some(ref path) => load_wordlist(&expand_path(path)).unwrap_or_else(|e| exit_with_error(&e)),
        None => Vec::new(),
    };

    if !args.quiet {
        println!("{}", render_banner(&args).bright_blue());
    }

    let run = EnumRun::new(EnumOptions {
        scan,
        wordlist,
        quiet: args.quiet,
        show_progress_bars: !args.quiet,
    });

    let ctx = run.context();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctx.cancel();
        }
    });

    let outcome = run.execute().await;
    interrupt.abort();

    if outcome.interrupted && !args.quiet {
        println!("\n{}", "exiting".yellow());
    }

    let out_file = args.out_file.as_deref().map(expand_path);
    let out_file_domains = args.out_file_domains.as_deref().map(expand_path);
    let written = write_outputs(
        &outcome.findings,
        out_file.as_deref(),
        out_file_domains.as_deref(),
        format,
    );

    if !args.quiet {
        println!("{}", generate_statistics(&outcome.findings, outcome.elapsed));
    }

    if let Err(e) = written {
        exit_with_error(&format!("{:#}", e));
    }
    if let Some(e) = outcome.error {
        exit_with_error(&e.to_string());
    }
}
