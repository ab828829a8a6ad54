// Tests for result rendering

use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use webenum_core::report::{
    ReportFormat, endpoint_line, generate_statistics, render_domains, render_endpoints,
    save_report,
};
use webenum_scanner::{Endpoint, Findings, ProbeStatus};

fn endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::parse("http://site.test/"),
        Endpoint::parse("http://site.test/login?next=/"),
        Endpoint::parse("http://site.test/admin"),
    ]
}

#[test]
fn test_report_format_from_str() {
    assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
    assert_eq!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json));
    assert_eq!(ReportFormat::from_str("csv"), None);
}

#[test]
fn test_endpoint_line_without_status_is_bare_url() {
    let endpoint = Endpoint::parse("http://site.test/about");
    assert_eq!(endpoint_line(&endpoint, false), "http://site.test/about");
}

#[test]
fn test_render_text_has_no_trailing_newline() {
    let text = render_endpoints(&endpoints(), ReportFormat::Text).unwrap();
    assert_eq!(
        text,
        "http://site.test/\nhttp://site.test/login?next=/\nhttp://site.test/admin"
    );
}

#[test]
fn test_render_empty() {
    assert_eq!(render_endpoints(&[], ReportFormat::Text).unwrap(), "");
    assert_eq!(render_domains(&[], ReportFormat::Text).unwrap(), "");
}

#[test]
fn test_render_json_records() {
    let json = render_endpoints(&endpoints(), ReportFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    let records = parsed.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1]["url"], "http://site.test/login?next=/");
    assert!(records[1]["status"].is_null());
    assert!(records[1]["size"].is_null());
}

#[test]
fn test_checked_status_matches_between_text_and_json() {
    let mut ok = Endpoint::parse("http://site.test/ok");
    ok.record_probe(ProbeStatus::Code(200), Some(4));
    let mut slow = Endpoint::parse("http://site.test/slow");
    slow.record_probe(ProbeStatus::Timeout, None);

    let json = render_endpoints(&[ok.clone(), slow.clone()], ReportFormat::Json).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed[0]["status"], 200);
    assert_eq!(parsed[0]["size"], 4);
    assert_eq!(parsed[1]["status"], "Timeout");
    assert!(parsed[1]["size"].is_null());
    assert!(endpoint_line(&ok, false).contains("(status:200)"));
    assert!(endpoint_line(&slow, false).contains("(status:Timeout)"));
}

#[test]
fn test_render_domains() {
    let domains = vec!["a.com".to_string(), "sub.a.com".to_string()];
    assert_eq!(render_domains(&domains, ReportFormat::Text).unwrap(), "a.com\nsub.a.com");
    let json = render_domains(&domains, ReportFormat::Json).unwrap();
    let parsed: Vec<String> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, domains);
}

#[test]
fn test_statistics() {
    let findings = Findings {
        endpoints: endpoints(),
        domains: vec!["site.test".to_string()],
    };
    let stats = generate_statistics(&findings, Duration::from_millis(1500));
    assert!(stats.contains("STATISTICS:"));
    assert!(stats.contains("URLS: 3"));
    assert!(stats.contains("DOMAINS: 1"));
    assert!(stats.contains("TIME: 1.50s"));
}

#[test]
fn test_save_report() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("out.txt");
    save_report("a\nb", &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb");
}
