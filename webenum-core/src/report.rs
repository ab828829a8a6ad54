// Rendering results for the terminal and for output files

use colored::Colorize;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use webenum_scanner::{Endpoint, Findings, ProbeStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// One confirmed endpoint as printed while the run is going. Endpoints
/// without a probe status print as the bare URL.
pub fn endpoint_line(endpoint: &Endpoint, color: bool) -> String {
    let Some(status) = endpoint.status() else {
        return endpoint.to_string();
    };
    let size = endpoint
        .size()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string());
    let status = if color {
        colorize_status(status)
    } else {
        status.to_string()
    };
    format!("{:<75} (status:{}) [size:{}]", endpoint.to_string(), status, size)
}

fn colorize_status(status: ProbeStatus) -> String {
    let text = status.to_string();
    match status {
        ProbeStatus::Code(100..=199) => text.white().to_string(),
        ProbeStatus::Code(200..=299) => text.green().to_string(),
        ProbeStatus::Code(300..=399) => text.cyan().to_string(),
        ProbeStatus::Code(400..=499) => text.yellow().to_string(),
        ProbeStatus::Code(_) | ProbeStatus::Timeout => text.red().to_string(),
    }
}

pub fn generate_statistics(findings: &Findings, elapsed: Duration) -> String {
    let mut report = String::new();
    report.push_str(&"=".repeat(75));
    report.push_str("\n\nSTATISTICS:\n");
    report.push_str(&format!("\tURLS: {}\n", findings.endpoints.len()));
    report.push_str(&format!("\tDOMAINS: {}\n", findings.domains.len()));
    report.push_str(&format!("\tTIME: {:.2}s\n", elapsed.as_secs_f64()));
    report
}

/// One line of the JSON output file.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointRecord {
    pub url: String,
    pub status: Option<StatusRecord>,
    pub size: Option<usize>,
}

/// A status code as a number, the timeout marker as text.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StatusRecord {
    Code(u16),
    Marker(String),
}

impl From<&Endpoint> for EndpointRecord {
    fn from(endpoint: &Endpoint) -> Self {
        let status = endpoint.status().map(|status| match status {
            ProbeStatus::Code(code) => StatusRecord::Code(code),
            ProbeStatus::Timeout => StatusRecord::Marker(status.to_string()),
        });
        Self {
            url: endpoint.to_string(),
            status,
            size: endpoint.size(),
        }
    }
}

/// Endpoint list for the output file: one URL per line without a trailing
/// newline, or a JSON array of `{url, status, size}`.
pub fn render_endpoints(endpoints: &[Endpoint], format: ReportFormat) -> Result<String, String> {
    match format {
        ReportFormat::Text => Ok(endpoints
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")),
        ReportFormat::Json => {
            let records: Vec<EndpointRecord> = endpoints.iter().map(EndpointRecord::from).collect();
            serde_json::to_string_pretty(&records)
                .map_err(|e| format!("Failed to serialize results: {}", e))
        }
    }
}

pub fn render_domains(domains: &[String], format: ReportFormat) -> Result<String, String> {
    match format {
        ReportFormat::Text => Ok(domains.join("\n")),
        ReportFormat::Json => serde_json::to_string_pretty(domains)
            .map_err(|e| format!("Failed to serialize domains: {}", e)),
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
