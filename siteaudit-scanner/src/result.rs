use crate::checks::{Issue, PageSignals};
use serde::Serialize;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Serialize)]
pub struct AuditResult {
    pub url: String,
    pub path: String,
    pub status_code: Option<u16>,
    pub signals: Option<PageSignals>,
    pub issues: Vec<Issue>,
    pub response_time: Duration,
}

impl AuditResult {
    pub fn new(url: String, status_code: u16, signals: PageSignals, issues: Vec<Issue>) -> Self {
        Self {
            path: display_path(&url),
            url,
            status_code: Some(status_code),
            signals: Some(signals),
            issues,
            response_time: Duration::from_secs(0),
        }
    }

    /// A page that never produced a response. No checks ran.
    pub fn transport_failure(url: String, message: &str) -> Self {
        Self {
            path: display_path(&url),
            url,
            status_code: None,
            signals: None,
            issues: vec![Issue::transport(message)],
            response_time: Duration::from_secs(0),
        }
    }

    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response_time = response_time;
        self
    }

    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues_summary(&self) -> String {
        if self.issues.is_empty() {
            "OK".to_string()
        } else {
            self.issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        }
    }
}

/// The URL with scheme and authority stripped, keeping path and query.
pub fn display_path(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) if parsed.has_host() => match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        },
        _ => url.to_string(),
    }
}
