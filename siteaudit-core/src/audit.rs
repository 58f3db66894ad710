use indicatif::{ProgressBar, ProgressStyle};
use siteaudit_scanner::result::AuditResult;
use siteaudit_scanner::{Auditor, CheckPolicy};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;

/// Options for configuring an audit run
pub struct AuditOptions {
    pub urls: Vec<String>,
    pub concurrency: usize,
    pub delay: Duration,
    pub timeout_secs: u64,
    pub policy: CheckPolicy,
    pub show_progress_bar: bool,
}

impl AuditOptions {
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            concurrency: 1,
            delay: siteaudit_scanner::auditor::DEFAULT_DELAY,
            timeout_secs: siteaudit_scanner::auditor::DEFAULT_TIMEOUT_SECS,
            policy: CheckPolicy::default(),
            show_progress_bar: false,
        }
    }
}

/// Callback for reporting each finished URL
pub type AuditProgressCallback = Arc<dyn Fn(&AuditResult) + Send + Sync>;

/// Outcome of a whole run.
#[derive(Debug, Clone)]
pub struct AuditSummary {
    pub results: Vec<AuditResult>,
    pub passed: usize,
    pub failed: usize,
}

impl AuditSummary {
    pub fn from_results(results: Vec<AuditResult>) -> Self {
        let passed = results.iter().filter(|r| r.passed()).count();
        let failed = results.len() - passed;
        Self {
            results,
            passed,
            failed,
        }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &AuditResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    /// 0 when every URL passed, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.failed == 0 { 0 } else { 1 }
    }
}

/// Execute an audit with the given options
pub async fn execute_audit(
    options: AuditOptions,
    progress_callback: Option<AuditProgressCallback>,
) -> Result<AuditSummary, String> {
    let AuditOptions {
        urls,
        concurrency,
        delay,
        timeout_secs,
        policy,
        show_progress_bar,
    } = options;

    if urls.is_empty() {
        return Err("No URLs to audit".to_string());
    }

    let progress_bar = if show_progress_bar {
        let pb = ProgressBar::new(urls.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| format!("Invalid progress template: {}", e))?
                .progress_chars("=>-"),
        );
        Some(Arc::new(pb))
    } else {
        None
    };

    let failed_so_far = Arc::new(AtomicUsize::new(0));
    let pb_clone = progress_bar.clone();
    let failed_clone = failed_so_far.clone();
    let internal_callback: siteaudit_scanner::ProgressCallback =
        Arc::new(move |_idx: usize, result: &AuditResult| {
            if !result.passed() {
                failed_clone.fetch_add(1, Ordering::Relaxed);
            }
            if let Some(ref pb) = pb_clone {
                pb.set_message(format!(
                    "{} ({} failed)",
                    result.path,
                    failed_clone.load(Ordering::Relaxed)
                ));
                pb.inc(1);
            }
            if let Some(ref callback) = progress_callback {
                callback(result);
            }
        });

    let auditor = Auditor::with_timeout(timeout_secs)
        .map_err(|e| format!("Failed to create HTTP client: {}", e))?
        .with_policy(policy)
        .with_delay(delay)
        .with_concurrency(concurrency)
        .with_progress_callback(internal_callback);

    let results = auditor
        .audit_all(&urls)
        .await
        .map_err(|e| format!("Audit aborted: {}", e))?;

    if let Some(ref pb) = progress_bar {
        pb.finish_and_clear();
    }

    let summary = AuditSummary::from_results(results);
    info!(
        "Passed {}/{}, failed {}/{}",
        summary.passed,
        summary.total(),
        summary.failed,
        summary.total()
    );
    Ok(summary)
}
