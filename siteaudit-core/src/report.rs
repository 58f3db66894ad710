// Report generation from audit results

use crate::audit::AuditSummary;
use colored::Colorize;
use siteaudit_scanner::result::AuditResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

const HEADERS: [&str; 8] = ["#", "URL", "Status", "Canonical", "Hreflang", "Lang", "H1", "Issues"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "table" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

/// Full results table, then failures only (if any), then the pass/fail summary.
pub fn generate_text_report(summary: &AuditSummary, color: bool) -> String {
    let mut report = String::new();

    let all: Vec<(usize, &AuditResult)> = summary.results.iter().enumerate().collect();
    push_section(&mut report, "SEO AUDIT RESULTS");
    report.push_str(&render_table(&all, color));
    report.push('\n');

    if summary.failed > 0 {
        let failures: Vec<(usize, &AuditResult)> = all
            .iter()
            .filter(|(_, r)| !r.passed())
            .copied()
            .collect();
        push_section(&mut report, &format!("FAILURES ({})", summary.failed));
        report.push_str(&render_table(&failures, color));
        report.push('\n');
    }

    report.push_str(RULE);
    report.push('\n');

    let passed = format!("Passed: {}/{}", summary.passed, summary.total());
    let failed = format!("Failed: {}/{}", summary.failed, summary.total());
    if color {
        report.push_str(&format!("{}\n{}\n", passed.green().bold(), failed.red().bold()));
    } else {
        report.push_str(&format!("{}\n{}\n", passed, failed));
    }

    report
}

fn push_section(report: &mut String, title: &str) {
    report.push_str(RULE);
    report.push('\n');
    report.push_str(title);
    report.push('\n');
    report.push_str(RULE);
    report.push_str("\n\n");
}

fn row_cells(idx: usize, result: &AuditResult) -> [String; 8] {
    let mark = |present: bool| (if present { "✓" } else { "✗" }).to_string();
    let status = if result.passed() { "✓ PASS" } else { "✗ FAIL" };

    let (canonical, hreflang, lang, h1) = match result.signals {
        Some(ref s) => (
            mark(s.has_canonical()),
            s.hreflang_count.to_string(),
            s.lang.clone().unwrap_or_default(),
            mark(s.has_h1()),
        ),
        None => ("-".into(), "-".into(), "-".into(), "-".into()),
    };

    [
        idx.to_string(),
        result.path.clone(),
        status.to_string(),
        canonical,
        hreflang,
        lang,
        h1,
        result.issues_summary(),
    ]
}

fn render_table(rows: &[(usize, &AuditResult)], color: bool) -> String {
    let cells: Vec<[String; 8]> = rows.iter().map(|(idx, r)| row_cells(*idx, r)).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let pad = |text: &str, width: usize| {
        let fill = width.saturating_sub(text.chars().count());
        format!("{}{}", text, " ".repeat(fill))
    };

    let mut table = String::new();

    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths.iter())
        .map(|(h, w)| pad(*h, *w))
        .collect();
    let header = header.join(" │ ");
    if color {
        table.push_str(&header.bold().to_string());
    } else {
        table.push_str(&header);
    }
    table.push('\n');

    let separator: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    table.push_str(&separator.join("─┼─"));
    table.push('\n');

    for ((_, result), row) in rows.iter().zip(cells.iter()) {
        let line: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(col, (cell, width))| {
                let padded = pad(cell.as_str(), *width);
                // Status column only; colour codes go on after padding.
                if color && col == 2 {
                    if result.passed() {
                        padded.green().to_string()
                    } else {
                        padded.red().to_string()
                    }
                } else {
                    padded
                }
            })
            .collect();
        table.push_str(line.join(" │ ").trim_end());
        table.push('\n');
    }

    if rows.is_empty() {
        table.push_str("  (none)\n");
    }

    table
}

pub fn generate_json_report(summary: &AuditSummary) -> Result<String, serde_json::Error> {
    let results: Vec<serde_json::Value> = summary
        .results
        .iter()
        .map(|r| {
            let signals = r.signals.as_ref();
            serde_json::json!({
                "url": r.url,
                "path": r.path,
                "passed": r.passed(),
                "status_code": r.status_code,
                "canonical": signals.map(|s| s.has_canonical()),
                "canonical_href": signals.and_then(|s| s.canonical.clone()),
                "hreflang_count": signals.map(|s| s.hreflang_count),
                "lang": signals.and_then(|s| s.lang.clone()),
                "h1": signals.map(|s| s.has_h1()),
                "title_length": signals.map(|s| s.title_len()),
                "description_length": signals.map(|s| s.description_len()),
                "issues": r.issues,
                "response_time_ms": r.response_time.as_millis() as u64,
            })
        })
        .collect();

    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "siteaudit",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "summary": {
                "total": summary.total(),
                "passed": summary.passed,
                "failed": summary.failed,
                "exit_code": summary.exit_code()
            },
            "results": results
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
