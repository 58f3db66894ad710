use anyhow::Context;
use clap::ArgMatches;
use colored::Colorize;
use siteaudit_core::audit::{AuditOptions, AuditSummary, execute_audit};
use siteaudit_core::catalog::{
    DEFAULT_BASE_URL, SiteCatalog, collect_urls, normalize_base_url, read_url_list,
    write_url_list,
};
use siteaudit_core::report::{
    ReportFormat, generate_json_report, generate_text_report, save_report,
};
use siteaudit_scanner::CheckPolicy;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{Level, debug};

/// Install the stderr log subscriber. stdout is reserved for the report.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Expand a leading `~` in a user-supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

fn required<'a, T: Clone + Send + Sync + 'static>(
    args: &'a ArgMatches,
    id: &str,
) -> Result<&'a T, String> {
    args.get_one::<T>(id)
        .ok_or_else(|| format!("Missing value for --{}", id))
}

/// A blank base URL (for example an empty `BASE_URL`) means the default origin.
pub fn base_url_or_default(raw: &str) -> &str {
    if raw.trim().is_empty() {
        DEFAULT_BASE_URL
    } else {
        raw
    }
}

/// Settings for the `collect` step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectSettings {
    pub base_url: String,
    pub output: PathBuf,
}

impl CollectSettings {
    pub fn from_matches(args: &ArgMatches, output_id: &str) -> Result<Self, String> {
        let base_url = base_url_or_default(required::<String>(args, "base-url")?);
        let base_url = normalize_base_url(base_url).map_err(|e| format!("{:#}", e))?;
        let output = expand_path(required::<String>(args, output_id)?);
        Ok(Self { base_url, output })
    }
}

/// Settings for the `audit` step
#[derive(Debug, Clone)]
pub struct AuditSettings {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub format: ReportFormat,
    pub concurrency: usize,
    pub delay: Duration,
    pub timeout_secs: u64,
    pub langs: Vec<String>,
    pub color: bool,
    pub quiet: bool,
}

impl AuditSettings {
    pub fn from_matches(args: &ArgMatches, input_id: &str) -> Result<Self, String> {
        let input = expand_path(required::<String>(args, input_id)?);
        let output = args.get_one::<String>("output").map(|p| expand_path(p));

        let format_name = required::<String>(args, "format")?;
        let format = ReportFormat::from_str(format_name)
            .ok_or_else(|| format!("Unknown report format '{}'", format_name))?;

        let langs: Vec<String> = args
            .get_many::<String>("lang")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        if langs.is_empty() {
            return Err("At least one --lang must be accepted".to_string());
        }

        let quiet = args.get_flag("quiet");
        let color = !args.get_flag("no-color") && output.is_none() && std::io::stdout().is_terminal();

        Ok(Self {
            input,
            output,
            format,
            concurrency: *required::<usize>(args, "concurrency")?,
            delay: Duration::from_millis(*required::<u64>(args, "delay-ms")?),
            timeout_secs: *required::<u64>(args, "timeout")?,
            langs,
            color,
            quiet,
        })
    }

    pub fn audit_options(&self, urls: Vec<String>) -> AuditOptions {
        let policy = CheckPolicy {
            accepted_langs: self.langs.clone(),
            ..CheckPolicy::default()
        };

        AuditOptions {
            urls,
            concurrency: self.concurrency,
            delay: self.delay,
            timeout_secs: self.timeout_secs,
            policy,
            show_progress_bar: !self.quiet && std::io::stderr().is_terminal(),
        }
    }
}

/// Generate the catalog URLs for `base_url` and write them to `output`.
pub fn collect_to_file(base_url: &str, output: &Path) -> anyhow::Result<Vec<String>> {
    let catalog = SiteCatalog::default();
    let urls = collect_urls(base_url, &catalog);
    debug!("Expected {} URLs, generated {}", catalog.expected_len(), urls.len());
    write_url_list(output, &urls)
        .with_context(|| format!("Cannot persist URL list for {}", base_url))?;
    Ok(urls)
}

pub fn render_report(summary: &AuditSummary, settings: &AuditSettings) -> Result<String, String> {
    match settings.format {
        ReportFormat::Text => Ok(generate_text_report(summary, settings.color)),
        ReportFormat::Json => {
            generate_json_report(summary).map_err(|e| format!("Failed to encode report: {}", e))
        }
    }
}

fn fail(message: impl std::fmt::Display) -> i32 {
    eprintln!("{} {}", "✗".red().bold(), message);
    1
}

pub fn handle_collect(args: &ArgMatches) -> i32 {
    let settings = match CollectSettings::from_matches(args, "output") {
        Ok(settings) => settings,
        Err(e) => return fail(e),
    };

    run_collect(&settings, args.get_flag("quiet"))
}

fn run_collect(settings: &CollectSettings, quiet: bool) -> i32 {
    match collect_to_file(&settings.base_url, &settings.output) {
        Ok(urls) => {
            if !quiet {
                eprintln!(
                    "{} Collected {} URLs ({} pages x 2 locales) -> {}",
                    "✓".green().bold(),
                    urls.len(),
                    urls.len() / 2,
                    settings.output.display().to_string().bright_white()
                );
            }
            0
        }
        Err(e) => fail(format!("{:#}", e)),
    }
}

pub async fn handle_audit(args: &ArgMatches) -> i32 {
    let settings = match AuditSettings::from_matches(args, "input") {
        Ok(settings) => settings,
        Err(e) => return fail(e),
    };

    run_audit(&settings).await
}

async fn run_audit(settings: &AuditSettings) -> i32 {
    let urls = match read_url_list(&settings.input) {
        Ok(urls) => urls,
        Err(e) => return fail(format!("{:#}", e)),
    };

    if !settings.quiet {
        eprintln!(
            "{} Auditing {} URLs from {}",
            "→".blue(),
            urls.len(),
            settings.input.display().to_string().bright_white()
        );
    }

    let summary = match execute_audit(settings.audit_options(urls), None).await {
        Ok(summary) => summary,
        Err(e) => return fail(format!("Audit failed: {}", e)),
    };

    let report = match render_report(&summary, settings) {
        Ok(report) => report,
        Err(e) => return fail(e),
    };

    match settings.output {
        Some(ref path) => {
            if let Err(e) = save_report(&report, path) {
                return fail(format!("Failed to save report to {}: {}", path.display(), e));
            }
            println!("Passed: {}/{}", summary.passed, summary.total());
            println!("Failed: {}/{}", summary.failed, summary.total());
            if !settings.quiet {
                eprintln!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", report),
    }

    summary.exit_code()
}

pub async fn handle_run(args: &ArgMatches) -> i32 {
    let collect = match CollectSettings::from_matches(args, "url-list") {
        Ok(settings) => settings,
        Err(e) => return fail(e),
    };
    let audit = match AuditSettings::from_matches(args, "url-list") {
        Ok(settings) => settings,
        Err(e) => return fail(e),
    };

    let code = run_collect(&collect, audit.quiet);
    if code != 0 {
        return code;
    }

    run_audit(&audit).await
}
