use crate::checks::{CheckPolicy, PageSignals, run_checks};
use crate::document::HtmlDocument;
use crate::error::{Result, ScanError};
use crate::result::AuditResult;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

pub type ProgressCallback = Arc<dyn Fn(usize, &AuditResult) + Send + Sync>;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(50);

pub struct Auditor {
    client: Client,
    policy: Arc<CheckPolicy>,
    delay: Duration,
    concurrency: usize,
    progress_callback: Option<ProgressCallback>,
}

impl Auditor {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("siteaudit/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self {
            client,
            policy: Arc::new(CheckPolicy::default()),
            delay: DEFAULT_DELAY,
            concurrency: 1,
            progress_callback: None,
        })
    }

    pub fn with_policy(mut self, policy: CheckPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Pause observed after every URL, successful or not.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Values below 1 are treated as 1 (sequential).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Audit every URL. Results are returned in input order.
    pub async fn audit_all(&self, urls: &[String]) -> Result<Vec<AuditResult>> {
        info!(
            "Auditing {} URLs (concurrency {}, delay {:?})",
            urls.len(),
            self.concurrency,
            self.delay
        );

        let results = if self.concurrency == 1 {
            self.audit_sequential(urls).await
        } else {
            self.audit_pooled(urls).await?
        };

        let failed = results.iter().filter(|r| !r.passed()).count();
        info!(
            "Audit complete. {} passed, {} failed",
            results.len() - failed,
            failed
        );
        Ok(results)
    }

    pub async fn audit_url(&self, url: &str) -> AuditResult {
        Self::audit_url_static(&self.client, &self.policy, url).await
    }

    async fn audit_sequential(&self, urls: &[String]) -> Vec<AuditResult> {
        let mut results = Vec::with_capacity(urls.len());

        for (idx, url) in urls.iter().enumerate() {
            let result = Self::audit_url_static(&self.client, &self.policy, url).await;
            if let Some(ref callback) = self.progress_callback {
                callback(idx, &result);
            }
            results.push(result);

            tokio::time::sleep(self.delay).await;
        }

        results
    }

    async fn audit_pooled(&self, urls: &[String]) -> Result<Vec<AuditResult>> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(urls.len());

        for (idx, url) in urls.iter().cloned().enumerate() {
            let client = self.client.clone();
            let policy = self.policy.clone();
            let semaphore = semaphore.clone();
            let progress_cb = self.progress_callback.clone();
            let delay = self.delay;

            handles.push(tokio::spawn(async move {
                // The permit is held through the delay so each slot stays rate limited.
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| ScanError::Other(format!("Worker pool closed: {}", e)))?;

                let result = Self::audit_url_static(&client, &policy, &url).await;
                if let Some(ref callback) = progress_cb {
                    callback(idx, &result);
                }

                tokio::time::sleep(delay).await;
                Ok::<_, ScanError>(result)
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for joined in futures::future::join_all(handles).await {
            results.push(joined??);
        }
        Ok(results)
    }

    /// Fetch, parse, check. Transport failures become failed results.
    async fn audit_url_static(client: &Client, policy: &CheckPolicy, url: &str) -> AuditResult {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let (status, body) = match Self::fetch(client, url).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                return AuditResult::transport_failure(url.to_string(), &e.to_string());
            }
        };
        let response_time = start.elapsed();

        let signals = Self::inspect(&body);
        let issues = run_checks(status, &signals, policy);
        if !issues.is_empty() {
            debug!("{} failed {} checks", url, issues.len());
        }

        AuditResult::new(url.to_string(), status, signals, issues).with_response_time(response_time)
    }

    async fn fetch(client: &Client, url: &str) -> std::result::Result<(u16, String), reqwest::Error> {
        let response = client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }

    fn inspect(body: &str) -> PageSignals {
        let document = HtmlDocument::parse(body);
        PageSignals::extract(&document)
    }
}
