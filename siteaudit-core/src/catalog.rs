//! Static site catalog and the `url-list.txt` artifact.
//!
//! Every crawlable page exists in the default locale and under `/ru`. The
//! collector expands the slug catalogs into absolute URLs, always emitting the
//! default-locale URL immediately followed by its `/ru` twin.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_URL_LIST: &str = "url-list.txt";

pub const SECONDARY_LOCALE_PREFIX: &str = "/ru";

pub const TOP_LEVEL_PAGES: [&str; 4] = ["/", "/about", "/contacts", "/testing"];

pub const PROGRAMS: [&str; 17] = [
    "individual",
    "group",
    "online-english-course",
    "corporate",
    "intensive",
    "native-teachers",
    "business",
    "ielts",
    "toefl",
    "kids",
    "speaking-course",
    "tourism",
    "anglijska-dlya-medykiv",
    "anglijska-dlya-jurystiv",
    "anglijska-dlya-it",
    "english-for-beginners",
    "short-courses",
];

pub const LOCATIONS: [&str; 13] = [
    "sumskaya",
    "minskaya",
    "poznyaki",
    "levoberezhnaya",
    "universitet",
    "vokzalnaya",
    "jitomirskaya",
    "goloseevskaya",
    "chervonoi-kalini",
    "monomakha",
    "metallurgov",
    "chernovola",
    "ekaterininskaya",
];

pub const CITIES: [&str; 4] = ["harkov", "dnepr", "odessa", "lvov"];

/// Ordered slug catalogs the URL list is generated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteCatalog {
    pub programs: Vec<String>,
    pub locations: Vec<String>,
    pub cities: Vec<String>,
}

impl Default for SiteCatalog {
    fn default() -> Self {
        Self::new(&PROGRAMS, &LOCATIONS, &CITIES)
    }
}

impl SiteCatalog {
    pub fn new(programs: &[&str], locations: &[&str], cities: &[&str]) -> Self {
        let owned = |slugs: &[&str]| -> Vec<String> { slugs.iter().map(|s| s.to_string()).collect() };
        Self {
            programs: owned(programs),
            locations: owned(locations),
            cities: owned(cities),
        }
    }

    /// Number of URLs [`collect_urls`] produces for this catalog.
    pub fn expected_len(&self) -> usize {
        2 * (TOP_LEVEL_PAGES.len() + self.programs.len() + self.locations.len() + self.cities.len())
    }

    /// Site-relative paths in emission order, default locale only.
    pub fn paths(&self) -> Vec<String> {
        let top = TOP_LEVEL_PAGES.iter().map(|p| p.to_string());
        let programs = self.programs.iter().map(|slug| format!("/programs/{}", slug));
        let locations = self.locations.iter().map(|slug| format!("/school/{}", slug));
        let cities = self.cities.iter().map(|slug| format!("/{}", slug));

        top.chain(programs).chain(locations).chain(cities).collect()
    }
}

/// Check that `base_url` is an absolute http(s) URL and return it without a trailing slash.
pub fn normalize_base_url(base_url: &str) -> Result<String> {
    let parsed =
        Url::parse(base_url).with_context(|| format!("Invalid base URL '{}'", base_url))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("Base URL '{}' must use http or https", base_url);
    }

    Ok(base_url.trim_end_matches('/').to_string())
}

/// Expand the catalog into absolute URLs, each default-locale URL followed by its `/ru` twin.
pub fn collect_urls(base_url: &str, catalog: &SiteCatalog) -> Vec<String> {
    let base = base_url.trim_end_matches('/');

    let urls: Vec<String> = catalog
        .paths()
        .iter()
        .flat_map(|path| {
            [
                format!("{}{}", base, path),
                format!("{}{}{}", base, SECONDARY_LOCALE_PREFIX, path),
            ]
        })
        .collect();

    debug!("Collected {} URLs from {}", urls.len(), base);
    urls
}

/// Write the URL list as UTF-8, one URL per line, no trailing newline.
pub fn write_url_list(path: &Path, urls: &[String]) -> Result<()> {
    fs::write(path, urls.join("\n"))
        .with_context(|| format!("Failed to write URL list {}", path.display()))?;
    info!("Wrote {} URLs to {}", urls.len(), path.display());
    Ok(())
}

/// Read a URL list, skipping blank lines.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL list {}", path.display()))?;

    let urls: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if urls.is_empty() {
        bail!("No URLs found in {}", path.display());
    }

    Ok(urls)
}
