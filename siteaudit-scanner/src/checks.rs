use crate::document::HtmlQuery;
use serde::{Serialize, Serializer};
use std::fmt;

pub const CANONICAL_SELECTOR: &str = r#"link[rel="canonical"]"#;
pub const HREFLANG_SELECTOR: &str = r#"link[rel="alternate"][hreflang]"#;
pub const DESCRIPTION_SELECTOR: &str = r#"meta[name="description"]"#;

/// Longest transport error message kept on a failed result.
pub const TRANSPORT_MESSAGE_LIMIT: usize = 50;

/// A single failed check. `Display` renders the report text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    Status(u16),
    NoCanonical,
    CanonicalNotAbsolute,
    Hreflang { found: usize, required: usize },
    Lang(String),
    NoH1,
    TitleTooShort,
    DescriptionTooShort,
    Transport(String),
}

impl Issue {
    pub fn transport(message: &str) -> Self {
        Issue::Transport(message.chars().take(TRANSPORT_MESSAGE_LIMIT).collect())
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::Status(code) => write!(f, "Status {}", code),
            Issue::NoCanonical => f.write_str("No canonical"),
            Issue::CanonicalNotAbsolute => f.write_str("Canonical not absolute"),
            Issue::Hreflang { found, required } => {
                write!(f, "Hreflang: {} (need {})", found, required)
            }
            Issue::Lang(value) => write!(f, "Lang: \"{}\"", value),
            Issue::NoH1 => f.write_str("No H1"),
            Issue::TitleTooShort => f.write_str("Title too short"),
            Issue::DescriptionTooShort => f.write_str("Description too short"),
            Issue::Transport(message) => f.write_str(message),
        }
    }
}

impl Serialize for Issue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Thresholds the check battery enforces.
#[derive(Debug, Clone)]
pub struct CheckPolicy {
    pub expected_status: u16,
    pub required_hreflang: usize,
    pub accepted_langs: Vec<String>,
    pub min_title_chars: usize,
    pub min_description_chars: usize,
}

impl Default for CheckPolicy {
    fn default() -> Self {
        Self {
            expected_status: 200,
            required_hreflang: 2,
            accepted_langs: vec!["uk".to_string(), "ru".to_string()],
            min_title_chars: 20,
            min_description_chars: 50,
        }
    }
}

/// The raw on-page values the checks look at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageSignals {
    pub canonical: Option<String>,
    pub hreflang_count: usize,
    pub lang: Option<String>,
    pub h1: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl PageSignals {
    pub fn extract<Q: HtmlQuery + ?Sized>(doc: &Q) -> Self {
        let attr = |selector: &str, name: &str| {
            doc.select_first(selector)
                .and_then(|el| el.attribute(name).map(str::to_string))
        };

        Self {
            canonical: attr(CANONICAL_SELECTOR, "href"),
            hreflang_count: doc.select_all(HREFLANG_SELECTOR).len(),
            lang: attr("html", "lang"),
            h1: doc.select_first("h1").map(|el| el.text().to_string()),
            title: doc.select_first("title").map(|el| el.text().to_string()),
            description: attr(DESCRIPTION_SELECTOR, "content"),
        }
    }

    pub fn has_canonical(&self) -> bool {
        self.canonical.as_deref().is_some_and(|href| !href.is_empty())
    }

    pub fn has_h1(&self) -> bool {
        trimmed_len(&self.h1) > 0
    }

    pub fn title_len(&self) -> usize {
        trimmed_len(&self.title)
    }

    pub fn description_len(&self) -> usize {
        trimmed_len(&self.description)
    }
}

fn trimmed_len(value: &Option<String>) -> usize {
    value.as_deref().map_or(0, |s| s.trim().chars().count())
}

/// Evaluate every check. Failures accumulate; nothing short-circuits.
pub fn run_checks(status: u16, signals: &PageSignals, policy: &CheckPolicy) -> Vec<Issue> {
    let mut issues = Vec::new();

    if status != policy.expected_status {
        issues.push(Issue::Status(status));
    }

    // An absent canonical is reported once, not also as "not absolute".
    match signals.canonical.as_deref() {
        Some(href) if !href.is_empty() => {
            if !href.starts_with("http") {
                issues.push(Issue::CanonicalNotAbsolute);
            }
        }
        _ => issues.push(Issue::NoCanonical),
    }

    if signals.hreflang_count != policy.required_hreflang {
        issues.push(Issue::Hreflang {
            found: signals.hreflang_count,
            required: policy.required_hreflang,
        });
    }

    let lang = signals.lang.as_deref().unwrap_or("");
    if !policy.accepted_langs.iter().any(|accepted| accepted == lang) {
        issues.push(Issue::Lang(lang.to_string()));
    }

    if !signals.has_h1() {
        issues.push(Issue::NoH1);
    }

    if signals.title_len() < policy.min_title_chars {
        issues.push(Issue::TitleTooShort);
    }

    if signals.description_len() < policy.min_description_chars {
        issues.push(Issue::DescriptionTooShort);
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlDocument;

    const GOOD_TITLE: &str = "Англійська мова для дорослих";
    const GOOD_DESCRIPTION: &str =
        "Курси англійської мови в Києві для дорослих і дітей, онлайн і офлайн.";

    /// Builds a page where each flag breaks exactly one check.
    #[derive(Default, Clone, Copy)]
    struct Broken {
        status: bool,
        canonical: bool,
        hreflang: bool,
        lang: bool,
        h1: bool,
        title: bool,
        description: bool,
    }

    impl Broken {
        fn from_mask(mask: u8) -> Self {
            Self {
                status: mask & 1 != 0,
                canonical: mask & 2 != 0,
                hreflang: mask & 4 != 0,
                lang: mask & 8 != 0,
                h1: mask & 16 != 0,
                title: mask & 32 != 0,
                description: mask & 64 != 0,
            }
        }

        fn status(&self) -> u16 {
            if self.status { 404 } else { 200 }
        }

        fn html(&self) -> String {
            let lang = if self.lang { "en" } else { "uk" };
            let title = if self.title { "Курси" } else { GOOD_TITLE };
            let canonical = if self.canonical {
                ""
            } else {
                r#"<link rel="canonical" href="https://speakup.example/programs/group">"#
            };
            let hreflang = if self.hreflang {
                r#"<link rel="alternate" hreflang="uk" href="https://speakup.example/programs/group">"#
            } else {
                r#"<link rel="alternate" hreflang="uk" href="https://speakup.example/programs/group">
                   <link rel="alternate" hreflang="ru" href="https://speakup.example/ru/programs/group">"#
            };
            let description = if self.description { "" } else { GOOD_DESCRIPTION };
            let h1 = if self.h1 { "" } else { "<h1>Групові заняття</h1>" };

            format!(
                r#"<!DOCTYPE html><html lang="{lang}"><head>
                    <title>{title}</title>
                    {canonical}
                    {hreflang}
                    <meta name="description" content="{description}">
                </head><body>{h1}<p>Текст</p></body></html>"#
            )
        }

        fn count(&self) -> usize {
            [
                self.status,
                self.canonical,
                self.hreflang,
                self.lang,
                self.h1,
                self.title,
                self.description,
            ]
            .iter()
            .filter(|b| **b)
            .count()
        }
    }

    fn audit(broken: Broken) -> Vec<Issue> {
        let doc = HtmlDocument::parse(&broken.html());
        let signals = PageSignals::extract(&doc);
        run_checks(broken.status(), &signals, &CheckPolicy::default())
    }

    #[test]
    fn test_valid_page_has_no_issues() {
        assert!(audit(Broken::default()).is_empty());
    }

    #[test]
    fn test_missing_h1_is_the_only_issue() {
        let issues = audit(Broken {
            h1: true,
            ..Default::default()
        });
        assert_eq!(issues, vec![Issue::NoH1]);
    }

    #[test]
    fn test_missing_canonical_and_empty_description_yield_two_issues() {
        let issues = audit(Broken {
            canonical: true,
            description: true,
            ..Default::default()
        });
        assert_eq!(issues, vec![Issue::NoCanonical, Issue::DescriptionTooShort]);
    }

    #[test]
    fn test_every_check_combination_is_independent() {
        for mask in 0u8..128 {
            let broken = Broken::from_mask(mask);
            let issues = audit(broken);
            assert_eq!(
                issues.len(),
                broken.count(),
                "mask {:07b} produced {:?}",
                mask,
                issues
            );
        }
    }

    #[test]
    fn test_all_checks_failing() {
        let issues = audit(Broken::from_mask(127));
        let rendered: Vec<String> = issues.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "Status 404",
                "No canonical",
                "Hreflang: 1 (need 2)",
                "Lang: \"en\"",
                "No H1",
                "Title too short",
                "Description too short",
            ]
        );
    }

    #[test]
    fn test_relative_canonical_only_flags_not_absolute() {
        let signals = PageSignals {
            canonical: Some("/programs/group".to_string()),
            ..sample_signals()
        };
        let issues = run_checks(200, &signals, &CheckPolicy::default());
        assert_eq!(issues, vec![Issue::CanonicalNotAbsolute]);
    }

    #[test]
    fn test_empty_canonical_href_counts_as_missing() {
        let signals = PageSignals {
            canonical: Some(String::new()),
            ..sample_signals()
        };
        let issues = run_checks(200, &signals, &CheckPolicy::default());
        assert_eq!(issues, vec![Issue::NoCanonical]);
    }

    #[test]
    fn test_missing_lang_renders_empty_value() {
        let signals = PageSignals {
            lang: None,
            ..sample_signals()
        };
        let issues = run_checks(200, &signals, &CheckPolicy::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].to_string(), "Lang: \"\"");
    }

    #[test]
    fn test_ru_lang_is_accepted() {
        let signals = PageSignals {
            lang: Some("ru".to_string()),
            ..sample_signals()
        };
        assert!(run_checks(200, &signals, &CheckPolicy::default()).is_empty());
    }

    #[test]
    fn test_hreflang_overcount_is_reported() {
        let signals = PageSignals {
            hreflang_count: 3,
            ..sample_signals()
        };
        let issues = run_checks(200, &signals, &CheckPolicy::default());
        assert_eq!(
            issues,
            vec![Issue::Hreflang {
                found: 3,
                required: 2
            }]
        );
        assert_eq!(issues[0].to_string(), "Hreflang: 3 (need 2)");
    }

    #[test]
    fn test_hreflang_message_follows_policy() {
        let policy = CheckPolicy {
            required_hreflang: 3,
            ..CheckPolicy::default()
        };
        let issues = run_checks(200, &sample_signals(), &policy);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].to_string(), "Hreflang: 2 (need 3)");
    }

    #[test]
    fn test_title_length_boundary() {
        let at_limit = PageSignals {
            title: Some("t".repeat(20)),
            ..sample_signals()
        };
        assert!(run_checks(200, &at_limit, &CheckPolicy::default()).is_empty());

        let below = PageSignals {
            title: Some("t".repeat(19)),
            ..sample_signals()
        };
        assert_eq!(
            run_checks(200, &below, &CheckPolicy::default()),
            vec![Issue::TitleTooShort]
        );
    }

    #[test]
    fn test_description_length_boundary() {
        let at_limit = PageSignals {
            description: Some("d".repeat(50)),
            ..sample_signals()
        };
        assert!(run_checks(200, &at_limit, &CheckPolicy::default()).is_empty());

        let below = PageSignals {
            description: Some("d".repeat(49)),
            ..sample_signals()
        };
        assert_eq!(
            run_checks(200, &below, &CheckPolicy::default()),
            vec![Issue::DescriptionTooShort]
        );
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        // 20 Cyrillic letters are 40 bytes in UTF-8.
        let signals = PageSignals {
            title: Some("я".repeat(20)),
            ..sample_signals()
        };
        assert!(run_checks(200, &signals, &CheckPolicy::default()).is_empty());
    }

    #[test]
    fn test_whitespace_only_h1_is_missing() {
        let signals = PageSignals {
            h1: Some("  \n ".to_string()),
            ..sample_signals()
        };
        assert_eq!(
            run_checks(200, &signals, &CheckPolicy::default()),
            vec![Issue::NoH1]
        );
    }

    #[test]
    fn test_transport_message_is_truncated() {
        let long = "error sending request for url (http://localhost:8000/programs/group)";
        let issue = Issue::transport(long);
        assert_eq!(issue.to_string().chars().count(), TRANSPORT_MESSAGE_LIMIT);
        assert!(long.starts_with(&issue.to_string()));
    }

    #[test]
    fn test_issue_serializes_as_text() {
        let json = serde_json::to_string(&vec![Issue::Status(500), Issue::NoH1]).unwrap();
        assert_eq!(json, r#"["Status 500","No H1"]"#);
    }

    fn sample_signals() -> PageSignals {
        PageSignals {
            canonical: Some("https://speakup.example/".to_string()),
            hreflang_count: 2,
            lang: Some("uk".to_string()),
            h1: Some("Школа англійської".to_string()),
            title: Some(GOOD_TITLE.to_string()),
            description: Some(GOOD_DESCRIPTION.to_string()),
        }
    }
}
