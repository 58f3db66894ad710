//! Minimal query capability over a parsed HTML page.
//!
//! The check battery only ever needs "first match", "all matches" and
//! attribute/text access, so it is written against [`HtmlQuery`] rather than
//! a concrete parser. [`HtmlDocument`] is the `scraper`-backed implementation.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::warn;

/// An owned snapshot of a matched element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageElement {
    attributes: HashMap<String, String>,
    text: String,
}

impl PageElement {
    pub fn new(attributes: HashMap<String, String>, text: impl Into<String>) -> Self {
        Self {
            attributes,
            text: text.into(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> &str {
        &self.text
    }
}

pub trait HtmlQuery {
    fn select_first(&self, selector: &str) -> Option<PageElement>;
    fn select_all(&self, selector: &str) -> Vec<PageElement>;
}

pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    fn compile(selector: &str) -> Option<Selector> {
        match Selector::parse(selector) {
            Ok(sel) => Some(sel),
            Err(e) => {
                warn!("Ignoring invalid selector {:?}: {}", selector, e);
                None
            }
        }
    }

    fn snapshot(element: ElementRef<'_>) -> PageElement {
        let attributes = element
            .value()
            .attrs()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        PageElement::new(attributes, element.text().collect::<String>())
    }
}

impl HtmlQuery for HtmlDocument {
    fn select_first(&self, selector: &str) -> Option<PageElement> {
        let sel = Self::compile(selector)?;
        self.html.select(&sel).next().map(Self::snapshot)
    }

    fn select_all(&self, selector: &str) -> Vec<PageElement> {
        match Self::compile(selector) {
            Some(sel) => self.html.select(&sel).map(Self::snapshot).collect(),
            None => Vec::new(),
        }
    }
}
