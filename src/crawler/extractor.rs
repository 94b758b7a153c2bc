//! Page extraction: fetch, isolate the content region, rewrite, sanitize
//!
//! Extraction never fails with an error. Every outcome, including transport
//! failures, is folded into an [`ExtractionResult`] so a single bad page cannot
//! abort a crawl.

use crate::crawler::fetcher::{FetchError, Transport};
use crate::crawler::parser::Page;
use crate::fragment::{sanitize, unescape_attr, FragmentError};
use crate::url::resolve;
use lol_html::html_content::Element;
use lol_html::{element, rewrite_str, RewriteStrSettings};
use std::sync::Arc;
use url::Url;

/// Resource elements below the region root, which itself is never rewritten
const RESOURCE_SELECTORS: &[&str] = &["* img", "* a", "* link", "* script"];

/// Attributes holding those references
const REFERENCE_ATTRIBUTES: &[&str] = &["src", "href"];

/// Sanitized, resource-rewritten markup of one page's content region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFragment {
    /// The page the fragment was taken from
    pub source_url: Url,
    /// Serialized markup of the isolated element
    pub markup: String,
}

/// Outcome of extracting one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Success(ContentFragment),
    /// The page was fetched but has no content region
    NotFound(String),
    /// The page could not be fetched
    FetchFailed(FetchError),
}

impl ExtractionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Fetches pages through a [`Transport`] and extracts their content region
#[derive(Clone)]
pub struct PageExtractor {
    transport: Arc<dyn Transport>,
}

impl PageExtractor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetches and parses a page without extracting anything from it
    pub async fn fetch_page(&self, url: &Url) -> Result<Page, FetchError> {
        tracing::info!("Processing {}", url);
        let body = self.transport.fetch(url).await?;
        Ok(Page::parse(url.clone(), &body))
    }

    /// Fetches `url` and extracts the first element carrying `content_class`
    pub async fn extract(&self, url: &Url, content_class: &str) -> ExtractionResult {
        match self.fetch_page(url).await {
            Ok(page) => extract_content(&page, content_class),
            Err(e) => ExtractionResult::FetchFailed(e),
        }
    }
}

/// Isolates, rewrites and sanitizes the content region of an already parsed page
///
/// Resource references are resolved against the page's own URL.
pub fn extract_content(page: &Page, content_class: &str) -> ExtractionResult {
    let Some(element) = page.find_by_class(content_class) else {
        return ExtractionResult::NotFound(format!("no element with class {}", content_class));
    };

    let markup = element.html();
    let cleaned = rewrite_resources(&markup, page.url()).and_then(|markup| sanitize(&markup));

    match cleaned {
        Ok(markup) => ExtractionResult::Success(ContentFragment {
            source_url: page.url().clone(),
            markup,
        }),
        Err(e) => {
            tracing::warn!("Cannot rewrite content of {}: {}", page.url(), e);
            ExtractionResult::NotFound(format!("unreadable content region: {}", e))
        }
    }
}

/// Rewrites `src`/`href` of resource elements below the region root to absolute URLs
///
/// References that cannot be resolved are left as they are. All other markup,
/// including attributes on other elements, is passed through unchanged.
pub fn rewrite_resources(markup: &str, page_url: &Url) -> Result<String, FragmentError> {
    let handlers = RESOURCE_SELECTORS
        .iter()
        .map(|selector| {
            element!(*selector, move |el| {
                rewrite_references(el, page_url);
                Ok(())
            })
        })
        .collect();

    Ok(rewrite_str(
        markup,
        RewriteStrSettings {
            element_content_handlers: handlers,
            ..RewriteStrSettings::default()
        },
    )?)
}

fn rewrite_references(el: &mut Element<'_, '_>, page_url: &Url) {
    for attr in REFERENCE_ATTRIBUTES {
        let Some(raw) = el.get_attribute(attr) else {
            continue;
        };
        let old_value = unescape_attr(&raw);

        match resolve(page_url, &old_value) {
            Ok(absolute) => {
                tracing::debug!(
                    "Updated {} from {} to {} in <{}>",
                    attr,
                    old_value,
                    absolute,
                    el.tag_name()
                );
                if let Err(e) = el.set_attribute(attr, absolute.as_str()) {
                    tracing::debug!("Cannot set {}: {}", attr, e);
                }
            }
            Err(e) => tracing::debug!("Leaving {} untouched: {}", attr, e),
        }
    }
}
