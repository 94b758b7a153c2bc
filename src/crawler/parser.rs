//! Parsed pages and the queries the crawler runs against them
//!
//! This module wraps a parsed HTML document together with the URL it was fetched
//! from, and answers the lookups traversal and extraction need:
//! - The content region (first element carrying a class)
//! - The index container (element by id) and the links inside it
//! - The "next page" anchor (first anchor carrying a class)

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A fetched page, parsed into a document tree
pub struct Page {
    url: Url,
    document: Html,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page").field("url", &self.url).finish()
    }
}

impl Page {
    /// Parses an already decoded response body fetched from `url`
    ///
    /// # Example
    ///
    /// ```
    /// use site_binder::crawler::Page;
    /// use url::Url;
    ///
    /// let url = Url::parse("https://example.com/").unwrap();
    /// let page = Page::parse(url, r#"<html><head><title>Test</title></head><body></body></html>"#);
    /// assert_eq!(page.title(), Some("Test".to_string()));
    /// ```
    pub fn parse(url: Url, body: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(body),
        }
    }

    /// The URL this page was fetched from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Extracts the page title from the `<title>` tag
    pub fn title(&self) -> Option<String> {
        let title_selector = Selector::parse("title").ok()?;

        self.document
            .select(&title_selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// First element, in document order, whose class list contains `class`
    pub fn find_by_class(&self, class: &str) -> Option<ElementRef<'_>> {
        let selector = attribute_selector("", "class", "~=", class)?;
        self.document.select(&selector).next()
    }

    /// Element whose id is exactly `id`
    pub fn find_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        let selector = attribute_selector("", "id", "=", id)?;
        self.document.select(&selector).next()
    }

    /// `href` of the first anchor whose class list contains `class`
    ///
    /// An anchor without an `href` is reported the same way as no anchor at all.
    pub fn next_link_href(&self, class: &str) -> Option<&str> {
        let selector = attribute_selector("a", "class", "~=", class)?;
        self.document
            .select(&selector)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
    }
}

/// `href` values of every anchor inside `container`, in document order
pub fn anchor_hrefs(container: ElementRef<'_>) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    container
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Builds `tag[attr<op>"value"]`, quoting the value so any class or id is accepted
fn attribute_selector(tag: &str, attr: &str, op: &str, value: &str) -> Option<Selector> {
    let quoted = value.replace('\\', "\\\\").replace('"', "\\\"");
    let css = format!("{}[{}{}\"{}\"]", tag, attr, op, quoted);
    let selector = match Selector::parse(&css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::warn!("Cannot build selector {}: {:?}", css, e);
            None
        }
    };
    selector
}
