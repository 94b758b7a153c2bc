//! URL handling module for Site-Binder
//!
//! This module resolves link references against page URLs, produces the canonical
//! form used by the visited-set, and classifies links as same-host, external or invalid.

mod normalize;

use ::url::Url;

// Re-export main functions
pub use normalize::{canonicalize, is_same_host, is_valid_link, parse_start_url, resolve};

/// Classification of a raw link reference found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClass {
    /// Same scheme, host and port as the crawl base; carries the canonical URL
    SameHost(Url),
    /// Resolvable, but points at another host
    External(Url),
    /// Empty, same-page anchor, non-navigable scheme or unresolvable
    Invalid,
}

impl LinkClass {
    /// Returns true if the link may be visited
    pub fn should_follow(&self) -> bool {
        matches!(self, Self::SameHost(_))
    }
}

/// Classifies a link reference found on `page` relative to the crawl `base`
///
/// The reference is resolved against the page it appears on, while the host
/// boundary is always checked against the crawl base.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_binder::url::{classify_link, LinkClass};
///
/// let base = Url::parse("https://example.com/").unwrap();
/// let page = Url::parse("https://example.com/docs/").unwrap();
///
/// match classify_link(&base, &page, "intro.html") {
///     LinkClass::SameHost(url) => assert_eq!(url.as_str(), "https://example.com/docs/intro.html"),
///     other => panic!("unexpected {:?}", other),
/// }
/// assert_eq!(classify_link(&base, &page, "#top"), LinkClass::Invalid);
/// ```
pub fn classify_link(base: &Url, page: &Url, reference: &str) -> LinkClass {
    if !is_valid_link(reference) {
        return LinkClass::Invalid;
    }

    let resolved = match resolve(page, reference) {
        Ok(url) => canonicalize(&url),
        Err(e) => {
            tracing::debug!("{}", e);
            return LinkClass::Invalid;
        }
    };

    if is_same_host(&resolved, base) {
        LinkClass::SameHost(resolved)
    } else {
        LinkClass::External(resolved)
    }
}
