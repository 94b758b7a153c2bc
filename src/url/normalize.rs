use crate::{UrlError, UrlResult};
use url::Url;

/// Schemes that never lead to a fetchable page
const NON_NAVIGABLE_SCHEMES: &[&str] = &["mailto:", "javascript:", "tel:", "data:"];

/// Resolves a (possibly relative) reference against a base URL
///
/// Dot segments are removed and the host is lower-cased as part of the join,
/// so `/a/../b` and `/b` resolve to the same URL.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_binder::url::resolve;
///
/// let base = Url::parse("https://example.com/docs/intro.html").unwrap();
/// let url = resolve(&base, "../img/logo.png").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/img/logo.png");
/// ```
pub fn resolve(base: &Url, reference: &str) -> UrlResult<Url> {
    base.join(reference.trim()).map_err(|e| UrlError::Resolve {
        base: base.to_string(),
        reference: reference.to_string(),
        message: e.to_string(),
    })
}

/// Produces the canonical form of a page URL
///
/// The canonical form is what gets fetched and what the visited-set stores.
/// Only the fragment is removed; it never changes which document the server returns.
pub fn canonicalize(url: &Url) -> Url {
    let mut canonical = url.clone();
    canonical.set_fragment(None);
    canonical
}

/// Parses an absolute start URL, accepting only HTTP(S)
pub fn parse_start_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(canonicalize(&url))
}

/// Returns true if `url` has the same scheme, host and port as `base`
///
/// Path, query and fragment are ignored. Default ports are taken into account,
/// so `https://example.com` and `https://example.com:443` are the same host.
pub fn is_same_host(url: &Url, base: &Url) -> bool {
    url.origin() == base.origin() && url.origin().is_tuple()
}

/// Checks if a raw link reference is worth following
///
/// Rejects empty references, same-page anchors (`#...`) and schemes that
/// cannot be navigated to (`mailto:`, `javascript:`, `tel:`, `data:`).
pub fn is_valid_link(reference: &str) -> bool {
    let reference = reference.trim();

    if reference.is_empty() || reference.starts_with('#') {
        return false;
    }

    let lower = reference.to_ascii_lowercase();
    !NON_NAVIGABLE_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}
