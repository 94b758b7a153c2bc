//! Rewriting of extracted content regions
//!
//! A content region is serialized once by the HTML parser and then edited as
//! markup with `lol_html`. Only the attributes that are touched get re-written;
//! everything else, namespaced attributes included, passes through verbatim.

mod sanitize;

pub use sanitize::{sanitize, sanitize_style};

use thiserror::Error;

/// Failure while rewriting fragment markup
#[derive(Debug, Error)]
pub enum FragmentError {
    #[error("HTML rewrite error: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),
}

/// Decodes the character references the HTML serializer emits in attribute values
pub(crate) fn unescape_attr(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
