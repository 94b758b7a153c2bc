//! Removal of percentage-based sizing
//!
//! Percentage widths and heights are relative to a browser viewport and overflow
//! or collapse once the document is paginated, so they are dropped rather than
//! translated.

use super::{unescape_attr, FragmentError};
use lol_html::html_content::Element;
use lol_html::{element, rewrite_str, RewriteStrSettings};

/// Strips percentage values from every element of a fragment
///
/// - `style` declarations whose value contains `%` are dropped; survivors are
///   re-joined with `"; "` and an empty `style` is removed.
/// - Any other attribute whose value contains `%` is removed entirely.
///
/// Applying this twice yields the same markup as applying it once.
///
/// # Examples
///
/// ```
/// use site_binder::fragment::sanitize;
///
/// let markup = sanitize(r#"<p style="width: 50%; color: red" width="80%">x</p>"#).unwrap();
/// assert_eq!(markup, r#"<p style="color: red">x</p>"#);
/// ```
pub fn sanitize(markup: &str) -> Result<String, FragmentError> {
    Ok(rewrite_str(
        markup,
        RewriteStrSettings {
            element_content_handlers: vec![element!("*", |el| {
                sanitize_element(el);
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )?)
}

fn sanitize_element(el: &mut Element<'_, '_>) {
    let mut doomed = Vec::new();
    let mut style = None;

    for attr in el.attributes() {
        let name = attr.name();
        let value = attr.value();
        if name == "style" {
            style = Some(value);
        } else if value.contains('%') {
            doomed.push(name);
        }
    }

    for name in &doomed {
        el.remove_attribute(name);
    }

    let Some(raw) = style else {
        return;
    };
    let original = unescape_attr(&raw);
    match sanitize_style(&original) {
        Some(kept) if kept == original => {}
        // Double quotes become single quotes so the value never needs escaping
        Some(kept) => {
            if let Err(e) = el.set_attribute("style", &kept.replace('"', "'")) {
                tracing::debug!("Cannot rewrite style attribute: {}", e);
            }
        }
        None => el.remove_attribute("style"),
    }
}

/// Filters an inline style, returning `None` when nothing survives
///
/// # Examples
///
/// ```
/// use site_binder::fragment::sanitize_style;
///
/// assert_eq!(sanitize_style("width: 50%; color: red"), Some("color: red".to_string()));
/// assert_eq!(sanitize_style("width: 50%"), None);
/// ```
pub fn sanitize_style(style: &str) -> Option<String> {
    let kept: Vec<&str> = style
        .split(';')
        .map(str::trim)
        .filter(|declaration| !declaration.is_empty())
        .filter(|declaration| !declaration_value(declaration).contains('%'))
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join("; "))
    }
}

fn declaration_value(declaration: &str) -> &str {
    declaration
        .split_once(':')
        .map(|(_, value)| value)
        .unwrap_or(declaration)
}
