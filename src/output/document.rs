//! Document assembly
//!
//! Wraps the collected fragments in a single HTML document with a fixed head
//! and stylesheet tuned for print conversion.

use crate::crawler::ContentFragment;

/// Title used when none is configured
pub const DEFAULT_TITLE: &str = "Combined Document";

const STYLESHEET: &str = "\
        body { font-family: Arial, sans-serif; margin: 20px; }
        h1, h2, h3, h4, h5, h6 { color: #2c3e50; }
        p { font-size: 14px; line-height: 1.6; }
        pre { background-color: #f5f5f5; padding: 10px; overflow-x: auto; }
        code { background-color: #f9f9f9; padding: 2px 4px; }
        table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
        th, td { border: 1px solid #ddd; padding: 8px; }
        th { background-color: #f2f2f2; }
        img { max-width: 100%; height: auto; }
";

/// Assembles fragments into one document titled [`DEFAULT_TITLE`]
///
/// Fragment markup is joined with newlines in the given order. An empty slice
/// still yields a well-formed document with an empty body.
pub fn assemble(fragments: &[ContentFragment]) -> String {
    assemble_with_title(fragments, DEFAULT_TITLE)
}

/// Assembles fragments into one document with the given `<title>`
pub fn assemble_with_title(fragments: &[ContentFragment], title: &str) -> String {
    let body = fragments
        .iter()
        .map(|fragment| fragment.markup.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let mut html = String::with_capacity(body.len() + STYLESHEET.len() + 256);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("    <meta charset=\"utf-8\">\n");
    html.push_str(&format!("    <title>{}</title>\n", escape_text(title)));
    html.push_str("    <style>\n");
    html.push_str(STYLESHEET);
    html.push_str("    </style>\n</head>\n<body>\n");
    html.push_str(&body);
    html.push_str("\n</body>\n</html>\n");
    html
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
