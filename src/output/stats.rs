//! End-of-run crawl report
//!
//! Formats the statistics gathered during a crawl for display on stdout.

use crate::crawler::CrawlReport;

/// Formats a crawl report as plain text
///
/// # Arguments
///
/// * `report` - The finished crawl's report
pub fn format_report(report: &CrawlReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();

    out.push_str("=== Crawl Statistics ===\n\n");

    out.push_str("Overview:\n");
    out.push_str(&format!("  Start URL: {}\n", report.start_url));
    out.push_str(&format!(
        "  Duration: {:.2}s\n",
        report.duration().num_milliseconds() as f64 / 1000.0
    ));
    out.push_str(&format!("  Pages visited: {}\n", stats.pages_visited));
    out.push_str(&format!(
        "  Fragments extracted: {}\n",
        stats.fragments_extracted
    ));
    out.push('\n');

    let skipped = stats.content_not_found + stats.fetch_failures;
    if skipped > 0 {
        out.push_str("Skipped Pages:\n");
        out.push_str(&format!("  No content region: {}\n", stats.content_not_found));
        out.push_str(&format!("  Fetch failures: {}\n", stats.fetch_failures));
        out.push('\n');
    }

    out.push_str("Links Not Followed:\n");
    out.push_str(&format!("  Invalid: {}\n", stats.links_invalid));
    out.push_str(&format!("  External: {}\n", stats.links_external));
    out.push_str(&format!("  Already visited: {}\n", stats.links_duplicate));
    out.push('\n');

    let success_rate = if stats.pages_visited > 0 {
        (stats.fragments_extracted as f64 / stats.pages_visited as f64) * 100.0
    } else {
        0.0
    };

    out.push_str(&format!(
        "Success Rate: {:.1}% ({} / {} pages contributed content)\n",
        success_rate, stats.fragments_extracted, stats.pages_visited
    ));

    out
}

/// Prints a crawl report to stdout
pub fn print_report(report: &CrawlReport) {
    print!("{}", format_report(report));
}
