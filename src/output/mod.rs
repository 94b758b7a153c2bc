//! Output module for producing the bound document
//!
//! This module handles:
//! - Assembling extracted fragments into one HTML document
//! - Rendering that document to the output file
//! - Printing the end-of-run crawl report

mod document;
mod renderer;
pub mod stats;
mod traits;

pub use document::{assemble, assemble_with_title, DEFAULT_TITLE};
pub use renderer::{
    renderer_for, CommandRenderer, HtmlFileRenderer, INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER,
};
pub use stats::{format_report, print_report};
pub use traits::{OutputError, OutputResult, Renderer};

use crate::config::OutputConfig;
use crate::crawler::CrawlReport;
use std::path::Path;

/// Assembles a finished crawl and renders it as configured
///
/// # Arguments
///
/// * `report` - The crawl whose fragments are bound
/// * `config` - Output settings (filename, title, converter)
///
/// # Returns
///
/// * `Ok(())` - The output file was written
/// * `Err(OutputError)` - Writing or converting the document failed
pub fn write_document(report: &CrawlReport, config: &OutputConfig) -> OutputResult<()> {
    tracing::info!(
        "Combining {} fragments into a single HTML document",
        report.fragments.len()
    );
    let document = assemble_with_title(&report.fragments, &config.title);

    let renderer = renderer_for(config)?;
    tracing::info!(
        "Rendering {} with the {} renderer",
        config.filename,
        renderer.name()
    );
    renderer.render(&document, Path::new(&config.filename))
}
