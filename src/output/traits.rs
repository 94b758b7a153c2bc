//! Renderer trait and output error types

use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render document: {0}")]
    Render(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Turns an assembled HTML document into the final output file
///
/// Renderers run once, after traversal has completed.
pub trait Renderer {
    /// Writes `document` to `output` in the renderer's target format
    ///
    /// # Arguments
    ///
    /// * `document` - The assembled HTML document
    /// * `output` - Path of the file to produce
    fn render(&self, document: &str, output: &Path) -> OutputResult<()>;

    /// Short name used in log messages
    fn name(&self) -> &str;
}
