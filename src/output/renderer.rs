//! Renderer implementations
//!
//! The assembled document is either written verbatim as HTML or handed to an
//! external converter (for example `wkhtmltopdf`) through a temporary file.

use crate::config::OutputConfig;
use crate::output::traits::{OutputError, OutputResult, Renderer};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// Placeholder replaced by the temporary HTML input path
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Placeholder replaced by the requested output path
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Writes the document to the output path as-is
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFileRenderer;

impl Renderer for HtmlFileRenderer {
    fn render(&self, document: &str, output: &Path) -> OutputResult<()> {
        let mut file = File::create(output)?;
        file.write_all(document.as_bytes())?;
        tracing::info!("Wrote {} bytes of HTML to {}", document.len(), output.display());
        Ok(())
    }

    fn name(&self) -> &str {
        "html"
    }
}

/// Runs an external converter over a temporary copy of the document
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    argv: Vec<String>,
}

impl CommandRenderer {
    /// Creates a renderer from a program and its arguments
    ///
    /// `{input}` and `{output}` anywhere in an argument are substituted when
    /// the command runs.
    pub fn new(argv: Vec<String>) -> OutputResult<Self> {
        if argv.first().map_or(true, |program| program.trim().is_empty()) {
            return Err(OutputError::Render(
                "render command must name a program".to_string(),
            ));
        }
        Ok(Self { argv })
    }

    /// Arguments with placeholders replaced
    fn expand_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.argv[1..]
            .iter()
            .map(|arg| {
                arg.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect()
    }
}

impl Renderer for CommandRenderer {
    fn render(&self, document: &str, output: &Path) -> OutputResult<()> {
        let mut input = tempfile::Builder::new()
            .prefix("site-binder-")
            .suffix(".html")
            .tempfile()?;
        input.write_all(document.as_bytes())?;
        input.flush()?;

        let program = &self.argv[0];
        let args = self.expand_args(input.path(), output);
        tracing::debug!("Running {} {:?}", program, args);

        let status = Command::new(program).args(&args).status().map_err(|e| {
            OutputError::Render(format!("failed to run '{}': {}", program, e))
        })?;

        if let Err(e) = input.close() {
            tracing::warn!("Failed to remove temporary input file: {}", e);
        }

        if !status.success() {
            return Err(OutputError::Render(format!(
                "'{}' exited with {}",
                program, status
            )));
        }

        tracing::info!("Rendered {} with {}", output.display(), program);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.argv[0]
    }
}

/// Picks the renderer configured for this run
pub fn renderer_for(config: &OutputConfig) -> OutputResult<Box<dyn Renderer>> {
    match &config.render_command {
        Some(argv) => Ok(Box::new(CommandRenderer::new(argv.clone())?)),
        None => Ok(Box::new(HtmlFileRenderer)),
    }
}
