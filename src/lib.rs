//! Site-Binder: bind a website into a single document
//!
//! This crate crawls a bounded set of pages on one website, extracts a designated
//! content region from each page, rewrites embedded resource references to absolute
//! form, strips percentage-based sizing, and concatenates the results into a single
//! HTML document ready for rendering.

pub mod config;
pub mod crawler;
pub mod fragment;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Binder operations
#[derive(Debug, Error)]
pub enum BinderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl error: {0}")]
    Crawl(#[from] CrawlError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// All of these are raised before any network activity takes place.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("No traversal mode selected: set exactly one of index-id or next-page-class")]
    MissingTraversalMode,

    #[error("Conflicting traversal modes: index-id and next-page-class are mutually exclusive")]
    ConflictingTraversalModes,
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Cannot resolve '{reference}' against {base}: {message}")]
    Resolve {
        base: String,
        reference: String,
        message: String,
    },

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Run-level crawl failures
///
/// Per-page failures never surface here; they are logged and skipped.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Start URL {url} is unreachable: {source}")]
    StartUnreachable {
        url: String,
        source: crawler::FetchError,
    },

    #[error("No element with id '{id}' found on {url}")]
    IndexContainerNotFound { id: String, url: String },

    #[error("Crawl from {url} produced no content")]
    NoContent { url: String },
}

/// Result type alias for Site-Binder operations
pub type Result<T> = std::result::Result<T, BinderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{ContentFragment, CrawlReport, Crawler, ExtractionResult, TraversalStrategy};
pub use output::assemble;
pub use crate::url::{canonicalize, is_same_host, is_valid_link, resolve};
