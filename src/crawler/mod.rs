//! Crawler module for page discovery and extraction
//!
//! This module contains the traversal-and-extraction engine, including:
//! - HTTP fetching behind the [`Transport`] seam
//! - HTML parsing and the page lookups traversal needs
//! - Content extraction (isolate, rewrite, sanitize)
//! - The two traversal strategies
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod parser;
mod strategy;

pub use coordinator::{
    run_crawl, CrawlReport, CrawlSession, CrawlStats, CrawlTarget, Crawler, VisitedSet,
};
pub use extractor::{
    extract_content, rewrite_resources, ContentFragment, ExtractionResult, PageExtractor,
};
pub use fetcher::{
    build_http_client, decode_body, user_agent_string, FetchError, HttpTransport, Transport,
};
pub use parser::{anchor_hrefs, Page};
pub use strategy::TraversalStrategy;
