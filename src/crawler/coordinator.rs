//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl driver that coordinates:
//! - Fetching and extracting the start page
//! - Owning the visited-set for the run
//! - Handing control to the selected traversal strategy
//! - Collecting fragments in visitation order
//! - Turning per-page failures into log events and statistics

use crate::config::Config;
use crate::crawler::extractor::{extract_content, ContentFragment, ExtractionResult, PageExtractor};
use crate::crawler::fetcher::{HttpTransport, Transport};
use crate::crawler::parser::Page;
use crate::crawler::strategy::TraversalStrategy;
use crate::url::{canonicalize, classify_link, parse_start_url, LinkClass};
use crate::{BinderError, CrawlError};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// A page scheduled for extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Canonical absolute URL of the page
    pub url: Url,
    /// The page the link was found on, `None` for the start page
    pub discovered_from: Option<Url>,
}

impl CrawlTarget {
    pub fn new(url: Url, discovered_from: Option<Url>) -> Self {
        Self {
            url,
            discovered_from,
        }
    }
}

/// Canonical URLs already processed or queued during one run
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<Url>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL as visited, returning false if it already was
    pub fn mark(&mut self, url: &Url) -> bool {
        self.urls.insert(canonicalize(url))
    }
}

/// Counters for one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages for which a fetch was attempted
    pub pages_visited: usize,
    pub fragments_extracted: usize,
    /// Pages fetched without a content region
    pub content_not_found: usize,
    pub fetch_failures: usize,
    /// Links rejected as anchors, non-navigable schemes or unresolvable
    pub links_invalid: usize,
    /// Links pointing at another host
    pub links_external: usize,
    /// Links to pages already visited or queued
    pub links_duplicate: usize,
}

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub start_url: Url,
    /// Fragments in visitation order
    pub fragments: Vec<ContentFragment>,
    pub stats: CrawlStats,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    pub fn into_fragments(self) -> Vec<ContentFragment> {
        self.fragments
    }
}

/// State of a single run, lent to the traversal strategy
///
/// The strategy decides what to visit; the session enforces the visited-once
/// rule, performs the extraction and keeps fragments in order.
pub struct CrawlSession<'a> {
    extractor: &'a PageExtractor,
    content_class: &'a str,
    base: Url,
    max_concurrent_fetches: usize,
    visited: VisitedSet,
    fragments: Vec<ContentFragment>,
    stats: CrawlStats,
}

impl<'a> CrawlSession<'a> {
    fn new(
        extractor: &'a PageExtractor,
        content_class: &'a str,
        base: Url,
        max_concurrent_fetches: usize,
    ) -> Self {
        Self {
            extractor,
            content_class,
            base,
            max_concurrent_fetches: max_concurrent_fetches.max(1),
            visited: VisitedSet::new(),
            fragments: Vec::new(),
            stats: CrawlStats::default(),
        }
    }

    /// Resolves a link found on `page`, returning it only if it may be followed
    pub fn follow(&mut self, page: &Url, reference: &str) -> Option<Url> {
        match classify_link(&self.base, page, reference) {
            LinkClass::SameHost(url) => {
                tracing::debug!("Found link to {} in {}", url, page);
                Some(url)
            }
            LinkClass::External(url) => {
                tracing::debug!("Skipping external link {}", url);
                self.stats.links_external += 1;
                None
            }
            LinkClass::Invalid => {
                tracing::debug!("Ignoring invalid link {:?}", reference);
                self.stats.links_invalid += 1;
                None
            }
        }
    }

    /// Marks a URL visited; false means it was already visited or queued
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        let fresh = self.visited.mark(url);
        if !fresh {
            tracing::debug!("Already visited {}", url);
            self.stats.links_duplicate += 1;
        }
        fresh
    }

    /// Fetches and extracts one marked target, returning the parsed page on success
    ///
    /// A fetch failure is recorded and yields `None`; a missing content region is
    /// recorded but still yields the page.
    pub async fn visit(&mut self, target: &CrawlTarget) -> Option<Page> {
        self.stats.pages_visited += 1;
        match self.extractor.fetch_page(&target.url).await {
            Ok(page) => {
                let result = extract_content(&page, self.content_class);
                self.record(target, result);
                Some(page)
            }
            Err(e) => {
                self.record(target, ExtractionResult::FetchFailed(e));
                None
            }
        }
    }

    /// Fetches and extracts already marked targets, keeping them in the given order
    ///
    /// Up to `max_concurrent_fetches` requests are in flight at once; results are
    /// appended in target order, not completion order.
    pub async fn extract_all(&mut self, targets: Vec<CrawlTarget>) {
        let extractor = self.extractor;
        let content_class = self.content_class;

        let results: Vec<(CrawlTarget, ExtractionResult)> = stream::iter(targets)
            .map(|target| async move {
                let result = extractor.extract(&target.url, content_class).await;
                (target, result)
            })
            .buffered(self.max_concurrent_fetches)
            .collect()
            .await;

        for (target, result) in results {
            self.stats.pages_visited += 1;
            self.record(&target, result);
        }
    }

    /// Turns an extraction outcome into a fragment or a log event
    pub fn record(&mut self, target: &CrawlTarget, result: ExtractionResult) {
        match result {
            ExtractionResult::Success(fragment) => {
                tracing::debug!("Added content from {}", target.url);
                self.stats.fragments_extracted += 1;
                self.fragments.push(fragment);
            }
            ExtractionResult::NotFound(reason) => {
                match &target.discovered_from {
                    Some(parent) => {
                        tracing::warn!("{} at {} (linked from {})", reason, target.url, parent)
                    }
                    None => tracing::warn!("{} at start URL {}", reason, target.url),
                }
                self.stats.content_not_found += 1;
            }
            ExtractionResult::FetchFailed(e) => {
                tracing::error!("Failed to fetch {}: {}", target.url, e);
                self.stats.fetch_failures += 1;
            }
        }
    }
}

/// Crawl orchestrator
///
/// A `Crawler` holds no per-run state; every call to [`Crawler::run`] starts
/// with an empty visited-set, so the same crawler can be run repeatedly.
#[derive(Clone)]
pub struct Crawler {
    extractor: PageExtractor,
    max_concurrent_fetches: usize,
}

impl Crawler {
    /// Creates a sequential crawler fetching through `transport`
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            extractor: PageExtractor::new(transport),
            max_concurrent_fetches: 1,
        }
    }

    /// Builds a crawler with an HTTP transport configured from `config`
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let transport = HttpTransport::new(&config.user_agent, &config.crawler)?;
        Ok(Self::new(Arc::new(transport)).with_concurrency(config.crawler.max_concurrent_fetches))
    }

    /// Allows up to `limit` concurrent fetches where the strategy permits it
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = limit.max(1);
        self
    }

    /// Runs a complete crawl
    ///
    /// The start page is always fetched first. If it cannot be fetched the run
    /// fails with [`CrawlError::StartUnreachable`]; if it has no content region a
    /// warning is logged and the crawl continues. The strategy then discovers and
    /// extracts further pages. A run that collects no fragments at all fails with
    /// [`CrawlError::NoContent`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use site_binder::config::{CrawlerConfig, UserAgentConfig};
    /// use site_binder::crawler::{Crawler, HttpTransport, TraversalStrategy};
    /// use std::sync::Arc;
    /// use url::Url;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let transport = HttpTransport::new(&UserAgentConfig::default(), &CrawlerConfig::default())?;
    /// let crawler = Crawler::new(Arc::new(transport));
    /// let strategy = TraversalStrategy::IndexEnumeration { container_id: "toc".to_string() };
    ///
    /// let report = crawler
    ///     .run(&Url::parse("https://docs.example.com/")?, "content", &strategy)
    ///     .await?;
    /// println!("{} fragments", report.fragments.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(
        &self,
        start_url: &Url,
        content_class: &str,
        strategy: &TraversalStrategy,
    ) -> Result<CrawlReport, CrawlError> {
        let started_at = Utc::now();
        let start_url = canonicalize(start_url);
        let mut session = CrawlSession::new(
            &self.extractor,
            content_class,
            start_url.clone(),
            self.max_concurrent_fetches,
        );

        tracing::info!("Starting processing from {}", start_url);
        session.mark_visited(&start_url);
        session.stats.pages_visited += 1;

        let start_page = match self.extractor.fetch_page(&start_url).await {
            Ok(page) => page,
            Err(source) => {
                tracing::error!("Failed to fetch start URL {}: {}", start_url, source);
                return Err(CrawlError::StartUnreachable {
                    url: start_url.to_string(),
                    source,
                });
            }
        };

        let start_result = extract_content(&start_page, content_class);
        session.record(&CrawlTarget::new(start_url.clone(), None), start_result);

        strategy.discover_and_extract(&mut session, &start_page).await?;

        if session.fragments.is_empty() {
            return Err(CrawlError::NoContent {
                url: start_url.to_string(),
            });
        }

        tracing::info!(
            "Crawl finished: {} fragments from {} pages",
            session.fragments.len(),
            session.stats.pages_visited
        );

        Ok(CrawlReport {
            start_url,
            fragments: session.fragments,
            stats: session.stats,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

/// Runs the crawl described by a validated configuration
///
/// # Example
///
/// ```no_run
/// use site_binder::config::load_config;
/// use site_binder::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("binder.toml"))?;
/// let report = run_crawl(&config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlReport, BinderError> {
    let start_url = parse_start_url(&config.site.start_url)?;
    let strategy = TraversalStrategy::from_config(&config.site)?;
    let crawler = Crawler::from_config(config)?;

    Ok(crawler
        .run(&start_url, &config.site.content_class, &strategy)
        .await?)
}
