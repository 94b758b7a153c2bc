//! Traversal strategies
//!
//! Exactly one strategy is active per run:
//! - **Index enumeration**: every same-host anchor inside a container element on
//!   the start page, in document order. One level only; links on the target pages
//!   are never followed.
//! - **Next-link chain**: follow the anchor carrying a "next" class from page to
//!   page until it disappears, leaves the host, or points back at a visited page.

use crate::config::SiteConfig;
use crate::crawler::coordinator::{CrawlSession, CrawlTarget};
use crate::crawler::parser::{anchor_hrefs, Page};
use crate::{ConfigError, CrawlError};

/// How pages after the start page are discovered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraversalStrategy {
    /// Follow the links inside the element with this id on the start page
    IndexEnumeration { container_id: String },
    /// Follow the anchor with this class from each page to the next
    NextLinkChain { next_class: String },
}

impl TraversalStrategy {
    /// Selects the strategy from site configuration
    ///
    /// Exactly one of `index-id` and `next-page-class` must be set.
    pub fn from_config(site: &SiteConfig) -> Result<Self, ConfigError> {
        match (&site.index_id, &site.next_page_class) {
            (Some(container_id), None) => Ok(Self::IndexEnumeration {
                container_id: container_id.clone(),
            }),
            (None, Some(next_class)) => Ok(Self::NextLinkChain {
                next_class: next_class.clone(),
            }),
            (Some(_), Some(_)) => Err(ConfigError::ConflictingTraversalModes),
            (None, None) => Err(ConfigError::MissingTraversalMode),
        }
    }

    /// Discovers the pages after `start` and extracts them through the session
    ///
    /// `start` has already been marked visited and extracted.
    pub async fn discover_and_extract(
        &self,
        session: &mut CrawlSession<'_>,
        start: &Page,
    ) -> Result<(), CrawlError> {
        match self {
            Self::IndexEnumeration { container_id } => {
                enumerate_index(session, start, container_id).await
            }
            Self::NextLinkChain { next_class } => {
                follow_chain(session, start, next_class).await;
                Ok(())
            }
        }
    }
}

async fn enumerate_index(
    session: &mut CrawlSession<'_>,
    start: &Page,
    container_id: &str,
) -> Result<(), CrawlError> {
    let container = start
        .find_by_id(container_id)
        .ok_or_else(|| CrawlError::IndexContainerNotFound {
            id: container_id.to_string(),
            url: start.url().to_string(),
        })?;

    let hrefs = anchor_hrefs(container);
    tracing::debug!(
        "Found {} links in container '{}'",
        hrefs.len(),
        container_id
    );

    let mut targets = Vec::new();
    for href in &hrefs {
        let Some(url) = session.follow(start.url(), href) else {
            continue;
        };
        if session.mark_visited(&url) {
            targets.push(CrawlTarget::new(url, Some(start.url().clone())));
        }
    }

    session.extract_all(targets).await;
    Ok(())
}

async fn follow_chain(session: &mut CrawlSession<'_>, start: &Page, next_class: &str) {
    let mut current: Option<Page> = None;

    loop {
        let page = current.as_ref().unwrap_or(start);

        let Some(href) = page.next_link_href(next_class) else {
            tracing::debug!("No next link with class '{}' on {}", next_class, page.url());
            break;
        };

        let Some(next_url) = session.follow(page.url(), href) else {
            break;
        };

        if !session.mark_visited(&next_url) {
            tracing::info!("Next link {} was already visited, chain ends", next_url);
            break;
        }

        let target = CrawlTarget::new(next_url, Some(page.url().clone()));
        match session.visit(&target).await {
            Some(next_page) => current = Some(next_page),
            None => break,
        }
    }
}
