//! Main search API for releases.moe
//!
//! Provides the high-level API combining the fetcher, the two API lookups
//! and the detail page parser.

use tracing::{debug, info};

use crate::anilist::resolve_titles;
use crate::client::{ClientConfig, HttpFetcher};
use crate::config::SearchConfig;
use crate::emitter::ResultSink;
use crate::error::{ReleasesMoeError, Result};
use crate::parser::scrape_detail_page;
use crate::releases::lookup_releases;
use crate::types::{Category, ReleaseRecord, ResultRow, TitleRecord};
use crate::url::decode_query;

/// Main search API for releases.moe
///
/// Runs one search at a time, strictly in sequence: resolve titles,
/// look up releases, then fetch and scrape each detail page.
pub struct ReleasesMoeScraper {
    fetcher: HttpFetcher,
    config: SearchConfig,
}

impl ReleasesMoeScraper {
    /// Create a new scraper with default configuration
    ///
    /// # Errors
    /// Returns error if HTTP client initialization fails
    pub fn new() -> Result<Self> {
        Self::with_config(SearchConfig::default())
    }

    /// Create a new scraper with custom configuration
    ///
    /// # Errors
    /// - `Config` if the configuration is invalid
    /// - `HttpError` if HTTP client initialization fails
    pub fn with_config(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::with_config(ClientConfig {
            timeout_secs: config.timeout_secs,
            ..ClientConfig::default()
        })?;
        Ok(Self { fetcher, config })
    }

    /// Active configuration
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Resolves anime titles for a query
    ///
    /// # Errors
    /// Returns `Json` if the AniList response cannot be parsed
    pub async fn resolve_titles(&self, query: &str) -> Result<Vec<TitleRecord>> {
        resolve_titles(
            &self.fetcher,
            &self.config.anilist_endpoint,
            query,
            self.config.per_page,
        )
        .await
    }

    /// Looks up releases on the target tracker for resolved titles
    ///
    /// # Errors
    /// - `Json` if the releases.moe response cannot be parsed
    /// - `UnknownTitle` if an entry does not match any resolved title
    pub async fn lookup_releases<'a>(
        &self,
        titles: &'a [TitleRecord],
    ) -> Result<Vec<ReleaseRecord<'a>>> {
        lookup_releases(
            &self.fetcher,
            &self.config.releases_endpoint,
            titles,
            &self.config.target_tracker,
            self.config.per_page,
        )
        .await
    }

    /// Fetches and scrapes the detail page of one release
    ///
    /// # Returns
    /// The scraped row, or `None` if the page had no panel block
    /// (including when the fetch failed)
    pub async fn scrape(&self, release: &ReleaseRecord<'_>) -> Option<ResultRow> {
        let html = self.fetcher.get(&release.torrent.url).await;
        scrape_detail_page(
            &html,
            release,
            self.config.name_policy,
            &self.config.engine_url,
        )
    }

    /// Runs a full search and emits every scraped row
    ///
    /// # Arguments
    /// * `query` - Free-text query, possibly percent-encoded
    /// * `category` - Search category; all categories search the same way
    /// * `sink` - Receives each row as soon as it is scraped
    ///
    /// # Returns
    /// Number of rows emitted
    ///
    /// # Errors
    /// - `InvalidQuery` if the query is empty or whitespace only
    /// - `Json` / `UnknownTitle` if an API response is malformed
    /// - `Io` / `Json` if the sink fails
    ///
    /// # Example
    /// ```no_run
    /// # async fn example() -> releasesmoe_core::Result<()> {
    /// use releasesmoe_core::{Category, ReleasesMoeScraper, ResultRow};
    /// let scraper = ReleasesMoeScraper::new()?;
    /// let mut rows: Vec<ResultRow> = Vec::new();
    /// scraper.search("frieren", Category::All, &mut rows).await?;
    /// for row in rows {
    ///     println!("{:?}: {:?}", row.name, row.link);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(
        &self,
        query: &str,
        category: Category,
        sink: &mut dyn ResultSink,
    ) -> Result<usize> {
        let query = decode_query(query);
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(ReleasesMoeError::InvalidQuery(
                "Search query cannot be empty".to_string(),
            ));
        }

        info!(query = trimmed, %category, "searching releases.moe");

        let titles = self.resolve_titles(trimmed).await?;
        let releases = self.lookup_releases(&titles).await?;

        let mut emitted = 0;
        for release in &releases {
            match self.scrape(release).await {
                Some(row) => {
                    sink.emit(&row)?;
                    emitted += 1;
                }
                None => debug!(url = %release.torrent.url, "no panel block on detail page"),
            }
        }

        info!(
            titles = titles.len(),
            releases = releases.len(),
            emitted,
            "search finished"
        );
        Ok(emitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scraper_creation() {
        let scraper = ReleasesMoeScraper::new();
        assert!(scraper.is_ok());
    }

    #[test]
    fn test_scraper_with_custom_config() {
        let config = SearchConfig {
            per_page: 10,
            timeout_secs: 60,
            ..SearchConfig::default()
        };
        let scraper = ReleasesMoeScraper::with_config(config).unwrap();
        assert_eq!(scraper.config().per_page, 10);
    }

    #[test]
    fn test_scraper_rejects_invalid_config() {
        let config = SearchConfig {
            per_page: 0,
            ..SearchConfig::default()
        };
        assert!(matches!(
            ReleasesMoeScraper::with_config(config),
            Err(ReleasesMoeError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let scraper = ReleasesMoeScraper::new().unwrap();
        let mut rows: Vec<ResultRow> = Vec::new();
        let result = scraper.search("", Category::All, &mut rows).await;
        match result {
            Err(ReleasesMoeError::InvalidQuery(msg)) => assert!(msg.contains("empty")),
            _ => panic!("Expected InvalidQuery error"),
        }
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_search_whitespace_query() {
        let scraper = ReleasesMoeScraper::new().unwrap();
        let mut rows: Vec<ResultRow> = Vec::new();
        let result = scraper.search("%20%20", Category::Anime, &mut rows).await;
        assert!(matches!(result, Err(ReleasesMoeError::InvalidQuery(_))));
    }
}
