//! releases.moe Search Core Library
//!
//! Finds the best anime releases for a query and scrapes their tracker pages.
//!
//! # Overview
//!
//! One search runs as a fixed pipeline:
//! - AniList resolves the query into up to 30 anime titles
//! - releases.moe lists the torrents picked for those titles
//! - every torrent on Nyaa has its detail page scraped for magnet link,
//!   size, seeders, leechers and publish date
//! - each scraped row goes straight to a [`ResultSink`]
//!
//! # Example
//!
//! ```no_run
//! use releasesmoe_core::{Category, PipePrinter, ReleasesMoeScraper, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let scraper = ReleasesMoeScraper::new()?;
//!     let mut printer = PipePrinter::new(std::io::stdout());
//!
//!     let count = scraper.search("frieren", Category::All, &mut printer).await?;
//!     eprintln!("{count} results");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Failure model
//!
//! Network failures never abort a search by themselves: the fetcher logs them
//! and hands back an empty body. An empty body from AniList or releases.moe
//! then fails to parse and ends the search with [`ReleasesMoeError::Json`];
//! an empty detail page just yields no row for that torrent.

pub mod anilist;
mod client;
pub mod config;
pub mod emitter;
mod error;
pub mod parser;
pub mod releases;
pub mod render;
mod scraper;
mod types;
pub mod url;

// Re-export client types
pub use client::{ClientConfig, HttpFetcher, decode_body};

// Re-export configuration
pub use config::{NamePolicy, SearchConfig};

// Re-export sinks
pub use emitter::{JsonLinesPrinter, PipePrinter, ResultSink};

// Re-export error types
pub use error::{ReleasesMoeError, Result};

// Re-export parser functions
pub use parser::scrape_detail_page;

// Re-export main scraper API
pub use scraper::ReleasesMoeScraper;

// Re-export data types
pub use types::{Category, ReleaseRecord, ResultRow, TitleRecord, TorrentDescriptor};
