//! Core data types for the releases.moe search adapter
//!
//! Contains the records that flow through one search: resolved titles,
//! torrents paired with their title, and the emitted result rows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReleasesMoeError;

/// An anime title resolved from AniList
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRecord {
    /// AniList media id
    pub id: i64,

    /// English title, or romaji when no English title exists
    pub name: String,

    /// Extra-large cover image URL (empty when AniList has none)
    pub cover: String,

    /// Title-cased media format (e.g., "Tv", "Movie", "Ova")
    pub format: String,

    /// Season year, absent for some older entries
    pub year: Option<i32>,

    /// Title-cased airing status (e.g., "Releasing", "Finished")
    pub status: String,

    /// Episode count, absent while unknown
    pub episodes: Option<u32>,
}

/// A single torrent listed by releases.moe for an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorrentDescriptor {
    /// Tracker detail page URL
    pub url: String,

    /// Release group label (e.g., "SubsPlease")
    pub release_group: String,

    /// Whether releases.moe marks this as the best release
    pub is_best: bool,

    /// Tracker name (e.g., "Nyaa")
    pub tracker: String,

    /// Torrent info hash, empty when the aggregator hides it
    pub info_hash: String,
}

/// A torrent paired with the title it belongs to
///
/// The title is borrowed from the id lookup built out of the resolved titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRecord<'a> {
    pub title: &'a TitleRecord,
    pub torrent: TorrentDescriptor,
    /// Entry-level notes from releases.moe, may be empty
    pub notes: String,
}

impl ReleaseRecord<'_> {
    /// Short tag used in synthesized names
    pub fn best_tag(&self) -> &'static str {
        if self.torrent.is_best { "BEST" } else { "ALT" }
    }
}

/// One normalized search result
///
/// Only `engine_url` and `desc_link` are always present. Everything scraped
/// from the detail page is optional and skipped in serialized output when
/// the page did not carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub engine_url: String,

    pub desc_link: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Publish time in epoch seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seeds: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leech: Option<i64>,

    /// Human-readable size exactly as scraped (e.g., "1.4 GiB")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl ResultRow {
    /// Start a row for a detail page
    pub fn new(engine_url: impl Into<String>, desc_link: impl Into<String>) -> Self {
        Self {
            engine_url: engine_url.into(),
            desc_link: desc_link.into(),
            ..Default::default()
        }
    }
}

/// Search category accepted from the search host
///
/// Both categories behave identically; nothing is filtered by category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Anime,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Anime => "anime",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ReleasesMoeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Category::All),
            "anime" => Ok(Category::Anime),
            other => Err(ReleasesMoeError::InvalidQuery(format!(
                "unsupported category: {other}"
            ))),
        }
    }
}
