//! releases.moe release lookup
//!
//! Queries the entries collection for every resolved title at once and
//! pairs each torrent on the target tracker with its title.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::client::HttpFetcher;
use crate::error::{ReleasesMoeError, Result};
use crate::types::{ReleaseRecord, TitleRecord, TorrentDescriptor};
use crate::url::build_releases_url;

#[derive(Debug, Deserialize)]
struct EntriesResponse {
    items: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(rename = "alID")]
    al_id: i64,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    expand: Option<Expand>,
}

#[derive(Debug, Default, Deserialize)]
struct Expand {
    #[serde(default)]
    trs: Vec<Torrent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Torrent {
    url: String,
    is_best: bool,
    release_group: String,
    tracker: String,
    #[serde(default)]
    info_hash: String,
}

impl From<Torrent> for TorrentDescriptor {
    fn from(torrent: Torrent) -> Self {
        TorrentDescriptor {
            url: torrent.url,
            release_group: torrent.release_group,
            is_best: torrent.is_best,
            tracker: torrent.tracker,
            info_hash: torrent.info_hash,
        }
    }
}

/// Parses an entries API response into releases on `tracker`
///
/// # Arguments
/// * `body` - Raw JSON body
/// * `titles` - Titles the request was built from
/// * `tracker` - Only torrents on this tracker are kept
///
/// # Errors
/// - `Json` if the body is not an entries response
/// - `UnknownTitle` if an entry refers to a title outside `titles`
pub fn parse_release_response<'a>(
    body: &str,
    titles: &'a [TitleRecord],
    tracker: &str,
) -> Result<Vec<ReleaseRecord<'a>>> {
    let response: EntriesResponse = serde_json::from_str(body)?;
    let lookup: HashMap<i64, &'a TitleRecord> = titles.iter().map(|t| (t.id, t)).collect();

    let mut releases = Vec::new();

    for entry in response.items {
        let torrents = entry.expand.unwrap_or_default().trs;

        for torrent in torrents {
            if torrent.tracker != tracker {
                continue;
            }

            let title = lookup
                .get(&entry.al_id)
                .copied()
                .ok_or(ReleasesMoeError::UnknownTitle(entry.al_id))?;

            releases.push(ReleaseRecord {
                title,
                torrent: torrent.into(),
                notes: entry.notes.clone(),
            });
        }
    }

    Ok(releases)
}

/// Looks up releases for the resolved titles
///
/// Issues a single request whose filter matches every title id. An empty
/// title set returns no releases without touching the network.
///
/// # Arguments
/// * `fetcher` - HTTP fetcher
/// * `endpoint` - Entries collection endpoint
/// * `titles` - Titles from the resolver
/// * `tracker` - Tracker name to keep (e.g., "Nyaa")
/// * `per_page` - Maximum number of entries
///
/// # Errors
/// - `Json` if the response cannot be parsed (including an empty body)
/// - `UnknownTitle` if the API returns an entry outside the filter
pub async fn lookup_releases<'a>(
    fetcher: &HttpFetcher,
    endpoint: &str,
    titles: &'a [TitleRecord],
    tracker: &str,
    per_page: u32,
) -> Result<Vec<ReleaseRecord<'a>>> {
    if titles.is_empty() {
        debug!("no titles resolved, skipping release lookup");
        return Ok(Vec::new());
    }

    let url = build_releases_url(endpoint, titles, per_page);
    let body = fetcher.get(&url).await;

    let releases = parse_release_response(&body, titles, tracker)?;
    debug!(tracker, count = releases.len(), "looked up releases");
    Ok(releases)
}
