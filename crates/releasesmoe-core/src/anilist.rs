//! AniList title resolver
//!
//! Sends one GraphQL search and maps the returned media into [`TitleRecord`]s.

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::HttpFetcher;
use crate::error::Result;
use crate::types::TitleRecord;

const SEARCH_QUERY: &str = r#"query (
  $search: String
  $sort: [MediaSort]
  $page: Int
  $perPage: Int
) {
  Page(page: $page, perPage: $perPage) {
    pageInfo {
      total
    }
    media(
      type: ANIME
      search: $search
      sort: $sort
      format_not: MUSIC
      status_not_in: [NOT_YET_RELEASED, CANCELLED]
    ) {
      id
      title {
        romaji
        english
      }
      coverImage {
        extraLarge
      }
      format
      seasonYear
      status
      episodes
    }
  }
}"#;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: SearchData,
}

#[derive(Debug, Deserialize)]
struct SearchData {
    #[serde(rename = "Page")]
    page: Page,
}

#[derive(Debug, Deserialize)]
struct Page {
    media: Vec<Media>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Media {
    id: i64,
    title: MediaTitle,
    cover_image: Option<CoverImage>,
    format: Option<String>,
    season_year: Option<i32>,
    status: Option<String>,
    episodes: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct MediaTitle {
    romaji: String,
    english: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoverImage {
    extra_large: Option<String>,
}

impl From<Media> for TitleRecord {
    fn from(media: Media) -> Self {
        let name = media
            .title
            .english
            .filter(|english| !english.is_empty())
            .unwrap_or(media.title.romaji);

        TitleRecord {
            id: media.id,
            name,
            cover: media
                .cover_image
                .and_then(|c| c.extra_large)
                .unwrap_or_default(),
            format: title_case(media.format.as_deref().unwrap_or_default()),
            year: media.season_year,
            status: title_case(media.status.as_deref().unwrap_or_default()),
            episodes: media.episodes,
        }
    }
}

/// Builds the GraphQL request body for a title search
pub fn build_search_body(query: &str, per_page: u32) -> serde_json::Value {
    json!({
        "query": SEARCH_QUERY,
        "variables": {
            "page": 1,
            "perPage": per_page,
            "search": query,
            "sort": "START_DATE_DESC",
        },
    })
}

/// Parses an AniList search response into title records
///
/// # Errors
/// Returns `Json` if the body is empty or does not carry `data.Page.media`
pub fn parse_search_response(body: &str, per_page: u32) -> Result<Vec<TitleRecord>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .data
        .page
        .media
        .into_iter()
        .take(per_page as usize)
        .map(TitleRecord::from)
        .collect())
}

/// Resolves anime titles matching `query`
///
/// # Arguments
/// * `fetcher` - HTTP fetcher
/// * `endpoint` - AniList GraphQL endpoint
/// * `query` - Free-text search
/// * `per_page` - Maximum number of titles
///
/// # Returns
/// Titles in AniList order, newest start date first
///
/// # Errors
/// Returns `Json` if the response cannot be parsed, including when the
/// request failed and the body came back empty
pub async fn resolve_titles(
    fetcher: &HttpFetcher,
    endpoint: &str,
    query: &str,
    per_page: u32,
) -> Result<Vec<TitleRecord>> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );

    let body = serde_json::to_vec(&build_search_body(query, per_page))?;
    let response = fetcher.fetch(endpoint, headers, Some(body)).await;

    let titles = parse_search_response(&response, per_page)?;
    debug!(query, count = titles.len(), "resolved titles");
    Ok(titles)
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest
///
/// `"TV_SHORT"` becomes `"Tv_Short"`, `"NOT_YET_RELEASED"` becomes `"Not_Yet_Released"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if in_word {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        in_word = c.is_alphabetic();
    }

    out
}
