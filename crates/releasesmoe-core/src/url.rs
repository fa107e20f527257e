//! URL helper functions for releases.moe
//!
//! Provides the filter expression and query string for the entries API.

use crate::types::TitleRecord;

/// Fields requested from the entries collection
pub const RELEASE_FIELDS: &str = "alID,notes,expand.trs.infoHash,expand.trs.isBest,\
expand.trs.releaseGroup,expand.trs.tracker,expand.trs.url";

/// Builds the filter matching any of the given AniList ids
///
/// # Example
/// ```
/// use releasesmoe_core::url::build_release_filter;
/// assert_eq!(build_release_filter([154587, 170068]), "alID=154587||alID=170068");
/// ```
pub fn build_release_filter(ids: impl IntoIterator<Item = i64>) -> String {
    ids.into_iter()
        .map(|id| format!("alID={id}"))
        .collect::<Vec<_>>()
        .join("||")
}

/// Builds the entries API URL for a set of resolved titles
///
/// # Arguments
/// * `endpoint` - Entries collection endpoint
/// * `titles` - Resolved titles; their ids form the filter
/// * `per_page` - Maximum number of entries
///
/// # Example
/// ```
/// use releasesmoe_core::url::build_releases_url;
/// let url = build_releases_url("https://releases.moe/api/collections/entries/records", &[], 30);
/// assert!(url.starts_with("https://releases.moe/api/collections/entries/records?expand=trs&filter="));
/// ```
pub fn build_releases_url(endpoint: &str, titles: &[TitleRecord], per_page: u32) -> String {
    let filter = build_release_filter(titles.iter().map(|t| t.id));
    format!(
        "{}?expand=trs&filter={}&fields={}&page=1&perPage={}",
        endpoint,
        urlencoding::encode(&filter),
        RELEASE_FIELDS,
        per_page
    )
}

/// Decodes a percent-encoded query as passed by search hosts
///
/// Falls back to the raw text when it is not valid percent-encoding.
///
/// # Example
/// ```
/// use releasesmoe_core::url::decode_query;
/// assert_eq!(decode_query("sousou%20no%20frieren"), "sousou no frieren");
/// ```
pub fn decode_query(query: &str) -> String {
    urlencoding::decode(query)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| query.to_string())
}
