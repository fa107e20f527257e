//! Nyaa detail page parser
//!
//! The page is replayed in document order as start-tag and text events into
//! [`DetailPageScan`], a single-pass state machine that reads the first panel
//! block and stops at the second.
//!
//! Inside the panel body, fields are located by a (row, column) position:
//! the n-th `div.row` and, within it, the n-th `div.col-md-*`. Those
//! positions belong to the current Nyaa template and are fixed:
//!
//! | (row, col) | field   |
//! |------------|---------|
//! | (2, 4)     | seeders |
//! | (3, 4)     | leechers|
//! | (4, 2)     | size    |

use scraper::node::Element;
use scraper::{Html, Node};
use tracing::debug;

use crate::config::NamePolicy;
use crate::render::render_card;
use crate::types::{ReleaseRecord, ResultRow};

const PANEL_PREFIX: &str = "panel panel-";
const COLUMN_PREFIX: &str = "col-md";
const MAGNET_SCHEME: &str = "magnet:";

const SEEDS_AT: (u32, u32) = (2, 4);
const LEECH_AT: (u32, u32) = (3, 4);
const SIZE_AT: (u32, u32) = (4, 2);

/// Event-driven scan over one detail page
pub struct DetailPageScan<'r, 'a> {
    release: &'r ReleaseRecord<'a>,
    policy: NamePolicy,
    row: ResultRow,
    in_panel: bool,
    in_panel_body: bool,
    awaiting_title: bool,
    finished: bool,
    row_index: u32,
    col_index: u32,
}

impl<'r, 'a> DetailPageScan<'r, 'a> {
    pub fn new(release: &'r ReleaseRecord<'a>, policy: NamePolicy, engine_url: &str) -> Self {
        Self {
            release,
            policy,
            row: ResultRow::new(engine_url, release.torrent.url.as_str()),
            in_panel: false,
            in_panel_body: false,
            awaiting_title: false,
            finished: false,
            row_index: 0,
            col_index: 0,
        }
    }

    /// True once the second panel block has started
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Handles a start tag
    pub fn start_tag(&mut self, element: &Element) {
        if self.finished {
            return;
        }

        let class = element.attr("class").unwrap_or_default();

        if class.starts_with(PANEL_PREFIX) {
            if self.in_panel {
                self.finished = true;
                return;
            }
            self.in_panel = true;
        }

        if class == "card-footer-item"
            && let Some(href) = element.attr("href")
            && href.starts_with(MAGNET_SCHEME)
        {
            self.row.link = Some(href.to_string());
        }

        if self.in_panel {
            if class == "panel-title" {
                self.awaiting_title = true;
            }
            if let Some(timestamp) = element.attr("data-timestamp") {
                match timestamp.trim().parse::<i64>() {
                    Ok(ts) => self.row.pub_date = Some(ts),
                    Err(_) => debug!(timestamp, "ignoring non-numeric timestamp"),
                }
            }
            if class == "panel-body" {
                self.in_panel_body = true;
            }
        }

        if self.in_panel_body && element.name() == "div" {
            if class == "row" {
                self.row_index += 1;
                self.col_index = 0;
            }
            if class.starts_with(COLUMN_PREFIX) {
                self.col_index += 1;
            }
        }
    }

    /// Handles a text node
    pub fn text(&mut self, text: &str) {
        if self.finished {
            return;
        }

        if self.awaiting_title {
            self.row.name = Some(self.display_name(text));
            self.awaiting_title = false;
        }

        if self.in_panel_body {
            let text = text.trim();
            if text.is_empty() {
                return;
            }

            match (self.row_index, self.col_index) {
                SEEDS_AT => self.row.seeds = parse_count(text),
                LEECH_AT => self.row.leech = parse_count(text),
                SIZE_AT => self.row.size = Some(text.to_string()),
                _ => {}
            }
        }
    }

    /// Ends the scan
    ///
    /// # Returns
    /// The row if a panel block was seen, complete or not
    pub fn finish(self) -> Option<ResultRow> {
        if self.in_panel { Some(self.row) } else { None }
    }

    fn display_name(&self, scraped: &str) -> String {
        let release = self.release;
        match self.policy {
            NamePolicy::Html => render_card(release),
            NamePolicy::Synthesized => format!(
                "[{}] [{}] {}",
                release.best_tag(),
                release.torrent.release_group,
                release.title.name
            ),
            NamePolicy::Scraped => format!("[{}] {}", release.best_tag(), scraped.trim()),
        }
    }
}

fn parse_count(text: &str) -> Option<i64> {
    match text.parse::<i64>() {
        Ok(count) => Some(count),
        Err(_) => {
            debug!(text, "ignoring non-numeric peer count");
            None
        }
    }
}

/// Scrapes a Nyaa detail page for one release
///
/// # Arguments
/// * `html` - Raw HTML of the detail page
/// * `release` - Release the page belongs to (used for naming)
/// * `policy` - Display name policy
/// * `engine_url` - Engine URL stamped on the row
///
/// # Returns
/// `Some(ResultRow)` with whatever fields the first panel block carried,
/// `None` if the page has no panel block at all
pub fn scrape_detail_page(
    html: &str,
    release: &ReleaseRecord<'_>,
    policy: NamePolicy,
    engine_url: &str,
) -> Option<ResultRow> {
    let document = Html::parse_document(html);
    let mut scan = DetailPageScan::new(release, policy, engine_url);

    for node in document.tree.root().descendants() {
        if scan.is_finished() {
            break;
        }
        match node.value() {
            Node::Element(element) => scan.start_tag(element),
            Node::Text(text) => scan.text(text),
            _ => {}
        }
    }

    scan.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TitleRecord, TorrentDescriptor};
    use proptest::prelude::*;

    const ENGINE: &str = "https://releases.moe";

    fn title() -> TitleRecord {
        TitleRecord {
            id: 154587,
            name: "Frieren: Beyond Journey's End".to_string(),
            cover: "https://s4.anilist.co/bx154587.jpg".to_string(),
            format: "Tv".to_string(),
            year: Some(2023),
            status: "Finished".to_string(),
            episodes: Some(28),
        }
    }

    fn release(title: &TitleRecord) -> ReleaseRecord<'_> {
        ReleaseRecord {
            title,
            torrent: TorrentDescriptor {
                url: "https://nyaa.si/view/1700000".to_string(),
                release_group: "SubsPlease".to_string(),
                is_best: true,
                tracker: "Nyaa".to_string(),
                info_hash: String::new(),
            },
            notes: String::new(),
        }
    }

    fn detail_page(seeds: &str, leech: &str) -> String {
        format!(
            r#"
        <html>
        <body>
        <div class="container">
            <div class="panel panel-success">
                <div class="panel-heading">
                    <h3 class="panel-title">
                        [SubsPlease] Sousou no Frieren - 01 (1080p) [ABCD1234].mkv
                    </h3>
                </div>
                <div class="panel-body">
                    <div class="row">
                        <div class="col-md-1">Category:</div>
                        <div class="col-md-5"><a href="/?c=1_0">Anime</a></div>
                        <div class="col-md-1">Date:</div>
                        <div class="col-md-5" data-timestamp="1700000000">2023-11-14 22:13 UTC</div>
                    </div>
                    <div class="row">
                        <div class="col-md-1">Submitter:</div>
                        <div class="col-md-5"><a href="/user/subsplease">subsplease</a></div>
                        <div class="col-md-1">Seeders:</div>
                        <div class="col-md-5"><span style="color: green;">{seeds}</span></div>
                    </div>
                    <div class="row">
                        <div class="col-md-1">Information:</div>
                        <div class="col-md-5"><a href="https://subsplease.org/">https://subsplease.org/</a></div>
                        <div class="col-md-1">Leechers:</div>
                        <div class="col-md-5"><span style="color: red;">{leech}</span></div>
                    </div>
                    <div class="row">
                        <div class="col-md-1">File size:</div>
                        <div class="col-md-5">1.4 GiB</div>
                        <div class="col-md-1">Completed:</div>
                        <div class="col-md-5">25000</div>
                    </div>
                    <div class="row">
                        <div class="col-md-1">Info hash:</div>
                        <div class="col-md-5"><kbd>0123456789abcdef0123456789abcdef01234567</kbd></div>
                    </div>
                </div>
                <div class="panel-footer clearfix">
                    <a href="/download/1700000.torrent">Download Torrent</a> or
                    <a class="card-footer-item" href="magnet:?xt=urn:btih:0123456789abcdef0123456789abcdef01234567">Magnet</a>
                </div>
            </div>
            <div class="panel panel-default">
                <div class="panel-heading"><h3 class="panel-title">Description</h3></div>
                <div class="panel-body" id="torrent-description" data-timestamp="1">
                    <div class="row"><div class="col-md-5">999</div></div>
                    <a class="card-footer-item" href="magnet:?xt=urn:btih:ffff">Other</a>
                </div>
            </div>
        </div>
        </body>
        </html>
        "#
        )
    }

    #[test]
    fn test_scrape_full_page() {
        let title = title();
        let release = release(&title);
        let row = scrape_detail_page(&detail_page("120", "4"), &release, NamePolicy::Synthesized, ENGINE)
            .expect("panel should yield a row");

        assert_eq!(row.engine_url, "https://releases.moe");
        assert_eq!(row.desc_link, "https://nyaa.si/view/1700000");
        assert_eq!(
            row.link.as_deref(),
            Some("magnet:?xt=urn:btih:0123456789abcdef0123456789abcdef01234567")
        );
        assert_eq!(
            row.name.as_deref(),
            Some("[BEST] [SubsPlease] Frieren: Beyond Journey's End")
        );
        assert_eq!(row.pub_date, Some(1_700_000_000));
        assert_eq!(row.seeds, Some(120));
        assert_eq!(row.leech, Some(4));
        assert_eq!(row.size.as_deref(), Some("1.4 GiB"));
    }

    #[test]
    fn test_scrape_stops_at_second_panel() {
        let title = title();
        let release = release(&title);
        let row = scrape_detail_page(&detail_page("7", "0"), &release, NamePolicy::Scraped, ENGINE)
            .unwrap();

        // The description panel carries its own title, timestamp and magnet.
        assert_eq!(row.pub_date, Some(1_700_000_000));
        assert_eq!(row.link.as_deref().map(|l| l.ends_with("ffff")), Some(false));
        assert_eq!(
            row.name.as_deref(),
            Some("[BEST] [SubsPlease] Sousou no Frieren - 01 (1080p) [ABCD1234].mkv")
        );
    }

    #[test]
    fn test_scrape_html_name() {
        let title = title();
        let release = release(&title);
        let row =
            scrape_detail_page(&detail_page("1", "1"), &release, NamePolicy::Html, ENGINE).unwrap();
        let name = row.name.unwrap();
        assert!(name.starts_with("<div"));
        assert!(name.contains("Frieren: Beyond Journey's End"));
    }

    #[test]
    fn test_scrape_alt_release_name() {
        let title = title();
        let mut release = release(&title);
        release.torrent.is_best = false;
        release.torrent.release_group = "Erai-raws".to_string();
        let row = scrape_detail_page(&detail_page("1", "1"), &release, NamePolicy::Synthesized, ENGINE)
            .unwrap();
        assert_eq!(
            row.name.as_deref(),
            Some("[ALT] [Erai-raws] Frieren: Beyond Journey's End")
        );
    }

    #[test]
    fn test_scrape_non_numeric_counts_are_dropped() {
        let title = title();
        let release = release(&title);
        let row = scrape_detail_page(&detail_page("n/a", "?"), &release, NamePolicy::Synthesized, ENGINE)
            .unwrap();
        assert_eq!(row.seeds, None);
        assert_eq!(row.leech, None);
        assert_eq!(row.size.as_deref(), Some("1.4 GiB"));
    }

    #[test]
    fn test_scrape_page_without_panel() {
        let title = title();
        let release = release(&title);
        let html = "<html><body><h1>404 Not Found</h1></body></html>";
        assert_eq!(
            scrape_detail_page(html, &release, NamePolicy::Synthesized, ENGINE),
            None
        );
        assert_eq!(scrape_detail_page("", &release, NamePolicy::Synthesized, ENGINE), None);
    }

    #[test]
    fn test_scrape_partial_panel() {
        let title = title();
        let release = release(&title);
        let html = r#"
            <div class="panel panel-danger">
                <h3 class="panel-title">Removed torrent</h3>
                <span data-timestamp="1700000000"></span>
            </div>
        "#;
        let row = scrape_detail_page(html, &release, NamePolicy::Scraped, ENGINE).unwrap();
        assert_eq!(row.name.as_deref(), Some("[BEST] Removed torrent"));
        assert_eq!(row.pub_date, Some(1_700_000_000));
        assert_eq!(row.link, None);
        assert_eq!(row.seeds, None);
        assert_eq!(row.leech, None);
        assert_eq!(row.size, None);
    }

    #[test]
    fn test_magnet_outside_panel_is_captured() {
        let title = title();
        let release = release(&title);
        let html = r#"
            <a class="card-footer-item" href="magnet:?xt=urn:btih:abcd">Magnet</a>
            <a class="card-footer-item" href="/download/1.torrent">Torrent</a>
            <div class="panel panel-success"><h3 class="panel-title">x</h3></div>
        "#;
        let row = scrape_detail_page(html, &release, NamePolicy::Synthesized, ENGINE).unwrap();
        assert_eq!(row.link.as_deref(), Some("magnet:?xt=urn:btih:abcd"));
    }

    #[test]
    fn test_timestamp_outside_panel_is_ignored() {
        let title = title();
        let release = release(&title);
        let html = r#"
            <span data-timestamp="42"></span>
            <div class="panel panel-success"><h3 class="panel-title">x</h3></div>
        "#;
        let row = scrape_detail_page(html, &release, NamePolicy::Synthesized, ENGINE).unwrap();
        assert_eq!(row.pub_date, None);
    }

    proptest! {
        #[test]
        fn numeric_counts_are_integers(seeds in 0u32..1_000_000, leech in 0u32..1_000_000) {
            let title = title();
            let release = release(&title);
            let html = detail_page(&seeds.to_string(), &leech.to_string());
            let row = scrape_detail_page(&html, &release, NamePolicy::Synthesized, ENGINE).unwrap();
            prop_assert_eq!(row.seeds, Some(i64::from(seeds)));
            prop_assert_eq!(row.leech, Some(i64::from(leech)));
        }
    }
}
