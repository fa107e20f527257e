//! HTML parsers for tracker pages
//!
//! Contains modules for parsing different page types.

pub mod detail;

pub use detail::{DetailPageScan, scrape_detail_page};
