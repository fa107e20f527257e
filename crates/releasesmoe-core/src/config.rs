//! Search configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `RELEASESMOE_*` environment variables.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::{ReleasesMoeError, Result};

pub const ANILIST_ENDPOINT: &str = "https://graphql.anilist.co/";
pub const RELEASES_ENDPOINT: &str = "https://releases.moe/api/collections/entries/records";
pub const ENGINE_URL: &str = "https://releases.moe";
pub const TARGET_TRACKER: &str = "Nyaa";

/// How the display name of a result row is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamePolicy {
    /// `[BEST] [Group] Title` built from releases.moe and AniList data
    #[default]
    Synthesized,
    /// `[BEST] <torrent title>` taken from the tracker page
    Scraped,
    /// Inline-styled HTML card, for web UIs that render result names
    Html,
}

impl fmt::Display for NamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NamePolicy::Synthesized => "synthesized",
            NamePolicy::Scraped => "scraped",
            NamePolicy::Html => "html",
        })
    }
}

impl FromStr for NamePolicy {
    type Err = ReleasesMoeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "synthesized" => Ok(NamePolicy::Synthesized),
            "scraped" => Ok(NamePolicy::Scraped),
            "html" => Ok(NamePolicy::Html),
            other => Err(ReleasesMoeError::Config(format!(
                "unknown name policy: {other}"
            ))),
        }
    }
}

/// Configuration for one search run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// AniList GraphQL endpoint
    pub anilist_endpoint: String,
    /// releases.moe entries collection endpoint
    pub releases_endpoint: String,
    /// Engine URL reported on every result row
    pub engine_url: String,
    /// Only torrents from this tracker are scraped
    pub target_tracker: String,
    /// Page size for both API calls (default: 30)
    pub per_page: u32,
    /// Display name policy
    pub name_policy: NamePolicy,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            anilist_endpoint: ANILIST_ENDPOINT.to_string(),
            releases_endpoint: RELEASES_ENDPOINT.to_string(),
            engine_url: ENGINE_URL.to_string(),
            target_tracker: TARGET_TRACKER.to_string(),
            per_page: 30,
            name_policy: NamePolicy::default(),
            timeout_secs: 30,
        }
    }
}

impl SearchConfig {
    /// Load configuration from defaults, an optional TOML file and the environment
    ///
    /// # Errors
    /// - `Config` if the file does not exist, cannot be parsed, or holds invalid values
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(SearchConfig::default()));

        if let Some(path) = path {
            if !path.exists() {
                return Err(ReleasesMoeError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        let config: SearchConfig = figment
            .merge(Env::prefixed("RELEASESMOE_"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would make every search fail
    pub fn validate(&self) -> Result<()> {
        if self.per_page == 0 {
            return Err(ReleasesMoeError::Config(
                "per_page must be at least 1".to_string(),
            ));
        }
        if self.target_tracker.trim().is_empty() {
            return Err(ReleasesMoeError::Config(
                "target_tracker cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.anilist_endpoint, "https://graphql.anilist.co/");
        assert_eq!(config.target_tracker, "Nyaa");
        assert_eq!(config.per_page, 30);
        assert_eq!(config.name_policy, NamePolicy::Synthesized);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_name_policy_from_str() {
        assert_eq!("html".parse::<NamePolicy>().unwrap(), NamePolicy::Html);
        assert_eq!(" Scraped ".parse::<NamePolicy>().unwrap(), NamePolicy::Scraped);
        assert!("fancy".parse::<NamePolicy>().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = SearchConfig::load(Some(Path::new("/nonexistent/releasesmoe.toml")));
        assert!(matches!(result, Err(ReleasesMoeError::Config(_))));
    }

    #[test]
    fn test_load_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "releasesmoe.toml",
                r#"
                name_policy = "scraped"
                per_page = 10
                target_tracker = "AnimeTosho"
                "#,
            )?;
            jail.set_env("RELEASESMOE_PER_PAGE", "5");

            let config = SearchConfig::load(Some(Path::new("releasesmoe.toml")))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.name_policy, NamePolicy::Scraped);
            assert_eq!(config.target_tracker, "AnimeTosho");
            assert_eq!(config.per_page, 5);
            assert_eq!(config.engine_url, "https://releases.moe");
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_zero_page_size() {
        Jail::expect_with(|jail| {
            jail.create_file("releasesmoe.toml", "per_page = 0")?;
            let result = SearchConfig::load(Some(Path::new("releasesmoe.toml")));
            assert!(matches!(result, Err(ReleasesMoeError::Config(_))));
            Ok(())
        });
    }
}
