//! Site configuration (_config.yml)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    pub default_lang: String,

    // URL
    /// The site's own origin; links to any other host are external
    pub url: String,
    pub blog_root: String,
    pub pagination_dir: String,

    // Directory
    pub content_dir: String,
    pub post_dir: String,
    pub video_dir: String,
    pub public_dir: String,

    // Writing
    #[serde(default)]
    pub external_link: ExternalLinkConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Pagination
    pub per_page: usize,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            author: "Karol Moroz".to_string(),
            default_lang: "en".to_string(),

            url: "https://example.com".to_string(),
            blog_root: "/blog".to_string(),
            pagination_dir: "page".to_string(),

            content_dir: "content".to_string(),
            post_dir: "blog".to_string(),
            video_dir: "videos".to_string(),
            public_dir: "public".to_string(),

            external_link: ExternalLinkConfig::default(),
            highlight: HighlightConfig::default(),

            per_page: 10,

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.per_page == 0 {
            bail!("per_page must be at least 1");
        }
        if url::Url::parse(&self.url).is_err() {
            bail!("url is not an absolute URL: {}", self.url);
        }
        Ok(())
    }

    /// Host of the site's own origin, if `url` has one
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }
}

/// External link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalLinkConfig {
    pub enable: bool,
    /// Hosts treated as internal in addition to the site's own
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for ExternalLinkConfig {
    fn default() -> Self {
        Self {
            enable: true,
            exclude: Vec::new(),
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
    /// Guess a grammar from the first line of untagged code blocks
    pub auto_detect: bool,
    /// Extra language tags, mapped to a grammar name or a registered tag
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
            auto_detect: false,
            aliases: HashMap::new(),
        }
    }
}
