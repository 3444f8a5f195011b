//! folio: the content pipeline behind a personal blog and portfolio site
//!
//! Markdown articles and video listings are read from two collections,
//! validated into typed records, rendered to HTML and paginated. The
//! result is written as JSON for the page templates to consume.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;

use anyhow::{anyhow, Result};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// One site on disk, resolved once per run
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Blog posts
    pub post_dir: PathBuf,
    /// Video listings
    pub video_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Posts per blog index page
    pub per_page: NonZeroUsize,
}

impl Site {
    /// Create a new site from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            tracing::debug!("Loading config from {:?}", config_path);
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Self::with_config(base_dir, config)
    }

    /// Create a site with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Result<Self> {
        config.validate()?;
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let per_page = NonZeroUsize::new(config.per_page)
            .ok_or_else(|| anyhow!("per_page must be at least 1"))?;

        Ok(Self {
            post_dir: content_dir.join(&config.post_dir),
            video_dir: content_dir.join(&config.video_dir),
            public_dir: base_dir.join(&config.public_dir),
            config,
            base_dir,
            per_page,
        })
    }

    /// Load the content and write the page data
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
