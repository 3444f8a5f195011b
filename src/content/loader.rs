//! Content repository - loads posts and videos once per build

use rayon::prelude::*;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::paginate::{page_count, paginate, sort_by_date_descending, Page};
use super::{BuildErrors, ContentBuilder, ContentError, ContentRecord, Document, Post, Video};
use crate::Site;

/// Every post and video of the site, sorted newest first
pub struct ContentRepository {
    posts: Vec<Post>,
    videos: Vec<Video>,
    per_page: NonZeroUsize,
}

impl ContentRepository {
    /// Load both collections.
    ///
    /// Documents are read and rendered in parallel. All failures are
    /// collected and returned together.
    pub fn load(site: &Site) -> Result<Self, BuildErrors> {
        let builder = ContentBuilder::from_config(&site.config);
        let mut errors = Vec::new();

        let posts = load_collection(&site.post_dir, &mut errors, |doc| {
            builder.build_post(doc)
        });
        let videos = load_collection(&site.video_dir, &mut errors, |doc| {
            builder.build_video(doc)
        });

        if !errors.is_empty() {
            for err in &errors {
                tracing::error!("{}", err);
            }
            return Err(BuildErrors(errors));
        }

        tracing::info!("Loaded {} posts and {} videos", posts.len(), videos.len());
        Ok(Self::from_records(posts, videos, site.per_page))
    }

    /// Build from already loaded records, keeping their order for ties
    pub fn from_records(mut posts: Vec<Post>, mut videos: Vec<Video>, per_page: NonZeroUsize) -> Self {
        sort_by_date_descending(&mut posts);
        sort_by_date_descending(&mut videos);
        Self {
            posts,
            videos,
            per_page,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn post(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    pub fn video(&self, slug: &str) -> Option<&Video> {
        self.videos.iter().find(|v| v.slug == slug)
    }

    pub fn post_slugs(&self) -> Vec<&str> {
        self.posts.iter().map(|p| p.slug()).collect()
    }

    pub fn video_slugs(&self) -> Vec<&str> {
        self.videos.iter().map(|v| v.slug()).collect()
    }

    pub fn blog_page_count(&self) -> usize {
        page_count(self.posts.len(), self.per_page)
    }

    /// One page of the blog index (1-based)
    pub fn blog_page(&self, page: usize) -> Page<'_, Post> {
        paginate(&self.posts, self.per_page, page)
    }
}

/// Read every document of one collection, in file name order
fn load_collection<T, F>(dir: &Path, errors: &mut Vec<ContentError>, build: F) -> Vec<T>
where
    T: Send,
    F: Fn(&Document) -> Result<T, ContentError> + Sync,
{
    let files = match list_markdown_files(dir) {
        Ok(files) => files,
        Err(err) => {
            errors.push(err);
            return Vec::new();
        }
    };

    let results: Vec<Result<T, ContentError>> = files
        .par_iter()
        .map(|path| {
            tracing::debug!("Loading {:?}", path);
            Document::read(path).and_then(|doc| build(&doc))
        })
        .collect();

    let mut records = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(record) => records.push(record),
            Err(err) => errors.push(err),
        }
    }
    records
}

/// Markdown files directly inside `dir`, sorted by name
pub fn list_markdown_files(dir: &Path) -> Result<Vec<PathBuf>, ContentError> {
    if !dir.exists() {
        tracing::warn!("Content directory {:?} does not exist", dir);
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| ContentError::UnreadableSource {
            path: err.path().unwrap_or(dir).to_path_buf(),
            source: io::Error::from(err),
        })?;
        let path = entry.path();
        if path.is_file() && is_markdown_file(path) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md")
        .unwrap_or(false)
}
