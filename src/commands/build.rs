//! Build the page data

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::content::paginate::page_routes;
use crate::content::{ContentRecord, ContentRepository, Pagination, Post, Video};
use crate::helpers::post_url;
use crate::Site;

/// A post as listed on the blog index, without its body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PostEntry<'a> {
    slug: &'a str,
    title: &'a str,
    date: String,
    date_pretty: &'a str,
    lang: &'a str,
    url: String,
    excerpt: Option<&'a str>,
}

impl<'a> PostEntry<'a> {
    fn new(site: &Site, post: &'a Post) -> Self {
        Self {
            slug: &post.slug,
            title: &post.title,
            date: post.date().iso(),
            date_pretty: post.date().pretty(),
            lang: &post.lang,
            url: post_url(&site.config, &post.slug),
            excerpt: post.excerpt.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
struct BlogPageData<'a> {
    posts: Vec<PostEntry<'a>>,
    pagination: Pagination,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoEntry<'a> {
    #[serde(flatten)]
    video: &'a Video,
    watch_url: String,
    thumbnail_url: String,
    featured: bool,
}

/// Load all content and write the JSON the page templates read
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let repo = ContentRepository::load(site)?;
    write_site_data(site, &repo)?;

    let duration = start.elapsed();
    tracing::info!("Built in {:.2}s", duration.as_secs_f64());
    Ok(())
}

/// Write every data file for an already loaded repository
pub fn write_site_data(site: &Site, repo: &ContentRepository) -> Result<()> {
    let out = &site.public_dir;
    fs::create_dir_all(out)?;

    // Pages and posts from an earlier, larger build
    for stale in ["posts", "blog"] {
        let dir = out.join(stale);
        if dir.exists() {
            fs::remove_dir_all(&dir).with_context(|| format!("Failed to clear {:?}", dir))?;
        }
    }

    // Post list and single posts
    let entries: Vec<PostEntry> = repo.posts().iter().map(|p| PostEntry::new(site, p)).collect();
    write_json(&out.join("posts.json"), &entries)?;

    for post in repo.posts() {
        write_json(&out.join("posts").join(format!("{}.json", post.slug)), post)?;
    }

    // Blog index pages: page 1 is always written so the blog root has data
    let page_count = repo.blog_page_count();
    for number in std::iter::once(1).chain(page_routes(page_count)) {
        let page = repo.blog_page(number);
        let data = BlogPageData {
            posts: page.items.iter().map(|p| PostEntry::new(site, p)).collect(),
            pagination: Pagination::new(&site.config, &page),
        };
        write_json(&out.join("blog").join(format!("{}.json", number)), &data)?;
    }

    // Videos, newest featured first
    let videos: Vec<VideoEntry> = repo
        .videos()
        .iter()
        .enumerate()
        .map(|(i, video)| VideoEntry {
            video,
            watch_url: video.watch_url(),
            thumbnail_url: video.thumbnail_url(),
            featured: i == 0,
        })
        .collect();
    write_json(&out.join("videos.json"), &videos)?;

    tracing::info!(
        "Wrote {} posts, {} blog pages and {} videos to {:?}",
        repo.posts().len(),
        page_count.max(1),
        repo.videos().len(),
        out
    );
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Generated: {:?}", path);
    Ok(())
}
