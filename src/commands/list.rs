//! List site content

use anyhow::Result;

use crate::content::paginate::page_routes;
use crate::content::{ContentRecord, ContentRepository};
use crate::helpers::page_url;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let repo = ContentRepository::load(site)?;

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", repo.posts().len());
            for post in repo.posts() {
                println!(
                    "  {} - {} [{}] ({})",
                    post.date().instant().format("%Y-%m-%d"),
                    post.title(),
                    post.slug(),
                    post.lang
                );
            }
        }
        "video" | "videos" => {
            println!("Videos ({}):", repo.videos().len());
            for video in repo.videos() {
                println!(
                    "  {} - {} [{}] {}",
                    video.date().instant().format("%Y-%m-%d"),
                    video.title(),
                    video.slug(),
                    video.watch_url()
                );
            }
        }
        "page" | "pages" => {
            let count = repo.blog_page_count();
            println!("Blog pages ({}):", count);
            if count > 0 {
                println!("  1 {}", page_url(&site.config, 1));
            }
            for number in page_routes(count) {
                println!("  {} {}", number, page_url(&site.config, number));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, video, page",
                content_type
            );
        }
    }

    Ok(())
}
