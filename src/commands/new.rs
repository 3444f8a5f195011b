//! Create a new post or video

use anyhow::{bail, Result};
use chrono::{SubsecRound, Utc};
use std::fs;
use std::path::PathBuf;

use crate::content::{FrontMatter, Primitive};
use crate::Site;

/// Which collection a new document goes into
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Kind {
    Post,
    Video,
}

/// Options for a new document
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub kind: Kind,
    pub youtube: Option<String>,
    pub lang: Option<String>,
}

/// Scaffold a new document named after its slug.
/// Returns the path of the created file.
pub fn create_document(site: &Site, doc: &NewDocument) -> Result<PathBuf> {
    let slug = slug::slugify(&doc.title);
    if slug.is_empty() {
        bail!("Cannot derive a slug from title {:?}", doc.title);
    }

    let mut front_matter = FrontMatter::new();
    front_matter.insert("title", Primitive::String(doc.title.clone()));
    front_matter.insert("slug", Primitive::String(slug.clone()));
    front_matter.insert("date", Primitive::Date(Utc::now().trunc_subsecs(0)));

    let target_dir = match doc.kind {
        Kind::Post => {
            if let Some(lang) = &doc.lang {
                front_matter.insert("lang", Primitive::String(lang.clone()));
            }
            &site.post_dir
        }
        Kind::Video => {
            let Some(youtube) = &doc.youtube else {
                bail!("A video needs a YouTube id (--youtube)");
            };
            front_matter.insert("youtube", Primitive::String(youtube.clone()));
            &site.video_dir
        }
    };

    fs::create_dir_all(target_dir)?;
    let file_path = target_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, format!("{}\n", front_matter.to_yaml_block()))?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
