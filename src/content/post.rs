//! Post and Video models

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

use crate::helpers::{iso_date, pretty_date};

/// Shared shape of everything loaded from a content collection
pub trait ContentRecord {
    fn slug(&self) -> &str;
    fn title(&self) -> &str;
    fn date(&self) -> &PublishDate;
    fn filename(&self) -> &Path;
}

/// A normalized publication date together with its display form.
///
/// The display string is derived once, here, and can't be set on its own.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublishDate {
    instant: DateTime<Utc>,
    pretty: String,
}

impl PublishDate {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self {
            pretty: pretty_date(&instant),
            instant,
        }
    }

    pub fn instant(&self) -> &DateTime<Utc> {
        &self.instant
    }

    /// e.g. "April 3, 2024"
    pub fn pretty(&self) -> &str {
        &self.pretty
    }

    /// e.g. "2024-04-03T00:00:00.000Z"
    pub fn iso(&self) -> String {
        iso_date(&self.instant)
    }
}

impl Serialize for PublishDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PublishDate", 2)?;
        state.serialize_field("date", &self.iso())?;
        state.serialize_field("datePretty", &self.pretty)?;
        state.end()
    }
}

/// A blog post
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique within the blog; forms the post's public path
    pub slug: String,

    pub title: String,

    /// Publication date
    #[serde(flatten)]
    pub date: PublishDate,

    /// Content language tag
    pub lang: String,

    /// Raw markdown body
    pub content: String,

    /// Rendered HTML body
    pub html: String,

    /// Rendered text before `<!-- more -->`
    pub excerpt: Option<String>,

    /// Rendered `summary` front-matter field
    pub summary: Option<String>,

    /// `summary` as plain text, for meta descriptions
    pub summary_plain: Option<String>,

    /// Full source file path
    #[serde(skip)]
    pub filename: PathBuf,
}

impl ContentRecord for Post {
    fn slug(&self) -> &str {
        &self.slug
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn date(&self) -> &PublishDate {
        &self.date
    }

    fn filename(&self) -> &Path {
        &self.filename
    }
}

/// A video listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub slug: String,
    pub title: String,
    #[serde(flatten)]
    pub date: PublishDate,
    pub content: String,
    pub html: String,
    /// YouTube video id
    pub youtube: String,
    #[serde(skip)]
    pub filename: PathBuf,
}

impl Video {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.youtube)
    }

    pub fn thumbnail_url(&self) -> String {
        format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", self.youtube)
    }
}

impl ContentRecord for Video {
    fn slug(&self) -> &str {
        &self.slug
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn date(&self) -> &PublishDate {
        &self.date
    }

    fn filename(&self) -> &Path {
        &self.filename
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn video() -> Video {
        Video {
            slug: "intro".to_string(),
            title: "Intro".to_string(),
            date: PublishDate::new(Utc.with_ymd_and_hms(2023, 7, 9, 0, 0, 0).unwrap()),
            content: String::new(),
            html: String::new(),
            youtube: "dQw4w9WgXcQ".to_string(),
            filename: PathBuf::from("/site/content/videos/intro.md"),
        }
    }

    #[test]
    fn test_publish_date_derives_pretty() {
        let date = PublishDate::new(Utc.with_ymd_and_hms(2024, 4, 3, 8, 0, 0).unwrap());
        assert_eq!(date.pretty(), "April 3, 2024");
        assert_eq!(date.iso(), "2024-04-03T08:00:00.000Z");
    }

    #[test]
    fn test_video_urls() {
        let v = video();
        assert_eq!(v.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(
            v.thumbnail_url(),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(video()).unwrap();
        assert_eq!(json["slug"], "intro");
        assert_eq!(json["date"], "2023-07-09T00:00:00.000Z");
        assert_eq!(json["datePretty"], "July 9, 2023");
        assert_eq!(json["youtube"], "dQw4w9WgXcQ");
        assert!(json.get("filename").is_none());
    }
}
