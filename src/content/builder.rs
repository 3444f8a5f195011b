//! Turns parsed documents into validated content records

use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

use super::{ContentError, FrontMatter, MarkdownRenderer, Post, Primitive, PublishDate, Video};
use crate::config::SiteConfig;
use crate::helpers::{iso_date, parse_date, plain_text};

/// One source file split into front-matter and body
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub front_matter: FrontMatter,
    pub body: String,
}

impl Document {
    /// Read and split a markdown file
    pub fn read(path: &Path) -> Result<Self, ContentError> {
        let text = fs::read_to_string(path).map_err(|source| ContentError::UnreadableSource {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    pub fn parse(path: &Path, text: &str) -> Result<Self, ContentError> {
        let (front_matter, body) = FrontMatter::parse(text, path)?;
        Ok(Self {
            path: path.to_path_buf(),
            front_matter,
            body: body.to_string(),
        })
    }

    /// Field as text; dates, numbers and booleans are spelled out
    fn text(&self, field: &str) -> Option<String> {
        self.front_matter.get(field).map(|value| match value {
            Primitive::String(s) => s.trim().to_string(),
            Primitive::Number(n) => n.to_string(),
            Primitive::Bool(b) => b.to_string(),
            Primitive::Date(d) => iso_date(d),
        })
    }

    /// Field as written; strings are not trimmed
    fn raw(&self, field: &str) -> Option<String> {
        match self.front_matter.get(field)? {
            Primitive::String(s) => Some(s.clone()),
            _ => self.text(field),
        }
    }

    fn required(&self, field: &'static str) -> Result<String, ContentError> {
        self.require(field, self.text(field))
    }

    fn require(&self, field: &'static str, value: Option<String>) -> Result<String, ContentError> {
        value
            .ok_or_else(|| ContentError::MissingRequiredField {
                field,
                path: self.path.clone(),
            })
    }

    fn date(&self) -> Result<DateTime<Utc>, ContentError> {
        let invalid = |value: String| ContentError::InvalidDate {
            value,
            path: self.path.clone(),
        };

        match self.front_matter.get("date") {
            None => Err(ContentError::MissingRequiredField {
                field: "date",
                path: self.path.clone(),
            }),
            Some(Primitive::Date(d)) => Ok(*d),
            Some(Primitive::String(s)) => parse_date(s).ok_or_else(|| invalid(s.clone())),
            Some(Primitive::Number(n)) => Err(invalid(n.to_string())),
            Some(Primitive::Bool(b)) => Err(invalid(b.to_string())),
        }
    }

    /// `slug` from front-matter, else the slugified file name
    fn slug(&self) -> Result<String, ContentError> {
        let slug = match self.text("slug").filter(|s| !s.is_empty()) {
            Some(slug) => slug,
            None => {
                let stem = self
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or_default();
                slug::slugify(stem)
            }
        };

        if slug.is_empty() || slug.contains(['/', '\\']) || slug == "." || slug == ".." {
            return Err(ContentError::MalformedFrontmatter {
                path: self.path.clone(),
                reason: format!("slug `{}` is not a single path segment", slug),
            });
        }
        Ok(slug)
    }
}

/// Builds posts and videos, rendering their bodies on the way
pub struct ContentBuilder {
    renderer: MarkdownRenderer,
    default_lang: String,
}

impl ContentBuilder {
    pub fn new(renderer: MarkdownRenderer, default_lang: impl Into<String>) -> Self {
        Self {
            renderer,
            default_lang: default_lang.into(),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(
            MarkdownRenderer::from_config(config),
            config.default_lang.clone(),
        )
    }

    /// Validate a document and build a post from it
    pub fn build_post(&self, doc: &Document) -> Result<Post, ContentError> {
        let date = doc.date()?;
        let title = doc.required("title")?;
        let slug = doc.slug()?;
        let lang = doc
            .text("lang")
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| self.default_lang.clone());

        let (excerpt_md, full_md) = MarkdownRenderer::split_excerpt(&doc.body);
        let html = self.renderer.render(&full_md);
        let excerpt = excerpt_md.map(|e| self.renderer.render(e));

        let summary = doc
            .text("summary")
            .filter(|s| !s.is_empty())
            .map(|s| self.renderer.render(&s));
        let summary_plain = summary.as_deref().map(plain_text);

        Ok(Post {
            slug,
            title,
            date: PublishDate::new(date),
            lang,
            content: doc.body.clone(),
            html,
            excerpt,
            summary,
            summary_plain,
            filename: doc.path.clone(),
        })
    }

    /// Validate a document and build a video from it
    pub fn build_video(&self, doc: &Document) -> Result<Video, ContentError> {
        let date = doc.date()?;
        let title = doc.required("title")?;
        let youtube = doc.require("youtube", doc.raw("youtube"))?;
        let slug = doc.slug()?;

        Ok(Video {
            slug,
            title,
            date: PublishDate::new(date),
            content: doc.body.clone(),
            html: self.renderer.render(&doc.body),
            youtube,
            filename: doc.path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentRecord;
    use chrono::TimeZone;

    fn builder() -> ContentBuilder {
        ContentBuilder::new(MarkdownRenderer::new(), "en")
    }

    fn doc(name: &str, text: &str) -> Document {
        Document::parse(&PathBuf::from(format!("/site/content/blog/{}", name)), text).unwrap()
    }

    #[test]
    fn test_build_post() {
        let d = doc(
            "hello.md",
            "---\ntitle: Hello\nslug: hello-world\ndate: 2024-04-03\n---\n# Hi\n",
        );
        let post = builder().build_post(&d).unwrap();
        assert_eq!(post.slug(), "hello-world");
        assert_eq!(post.title(), "Hello");
        assert_eq!(
            post.date().instant(),
            &Utc.with_ymd_and_hms(2024, 4, 3, 0, 0, 0).unwrap()
        );
        assert_eq!(post.date().pretty(), "April 3, 2024");
        assert_eq!(post.lang, "en");
        assert_eq!(post.content, "# Hi\n");
        assert!(post.html.contains("<h1>Hi</h1>"));
        assert_eq!(post.filename(), Path::new("/site/content/blog/hello.md"));
        assert!(post.excerpt.is_none());
        assert!(post.summary.is_none());
    }

    #[test]
    fn test_lang_passes_through() {
        let d = doc("zh.md", "---\ntitle: Ni hao\ndate: 2024-04-03\nlang: zh-TW\n---\n");
        assert_eq!(builder().build_post(&d).unwrap().lang, "zh-TW");
    }

    #[test]
    fn test_slug_falls_back_to_file_name() {
        let d = doc("My First Post.md", "---\ntitle: First\ndate: 2024-04-03\n---\n");
        assert_eq!(builder().build_post(&d).unwrap().slug, "my-first-post");
    }

    #[test]
    fn test_slug_with_slash_rejected() {
        let d = doc("x.md", "---\ntitle: X\ndate: 2024-04-03\nslug: ../etc\n---\n");
        assert!(matches!(
            builder().build_post(&d),
            Err(ContentError::MalformedFrontmatter { .. })
        ));
    }

    #[test]
    fn test_date_formats_normalize() {
        let b = builder();
        let expected = Utc.with_ymd_and_hms(2024, 4, 3, 10, 0, 0).unwrap();
        for date in [
            "2024-04-03 10:00:00",
            "2024-04-03T10:00:00Z",
            "2024-04-03T12:00:00+02:00",
            "\"2024-04-03 10:00\"",
        ] {
            let d = doc("d.md", &format!("---\ntitle: D\ndate: {}\n---\n", date));
            let post = b.build_post(&d).unwrap();
            assert_eq!(post.date().instant(), &expected, "input {}", date);
            assert_eq!(post.date().pretty(), "April 3, 2024");
        }
    }

    #[test]
    fn test_missing_date() {
        let d = doc("nodate.md", "---\ntitle: No date\n---\nBody");
        match builder().build_post(&d) {
            Err(ContentError::MissingRequiredField { field, path }) => {
                assert_eq!(field, "date");
                assert_eq!(path, PathBuf::from("/site/content/blog/nodate.md"));
            }
            other => panic!("unexpected result: {:?}", other.map(|p| p.slug)),
        }
    }

    #[test]
    fn test_missing_title() {
        let d = doc("notitle.md", "---\ndate: 2024-04-03\n---\nBody");
        assert!(matches!(
            builder().build_post(&d),
            Err(ContentError::MissingRequiredField { field: "title", .. })
        ));
    }

    #[test]
    fn test_invalid_date() {
        let d = doc("bad.md", "---\ntitle: Bad\ndate: sometime in May\n---\n");
        match builder().build_post(&d) {
            Err(ContentError::InvalidDate { value, .. }) => assert_eq!(value, "sometime in May"),
            other => panic!("unexpected result: {:?}", other.map(|p| p.slug)),
        }
    }

    #[test]
    fn test_numeric_date_is_invalid() {
        let d = doc("num.md", "---\ntitle: Num\ndate: 20240403\n---\n");
        assert!(matches!(
            builder().build_post(&d),
            Err(ContentError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_excerpt_and_summary() {
        let d = doc(
            "s.md",
            "---\ntitle: S\ndate: 2024-04-03\nsummary: A *short* intro.\n---\nFirst part.\n<!-- more -->\nSecond part.\n",
        );
        let post = builder().build_post(&d).unwrap();
        assert_eq!(post.excerpt.as_deref(), Some("<p>First part.</p>\n"));
        assert!(post.html.contains("<p>Second part.</p>"));
        assert!(!post.html.contains("more -->"));
        assert_eq!(
            post.summary.as_deref(),
            Some("<p>A <em>short</em> intro.</p>\n")
        );
        assert_eq!(post.summary_plain.as_deref(), Some("A short intro."));
    }

    #[test]
    fn test_build_video() {
        let d = doc(
            "v.md",
            "---\ntitle: Talk\ndate: 2023-07-09\nyoutube: dQw4w9WgXcQ\nslug: talk\n---\nNotes",
        );
        let video = builder().build_video(&d).unwrap();
        assert_eq!(video.youtube, "dQw4w9WgXcQ");
        assert_eq!(video.date().pretty(), "July 9, 2023");
        assert!(video.html.contains("<p>Notes</p>"));
    }

    #[test]
    fn test_youtube_id_is_not_trimmed() {
        let d = doc(
            "v.md",
            "---\ntitle: Talk\ndate: 2023-07-09\nyoutube: \" dQw4w9WgXcQ \"\n---\n",
        );
        let video = builder().build_video(&d).unwrap();
        assert_eq!(video.youtube, " dQw4w9WgXcQ ");
    }

    #[test]
    fn test_video_requires_youtube() {
        let d = doc("v.md", "---\ntitle: Talk\ndate: 2023-07-09\n---\n");
        assert!(matches!(
            builder().build_video(&d),
            Err(ContentError::MissingRequiredField { field: "youtube", .. })
        ));
    }

    #[test]
    fn test_unreadable_source() {
        let err = Document::read(Path::new("/definitely/not/here.md")).unwrap_err();
        assert!(matches!(err, ContentError::UnreadableSource { .. }));
    }
}
