//! Content module - parses, renders and orders posts and videos

mod builder;
mod error;
mod frontmatter;
pub mod loader;
mod markdown;
pub mod paginate;
mod post;

pub use builder::{ContentBuilder, Document};
pub use error::{BuildErrors, ContentError};
pub use frontmatter::{FrontMatter, Primitive};
pub use loader::ContentRepository;
pub use markdown::{GrammarRegistry, MarkdownRenderer};
pub use paginate::{Page, Pagination};
pub use post::{ContentRecord, Post, PublishDate, Video};
