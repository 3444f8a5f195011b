//! Content pipeline errors

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn one source document into a content record
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("{}: malformed front-matter: {reason}", path.display())]
    MalformedFrontmatter { path: PathBuf, reason: String },

    #[error("{}: missing required field `{field}`", path.display())]
    MissingRequiredField { field: &'static str, path: PathBuf },

    #[error("{}: invalid date `{value}`", path.display())]
    InvalidDate { value: String, path: PathBuf },

    #[error("{}: cannot read source: {source}", path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    /// Source file the error refers to
    pub fn path(&self) -> &PathBuf {
        match self {
            ContentError::MalformedFrontmatter { path, .. }
            | ContentError::MissingRequiredField { path, .. }
            | ContentError::InvalidDate { path, .. }
            | ContentError::UnreadableSource { path, .. } => path,
        }
    }
}

/// Every document that failed during one build
#[derive(Error, Debug)]
pub struct BuildErrors(pub Vec<ContentError>);

impl BuildErrors {
    pub fn errors(&self) -> &[ContentError] {
        &self.0
    }
}

impl fmt::Display for BuildErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} document(s) failed to load", self.0.len())?;
        for err in &self.0 {
            write!(f, "\n  - {}", err)?;
        }
        Ok(())
    }
}
