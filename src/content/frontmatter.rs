//! Front-matter parsing

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::path::Path;

use super::ContentError;
use crate::helpers::{exact_date, iso_date, is_yaml_timestamp, parse_date};

const DELIMITER: &str = "---";

/// A single front-matter value
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    String(String),
    Number(serde_yaml::Number),
    Bool(bool),
    Date(DateTime<Utc>),
}

impl Primitive {
    /// Render as a YAML scalar that parses back to the same value
    fn to_yaml_scalar(&self) -> String {
        match self {
            // A JSON string is a valid YAML double-quoted scalar, and quoting
            // keeps date-like strings from turning into dates on re-read
            Primitive::String(s) => quote(s),
            Primitive::Number(n) => n.to_string(),
            Primitive::Bool(b) => b.to_string(),
            Primitive::Date(d) => exact_date(d),
        }
    }
}

impl Serialize for Primitive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Primitive::String(s) => serializer.serialize_str(s),
            Primitive::Number(n) => n.serialize(serializer),
            Primitive::Bool(b) => serializer.serialize_bool(*b),
            Primitive::Date(d) => serializer.serialize_str(&iso_date(d)),
        }
    }
}

/// Front-matter data from a document: a flat, ordered key/value map
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FrontMatter {
    fields: IndexMap<String, Primitive>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Primitive> {
        self.fields.get(key)
    }

    /// String value of a field; other scalar kinds are not coerced
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(Primitive::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Primitive) -> Option<Primitive> {
        self.fields.insert(key.into(), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Primitive)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse front-matter from a document.
    /// Returns (front_matter, body); the body is everything after the
    /// closing delimiter line, unmodified.
    ///
    /// A document that does not start with `---` has no front-matter. A
    /// block that is opened but broken is an error, never body text.
    pub fn parse<'a>(content: &'a str, path: &Path) -> Result<(Self, &'a str), ContentError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let malformed = |reason: String| ContentError::MalformedFrontmatter {
            path: path.to_path_buf(),
            reason,
        };

        let (opening, rest) = split_line(content);
        if !opening.starts_with(DELIMITER) {
            return Ok((FrontMatter::default(), content));
        }
        if opening.trim_end() != DELIMITER {
            return Err(malformed(format!(
                "opening delimiter must be `{}` on its own line",
                DELIMITER
            )));
        }

        // Find the closing ---
        let mut pos = 0;
        let (yaml, body) = loop {
            if pos >= rest.len() {
                return Err(malformed("unterminated block".to_string()));
            }
            let (line, after) = split_line(&rest[pos..]);
            if line.trim_end() == DELIMITER {
                break (&rest[..pos], after);
            }
            pos = rest.len() - after.len();
        };

        let fields = parse_fields(yaml).map_err(malformed)?;
        Ok((FrontMatter { fields }, body))
    }

    /// Render as a delimited block ready to be prepended to a body
    pub fn to_yaml_block(&self) -> String {
        let mut out = String::from(DELIMITER);
        out.push('\n');
        for (key, value) in &self.fields {
            out.push_str(&yaml_key(key));
            out.push_str(": ");
            out.push_str(&value.to_yaml_scalar());
            out.push('\n');
        }
        out.push_str(DELIMITER);
        out.push('\n');
        out
    }
}

impl FromIterator<(String, Primitive)> for FrontMatter {
    fn from_iter<I: IntoIterator<Item = (String, Primitive)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Split off the first line, dropping its terminator
fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(i) => (s[..i].trim_end_matches('\r'), &s[i + 1..]),
        None => (s, ""),
    }
}

fn parse_fields(yaml: &str) -> Result<IndexMap<String, Primitive>, String> {
    let mut fields = IndexMap::new();
    if yaml.trim().is_empty() {
        return Ok(fields);
    }

    // Comment-only blocks come back as null
    let value: serde_yaml::Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
    let mapping = match value {
        serde_yaml::Value::Null => return Ok(fields),
        serde_yaml::Value::Mapping(mapping) => mapping,
        _ => return Err("front-matter is not a key/value mapping".to_string()),
    };

    for (key, value) in mapping {
        let key = match key {
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            _ => return Err("front-matter keys must be scalars".to_string()),
        };

        let primitive = match value {
            serde_yaml::Value::Null => continue,
            serde_yaml::Value::Bool(b) => Primitive::Bool(b),
            serde_yaml::Value::Number(n) => Primitive::Number(n),
            serde_yaml::Value::String(s) => {
                let date = if is_quoted(yaml, &key) || !is_yaml_timestamp(&s) {
                    None
                } else {
                    parse_date(&s)
                };
                match date {
                    Some(d) => Primitive::Date(d),
                    None => Primitive::String(s),
                }
            }
            _ => return Err(format!("field `{}` is not a scalar value", key)),
        };

        fields.insert(key, primitive);
    }

    Ok(fields)
}

/// Whether the value of a top-level key was written as a quoted scalar.
///
/// serde_yaml resolves `"2024-01-01"` and `2024-01-01` to the same string,
/// so the source line decides whether the author meant a date.
fn is_quoted(yaml: &str, key: &str) -> bool {
    let candidates = [
        key.to_string(),
        quote(key),
        format!("'{}'", key.replace('\'', "''")),
    ];

    yaml.lines().any(|line| {
        candidates.iter().any(|candidate| {
            line.strip_prefix(candidate.as_str())
                .and_then(|rest| rest.trim_start().strip_prefix(':'))
                .map(|value| {
                    let value = value.trim_start();
                    value.starts_with('"') || value.starts_with('\'')
                })
                .unwrap_or(false)
        })
    })
}

fn quote(s: &str) -> String {
    // Serializing a str cannot fail
    let json = serde_json::to_string(s).unwrap_or_default();

    // JSON leaves these raw; YAML reads them as line breaks or rejects them
    json.chars().fold(String::with_capacity(json.len()), |mut out, c| {
        if needs_yaml_escape(c) {
            out.push_str(&format!("\\u{:04X}", c as u32));
        } else {
            out.push(c);
        }
        out
    })
}

fn needs_yaml_escape(c: char) -> bool {
    matches!(
        c,
        '\u{7f}'..='\u{9f}' | '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}'
    )
}

fn yaml_key(key: &str) -> String {
    let reserved = ["true", "false", "null", "yes", "no", "on", "off", "y", "n"];
    let plain = key
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false)
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !reserved.contains(&key.to_ascii_lowercase().as_str());

    if plain {
        key.to_string()
    } else {
        quote(key)
    }
}
