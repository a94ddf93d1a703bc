// Stream comments handed to the encoder at creation
//
// Comments are Vorbis-style TAG=value pairs. The encoder serializes them into
// the OpusTags header; this module only collects and validates them.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommentError {
    #[error("expected TAG=VALUE, got `{0}`")]
    MissingSeparator(String),
    #[error("invalid tag name `{0}`")]
    InvalidTag(String),
}

/// Common comment tag names
pub struct RecommendedTags;
impl RecommendedTags {
    pub const TITLE: &'static str = "TITLE";
    pub const ARTIST: &'static str = "ARTIST";
    pub const ALBUM: &'static str = "ALBUM";
    pub const DATE: &'static str = "DATE";
    pub const TRACKNUMBER: &'static str = "TRACKNUMBER";
    pub const GENRE: &'static str = "GENRE";
    pub const COMMENT: &'static str = "COMMENT";
}

/// A single TAG=value pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentEntry {
    pub tag: String,
    pub value: String,
}

impl CommentEntry {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Result<Self, CommentError> {
        let tag = tag.into();
        if !is_valid_tag(&tag) {
            return Err(CommentError::InvalidTag(tag));
        }
        Ok(CommentEntry {
            tag,
            value: value.into(),
        })
    }
}

impl FromStr for CommentEntry {
    type Err = CommentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((tag, value)) => CommentEntry::new(tag, value),
            None => Err(CommentError::MissingSeparator(s.to_string())),
        }
    }
}

impl fmt::Display for CommentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.tag, self.value)
    }
}

/// Field names are printable ASCII 0x20..=0x7D without '='
fn is_valid_tag(tag: &str) -> bool {
    !tag.is_empty() && tag.bytes().all(|b| (0x20..=0x7d).contains(&b) && b != b'=')
}

/// Ordered list of stream comments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Comments {
    entries: Vec<CommentEntry>,
}

impl Comments {
    pub fn new() -> Self {
        Comments::default()
    }

    /// Tags written when the caller provides none
    pub fn with_defaults() -> Self {
        let mut comments = Comments::new();
        comments.entries.push(CommentEntry {
            tag: RecommendedTags::ARTIST.to_string(),
            value: "Someone".to_string(),
        });
        comments.entries.push(CommentEntry {
            tag: RecommendedTags::TITLE.to_string(),
            value: "Some track".to_string(),
        });
        comments
    }

    /// Append a comment. Repeated tags are allowed and kept in order.
    pub fn add(&mut self, tag: &str, value: &str) -> Result<&mut Self, CommentError> {
        self.entries.push(CommentEntry::new(tag, value)?);
        Ok(self)
    }

    /// First value for `tag`, compared case-insensitively
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.tag.eq_ignore_ascii_case(tag))
            .map(|e| e.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommentEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<CommentEntry> for Comments {
    fn from_iter<I: IntoIterator<Item = CommentEntry>>(iter: I) -> Self {
        Comments {
            entries: iter.into_iter().collect(),
        }
    }
}
