// Data models for the book tracker

use crate::record::Record;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Displayed in place of a missing genre
pub const UNSPECIFIED_GENRE: &str = "Unspecified";

/// Displayed in place of a missing publication date
pub const UNSPECIFIED_DATE: &str = "Not specified";

/// Server-assigned book identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub i64);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for BookId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A persisted book entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub published_date: Option<NaiveDate>,
    #[serde(default)]
    pub genre: Option<String>,
}

impl Book {
    /// Mutable fields of this book, without the identifier
    pub fn to_draft(&self) -> BookDraft {
        BookDraft {
            title: self.title.clone(),
            author: self.author.clone(),
            published_date: self.published_date,
            genre: self.genre.clone(),
        }
    }

    /// An empty genre counts as unspecified
    pub fn genre_label(&self) -> &str {
        self.genre.as_deref().filter(|genre| !genre.is_empty()).unwrap_or(UNSPECIFIED_GENRE)
    }
}

impl Record for Book {
    type Id = BookId;
    type Draft = BookDraft;

    fn id(&self) -> BookId {
        self.id
    }

    fn collection_name() -> &'static str {
        "books"
    }
}

/// A book payload that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub published_date: Option<NaiveDate>,
    pub genre: Option<String>,
}

impl BookDraft {
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            published_date: self.published_date,
            genre: self.genre,
        }
    }
}

/// How publication dates are spelled out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `Aug 1, 1965`
    Short,
    /// `August 1, 1965`
    Long,
}

pub fn format_date(date: Option<NaiveDate>, style: DateStyle) -> String {
    match (date, style) {
        (None, _) => UNSPECIFIED_DATE.to_string(),
        (Some(date), DateStyle::Short) => date.format("%b %-d, %Y").to_string(),
        (Some(date), DateStyle::Long) => date.format("%B %-d, %Y").to_string(),
    }
}
