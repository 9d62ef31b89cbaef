//! Regional news articles.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::domain::content::{
    ContentValidationError, Region, RegionFilter, TITLE_MAX, optional_url, required_text,
};
use crate::domain::UserId;

/// Database identifier of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArticleId(i64);

impl ArticleId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Editorial category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ArticleCategory {
    Store,
    Event,
    Interview,
    Column,
    #[default]
    Other,
}

impl ArticleCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Event => "event",
            Self::Interview => "interview",
            Self::Column => "column",
            Self::Other => "other",
        }
    }
}

impl FromStr for ArticleCategory {
    type Err = ContentValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "store" => Ok(Self::Store),
            "event" => Ok(Self::Event),
            "interview" => Ok(Self::Interview),
            "column" => Ok(Self::Column),
            "other" => Ok(Self::Other),
            other => Err(ContentValidationError::UnknownValue {
                field: "category",
                value: other.to_owned(),
            }),
        }
    }
}

/// A published article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    pub category: ArticleCategory,
    pub region: Region,
    pub image_url: Option<String>,
    pub author_id: Option<UserId>,
    pub view_count: i64,
    pub published_at: DateTime<Utc>,
}

/// Validated input for publishing an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub category: ArticleCategory,
    pub region: Region,
    pub image_url: Option<String>,
    pub author_id: Option<UserId>,
    pub published_at: DateTime<Utc>,
}

/// Unvalidated article fields as received from a client.
#[derive(Debug, Clone, Default)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub image_url: Option<String>,
}

impl NewArticle {
    /// Validate a draft, stamping author and publication time.
    pub fn from_draft(
        draft: ArticleDraft,
        author_id: UserId,
        published_at: DateTime<Utc>,
    ) -> Result<Self, ContentValidationError> {
        let category = draft
            .category
            .as_deref()
            .map(str::parse)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            title: required_text("title", &draft.title, Some(TITLE_MAX))?,
            content: required_text("content", &draft.content, None)?,
            category,
            region: Region::new(draft.prefecture, draft.city)?,
            image_url: optional_url("imageUrl", draft.image_url)?,
            author_id: Some(author_id),
            published_at,
        })
    }
}

/// Filters for listing articles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    pub region: RegionFilter,
    pub category: Option<ArticleCategory>,
}
