//! Driving port for publishing articles.

use async_trait::async_trait;

use crate::domain::{Article, ArticleDraft, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticlesCommand: Send + Sync {
    /// Publish an article; requires the `create_articles` permission.
    async fn create(&self, actor: &UserId, draft: ArticleDraft) -> Result<Article, Error>;
}

/// Article command used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureArticlesCommand;

#[async_trait]
impl ArticlesCommand for FixtureArticlesCommand {
    async fn create(&self, _actor: &UserId, _draft: ArticleDraft) -> Result<Article, Error> {
        Err(Error::service_unavailable("article store is not configured"))
    }
}
