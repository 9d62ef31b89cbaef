//! Driven port for article persistence.
use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Article, ArticleFilter, ArticleId, NewArticle};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by article repository adapters.
    pub enum ArticleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "article repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "article repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Newest first, fetching up to [`PageRequest::overfetch_limit`] rows.
    async fn list(
        &self,
        filter: &ArticleFilter,
        page: PageRequest,
    ) -> Result<Vec<Article>, ArticleRepositoryError>;

    /// Increment the view counter and return the updated article.
    async fn find_and_record_view(
        &self,
        id: ArticleId,
    ) -> Result<Option<Article>, ArticleRepositoryError>;

    async fn insert(&self, article: &NewArticle) -> Result<Article, ArticleRepositoryError>;
}
