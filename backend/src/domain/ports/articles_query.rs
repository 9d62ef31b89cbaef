//! Driving port for reading articles.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Article, ArticleFilter, ArticleId, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticlesQuery: Send + Sync {
    /// Articles matching `filter`, newest first.
    async fn list(&self, filter: ArticleFilter, page: PageRequest) -> Result<Page<Article>, Error>;

    /// Fetch one article and count the view.
    async fn get(&self, id: ArticleId) -> Result<Article, Error>;
}

/// Article query used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureArticlesQuery;

#[async_trait]
impl ArticlesQuery for FixtureArticlesQuery {
    async fn list(
        &self,
        _filter: ArticleFilter,
        page: PageRequest,
    ) -> Result<Page<Article>, Error> {
        Ok(Page::from_overfetch(Vec::new(), page))
    }

    async fn get(&self, id: ArticleId) -> Result<Article, Error> {
        Err(Error::not_found(format!("article {id} not found")))
    }
}
