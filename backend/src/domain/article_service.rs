//! Article listing, reading, and publishing.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::access::authorize;
use crate::domain::ports::{
    ArticleRepository, ArticleRepositoryError, ArticlesCommand, ArticlesQuery, UserRepository,
};
use crate::domain::{
    Article, ArticleDraft, ArticleFilter, ArticleId, Error, NewArticle, Permission, UserId,
};

/// Article service implementing the article driving ports.
#[derive(Clone)]
pub struct ArticleService<A, U> {
    articles: Arc<A>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<A, U> ArticleService<A, U> {
    pub fn new(articles: Arc<A>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            articles,
            users,
            clock,
        }
    }
}

fn map_article_error(error: ArticleRepositoryError) -> Error {
    match error {
        ArticleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("article repository unavailable: {message}"))
        }
        ArticleRepositoryError::Query { message } => {
            Error::internal(format!("article repository error: {message}"))
        }
    }
}

#[async_trait]
impl<A, U> ArticlesQuery for ArticleService<A, U>
where
    A: ArticleRepository,
    U: UserRepository,
{
    async fn list(&self, filter: ArticleFilter, page: PageRequest) -> Result<Page<Article>, Error> {
        let rows = self
            .articles
            .list(&filter, page)
            .await
            .map_err(map_article_error)?;
        Ok(Page::from_overfetch(rows, page))
    }

    async fn get(&self, id: ArticleId) -> Result<Article, Error> {
        self.articles
            .find_and_record_view(id)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found(format!("article {id} not found")))
    }
}

#[async_trait]
impl<A, U> ArticlesCommand for ArticleService<A, U>
where
    A: ArticleRepository,
    U: UserRepository,
{
    async fn create(&self, actor: &UserId, draft: ArticleDraft) -> Result<Article, Error> {
        authorize(self.users.as_ref(), actor, Permission::CreateArticles).await?;
        let article = NewArticle::from_draft(draft, *actor, self.clock.utc())?;
        let created = self
            .articles
            .insert(&article)
            .await
            .map_err(map_article_error)?;
        info!(article_id = %created.id, author = %actor, "article published");
        Ok(created)
    }
}
