//! PostgreSQL-backed `ArticleRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{ArticleRepository, ArticleRepositoryError};
use crate::domain::{Article, ArticleFilter, ArticleId, NewArticle};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::{collect_rows, page_bounds};
use super::models::{ArticleRow, NewArticleRow};
use super::pool::{DbPool, PoolError};
use super::schema::articles;

/// Diesel-backed implementation of the `ArticleRepository` port.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ArticleRepositoryError {
    map_basic_pool_error(error, |message| ArticleRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ArticleRepositoryError {
    map_basic_diesel_error(
        error,
        |message| ArticleRepositoryError::query(message),
        |message| ArticleRepositoryError::connection(message),
    )
}

fn row_to_article(row: ArticleRow) -> Result<Article, ArticleRepositoryError> {
    Article::try_from(row).map_err(|message| ArticleRepositoryError::query(message))
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn list(
        &self,
        filter: &ArticleFilter,
        page: PageRequest,
    ) -> Result<Vec<Article>, ArticleRepositoryError> {
        let (limit, offset) =
            page_bounds(page).map_err(|message| ArticleRepositoryError::query(message))?;
        let mut query = articles::table.into_boxed();
        if let Some(prefecture) = filter.region.prefecture.as_deref() {
            query = query.filter(articles::prefecture.eq(prefecture));
        }
        if let Some(city) = filter.region.city.as_deref() {
            query = query.filter(articles::city.eq(city));
        }
        if let Some(category) = filter.category {
            query = query.filter(articles::category.eq(category.as_str()));
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ArticleRow> = query
            .select(ArticleRow::as_select())
            .order_by((articles::published_at.desc(), articles::id.desc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        collect_rows(rows, |message| ArticleRepositoryError::query(message))
    }

    async fn find_and_record_view(
        &self,
        id: ArticleId,
    ) -> Result<Option<Article>, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // A single UPDATE keeps concurrent views from losing increments.
        diesel::update(articles::table.filter(articles::id.eq(id.get())))
            .set(articles::view_count.eq(articles::view_count + 1))
            .returning(ArticleRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_article)
            .transpose()
    }

    async fn insert(&self, article: &NewArticle) -> Result<Article, ArticleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: ArticleRow = diesel::insert_into(articles::table)
            .values(NewArticleRow::from(article))
            .returning(ArticleRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_article(row)
    }
}
