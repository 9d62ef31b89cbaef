//! Article API handlers.
//!
//! ```text
//! GET /api/v1/articles?prefecture=東京都&category=store&limit=20
//! GET /api/v1/articles/{id}
//! POST /api/v1/articles {"title":"New bakery","content":"...","category":"store"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{ArticleDraft, ArticleFilter, ArticleId, Error, RegionFilter};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{ArticleResponse, PageResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_category, parse_page,
};

/// Query parameters for `GET /api/v1/articles`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListQuery {
    pub prefecture: Option<String>,
    pub city: Option<String>,
    /// One of `store`, `event`, `interview`, `column`, `other`.
    pub category: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<i64>,
}

/// Request body for `POST /api/v1/articles`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[schema(example = "store")]
    pub category: Option<String>,
    pub prefecture: Option<String>,
    pub city: Option<String>,
    pub image_url: Option<String>,
}

impl TryFrom<CreateArticleRequest> for ArticleDraft {
    type Error = Error;

    fn try_from(value: CreateArticleRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value
                .title
                .ok_or_else(|| missing_field_error(FieldName::new("title")))?,
            content: value
                .content
                .ok_or_else(|| missing_field_error(FieldName::new("content")))?,
            category: value.category,
            prefecture: value.prefecture,
            city: value.city,
            image_url: value.image_url,
        })
    }
}

/// List published articles, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/articles",
    params(ArticleListQuery),
    responses(
        (status = 200, description = "Articles", body = PageResponse<ArticleResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["articles"],
    operation_id = "listArticles",
    security([])
)]
#[get("/articles")]
pub async fn list_articles(
    state: web::Data<HttpState>,
    query: web::Query<ArticleListQuery>,
) -> ApiResult<web::Json<PageResponse<ArticleResponse>>> {
    let query = query.into_inner();
    let page = parse_page(query.limit, query.offset)?;
    let filter = ArticleFilter {
        region: RegionFilter {
            prefecture: query.prefecture,
            city: query.city,
        },
        category: parse_category(query.category, FieldName::new("category"))?,
    };
    let articles = state.articles.list(filter, page).await?;
    Ok(web::Json(PageResponse::from_page(articles)))
}

/// Fetch one article; each fetch counts as a view.
#[utoipa::path(
    get,
    path = "/api/v1/articles/{id}",
    params(("id" = i64, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article", body = ArticleResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["articles"],
    operation_id = "getArticle",
    security([])
)]
#[get("/articles/{id}")]
pub async fn get_article(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ArticleResponse>> {
    let article = state.articles.get(ArticleId::new(path.into_inner())).await?;
    Ok(web::Json(ArticleResponse::from(article)))
}

/// Publish an article. Requires the `create_articles` permission.
#[utoipa::path(
    post,
    path = "/api/v1/articles",
    request_body = CreateArticleRequest,
    responses(
        (status = 201, description = "Article published", body = ArticleResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["articles"],
    operation_id = "createArticle"
)]
#[post("/articles")]
pub async fn create_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateArticleRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let draft = ArticleDraft::try_from(payload.into_inner())?;
    let article = state.articles_command.create(&user_id, draft).await?;
    Ok(HttpResponse::Created().json(ArticleResponse::from(article)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::{TimeZone, Utc};
    use pagination::Page;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::ports::{MockArticlesCommand, MockArticlesQuery};
    use crate::domain::{Article, ArticleCategory, Region, UserId};
    use crate::inbound::http::test_utils::{session_cookie, test_app};

    fn article(id: i64) -> Article {
        Article {
            id: ArticleId::new(id),
            title: "New bakery in Sakyo".to_owned(),
            content: "Fresh bread every morning.".to_owned(),
            category: ArticleCategory::Store,
            region: Region {
                prefecture: Some("京都府".to_owned()),
                city: Some("京都市".to_owned()),
            },
            image_url: None,
            author_id: None,
            view_count: 3,
            published_at: Utc
                .with_ymd_and_hms(2026, 4, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    fn author() -> UserId {
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id")
    }

    #[actix_web::test]
    async fn list_passes_filters_and_page() {
        let mut query = MockArticlesQuery::new();
        query
            .expect_list()
            .withf(|filter, page| {
                filter.region.prefecture.as_deref() == Some("京都府")
                    && filter.category == Some(ArticleCategory::Store)
                    && page.limit() == 1
            })
            .times(1)
            .returning(|_, page| Ok(Page::from_overfetch(vec![article(2), article(1)], page)));
        let state = HttpState {
            articles: Arc::new(query),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(
            test_app(state).service(web::scope("/api/v1").service(list_articles)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/articles?prefecture=%E4%BA%AC%E9%83%BD%E5%BA%9C&category=store&limit=1")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["items"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["items"][0]["viewCount"], 3);
        assert_eq!(body["nextOffset"], 1);
    }

    #[rstest]
    #[case("/api/v1/articles?category=gossip", "category")]
    #[case("/api/v1/articles?limit=0", "limit")]
    #[case("/api/v1/articles?offset=-5", "offset")]
    #[actix_web::test]
    async fn list_rejects_bad_query(#[case] uri: &str, #[case] field: &str) {
        let app = actix_test::init_service(
            test_app(HttpState::fixtures()).service(web::scope("/api/v1").service(list_articles)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(uri).to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn unknown_article_is_not_found() {
        let app = actix_test::init_service(
            test_app(HttpState::fixtures()).service(web::scope("/api/v1").service(get_article)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/articles/99").to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn create_requires_session() {
        let app = actix_test::init_service(
            test_app(HttpState::fixtures()).service(web::scope("/api/v1").service(create_article)),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/articles")
                .set_json(json!({"title": "t", "content": "c"}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn create_reports_missing_title() {
        let app = actix_test::init_service(
            test_app(HttpState::fixtures()).service(web::scope("/api/v1").service(create_article)),
        )
        .await;
        let cookie = session_cookie(&app, &author()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/articles")
                .cookie(cookie)
                .set_json(json!({"content": "c"}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], "title");
        assert_eq!(body["details"]["code"], "missing_field");
    }

    #[actix_web::test]
    async fn forbidden_author_gets_403() {
        let mut command = MockArticlesCommand::new();
        command
            .expect_create()
            .times(1)
            .returning(|_, _| Err(Error::forbidden("missing permission: create_articles")));
        let state = HttpState {
            articles_command: Arc::new(command),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(
            test_app(state).service(web::scope("/api/v1").service(create_article)),
        )
        .await;
        let cookie = session_cookie(&app, &author()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/articles")
                .cookie(cookie)
                .set_json(json!({"title": "t", "content": "c"}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn create_returns_201() {
        let mut command = MockArticlesCommand::new();
        command
            .expect_create()
            .withf(|actor, draft| *actor == author() && draft.category.as_deref() == Some("store"))
            .times(1)
            .returning(|_, _| Ok(article(7)));
        let state = HttpState {
            articles_command: Arc::new(command),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(
            test_app(state).service(web::scope("/api/v1").service(create_article)),
        )
        .await;
        let cookie = session_cookie(&app, &author()).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/articles")
                .cookie(cookie)
                .set_json(json!({"title": "t", "content": "c", "category": "store"}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["id"], 7);
        assert_eq!(body["category"], "store");
    }
}
