//! Catalog and gated content HTTP handlers.
//!
//! - GET /api/catalog - the public course catalog
//! - GET /api/access  - entitlement listing for the resolved identity
//! - GET /api/lessons - lesson listing for a purchased block

use axum::{
    Json,
    extract::{Query, State},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::{
    catalog::Catalog,
    entitlements,
    error::AppError,
    middleware::auth::token_from_jar,
    models::{auth::AccessResponse, lesson::{Lesson, LessonResponse}},
    services::access_service,
    state::AppState,
};

/// The course catalog.
///
/// # Endpoint
///
/// `GET /api/catalog`
///
/// Public and read-only; the catalog is loaded at process start and never
/// mutated.
pub async fn get_catalog(State(state): State<AppState>) -> Json<Catalog> {
    Json((*state.catalog).clone())
}

/// The caller's entitlement listing.
///
/// # Endpoint
///
/// `GET /api/access`
///
/// # Response
///
/// ```json
/// { "allowed": ["course-2-block-1"] }
/// ```
///
/// Anonymous callers get an empty list, never an error — absence of
/// credentials is a normal state.
pub async fn access_list(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<AccessResponse>, AppError> {
    let token = token_from_jar(&jar);
    let auth = access_service::authorize(&state.pool, token.as_deref()).await?;

    let mut allowed: Vec<String> = auth.entitlements().into_iter().collect();
    allowed.sort();

    Ok(Json(AccessResponse { allowed }))
}

/// Query parameters for the lessons endpoint.
#[derive(Debug, Deserialize)]
pub struct LessonsQuery {
    pub block_id: String,
}

/// Lessons of a purchased block.
///
/// # Endpoint
///
/// `GET /api/lessons?block_id=course-1-block-2`
///
/// # Authorization
///
/// The resolved identity must hold the block itself or the course's full
/// bundle. Anyone else — anonymous included — gets 403 `not_entitled`, and
/// the client degrades to its locked state.
///
/// # Response
///
/// Lessons in position order:
///
/// ```json
/// [ { "title": "...", "video_url": "...", "position": 1 } ]
/// ```
pub async fn list_lessons(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<LessonsQuery>,
) -> Result<Json<Vec<LessonResponse>>, AppError> {
    if query.block_id.is_empty() {
        return Err(AppError::InvalidRequest("Missing block_id".to_string()));
    }

    let token = token_from_jar(&jar);
    let auth = access_service::authorize(&state.pool, token.as_deref()).await?;

    if !entitlements::has_access(&auth.entitlements(), &query.block_id) {
        return Err(AppError::NotEntitled);
    }

    let lessons = sqlx::query_as::<_, Lesson>(
        r#"
        SELECT id, block_id, title, video_url, position
        FROM lessons
        WHERE block_id = $1
        ORDER BY position ASC
        "#,
    )
    .bind(&query.block_id)
    .fetch_all(&state.pool)
    .await?;

    let responses: Vec<LessonResponse> = lessons.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}
