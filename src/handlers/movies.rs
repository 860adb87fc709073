use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::database::models::Movie;
use crate::error::ApiError;
use crate::AppState;

use super::{parse_id, require_body, text_field};

/// GET /movies - list the full catalogue.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let movies = Movie::find_all(&state.pool).await?;

    Ok(Json(json!({
        "success": true,
        "movies": movies
    })))
}

/// POST /movies - add a movie. `title` is required and must be non-blank;
/// `release_date` is optional free-form text.
pub async fn create(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let body = require_body(body)?;

    let title = body
        .get("title")
        .and_then(Value::as_str)
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("title is required"))?;
    let release_date = text_field(&body, "release_date");

    let movie = Movie::insert(&state.pool, title, release_date).await?;

    Ok(Json(json!({
        "success": true,
        "movie": movie
    })))
}

/// PATCH /movies/:movie_id - partial update of title and release_date.
///
/// The id is resolved before the body is examined, so an unknown id is
/// 404 even when the body is also missing. A blank `title` is ignored
/// rather than persisted.
pub async fn update(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&movie_id)?;

    let mut movie = Movie::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("resource not found"))?;

    let body = require_body(body)?;

    if let Some(title) = body.get("title").and_then(Value::as_str) {
        if !title.trim().is_empty() {
            movie.title = title.to_string();
        }
    }
    if let Some(release_date) = text_field(&body, "release_date") {
        movie.release_date = Some(release_date.to_string());
    }

    let movie = movie.update(&state.pool).await?;

    Ok(Json(json!({
        "success": true,
        "movie": movie
    })))
}

/// DELETE /movies/:movie_id - remove a movie, echoing the deleted id.
pub async fn delete(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&movie_id)?;

    if !Movie::delete(&state.pool, id).await? {
        return Err(ApiError::not_found("resource not found"));
    }

    Ok(Json(json!({
        "success": true,
        "delete": id
    })))
}
