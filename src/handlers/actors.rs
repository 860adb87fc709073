use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};

use crate::database::models::Actor;
use crate::error::ApiError;
use crate::AppState;

use super::{int_field, parse_id, require_body, text_field};

/// GET /actors - list the full roster.
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let actors = Actor::find_all(&state.pool).await?;

    Ok(Json(json!({
        "success": true,
        "actors": actors
    })))
}

/// POST /actors - add an actor. `name` is required and must be non-blank;
/// `age` and `gender` are optional.
pub async fn create(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let body = require_body(body)?;

    let name = body
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("name is required"))?;
    let age = int_field(&body, "age");
    let gender = text_field(&body, "gender");

    let actor = Actor::insert(&state.pool, name, age, gender).await?;

    Ok(Json(json!({
        "success": true,
        "actor": actor
    })))
}

/// PATCH /actors/:actor_id - partial update of name, age, gender.
///
/// Fields absent from the body keep their stored values; a blank `name`
/// is ignored rather than persisted. A request without a body is a no-op
/// that returns the stored row.
pub async fn update(
    State(state): State<AppState>,
    Path(actor_id): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&actor_id)?;

    let mut actor = Actor::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("resource not found"))?;

    if let Some(Json(body)) = body {
        if let Some(name) = body.get("name").and_then(Value::as_str) {
            if !name.trim().is_empty() {
                actor.name = name.to_string();
            }
        }
        if let Some(age) = int_field(&body, "age") {
            actor.age = Some(age);
        }
        if let Some(gender) = text_field(&body, "gender") {
            actor.gender = Some(gender.to_string());
        }
    }

    let actor = actor.update(&state.pool).await?;

    Ok(Json(json!({
        "success": true,
        "actor": actor
    })))
}

/// DELETE /actors/:actor_id - remove an actor, echoing the deleted id.
pub async fn delete(
    State(state): State<AppState>,
    Path(actor_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&actor_id)?;

    if !Actor::delete(&state.pool, id).await? {
        return Err(ApiError::not_found("resource not found"));
    }

    Ok(Json(json!({
        "success": true,
        "delete": id
    })))
}
