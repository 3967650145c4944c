use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::create_token;
use crate::database::models::{UserNew, UserUpdate};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::validation::Validate;

/// POST /users - admin-created accounts, which may themselves be admins
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<UserNew>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(data) = payload?;
    data.validate()?;

    let user = state.users.register(data).await?;
    let token = create_token(&user)?;
    Ok(ApiResponse::created(json!({ "user": user, "token": token })))
}

/// GET /users
pub async fn list(State(state): State<AppState>) -> ApiResult<Value> {
    let users = state.users.find_all().await?;
    Ok(ApiResponse::success(json!({ "users": users })))
}

/// GET /users/:username
pub async fn get(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<Value> {
    let user = state.users.get(&username).await?;
    Ok(ApiResponse::success(json!({ "user": user })))
}

/// PATCH /users/:username - only admins may change `isAdmin`
pub async fn update(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(username): Path<String>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(data) = payload?;
    if data.is_admin.is_some() && !caller.is_admin {
        return Err(ApiError::forbidden("Only admins may change isAdmin"));
    }
    data.validate()?;

    let user = state.users.update(&username, data.into_fields()).await?;
    Ok(ApiResponse::success(json!({ "user": user })))
}

/// DELETE /users/:username
pub async fn remove(State(state): State<AppState>, Path(username): Path<String>) -> ApiResult<Value> {
    state.users.remove(&username).await?;
    Ok(ApiResponse::success(json!({ "deleted": username })))
}

/// POST /users/:username/jobs/:id
pub async fn apply(
    State(state): State<AppState>,
    path: Result<Path<(String, i32)>, PathRejection>,
) -> ApiResult<Value> {
    let Path((username, id)) = path?;
    state.users.apply_to_job(&username, id).await?;
    Ok(ApiResponse::success(json!({ "applied": id })))
}
