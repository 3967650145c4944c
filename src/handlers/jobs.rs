use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{JobFilter, JobNew, JobUpdate};
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::Validate;

/// GET /jobs - optional `title`, `minSalary`, `hasEquity`, `companyHandle` filters
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<JobFilter>, QueryRejection>,
) -> ApiResult<Value> {
    let Query(filter) = query?;
    filter.validate()?;

    let jobs = state.jobs.find_all(Some(&filter)).await?;
    Ok(ApiResponse::success(json!({ "jobs": jobs })))
}

/// GET /jobs/:id
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    let job = state.jobs.get(id).await?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// POST /jobs
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<JobNew>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(data) = payload?;
    data.validate()?;

    let job = state.jobs.create(data).await?;
    Ok(ApiResponse::created(json!({ "job": job })))
}

/// PATCH /jobs/:id
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<JobUpdate>, JsonRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    let Json(data) = payload?;
    data.validate()?;

    let job = state.jobs.update(id, data.into_fields()).await?;
    Ok(ApiResponse::success(json!({ "job": job })))
}

/// DELETE /jobs/:id
pub async fn remove(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Value> {
    let Path(id) = path?;
    state.jobs.remove(id).await?;
    Ok(ApiResponse::success(json!({ "deleted": id })))
}
