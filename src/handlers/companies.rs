use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{CompanyFilter, CompanyNew, CompanyUpdate};
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::Validate;

/// GET /companies - optional `name`, `minEmployees`, `maxEmployees` filters
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<CompanyFilter>, QueryRejection>,
) -> ApiResult<Value> {
    let Query(filter) = query?;
    filter.validate()?;

    let companies = state.companies.find_all(Some(&filter)).await?;
    Ok(ApiResponse::success(json!({ "companies": companies })))
}

/// GET /companies/:handle
pub async fn get(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Value> {
    let company = state.companies.get(&handle).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// POST /companies
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CompanyNew>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(data) = payload?;
    data.validate()?;

    let company = state.companies.create(data).await?;
    Ok(ApiResponse::created(json!({ "company": company })))
}

/// PATCH /companies/:handle
pub async fn update(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    payload: Result<Json<CompanyUpdate>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(data) = payload?;
    data.validate()?;

    let company = state.companies.update(&handle, data.into_fields()).await?;
    Ok(ApiResponse::success(json!({ "company": company })))
}

/// DELETE /companies/:handle
pub async fn remove(State(state): State<AppState>, Path(handle): Path<String>) -> ApiResult<Value> {
    state.companies.remove(&handle).await?;
    Ok(ApiResponse::success(json!({ "deleted": handle })))
}
