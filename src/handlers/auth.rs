use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::auth::create_token;
use crate::database::models::UserNew;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::Validate;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/token - exchange credentials for a JWT
pub async fn token(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(creds) = payload?;
    let user = state.users.authenticate(&creds.username, &creds.password).await?;
    let token = create_token(&user)?;
    Ok(ApiResponse::success(json!({ "token": token })))
}

/// POST /auth/register - self sign-up; never grants admin
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<UserNew>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(mut data) = payload?;
    data.validate()?;
    data.is_admin = false;

    let user = state.users.register(data).await?;
    let token = create_token(&user)?;
    Ok(ApiResponse::created(json!({ "token": token })))
}
