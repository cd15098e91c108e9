//! 账户处理器

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use super::model::{LoginRequest, LoginResponse, RegisterRequest};
use crate::app::AppState;
use crate::core::{error::CoreError, response::MessageResponse};

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), CoreError> {
    let Json(request) = payload?;

    let username = state.accounts.register(request).inspect_err(|e| {
        if matches!(e, CoreError::Conflict(_)) {
            warn!("注册冲突: 用户名或邮箱已存在");
        }
    })?;
    info!(%username, "新用户注册成功");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, CoreError> {
    let Json(request) = payload?;

    let username = state.accounts.authenticate(request)?;
    info!(%username, "用户登录成功");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        username,
    }))
}
