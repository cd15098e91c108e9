//! 核心错误处理模块

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::PoisonError;
use tracing::error;

/// 核心错误类型，在请求边界统一转换为 HTTP 响应
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// 缺少必填字段或字段取值非法
    #[error("{0}")]
    Validation(String),
    /// 用户名或邮箱已被占用
    #[error("{0}")]
    Conflict(String),
    /// 用户名/密码组合不存在，不区分是哪一项错误
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// 请求体超过上传大小上限
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl CoreError {
    pub fn missing_fields(fields: &[&str]) -> Self {
        CoreError::Validation(format!("Missing required fields: {}", fields.join(", ")))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::Validation(_) | CoreError::InvalidCredentials => StatusCode::BAD_REQUEST,
            CoreError::Conflict(_) => StatusCode::CONFLICT,
            CoreError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::Conflict(_) => "CONFLICT",
            CoreError::InvalidCredentials => "INVALID_CREDENTIALS",
            CoreError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            CoreError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            CoreError::Internal(detail) => {
                // 内部细节只写日志，不回传给客户端
                error!("请求处理失败: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let error_response = ErrorResponse {
            error: self.kind().to_string(),
            message,
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl<T> From<PoisonError<T>> for CoreError {
    fn from(err: PoisonError<T>) -> Self {
        CoreError::Internal(format!("存储锁已损坏: {}", err))
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Internal(format!("文件操作失败: {}", err))
    }
}

/// 按 axum 给出的状态码区分超限与其它读取失败
fn client_error(status: StatusCode, body_text: String) -> CoreError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        CoreError::PayloadTooLarge(format!("Request body too large: {}", body_text))
    } else {
        CoreError::Validation(body_text)
    }
}

impl From<JsonRejection> for CoreError {
    fn from(rejection: JsonRejection) -> Self {
        client_error(rejection.status(), rejection.body_text())
    }
}

impl From<MultipartRejection> for CoreError {
    fn from(rejection: MultipartRejection) -> Self {
        CoreError::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for CoreError {
    fn from(err: MultipartError) -> Self {
        client_error(err.status(), err.body_text())
    }
}
