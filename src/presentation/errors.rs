// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::repositories::job_repository::RepositoryError;
use crate::queue::job_queue::QueueError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，提供统一的错误处理接口
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        let status = if let Some(queue_err) = self.0.downcast_ref::<QueueError>() {
            match queue_err {
                // 队列存储不可达时如实返回服务不可用，而不是伪装成参数错误
                QueueError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
                QueueError::NotFound => StatusCode::NOT_FOUND,
            }
        } else {
            match self.0.downcast_ref::<RepositoryError>() {
                Some(RepositoryError::Database(_db_err)) => StatusCode::INTERNAL_SERVER_ERROR,
                Some(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
                None => {
                    if error_message.contains("cannot be empty")
                        || error_message.contains("invalid")
                        || error_message.contains("required")
                    {
                        StatusCode::BAD_REQUEST
                    } else {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                }
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
