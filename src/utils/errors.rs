// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

/// Worker错误类型
///
/// 提取任务执行过程中的错误分类，决定失败是否计入重试预算
#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("仓库错误: {0}")]
    RepositoryError(String),

    #[error("提取错误: {0}")]
    ExtractionError(String),

    #[error("队列错误: {0}")]
    QueueError(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

impl From<crate::domain::repositories::job_repository::RepositoryError> for WorkerError {
    fn from(e: crate::domain::repositories::job_repository::RepositoryError) -> Self {
        WorkerError::RepositoryError(e.to_string())
    }
}

impl From<crate::extract::ExtractError> for WorkerError {
    fn from(e: crate::extract::ExtractError) -> Self {
        WorkerError::ExtractionError(e.to_string())
    }
}
