// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::ExtractionJob;
use crate::presentation::errors::AppError;
use crate::queue::job_queue::JobQueue;
use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// 律师检索触发请求
#[derive(Debug, Deserialize)]
pub struct AdvocateExtractRequestDto {
    /// 律师姓名，缺失或空白时使用默认示例姓名
    pub advocate_name: Option<String>,
}

/// 任务受理响应
#[derive(Debug, Serialize)]
pub struct JobAcceptedDto {
    pub success: bool,
    pub job_id: Uuid,
    pub job_type: String,
    pub status: String,
    pub idempotency_key: String,
}

impl JobAcceptedDto {
    fn from_job(job: &ExtractionJob) -> Self {
        Self {
            success: true,
            job_id: job.id,
            job_type: job.job_type.to_string(),
            status: job.status.to_string(),
            idempotency_key: job.idempotency_key.clone(),
        }
    }
}

/// 触发一次按需的实时状态提取
pub async fn trigger_live_status(
    Extension(queue): Extension<Arc<dyn JobQueue>>,
) -> Result<(StatusCode, Json<JobAcceptedDto>), AppError> {
    let job = ExtractionJob::live_status();
    let enqueued = queue.enqueue(job).await?;
    Ok((StatusCode::ACCEPTED, Json(JobAcceptedDto::from_job(&enqueued))))
}

/// 触发一次律师检索提取
///
/// 同名律师的重复触发各自入队，幂等键含时间戳不会冲突
pub async fn trigger_advocate_search(
    Extension(queue): Extension<Arc<dyn JobQueue>>,
    Json(request): Json<AdvocateExtractRequestDto>,
) -> Result<(StatusCode, Json<JobAcceptedDto>), AppError> {
    let name = request.advocate_name.unwrap_or_default();
    let job = ExtractionJob::advocate_search(&name);
    let enqueued = queue.enqueue(job).await?;
    Ok((StatusCode::ACCEPTED, Json(JobAcceptedDto::from_job(&enqueued))))
}
