// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::run_log::RunLog;
use crate::domain::repositories::run_log_repository::RunLogRepository;
use crate::presentation::errors::AppError;
use axum::{
    extract::{Extension, Query},
    Json,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_LIMIT: u64 = 50;
const MAX_LIMIT: u64 = 200;

/// 运行日志查询参数
#[derive(Debug, Deserialize)]
pub struct RunLogQueryDto {
    pub court_id: Option<Uuid>,
    pub limit: Option<u64>,
}

/// 运行日志条目
#[derive(Debug, Serialize)]
pub struct RunLogDto {
    pub id: Uuid,
    pub court_id: Uuid,
    pub status: String,
    pub started_at: DateTime<FixedOffset>,
    pub completed_at: Option<DateTime<FixedOffset>>,
    pub records_extracted: i32,
    pub error_message: Option<String>,
    pub duration_ms: Option<i64>,
}

impl From<RunLog> for RunLogDto {
    fn from(log: RunLog) -> Self {
        let duration_ms = log.duration_ms();
        Self {
            id: log.id,
            court_id: log.court_id,
            status: log.status.to_string(),
            started_at: log.started_at,
            completed_at: log.completed_at,
            records_extracted: log.records_extracted,
            error_message: log.error_message,
            duration_ms,
        }
    }
}

/// 运行日志响应
#[derive(Debug, Serialize)]
pub struct RunLogListDto {
    pub success: bool,
    pub data: Vec<RunLogDto>,
}

/// 查询最近的运行日志，最新在前
pub async fn list_run_logs(
    Extension(run_log_repo): Extension<Arc<dyn RunLogRepository>>,
    Query(query): Query<RunLogQueryDto>,
) -> Result<Json<RunLogListDto>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let logs = run_log_repo.list_recent(query.court_id, limit).await?;

    Ok(Json(RunLogListDto {
        success: true,
        data: logs.into_iter().map(Into::into).collect(),
    }))
}
