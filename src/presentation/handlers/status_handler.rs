// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::hall_status::CourtHallStatus;
use crate::domain::repositories::hall_status_repository::HallStatusRepository;
use crate::presentation::errors::AppError;
use axum::{
    extract::{Extension, Query},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const DEFAULT_LIMIT: u64 = 100;
const MAX_LIMIT: u64 = 500;

/// 上传状态查询参数
#[derive(Debug, Deserialize)]
pub struct StatusQueryDto {
    /// 按状态所属日期过滤
    pub status_date: Option<NaiveDate>,
    pub limit: Option<u64>,
}

/// 上传状态响应
#[derive(Debug, Serialize)]
pub struct StatusListDto {
    pub success: bool,
    pub data: Vec<CourtHallStatus>,
}

/// 查询排期表上传状态
pub async fn list_statuses(
    Extension(hall_status_repo): Extension<Arc<dyn HallStatusRepository>>,
    Query(query): Query<StatusQueryDto>,
) -> Result<Json<StatusListDto>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let statuses = hall_status_repo.list(query.status_date, limit).await?;

    Ok(Json(StatusListDto {
        success: true,
        data: statuses,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_accepts_status_date_parameter() {
        let query: StatusQueryDto =
            serde_json::from_value(serde_json::json!({ "status_date": "2026-02-23" })).unwrap();
        assert_eq!(
            query.status_date,
            Some(NaiveDate::from_ymd_opt(2026, 2, 23).unwrap())
        );
        assert_eq!(query.limit, None);
    }
}
