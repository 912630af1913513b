// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::hearing::HearingRecord;
use crate::domain::repositories::hearing_repository::{HearingQueryParams, HearingRepository};
use crate::presentation::errors::AppError;
use axum::{
    extract::{Extension, Query},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const DEFAULT_LIMIT: u64 = 50;
const MAX_LIMIT: u64 = 200;

/// 听证查询参数
#[derive(Debug, Deserialize)]
pub struct HearingQueryDto {
    pub court_id: Option<Uuid>,
    pub case_number: Option<String>,
    pub advocate: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// 听证查询响应
#[derive(Debug, Serialize)]
pub struct HearingListDto {
    pub success: bool,
    pub data: Vec<HearingRecord>,
    pub total: u64,
    pub has_more: bool,
}

/// 查询听证记录
///
/// 按听证日期倒序、案件编号正序分页返回
pub async fn list_hearings(
    Extension(hearing_repo): Extension<Arc<dyn HearingRepository>>,
    Query(query): Query<HearingQueryDto>,
) -> Result<Json<HearingListDto>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let (records, total) = hearing_repo
        .query(HearingQueryParams {
            court_id: query.court_id,
            case_number: query.case_number,
            advocate: query.advocate,
            date_from: query.from,
            date_to: query.to,
            limit,
            offset,
        })
        .await?;

    let has_more = offset + limit < total;
    Ok(Json(HearingListDto {
        success: true,
        data: records,
        total,
        has_more,
    }))
}
