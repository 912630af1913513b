// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::hall_status::{CourtHallStatus, HallStatusCandidate};
use crate::domain::repositories::job_repository::RepositoryError;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

/// 上传状态仓库特质
///
/// 写入接口按自然键 (court_hall_no, status_date) 幂等
#[async_trait]
pub trait HallStatusRepository: Send + Sync {
    /// 按自然键幂等写入一条候选记录
    async fn upsert(
        &self,
        court_id: Uuid,
        candidate: &HallStatusCandidate,
    ) -> Result<CourtHallStatus, RepositoryError>;
    /// 列出上传状态，可按日期过滤，按状态日期倒序、序号正序
    async fn list(
        &self,
        status_date: Option<NaiveDate>,
        limit: u64,
    ) -> Result<Vec<CourtHallStatus>, RepositoryError>;
}
