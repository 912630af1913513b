// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::JobType;
use crate::domain::repositories::job_repository::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

/// 重复调度条目
///
/// 对应一条持久化的cron规则；调度器按规则触发每日任务
#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    pub id: Uuid,
    pub job_type: JobType,
    pub cron_pattern: String,
    pub created_at: DateTime<FixedOffset>,
}

/// 调度仓库特质
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// 列出某任务类型的全部重复条目
    async fn list_for_type(&self, job_type: JobType)
        -> Result<Vec<ScheduleEntry>, RepositoryError>;
    /// 创建重复条目
    async fn create(
        &self,
        job_type: JobType,
        cron_pattern: &str,
    ) -> Result<ScheduleEntry, RepositoryError>;
    /// 删除重复条目
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}
