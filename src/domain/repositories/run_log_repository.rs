// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::run_log::RunLog;
use crate::domain::repositories::job_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 运行日志仓库特质
///
/// 日志在运行开始时创建，终态时恰好更新一次
#[async_trait]
pub trait RunLogRepository: Send + Sync {
    /// 以running状态创建运行日志
    async fn create_running(&self, court_id: Uuid) -> Result<RunLog, RepositoryError>;
    /// 标记运行成功，记录持久化数量
    async fn mark_completed(&self, id: Uuid, records: i32) -> Result<(), RepositoryError>;
    /// 标记运行失败，记录部分进度与错误信息
    async fn mark_failed(
        &self,
        id: Uuid,
        records: i32,
        error_message: &str,
    ) -> Result<(), RepositoryError>;
    /// 列出最近的运行日志，最新在前
    async fn list_recent(
        &self,
        court_id: Option<Uuid>,
        limit: u64,
    ) -> Result<Vec<RunLog>, RepositoryError>;
}
