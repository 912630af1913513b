// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::ExtractionJob;
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// 任务仓库特质
///
/// 定义提取任务数据访问接口
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// 按幂等键创建任务；键已存在时返回现有任务
    async fn create_if_absent(&self, job: &ExtractionJob)
        -> Result<ExtractionJob, RepositoryError>;
    /// 根据ID查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ExtractionJob>, RepositoryError>;
    /// 更新任务
    async fn update(&self, job: &ExtractionJob) -> Result<ExtractionJob, RepositoryError>;
    /// 获取下一个待处理任务（加锁并递增尝试次数）
    async fn acquire_next(
        &self,
        worker_id: Uuid,
    ) -> Result<Option<ExtractionJob>, RepositoryError>;
    /// 标记任务已完成
    async fn mark_completed(&self, id: Uuid) -> Result<(), RepositoryError>;
    /// 标记任务已失败
    async fn mark_failed(&self, id: Uuid) -> Result<(), RepositoryError>;
    /// 重置卡住的任务（锁已过期但仍处于Active状态）
    async fn reset_stuck_jobs(&self, timeout: chrono::Duration) -> Result<u64, RepositoryError>;
    /// 修剪终态任务，保留最近的有界数量
    async fn prune_terminal_jobs(
        &self,
        keep_completed: u64,
        keep_failed: u64,
    ) -> Result<u64, RepositoryError>;
}
