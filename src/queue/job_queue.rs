// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::{ExtractionJob, JobStatus};
use crate::domain::repositories::job_repository::{JobRepository, RepositoryError};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// 队列存储不可达或读写失败
    #[error("Queue transport error: {0}")]
    Transport(String),

    /// 任务不存在
    #[error("Job not found")]
    NotFound,
}

impl From<RepositoryError> for QueueError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Database(err) => QueueError::Transport(err.to_string()),
            RepositoryError::NotFound => QueueError::NotFound,
        }
    }
}

/// 任务队列特质
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// 入队任务；幂等键已存在时返回现有任务而不产生新行
    async fn enqueue(&self, job: ExtractionJob) -> Result<ExtractionJob, QueueError>;

    /// 出队任务
    async fn dequeue(&self, worker_id: Uuid) -> Result<Option<ExtractionJob>, QueueError>;

    /// 完成任务
    async fn complete(&self, job_id: Uuid) -> Result<(), QueueError>;
    /// 失败任务（终态，不再重试）
    async fn fail(&self, job_id: Uuid) -> Result<(), QueueError>;
    /// 延迟重试：任务回到队列，到点后重新可见
    async fn retry_in(&self, job: ExtractionJob, delay: Duration)
        -> Result<ExtractionJob, QueueError>;
}

/// PostgreSQL任务队列实现
///
/// jobs表就是队列本体：入队是插入，出队是SKIP LOCKED抢占
pub struct PostgresJobQueue<R: JobRepository> {
    /// 任务仓库
    repository: Arc<R>,
}

impl<R: JobRepository> PostgresJobQueue<R> {
    /// 创建新的PostgreSQL任务队列实例
    ///
    /// # 参数
    ///
    /// * `repository` - 任务仓库
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R: JobRepository> JobQueue for PostgresJobQueue<R> {
    async fn enqueue(&self, job: ExtractionJob) -> Result<ExtractionJob, QueueError> {
        let created = self.repository.create_if_absent(&job).await?;
        if created.id != job.id {
            tracing::debug!(
                key = %job.idempotency_key,
                "Enqueue deduplicated against existing job"
            );
        }
        Ok(created)
    }

    async fn dequeue(&self, worker_id: Uuid) -> Result<Option<ExtractionJob>, QueueError> {
        let job = self.repository.acquire_next(worker_id).await?;
        Ok(job)
    }

    async fn complete(&self, job_id: Uuid) -> Result<(), QueueError> {
        self.repository.mark_completed(job_id).await?;
        Ok(())
    }

    async fn fail(&self, job_id: Uuid) -> Result<(), QueueError> {
        self.repository.mark_failed(job_id).await?;
        Ok(())
    }

    async fn retry_in(
        &self,
        mut job: ExtractionJob,
        delay: Duration,
    ) -> Result<ExtractionJob, QueueError> {
        job.status = JobStatus::Queued;
        job.scheduled_at = Some((Utc::now() + delay).into());
        job.started_at = None;
        job.completed_at = None;
        job.lock_token = None;
        job.lock_expires_at = None;

        let updated = self.repository.update(&job).await?;
        Ok(updated)
    }
}

#[async_trait]
impl<T: JobQueue + ?Sized> JobQueue for Arc<T> {
    async fn enqueue(&self, job: ExtractionJob) -> Result<ExtractionJob, QueueError> {
        (**self).enqueue(job).await
    }

    async fn dequeue(&self, worker_id: Uuid) -> Result<Option<ExtractionJob>, QueueError> {
        (**self).dequeue(worker_id).await
    }

    async fn complete(&self, job_id: Uuid) -> Result<(), QueueError> {
        (**self).complete(job_id).await
    }

    async fn fail(&self, job_id: Uuid) -> Result<(), QueueError> {
        (**self).fail(job_id).await
    }

    async fn retry_in(
        &self,
        job: ExtractionJob,
        delay: Duration,
    ) -> Result<ExtractionJob, QueueError> {
        (**self).retry_in(job, delay).await
    }
}
