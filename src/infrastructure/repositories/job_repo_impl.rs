// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::job::{ExtractionJob, JobStatus};
use crate::domain::repositories::job_repository::{JobRepository, RepositoryError};
use crate::infrastructure::database::entities::job as job_entity;
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use sea_orm::{
    sea_query::{Expr, LockBehavior, LockType},
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

/// 任务锁租约时长
const LOCK_LEASE_MINUTES: i64 = 10;

/// 任务仓库实现
///
/// 基于SeaORM实现的任务数据访问层；jobs表同时充当持久化队列
#[derive(Clone)]
pub struct JobRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl JobRepositoryImpl {
    /// 创建新的任务仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<job_entity::Model> for ExtractionJob {
    fn from(model: job_entity::Model) -> Self {
        Self {
            id: model.id,
            job_type: model.job_type.parse().unwrap_or_default(),
            status: model.status.parse().unwrap_or_default(),
            idempotency_key: model.idempotency_key,
            params: model.params,
            attempt_count: model.attempt_count,
            max_attempts: model.max_attempts,
            scheduled_at: model.scheduled_at,
            created_at: model.created_at,
            started_at: model.started_at,
            completed_at: model.completed_at,
            updated_at: model.updated_at,
            lock_token: model.lock_token,
            lock_expires_at: model.lock_expires_at,
        }
    }
}

impl From<ExtractionJob> for job_entity::ActiveModel {
    fn from(job: ExtractionJob) -> Self {
        Self {
            id: Set(job.id),
            job_type: Set(job.job_type.to_string()),
            status: Set(job.status.to_string()),
            idempotency_key: Set(job.idempotency_key.clone()),
            params: Set(job.params.clone()),
            attempt_count: Set(job.attempt_count),
            max_attempts: Set(job.max_attempts),
            scheduled_at: Set(job.scheduled_at),
            created_at: Set(job.created_at),
            started_at: Set(job.started_at),
            completed_at: Set(job.completed_at),
            updated_at: Set(job.updated_at),
            lock_token: Set(job.lock_token),
            lock_expires_at: Set(job.lock_expires_at),
        }
    }
}

impl JobRepositoryImpl {
    async fn find_by_key(&self, key: &str) -> Result<Option<ExtractionJob>, RepositoryError> {
        let model = job_entity::Entity::find()
            .filter(job_entity::Column::IdempotencyKey.eq(key))
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    /// 删除某个终态之外的多余行，按完成时间保留最近的N条
    async fn prune_status(&self, status: JobStatus, keep: u64) -> Result<u64, RepositoryError> {
        let keep_ids: Vec<Uuid> = job_entity::Entity::find()
            .filter(job_entity::Column::Status.eq(status.to_string()))
            .order_by_desc(job_entity::Column::CompletedAt)
            .limit(keep)
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();

        let mut condition = Condition::all()
            .add(job_entity::Column::Status.eq(status.to_string()));
        if !keep_ids.is_empty() {
            condition = condition.add(job_entity::Column::Id.is_not_in(keep_ids));
        }

        let result = job_entity::Entity::delete_many()
            .filter(condition)
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl JobRepository for JobRepositoryImpl {
    async fn create_if_absent(
        &self,
        job: &ExtractionJob,
    ) -> Result<ExtractionJob, RepositoryError> {
        // 先查后插，插入撞到唯一键时复读现有行。
        // 幂等键上有唯一约束，并发提交最多一条成功。
        if let Some(existing) = self.find_by_key(&job.idempotency_key).await? {
            return Ok(existing);
        }

        let model: job_entity::ActiveModel = job.clone().into();
        match model.insert(self.db.as_ref()).await {
            Ok(inserted) => Ok(inserted.into()),
            Err(insert_err) => match self.find_by_key(&job.idempotency_key).await? {
                Some(existing) => Ok(existing),
                None => Err(insert_err.into()),
            },
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ExtractionJob>, RepositoryError> {
        let model = job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(Into::into))
    }

    async fn update(&self, job: &ExtractionJob) -> Result<ExtractionJob, RepositoryError> {
        let mut model: job_entity::ActiveModel = job.clone().into();
        model.updated_at = Set(Utc::now().into());

        let updated = model.update(self.db.as_ref()).await?;
        Ok(updated.into())
    }

    async fn acquire_next(
        &self,
        worker_id: Uuid,
    ) -> Result<Option<ExtractionJob>, RepositoryError> {
        let txn = self.db.begin().await?;

        let job = job_entity::Entity::find()
            .filter(job_entity::Column::Status.eq(JobStatus::Queued.to_string()))
            .filter(
                Condition::any()
                    .add(job_entity::Column::ScheduledAt.is_null())
                    .add(job_entity::Column::ScheduledAt.lte(Utc::now())),
            )
            .order_by_asc(job_entity::Column::ScheduledAt)
            .order_by_asc(job_entity::Column::CreatedAt)
            .lock_with_behavior(LockType::Update, LockBehavior::SkipLocked)
            .one(&txn)
            .await?;

        if let Some(job) = job {
            let mut active: job_entity::ActiveModel = job.into();
            active.lock_token = Set(Some(worker_id));
            active.lock_expires_at =
                Set(Some((Utc::now() + Duration::minutes(LOCK_LEASE_MINUTES)).into()));
            active.status = Set(JobStatus::Active.to_string());
            active.started_at = Set(Some(Utc::now().into()));
            active.updated_at = Set(Utc::now().into());
            let current_attempt = *active.attempt_count.as_ref();
            active.attempt_count = Set(current_attempt + 1);

            let updated = active.update(&txn).await?;
            txn.commit().await?;

            return Ok(Some(updated.into()));
        }

        txn.commit().await?;
        Ok(None)
    }

    async fn mark_completed(&self, id: Uuid) -> Result<(), RepositoryError> {
        let job = self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)?;
        let mut updated = job.clone();
        updated.status = JobStatus::Completed;
        updated.completed_at = Some(Utc::now().into());
        updated.lock_token = None;
        updated.lock_expires_at = None;
        self.update(&updated).await?;
        Ok(())
    }

    async fn mark_failed(&self, id: Uuid) -> Result<(), RepositoryError> {
        let job = self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)?;
        let mut updated = job.clone();
        updated.status = JobStatus::Failed;
        updated.completed_at = Some(Utc::now().into());
        updated.lock_token = None;
        updated.lock_expires_at = None;
        self.update(&updated).await?;
        Ok(())
    }

    async fn reset_stuck_jobs(&self, timeout: chrono::Duration) -> Result<u64, RepositoryError> {
        let threshold = Utc::now() - timeout;

        let result = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::Status,
                Expr::value(JobStatus::Queued.to_string()),
            )
            .col_expr(
                job_entity::Column::LockToken,
                Expr::value(Option::<Uuid>::None),
            )
            .col_expr(
                job_entity::Column::LockExpiresAt,
                Expr::value(Option::<DateTime<FixedOffset>>::None),
            )
            .filter(job_entity::Column::Status.eq(JobStatus::Active.to_string()))
            .filter(
                Condition::any()
                    .add(job_entity::Column::LockExpiresAt.lte(Utc::now()))
                    .add(
                        Condition::all()
                            .add(job_entity::Column::LockExpiresAt.is_null())
                            .add(job_entity::Column::StartedAt.lte(threshold)),
                    ),
            )
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }

    async fn prune_terminal_jobs(
        &self,
        keep_completed: u64,
        keep_failed: u64,
    ) -> Result<u64, RepositoryError> {
        let mut removed = self.prune_status(JobStatus::Completed, keep_completed).await?;
        removed += self.prune_status(JobStatus::Failed, keep_failed).await?;
        Ok(removed)
    }
}
