// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::run_log::{RunLog, RunStatus};
use crate::domain::repositories::job_repository::RepositoryError;
use crate::domain::repositories::run_log_repository::RunLogRepository;
use crate::infrastructure::database::entities::run_log as run_log_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 运行日志仓库实现
#[derive(Clone)]
pub struct RunLogRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl RunLogRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn finish(
        &self,
        id: Uuid,
        status: RunStatus,
        records: i32,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let model = run_log_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let mut active: run_log_entity::ActiveModel = model.into();
        active.status = Set(status.to_string());
        active.completed_at = Set(Some(Utc::now().into()));
        active.records_extracted = Set(records);
        active.error_message = Set(error_message.map(String::from));
        active.update(self.db.as_ref()).await?;
        Ok(())
    }
}

impl From<run_log_entity::Model> for RunLog {
    fn from(model: run_log_entity::Model) -> Self {
        Self {
            id: model.id,
            court_id: model.court_id,
            status: model.status.parse().unwrap_or_default(),
            started_at: model.started_at,
            completed_at: model.completed_at,
            records_extracted: model.records_extracted,
            error_message: model.error_message,
        }
    }
}

#[async_trait]
impl RunLogRepository for RunLogRepositoryImpl {
    async fn create_running(&self, court_id: Uuid) -> Result<RunLog, RepositoryError> {
        let model = run_log_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            court_id: Set(court_id),
            status: Set(RunStatus::Running.to_string()),
            started_at: Set(Utc::now().into()),
            completed_at: Set(None),
            records_extracted: Set(0),
            error_message: Set(None),
        };
        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn mark_completed(&self, id: Uuid, records: i32) -> Result<(), RepositoryError> {
        self.finish(id, RunStatus::Completed, records, None).await
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        records: i32,
        error_message: &str,
    ) -> Result<(), RepositoryError> {
        self.finish(id, RunStatus::Failed, records, Some(error_message))
            .await
    }

    async fn list_recent(
        &self,
        court_id: Option<Uuid>,
        limit: u64,
    ) -> Result<Vec<RunLog>, RepositoryError> {
        let mut query = run_log_entity::Entity::find()
            .order_by_desc(run_log_entity::Column::StartedAt)
            .limit(limit);
        if let Some(court_id) = court_id {
            query = query.filter(run_log_entity::Column::CourtId.eq(court_id));
        }
        let models = query.all(self.db.as_ref()).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
