// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::JobType;
use crate::domain::repositories::job_repository::RepositoryError;
use crate::domain::repositories::schedule_repository::{ScheduleEntry, ScheduleRepository};
use crate::infrastructure::database::entities::schedule as schedule_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use uuid::Uuid;

/// 调度仓库实现
#[derive(Clone)]
pub struct ScheduleRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl ScheduleRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<schedule_entity::Model> for ScheduleEntry {
    fn from(model: schedule_entity::Model) -> Self {
        Self {
            id: model.id,
            job_type: model.job_type.parse().unwrap_or_default(),
            cron_pattern: model.cron_pattern,
            created_at: model.created_at,
        }
    }
}

#[async_trait]
impl ScheduleRepository for ScheduleRepositoryImpl {
    async fn list_for_type(
        &self,
        job_type: JobType,
    ) -> Result<Vec<ScheduleEntry>, RepositoryError> {
        let models = schedule_entity::Entity::find()
            .filter(schedule_entity::Column::JobType.eq(job_type.to_string()))
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn create(
        &self,
        job_type: JobType,
        cron_pattern: &str,
    ) -> Result<ScheduleEntry, RepositoryError> {
        let model = schedule_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_type: Set(job_type.to_string()),
            cron_pattern: Set(cron_pattern.to_string()),
            created_at: Set(Utc::now().into()),
        };
        let inserted = model.insert(self.db.as_ref()).await?;
        Ok(inserted.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        schedule_entity::Entity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}
