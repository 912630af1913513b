// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::hall_status::{CourtHallStatus, HallStatusCandidate};
use crate::domain::repositories::hall_status_repository::HallStatusRepository;
use crate::domain::repositories::job_repository::RepositoryError;
use crate::infrastructure::database::entities::court_hall_status as status_entity;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 上传状态仓库实现
#[derive(Clone)]
pub struct HallStatusRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl HallStatusRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<status_entity::Model> for CourtHallStatus {
    fn from(model: status_entity::Model) -> Self {
        Self {
            id: model.id,
            court_id: model.court_id,
            sl_no: model.sl_no,
            court_hall_no: model.court_hall_no,
            bench_name: model.bench_name,
            list_type: model.list_type,
            status: model.status,
            uploaded_at: model.uploaded_at,
            document_url: model.document_url,
            status_date: model.status_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[async_trait]
impl HallStatusRepository for HallStatusRepositoryImpl {
    async fn upsert(
        &self,
        court_id: Uuid,
        candidate: &HallStatusCandidate,
    ) -> Result<CourtHallStatus, RepositoryError> {
        let existing = status_entity::Entity::find()
            .filter(status_entity::Column::CourtHallNo.eq(candidate.court_hall_no.clone()))
            .filter(status_entity::Column::StatusDate.eq(candidate.status_date))
            .one(self.db.as_ref())
            .await?;

        let model = match existing {
            Some(found) => {
                let mut active: status_entity::ActiveModel = found.into();
                active.sl_no = Set(candidate.sl_no);
                active.bench_name = Set(candidate.bench_name.clone());
                active.list_type = Set(candidate.list_type.clone());
                active.status = Set(candidate.status.clone());
                active.uploaded_at = Set(candidate.uploaded_at);
                active.document_url = Set(candidate.document_url.clone());
                active.updated_at = Set(Utc::now().into());
                active.update(self.db.as_ref()).await?
            }
            None => {
                let active = status_entity::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    court_id: Set(court_id),
                    sl_no: Set(candidate.sl_no),
                    court_hall_no: Set(candidate.court_hall_no.clone()),
                    bench_name: Set(candidate.bench_name.clone()),
                    list_type: Set(candidate.list_type.clone()),
                    status: Set(candidate.status.clone()),
                    uploaded_at: Set(candidate.uploaded_at),
                    document_url: Set(candidate.document_url.clone()),
                    status_date: Set(candidate.status_date),
                    created_at: Set(Utc::now().into()),
                    updated_at: Set(Utc::now().into()),
                };
                active.insert(self.db.as_ref()).await?
            }
        };

        Ok(model.into())
    }

    async fn list(
        &self,
        status_date: Option<NaiveDate>,
        limit: u64,
    ) -> Result<Vec<CourtHallStatus>, RepositoryError> {
        let mut query = status_entity::Entity::find()
            .order_by_desc(status_entity::Column::StatusDate)
            .order_by_asc(status_entity::Column::SlNo)
            .limit(limit);
        if let Some(date) = status_date {
            query = query.filter(status_entity::Column::StatusDate.eq(date));
        }
        let models = query.all(self.db.as_ref()).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }
}
