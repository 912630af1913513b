// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::court::{Court, CourtSeed};
use crate::domain::repositories::court_repository::CourtRepository;
use crate::domain::repositories::job_repository::RepositoryError;
use crate::infrastructure::database::entities::court as court_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use uuid::Uuid;

/// 法院仓库实现
#[derive(Clone)]
pub struct CourtRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl CourtRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<court_entity::Model> for Court {
    fn from(model: court_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.code,
            url: model.url,
            jurisdiction: model.jurisdiction,
            created_at: model.created_at,
        }
    }
}

#[async_trait]
impl CourtRepository for CourtRepositoryImpl {
    async fn find_or_create(&self, seed: &CourtSeed) -> Result<Court, RepositoryError> {
        if let Some(existing) = court_entity::Entity::find()
            .filter(court_entity::Column::Code.eq(seed.code))
            .one(self.db.as_ref())
            .await?
        {
            return Ok(existing.into());
        }

        let model = court_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(seed.name.to_string()),
            code: Set(seed.code.to_string()),
            url: Set(seed.url.to_string()),
            jurisdiction: Set(Some(seed.jurisdiction.to_string())),
            created_at: Set(Utc::now().into()),
        };
        match model.insert(self.db.as_ref()).await {
            Ok(inserted) => Ok(inserted.into()),
            // 并发启动时另一实例可能已抢先播种
            Err(insert_err) => court_entity::Entity::find()
                .filter(court_entity::Column::Code.eq(seed.code))
                .one(self.db.as_ref())
                .await?
                .map(Into::into)
                .ok_or_else(|| insert_err.into()),
        }
    }
}
