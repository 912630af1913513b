// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::hearing::{HearingCandidate, HearingRecord};
use crate::domain::repositories::hearing_repository::{
    HearingQueryParams, HearingRepository,
};
use crate::domain::repositories::job_repository::RepositoryError;
use crate::infrastructure::database::entities::{
    hearing as hearing_entity, interim_application as ia_entity,
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 听证仓库实现
///
/// 写入走事务：按自然键查找后插入或更新，再整体替换子记录。
/// 自然键上有唯一索引，并发写入退化为其中一方更新。
#[derive(Clone)]
pub struct HearingRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl HearingRepositoryImpl {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn replace_children(
        txn: &DatabaseTransaction,
        hearing_id: Uuid,
        numbers: &[String],
    ) -> Result<(), RepositoryError> {
        ia_entity::Entity::delete_many()
            .filter(ia_entity::Column::HearingId.eq(hearing_id))
            .exec(txn)
            .await?;

        if !numbers.is_empty() {
            let rows: Vec<ia_entity::ActiveModel> = numbers
                .iter()
                .map(|number| ia_entity::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    hearing_id: Set(hearing_id),
                    number: Set(number.clone()),
                })
                .collect();
            ia_entity::Entity::insert_many(rows).exec(txn).await?;
        }
        Ok(())
    }

    fn assemble(model: hearing_entity::Model, interim_applications: Vec<String>) -> HearingRecord {
        HearingRecord {
            id: model.id,
            court_id: model.court_id,
            sl_no: model.sl_no,
            case_number: model.case_number,
            hearing_date: model.hearing_date,
            hearing_time: model.hearing_time,
            hearing_mode: model.hearing_mode,
            court_number: model.court_number,
            judge: model.judge,
            list_type: model.list_type,
            category: model.category,
            petitioner_name: model.petitioner_name,
            respondent_name: model.respondent_name,
            petitioner_advocate: model.petitioner_advocate,
            respondent_advocate: model.respondent_advocate,
            district: model.district,
            raw_payload: model.raw_payload,
            created_at: model.created_at,
            updated_at: model.updated_at,
            interim_applications,
        }
    }
}

#[async_trait]
impl HearingRepository for HearingRepositoryImpl {
    async fn upsert(
        &self,
        court_id: Uuid,
        candidate: &HearingCandidate,
        raw_payload: serde_json::Value,
    ) -> Result<HearingRecord, RepositoryError> {
        let txn = self.db.begin().await?;

        let existing = hearing_entity::Entity::find()
            .filter(hearing_entity::Column::CourtId.eq(court_id))
            .filter(hearing_entity::Column::CaseNumber.eq(candidate.case_number.clone()))
            .filter(hearing_entity::Column::HearingDate.eq(candidate.hearing_date))
            .one(&txn)
            .await?;

        let model = match existing {
            Some(found) => {
                // 重复出现只刷新可变字段，保留首次抓取的标识与时间线
                let mut active: hearing_entity::ActiveModel = found.into();
                active.petitioner_advocate = Set(candidate.petitioner_advocate.clone());
                active.respondent_advocate = Set(candidate.respondent_advocate.clone());
                active.list_type = Set(candidate.list_type.clone());
                active.category = Set(candidate.category.clone());
                active.district = Set(candidate.district.clone());
                active.raw_payload = Set(raw_payload);
                active.updated_at = Set(Utc::now().into());
                active.update(&txn).await?
            }
            None => {
                let active = hearing_entity::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    court_id: Set(court_id),
                    sl_no: Set(candidate.sl_no),
                    case_number: Set(candidate.case_number.clone()),
                    hearing_date: Set(candidate.hearing_date),
                    hearing_time: Set(candidate.hearing_time.clone()),
                    hearing_mode: Set(candidate.hearing_mode.clone()),
                    court_number: Set(candidate.court_number.clone()),
                    judge: Set(candidate.judge.clone()),
                    list_type: Set(candidate.list_type.clone()),
                    category: Set(candidate.category.clone()),
                    petitioner_name: Set(candidate.petitioner_name.clone()),
                    respondent_name: Set(candidate.respondent_name.clone()),
                    petitioner_advocate: Set(candidate.petitioner_advocate.clone()),
                    respondent_advocate: Set(candidate.respondent_advocate.clone()),
                    district: Set(candidate.district.clone()),
                    raw_payload: Set(raw_payload),
                    created_at: Set(Utc::now().into()),
                    updated_at: Set(Utc::now().into()),
                };
                active.insert(&txn).await?
            }
        };

        Self::replace_children(&txn, model.id, &candidate.interim_applications).await?;
        txn.commit().await?;

        Ok(Self::assemble(model, candidate.interim_applications.clone()))
    }

    async fn query(
        &self,
        params: HearingQueryParams,
    ) -> Result<(Vec<HearingRecord>, u64), RepositoryError> {
        let mut condition = Condition::all();
        if let Some(court_id) = params.court_id {
            condition = condition.add(hearing_entity::Column::CourtId.eq(court_id));
        }
        if let Some(case_number) = &params.case_number {
            condition = condition.add(Expr::cust_with_values(
                "LOWER(case_number) LIKE ?",
                vec![format!("%{}%", case_number.to_lowercase())],
            ));
        }
        if let Some(advocate) = &params.advocate {
            let needle = format!("%{}%", advocate.to_lowercase());
            condition = condition.add(
                Condition::any()
                    .add(Expr::cust_with_values(
                        "LOWER(petitioner_advocate) LIKE ?",
                        vec![needle.clone()],
                    ))
                    .add(Expr::cust_with_values(
                        "LOWER(respondent_advocate) LIKE ?",
                        vec![needle],
                    )),
            );
        }
        if let Some(from) = params.date_from {
            condition = condition.add(hearing_entity::Column::HearingDate.gte(from));
        }
        if let Some(to) = params.date_to {
            condition = condition.add(hearing_entity::Column::HearingDate.lte(to));
        }

        let total = hearing_entity::Entity::find()
            .filter(condition.clone())
            .count(self.db.as_ref())
            .await?;

        let models = hearing_entity::Entity::find()
            .filter(condition)
            .order_by_desc(hearing_entity::Column::HearingDate)
            .order_by_asc(hearing_entity::Column::CaseNumber)
            .offset(params.offset)
            .limit(params.limit)
            .all(self.db.as_ref())
            .await?;

        // 一次取回当前页所有子记录再按父ID分组
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut children: HashMap<Uuid, Vec<String>> = HashMap::new();
        if !ids.is_empty() {
            for child in ia_entity::Entity::find()
                .filter(ia_entity::Column::HearingId.is_in(ids))
                .all(self.db.as_ref())
                .await?
            {
                children.entry(child.hearing_id).or_default().push(child.number);
            }
        }

        let records = models
            .into_iter()
            .map(|m| {
                let interim = children.remove(&m.id).unwrap_or_default();
                Self::assemble(m, interim)
            })
            .collect();

        Ok((records, total))
    }
}
