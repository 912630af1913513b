// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hearings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub court_id: Uuid,
    pub sl_no: Option<i32>,
    pub case_number: String,
    pub hearing_date: Date,
    pub hearing_time: Option<String>,
    pub hearing_mode: Option<String>,
    pub court_number: Option<String>,
    pub judge: Option<String>,
    pub list_type: Option<String>,
    pub category: Option<String>,
    pub petitioner_name: Option<String>,
    pub respondent_name: Option<String>,
    pub petitioner_advocate: Option<String>,
    pub respondent_advocate: Option<String>,
    pub district: Option<String>,
    pub raw_payload: Json,
    pub created_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::court::Entity",
        from = "Column::CourtId",
        to = "super::court::Column::Id"
    )]
    Court,
    #[sea_orm(has_many = "super::interim_application::Entity")]
    InterimApplications,
}

impl Related<super::court::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Court.def()
    }
}

impl Related<super::interim_application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InterimApplications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
