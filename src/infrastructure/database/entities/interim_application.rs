// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "interim_applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub hearing_id: Uuid,
    pub number: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::hearing::Entity",
        from = "Column::HearingId",
        to = "super::hearing::Column::Id",
        on_delete = "Cascade"
    )]
    Hearing,
}

impl Related<super::hearing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hearing.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
