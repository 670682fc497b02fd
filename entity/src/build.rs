/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, DeriveActiveEnum, EnumIter, Deserialize, Serialize)]
#[sea_orm(rs_type = "i16", db_type = "Integer")]
pub enum ContentType {
    #[sea_orm(num_value = 0)]
    Rpm,
    #[sea_orm(num_value = 1)]
    Module,
    #[sea_orm(num_value = 2)]
    Container,
    #[sea_orm(num_value = 3)]
    Flatpak,
}

/// One artifact belonging to exactly one update, identified by its
/// name-version-release string.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "build")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub nvr: String,
    pub update: Uuid,
    pub signed: bool,
    pub content_type: ContentType,
    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::update::Entity",
        from = "Column::Update",
        to = "super::update::Column::Id"
    )]
    Update,
}

impl ActiveModelBehavior for ActiveModel {}
