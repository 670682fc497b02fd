/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Release state of an update. Transitions are restricted to the legal
/// edges enforced by the transition executor; nothing returns to `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, DeriveActiveEnum, EnumIter, Deserialize, Serialize)]
#[sea_orm(rs_type = "i16", db_type = "Integer")]
pub enum UpdateStatus {
    #[sea_orm(num_value = 0)]
    Pending,
    #[sea_orm(num_value = 1)]
    Testing,
    #[sea_orm(num_value = 2)]
    Stable,
    #[sea_orm(num_value = 3)]
    Unpushed,
    #[sea_orm(num_value = 4)]
    Obsolete,
}

/// A queued state change, consumed asynchronously by the compose pipeline.
#[derive(Debug, Clone, PartialEq, Eq, DeriveActiveEnum, EnumIter, Deserialize, Serialize)]
#[sea_orm(rs_type = "i16", db_type = "Integer")]
pub enum UpdateRequest {
    #[sea_orm(num_value = 0)]
    Testing,
    #[sea_orm(num_value = 1)]
    Stable,
    #[sea_orm(num_value = 2)]
    Unpush,
    #[sea_orm(num_value = 3)]
    Obsolete,
    #[sea_orm(num_value = 4)]
    Revoke,
}

/// Cached verdict of the external policy service for an update.
///
/// `ServiceFailed` marks a policy-service-side evaluation error, as opposed
/// to `Failed` which means a required test actually failed.
#[derive(Debug, Clone, PartialEq, Eq, DeriveActiveEnum, EnumIter, Deserialize, Serialize)]
#[sea_orm(rs_type = "i16", db_type = "Integer")]
pub enum TestGatingStatus {
    #[sea_orm(num_value = 0)]
    Waiting,
    #[sea_orm(num_value = 1)]
    Ignored,
    #[sea_orm(num_value = 2)]
    Queued,
    #[sea_orm(num_value = 3)]
    Running,
    #[sea_orm(num_value = 4)]
    Passed,
    #[sea_orm(num_value = 5)]
    Failed,
    #[sea_orm(num_value = 6)]
    ServiceFailed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "update")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub alias: String,
    pub release: Uuid,
    pub status: UpdateStatus,
    pub request: Option<UpdateRequest>,
    pub test_gating_status: TestGatingStatus,
    pub gating_summary: Option<String>,
    pub autokarma: bool,
    pub stable_karma: i32,
    pub unstable_karma: i32,
    pub autotime: bool,
    pub stable_days: i32,
    pub critpath: bool,
    pub from_tag: Option<String>,
    pub locked: bool,
    pub pushed: bool,
    pub date_submitted: NaiveDateTime,
    pub date_testing: Option<NaiveDateTime>,
    pub date_stable: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::release::Entity",
        from = "Column::Release",
        to = "super::release::Column::Id"
    )]
    Release,
}

impl ActiveModelBehavior for ActiveModel {}
