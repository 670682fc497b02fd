/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A distribution release that updates target.
///
/// `composed` is true when the release's repositories are produced by the
/// central compose pipeline; when false, signed side-tag updates are pushed
/// to testing directly. A release without a `pending_testing_tag` does not
/// require build signing at all.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "release")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub pending_testing_tag: Option<String>,
    pub testing_tag: String,
    pub stable_tag: String,
    pub composed: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
