/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for build entity

use chrono::NaiveDate;
use entity::*;
use sea_orm::{DatabaseBackend, MockDatabase, entity::prelude::*};
use uuid::Uuid;

#[tokio::test]
async fn test_build_entity_with_content_type() -> Result<(), DbErr> {
    let build_id = Uuid::new_v4();
    let update_id = Uuid::new_v4();
    let naive_date = NaiveDate::from_ymd_opt(2025, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![build::Model {
            id: build_id,
            nvr: "kernel-6.15.1-300.fc43".to_owned(),
            update: update_id,
            signed: false,
            content_type: build::ContentType::Rpm,
            created_at: naive_date,
        }]])
        .into_connection();

    let result = build::Entity::find_by_id(build_id).one(&db).await?;

    assert!(result.is_some());
    let build = result.unwrap();
    assert_eq!(build.nvr, "kernel-6.15.1-300.fc43");
    assert_eq!(build.content_type, build::ContentType::Rpm);
    assert_eq!(build.update, update_id);
    assert!(!build.signed);

    Ok(())
}
