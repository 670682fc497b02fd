/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub use sea_orm_migration::prelude::*;

mod m20250301_000000_create_table_user;
mod m20250301_000010_create_table_release;
mod m20250301_000020_create_table_update;
mod m20250301_000030_create_table_build;
mod m20250301_000040_create_table_comment;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000000_create_table_user::Migration),
            Box::new(m20250301_000010_create_table_release::Migration),
            Box::new(m20250301_000020_create_table_update::Migration),
            Box::new(m20250301_000030_create_table_build::Migration),
            Box::new(m20250301_000040_create_table_comment::Migration),
        ]
    }
}
