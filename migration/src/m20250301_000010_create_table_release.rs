/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Release::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Release::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Release::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Release::PendingTestingTag).string())
                    .col(ColumnDef::new(Release::TestingTag).string().not_null())
                    .col(ColumnDef::new(Release::StableTag).string().not_null())
                    .col(ColumnDef::new(Release::Composed).boolean().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Release::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Release {
    Table,
    Id,
    Name,
    PendingTestingTag,
    TestingTag,
    StableTag,
    Composed,
}
