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
                    .table(Update::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Update::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Update::Alias)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Update::Release).uuid().not_null())
                    .col(ColumnDef::new(Update::Status).integer().not_null())
                    .col(ColumnDef::new(Update::Request).integer())
                    .col(
                        ColumnDef::new(Update::TestGatingStatus)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Update::GatingSummary).text())
                    .col(ColumnDef::new(Update::Autokarma).boolean().not_null())
                    .col(ColumnDef::new(Update::StableKarma).integer().not_null())
                    .col(ColumnDef::new(Update::UnstableKarma).integer().not_null())
                    .col(ColumnDef::new(Update::Autotime).boolean().not_null())
                    .col(ColumnDef::new(Update::StableDays).integer().not_null())
                    .col(ColumnDef::new(Update::Critpath).boolean().not_null())
                    .col(ColumnDef::new(Update::FromTag).string())
                    .col(ColumnDef::new(Update::Locked).boolean().not_null())
                    .col(ColumnDef::new(Update::Pushed).boolean().not_null())
                    .col(
                        ColumnDef::new(Update::DateSubmitted)
                            .date_time()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Update::DateTesting).date_time())
                    .col(ColumnDef::new(Update::DateStable).date_time())
                    .col(ColumnDef::new(Update::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-update-release")
                            .from(Update::Table, Update::Release)
                            .to(Release::Table, Release::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Update::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Update {
    Table,
    Id,
    Alias,
    Release,
    Status,
    Request,
    TestGatingStatus,
    GatingSummary,
    Autokarma,
    StableKarma,
    UnstableKarma,
    Autotime,
    StableDays,
    Critpath,
    FromTag,
    Locked,
    Pushed,
    DateSubmitted,
    DateTesting,
    DateStable,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Release {
    Table,
    Id,
}
