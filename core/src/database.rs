/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use entity::update::TestGatingStatus;
use migration::Migrator;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectOptions, Database,
    DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use sea_orm_migration::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::log::LevelFilter;
use uuid::Uuid;

use super::types::*;

pub async fn connect_db(cli: &Cli) -> Result<DatabaseConnection> {
    let db_url = if let Some(file) = &cli.database_url_file {
        std::fs::read_to_string(file).context("Failed to read database url from file")?
    } else if let Some(url) = &cli.database_url {
        url.clone()
    } else {
        anyhow::bail!("No database url provided")
    };

    let mut opt = ConnectOptions::new(db_url);

    // Only enable SQL logging at debug level
    if cli.log_level == "debug" {
        opt.sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Debug);
    } else {
        opt.sqlx_logging(false);
    }

    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8));

    let db = Database::connect(opt)
        .await
        .context("Failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;
    update_db(&db).await.context("Failed to update database")?;
    Ok(db)
}

/// Startup reconciliation: in-flight gating state does not survive a
/// restart, so queued/running statuses fall back to waiting and get
/// recomputed on the next signal.
async fn update_db(db: &DatabaseConnection) -> Result<(), DbErr> {
    let updates = EUpdate::find()
        .filter(
            Condition::any()
                .add(CUpdate::TestGatingStatus.eq(TestGatingStatus::Queued))
                .add(CUpdate::TestGatingStatus.eq(TestGatingStatus::Running)),
        )
        .all(db)
        .await?;

    for update in updates {
        let mut aupdate: AUpdate = update.into();
        aupdate.test_gating_status = Set(TestGatingStatus::Waiting);
        aupdate.update(db).await?;
    }

    Ok(())
}

pub async fn get_update_by_alias(
    state: Arc<ServerState>,
    alias: &str,
) -> Result<Option<MUpdate>> {
    Ok(EUpdate::find()
        .filter(CUpdate::Alias.eq(alias))
        .one(&state.db)
        .await
        .context("Failed to query update")?)
}

pub async fn get_build_by_nvr(state: Arc<ServerState>, nvr: &str) -> Result<Option<MBuild>> {
    Ok(EBuild::find()
        .filter(CBuild::Nvr.eq(nvr))
        .one(&state.db)
        .await
        .context("Failed to query build")?)
}

pub async fn get_builds_for_update(
    state: Arc<ServerState>,
    update_id: Uuid,
) -> Result<Vec<MBuild>> {
    Ok(EBuild::find()
        .filter(CBuild::Update.eq(update_id))
        .all(&state.db)
        .await
        .context("Failed to query builds for update")?)
}

/// Comment history in insertion order, oldest first.
pub async fn get_comments_for_update(
    state: Arc<ServerState>,
    update_id: Uuid,
) -> Result<Vec<MComment>> {
    Ok(EComment::find()
        .filter(CComment::Update.eq(update_id))
        .order_by_asc(CComment::CreatedAt)
        .all(&state.db)
        .await
        .context("Failed to query comments for update")?)
}

pub async fn get_release_for_update(
    state: Arc<ServerState>,
    update: &MUpdate,
) -> Result<Option<MRelease>> {
    Ok(ERelease::find_by_id(update.release)
        .one(&state.db)
        .await
        .context("Failed to query release")?)
}

pub async fn get_or_create_user(state: Arc<ServerState>, name: &str) -> Result<MUser> {
    let user = EUser::find()
        .filter(CUser::Name.eq(name))
        .one(&state.db)
        .await
        .context("Failed to query user")?;

    if let Some(u) = user {
        return Ok(u);
    }

    let auser = AUser {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
    };

    Ok(auser
        .insert(&state.db)
        .await
        .context("Failed to insert user")?)
}
