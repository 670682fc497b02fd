/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use cascade_core::types::*;
use entity::update::UpdateStatus;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing::{debug, error, info, instrument};

use super::executor::run_promotion_pass;

/// Periodic promotion loop. The autotime path has no inbound message to
/// piggyback on, so eligible updates are re-evaluated on a timer.
pub async fn schedule_promotion_loop(state: Arc<ServerState>) {
    let _guard = if state.cli.report_errors {
        Some(sentry::init(
            "https://9d41d2b7a2b64c91a5a28df4fca24c45@reports.cascade-updates.org/1",
        ))
    } else {
        None
    };

    let mut interval = time::interval(Duration::from_secs(state.cli.promotion_interval));

    loop {
        interval.tick().await;

        if let Err(e) = promotion_sweep(Arc::clone(&state)).await {
            error!(error = %e, "Promotion sweep failed");
        }
    }
}

#[instrument(skip(state))]
async fn promotion_sweep(state: Arc<ServerState>) -> anyhow::Result<()> {
    let candidates = EUpdate::find()
        .filter(CUpdate::Status.eq(UpdateStatus::Testing))
        .filter(CUpdate::Request.is_null())
        .filter(CUpdate::Locked.eq(false))
        .all(&state.db)
        .await?;

    debug!(candidates = candidates.len(), "Sweeping updates in testing");

    for update in candidates {
        match run_promotion_pass(Arc::clone(&state), &update).await {
            Ok(Some(decision)) => {
                info!(alias = %update.alias, decision = ?decision, "Promotion applied")
            }
            Ok(None) => {}
            Err(e) => error!(alias = %update.alias, error = %e, "Promotion pass failed"),
        }
    }

    Ok(())
}
