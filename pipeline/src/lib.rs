/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod aggregate;
pub mod executor;
pub mod gating;
pub mod ingress;
pub mod promotion;
pub mod scheduler;


use cascade_core::types::ServerState;
use std::sync::Arc;

pub async fn start_pipeline(state: Arc<ServerState>) -> std::io::Result<()> {
    tokio::spawn(scheduler::schedule_promotion_loop(Arc::clone(&state)));
    Ok(())
}
