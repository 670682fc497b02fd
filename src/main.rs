/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use cascade_core::init_state;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CASCADE_LOG_LEVEL")
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let state = init_state().await?;

    pipeline::start_pipeline(Arc::clone(&state)).await?;

    // Drain outbound domain events. The compose and notification systems
    // consume these from the bus; here they are forwarded to the log.
    let mut events = state.events.subscribe();
    loop {
        match events.recv().await {
            Ok(event) => info!(event = ?event, "Publishing domain event"),
            Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped = skipped, "Event drain lagged behind publishers");
            }
            Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                error!("Event channel closed, shutting down");
                break;
            }
        }
    }

    Ok(())
}
