/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use cascade_core::events::DomainEvent;
use cascade_core::types::*;
use chrono::Utc;
use entity::update::{UpdateRequest, UpdateStatus};
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::aggregate::build_promotion_input;
use super::promotion::{self, PromotionConfig, PromotionDecision};

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("required row {0} not found")]
    NotFound(Uuid),
    #[error("update {0} is locked")]
    Locked(Uuid),
    #[error("illegal transition from {from:?} to {to:?}")]
    IllegalEdge { from: UpdateStatus, to: UpdateStatus },
    #[error("conflicting concurrent mutation, retries exhausted")]
    Conflict,
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

/// The closed set of legal status edges. Nothing ever returns to `Pending`.
pub fn legal_edge(from: &UpdateStatus, to: &UpdateStatus) -> bool {
    matches!(
        (from, to),
        (UpdateStatus::Pending, UpdateStatus::Testing)
            | (UpdateStatus::Pending, UpdateStatus::Obsolete)
            | (UpdateStatus::Testing, UpdateStatus::Stable)
            | (UpdateStatus::Testing, UpdateStatus::Unpushed)
            | (UpdateStatus::Testing, UpdateStatus::Obsolete)
            | (UpdateStatus::Stable, UpdateStatus::Obsolete)
    )
}

fn target_status(decision: &PromotionDecision) -> UpdateStatus {
    match decision {
        PromotionDecision::PushToTesting | PromotionDecision::RequestTesting => {
            UpdateStatus::Testing
        }
        PromotionDecision::RequestStable => UpdateStatus::Stable,
        PromotionDecision::RequestUnpush => UpdateStatus::Unpushed,
    }
}

async fn publish_transition_event(
    state: Arc<ServerState>,
    update: &MUpdate,
    decision: &PromotionDecision,
) -> Result<(), TransitionError> {
    let release = ERelease::find_by_id(update.release)
        .one(&state.db)
        .await?
        .ok_or(TransitionError::NotFound(update.release))?;

    let builds = EBuild::find()
        .filter(CBuild::Update.eq(update.id))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|b| b.nvr)
        .collect();

    let alias = update.alias.clone();
    let event = match decision {
        PromotionDecision::PushToTesting => DomainEvent::UpdateReadyForTesting {
            alias,
            release: release.name,
            builds,
        },
        PromotionDecision::RequestTesting => DomainEvent::UpdateRequestTesting {
            alias,
            release: release.name,
            builds,
        },
        PromotionDecision::RequestStable => DomainEvent::UpdateRequestStable {
            alias,
            release: release.name,
            builds,
        },
        PromotionDecision::RequestUnpush => DomainEvent::UpdateRequestUnpush {
            alias,
            release: release.name,
            builds,
        },
    };

    state.events.publish(event);
    Ok(())
}

/// Apply a promotion decision with an optimistic concurrency guard.
///
/// Each attempt re-fetches the row, validates the edge against the current
/// status and writes through `update_many` filtered on the status it saw.
/// Zero rows affected means a concurrent mutation won; the cycle restarts
/// from the fetch. Re-delivered decisions that find their target state
/// already applied are no-ops.
#[instrument(skip(state), fields(update_id = %update_id, decision = ?decision))]
pub async fn execute_decision(
    state: Arc<ServerState>,
    update_id: Uuid,
    decision: PromotionDecision,
) -> Result<(), TransitionError> {
    for attempt in 0..state.cli.transition_max_retries {
        let update = EUpdate::find_by_id(update_id)
            .one(&state.db)
            .await?
            .ok_or(TransitionError::NotFound(update_id))?;

        if update.locked {
            return Err(TransitionError::Locked(update_id));
        }

        let target = target_status(&decision);

        let rows_affected = match decision {
            PromotionDecision::PushToTesting => {
                if update.status == UpdateStatus::Testing {
                    debug!("Update already in testing, nothing to do");
                    return Ok(());
                }

                if !legal_edge(&update.status, &target) {
                    return Err(TransitionError::IllegalEdge {
                        from: update.status,
                        to: target,
                    });
                }

                let now = Utc::now().naive_utc();
                EUpdate::update_many()
                    .set(AUpdate {
                        status: Set(UpdateStatus::Testing),
                        request: Set(None),
                        pushed: Set(true),
                        date_testing: Set(Some(now)),
                        updated_at: Set(now),
                        ..Default::default()
                    })
                    .filter(CUpdate::Id.eq(update_id))
                    .filter(CUpdate::Status.eq(update.status.clone()))
                    .filter(CUpdate::Locked.eq(false))
                    .exec(&state.db)
                    .await?
                    .rows_affected
            }
            PromotionDecision::RequestTesting
            | PromotionDecision::RequestStable
            | PromotionDecision::RequestUnpush => {
                let request = match decision {
                    PromotionDecision::RequestTesting => UpdateRequest::Testing,
                    PromotionDecision::RequestStable => UpdateRequest::Stable,
                    _ => UpdateRequest::Unpush,
                };

                if update.request.as_ref() == Some(&request) {
                    debug!("Request already queued, nothing to do");
                    return Ok(());
                }

                // The compose collaborator may have consumed the request
                // already; a re-delivered decision then finds the target
                // status applied and the request cleared.
                if update.status == target {
                    debug!("Update already at target status, nothing to do");
                    return Ok(());
                }

                if !legal_edge(&update.status, &target) {
                    return Err(TransitionError::IllegalEdge {
                        from: update.status,
                        to: target,
                    });
                }

                EUpdate::update_many()
                    .set(AUpdate {
                        request: Set(Some(request)),
                        updated_at: Set(Utc::now().naive_utc()),
                        ..Default::default()
                    })
                    .filter(CUpdate::Id.eq(update_id))
                    .filter(CUpdate::Status.eq(update.status.clone()))
                    .filter(CUpdate::Request.is_null())
                    .filter(CUpdate::Locked.eq(false))
                    .exec(&state.db)
                    .await?
                    .rows_affected
            }
        };

        if rows_affected == 1 {
            info!("Transition applied");
            publish_transition_event(Arc::clone(&state), &update, &decision).await?;
            return Ok(());
        }

        warn!(attempt = attempt + 1, "Concurrent mutation, retrying");
    }

    Err(TransitionError::Conflict)
}

/// Evaluate the promotion rules for an update and execute the outcome, if
/// any. Shared by the ingress handlers and the autotime loop.
pub async fn run_promotion_pass(
    state: Arc<ServerState>,
    update: &MUpdate,
) -> anyhow::Result<Option<PromotionDecision>> {
    let config = PromotionConfig {
        test_gating_required: state.cli.test_gating_required,
        critpath_min_karma: state.cli.critpath_min_karma,
    };

    let input = build_promotion_input(Arc::clone(&state), update).await?;
    let decision = promotion::evaluate(&config, &input, Utc::now().naive_utc());

    if let Some(decision) = decision {
        execute_decision(Arc::clone(&state), update.id, decision).await?;
    }

    Ok(decision)
}
