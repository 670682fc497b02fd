/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::Result;
use cascade_core::consts::PASSING_OUTCOMES;
use cascade_core::database::*;
use cascade_core::input::parse_nvr;
use cascade_core::types::*;
use sea_orm::EntityTrait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::aggregate::{SignedOutcome, expected_signing_tag, mark_build_signed, record_feedback};
use super::executor::run_promotion_pass;
use super::gating::{
    PolicyClient, refresh_gating_status, should_refresh_for_result, should_refresh_for_waiver,
};

/// How a handler disposed of a message. `Dropped` is an ack without retry;
/// transient failures surface as `Err` so the bus redelivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    Handled,
    Dropped(&'static str),
}

/// A build was tagged in the build system.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildTagMessage {
    pub nvr: String,
    pub tag: String,
    /// Release name hint from the producer, when it carries one.
    #[serde(default)]
    pub release: Option<String>,
}

/// A test result landed on the result bus.
#[derive(Debug, Clone, Deserialize)]
pub struct TestResultMessage {
    pub item: String,
    pub outcome: String,
}

/// A failed requirement was waived.
#[derive(Debug, Clone, Deserialize)]
pub struct WaiverMessage {
    pub item: String,
}

/// Feedback posted on an update.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackMessage {
    pub alias: String,
    pub user: String,
    pub text: String,
    pub karma: i16,
    #[serde(default)]
    pub karma_critpath: i16,
}

/// An update referenced by either its alias or one of its build nvrs.
async fn resolve_update(state: Arc<ServerState>, item: &str) -> Result<Option<MUpdate>> {
    if let Some(update) = get_update_by_alias(Arc::clone(&state), item).await? {
        return Ok(Some(update));
    }

    if parse_nvr(item).is_err() {
        return Ok(None);
    }

    let Some(build) = get_build_by_nvr(Arc::clone(&state), item).await? else {
        return Ok(None);
    };

    Ok(EUpdate::find_by_id(build.update).one(&state.db).await?)
}

/// Handle a tag event from the build system. Only the apply of the
/// pending-testing tag confirms a signed build; everything else is noise.
#[instrument(skip(state, policy), fields(nvr = %message.nvr, tag = %message.tag))]
pub async fn handle_build_tag(
    state: Arc<ServerState>,
    policy: &dyn PolicyClient,
    message: &BuildTagMessage,
) -> Result<HandlerOutcome> {
    if parse_nvr(&message.nvr).is_err() {
        return Ok(HandlerOutcome::Dropped("malformed nvr"));
    }

    let Some(build) = get_build_by_nvr(Arc::clone(&state), &message.nvr).await? else {
        warn!("No build known for tagged nvr");
        return Ok(HandlerOutcome::Dropped("unknown build"));
    };

    let Some(update) = EUpdate::find_by_id(build.update).one(&state.db).await? else {
        warn!("Build references a missing update");
        return Ok(HandlerOutcome::Dropped("build without update"));
    };

    let Some(release) = get_release_for_update(Arc::clone(&state), &update).await? else {
        warn!("Update references a missing release");
        return Ok(HandlerOutcome::Dropped("update without release"));
    };

    if let Some(hint) = &message.release {
        if *hint != release.name {
            return Ok(HandlerOutcome::Dropped("release hint mismatch"));
        }
    }

    match expected_signing_tag(&update, &release) {
        Some(expected) if expected == message.tag => {}
        _ => {
            debug!("Tag does not confirm signing, ignoring");
            return Ok(HandlerOutcome::Dropped("irrelevant tag"));
        }
    }

    match mark_build_signed(Arc::clone(&state), build).await? {
        SignedOutcome::AlreadySigned => Ok(HandlerOutcome::Handled),
        SignedOutcome::Signed { fully_signed } => {
            if fully_signed {
                // The build set changed; no test result or waiver will
                // arrive for an update whose policy answer is "no tests
                // are required", so the verdict is recomputed here.
                refresh_gating_status(Arc::clone(&state), policy, &update).await?;

                let update = EUpdate::find_by_id(update.id)
                    .one(&state.db)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("Update vanished during handling"))?;
                run_promotion_pass(Arc::clone(&state), &update).await?;
            }

            Ok(HandlerOutcome::Handled)
        }
    }
}

/// Handle a test result. The cached verdict short-circuits results that
/// cannot change it, so duplicate deliveries cost no policy calls.
#[instrument(skip(state, policy), fields(item = %message.item, outcome = %message.outcome))]
pub async fn handle_test_result(
    state: Arc<ServerState>,
    policy: &dyn PolicyClient,
    message: &TestResultMessage,
) -> Result<HandlerOutcome> {
    let Some(update) = resolve_update(Arc::clone(&state), &message.item).await? else {
        return Ok(HandlerOutcome::Dropped("no matching update"));
    };

    let passed = PASSING_OUTCOMES.contains(&message.outcome.as_str());

    if !should_refresh_for_result(passed, &update.test_gating_status) {
        debug!("Result cannot change cached verdict, skipping");
        return Ok(HandlerOutcome::Dropped("cached verdict unchanged"));
    }

    refresh_gating_status(Arc::clone(&state), policy, &update).await?;

    let update = EUpdate::find_by_id(update.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Update vanished during handling"))?;
    run_promotion_pass(Arc::clone(&state), &update).await?;

    Ok(HandlerOutcome::Handled)
}

/// Handle a waiver. A waiver can only improve the verdict, so a cached pass
/// drops the message without a policy call.
#[instrument(skip(state, policy), fields(item = %message.item))]
pub async fn handle_waiver(
    state: Arc<ServerState>,
    policy: &dyn PolicyClient,
    message: &WaiverMessage,
) -> Result<HandlerOutcome> {
    let Some(update) = resolve_update(Arc::clone(&state), &message.item).await? else {
        return Ok(HandlerOutcome::Dropped("no matching update"));
    };

    if !should_refresh_for_waiver(&update.test_gating_status) {
        debug!("Verdict already passed, skipping");
        return Ok(HandlerOutcome::Dropped("cached verdict unchanged"));
    }

    refresh_gating_status(Arc::clone(&state), policy, &update).await?;

    let update = EUpdate::find_by_id(update.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Update vanished during handling"))?;
    run_promotion_pass(Arc::clone(&state), &update).await?;

    Ok(HandlerOutcome::Handled)
}

/// Handle user feedback: persist the comment, then check the karma
/// thresholds.
#[instrument(skip(state), fields(alias = %message.alias, user = %message.user, karma = %message.karma))]
pub async fn handle_feedback(
    state: Arc<ServerState>,
    message: &FeedbackMessage,
) -> Result<HandlerOutcome> {
    if !(-1..=1).contains(&message.karma) || !(-1..=1).contains(&message.karma_critpath) {
        return Ok(HandlerOutcome::Dropped("karma out of range"));
    }

    let Some(update) = get_update_by_alias(Arc::clone(&state), &message.alias).await? else {
        return Ok(HandlerOutcome::Dropped("unknown update"));
    };

    record_feedback(
        Arc::clone(&state),
        &update,
        &message.user,
        &message.text,
        message.karma,
        message.karma_critpath,
    )
    .await?;

    info!("Feedback recorded");
    run_promotion_pass(Arc::clone(&state), &update).await?;

    Ok(HandlerOutcome::Handled)
}
