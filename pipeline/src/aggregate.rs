/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use cascade_core::database::*;
use cascade_core::input::side_tag_pending_testing;
use cascade_core::types::*;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, IntoActiveModel};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::promotion::PromotionInput;

/// Result of marking a build signed. `Signed { fully_signed: true }` means
/// this was the last unsigned build of its update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedOutcome {
    AlreadySigned,
    Signed { fully_signed: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KarmaTally {
    pub karma: i32,
    pub critpath_karma: i32,
}

/// Tally karma over a comment history, oldest first. Only the latest
/// non-zero vote per user counts; zero-karma comments are plain comments
/// and never supersede an earlier vote.
pub fn karma_totals(comments: &[MComment]) -> KarmaTally {
    let mut votes: HashMap<Uuid, i16> = HashMap::new();
    let mut critpath_votes: HashMap<Uuid, i16> = HashMap::new();

    for comment in comments {
        if comment.karma != 0 {
            votes.insert(comment.user, comment.karma);
        }

        if comment.karma_critpath != 0 {
            critpath_votes.insert(comment.user, comment.karma_critpath);
        }
    }

    KarmaTally {
        karma: votes.values().map(|k| i32::from(*k)).sum(),
        critpath_karma: critpath_votes.values().map(|k| i32::from(*k)).sum(),
    }
}

pub async fn current_karma(state: Arc<ServerState>, update_id: Uuid) -> Result<KarmaTally> {
    let comments = get_comments_for_update(Arc::clone(&state), update_id).await?;
    Ok(karma_totals(&comments))
}

/// Whether the release demands signed builds at all. Releases without a
/// pending-testing tag have no signing step.
pub fn signing_required(release: &MRelease) -> bool {
    release.pending_testing_tag.is_some()
}

/// The tag whose apply event confirms a build of this update is signed.
pub fn expected_signing_tag(update: &MUpdate, release: &MRelease) -> Option<String> {
    match &update.from_tag {
        Some(from_tag) => Some(side_tag_pending_testing(from_tag)),
        None => release.pending_testing_tag.clone(),
    }
}

#[instrument(skip(state), fields(build_id = %build.id, nvr = %build.nvr))]
pub async fn mark_build_signed(state: Arc<ServerState>, build: MBuild) -> Result<SignedOutcome> {
    if build.signed {
        debug!("Build already signed, nothing to do");
        return Ok(SignedOutcome::AlreadySigned);
    }

    let update_id = build.update;
    let mut abuild = build.into_active_model();
    abuild.signed = Set(true);
    abuild
        .update(&state.db)
        .await
        .context("Failed to mark build signed")?;

    let builds = get_builds_for_update(Arc::clone(&state), update_id).await?;
    let fully_signed = builds.iter().all(|b| b.signed);

    if fully_signed {
        info!(update_id = %update_id, "All builds of update signed");
    }

    Ok(SignedOutcome::Signed { fully_signed })
}

/// Record user feedback on an update. Karma stays derived from the comment
/// history; nothing is accumulated on the update row.
pub async fn record_feedback(
    state: Arc<ServerState>,
    update: &MUpdate,
    user_name: &str,
    text: &str,
    karma: i16,
    karma_critpath: i16,
) -> Result<MComment> {
    let user = get_or_create_user(Arc::clone(&state), user_name).await?;

    let acomment = AComment {
        id: Set(Uuid::new_v4()),
        update: Set(update.id),
        user: Set(user.id),
        text: Set(text.to_string()),
        karma: Set(karma),
        karma_critpath: Set(karma_critpath),
        created_at: Set(Utc::now().naive_utc()),
    };

    Ok(acomment
        .insert(&state.db)
        .await
        .context("Failed to insert comment")?)
}

/// Assemble the promotion evaluator's input from the update and its
/// satellite rows.
pub async fn build_promotion_input(
    state: Arc<ServerState>,
    update: &MUpdate,
) -> Result<PromotionInput> {
    let release = get_release_for_update(Arc::clone(&state), update)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Release not found for update {}", update.alias))?;

    let builds = get_builds_for_update(Arc::clone(&state), update.id).await?;
    let fully_signed = !signing_required(&release) || builds.iter().all(|b| b.signed);

    let tally = current_karma(Arc::clone(&state), update.id).await?;

    Ok(PromotionInput {
        status: update.status.clone(),
        request: update.request.clone(),
        test_gating_status: update.test_gating_status.clone(),
        locked: update.locked,
        autokarma: update.autokarma,
        stable_karma: update.stable_karma,
        unstable_karma: update.unstable_karma,
        autotime: update.autotime,
        stable_days: update.stable_days,
        critpath: update.critpath,
        is_side_tag: update.from_tag.is_some(),
        fully_signed,
        release_composed: release.composed,
        karma: tally.karma,
        critpath_karma: tally.critpath_karma,
        date_testing: update.date_testing,
    })
}
