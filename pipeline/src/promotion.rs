/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use chrono::NaiveDateTime;
use entity::update::{TestGatingStatus, UpdateRequest, UpdateStatus};

/// What the evaluator wants the executor to do. `PushToTesting` flips the
/// status directly; the `Request*` variants only queue a request for the
/// compose collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionDecision {
    PushToTesting,
    RequestTesting,
    RequestStable,
    RequestUnpush,
}

#[derive(Debug, Clone)]
pub struct PromotionConfig {
    pub test_gating_required: bool,
    pub critpath_min_karma: i32,
}

/// Snapshot of everything the promotion rules read. Built from an update
/// aggregate; keeping it plain data keeps the evaluator pure.
#[derive(Debug, Clone)]
pub struct PromotionInput {
    pub status: UpdateStatus,
    pub request: Option<UpdateRequest>,
    pub test_gating_status: TestGatingStatus,
    pub locked: bool,
    pub autokarma: bool,
    pub stable_karma: i32,
    pub unstable_karma: i32,
    pub autotime: bool,
    pub stable_days: i32,
    pub critpath: bool,
    pub is_side_tag: bool,
    pub fully_signed: bool,
    pub release_composed: bool,
    pub karma: i32,
    pub critpath_karma: i32,
    pub date_testing: Option<NaiveDateTime>,
}

pub fn gating_satisfied(config: &PromotionConfig, status: &TestGatingStatus) -> bool {
    if !config.test_gating_required {
        return true;
    }

    matches!(status, TestGatingStatus::Passed | TestGatingStatus::Ignored)
}

fn days_in_testing(input: &PromotionInput, now: NaiveDateTime) -> i64 {
    match input.date_testing {
        Some(entered) => (now - entered).num_days(),
        None => 0,
    }
}

/// Decide whether an update should move, and how. First matching rule wins;
/// unpush is checked before any positive promotion so a simultaneous karma
/// collapse always takes precedence.
pub fn evaluate(
    config: &PromotionConfig,
    input: &PromotionInput,
    now: NaiveDateTime,
) -> Option<PromotionDecision> {
    if input.locked {
        return None;
    }

    if input.is_side_tag && input.status == UpdateStatus::Pending {
        if !input.fully_signed || !gating_satisfied(config, &input.test_gating_status) {
            return None;
        }

        return if input.release_composed {
            Some(PromotionDecision::RequestTesting)
        } else {
            Some(PromotionDecision::PushToTesting)
        };
    }

    // A queued request belongs to the compose collaborator until consumed.
    if input.request.is_some() || input.status != UpdateStatus::Testing {
        return None;
    }

    if input.karma <= input.unstable_karma {
        return Some(PromotionDecision::RequestUnpush);
    }

    if input.autokarma
        && input.karma >= input.stable_karma
        && (!input.critpath || input.critpath_karma >= config.critpath_min_karma)
        && gating_satisfied(config, &input.test_gating_status)
    {
        return Some(PromotionDecision::RequestStable);
    }

    if input.autotime
        && days_in_testing(input, now) >= input.stable_days as i64
        && gating_satisfied(config, &input.test_gating_status)
    {
        return Some(PromotionDecision::RequestStable);
    }

    None
}
