/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use anyhow::{Context, Result};
use async_trait::async_trait;
use cascade_core::consts::NO_TESTS_REQUIRED_SUMMARY;
use cascade_core::database::{get_builds_for_update, get_release_for_update};
use cascade_core::types::*;
use chrono::Utc;
use entity::update::TestGatingStatus;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, IntoActiveModel};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Clone, Serialize)]
pub struct DecisionRequest {
    pub decision_context: String,
    pub product_version: String,
    pub subject: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnsatisfiedRequirement {
    #[serde(rename = "type")]
    pub requirement_type: String,
    #[serde(default)]
    pub testcase: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Decision {
    pub policies_satisfied: bool,
    pub summary: String,
    #[serde(default)]
    pub unsatisfied_requirements: Vec<UnsatisfiedRequirement>,
}

/// Client for the external policy-evaluation service.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PolicyClient: Send + Sync {
    async fn evaluate(&self, request: &DecisionRequest) -> Result<Decision>;
}

pub struct HttpPolicyClient {
    client: reqwest::Client,
    api_url: Option<String>,
}

impl HttpPolicyClient {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: cli.policy_api_url.clone(),
        }
    }
}

#[async_trait]
impl PolicyClient for HttpPolicyClient {
    async fn evaluate(&self, request: &DecisionRequest) -> Result<Decision> {
        let api_url = self
            .api_url
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("No policy api url configured"))?;

        let response = self
            .client
            .post(format!("{}/decision", api_url))
            .json(request)
            .send()
            .await
            .context("Failed to reach policy service")?
            .error_for_status()
            .context("Policy service returned an error status")?;

        Ok(response
            .json::<Decision>()
            .await
            .context("Failed to deserialize policy decision")?)
    }
}

/// Map a policy decision onto the cached gating status.
///
/// An unsatisfied decision that lists no requirements at all is a
/// service-side evaluation error, not a test failure.
pub fn map_decision(decision: &Decision) -> TestGatingStatus {
    if decision.policies_satisfied {
        if decision.summary == NO_TESTS_REQUIRED_SUMMARY {
            return TestGatingStatus::Ignored;
        }

        return TestGatingStatus::Passed;
    }

    if decision.unsatisfied_requirements.is_empty() {
        return TestGatingStatus::ServiceFailed;
    }

    let types: Vec<&str> = decision
        .unsatisfied_requirements
        .iter()
        .map(|r| r.requirement_type.as_str())
        .collect();

    if types
        .iter()
        .any(|t| *t == "test-result-failed" || *t == "test-result-errored")
    {
        TestGatingStatus::Failed
    } else if types.iter().any(|t| *t == "test-result-running") {
        TestGatingStatus::Running
    } else if types.iter().any(|t| *t == "test-result-queued") {
        TestGatingStatus::Queued
    } else {
        TestGatingStatus::Waiting
    }
}

/// Whether a fresh test result warrants recomputing the cached verdict.
/// A passing result cannot change a cached pass, nor a failing result a
/// cached failure.
pub fn should_refresh_for_result(passed: bool, cached: &TestGatingStatus) -> bool {
    if passed && *cached == TestGatingStatus::Passed {
        return false;
    }

    if !passed && *cached == TestGatingStatus::Failed {
        return false;
    }

    true
}

/// A waiver can only improve an unsatisfied verdict.
pub fn should_refresh_for_waiver(cached: &TestGatingStatus) -> bool {
    *cached != TestGatingStatus::Passed
}

fn decision_request(
    state: &ServerState,
    update: &MUpdate,
    release_name: &str,
    builds: Vec<String>,
) -> DecisionRequest {
    let mut subject: Vec<serde_json::Value> = builds
        .into_iter()
        .map(|nvr| json!({ "item": nvr, "type": "koji_build" }))
        .collect();
    subject.push(json!({ "item": update.alias, "type": "cascade_update" }));

    DecisionRequest {
        decision_context: state.cli.policy_decision_context.clone(),
        product_version: release_name.to_lowercase(),
        subject,
    }
}

/// Recompute and cache the gating verdict for an update.
///
/// A transport failure leaves the cached status untouched; the caller's
/// redelivery gets another shot. Writing an unchanged status and summary is
/// skipped.
#[instrument(skip(state, policy), fields(update_id = %update.id, alias = %update.alias))]
pub async fn refresh_gating_status(
    state: Arc<ServerState>,
    policy: &dyn PolicyClient,
    update: &MUpdate,
) -> Result<TestGatingStatus> {
    if !state.cli.test_gating_required {
        if update.test_gating_status != TestGatingStatus::Ignored {
            let mut aupdate = update.clone().into_active_model();
            aupdate.test_gating_status = Set(TestGatingStatus::Ignored);
            aupdate.updated_at = Set(Utc::now().naive_utc());
            aupdate
                .update(&state.db)
                .await
                .context("Failed to store gating status")?;
        }

        return Ok(TestGatingStatus::Ignored);
    }

    let release = get_release_for_update(Arc::clone(&state), update)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Release not found for update {}", update.alias))?;

    let builds = get_builds_for_update(Arc::clone(&state), update.id)
        .await?
        .into_iter()
        .map(|b| b.nvr)
        .collect();

    let request = decision_request(&state, update, &release.name, builds);

    let decision = match policy.evaluate(&request).await {
        Ok(d) => d,
        Err(e) => {
            error!(error = %e, "Policy service call failed, keeping cached status");
            return Err(e);
        }
    };

    let status = map_decision(&decision);
    let summary = Some(decision.summary);

    if update.test_gating_status == status && update.gating_summary == summary {
        debug!("Gating verdict unchanged, skipping write");
        return Ok(status);
    }

    info!(status = ?status, "Caching new gating verdict");

    let mut aupdate = update.clone().into_active_model();
    aupdate.test_gating_status = Set(status.clone());
    aupdate.gating_summary = Set(summary);
    aupdate.updated_at = Set(Utc::now().naive_utc());
    aupdate
        .update(&state.db)
        .await
        .context("Failed to store gating status")?;

    Ok(status)
}
