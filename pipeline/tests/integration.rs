/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use cascade_core::events::{DomainEvent, EventSender};
use cascade_core::types::{Cli, MBuild, MComment, MRelease, MUpdate, ServerState};
use chrono::NaiveDate;
use entity::build::ContentType;
use entity::update::{TestGatingStatus, UpdateStatus};
use pipeline::gating::HttpPolicyClient;
use pipeline::ingress::{BuildTagMessage, HandlerOutcome, handle_build_tag};
use pipeline::start_pipeline;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use std::sync::Arc;
use tokio;
use uuid::Uuid;

fn create_mock_cli() -> Cli {
    Cli {
        log_level: "info".to_string(),
        database_url: Some("mock://test".to_string()),
        database_url_file: None,
        test_gating_required: false,
        policy_api_url: None,
        policy_decision_context: "update_gating".to_string(),
        critpath_min_karma: 2,
        promotion_interval: 60,
        transition_max_retries: 3,
        report_errors: false,
    }
}

fn create_mock_state(db: sea_orm::DatabaseConnection) -> Arc<ServerState> {
    Arc::new(ServerState {
        db,
        cli: create_mock_cli(),
        events: EventSender::new(),
    })
}

#[test]
fn test_start_pipeline() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<MUpdate>::new()])
            .into_connection();
        let state = create_mock_state(db);

        let result = start_pipeline(state).await;
        assert!(result.is_ok());
    });
}

/// A side-tag update on a release without central composes goes straight to
/// testing once its last build is signed.
#[tokio::test]
async fn test_side_tag_update_reaches_testing_on_final_signing() {
    let release_id = Uuid::new_v4();
    let update_id = Uuid::new_v4();
    let created = NaiveDate::from_ymd_opt(2025, 3, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    let release = MRelease {
        id: release_id,
        name: "F43".to_string(),
        pending_testing_tag: Some("f43-updates-testing-pending".to_string()),
        testing_tag: "f43-updates-testing".to_string(),
        stable_tag: "f43-updates".to_string(),
        composed: false,
    };

    let update = MUpdate {
        id: update_id,
        alias: "CASCADE-2025-0042".to_string(),
        release: release_id,
        status: UpdateStatus::Pending,
        request: None,
        test_gating_status: TestGatingStatus::Waiting,
        gating_summary: None,
        autokarma: true,
        stable_karma: 3,
        unstable_karma: -3,
        autotime: false,
        stable_days: 7,
        critpath: false,
        from_tag: Some("f43-build-side-1234".to_string()),
        locked: false,
        pushed: false,
        date_submitted: created,
        date_testing: None,
        date_stable: None,
        updated_at: created,
    };

    let unsigned_build = MBuild {
        id: Uuid::new_v4(),
        nvr: "rust-1.86.0-1.fc43".to_string(),
        update: update_id,
        signed: false,
        content_type: ContentType::Rpm,
        created_at: created,
    };

    let signed_build = MBuild {
        signed: true,
        ..unsigned_build.clone()
    };

    // Gating is switched off in this deployment, so the verdict recompute
    // after the final signing caches `Ignored`.
    let ignored_update = MUpdate {
        test_gating_status: TestGatingStatus::Ignored,
        ..update.clone()
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        // Handler lookups: build, its update, the release.
        .append_query_results([vec![unsigned_build.clone()]])
        .append_query_results([vec![update.clone()]])
        .append_query_results([vec![release.clone()]])
        // Signing write returns the updated row, then the signed-state scan.
        .append_query_results([vec![signed_build.clone()]])
        .append_query_results([vec![signed_build.clone()]])
        // Verdict write and the re-fetch of the refreshed row.
        .append_query_results([vec![ignored_update.clone()]])
        .append_query_results([vec![ignored_update.clone()]])
        // Promotion input: release, builds, comment history.
        .append_query_results([vec![release.clone()]])
        .append_query_results([vec![signed_build.clone()]])
        .append_query_results([Vec::<MComment>::new()])
        // Executor: re-fetch and guarded status flip.
        .append_query_results([vec![ignored_update.clone()]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        // Outbound event payload: release and build nvrs.
        .append_query_results([vec![release.clone()]])
        .append_query_results([vec![signed_build.clone()]])
        .into_connection();

    let state = create_mock_state(db);
    let mut events = state.events.subscribe();
    let policy = HttpPolicyClient::from_cli(&state.cli);

    let message = BuildTagMessage {
        nvr: "rust-1.86.0-1.fc43".to_string(),
        tag: "f43-build-side-1234-testing-pending".to_string(),
        release: None,
    };

    let outcome = handle_build_tag(Arc::clone(&state), &policy, &message)
        .await
        .unwrap();
    assert_eq!(outcome, HandlerOutcome::Handled);

    match events.try_recv().unwrap() {
        DomainEvent::UpdateReadyForTesting {
            alias,
            release,
            builds,
        } => {
            assert_eq!(alias, "CASCADE-2025-0042");
            assert_eq!(release, "F43");
            assert_eq!(builds, vec!["rust-1.86.0-1.fc43".to_string()]);
        }
        other => panic!("unexpected event: {:?}", other),
    }
}

/// A tag apply that does not match the pending-testing tag is noise.
#[tokio::test]
async fn test_unrelated_tag_is_dropped() {
    let release_id = Uuid::new_v4();
    let update_id = Uuid::new_v4();
    let created = NaiveDate::from_ymd_opt(2025, 3, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    let release = MRelease {
        id: release_id,
        name: "F43".to_string(),
        pending_testing_tag: Some("f43-updates-testing-pending".to_string()),
        testing_tag: "f43-updates-testing".to_string(),
        stable_tag: "f43-updates".to_string(),
        composed: true,
    };

    let update = MUpdate {
        id: update_id,
        alias: "CASCADE-2025-0043".to_string(),
        release: release_id,
        status: UpdateStatus::Pending,
        request: None,
        test_gating_status: TestGatingStatus::Waiting,
        gating_summary: None,
        autokarma: true,
        stable_karma: 3,
        unstable_karma: -3,
        autotime: false,
        stable_days: 7,
        critpath: false,
        from_tag: None,
        locked: false,
        pushed: false,
        date_submitted: created,
        date_testing: None,
        date_stable: None,
        updated_at: created,
    };

    let build = MBuild {
        id: Uuid::new_v4(),
        nvr: "bash-5.3.0-2.fc43".to_string(),
        update: update_id,
        signed: false,
        content_type: ContentType::Rpm,
        created_at: created,
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![build]])
        .append_query_results([vec![update]])
        .append_query_results([vec![release]])
        .into_connection();

    let state = create_mock_state(db);
    let policy = HttpPolicyClient::from_cli(&state.cli);

    let message = BuildTagMessage {
        nvr: "bash-5.3.0-2.fc43".to_string(),
        tag: "f43-updates-candidate".to_string(),
        release: Some("F43".to_string()),
    };

    let outcome = handle_build_tag(Arc::clone(&state), &policy, &message)
        .await
        .unwrap();
    assert_eq!(outcome, HandlerOutcome::Dropped("irrelevant tag"));
}

#[test]
fn test_handler_outcome_distinguishes_drop_reasons() {
    assert_ne!(
        HandlerOutcome::Dropped("unknown build"),
        HandlerOutcome::Dropped("irrelevant tag")
    );
    assert_ne!(HandlerOutcome::Handled, HandlerOutcome::Dropped("x"));
}
