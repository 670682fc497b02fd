/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for CLI configuration defaults

extern crate core as cascade_core;
use cascade_core::types::Cli;
use clap::Parser;

#[test]
fn test_cli_defaults() {
    let cli = Cli::try_parse_from(["cascade-server", "--database-url", "postgres://test"]).unwrap();

    assert_eq!(cli.log_level, "info");
    assert_eq!(cli.database_url.as_deref(), Some("postgres://test"));
    assert!(cli.database_url_file.is_none());
    assert!(!cli.test_gating_required);
    assert!(cli.policy_api_url.is_none());
    assert_eq!(cli.policy_decision_context, "update_gating");
    assert_eq!(cli.critpath_min_karma, 2);
    assert_eq!(cli.promotion_interval, 60);
    assert_eq!(cli.transition_max_retries, 3);
    assert!(!cli.report_errors);
}

#[test]
fn test_cli_rejects_zero_intervals() {
    let result = Cli::try_parse_from([
        "cascade-server",
        "--database-url",
        "postgres://test",
        "--promotion-interval",
        "0",
    ]);
    assert!(result.is_err());

    let result = Cli::try_parse_from([
        "cascade-server",
        "--database-url",
        "postgres://test",
        "--transition-max-retries",
        "0",
    ]);
    assert!(result.is_err());
}
