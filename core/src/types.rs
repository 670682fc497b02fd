/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::events::EventSender;
use super::input::greater_than_zero;
use clap::Parser;
use entity::*;
use sea_orm::DatabaseConnection;

#[derive(Parser, Debug)]
#[command(name = "Cascade", display_name = "Cascade", bin_name = "cascade-server", author = "Cascade Contributors", version, about, long_about = None)]
pub struct Cli {
    #[arg(long, env = "CASCADE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
    #[arg(long, env = "CASCADE_DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(long, env = "CASCADE_DATABASE_URL_FILE")]
    pub database_url_file: Option<String>,
    #[arg(long, env = "CASCADE_TEST_GATING_REQUIRED", default_value = "false")]
    pub test_gating_required: bool,
    #[arg(long, env = "CASCADE_POLICY_API_URL")]
    pub policy_api_url: Option<String>,
    #[arg(
        long,
        env = "CASCADE_POLICY_DECISION_CONTEXT",
        default_value = "update_gating"
    )]
    pub policy_decision_context: String,
    #[arg(long, env = "CASCADE_CRITPATH_MIN_KARMA", default_value = "2")]
    pub critpath_min_karma: i32,
    #[arg(long, env = "CASCADE_PROMOTION_INTERVAL", value_parser = greater_than_zero::<u64>, default_value = "60")]
    pub promotion_interval: u64,
    #[arg(long, env = "CASCADE_TRANSITION_MAX_RETRIES", value_parser = greater_than_zero::<usize>, default_value = "3")]
    pub transition_max_retries: usize,
    #[arg(long, env = "CASCADE_REPORT_ERRORS", default_value = "false")]
    pub report_errors: bool,
}

#[derive(Debug)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub cli: Cli,
    pub events: EventSender,
}

pub type EBuild = build::Entity;
pub type EComment = comment::Entity;
pub type ERelease = release::Entity;
pub type EUpdate = update::Entity;
pub type EUser = user::Entity;

pub type MBuild = build::Model;
pub type MComment = comment::Model;
pub type MRelease = release::Model;
pub type MUpdate = update::Model;
pub type MUser = user::Model;

pub type ABuild = build::ActiveModel;
pub type AComment = comment::ActiveModel;
pub type ARelease = release::ActiveModel;
pub type AUpdate = update::ActiveModel;
pub type AUser = user::ActiveModel;

pub type CBuild = build::Column;
pub type CComment = comment::Column;
pub type CRelease = release::Column;
pub type CUpdate = update::Column;
pub type CUser = user::Column;

pub type RBuild = build::Relation;
pub type RComment = comment::Relation;
pub type RUpdate = update::Relation;
