/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for status enums

use entity::build::ContentType;
use entity::update::{TestGatingStatus, UpdateRequest, UpdateStatus};
use sea_orm::ActiveEnum;

#[test]
fn test_update_status_values_are_stable() {
    assert_eq!(UpdateStatus::Pending.to_value(), 0);
    assert_eq!(UpdateStatus::Testing.to_value(), 1);
    assert_eq!(UpdateStatus::Stable.to_value(), 2);
    assert_eq!(UpdateStatus::Unpushed.to_value(), 3);
    assert_eq!(UpdateStatus::Obsolete.to_value(), 4);
}

#[test]
fn test_test_gating_status_values_are_stable() {
    assert_eq!(TestGatingStatus::Waiting.to_value(), 0);
    assert_eq!(TestGatingStatus::Ignored.to_value(), 1);
    assert_eq!(TestGatingStatus::Queued.to_value(), 2);
    assert_eq!(TestGatingStatus::Running.to_value(), 3);
    assert_eq!(TestGatingStatus::Passed.to_value(), 4);
    assert_eq!(TestGatingStatus::Failed.to_value(), 5);
    assert_eq!(TestGatingStatus::ServiceFailed.to_value(), 6);
}

#[test]
fn test_update_request_variants_differ() {
    assert_ne!(UpdateRequest::Testing, UpdateRequest::Stable);
    assert_ne!(UpdateRequest::Stable, UpdateRequest::Unpush);
    assert_ne!(UpdateRequest::Unpush, UpdateRequest::Obsolete);
    assert_ne!(UpdateRequest::Obsolete, UpdateRequest::Revoke);
}

#[test]
fn test_content_type_try_from_value() {
    assert_eq!(ContentType::try_from_value(&0).unwrap(), ContentType::Rpm);
    assert_eq!(
        ContentType::try_from_value(&1).unwrap(),
        ContentType::Module
    );
    assert_eq!(
        ContentType::try_from_value(&2).unwrap(),
        ContentType::Container
    );
    assert_eq!(
        ContentType::try_from_value(&3).unwrap(),
        ContentType::Flatpak
    );
    assert!(ContentType::try_from_value(&9).is_err());
}
