/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for input validation and parsing functions

extern crate core as cascade_core;
use cascade_core::input::*;

#[test]
fn test_greater_than_zero() {
    let num = greater_than_zero::<u32>("1").unwrap();
    assert_eq!(num, 1);

    let num = greater_than_zero::<usize>("0").unwrap_err();
    assert_eq!(num, "`0` is not larger than 0");

    let num = greater_than_zero::<u32>("-1").unwrap_err();
    assert_eq!(num, "`-1` is not a valid number");

    let num = greater_than_zero::<i32>("-1").unwrap_err();
    assert_eq!(num, "`-1` is not larger than 0");

    let num = greater_than_zero::<u32>("a").unwrap_err();
    assert_eq!(num, "`a` is not a valid number");
}

#[test]
fn test_parse_nvr() {
    let (name, version, release) = parse_nvr("kernel-6.15.1-300.fc43").unwrap();
    assert_eq!(name, "kernel");
    assert_eq!(version, "6.15.1");
    assert_eq!(release, "300.fc43");

    // Dashes in the package name stay with the name.
    let (name, version, release) = parse_nvr("rust-packaging-tools-27-3.fc43").unwrap();
    assert_eq!(name, "rust-packaging-tools");
    assert_eq!(version, "27");
    assert_eq!(release, "3.fc43");

    let err = parse_nvr("kernel-6.15.1").unwrap_err();
    assert_eq!(err, "`kernel-6.15.1` is not a valid name-version-release");

    let err = parse_nvr("kernel--1.fc43").unwrap_err();
    assert_eq!(err, "`kernel--1.fc43` is not a valid name-version-release");

    let err = parse_nvr("").unwrap_err();
    assert_eq!(err, "`` is not a valid name-version-release");
}

#[test]
fn test_side_tag_pending_testing() {
    assert_eq!(
        side_tag_pending_testing("f43-build-side-1234"),
        "f43-build-side-1234-testing-pending"
    );
}
