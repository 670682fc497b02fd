/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

/// Outcomes from the test-result bus that count as a pass.
pub const PASSING_OUTCOMES: [&str; 2] = ["PASSED", "INFO"];

/// Summary returned by the policy service when a satisfied decision covers
/// no required tests at all.
pub const NO_TESTS_REQUIRED_SUMMARY: &str = "no tests are required";

/// Suffix appended to a side tag to form its pending-testing tag.
pub const SIDE_TAG_PENDING_TESTING_SUFFIX: &str = "-testing-pending";

pub const EVENT_CHANNEL_CAPACITY: usize = 256;
