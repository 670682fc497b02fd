/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Test modules for entity package

pub mod build_tests;
pub mod enum_tests;
