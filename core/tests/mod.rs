/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Test modules for core package

pub mod input_tests;
pub mod types_tests;
