/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod build;
pub mod comment;
pub mod release;
pub mod update;
pub mod user;
