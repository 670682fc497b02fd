/*
 * SPDX-FileCopyrightText: 2025 Cascade Contributors
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub fn greater_than_zero<
    T: std::str::FromStr + std::cmp::PartialOrd + std::fmt::Display + Default,
>(
    s: &str,
) -> Result<T, String> {
    let num: T = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid number", s))?;

    if num > T::default() {
        Ok(num)
    } else {
        Err(format!("`{}` is not larger than 0", s))
    }
}

/// Split a name-version-release string into its three parts.
///
/// The name itself may contain dashes, so the split happens at the last two.
pub fn parse_nvr(nvr: &str) -> Result<(String, String, String), String> {
    let mut parts = nvr.rsplitn(3, '-');

    let release = parts.next().filter(|s| !s.is_empty());
    let version = parts.next().filter(|s| !s.is_empty());
    let name = parts.next().filter(|s| !s.is_empty());

    match (name, version, release) {
        (Some(n), Some(v), Some(r)) => Ok((n.to_string(), v.to_string(), r.to_string())),
        _ => Err(format!("`{}` is not a valid name-version-release", nvr)),
    }
}

/// The pending-testing tag of a developer side tag.
pub fn side_tag_pending_testing(from_tag: &str) -> String {
    format!(
        "{}{}",
        from_tag,
        super::consts::SIDE_TAG_PENDING_TESTING_SUFFIX
    )
}
