// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool name derivation.

use std::collections::HashSet;

/// Longest tool name the provider accepts.
pub const MAX_TOOL_NAME_LEN: usize = 64;

/// Derives `serviceType_endpointName`, collapsing every run of characters
/// outside `[A-Za-z0-9_]` into a single `_`.
pub fn sanitize_tool_name(service_type: &str, endpoint_name: &str) -> String {
    let raw = format!("{service_type}_{endpoint_name}");
    let mut name = String::with_capacity(raw.len());
    let mut in_run = false;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            name.push(c);
            in_run = false;
        } else if !in_run {
            name.push('_');
            in_run = true;
        }
    }
    name.truncate(MAX_TOOL_NAME_LEN);
    name
}

/// Returns `base`, or `base_2`, `base_3`, ... if already taken, and marks it taken.
pub(crate) fn claim_unique(base: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.clone()) {
        return base;
    }
    let mut n = 2usize;
    loop {
        let suffix = format!("_{n}");
        let mut stem = base.clone();
        stem.truncate(MAX_TOOL_NAME_LEN - suffix.len());
        let candidate = stem + &suffix;
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(sanitize_tool_name("track", "tasks_active"), "track_tasks_active");
    }

    #[test]
    fn invalid_runs_collapse() {
        assert_eq!(sanitize_tool_name("home-assistant", "this week!!"), "home_assistant_this_week_");
        assert_eq!(sanitize_tool_name("café", "a--b"), "caf__a_b");
    }

    #[test]
    fn long_names_truncate() {
        let name = sanitize_tool_name(&"s".repeat(50), &"e".repeat(50));
        assert_eq!(name.len(), MAX_TOOL_NAME_LEN);
    }

    #[test]
    fn collisions_get_numeric_suffix() {
        let mut taken = HashSet::new();
        assert_eq!(claim_unique("track_tasks".into(), &mut taken), "track_tasks");
        assert_eq!(claim_unique("track_tasks".into(), &mut taken), "track_tasks_2");
        assert_eq!(claim_unique("track_tasks".into(), &mut taken), "track_tasks_3");
    }

    #[test]
    fn suffix_respects_length_limit() {
        let mut taken = HashSet::new();
        let base = "x".repeat(MAX_TOOL_NAME_LEN);
        claim_unique(base.clone(), &mut taken);
        let second = claim_unique(base, &mut taken);
        assert_eq!(second.len(), MAX_TOOL_NAME_LEN);
        assert!(second.ends_with("_2"));
    }

    proptest! {
        #[test]
        fn sanitized_names_match_charset(service in ".*", endpoint in ".*") {
            let name = sanitize_tool_name(&service, &endpoint);
            prop_assert!(!name.is_empty());
            prop_assert!(name.len() <= MAX_TOOL_NAME_LEN);
            prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
            prop_assert_eq!(name, sanitize_tool_name(&service, &endpoint));
        }
    }
}
