// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Default endpoint sets for known service types.

use hearth_core::Endpoint;

/// Service types with a built-in endpoint preset.
pub const KNOWN_SERVICE_TYPES: &[&str] = &["track", "calendar"];

/// Endpoints a new connection of `service_type` starts with when none are supplied.
///
/// Unknown service types get an empty list.
pub fn preset_endpoints(service_type: &str) -> Vec<Endpoint> {
    match service_type {
        "track" => vec![
            Endpoint::get("tasks", "/api/tasks", Some("Tasks")),
            Endpoint::get("tasks_active", "/api/tasks?active=true", Some("Active Tasks")),
            Endpoint::get("projects", "/api/projects", Some("Projects")),
        ],
        "calendar" => vec![Endpoint::get(
            "current_week",
            "/api/weeks/current",
            Some("This Week"),
        )],
        _ => Vec::new(),
    }
}
