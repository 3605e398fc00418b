// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool registry derived from a user's enabled connections.
//!
//! One zero-argument tool is generated per (connection, endpoint) pair. The
//! registry is rebuilt for every conversation turn and never stored. The
//! binding from tool name to `(connection_id, endpoint_name)` lives in a side
//! table and is never part of the definitions handed to the model.

use std::collections::{HashMap, HashSet};

use hearth_connector::ConnectorHub;
use hearth_core::{Connection, ConnectionStore, HearthError};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::naming::{claim_unique, sanitize_tool_name};

/// Output from a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// JSON text: the endpoint payload, or `{"error": ...}`.
    pub content: String,
    /// Whether the invocation failed.
    pub is_error: bool,
}

impl ToolOutput {
    fn success(data: &Value) -> Self {
        Self {
            content: data.to_string(),
            is_error: false,
        }
    }

    fn error(reason: impl std::fmt::Display) -> Self {
        Self {
            content: json!({ "error": reason.to_string() }).to_string(),
            is_error: true,
        }
    }
}

/// The model-facing part of a tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Where a tool's calls are routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolBinding {
    pub connection_id: String,
    pub endpoint_name: String,
}

/// Every tool parameter set is empty.
fn empty_input_schema() -> Value {
    json!({"type": "object", "properties": {}, "required": []})
}

/// Tools for one conversation turn, in connection then endpoint order.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    specs: Vec<ToolSpec>,
    bindings: HashMap<String, ToolBinding>,
}

impl ToolRegistry {
    /// Builds one tool per endpoint of every enabled connection.
    pub fn build(connections: &[Connection]) -> Self {
        let mut registry = Self::default();
        let mut taken = HashSet::new();

        for connection in connections.iter().filter(|c| c.enabled) {
            for endpoint in &connection.endpoints {
                let name = claim_unique(
                    sanitize_tool_name(&connection.service_type, &endpoint.name),
                    &mut taken,
                );
                let description = format!(
                    "Fetch {} from {} ({} service). Endpoint: {} {}",
                    endpoint.label(),
                    connection.display_name,
                    connection.service_type,
                    endpoint.method.to_ascii_uppercase(),
                    endpoint.path
                );
                registry.bindings.insert(
                    name.clone(),
                    ToolBinding {
                        connection_id: connection.id.clone(),
                        endpoint_name: endpoint.name.clone(),
                    },
                );
                registry.specs.push(ToolSpec {
                    name,
                    description,
                    input_schema: empty_input_schema(),
                });
            }
        }

        debug!(tool_count = registry.specs.len(), "tool registry built");
        registry
    }

    pub fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    pub fn binding(&self, name: &str) -> Option<&ToolBinding> {
        self.bindings.get(name)
    }

    /// Definitions in provider format: exactly `name`, `description`, `input_schema`.
    pub fn tool_definitions(&self) -> Vec<Value> {
        self.specs
            .iter()
            .map(|spec| {
                json!({
                    "name": spec.name,
                    "description": spec.description,
                    "input_schema": spec.input_schema,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Invokes a tool by name. Never fails: every error becomes `{"error": ...}`.
    ///
    /// The bound connection is re-read from `store` so that a connection
    /// deleted after the registry was built is reported rather than called.
    pub async fn execute(
        &self,
        name: &str,
        store: &dyn ConnectionStore,
        hub: &ConnectorHub,
    ) -> ToolOutput {
        match self.try_execute(name, store, hub).await {
            Ok(data) => ToolOutput::success(&data),
            Err(e) => {
                warn!(tool = name, error = %e, "tool execution failed");
                ToolOutput::error(e)
            }
        }
    }

    async fn try_execute(
        &self,
        name: &str,
        store: &dyn ConnectionStore,
        hub: &ConnectorHub,
    ) -> Result<Value, HearthError> {
        let binding = self
            .bindings
            .get(name)
            .ok_or_else(|| HearthError::ToolResolution(format!("Unknown tool: {name}")))?;

        // Disabled since the build counts as gone.
        let connection = store
            .get_connection(&binding.connection_id)
            .await?
            .filter(|c| c.enabled)
            .ok_or_else(|| HearthError::ToolResolution("Connection not found".into()))?;

        let endpoint = connection
            .endpoint(&binding.endpoint_name)
            .ok_or_else(|| HearthError::ToolResolution("Endpoint not found".into()))?;

        debug!(
            tool = name,
            connection_id = connection.id,
            endpoint = endpoint.name,
            "executing tool"
        );
        hub.fetch(&connection, endpoint).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::Endpoint;
    use hearth_test_utils::{ConnectionFixture, test_vault};

    fn connections() -> Vec<Connection> {
        let vault = test_vault();
        vec![
            ConnectionFixture::new("u1", "http://track")
                .id("c1")
                .service("track", "My Track")
                .endpoints(vec![
                    Endpoint::get("tasks", "/api/tasks", Some("Tasks")),
                    Endpoint::get("projects", "/api/projects", None),
                ])
                .build(&vault),
            ConnectionFixture::new("u1", "http://cal")
                .id("c2")
                .service("calendar", "Family Calendar")
                .endpoints(vec![Endpoint::get(
                    "current_week",
                    "/api/weeks/current",
                    Some("This Week"),
                )])
                .build(&vault),
            ConnectionFixture::new("u1", "http://off")
                .id("c3")
                .service("track", "Disabled")
                .disabled()
                .build(&vault),
        ]
    }

    #[test]
    fn one_tool_per_enabled_endpoint_in_order() {
        let registry = ToolRegistry::build(&connections());
        let names: Vec<_> = registry.specs().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["track_tasks", "track_projects", "calendar_current_week"]
        );
    }

    #[test]
    fn description_names_label_service_and_route() {
        let registry = ToolRegistry::build(&connections());
        assert_eq!(
            registry.specs()[0].description,
            "Fetch Tasks from My Track (track service). Endpoint: GET /api/tasks"
        );
        assert!(registry.specs()[1].description.starts_with("Fetch projects from"));
    }

    #[test]
    fn definitions_expose_only_public_fields() {
        let registry = ToolRegistry::build(&connections());
        for def in registry.tool_definitions() {
            let keys: Vec<_> = def.as_object().unwrap().keys().cloned().collect();
            assert_eq!(keys.len(), 3, "unexpected keys: {keys:?}");
            assert!(def.get("name").is_some());
            assert!(def.get("description").is_some());
            assert_eq!(def["input_schema"], empty_input_schema());
        }
    }

    #[test]
    fn bindings_are_kept_aside() {
        let registry = ToolRegistry::build(&connections());
        assert_eq!(
            registry.binding("calendar_current_week"),
            Some(&ToolBinding {
                connection_id: "c2".into(),
                endpoint_name: "current_week".into(),
            })
        );
        assert!(registry.binding("track_projects_2").is_none());
    }

    #[test]
    fn duplicate_names_across_connections_are_suffixed() {
        let vault = test_vault();
        let twins = vec![
            ConnectionFixture::new("u1", "http://a").id("a").build(&vault),
            ConnectionFixture::new("u1", "http://b").id("b").build(&vault),
        ];
        let registry = ToolRegistry::build(&twins);
        assert_eq!(registry.binding("track_tasks").unwrap().connection_id, "a");
        assert_eq!(registry.binding("track_tasks_2").unwrap().connection_id, "b");
    }

    #[test]
    fn no_connections_means_empty_registry() {
        let registry = ToolRegistry::build(&[]);
        assert!(registry.is_empty());
        assert!(registry.tool_definitions().is_empty());
    }
}
