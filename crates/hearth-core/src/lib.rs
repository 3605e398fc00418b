// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Hearth services hub.
//!
//! This crate provides the error taxonomy, domain types, and adapter traits
//! used throughout the Hearth workspace. Connectors, the agent loop, and the
//! aggregation engine all speak in the types defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::HearthError;
pub use types::{
    AdapterType, AuthType, ChatMessage, ChatRole, ChatSession, Connection, ContentBlock,
    DashboardSnapshot, Endpoint, HealthStatus, MessageContent, ProviderMessage, ProviderRequest,
    ProviderResponse, SessionSummary, SyncRecord, SyncStatus, TokenUsage, ToolCallRecord, Widget,
};

pub use traits::{
    ConnectionStore, PluginAdapter, ProviderAdapter, SessionStore, SnapshotStore, StorageAdapter,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hearth_error_has_all_variants() {
        let _config = HearthError::Config("test".into());
        let _storage = HearthError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _auth = HearthError::Authentication {
            message: "test".into(),
        };
        let _conn = HearthError::connection("test");
        let _decrypt = HearthError::Decryption("test".into());
        let _tool = HearthError::ToolResolution("test".into());
        let _provider = HearthError::model_provider("test");
        let _invalid = HearthError::Validation("test".into());
        let _not_found = HearthError::NotFound {
            entity: "connection",
            id: "c1".into(),
        };
        let _timeout = HearthError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = HearthError::Internal("test".into());
    }

    #[test]
    fn connection_error_displays_bare_message() {
        let err = HearthError::connection("HTTP 500 from http://svc/api/tasks");
        assert_eq!(err.to_string(), "HTTP 500 from http://svc/api/tasks");
    }

    #[test]
    fn auth_type_tags_round_trip() {
        use std::str::FromStr;

        for (tag, expected) in [
            ("jwt_password", AuthType::FormGrant),
            ("jwt_json", AuthType::JsonGrant),
            ("api_key", AuthType::StaticKey),
            ("none", AuthType::None),
        ] {
            assert_eq!(AuthType::from_str(tag).unwrap(), expected);
            assert_eq!(expected.to_string(), tag);
        }
    }

    #[test]
    fn unknown_auth_tag_means_no_authentication() {
        assert_eq!(AuthType::from_tag("oauth2"), AuthType::None);
        let parsed: AuthType = serde_json::from_str("\"oauth2\"").unwrap();
        assert_eq!(parsed, AuthType::None);
    }

    #[test]
    fn default_auth_type_is_form_grant() {
        assert_eq!(AuthType::default(), AuthType::FormGrant);
    }

    #[test]
    fn endpoint_label_falls_back_to_name() {
        let labelled = Endpoint::get("tasks", "/api/tasks", Some("Tasks"));
        let bare = Endpoint::get("projects", "/api/projects", None);
        assert_eq!(labelled.label(), "Tasks");
        assert_eq!(bare.label(), "projects");
    }

    #[test]
    fn endpoint_method_defaults_to_get() {
        let ep: Endpoint = serde_json::from_str(r#"{"name":"a","path":"/a"}"#).unwrap();
        assert_eq!(ep.method, "GET");
        assert!(ep.dashboard_label.is_none());
    }

    #[test]
    fn content_blocks_use_wire_tags() {
        let block = ContentBlock::ToolResult {
            tool_use_id: "tu_1".into(),
            content: "{}".into(),
            is_error: None,
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "tool_result");
        assert!(json.get("is_error").is_none());

        let tool_use: ContentBlock = serde_json::from_value(serde_json::json!({
            "type": "tool_use", "id": "tu_2", "name": "track_tasks", "input": {}
        }))
        .unwrap();
        assert!(matches!(tool_use, ContentBlock::ToolUse { ref name, .. } if name == "track_tasks"));
    }

    #[test]
    fn message_content_text_and_blocks_deserialize() {
        let text: MessageContent = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(text, MessageContent::Text("hello".into()));

        let blocks: MessageContent =
            serde_json::from_str(r#"[{"type":"text","text":"a"},{"type":"text","text":"b"}]"#)
                .unwrap();
        assert_eq!(blocks.as_text(), "a\nb");
    }

    #[test]
    fn assistant_message_drops_empty_tool_log() {
        let plain = ChatMessage::assistant("hi", Vec::new());
        assert!(plain.tool_calls.is_none());

        let logged = ChatMessage::assistant(
            "done",
            vec![ToolCallRecord {
                tool: "track_tasks".into(),
                input: serde_json::json!({}),
            }],
        );
        assert_eq!(logged.tool_calls.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn provider_response_text_joins_blocks() {
        let resp = ProviderResponse {
            id: "msg_1".into(),
            content: vec![
                ContentBlock::Text { text: "one".into() },
                ContentBlock::ToolUse {
                    id: "tu".into(),
                    name: "x".into(),
                    input: serde_json::json!({}),
                },
                ContentBlock::Text { text: "two".into() },
            ],
            model: "m".into(),
            stop_reason: Some("end_turn".into()),
            usage: TokenUsage::default(),
        };
        assert_eq!(resp.text().as_deref(), Some("one\ntwo"));
        assert!(!resp.requests_tools());
    }

    #[test]
    fn sync_status_is_lowercase() {
        assert_eq!(SyncStatus::Success.to_string(), "success");
        assert_eq!(
            serde_json::to_string(&SyncStatus::Error).unwrap(),
            "\"error\""
        );
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_provider_adapter<T: ProviderAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_connection_store<T: ConnectionStore>() {}
        fn _assert_session_store<T: SessionStore>() {}
        fn _assert_snapshot_store<T: SnapshotStore>() {}
    }
}
