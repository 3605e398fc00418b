// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot command handlers.
//!
//! Results go to stdout (JSON where structured); logs go to stderr.

use hearth_config::model::HearthConfig;
use hearth_connector::{ConnectionUpdate, NewConnection};
use hearth_core::{AuthType, Connection, Endpoint, HearthError};
use serde::Serialize;
use tracing::warn;

use crate::app::App;
use crate::{Commands, ConnectionCommand, SessionCommand, serve};

/// Runs a parsed subcommand to completion.
pub async fn run(command: Commands, config: HearthConfig) -> Result<(), HearthError> {
    match command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Keygen => keygen(),
        command => {
            let app = App::open(&config).await?;
            let result = dispatch(&app, command).await;
            if let Err(e) = app.close().await {
                warn!(error = %e, "failed to close storage");
            }
            result
        }
    }
}

fn keygen() -> Result<(), HearthError> {
    println!("{}", hearth_vault::generate_key()?);
    Ok(())
}

async fn dispatch(app: &App, command: Commands) -> Result<(), HearthError> {
    match command {
        Commands::Chat {
            user,
            session,
            message,
        } => {
            let reply = app.agent.chat(&user, &message, session.as_deref()).await?;
            print_json(&reply)
        }
        Commands::Refresh { user } => print_json(&app.engine.refresh_summary(&user).await?),
        Commands::Dashboard { user } => print_json(&app.engine.dashboard(&user).await?),
        Commands::Connection(command) => connection(app, command).await,
        Commands::Sessions(command) => sessions(app, command).await,
        Commands::Serve | Commands::Keygen => Err(HearthError::Internal(
            "command does not use the shared components".to_string(),
        )),
    }
}

async fn connection(app: &App, command: ConnectionCommand) -> Result<(), HearthError> {
    match command {
        ConnectionCommand::Add {
            user,
            service,
            name,
            url,
            frontend_url,
            auth,
            credentials,
            endpoints,
        } => {
            let credentials = serde_json::from_str(&credentials).map_err(|e| {
                HearthError::Validation(format!("--credentials is not valid JSON: {e}"))
            })?;
            let endpoints: Vec<Endpoint> = match endpoints {
                Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                    HearthError::Validation(format!("--endpoints is not a valid endpoint list: {e}"))
                })?,
                None => Vec::new(),
            };
            let created = app
                .connections
                .create(
                    &user,
                    NewConnection {
                        service_type: service,
                        display_name: name,
                        base_url: url,
                        frontend_url,
                        auth_type: AuthType::from_tag(&auth),
                        credentials,
                        endpoints,
                    },
                )
                .await?;
            println!("{}", created.id);
            Ok(())
        }
        ConnectionCommand::List { user } => {
            for c in app.connections.list(&user).await? {
                println!("{}", connection_line(&c));
            }
            Ok(())
        }
        ConnectionCommand::Test { user, id } => print_json(&app.connections.test(&user, &id).await?),
        ConnectionCommand::Enable { user, id } => set_enabled(app, &user, &id, true).await,
        ConnectionCommand::Disable { user, id } => set_enabled(app, &user, &id, false).await,
        ConnectionCommand::Remove { user, id } => app.connections.delete(&user, &id).await,
    }
}

async fn set_enabled(app: &App, user: &str, id: &str, enabled: bool) -> Result<(), HearthError> {
    let update = ConnectionUpdate {
        enabled: Some(enabled),
        ..Default::default()
    };
    let updated = app.connections.update(user, id, update).await?;
    println!("{}", connection_line(&updated));
    Ok(())
}

async fn sessions(app: &App, command: SessionCommand) -> Result<(), HearthError> {
    match command {
        SessionCommand::List { user } => {
            for s in app.agent.list_sessions(&user).await? {
                println!(
                    "{}\t{}\t{} messages\t{}",
                    s.id,
                    s.updated_at.to_rfc3339(),
                    s.message_count,
                    s.title
                );
            }
            Ok(())
        }
        SessionCommand::Show { user, id } => print_json(&app.agent.get_session(&user, &id).await?),
        SessionCommand::Delete { user, id } => app.agent.delete_session(&user, &id).await,
    }
}

/// Tab-separated listing row. Credentials are never printed.
fn connection_line(c: &Connection) -> String {
    let sync = match (&c.last_sync_status, &c.last_sync_error) {
        (Some(status), Some(error)) => format!("{status}: {error}"),
        (Some(status), None) => status.to_string(),
        (None, _) => "never synced".to_string(),
    };
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        c.id,
        c.service_type,
        c.display_name,
        c.base_url,
        if c.enabled { "enabled" } else { "disabled" },
        sync
    )
}

fn print_json<T: Serialize>(value: &T) -> Result<(), HearthError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hearth_core::SyncStatus;

    fn connection() -> Connection {
        Connection {
            id: "c1".into(),
            user_id: "u1".into(),
            service_type: "track".into(),
            display_name: "Track".into(),
            base_url: "http://track.local".into(),
            frontend_url: None,
            auth_type: AuthType::FormGrant,
            encrypted_credentials: "secret-token".into(),
            endpoints: Vec::new(),
            enabled: true,
            last_sync_at: None,
            last_sync_status: None,
            last_sync_error: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn listing_row_hides_credentials() {
        let line = connection_line(&connection());
        assert_eq!(line, "c1\ttrack\tTrack\thttp://track.local\tenabled\tnever synced");
        assert!(!line.contains("secret-token"));
    }

    #[test]
    fn listing_row_shows_sync_error() {
        let mut c = connection();
        c.enabled = false;
        c.last_sync_status = Some(SyncStatus::Error);
        c.last_sync_error = Some("HTTP 401".into());
        assert!(connection_line(&c).ends_with("disabled\terror: HTTP 401"));
    }
}
