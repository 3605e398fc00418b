// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection CRUD and sync bookkeeping.

use hearth_core::{AuthType, Connection, HearthError, SyncRecord, SyncStatus};
use rusqlite::{OptionalExtension, Row, params};

use crate::database::{Database, map_tr_err};
use crate::queries::{json_column, parsed_column};

const COLUMNS: &str = "id, user_id, service_type, display_name, base_url, frontend_url, \
     auth_type, encrypted_credentials, endpoints, enabled, last_sync_at, last_sync_status, \
     last_sync_error, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<Connection> {
    let auth_tag: String = row.get(6)?;
    let last_sync_status = match row.get::<_, Option<String>>(11)? {
        Some(_) => Some(parsed_column::<SyncStatus>(row, 11)?),
        None => None,
    };
    Ok(Connection {
        id: row.get(0)?,
        user_id: row.get(1)?,
        service_type: row.get(2)?,
        display_name: row.get(3)?,
        base_url: row.get(4)?,
        frontend_url: row.get(5)?,
        auth_type: AuthType::from_tag(&auth_tag),
        encrypted_credentials: row.get(7)?,
        endpoints: json_column(row, 8)?,
        enabled: row.get(9)?,
        last_sync_at: row.get(10)?,
        last_sync_status,
        last_sync_error: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

pub async fn insert_connection(db: &Database, connection: &Connection) -> Result<(), HearthError> {
    let c = connection.clone();
    let endpoints = serde_json::to_string(&c.endpoints)?;
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                &format!(
                    "INSERT INTO connections ({COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
                ),
                params![
                    c.id,
                    c.user_id,
                    c.service_type,
                    c.display_name,
                    c.base_url,
                    c.frontend_url,
                    c.auth_type.to_string(),
                    c.encrypted_credentials,
                    endpoints,
                    c.enabled,
                    c.last_sync_at,
                    c.last_sync_status.map(|s| s.to_string()),
                    c.last_sync_error,
                    c.created_at,
                    c.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrites every mutable column; fails with `NotFound` if the row is gone.
pub async fn update_connection(db: &Database, connection: &Connection) -> Result<(), HearthError> {
    let c = connection.clone();
    let id = c.id.clone();
    let endpoints = serde_json::to_string(&c.endpoints)?;
    let changed = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE connections SET
                    display_name = ?2, base_url = ?3, frontend_url = ?4, auth_type = ?5,
                    encrypted_credentials = ?6, endpoints = ?7, enabled = ?8,
                    last_sync_at = ?9, last_sync_status = ?10, last_sync_error = ?11,
                    updated_at = ?12
                 WHERE id = ?1",
                params![
                    c.id,
                    c.display_name,
                    c.base_url,
                    c.frontend_url,
                    c.auth_type.to_string(),
                    c.encrypted_credentials,
                    endpoints,
                    c.enabled,
                    c.last_sync_at,
                    c.last_sync_status.map(|s| s.to_string()),
                    c.last_sync_error,
                    c.updated_at,
                ],
            )
        })
        .await
        .map_err(map_tr_err)?;

    if changed == 0 {
        return Err(HearthError::NotFound {
            entity: "connection",
            id,
        });
    }
    Ok(())
}

pub async fn get_connection(db: &Database, id: &str) -> Result<Option<Connection>, HearthError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Connection>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM connections WHERE id = ?1"),
                params![id],
                from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// A user's connections, oldest first; `enabled_only` filters disabled ones.
pub async fn list_connections(
    db: &Database,
    user_id: &str,
    enabled_only: bool,
) -> Result<Vec<Connection>, HearthError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Connection>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM connections
                 WHERE user_id = ?1 AND (?2 = 0 OR enabled = 1)
                 ORDER BY created_at, rowid"
            ))?;
            let rows = stmt.query_map(params![user_id, enabled_only], from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete_connection(db: &Database, id: &str) -> Result<bool, HearthError> {
    let id = id.to_string();
    let deleted = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute("DELETE FROM connections WHERE id = ?1", params![id])
        })
        .await
        .map_err(map_tr_err)?;
    Ok(deleted > 0)
}

/// Writes the last-sync columns only. A missing row is ignored.
pub async fn record_sync(db: &Database, id: &str, sync: &SyncRecord) -> Result<(), HearthError> {
    let id = id.to_string();
    let sync = sync.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "UPDATE connections
                 SET last_sync_at = ?2, last_sync_status = ?3, last_sync_error = ?4
                 WHERE id = ?1",
                params![id, sync.at, sync.status.to_string(), sync.error],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn users_with_enabled_connections(db: &Database) -> Result<Vec<String>, HearthError> {
    db.connection()
        .call(|conn| -> Result<Vec<String>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT user_id FROM connections WHERE enabled = 1 ORDER BY user_id",
            )?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
