// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard snapshot upsert and lookup. One row per user.

use hearth_core::{DashboardSnapshot, HearthError};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};
use crate::queries::json_column;

pub async fn upsert_snapshot(
    db: &Database,
    snapshot: &DashboardSnapshot,
) -> Result<(), HearthError> {
    let user_id = snapshot.user_id.clone();
    let widgets = serde_json::to_string(&snapshot.widgets)?;
    let errors = serde_json::to_string(&snapshot.refresh_errors)?;
    let refreshed_at = snapshot.last_refreshed_at;
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO dashboard_snapshots (user_id, widgets, last_refreshed_at, refresh_errors)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(user_id) DO UPDATE SET
                    widgets = excluded.widgets,
                    last_refreshed_at = excluded.last_refreshed_at,
                    refresh_errors = excluded.refresh_errors",
                params![user_id, widgets, refreshed_at, errors],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_snapshot(
    db: &Database,
    user_id: &str,
) -> Result<Option<DashboardSnapshot>, HearthError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<DashboardSnapshot>, rusqlite::Error> {
            conn.query_row(
                "SELECT user_id, widgets, last_refreshed_at, refresh_errors
                 FROM dashboard_snapshots WHERE user_id = ?1",
                params![user_id],
                |row| {
                    Ok(DashboardSnapshot {
                        user_id: row.get(0)?,
                        widgets: json_column(row, 1)?,
                        last_refreshed_at: row.get(2)?,
                        refresh_errors: json_column(row, 3)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}
