// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded database migrations using refinery.
//!
//! SQL files under `migrations/` are compiled into the binary and applied
//! every time the database is opened.

use hearth_core::HearthError;
use tracing::debug;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Runs all pending migrations against `conn`.
///
/// Refinery records applied versions in `refinery_schema_history`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), HearthError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(|e| HearthError::Storage {
            source: format!("migration failed: {e}").into(),
        })?;
    debug!(
        applied = report.applied_migrations().len(),
        "migrations up to date"
    );
    Ok(())
}
