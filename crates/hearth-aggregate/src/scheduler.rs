// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background refresh loop.
//!
//! The scheduler sleeps first, then refreshes every user that has at least
//! one enabled connection. A failure for one user is logged and the tick
//! moves on. A failure of the tick itself (listing users) adds a backoff
//! sleep before the next interval. Cancellation ends the loop at any sleep,
//! or between users, never in the middle of a user's refresh.

use std::sync::Arc;
use std::time::Duration;

use hearth_config::model::AggregationConfig;
use hearth_core::{ConnectionStore, HearthError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::engine::AggregationEngine;

/// Counts for one scheduler tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub refreshed: usize,
    pub failed: usize,
}

pub struct AggregationScheduler {
    engine: Arc<AggregationEngine>,
    connections: Arc<dyn ConnectionStore>,
    interval: Duration,
    backoff: Duration,
}

impl AggregationScheduler {
    pub fn new(
        engine: Arc<AggregationEngine>,
        connections: Arc<dyn ConnectionStore>,
        config: &AggregationConfig,
    ) -> Self {
        Self {
            engine,
            connections,
            interval: Duration::from_secs(config.interval_secs),
            backoff: Duration::from_secs(config.backoff_secs),
        }
    }

    /// Runs until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            backoff_secs = self.backoff.as_secs(),
            "aggregation scheduler started"
        );

        loop {
            if !sleep_or_cancel(self.interval, &cancel).await {
                break;
            }

            match self.tick(&cancel).await {
                Ok(report) => debug!(
                    refreshed = report.refreshed,
                    failed = report.failed,
                    "scheduler tick complete"
                ),
                Err(e) => {
                    error!(
                        error = %e,
                        backoff_secs = self.backoff.as_secs(),
                        "scheduler tick failed, backing off"
                    );
                    if !sleep_or_cancel(self.backoff, &cancel).await {
                        break;
                    }
                }
            }
        }

        info!("aggregation scheduler shutting down");
    }

    /// Refreshes every user with an enabled connection, one at a time.
    ///
    /// Only the user listing can fail the tick.
    pub async fn tick(&self, cancel: &CancellationToken) -> Result<TickReport, HearthError> {
        let users = self.connections.users_with_enabled_connections().await?;
        let mut report = TickReport::default();

        for user_id in &users {
            if cancel.is_cancelled() {
                break;
            }
            match self.engine.refresh(user_id).await {
                Ok(snapshot) => {
                    report.refreshed += 1;
                    info!(
                        user_id = user_id.as_str(),
                        widgets = snapshot.widgets.len(),
                        "refreshed dashboard"
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    error!(
                        user_id = user_id.as_str(),
                        error = %e,
                        "failed to refresh dashboard"
                    );
                }
            }
        }
        Ok(report)
    }
}

/// Sleeps for `duration`; returns `false` if cancelled first.
async fn sleep_or_cancel(duration: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        _ = cancel.cancelled() => false,
    }
}
