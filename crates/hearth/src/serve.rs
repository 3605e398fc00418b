// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hearth serve`: keep dashboards fresh until a shutdown signal arrives.

use hearth_aggregate::AggregationScheduler;
use hearth_config::model::HearthConfig;
use hearth_core::HearthError;
use tracing::info;

use crate::app::App;
use crate::shutdown;

pub async fn run_serve(config: HearthConfig) -> Result<(), HearthError> {
    let app = App::open(&config).await?;
    let cancel = shutdown::install_signal_handler();

    let scheduler_task = if config.aggregation.enabled {
        let scheduler = AggregationScheduler::new(
            app.engine.clone(),
            app.storage.clone(),
            &config.aggregation,
        );
        let scheduler_cancel = cancel.clone();
        Some(tokio::spawn(async move {
            scheduler.run(scheduler_cancel).await;
        }))
    } else {
        info!("aggregation scheduler disabled");
        None
    };

    info!(
        agent = config.agent.name.as_str(),
        chat_enabled = app.agent.is_configured(),
        "hearth is running, press Ctrl+C to stop"
    );
    cancel.cancelled().await;

    // A refresh in flight finishes before storage is closed.
    if let Some(task) = scheduler_task {
        task.await
            .map_err(|e| HearthError::Internal(format!("scheduler task failed: {e}")))?;
    }
    app.close().await?;
    info!("shutdown complete");
    Ok(())
}
