// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard aggregation for the Hearth services hub.
//!
//! [`AggregationEngine`] builds a user's dashboard snapshot from their
//! connected services; [`AggregationScheduler`] keeps every user's snapshot
//! fresh in the background.

pub mod engine;
pub mod scheduler;

pub use engine::{AggregationEngine, RefreshSummary};
pub use scheduler::{AggregationScheduler, TickReport};
