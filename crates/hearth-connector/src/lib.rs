// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST connectors for the Hearth services hub.
//!
//! [`ConnectorClient`] speaks HTTP to a connected service, [`ConnectorHub`]
//! adds credential decryption on top of it, and [`ConnectionManager`] owns
//! the per-user connection lifecycle.

mod auth;
pub mod client;
pub mod hub;
pub mod manager;
pub mod presets;

pub use client::{ConnectorClient, EndpointData, EndpointResult};
pub use hub::{ConnectorHub, TestOutcome};
pub use manager::{ConnectionManager, ConnectionUpdate, NewConnection};
pub use presets::{KNOWN_SERVICE_TYPES, preset_endpoints};
