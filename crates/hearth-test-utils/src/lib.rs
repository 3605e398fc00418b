// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Hearth integration tests.
//!
//! Provides mock adapters and fixtures for fast, deterministic tests that
//! need neither a database nor a model API.
//!
//! # Components
//!
//! - [`MockProvider`] - Scripted model provider that records requests
//! - [`MemoryStore`] - In-memory connection, session, and snapshot store
//! - [`ConnectionFixture`] - Builder for connections with encrypted credentials

pub mod fixtures;
pub mod memory_store;
pub mod mock_provider;

pub use fixtures::{ConnectionFixture, TEST_KEY, test_config, test_vault};
pub use memory_store::MemoryStore;
pub use mock_provider::{MockProvider, text_response};
