// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool registry for the Hearth agent.
//!
//! Turns a user's connected endpoints into zero-argument tools the model can
//! call, and routes those calls back through the connector layer.

pub mod naming;
pub mod registry;

pub use naming::sanitize_tool_name;
pub use registry::{ToolBinding, ToolOutput, ToolRegistry, ToolSpec};
