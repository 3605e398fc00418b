// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hearth - a household services hub with a tool-using chat agent.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod app;
mod commands;
mod serve;
mod shutdown;

use clap::{Parser, Subcommand};
use tracing::error;

/// Hearth - a household services hub with a tool-using chat agent.
#[derive(Parser, Debug)]
#[command(name = "hearth", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the background dashboard refresher until interrupted.
    Serve,
    /// Send one message to the agent.
    Chat {
        #[arg(long)]
        user: String,
        /// Continue an existing session.
        #[arg(long)]
        session: Option<String>,
        message: String,
    },
    /// Refresh a user's dashboard now.
    Refresh {
        #[arg(long)]
        user: String,
    },
    /// Print a user's stored dashboard as JSON.
    Dashboard {
        #[arg(long)]
        user: String,
    },
    /// Manage service connections.
    #[command(subcommand)]
    Connection(ConnectionCommand),
    /// Inspect chat sessions.
    #[command(subcommand)]
    Sessions(SessionCommand),
    /// Print a fresh base64 vault key.
    Keygen,
}

#[derive(Subcommand, Debug)]
enum ConnectionCommand {
    /// Add a connection. Endpoints default to the service type's preset.
    Add {
        #[arg(long)]
        user: String,
        /// Service type tag, e.g. `track` or `calendar`.
        #[arg(long)]
        service: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        frontend_url: Option<String>,
        /// Auth type tag: jwt_password, jwt_json, api_key, none.
        #[arg(long, default_value = "jwt_password")]
        auth: String,
        /// Credential envelope as a JSON object.
        #[arg(long, default_value = "{}")]
        credentials: String,
        /// Endpoint list as a JSON array.
        #[arg(long)]
        endpoints: Option<String>,
    },
    List {
        #[arg(long)]
        user: String,
    },
    /// Authenticate and probe the service's health path.
    Test {
        #[arg(long)]
        user: String,
        id: String,
    },
    Enable {
        #[arg(long)]
        user: String,
        id: String,
    },
    Disable {
        #[arg(long)]
        user: String,
        id: String,
    },
    Remove {
        #[arg(long)]
        user: String,
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum SessionCommand {
    List {
        #[arg(long)]
        user: String,
    },
    Show {
        #[arg(long)]
        user: String,
        id: String,
    },
    Delete {
        #[arg(long)]
        user: String,
        id: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match hearth_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            hearth_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Some(command) => commands::run(command, config).await,
        None => {
            println!("hearth: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        error!(error = %e, "command failed");
        eprintln!("hearth: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hearth={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
