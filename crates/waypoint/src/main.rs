//! # Waypoint CLI Architecture
//!
//! Waypoint ships with a command-line client, but the binary is intentionally thin:
//! the CLI lives in `src/cli/`, while this file only invokes `cli::run()` and
//! handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/waypointapp/`: Core library: collection, validation, storage, geocoding
//! - `crates/waypoint/`: This CLI tool, depends on the `waypointapp` library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/waypoint/src/cli/)                       │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring, prompts, dispatch (commands.rs)          │
//! │  - Terminal rendering (render.rs)                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/waypointapp/src/api.rs)                  │
//! │  - Parses selectors, applies config defaults                │
//! │  - Returns structured `CmdResult` values                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (crates/waypointapp/src/commands/*)          │
//! │  - Business logic over the session                          │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The CLI layer is responsible for **all** user-facing concerns: argument parsing,
//! logging setup, confirmation prompts, rendering and exit codes.
//!
//! ## Testing Approach
//!
//! - **Commands layer**: heavy unit testing against the memory backend and fakes.
//! - **CLI layer**: end-to-end tests in `tests/` run the binary against a temporary
//!   data directory with `assert_cmd`. They pin locations with `--at` and `--country`
//!   so no test touches the network.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
