//! # CLI Behavior
//!
//! This is **one possible UI client** for waypoint, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ## Naked Execution (`waypoint`)
//!
//! Running `waypoint` with no arguments lists the collection.
//!
//! ## Confirmation
//!
//! `import` and `clear` replace or remove the whole collection. Without `--yes` they
//! print a preview and ask on stdin; anything but `y`/`yes` aborts.
//!
//! ## Pins
//!
//! `add` and `edit` take a pin as `--at LAT,LNG` or `--place NAME` (top search result).
//! The country comes from reverse geocoding unless `--country` is given.
//!
//! ## Exit Codes
//!
//! Refusals (a missing description, a rejected import) are printed in red and exit 0,
//! since the collection is left in a known state. Only errors that escape a command
//! (unknown location, unwritable store) exit 1.
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing`. `RUST_LOG` wins when set; otherwise
//! `-v` shows debug output and the default is warnings only.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup, dispatch, prompts
//! - `render`: Output formatting (lists, details, messages)
//! - `setup`: Argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::run;
