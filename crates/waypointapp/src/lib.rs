//! # Waypoint Architecture
//!
//! Waypoint is a **UI-agnostic library for curating map locations**: pins with a title,
//! country, rich-text description, media links and an optional quiz, kept as one ordered
//! collection. The `waypoint` binary is one client of it.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (waypoint crate)                                       │
//! │  - Parses arguments, prompts, formats output, exit codes    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Parses selectors, applies config defaults                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Business logic over a Session                            │
//! │  - Returns CmdResult with leveled messages                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session (session.rs) → Collection (collection.rs)          │
//! │  - Authoritative ordered list, persisted on every mutation  │
//! │  - Map selection with stale-response guard                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - KeyValueStore trait: FsBackend, MemBackend               │
//! │  - Startup load that heals corrupt data                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Validation at Every Boundary
//!
//! Anything that replaces the collection in bulk (startup load, import, remote artifact)
//! goes through [`schema::validate`] first. Validation is all-or-nothing: one bad record
//! rejects the whole input and nothing changes.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits the process.
//! Network access sits behind the [`geocode::Geocoder`] and [`remote::ArtifactClient`]
//! traits; diagnostics go through `tracing`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`session`]: Root state object and startup path
//! - [`collection`]: The ordered collection and its commit protocol
//! - [`store`]: Key/value storage abstraction and implementations
//! - [`schema`]: All-or-nothing validation of raw JSON
//! - [`model`]: Core data types (`Location`, `Question`, `Coordinates`)
//! - [`draft`]: Form input and submission rules
//! - [`view`]: Display indexes and selectors
//! - [`geocode`]: Reverse geocoding, place search, request tokens, debouncing
//! - [`remote`]: Launch parameters and the remote artifact
//! - [`config`]: Configuration management
//! - [`init`]: Production wiring
//! - [`error`]: Error types

pub mod api;
pub mod collection;
pub mod commands;
pub mod config;
pub mod draft;
pub mod error;
pub mod geocode;
pub mod init;
pub mod model;
pub mod remote;
pub mod schema;
pub mod session;
pub mod store;
#[cfg(test)]
pub mod test_utils;
pub mod view;
