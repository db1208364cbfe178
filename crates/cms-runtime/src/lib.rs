//! # CMS Runtime Library
//!
//! This library exposes the runtime's configuration and subsystem container
//! for testing. The main entry point is the `main.rs` binary.
//!
//! ## Architectural Patterns
//!
//! - **Hexagonal Architecture**: Ports define contracts, Adapters implement them
//! - **Single Container**: every service is built once and shared via `Arc`
//! - **Pluggable Storage**: SQLite when a database path is configured, memory otherwise

#![allow(clippy::type_complexity)]

pub mod container;

pub use container::{CmsContainer, ConfigError, ContainerError, RuntimeConfig};
