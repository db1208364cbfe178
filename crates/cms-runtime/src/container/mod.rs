//! # Subsystem Container
//!
//! Configuration plus the container that owns every subsystem service and
//! wires them to their stores.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, MediaSettings, RuntimeConfig, StorageConfig};
pub use subsystems::{CmsContainer, ContainerError};
