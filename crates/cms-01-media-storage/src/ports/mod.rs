//! Ports layer for media storage

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
