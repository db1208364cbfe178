//! Ports layer for ordered collections

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
