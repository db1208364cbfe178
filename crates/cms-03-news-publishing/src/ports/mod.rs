//! Ports layer for news publishing

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
