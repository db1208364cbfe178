//! Cross-subsystem flows through the assembled gateway.

pub mod access_control;
pub mod ordering_flow;
pub mod persistence;
pub mod publishing_flow;
