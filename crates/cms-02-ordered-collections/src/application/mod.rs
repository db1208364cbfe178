//! Application layer for ordered collections

pub mod service;
