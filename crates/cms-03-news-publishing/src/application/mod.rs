//! Application layer for news publishing

pub mod service;
