//! Application layer for media storage

pub mod service;
