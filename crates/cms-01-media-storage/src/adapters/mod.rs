//! Adapters for media storage
//!
//! - `signing`: HMAC-SHA256 presigned URL signer and verifier
//! - `memory`: in-process bucket used for local runs and tests

pub mod memory;
pub mod signing;

pub use memory::InMemoryObjectStorage;
pub use signing::HmacUrlSigner;
