//! # Charcoal Site CMS Test Suite
//!
//! Unified test crate driving the assembled system through the gateway.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # TestSite: container + gateway router, RPC helpers
//! └── integration/      # Cross-subsystem flows
//!     ├── ordering_flow.rs
//!     ├── publishing_flow.rs
//!     ├── access_control.rs
//!     └── persistence.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p cms-tests
//!
//! # By flow
//! cargo test -p cms-tests integration::ordering_flow::
//! cargo test -p cms-tests integration::access_control::
//! ```

pub mod harness;
pub mod integration;
