//! # Shared Types Crate
//!
//! Types that cross subsystem boundaries: record identifiers, bilingual
//! text, staff sessions and the error-kind taxonomy.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every cross-crate type is defined here.
//! - **Session First**: services receive `Option<&Session>` and reject
//!   unauthenticated mutations before reading or writing any store.
//! - **Kinds, not Variants**: subsystem errors stay local and expose an
//!   [`ErrorKind`] for the gateway.

pub mod entities;
pub mod errors;
pub mod security;

pub use entities::*;
pub use errors::*;
pub use security::*;
