//! Domain layer for ordered collections

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod ordering;
pub mod payloads;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use ordering::*;
pub use payloads::*;
