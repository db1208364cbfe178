//! Domain layer for news publishing

pub mod entities;
pub mod errors;
pub mod slug;
pub mod status;

pub use entities::*;
pub use errors::*;
pub use slug::*;
pub use status::*;
