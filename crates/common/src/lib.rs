//! Shared types for the HubScore sync workspace

mod error;
mod secret;

pub use error::{Error, Result};
pub use secret::Secret;
