//! Domain layer - Business abstractions
//!
//! This layer contains no SeaORM or Axum code.
//! Only the entity types handed to the API, repository trait definitions
//! and domain error types.

pub mod errors;
pub mod repositories;

pub use errors::DomainError;
pub use repositories::*;
