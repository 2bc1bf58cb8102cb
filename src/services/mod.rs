//! Services Layer
//!
//! Business rules on top of the repositories. Handlers call these with the
//! repositories held in `AppState`.

pub mod component_service;
pub mod kit_service;
pub mod loan_service;
