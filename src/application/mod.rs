// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - The boundary between HTTP and the services
// - Translates between DTOs and domain entities
// - Owns the status-code mapping of errors

pub mod commands;
pub mod dto;
pub mod error_handling;
pub mod router;
pub mod state;

pub use error_handling::ErrorResponse;
pub use router::build_router;
pub use state::AppState;
