//! Keep Reading Shared Library
//!
//! Wire types, domain models and validation rules shared by the backend
//! and any Rust client of the Keep Reading API.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::*;
pub use types::*;
