//! Shared types for the mess server and its clients
//!
//! Wire DTOs, the unified API response envelope, and the declarative
//! form-validation schemas live here so that server and client code
//! agree on exactly one definition.

pub mod client;
pub mod response;
pub mod types;

pub use response::{ApiResponse, FieldError};
pub use types::{MealType, NutritionalInfo, Role};
