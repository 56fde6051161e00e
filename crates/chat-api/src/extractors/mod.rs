//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, and pagination.

mod auth;
mod pagination;
mod path;
mod validated;

pub use auth::{session_token, AuthUser};
pub use pagination::{OffsetParams, Pagination, PaginationParams};
pub use path::IdPath;
pub use validated::{OptionalValidatedJson, ValidatedJson};
