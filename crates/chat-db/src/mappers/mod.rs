//! Entity to model mappers
//!
//! - `From<Model> for Entity`: convert database rows to domain objects
//! - `*Insert` structs: prepare entity data for database writes

mod message;
mod room;
mod session;
mod user;

pub use message::MessageInsert;
pub use user::parse_role;
