//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod auth;
pub mod health;
pub mod mentions;
pub mod messages;
pub mod moderation;
pub mod rooms;
pub mod typing;
pub mod uploads;
pub mod users;
