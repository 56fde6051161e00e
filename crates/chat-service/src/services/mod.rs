//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod auth;
pub mod context;
pub mod error;
pub mod mention;
pub mod message;
pub mod moderation;
pub mod room;
pub mod typing;
pub mod upload;
pub mod user;

// Re-export all services for convenience
pub use auth::{AuthService, AuthenticatedSession};
pub use context::{ServiceContext, ServiceContextBuilder, ServiceSettings};
pub use error::{ServiceError, ServiceResult};
pub use mention::MentionService;
pub use message::MessageService;
pub use moderation::ModerationService;
pub use room::RoomService;
pub use typing::{TypingService, TypingTracker};
pub use upload::{UploadService, UPLOAD_URL_PREFIX};
pub use user::UserService;
