//! # chat-service
//!
//! Application layer: services over a [`ServiceContext`] of repository trait
//! objects, request/response DTOs, and the in-process typing tracker.

pub mod dto;
pub mod services;

pub use services::{
    AuthService, AuthenticatedSession, MentionService, MessageService, ModerationService,
    RoomService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
    ServiceSettings, TypingService, TypingTracker, UploadService, UserService,
    UPLOAD_URL_PREFIX,
};
