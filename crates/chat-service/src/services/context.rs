//! Service context - dependency container for services
//!
//! Holds all repositories, the typing tracker, and the other dependencies
//! needed by services.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chat_common::auth::{JwtService, PasswordService};
use chat_common::AppConfig;
use chat_core::traits::{
    MemberRepository, MentionRepository, MessageRepository, RoomRepository, SessionRepository,
    UserRepository,
};
use chat_core::{ProfanityFilter, Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};
use super::typing::TypingTracker;

/// Tunables the services read at request time
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Lifetime of a login session
    pub session_ttl: chrono::Duration,
    /// How long a typing indicator stays visible without a refresh
    pub typing_ttl: Duration,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            session_ttl: chrono::Duration::days(7),
            typing_ttl: Duration::from_secs(5),
            upload_dir: PathBuf::from("./uploads"),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl From<&AppConfig> for ServiceSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            session_ttl: chrono::Duration::seconds(config.session.ttl_seconds),
            typing_ttl: Duration::from_secs(config.chat.typing_ttl_seconds),
            upload_dir: PathBuf::from(&config.storage.upload_dir),
            max_upload_bytes: config.storage.max_file_size_bytes(),
        }
    }
}

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Repositories (trait objects, so tests can swap in memory stores)
/// - Session token signing and password hashing
/// - Snowflake generator for ID generation
/// - The profanity filter and typing tracker
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    room_repo: Arc<dyn RoomRepository>,
    member_repo: Arc<dyn MemberRepository>,
    message_repo: Arc<dyn MessageRepository>,
    mention_repo: Arc<dyn MentionRepository>,
    session_repo: Arc<dyn SessionRepository>,

    // Services
    jwt_service: Arc<JwtService>,
    password_service: PasswordService,
    snowflake_generator: Arc<SnowflakeGenerator>,
    profanity_filter: Arc<ProfanityFilter>,

    // Process-local state
    typing: TypingTracker,

    settings: ServiceSettings,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn room_repo(&self) -> &dyn RoomRepository {
        self.room_repo.as_ref()
    }

    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    pub fn mention_repo(&self) -> &dyn MentionRepository {
        self.mention_repo.as_ref()
    }

    pub fn session_repo(&self) -> &dyn SessionRepository {
        self.session_repo.as_ref()
    }

    // === Services ===

    /// Get the session token signer
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    pub fn profanity_filter(&self) -> &ProfanityFilter {
        self.profanity_filter.as_ref()
    }

    pub fn typing(&self) -> &TypingTracker {
        &self.typing
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Get the snowflake ID generator
    pub fn snowflake_generator(&self) -> &SnowflakeGenerator {
        self.snowflake_generator.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("typing_entries", &self.typing.len())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    room_repo: Option<Arc<dyn RoomRepository>>,
    member_repo: Option<Arc<dyn MemberRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    mention_repo: Option<Arc<dyn MentionRepository>>,
    session_repo: Option<Arc<dyn SessionRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    profanity_filter: Option<Arc<ProfanityFilter>>,
    settings: Option<ServiceSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn room_repo(mut self, repo: Arc<dyn RoomRepository>) -> Self {
        self.room_repo = Some(repo);
        self
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn mention_repo(mut self, repo: Arc<dyn MentionRepository>) -> Self {
        self.mention_repo = Some(repo);
        self
    }

    pub fn session_repo(mut self, repo: Arc<dyn SessionRepository>) -> Self {
        self.session_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Defaults to [`ProfanityFilter::default`]
    pub fn profanity_filter(mut self, filter: Arc<ProfanityFilter>) -> Self {
        self.profanity_filter = Some(filter);
        self
    }

    /// Defaults to [`ServiceSettings::default`]
    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        let settings = self.settings.unwrap_or_default();
        let typing = TypingTracker::new(settings.typing_ttl);

        Ok(ServiceContext {
            user_repo: required(self.user_repo, "user_repo")?,
            room_repo: required(self.room_repo, "room_repo")?,
            member_repo: required(self.member_repo, "member_repo")?,
            message_repo: required(self.message_repo, "message_repo")?,
            mention_repo: required(self.mention_repo, "mention_repo")?,
            session_repo: required(self.session_repo, "session_repo")?,
            jwt_service: required(self.jwt_service, "jwt_service")?,
            password_service: PasswordService::new(),
            snowflake_generator: required(self.snowflake_generator, "snowflake_generator")?,
            profanity_filter: self.profanity_filter.unwrap_or_default(),
            typing,
            settings,
        })
    }
}
