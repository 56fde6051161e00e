//! User entity - an account with a role and moderation state

use chrono::{DateTime, Duration, Utc};

use super::Role;
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Days between two username changes
pub const USERNAME_CHANGE_COOLDOWN_DAYS: i64 = 7;

const USERNAME_MIN: usize = 2;
const USERNAME_MAX: usize = 32;

/// Names that collide with reserved mention tokens
const RESERVED_USERNAMES: [&str; 3] = ["everyone", "admin", "mod"];

/// Time-boxed posting restriction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mute {
    pub until: DateTime<Utc>,
    pub reason: String,
}

/// Indefinite authentication block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suspension {
    pub at: DateTime<Utc>,
    pub reason: String,
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub username: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub online: bool,
    pub appear_offline: bool,
    pub mute: Option<Mute>,
    pub suspension: Option<Suspension>,
    pub last_username_change: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with required fields
    pub fn new(id: Snowflake, username: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id,
            username,
            role,
            avatar: None,
            online: false,
            appear_offline: false,
            mute: None,
            suspension: None,
            last_username_change: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Online status as other users should see it
    #[inline]
    pub fn visible_online(&self) -> bool {
        self.online && !self.appear_offline
    }

    // ------------------------------------------------------------------------
    // Mute
    // ------------------------------------------------------------------------

    /// Reject with the mute reason and expiry while the mute is active
    pub fn ensure_can_post(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        match &self.mute {
            Some(mute) if now < mute.until => Err(DomainError::UserMuted {
                reason: mute.reason.clone(),
                until: mute.until,
            }),
            _ => Ok(()),
        }
    }

    // ------------------------------------------------------------------------
    // Suspension
    // ------------------------------------------------------------------------

    #[inline]
    pub fn is_suspended(&self) -> bool {
        self.suspension.is_some()
    }

    /// Reject with the suspension reason if the account is suspended
    pub fn ensure_not_suspended(&self) -> Result<(), DomainError> {
        match &self.suspension {
            Some(s) => Err(DomainError::UserSuspended {
                reason: s.reason.clone(),
            }),
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------------
    // Username
    // ------------------------------------------------------------------------

    /// Earliest time the username may change again, if a cooldown applies
    pub fn next_username_change_at(&self) -> Option<DateTime<Utc>> {
        self.last_username_change
            .map(|last| last + Duration::days(USERNAME_CHANGE_COOLDOWN_DAYS))
    }

    pub fn ensure_can_change_username(&self, now: DateTime<Utc>) -> Result<(), DomainError> {
        match self.next_username_change_at() {
            Some(next_allowed_at) if now < next_allowed_at => {
                Err(DomainError::UsernameChangeCooldown { next_allowed_at })
            }
            _ => Ok(()),
        }
    }

    // ------------------------------------------------------------------------
    // Moderation
    // ------------------------------------------------------------------------

    /// Moderators act only on users ranked strictly below them; the owner may
    /// act on anyone but themself.
    pub fn ensure_can_moderate(&self, target: &User) -> Result<(), DomainError> {
        if self.id == target.id {
            return Err(DomainError::CannotModerateTarget);
        }
        if self.role == Role::Owner || target.role < self.role {
            Ok(())
        } else {
            Err(DomainError::CannotModerateTarget)
        }
    }
}

/// Validate a username: 2-32 characters of letters, digits, `_`, `-` or `.`,
/// and not one of the reserved mention tokens.
pub fn validate_username(username: &str) -> Result<(), DomainError> {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(DomainError::InvalidUsername(format!(
            "must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(DomainError::InvalidUsername(
            "may only contain letters, digits, '_', '-' and '.'".to_string(),
        ));
    }
    if RESERVED_USERNAMES
        .iter()
        .any(|r| r.eq_ignore_ascii_case(username))
    {
        return Err(DomainError::InvalidUsername(format!(
            "'{username}' is reserved"
        )));
    }
    Ok(())
}
