//! Room entity - a public or invite-gated chat room
//!
//! A room is private exactly when it carries an invite code. Visibility is
//! derived from the code rather than stored alongside it, so the two can
//! never disagree.

use chrono::{DateTime, Utc};

use super::Role;
use crate::error::DomainError;
use crate::value_objects::{is_valid_invite_code, Snowflake, INVITE_CODE_LEN};

/// Maximum room name length in characters
pub const ROOM_NAME_MAX: usize = 50;

/// Room entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: Snowflake,
    pub name: String,
    /// `None` once the creator's account has been deleted
    pub creator_id: Option<Snowflake>,
    pub invite_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Create a public room
    pub fn new_public(id: Snowflake, name: String, creator_id: Snowflake) -> Self {
        Self::build(id, name, creator_id, None)
    }

    /// Create a private room gated by `invite_code`
    pub fn new_private(
        id: Snowflake,
        name: String,
        creator_id: Snowflake,
        invite_code: String,
    ) -> Self {
        Self::build(id, name, creator_id, Some(invite_code))
    }

    fn build(
        id: Snowflake,
        name: String,
        creator_id: Snowflake,
        invite_code: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            creator_id: Some(creator_id),
            invite_code,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.invite_code.is_none()
    }

    /// Decide whether a non-member may join.
    ///
    /// Public rooms admit anyone. Private rooms need an exact code match,
    /// except for the owner role which bypasses the check. A missing code and
    /// a wrong code are reported differently; only an absent or empty code
    /// counts as missing, and the code is compared untrimmed.
    pub fn check_join(&self, supplied: Option<&str>, actor_role: Role) -> Result<(), DomainError> {
        let Some(code) = self.invite_code.as_deref() else {
            return Ok(());
        };
        if actor_role == Role::Owner {
            return Ok(());
        }
        match supplied.filter(|s| !s.is_empty()) {
            None => Err(DomainError::InviteCodeRequired),
            Some(given) if given == code => Ok(()),
            Some(_) => Err(DomainError::InvalidInviteCode),
        }
    }

    /// Creator or admin-and-above may rename, delete or rotate the code
    pub fn can_be_managed_by(&self, actor_id: Snowflake, actor_role: Role) -> bool {
        self.creator_id == Some(actor_id) || actor_role.satisfies(Role::Admin)
    }

    pub fn ensure_manageable_by(
        &self,
        actor_id: Snowflake,
        actor_role: Role,
    ) -> Result<(), DomainError> {
        if self.can_be_managed_by(actor_id, actor_role) {
            Ok(())
        } else {
            Err(DomainError::NotRoomManager)
        }
    }

    pub fn rename(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    /// Replace the invite code of a private room
    pub fn rotate_invite_code(&mut self, code: String) -> Result<(), DomainError> {
        if self.is_public() {
            return Err(DomainError::ValidationError(
                "public rooms have no invite code".to_string(),
            ));
        }
        if !is_valid_invite_code(&code) {
            return Err(DomainError::ValidationError(format!(
                "invite code must be {INVITE_CODE_LEN} digits"
            )));
        }
        self.invite_code = Some(code);
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Validate and normalise a room name: trimmed, 1-50 characters
pub fn validate_room_name(name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidRoomName("name cannot be empty".to_string()));
    }
    if trimmed.chars().count() > ROOM_NAME_MAX {
        return Err(DomainError::InvalidRoomName(format!(
            "name cannot exceed {ROOM_NAME_MAX} characters"
        )));
    }
    Ok(trimmed.to_string())
}
