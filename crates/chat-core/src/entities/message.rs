//! Message entity - text and/or media posted to a room, optionally a whisper

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Role;
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Maximum message content length in characters
pub const MAX_CONTENT_CHARS: usize = 100;

/// Kind of attached media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Map an upload MIME type (`image/png`, `video/mp4`, ...) to a media kind
    pub fn from_mime(mime: &str) -> Option<Self> {
        let top = mime.split('/').next()?.trim().to_ascii_lowercase();
        match top.as_str() {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            other => Err(DomainError::InvalidMediaType(other.to_string())),
        }
    }
}

/// Media payload attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    pub media_type: MediaType,
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub room_id: Snowflake,
    pub author_id: Snowflake,
    pub content: Option<String>,
    pub media: Option<Media>,
    pub whisper_to: Option<Snowflake>,
    /// `@` tokens as written, without the sigil
    pub mentions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(
        id: Snowflake,
        room_id: Snowflake,
        author_id: Snowflake,
        content: Option<String>,
        media: Option<Media>,
    ) -> Self {
        Self {
            id,
            room_id,
            author_id,
            content,
            media,
            whisper_to: None,
            mentions: Vec::new(),
            created_at: Utc::now(),
            edited_at: None,
        }
    }

    pub fn with_whisper_to(mut self, target: Snowflake) -> Self {
        self.whisper_to = Some(target);
        self
    }

    pub fn with_mentions(mut self, mentions: Vec<String>) -> Self {
        self.mentions = mentions;
        self
    }

    #[inline]
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    #[inline]
    pub fn is_whisper(&self) -> bool {
        self.whisper_to.is_some()
    }

    /// Whispers are visible only to their sender and target
    pub fn is_visible_to(&self, viewer: Snowflake) -> bool {
        match self.whisper_to {
            Some(target) => viewer == target || viewer == self.author_id,
            None => true,
        }
    }

    /// Only the author may edit, whatever their role
    pub fn ensure_editable_by(&self, actor_id: Snowflake) -> Result<(), DomainError> {
        if self.author_id == actor_id {
            Ok(())
        } else {
            Err(DomainError::NotMessageAuthor)
        }
    }

    pub fn can_be_deleted_by(&self, actor_id: Snowflake, actor_role: Role) -> bool {
        self.author_id == actor_id || actor_role.satisfies(Role::Moderator)
    }

    pub fn ensure_deletable_by(
        &self,
        actor_id: Snowflake,
        actor_role: Role,
    ) -> Result<(), DomainError> {
        if self.can_be_deleted_by(actor_id, actor_role) {
            Ok(())
        } else {
            Err(DomainError::InsufficientRole {
                required: Role::Moderator,
            })
        }
    }

    /// Replace the content and stamp the edit time
    pub fn edit(&mut self, content: Option<String>, now: DateTime<Utc>) {
        self.content = content;
        self.edited_at = Some(now);
    }
}

/// A message needs content or media, and content is capped at
/// [`MAX_CONTENT_CHARS`] characters.
pub fn validate_message_body(
    content: Option<&str>,
    media: Option<&Media>,
) -> Result<(), DomainError> {
    let content = content.filter(|c| !c.trim().is_empty());
    if let Some(c) = content {
        if c.chars().count() > MAX_CONTENT_CHARS {
            return Err(DomainError::ContentTooLong {
                max: MAX_CONTENT_CHARS,
            });
        }
    }
    if content.is_none() && media.is_none() {
        return Err(DomainError::EmptyMessage);
    }
    Ok(())
}
