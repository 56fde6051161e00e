//! Message service
//!
//! Posting runs a fixed pipeline: mute check, slash-command expansion,
//! whisper resolution, profanity filter, length check, then mention
//! recording. Reads are whisper-filtered by the repository and clear the
//! reader's unread mentions for the room.

use std::collections::HashMap;

use chat_core::entities::{
    validate_message_body, Media, MediaType, Message, Room, UnreadMention, User,
};
use chat_core::traits::MessageQuery;
use chat_core::{expand_commands, extract_mentions, resolve_mentions, DomainError, Snowflake};
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::dto::{
    AddMentionsRequest, CreateMessageRequest, MessageResponse, MessageWithDetails,
    RecordedMentionsResponse, UpdateMessageRequest, UserRef,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::room::RoomService;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post a message. Non-members of a public room join implicitly.
    #[instrument(skip(self, request))]
    pub async fn create_message(
        &self,
        room_id: Snowflake,
        author_id: Snowflake,
        request: CreateMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        let rooms = RoomService::new(self.ctx);
        let room = rooms.load_room(room_id).await?;
        let author = self.load_user(author_id).await?;

        author
            .ensure_can_post(Utc::now())
            .inspect_err(|_| warn!(user_id = %author_id, "Post refused: user muted"))?;

        rooms.ensure_access(&room, author_id).await?;

        let expanded = expand_commands(request.content.as_deref().unwrap_or_default())?;

        let whisper_target = match expanded.whisper_to.as_deref() {
            Some(username) => Some(self.resolve_whisper_target(&room, &author, username).await?),
            None => None,
        };

        let content = expanded
            .content
            .map(|c| self.ctx.profanity_filter().filter(&c));
        let media = match expanded.media {
            Some(media) => Some(media),
            None => request.media.map(|m| parse_media(&m.url, &m.media_type)).transpose()?,
        };
        validate_message_body(content.as_deref(), media.as_ref())?;

        let tokens = content.as_deref().map(extract_mentions).unwrap_or_default();

        let mut message = Message::new(self.ctx.generate_id(), room_id, author_id, content, media)
            .with_mentions(tokens.clone());
        if let Some(target) = &whisper_target {
            message = message.with_whisper_to(target.id);
        }

        self.ctx.message_repo().create(&message).await?;
        self.ctx.typing().stop(room_id, author_id);

        if !tokens.is_empty() {
            let candidates = self.mention_candidates(&message, whisper_target.as_ref()).await?;
            let recorded = self.record_mentions(&message, &tokens, &candidates).await?;
            info!(message_id = %message.id, recorded, "Mentions recorded");
        }

        info!(message_id = %message.id, room_id = %room_id, whisper = message.is_whisper(), "Message created");

        Ok(MessageResponse::from(MessageWithDetails {
            author: UserRef::from(&author),
            whisper_to: whisper_target.as_ref().map(UserRef::from),
            message,
        }))
    }

    /// List messages visible to the viewer, newest first, and clear their
    /// unread mentions for the room.
    #[instrument(skip(self))]
    pub async fn list_messages(
        &self,
        room_id: Snowflake,
        viewer_id: Snowflake,
        query: MessageQuery,
    ) -> ServiceResult<Vec<MessageResponse>> {
        let rooms = RoomService::new(self.ctx);
        let room = rooms.load_room(room_id).await?;
        rooms.ensure_access(&room, viewer_id).await?;

        let messages = self
            .ctx
            .message_repo()
            .find_visible(room_id, viewer_id, query)
            .await?;

        let cleared = self.ctx.mention_repo().clear_room(viewer_id, room_id).await?;
        if cleared > 0 {
            info!(room_id = %room_id, user_id = %viewer_id, cleared, "Unread mentions cleared");
        }

        let mut users: HashMap<Snowflake, UserRef> = HashMap::new();
        let mut responses = Vec::with_capacity(messages.len());
        for message in messages {
            let author = self.user_ref(&mut users, message.author_id).await?;
            let whisper_to = match message.whisper_to {
                Some(id) => Some(self.user_ref(&mut users, id).await?),
                None => None,
            };
            responses.push(MessageResponse::from(MessageWithDetails {
                message,
                author,
                whisper_to,
            }));
        }
        Ok(responses)
    }

    /// Edit content. Author only, whatever their role; muted authors cannot edit.
    #[instrument(skip(self, request))]
    pub async fn update_message(
        &self,
        message_id: Snowflake,
        actor_id: Snowflake,
        request: UpdateMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        let mut message = self.load_message(message_id).await?;
        message.ensure_editable_by(actor_id)?;

        let author = self.load_user(actor_id).await?;
        author.ensure_can_post(Utc::now())?;

        let content = self.ctx.profanity_filter().filter(request.content.trim());
        let content = (!content.trim().is_empty()).then_some(content);
        validate_message_body(content.as_deref(), message.media.as_ref())?;

        message.mentions = content.as_deref().map(extract_mentions).unwrap_or_default();
        message.edit(content, Utc::now());
        self.ctx.message_repo().update(&message).await?;

        info!(message_id = %message_id, "Message edited");

        let whisper_to = match message.whisper_to {
            Some(id) => Some(UserRef::from(&self.load_user(id).await?)),
            None => None,
        };
        Ok(MessageResponse::from(MessageWithDetails {
            message,
            author: UserRef::from(&author),
            whisper_to,
        }))
    }

    /// Delete a message (author, or moderator and above)
    #[instrument(skip(self))]
    pub async fn delete_message(&self, message_id: Snowflake, actor_id: Snowflake) -> ServiceResult<()> {
        let message = self.load_message(message_id).await?;
        let actor = self.load_user(actor_id).await?;
        message
            .ensure_deletable_by(actor.id, actor.role)
            .inspect_err(|_| warn!(message_id = %message_id, actor_id = %actor_id, "Delete refused"))?;

        self.ctx.message_repo().delete(message_id).await?;

        info!(message_id = %message_id, actor_id = %actor_id, "Message deleted");
        Ok(())
    }

    /// Record unread mentions for named users on an existing message. Names
    /// resolve like `@` tokens, limited to room members (or to the whisper
    /// target for a whisper).
    #[instrument(skip(self, request))]
    pub async fn add_mentions(
        &self,
        message_id: Snowflake,
        actor_id: Snowflake,
        request: AddMentionsRequest,
    ) -> ServiceResult<RecordedMentionsResponse> {
        let message = self.load_message(message_id).await?;
        message.ensure_editable_by(actor_id)?;

        let whisper_target = match message.whisper_to {
            Some(id) => Some(self.load_user(id).await?),
            None => None,
        };
        let candidates = self.mention_candidates(&message, whisper_target.as_ref()).await?;

        let tokens: Vec<String> = request
            .usernames
            .iter()
            .map(|name| name.trim().trim_start_matches('@').to_string())
            .filter(|name| !name.is_empty())
            .collect();
        let recorded = self.record_mentions(&message, &tokens, &candidates).await?;

        info!(message_id = %message_id, recorded, "Extra mentions recorded");
        Ok(RecordedMentionsResponse { recorded })
    }

    async fn resolve_whisper_target(
        &self,
        room: &Room,
        author: &User,
        username: &str,
    ) -> ServiceResult<User> {
        let target = self
            .ctx
            .user_repo()
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::InvalidWhisper(format!("no user named '{username}'")))?;

        if target.id == author.id {
            return Err(DomainError::InvalidWhisper("cannot whisper to yourself".to_string()).into());
        }
        if !self.ctx.member_repo().is_member(room.id, target.id).await? {
            return Err(
                DomainError::InvalidWhisper(format!("'{}' is not in this room", target.username)).into(),
            );
        }
        Ok(target)
    }

    /// Whispers can only notify their target; other messages notify members
    async fn mention_candidates(
        &self,
        message: &Message,
        whisper_target: Option<&User>,
    ) -> ServiceResult<Vec<User>> {
        match whisper_target {
            Some(target) => Ok(vec![target.clone()]),
            None => Ok(self.ctx.member_repo().list_users(message.room_id).await?),
        }
    }

    async fn record_mentions(
        &self,
        message: &Message,
        tokens: &[String],
        candidates: &[User],
    ) -> ServiceResult<u64> {
        let mentioned = resolve_mentions(tokens, candidates, message.author_id);
        if mentioned.is_empty() {
            return Ok(0);
        }

        let rows: Vec<UnreadMention> = mentioned
            .into_iter()
            .map(|user_id| UnreadMention::new(user_id, message.id, message.room_id))
            .collect();
        Ok(self.ctx.mention_repo().create_many(&rows).await?)
    }

    async fn user_ref(
        &self,
        cache: &mut HashMap<Snowflake, UserRef>,
        user_id: Snowflake,
    ) -> ServiceResult<UserRef> {
        if let Some(found) = cache.get(&user_id) {
            return Ok(found.clone());
        }
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::internal(format!("message references missing user {user_id}")))?;
        let user_ref = UserRef::from(&user);
        cache.insert(user_id, user_ref.clone());
        Ok(user_ref)
    }

    async fn load_message(&self, message_id: Snowflake) -> ServiceResult<Message> {
        self.ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| DomainError::MessageNotFound(message_id).into())
    }

    async fn load_user(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }
}

fn parse_media(url: &str, media_type: &str) -> Result<Media, DomainError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(DomainError::ValidationError("media url is required".to_string()));
    }
    Ok(Media {
        url: url.to_string(),
        media_type: media_type.parse::<MediaType>()?,
    })
}
