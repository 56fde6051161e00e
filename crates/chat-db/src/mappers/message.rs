//! Message entity <-> model mapper

use chat_core::entities::{Media, MediaType, Message};
use chat_core::value_objects::Snowflake;

use crate::models::MessageModel;

/// Convert MessageModel to Message entity
impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        let media = match (model.media_url, model.media_type.as_deref()) {
            (Some(url), Some(kind)) => kind.parse::<MediaType>().ok().map(|media_type| Media {
                url,
                media_type,
            }),
            _ => None,
        };

        Message {
            id: Snowflake::new(model.id),
            room_id: Snowflake::new(model.room_id),
            author_id: Snowflake::new(model.author_id),
            content: model.content,
            media,
            whisper_to: model.whisper_to.map(Snowflake::new),
            mentions: model.mentions,
            created_at: model.created_at,
            edited_at: model.edited_at,
        }
    }
}

/// Column values for inserting a message
pub struct MessageInsert<'a> {
    pub id: i64,
    pub room_id: i64,
    pub author_id: i64,
    pub content: Option<&'a str>,
    pub media_url: Option<&'a str>,
    pub media_type: Option<&'static str>,
    pub whisper_to: Option<i64>,
    pub mentions: &'a [String],
}

impl<'a> MessageInsert<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self {
            id: message.id.into_inner(),
            room_id: message.room_id.into_inner(),
            author_id: message.author_id.into_inner(),
            content: message.content.as_deref(),
            media_url: message.media.as_ref().map(|m| m.url.as_str()),
            media_type: message.media.as_ref().map(|m| m.media_type.as_str()),
            whisper_to: message.whisper_to.map(Snowflake::into_inner),
            mentions: &message.mentions,
        }
    }
}
