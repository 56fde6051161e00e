//! In-memory repositories and context helpers for service tests
//!
//! One `MemoryStore` backs all six repository traits and mirrors the
//! PostgreSQL behaviour the services rely on: case-insensitive usernames,
//! unique invite codes, cascading deletes and the whisper filter.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chat_common::auth::JwtService;
use chat_core::entities::{
    MentionSummary, Message, Mute, Role, Room, RoomMember, Session, Suspension, UnreadMention,
    User,
};
use chat_core::traits::{
    MemberRepository, MentionRepository, MessageQuery, MessageRepository, ProfileUpdate,
    RepoResult, RoomRepository, SessionRepository, UserRepository,
};
use chat_core::{DomainError, Snowflake, SnowflakeGenerator};
use chat_service::dto::{AuthResponse, CreateRoomRequest, RegisterRequest};
use chat_service::{AuthService, RoomService, ServiceContext, ServiceSettings};
use chrono::{DateTime, Utc};

pub const PASSWORD: &str = "Password1";

#[derive(Default)]
struct State {
    users: Vec<(User, String)>,
    rooms: Vec<Room>,
    members: Vec<RoomMember>,
    messages: Vec<Message>,
    mentions: Vec<UnreadMention>,
    sessions: Vec<Session>,
}

impl State {
    fn drop_room(&mut self, room_id: Snowflake) {
        self.rooms.retain(|r| r.id != room_id);
        self.members.retain(|m| m.room_id != room_id);
        self.messages.retain(|m| m.room_id != room_id);
        self.mentions.retain(|m| m.room_id != room_id);
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    fn with<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    fn modify_user(&self, id: Snowflake, f: impl FnOnce(&mut User)) -> RepoResult<User> {
        self.with(|s| {
            let (stored, _) = s
                .users
                .iter_mut()
                .find(|(u, _)| u.id == id)
                .ok_or(DomainError::UserNotFound(id))?;
            f(stored);
            stored.updated_at = Utc::now();
            Ok(stored.clone())
        })
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.with(|s| s.users.iter().find(|(u, _)| u.id == id).map(|(u, _)| u.clone())))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self.with(|s| {
            s.users
                .iter()
                .find(|(u, _)| same_name(&u.username, username))
                .map(|(u, _)| u.clone())
        }))
    }

    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<User>> {
        Ok(self.with(|s| {
            let mut users: Vec<User> = s.users.iter().map(|(u, _)| u.clone()).collect();
            users.sort_by_key(|u| u.username.to_lowercase());
            users
                .into_iter()
                .skip(offset.max(0) as usize)
                .take(limit.max(0) as usize)
                .collect()
        }))
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<User> {
        self.with(|s| {
            if s.users.iter().any(|(u, _)| same_name(&u.username, &user.username)) {
                return Err(DomainError::UsernameTaken);
            }
            let mut stored = user.clone();
            if s.users.is_empty() {
                stored.role = Role::Owner;
            }
            s.users.push((stored.clone(), password_hash.to_string()));
            Ok(stored)
        })
    }

    async fn set_profile(&self, id: Snowflake, update: &ProfileUpdate) -> RepoResult<User> {
        self.modify_user(id, |user| {
            if let Some(appear_offline) = update.appear_offline {
                user.appear_offline = appear_offline;
            }
            if let Some(avatar) = &update.avatar {
                user.avatar = avatar.clone();
            }
        })
    }

    async fn set_username(
        &self,
        id: Snowflake,
        username: &str,
        changed_at: DateTime<Utc>,
    ) -> RepoResult<User> {
        let taken = self.with(|s| {
            s.users
                .iter()
                .any(|(u, _)| u.id != id && same_name(&u.username, username))
        });
        if taken {
            return Err(DomainError::UsernameTaken);
        }
        self.modify_user(id, |user| {
            user.username = username.to_string();
            user.last_username_change = Some(changed_at);
        })
    }

    async fn set_mute(&self, id: Snowflake, mute: &Mute) -> RepoResult<User> {
        self.modify_user(id, |user| user.mute = Some(mute.clone()))
    }

    async fn clear_mute(&self, id: Snowflake) -> RepoResult<User> {
        self.modify_user(id, |user| user.mute = None)
    }

    async fn set_suspension(
        &self,
        id: Snowflake,
        suspension: Option<&Suspension>,
    ) -> RepoResult<User> {
        self.modify_user(id, |user| {
            if suspension.is_some() {
                user.online = false;
            }
            user.suspension = suspension.cloned();
        })
    }

    async fn set_role(&self, id: Snowflake, role: Role) -> RepoResult<User> {
        self.modify_user(id, |user| user.role = role)
    }

    async fn set_online(&self, id: Snowflake, online: bool) -> RepoResult<()> {
        self.with(|s| {
            let (stored, _) = s
                .users
                .iter_mut()
                .find(|(u, _)| u.id == id)
                .ok_or(DomainError::UserNotFound(id))?;
            stored.online = online;
            Ok(())
        })
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        Ok(self.with(|s| s.users.iter().find(|(u, _)| u.id == id).map(|(_, h)| h.clone())))
    }

    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()> {
        self.with(|s| {
            let (_, hash) = s
                .users
                .iter_mut()
                .find(|(u, _)| u.id == id)
                .ok_or(DomainError::UserNotFound(id))?;
            *hash = password_hash.to_string();
            Ok(())
        })
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        self.with(|s| {
            let before = s.users.len();
            s.users.retain(|(u, _)| u.id != id);
            if s.users.len() == before {
                return Err(DomainError::UserNotFound(id));
            }
            s.members.retain(|m| m.user_id != id);
            s.messages.retain(|m| m.author_id != id && m.whisper_to != Some(id));
            let messages: Vec<Snowflake> = s.messages.iter().map(|m| m.id).collect();
            s.mentions
                .retain(|m| m.user_id != id && messages.contains(&m.message_id));
            s.sessions.retain(|x| x.user_id != id);
            for room in s.rooms.iter_mut().filter(|r| r.creator_id == Some(id)) {
                room.creator_id = None;
            }
            Ok(())
        })
    }
}

#[async_trait]
impl RoomRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Room>> {
        Ok(self.with(|s| s.rooms.iter().find(|r| r.id == id).cloned()))
    }

    async fn find_visible(&self, user_id: Snowflake) -> RepoResult<Vec<Room>> {
        Ok(self.with(|s| {
            let mut rooms: Vec<Room> = s
                .rooms
                .iter()
                .filter(|r| {
                    r.is_public()
                        || s.members.iter().any(|m| m.room_id == r.id && m.user_id == user_id)
                })
                .cloned()
                .collect();
            rooms.sort_by_key(|r| r.name.to_lowercase());
            rooms
        }))
    }

    async fn create(&self, room: &Room) -> RepoResult<()> {
        self.with(|s| {
            if room.invite_code.is_some()
                && s.rooms.iter().any(|r| r.invite_code == room.invite_code)
            {
                return Err(DomainError::InviteCodeExists);
            }
            s.rooms.push(room.clone());
            Ok(())
        })
    }

    async fn update(&self, room: &Room) -> RepoResult<()> {
        self.with(|s| {
            if room.invite_code.is_some()
                && s
                    .rooms
                    .iter()
                    .any(|r| r.id != room.id && r.invite_code == room.invite_code)
            {
                return Err(DomainError::InviteCodeExists);
            }
            let stored = s
                .rooms
                .iter_mut()
                .find(|r| r.id == room.id)
                .ok_or(DomainError::RoomNotFound(room.id))?;
            *stored = room.clone();
            Ok(())
        })
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        self.with(|s| {
            if !s.rooms.iter().any(|r| r.id == id) {
                return Err(DomainError::RoomNotFound(id));
            }
            s.drop_room(id);
            Ok(())
        })
    }

    async fn delete_if_empty(&self, id: Snowflake) -> RepoResult<bool> {
        Ok(self.with(|s| {
            let exists = s.rooms.iter().any(|r| r.id == id);
            let empty = !s.members.iter().any(|m| m.room_id == id);
            if exists && empty {
                s.drop_room(id);
                true
            } else {
                false
            }
        }))
    }
}

#[async_trait]
impl MemberRepository for MemoryStore {
    async fn find(&self, room_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<RoomMember>> {
        Ok(self.with(|s| {
            s.members
                .iter()
                .find(|m| m.room_id == room_id && m.user_id == user_id)
                .cloned()
        }))
    }

    async fn is_member(&self, room_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self.with(|s| s.members.iter().any(|m| m.room_id == room_id && m.user_id == user_id)))
    }

    async fn add(&self, member: &RoomMember) -> RepoResult<bool> {
        Ok(self.with(|s| {
            if s
                .members
                .iter()
                .any(|m| m.room_id == member.room_id && m.user_id == member.user_id)
            {
                return false;
            }
            s.members.push(member.clone());
            true
        }))
    }

    async fn remove(&self, room_id: Snowflake, user_id: Snowflake) -> RepoResult<bool> {
        Ok(self.with(|s| {
            let before = s.members.len();
            s.members
                .retain(|m| !(m.room_id == room_id && m.user_id == user_id));
            s.members.len() != before
        }))
    }

    async fn count(&self, room_id: Snowflake) -> RepoResult<i64> {
        Ok(self.with(|s| s.members.iter().filter(|m| m.room_id == room_id).count() as i64))
    }

    async fn list_users(&self, room_id: Snowflake) -> RepoResult<Vec<User>> {
        Ok(self.with(|s| {
            s.members
                .iter()
                .filter(|m| m.room_id == room_id)
                .filter_map(|m| s.users.iter().find(|(u, _)| u.id == m.user_id))
                .map(|(u, _)| u.clone())
                .collect()
        }))
    }

    async fn rooms_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        Ok(self.with(|s| {
            s.members
                .iter()
                .filter(|m| m.user_id == user_id)
                .map(|m| m.room_id)
                .collect()
        }))
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        Ok(self.with(|s| s.messages.iter().find(|m| m.id == id).cloned()))
    }

    async fn find_visible(
        &self,
        room_id: Snowflake,
        viewer_id: Snowflake,
        query: MessageQuery,
    ) -> RepoResult<Vec<Message>> {
        let limit = query.limit.clamp(1, 100) as usize;
        // `before` wins when both cursors are given, as in the SQL
        let after = query.after.filter(|_| query.before.is_none());
        Ok(self.with(|s| {
            let mut visible: Vec<Message> = s
                .messages
                .iter()
                .filter(|m| m.room_id == room_id && m.is_visible_to(viewer_id))
                .filter(|m| query.before.map_or(true, |b| m.id < b))
                .filter(|m| after.map_or(true, |a| m.id > a))
                .cloned()
                .collect();
            if after.is_some() {
                visible.sort_by_key(|m| m.id);
                visible.truncate(limit);
                visible.reverse();
            } else {
                visible.sort_by_key(|m| std::cmp::Reverse(m.id));
                visible.truncate(limit);
            }
            visible
        }))
    }

    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.with(|s| s.messages.push(message.clone()));
        Ok(())
    }

    async fn update(&self, message: &Message) -> RepoResult<()> {
        self.with(|s| {
            let stored = s
                .messages
                .iter_mut()
                .find(|m| m.id == message.id)
                .ok_or(DomainError::MessageNotFound(message.id))?;
            *stored = message.clone();
            Ok(())
        })
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        self.with(|s| {
            let before = s.messages.len();
            s.messages.retain(|m| m.id != id);
            if s.messages.len() == before {
                return Err(DomainError::MessageNotFound(id));
            }
            s.mentions.retain(|m| m.message_id != id);
            Ok(())
        })
    }
}

#[async_trait]
impl MentionRepository for MemoryStore {
    async fn create_many(&self, mentions: &[UnreadMention]) -> RepoResult<u64> {
        Ok(self.with(|s| {
            let mut inserted = 0;
            for mention in mentions {
                if !s
                    .mentions
                    .iter()
                    .any(|m| m.user_id == mention.user_id && m.message_id == mention.message_id)
                {
                    s.mentions.push(mention.clone());
                    inserted += 1;
                }
            }
            inserted
        }))
    }

    async fn unread_summary(&self, user_id: Snowflake) -> RepoResult<Vec<MentionSummary>> {
        Ok(self.with(|s| {
            let mut summary: Vec<MentionSummary> = Vec::new();
            for mention in s.mentions.iter().filter(|m| m.user_id == user_id) {
                let Some(room) = s.rooms.iter().find(|r| r.id == mention.room_id) else {
                    continue;
                };
                match summary.iter_mut().find(|x| x.room_id == room.id) {
                    Some(entry) => {
                        entry.count += 1;
                        entry.latest_message_id = entry.latest_message_id.max(mention.message_id);
                    }
                    None => summary.push(MentionSummary {
                        room_id: room.id,
                        room_name: room.name.clone(),
                        count: 1,
                        latest_message_id: mention.message_id,
                    }),
                }
            }
            summary.sort_by_key(|x| std::cmp::Reverse(x.latest_message_id));
            summary
        }))
    }

    async fn clear_room(&self, user_id: Snowflake, room_id: Snowflake) -> RepoResult<u64> {
        Ok(self.with(|s| {
            let before = s.mentions.len();
            s.mentions
                .retain(|m| !(m.user_id == user_id && m.room_id == room_id));
            (before - s.mentions.len()) as u64
        }))
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn create(&self, session: &Session) -> RepoResult<()> {
        self.with(|s| s.sessions.push(session.clone()));
        Ok(())
    }

    async fn find(&self, id: &str) -> RepoResult<Option<Session>> {
        Ok(self.with(|s| s.sessions.iter().find(|x| x.id == id).cloned()))
    }

    async fn delete(&self, id: &str) -> RepoResult<()> {
        self.with(|s| s.sessions.retain(|x| x.id != id));
        Ok(())
    }

    async fn delete_for_user(&self, user_id: Snowflake) -> RepoResult<u64> {
        Ok(self.with(|s| {
            let before = s.sessions.len();
            s.sessions.retain(|x| x.user_id != user_id);
            (before - s.sessions.len()) as u64
        }))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<u64> {
        Ok(self.with(|s| {
            let before = s.sessions.len();
            s.sessions.retain(|x| !x.is_expired_at(now));
            (before - s.sessions.len()) as u64
        }))
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn test_context() -> ServiceContext {
    test_context_with(ServiceSettings::default())
}

pub fn test_context_with(settings: ServiceSettings) -> ServiceContext {
    let store = Arc::new(MemoryStore::default());
    ServiceContext::builder()
        .user_repo(store.clone())
        .room_repo(store.clone())
        .member_repo(store.clone())
        .message_repo(store.clone())
        .mention_repo(store.clone())
        .session_repo(store)
        .jwt_service(Arc::new(JwtService::new("test-secret")))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
        .settings(settings)
        .build()
        .unwrap()
}

pub fn id_of(id: &str) -> Snowflake {
    id.parse().unwrap()
}

/// Register a user and return their auth response
pub async fn register(ctx: &ServiceContext, username: &str) -> AuthResponse {
    AuthService::new(ctx)
        .register(RegisterRequest {
            username: username.to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap()
}

/// Register a user and return their ID
pub async fn register_id(ctx: &ServiceContext, username: &str) -> Snowflake {
    id_of(&register(ctx, username).await.user.id)
}

/// Register a user and force their role through the repository
pub async fn user_with_role(ctx: &ServiceContext, username: &str, role: Role) -> Snowflake {
    let id = register_id(ctx, username).await;
    ctx.user_repo().set_role(id, role).await.unwrap();
    id
}

pub async fn create_room(ctx: &ServiceContext, creator: Snowflake, name: &str, is_public: bool) -> Snowflake {
    let room = RoomService::new(ctx)
        .create_room(
            creator,
            CreateRoomRequest {
                name: name.to_string(),
                is_public,
            },
        )
        .await
        .unwrap();
    id_of(&room.id)
}

/// The stable error code a service failure maps to
pub fn code_of<T: std::fmt::Debug>(result: Result<T, chat_service::ServiceError>) -> String {
    result.unwrap_err().error_code().to_string()
}
