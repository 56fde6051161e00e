//! Typing indicators
//!
//! Process-local and expiring: an entry is visible for `ttl` after its last
//! refresh and is dropped by [`TypingTracker::sweep`] after that. Clients that
//! vanish without sending "stopped typing" self-clear.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chat_core::Snowflake;
use dashmap::DashMap;
use tracing::{debug, instrument};

use crate::dto::TypingUserResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::room::RoomService;

#[derive(Debug, Clone)]
struct TypingEntry {
    username: String,
    last_seen: Instant,
}

/// Shared `(room, user) -> last keystroke` map
#[derive(Debug, Clone)]
pub struct TypingTracker {
    entries: Arc<DashMap<(Snowflake, Snowflake), TypingEntry>>,
    ttl: Duration,
}

impl TypingTracker {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    pub fn start(&self, room_id: Snowflake, user_id: Snowflake, username: &str) {
        self.start_at(room_id, user_id, username, Instant::now());
    }

    pub fn start_at(&self, room_id: Snowflake, user_id: Snowflake, username: &str, now: Instant) {
        self.entries.insert(
            (room_id, user_id),
            TypingEntry {
                username: username.to_string(),
                last_seen: now,
            },
        );
    }

    pub fn stop(&self, room_id: Snowflake, user_id: Snowflake) {
        self.entries.remove(&(room_id, user_id));
    }

    /// Forget a user everywhere (suspension, account deletion)
    pub fn clear_user(&self, user_id: Snowflake) {
        self.entries.retain(|(_, user), _| *user != user_id);
    }

    /// Fresh typists in `room_id`, excluding `viewer_id`, ordered by username
    pub fn typing_in(&self, room_id: Snowflake, viewer_id: Snowflake) -> Vec<(Snowflake, String)> {
        self.typing_in_at(room_id, viewer_id, Instant::now())
    }

    pub fn typing_in_at(
        &self,
        room_id: Snowflake,
        viewer_id: Snowflake,
        now: Instant,
    ) -> Vec<(Snowflake, String)> {
        let mut typing: Vec<_> = self
            .entries
            .iter()
            .filter(|e| e.key().0 == room_id && e.key().1 != viewer_id)
            .filter(|e| now.saturating_duration_since(e.value().last_seen) < self.ttl)
            .map(|e| (e.key().1, e.value().username.clone()))
            .collect();
        typing.sort_by(|a, b| a.1.cmp(&b.1));
        typing
    }

    /// Number of stored entries (including expired, not-yet-swept ones)
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drop expired entries, returning how many went
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.last_seen) < self.ttl);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(removed, "Swept expired typing indicators");
        }
        removed
    }
}

/// Typing service: membership-checked access to the tracker
pub struct TypingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TypingService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Start or stop the caller's indicator
    #[instrument(skip(self))]
    pub async fn set_typing(
        &self,
        room_id: Snowflake,
        user_id: Snowflake,
        typing: bool,
    ) -> ServiceResult<()> {
        let user = RoomService::new(self.ctx).require_member(room_id, user_id).await?;

        if typing {
            self.ctx.typing().start(room_id, user.id, &user.username);
        } else {
            self.ctx.typing().stop(room_id, user.id);
        }
        Ok(())
    }

    /// Who else is typing in the room right now
    #[instrument(skip(self))]
    pub async fn list_typing(
        &self,
        room_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<TypingUserResponse>> {
        RoomService::new(self.ctx).require_member(room_id, user_id).await?;

        Ok(self
            .ctx
            .typing()
            .typing_in(room_id, user_id)
            .into_iter()
            .map(|(id, username)| TypingUserResponse {
                user_id: id.to_string(),
                username,
            })
            .collect())
    }
}
