//! User entity <-> model mapper

use chat_core::entities::{Mute, Role, Suspension, User};
use chat_core::value_objects::Snowflake;
use tracing::warn;

use crate::models::UserModel;

/// Parse a stored role; the column CHECK makes a miss unreachable, so an
/// unknown value degrades to the least privileged role.
pub fn parse_role(s: &str) -> Role {
    s.parse().unwrap_or_else(|_| {
        warn!(role = %s, "Unknown role in database, treating as user");
        Role::User
    })
}

/// Convert UserModel to User entity
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        let mute = match (model.muted_until, model.muted_reason) {
            (Some(until), Some(reason)) => Some(Mute { until, reason }),
            _ => None,
        };
        let suspension = match (model.suspended_at, model.suspended_reason) {
            (Some(at), Some(reason)) => Some(Suspension { at, reason }),
            _ => None,
        };

        User {
            id: Snowflake::new(model.id),
            username: model.username,
            role: parse_role(&model.role),
            avatar: model.avatar,
            online: model.online,
            appear_offline: model.appear_offline,
            mute,
            suspension,
            last_username_change: model.last_username_change,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
