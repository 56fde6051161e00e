//! `@mention` extraction and resolution

use crate::entities::{Role, User};
use crate::value_objects::Snowflake;

/// What a mention token refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentionTarget {
    Everyone,
    Admins,
    Moderators,
    User(String),
}

impl MentionTarget {
    pub fn parse(token: &str) -> Self {
        match token.to_lowercase().as_str() {
            "everyone" => Self::Everyone,
            "admin" => Self::Admins,
            "mod" => Self::Moderators,
            _ => Self::User(token.to_string()),
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::Everyone => true,
            Self::Admins => user.role.satisfies(Role::Admin),
            Self::Moderators => user.role.satisfies(Role::Moderator),
            Self::User(name) => name.to_lowercase() == user.username.to_lowercase(),
        }
    }
}

/// Collect `@token`s that start the text or follow whitespace. Tokens are
/// returned once each, in order of first appearance, without the `@`.
pub fn extract_mentions(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    for word in text.split_whitespace() {
        let Some(rest) = word.strip_prefix('@') else {
            continue;
        };
        let token: String = rest
            .chars()
            .take_while(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
            .collect();
        let token = token.trim_end_matches('.');
        if token.is_empty() {
            continue;
        }
        if !tokens.iter().any(|t| t.to_lowercase() == token.to_lowercase()) {
            tokens.push(token.to_string());
        }
    }
    tokens
}

/// Users among `candidates` addressed by `tokens`, never the author
pub fn resolve_mentions(tokens: &[String], candidates: &[User], author_id: Snowflake) -> Vec<Snowflake> {
    let targets: Vec<MentionTarget> = tokens.iter().map(|t| MentionTarget::parse(t)).collect();

    candidates
        .iter()
        .filter(|u| u.id != author_id)
        .filter(|u| targets.iter().any(|t| t.matches(u)))
        .map(|u| u.id)
        .collect()
}
