//! Slash commands recognised at the start of a message

use crate::entities::{Media, MediaType};
use crate::error::DomainError;

pub const TABLEFLIP: &str = "(╯°□°)╯︵ ┻━┻";
pub const UNFLIP: &str = "┬─┬ ノ( ゜-゜ノ)";
pub const SHRUG: &str = r"¯\_(ツ)_/¯";
pub const SUS: &str = "ඞ";
pub const KRATOS_MEDIA_URL: &str = "/media/kratos.gif";

const WHISPER_USAGE: &str = "usage: /whisper \"<username>\" <message>";

/// Result of expanding the raw message text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub content: Option<String>,
    pub media: Option<Media>,
    /// Username named by `/whisper`, unresolved
    pub whisper_to: Option<String>,
}

/// Expand a leading slash command. Unknown commands and plain text pass
/// through trimmed.
pub fn expand_commands(input: &str) -> Result<CommandOutput, DomainError> {
    let trimmed = input.trim();
    let (head, rest) = split_first_word(trimmed);

    match head.to_ascii_lowercase().as_str() {
        "/whisper" => parse_whisper(rest),
        "/tableflip" => Ok(append(rest, TABLEFLIP)),
        "/unflip" => Ok(append(rest, UNFLIP)),
        "/shrug" => Ok(append(rest, SHRUG)),
        "/sus" => Ok(append(rest, SUS)),
        "/kratos" => Ok(CommandOutput {
            content: non_empty(rest),
            media: Some(Media {
                url: KRATOS_MEDIA_URL.to_string(),
                media_type: MediaType::Image,
            }),
            whisper_to: None,
        }),
        _ => Ok(CommandOutput {
            content: non_empty(trimmed),
            ..CommandOutput::default()
        }),
    }
}

fn split_first_word(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], s[idx..].trim_start()),
        None => (s, ""),
    }
}

fn append(rest: &str, suffix: &str) -> CommandOutput {
    let content = if rest.is_empty() {
        suffix.to_string()
    } else {
        format!("{rest} {suffix}")
    };
    CommandOutput {
        content: Some(content),
        ..CommandOutput::default()
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn parse_whisper(rest: &str) -> Result<CommandOutput, DomainError> {
    let usage = || DomainError::InvalidWhisper(WHISPER_USAGE.to_string());

    let quoted = rest.strip_prefix('"').ok_or_else(usage)?;
    let close = quoted.find('"').ok_or_else(usage)?;
    let username = quoted[..close].trim();
    let text = quoted[close + 1..].trim();
    if username.is_empty() || text.is_empty() {
        return Err(usage());
    }

    Ok(CommandOutput {
        content: Some(text.to_string()),
        media: None,
        whisper_to: Some(username.to_string()),
    })
}
