//! Message content processing: slash commands, profanity masking and mentions

mod commands;
mod filter;
mod mentions;

pub use commands::{expand_commands, CommandOutput, KRATOS_MEDIA_URL, SHRUG, SUS, TABLEFLIP, UNFLIP};
pub use filter::ProfanityFilter;
pub use mentions::{extract_mentions, resolve_mentions, MentionTarget};
