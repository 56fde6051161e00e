//! Value objects - immutable types that represent domain concepts

mod invite_code;
mod snowflake;

pub use invite_code::{generate_invite_code, is_valid_invite_code, INVITE_CODE_LEN};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
