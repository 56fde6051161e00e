//! Invite codes for private rooms: six ASCII digits

use rand::Rng;

pub const INVITE_CODE_LEN: usize = 6;

/// Generate a random 6-digit code. Leading zeros are kept.
pub fn generate_invite_code() -> String {
    let n: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{n:06}")
}

pub fn is_valid_invite_code(code: &str) -> bool {
    code.len() == INVITE_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}
