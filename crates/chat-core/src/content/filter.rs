//! Profanity filter with leetspeak normalisation
//!
//! Works per whitespace-separated token. URL-looking tokens pass through
//! untouched. Other tokens are split into word runs; a run whose normalised
//! form is a banned word is replaced by the same number of `#`.

use std::collections::HashSet;

const DEFAULT_WORDS: &[&str] = &[
    "fuck", "shit", "bitch", "cunt", "asshole", "bastard", "dick", "slut", "whore",
];

/// Symbols that stand in for letters when sandwiched inside a word
const LEET_SYMBOLS: [char; 3] = ['@', '$', '!'];

#[derive(Debug, Clone)]
pub struct ProfanityFilter {
    words: HashSet<String>,
}

impl Default for ProfanityFilter {
    fn default() -> Self {
        Self::with_words(DEFAULT_WORDS.iter().copied())
    }
}

impl ProfanityFilter {
    pub fn with_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().chars().map(normalize).collect())
            .collect();
        Self { words }
    }

    /// Return `text` with banned words masked; whitespace is preserved as-is
    pub fn filter(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut token = String::new();

        for ch in text.chars() {
            if ch.is_whitespace() {
                if !token.is_empty() {
                    self.push_token(&token, &mut out);
                    token.clear();
                }
                out.push(ch);
            } else {
                token.push(ch);
            }
        }
        if !token.is_empty() {
            self.push_token(&token, &mut out);
        }
        out
    }

    fn push_token(&self, token: &str, out: &mut String) {
        if looks_like_url(token) {
            out.push_str(token);
            return;
        }

        let chars: Vec<char> = token.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if !is_word_char(&chars, i) {
                out.push(chars[i]);
                i += 1;
                continue;
            }
            let start = i;
            while i < chars.len() && is_word_char(&chars, i) {
                i += 1;
            }
            let run = &chars[start..i];
            let normalized: String = run.iter().copied().map(normalize).collect();
            if self.words.contains(&normalized) {
                out.extend(std::iter::repeat('#').take(run.len()));
            } else {
                out.extend(run.iter());
            }
        }
    }
}

fn looks_like_url(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("www.")
        || lower.contains("://")
}

fn is_word_char(chars: &[char], i: usize) -> bool {
    let c = chars[i];
    if c.is_alphanumeric() {
        return true;
    }
    if !LEET_SYMBOLS.contains(&c) {
        return false;
    }
    let next_is_alnum = chars.get(i + 1).is_some_and(|n| n.is_alphanumeric());
    let prev_ok = i == 0 || chars[i - 1].is_alphanumeric();
    next_is_alnum && prev_ok
}

fn normalize(c: char) -> char {
    match c.to_ascii_lowercase() {
        '0' => 'o',
        '1' | '!' => 'i',
        '3' => 'e',
        '4' | '@' => 'a',
        '5' | '$' => 's',
        '7' => 't',
        other => other,
    }
}
