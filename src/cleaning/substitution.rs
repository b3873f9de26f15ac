//! Slang substitution
//!
//! One pass over whitespace-separated tokens. A replacement is never looked up
//! again, so chains like `tapi` → `tetapi` stop after one hop.

use crate::lexicon::Lexicon;

use super::normalizer::is_word_char;

/// Rewrites every token found in `lexicon`, joining the result with single
/// spaces
pub fn substitute(text: &str, lexicon: &Lexicon) -> String {
    text.split_whitespace()
        .map(|token| substitute_token(token, lexicon))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Exact match first, then the token's word characters with whatever follows
/// the last of them re-appended (`"yg,"` → `"yang,"`)
pub fn substitute_token(token: &str, lexicon: &Lexicon) -> String {
    if let Some(formal) = lexicon.get(token) {
        return formal.to_string();
    }

    let core: String = token.chars().filter(|c| is_word_char(*c)).collect();
    if core.is_empty() || core == token {
        return token.to_string();
    }

    match lexicon.get(&core) {
        Some(formal) => format!("{}{}", formal, trailing_punctuation(token)),
        None => token.to_string(),
    }
}

fn trailing_punctuation(token: &str) -> &str {
    match token.char_indices().rev().find(|(_, c)| is_word_char(*c)) {
        Some((idx, c)) => &token[idx + c.len_utf8()..],
        None => token,
    }
}
