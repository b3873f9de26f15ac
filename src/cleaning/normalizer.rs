//! Stateless text transforms
//!
//! Applied by [`super::Pipeline`] in this order: [`unicode_fold`], [`clean`],
//! [`despace`]. Each step assumes the previous ones have run.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use unicode_normalization::UnicodeNormalization;

/// Compiled cleanup patterns, shared by every pipeline in the process
struct Patterns {
    emoji_token: Regex,
    url: Regex,
    mention_or_hashtag: Regex,
    symbol: Regex,
    standalone_number: Regex,
    whitespace: Regex,
    spaced_letters: Regex,
}

impl Patterns {
    fn compile() -> Self {
        Self {
            emoji_token: compile(r":[a-zA-Z_]+:"),
            url: compile(r"http\S+"),
            mention_or_hashtag: compile(r"@\w+|#\w+"),
            symbol: compile(r"[^\w\s]"),
            standalone_number: compile(r"\b\d+\b"),
            whitespace: compile(r"\s+"),
            spaced_letters: compile(r"\b(?:[a-zA-Z]\s){2,}[a-zA-Z]\b"),
        }
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid cleanup pattern {}: {}", pattern, e))
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(Patterns::compile)
}

/// Decomposes compatibility characters and drops everything outside ASCII
///
/// `"Café"` → `"Cafe"`, `"ｊｕｄｉ"` → `"judi"`, emoji disappear.
pub fn unicode_fold(text: &str) -> String {
    text.nfkd().filter(char::is_ascii).collect()
}

/// Replaces emoji glyphs with `:name:` tokens
///
/// Variation selectors and zero-width joiners inside emoji sequences are
/// dropped; pictographs without a table entry become `:emoji:`.
pub fn demojize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        if matches!(c, '\u{FE0F}' | '\u{200D}') {
            continue;
        }

        match emoji_name(c) {
            Some(name) => {
                out.push(':');
                out.push_str(name);
                out.push(':');
            }
            None if is_pictographic(c) => out.push_str(":emoji:"),
            None => out.push(c),
        }
    }

    out
}

fn emoji_name(c: char) -> Option<&'static str> {
    let name = match c {
        '😂' => "face_with_tears_of_joy",
        '🤣' => "rolling_on_the_floor_laughing",
        '😭' => "loudly_crying_face",
        '😍' => "smiling_face_with_heart_eyes",
        '🤑' => "money_mouth_face",
        '🙏' => "folded_hands",
        '👍' => "thumbs_up",
        '👉' => "backhand_index_pointing_right",
        '👇' => "backhand_index_pointing_down",
        '❤' => "red_heart",
        '🔥' => "fire",
        '💯' => "hundred_points",
        '💰' => "money_bag",
        '💸' => "money_with_wings",
        '💵' => "dollar_banknote",
        '🎰' => "slot_machine",
        '🎲' => "game_die",
        '🎁' => "wrapped_gift",
        '🏆' => "trophy",
        '✅' => "check_mark_button",
        _ => return None,
    };
    Some(name)
}

fn is_pictographic(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF | 0x2600..=0x27BF | 0x2B00..=0x2BFF | 0x1F1E6..=0x1F1FF
    )
}

/// Lowercases, converts emoji, then runs the cleanup chain and trims
pub fn clean(text: &str) -> String {
    let lowered = text.to_lowercase();
    let demojized = demojize(&lowered);
    clean_text(&demojized).trim().to_string()
}

/// Pattern cleanup, in order: emoji tokens, URLs, mentions and hashtags,
/// symbols, standalone numbers, whitespace runs, elongated letters
pub fn clean_text(text: &str) -> String {
    let p = patterns();

    let text = p.emoji_token.replace_all(text, " ");
    let text = p.url.replace_all(&text, "");
    let text = p.mention_or_hashtag.replace_all(&text, "");
    let text = p.symbol.replace_all(&text, " ");
    let text = p.standalone_number.replace_all(&text, " ");
    let text = p.whitespace.replace_all(&text, " ");

    collapse_repeats(&text)
}

/// Collapses a word character repeated three or more times to a single one
///
/// Exact doubles are kept: `"gpp"` and `"sekolahh"` stay as they are, while
/// `"baguuuus"` becomes `"bagus"`.
pub fn collapse_repeats(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }

        let keep = if is_word_char(c) && run >= 3 { 1 } else { run };
        out.extend(std::iter::repeat(c).take(keep));
    }

    out
}

/// Rejoins runs of three or more single letters separated by whitespace
///
/// `"p r o m o judi"` → `"promo judi"`; a two-letter run such as `"a a"` is
/// left alone.
pub fn despace(text: &str) -> String {
    patterns()
        .spaced_letters
        .replace_all(text, |caps: &Captures| {
            caps[0].chars().filter(|c| !c.is_whitespace()).collect::<String>()
        })
        .into_owned()
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
