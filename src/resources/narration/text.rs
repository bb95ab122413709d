//! Text normalization before speech.
//!
//! Game copy is written for the screen: shouted headings, hard line breaks
//! and compound words the synthesizer mispronounces. [`clean_text`] rewrites
//! it into something that reads well aloud.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Shouted phrases rewritten before the generic capitals rule runs.
const SHOUTED: [(&str, &str); 14] = [
    ("HI FRIENDS!", "Hi friends!"),
    ("I'M", "I'm"),
    ("WON'T", "won't"),
    ("CAN'T", "can't"),
    ("DON'T", "don't"),
    ("ISN'T", "isn't"),
    ("DOESN'T", "doesn't"),
    ("HAVEN'T", "haven't"),
    ("SHOULDN'T", "shouldn't"),
    ("WOULDN'T", "wouldn't"),
    ("COULDN'T", "couldn't"),
    ("HASN'T", "hasn't"),
    ("WEREN'T", "weren't"),
    ("AREN'T", "aren't"),
];

static CAPS_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{2,}").expect("caps run regex"));
static STORMWATER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)stormwater").expect("stormwater regex"));
static STORMDRAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)stormdrain").expect("stormdrain regex"));
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?])\s*").expect("sentence end regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Normalize `text` for speech. Returns an empty string for blank input.
pub fn clean_text(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let mut out = text.replace('\n', ". ").replace('\r', "");
    for (shouted, normal) in SHOUTED {
        out = out.replace(shouted, normal);
    }
    let out = CAPS_RUN.replace_all(&out, |caps: &Captures| {
        let word = &caps[0];
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => format!("{}{}", first, chars.as_str().to_lowercase()),
            None => String::new(),
        }
    });
    let out = STORMWATER.replace_all(&out, "storm water");
    let out = STORMDRAIN.replace_all(&out, |caps: &Captures| {
        if caps[0].starts_with('S') {
            "Storm drain".to_string()
        } else {
            "storm drain".to_string()
        }
    });
    let out = SENTENCE_END.replace_all(&out, "$1 ");
    WHITESPACE.replace_all(&out, " ").trim().to_string()
}
