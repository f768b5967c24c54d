use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[A-Za-z0-9]+").expect("valid regex");
}

/// Shortest word kept by the indexer.
pub const MIN_WORD_LEN: usize = 3;

/// Lowercases an all-alphabetic word of at least three letters; anything else is dropped.
pub fn normalize_word(raw: &str) -> Option<String> {
    if raw.len() < MIN_WORD_LEN || !raw.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    Some(raw.to_ascii_lowercase())
}

/// Lazily yields the alphanumeric runs of a text in order.
#[derive(Debug, Clone)]
pub struct Words {
    text: String,
    pos: usize,
}

impl Words {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), pos: 0 }
    }
}

impl Iterator for Words {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let m = WORD.find_at(&self.text, self.pos)?;
        self.pos = m.end();
        Some(m.as_str().to_string())
    }
}
