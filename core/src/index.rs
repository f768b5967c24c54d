use std::borrow::Cow;
use std::collections::HashMap;

pub type DocId = u32;

/// A fetched page as it is written to `<pagedir>/<id>`. The body is kept exactly as fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub depth: u32,
    pub html: Vec<u8>,
}

impl Page {
    pub fn new(url: impl Into<String>, depth: u32, html: impl Into<Vec<u8>>) -> Self {
        Self { url: url.into(), depth, html: html.into() }
    }

    /// Length of the html body in bytes; this is the value stored in the page file.
    pub fn html_len(&self) -> usize {
        self.html.len()
    }

    /// The body as text for parsing. Invalid UTF-8 sequences become U+FFFD.
    pub fn html_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.html)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Posting {
    pub doc_id: DocId,
    pub freq: u32,
}

/// word -> postings, postings kept in the order their documents were first seen.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    words: HashMap<String, Vec<Posting>>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Counts one more occurrence of `word` in `doc_id`.
    pub fn record(&mut self, word: &str, doc_id: DocId) {
        let postings = self.words.entry(word.to_owned()).or_default();
        // documents are indexed one at a time, so the live posting is nearly always last
        match postings.iter_mut().rev().find(|p| p.doc_id == doc_id) {
            Some(p) => p.freq += 1,
            None => postings.push(Posting { doc_id, freq: 1 }),
        }
    }

    /// Adds a complete posting, as read back from an index file. A repeated doc id is summed.
    pub fn insert_posting(&mut self, word: &str, posting: Posting) {
        let postings = self.words.entry(word.to_owned()).or_default();
        match postings.iter_mut().find(|p| p.doc_id == posting.doc_id) {
            Some(p) => p.freq += posting.freq,
            None => postings.push(posting),
        }
    }

    /// Registers `word` with no postings yet.
    pub fn insert_word(&mut self, word: &str) {
        self.words.entry(word.to_owned()).or_default();
    }

    pub fn postings(&self, word: &str) -> Option<&[Posting]> {
        self.words.get(word).map(Vec::as_slice)
    }

    pub fn frequency(&self, word: &str, doc_id: DocId) -> Option<u32> {
        self.postings(word)?.iter().find(|p| p.doc_id == doc_id).map(|p| p.freq)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Posting])> {
        self.words.iter().map(|(w, p)| (w.as_str(), p.as_slice()))
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }

    pub fn posting_count(&self) -> usize {
        self.words.values().map(Vec::len).sum()
    }

    /// Sum of every posting frequency, i.e. the number of word occurrences indexed.
    pub fn total_occurrences(&self) -> u64 {
        self.words.values().flatten().map(|p| p.freq as u64).sum()
    }

    /// Every (word, doc, freq) triple, sorted; handy for comparing two indexes.
    pub fn triples(&self) -> Vec<(String, DocId, u32)> {
        let mut out: Vec<_> = self
            .iter()
            .flat_map(|(w, ps)| ps.iter().map(move |p| (w.to_string(), p.doc_id, p.freq)))
            .collect();
        out.sort();
        out
    }
}
