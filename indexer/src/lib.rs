use anyhow::{Context, Result};
use search_core::html::extract_words;
use search_core::tokenizer::normalize_word;
use search_core::{save_index, ArgError, DocId, InvertedIndex, PageStore, StoreError};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub pages: u32,
    pub words: usize,
    pub postings: usize,
    /// Normalized word occurrences counted across all pages.
    pub occurrences: u64,
}

/// Adds every normalized word of `html` to `index` under `doc_id`. Returns the number of words counted.
pub fn index_page(index: &mut InvertedIndex, doc_id: DocId, html: &str) -> u64 {
    let mut counted = 0;
    for word in extract_words(html).filter_map(|raw| normalize_word(&raw)) {
        index.record(&word, doc_id);
        counted += 1;
    }
    counted
}

/// Loads pages 1, 2, 3, ... until the first id with no page file and indexes each one.
pub fn build_index(store: &PageStore) -> Result<(InvertedIndex, IndexStats), StoreError> {
    let mut index = InvertedIndex::new();
    let mut stats = IndexStats::default();
    let mut id: DocId = 1;
    while let Some(page) = store.load(id)? {
        let counted = index_page(&mut index, id, &page.html_text());
        tracing::debug!(id, url = %page.url, words = counted, "indexed page");
        stats.pages += 1;
        stats.occurrences += counted;
        id += 1;
    }
    stats.words = index.len();
    stats.postings = index.posting_count();
    Ok((index, stats))
}

/// Indexes `page_dir` and writes the result to `index_file`.
pub fn run(page_dir: &Path, index_file: &Path) -> Result<IndexStats> {
    if !page_dir.is_dir() {
        return Err(ArgError::PageDir(page_dir.display().to_string()).into());
    }
    let store = PageStore::new(page_dir);
    let (index, stats) = build_index(&store).with_context(|| format!("reading pages from {}", page_dir.display()))?;
    tracing::info!(
        pages = stats.pages,
        words = stats.words,
        postings = stats.postings,
        occurrences = stats.occurrences,
        "ingested pages"
    );
    debug_assert_eq!(index.total_occurrences(), stats.occurrences);

    save_index(index_file, &index).with_context(|| format!("writing index {}", index_file.display()))?;
    tracing::info!(output = %index_file.display(), "index build complete");
    Ok(stats)
}
