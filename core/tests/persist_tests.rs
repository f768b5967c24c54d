use search_core::{load_index, save_index, InvertedIndex, Page, PageStore, Posting, StoreError};
use std::fs;
use tempfile::tempdir;

#[test]
fn page_round_trip_preserves_body_bytes() {
    let dir = tempdir().unwrap();
    let store = PageStore::new(dir.path().join("pages"));
    let html = "<html>\nline two\r\n\u{0}\u{7}\tend\n\n5\n</html>";
    let page = Page::new("https://site.test/a.html", 2, html);
    store.save(7, &page).unwrap();

    let loaded = store.load(7).unwrap().unwrap();
    assert_eq!(loaded, page);
    assert_eq!(loaded.html_len(), html.len());

    let raw = fs::read_to_string(dir.path().join("pages/7")).unwrap();
    assert!(raw.starts_with(&format!("https://site.test/a.html\n2\n{}\n", html.len())));
    assert!(raw.ends_with("</html>\n"));
}

#[test]
fn empty_body_round_trips() {
    let dir = tempdir().unwrap();
    let store = PageStore::new(dir.path());
    let page = Page::new("http://site.test/", 0, "");
    store.save(1, &page).unwrap();
    assert_eq!(store.load(1).unwrap(), Some(page));
}

#[test]
fn non_utf8_body_round_trips_byte_for_byte() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("1"), b"http://site.test/a.html\n0\n4\ncaf\xe9\n").unwrap();
    let store = PageStore::new(dir.path());

    let page = store.load(1).unwrap().unwrap();
    assert_eq!(page.html, b"caf\xe9");
    assert_eq!(page.html_len(), 4);

    store.save(2, &page).unwrap();
    assert_eq!(fs::read(dir.path().join("2")).unwrap(), fs::read(dir.path().join("1")).unwrap());
}

#[test]
fn missing_page_is_none() {
    let dir = tempdir().unwrap();
    let store = PageStore::new(dir.path());
    assert!(store.load(1).unwrap().is_none());
}

#[test]
fn truncated_page_is_an_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("3"), "http://site.test/\n0\n100\nshort\n").unwrap();
    let store = PageStore::new(dir.path());
    assert!(matches!(store.load(3), Err(StoreError::Malformed { .. })));

    fs::write(dir.path().join("4"), "http://site.test/\nzero\n1\nx\n").unwrap();
    assert!(matches!(store.load(4), Err(StoreError::Malformed { .. })));
}

#[test]
fn index_round_trip_preserves_triples() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out/index.file");
    let mut index = InvertedIndex::new();
    for (word, doc) in [("cat", 1), ("cat", 1), ("cat", 1), ("dog", 1), ("dog", 1), ("cat", 2), ("zebra", 9)] {
        index.record(word, doc);
    }
    save_index(&path, &index).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, "cat 1 3 2 1\ndog 1 2\nzebra 9 1\n");

    let loaded = load_index(&path).unwrap();
    assert_eq!(loaded.triples(), index.triples());
    assert_eq!(loaded.postings("cat").unwrap(), &[Posting { doc_id: 1, freq: 3 }, Posting { doc_id: 2, freq: 1 }]);
}

#[test]
fn index_load_accepts_any_posting_order_and_spacing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.file");
    fs::write(&path, "cat 2 5 1 3 \n\ndog\t1 2\n").unwrap();
    let loaded = load_index(&path).unwrap();
    assert_eq!(
        loaded.triples(),
        vec![("cat".to_string(), 1, 3), ("cat".to_string(), 2, 5), ("dog".to_string(), 1, 2)]
    );
}

#[test]
fn index_load_rejects_dangling_ids() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.file");
    fs::write(&path, "cat 1 3 2\n").unwrap();
    assert!(matches!(load_index(&path), Err(StoreError::Malformed { .. })));
    fs::write(&path, "cat one 3\n").unwrap();
    assert!(matches!(load_index(&path), Err(StoreError::Malformed { .. })));
}
