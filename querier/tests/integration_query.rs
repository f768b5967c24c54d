use querier::{Session, INVALID_QUERY};
use search_core::{InvertedIndex, Page, PageStore};
use std::fs;
use tempfile::{tempdir, TempDir};

struct Fixture {
    _dir: TempDir,
    index: InvertedIndex,
    pages: PageStore,
}

fn fixture() -> Fixture {
    let dir = tempdir().unwrap();
    let pages = PageStore::new(dir.path());
    pages.save(1, &Page::new("http://site.test/one.html", 0, "<p>cat</p>")).unwrap();
    pages.save(2, &Page::new("http://site.test/two.html", 1, "<p>cat</p>")).unwrap();

    let mut index = InvertedIndex::new();
    for (word, doc, times) in [("cat", 1, 3), ("dog", 1, 2), ("cat", 2, 5)] {
        for _ in 0..times {
            index.record(word, doc);
        }
    }
    Fixture { _dir: dir, index, pages }
}

fn ask(fx: &Fixture, input: &str) -> String {
    let mut out = Vec::new();
    Session::new(&fx.index, &fx.pages).run(input.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn and_query_ranks_by_smallest_count() {
    let fx = fixture();
    assert_eq!(ask(&fx, "cat and dog\n"), "rank: 2 doc: 1 url: http://site.test/one.html\n");
    assert_eq!(ask(&fx, "CAT dog\n"), "rank: 2 doc: 1 url: http://site.test/one.html\n");
}

#[test]
fn single_term_sorts_by_rank() {
    let fx = fixture();
    assert_eq!(
        ask(&fx, "cat\n"),
        "rank: 5 doc: 2 url: http://site.test/two.html\nrank: 3 doc: 1 url: http://site.test/one.html\n"
    );
}

#[test]
fn or_query_sums_and_breaks_ties_by_discovery() {
    let fx = fixture();
    assert_eq!(
        ask(&fx, "cat or dog\n"),
        "rank: 5 doc: 1 url: http://site.test/one.html\nrank: 5 doc: 2 url: http://site.test/two.html\n"
    );
}

#[test]
fn malformed_queries_are_reported() {
    let fx = fixture();
    for line in ["and cat\n", "cat and\n", "cat and or dog\n", "hi\n", "cat!\n", "   \n"] {
        assert_eq!(ask(&fx, line), format!("{INVALID_QUERY}\n"), "query {line:?}");
    }
}

#[test]
fn unknown_terms_print_nothing() {
    let fx = fixture();
    assert_eq!(ask(&fx, "zebra\n"), "");
    assert_eq!(ask(&fx, "cat and zebra\n"), "");
}

#[test]
fn blank_lines_are_skipped_and_session_continues() {
    let fx = fixture();
    let out = ask(&fx, "\n\nand\ncat and dog");
    assert_eq!(out, format!("{INVALID_QUERY}\nrank: 2 doc: 1 url: http://site.test/one.html\n"));
}

#[test]
fn carriage_return_makes_a_line_invalid() {
    let fx = fixture();
    assert_eq!(ask(&fx, "cat\r\n\r\n"), format!("{INVALID_QUERY}\n{INVALID_QUERY}\n"));
}

#[test]
fn prompt_is_printed_per_line_and_at_eof() {
    let fx = fixture();
    let mut out = Vec::new();
    Session::new(&fx.index, &fx.pages).with_prompt(true).run("zebra\n".as_bytes(), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "> > \n");
}

#[test]
fn missing_page_file_is_an_error() {
    let fx = fixture();
    fs::remove_file(fx.pages.dir().join("2")).unwrap();
    let mut out = Vec::new();
    assert!(Session::new(&fx.index, &fx.pages).answer(b"cat\n", &mut out).is_err());
}
