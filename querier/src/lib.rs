pub mod query;
pub mod rank;

pub use query::{parse, Query, QueryError};
pub use rank::{evaluate, Hit, Ranking};

use anyhow::{anyhow, Result};
use query::strip_terminator;
use search_core::{InvertedIndex, PageStore};
use std::io::{BufRead, Write};
use tracing::debug;

/// Printed in place of results for any query that does not parse.
pub const INVALID_QUERY: &str = "[invalid query]";

/// A read-eval-print loop over one loaded index.
pub struct Session<'a> {
    index: &'a InvertedIndex,
    pages: &'a PageStore,
    prompt: bool,
}

impl<'a> Session<'a> {
    pub fn new(index: &'a InvertedIndex, pages: &'a PageStore) -> Self {
        Self { index, pages, prompt: false }
    }

    /// Print `> ` before reading each line.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Answers queries line by line until `input` is exhausted.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut out: W) -> Result<()> {
        let mut line = Vec::new();
        loop {
            if self.prompt {
                write!(out, "> ")?;
                out.flush()?;
            }
            line.clear();
            if input.read_until(b'\n', &mut line)? == 0 {
                if self.prompt {
                    writeln!(out)?;
                }
                break;
            }
            self.answer(&line, &mut out)?;
            out.flush()?;
        }
        Ok(())
    }

    /// Evaluates one line and writes `rank: R doc: ID url: URL` per matching document.
    ///
    /// A blank line produces no output. Failing to read a result's page file is an error.
    pub fn answer<W: Write>(&self, line: &[u8], out: &mut W) -> Result<()> {
        if strip_terminator(line).is_empty() {
            return Ok(());
        }
        let query = match parse(line) {
            Ok(q) => q,
            Err(e) => {
                debug!(error = %e, "rejected query");
                writeln!(out, "{INVALID_QUERY}")?;
                return Ok(());
            }
        };

        let hits = evaluate(self.index, &query);
        debug!(groups = query.groups().len(), hits = hits.len(), "evaluated query");
        for hit in hits {
            let page = self.pages.load(hit.doc_id)?.ok_or_else(|| {
                anyhow!("document {} has no page file in {}", hit.doc_id, self.pages.dir().display())
            })?;
            writeln!(out, "rank: {} doc: {} url: {}", hit.rank, hit.doc_id, page.url)?;
        }
        Ok(())
    }
}
