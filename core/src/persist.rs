use crate::error::StoreError;
use crate::{DocId, InvertedIndex, Page, Posting};
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Page files live at `<dir>/<id>`:
///
/// ```text
/// {url}\n{depth}\n{html length in bytes}\n{html}\n
/// ```
///
/// The html is read back by its recorded length, so newlines or control bytes inside it are harmless.
#[derive(Debug, Clone)]
pub struct PageStore {
    dir: PathBuf,
}

impl PageStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    pub fn dir(&self) -> &Path { &self.dir }

    fn page_path(&self, id: DocId) -> PathBuf { self.dir.join(id.to_string()) }

    /// Writes `page` as document `id`, creating the directory if needed.
    pub fn save(&self, id: DocId, page: &Page) -> Result<(), StoreError> {
        create_dir_all(&self.dir)?;
        let mut f = BufWriter::new(File::create(self.page_path(id))?);
        write!(f, "{}\n{}\n{}\n", page.url, page.depth, page.html_len())?;
        f.write_all(&page.html)?;
        f.write_all(b"\n")?;
        f.flush()?;
        Ok(())
    }

    /// Reads document `id`. `Ok(None)` means there is no such file.
    pub fn load(&self, id: DocId) -> Result<Option<Page>, StoreError> {
        let path = self.page_path(id);
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut reader = BufReader::new(file);

        let url = read_field(&mut reader, &path, "url")?;
        let depth = read_field(&mut reader, &path, "depth")?
            .parse::<u32>()
            .map_err(|e| StoreError::malformed(&path, format!("depth: {e}")))?;
        let len = read_field(&mut reader, &path, "html length")?
            .parse::<usize>()
            .map_err(|e| StoreError::malformed(&path, format!("html length: {e}")))?;

        let mut body = vec![0u8; len];
        reader.read_exact(&mut body).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => StoreError::malformed(&path, format!("html shorter than {len} bytes")),
            _ => StoreError::Io(e),
        })?;

        Ok(Some(Page { url, depth, html: body }))
    }
}

fn read_field<R: BufRead>(reader: &mut R, path: &Path, name: &str) -> Result<String, StoreError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Err(StoreError::malformed(path, format!("missing {name}")));
    }
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(line)
}

/// Writes one line per word: `word id1 freq1 id2 freq2 ...`. Words are written in sorted order.
pub fn save_index<P: AsRef<Path>>(path: P, index: &InvertedIndex) -> Result<(), StoreError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)?;
    }
    let mut f = BufWriter::new(File::create(path)?);
    let mut entries: Vec<_> = index.iter().collect();
    entries.sort_unstable_by_key(|(word, _)| *word);
    for (word, postings) in entries {
        f.write_all(word.as_bytes())?;
        for p in postings {
            write!(f, " {} {}", p.doc_id, p.freq)?;
        }
        f.write_all(b"\n")?;
    }
    f.flush()?;
    debug!(path = %path.display(), words = index.len(), "index saved");
    Ok(())
}

pub fn load_index<P: AsRef<Path>>(path: P) -> Result<InvertedIndex, StoreError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut index = InvertedIndex::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let mut tokens = line.split_whitespace();
        let Some(word) = tokens.next() else { continue };
        index.insert_word(word);
        while let Some(id) = tokens.next() {
            let freq = tokens
                .next()
                .ok_or_else(|| StoreError::malformed(path, format!("line {}: doc {id} has no count", lineno + 1)))?;
            let doc_id = parse_number(path, lineno, id)?;
            let freq = parse_number(path, lineno, freq)?;
            index.insert_posting(word, Posting { doc_id, freq });
        }
    }
    debug!(path = %path.display(), words = index.len(), "index loaded");
    Ok(index)
}

fn parse_number(path: &Path, lineno: usize, token: &str) -> Result<u32, StoreError> {
    token
        .parse::<u32>()
        .map_err(|e| StoreError::malformed(path, format!("line {}: {token:?}: {e}", lineno + 1)))
}
