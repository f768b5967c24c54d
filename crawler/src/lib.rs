pub mod fetch;

pub use fetch::{FetchError, Fetcher, HttpFetcher};

use anyhow::{Context, Result};
use parking_lot::{Condvar, Mutex};
use search_core::html::extract_links;
use search_core::{ArgError, ConcurrentQueue, ConcurrentSet, DocId, Page, PageStore, StoreError, UrlPolicy};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::thread;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, error, info, warn};

/// Name of the summary written next to the page files.
pub const SUMMARY_FILE: &str = "crawl.json";

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub seed: String,
    pub page_dir: PathBuf,
    pub max_depth: u32,
    pub threads: usize,
    /// Expected links per page; sizes the visited table as `(max_depth + 1) * branching`.
    pub branching: usize,
}

impl CrawlConfig {
    pub fn new(seed: impl Into<String>, page_dir: impl Into<PathBuf>, max_depth: u32, threads: usize) -> Self {
        Self { seed: seed.into(), page_dir: page_dir.into(), max_depth, threads, branching: 50 }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    pub seed: String,
    pub max_depth: u32,
    pub threads: usize,
    pub pages_saved: u32,
    pub fetch_failures: usize,
    pub visited: usize,
    pub failed_workers: usize,
    pub completed_at: String,
    /// Every url admitted to the visited set, sorted.
    #[serde(skip)]
    pub visited_urls: Vec<String>,
}

/// A url waiting to be fetched.
#[derive(Debug, Clone)]
struct Stub {
    url: String,
    depth: u32,
}

/// State shared by the workers of one crawl.
///
/// `pending` counts stubs that are queued or being processed. Workers only stop once the queue
/// is empty and `pending` is zero, so nobody quits while a sibling may still enqueue links.
struct CrawlContext {
    queue: ConcurrentQueue<Stub>,
    visited: ConcurrentSet<String>,
    next_id: AtomicU32,
    pending: Mutex<usize>,
    idle: Condvar,
    fetch_failures: AtomicUsize,
}

impl CrawlContext {
    fn new(visited_buckets: usize) -> Self {
        Self {
            queue: ConcurrentQueue::new(),
            visited: ConcurrentSet::new(visited_buckets),
            next_id: AtomicU32::new(0),
            pending: Mutex::new(0),
            idle: Condvar::new(),
            fetch_failures: AtomicUsize::new(0),
        }
    }

    fn assign_id(&self) -> DocId {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn enqueue(&self, stub: Stub) {
        let mut pending = self.pending.lock();
        *pending += 1;
        self.queue.put(stub);
        drop(pending);
        self.idle.notify_one();
    }

    /// Blocks until there is a stub to work on, or returns `None` once the crawl is finished.
    fn next_stub(&self) -> Option<Stub> {
        loop {
            if let Some(stub) = self.queue.get() {
                return Some(stub);
            }
            let mut pending = self.pending.lock();
            if *pending == 0 {
                return None;
            }
            // enqueue() puts while holding `pending`, so this check cannot miss a wakeup
            if self.queue.is_empty() {
                self.idle.wait(&mut pending);
            }
        }
    }

    fn finish_stub(&self) {
        let mut pending = self.pending.lock();
        *pending -= 1;
        if *pending == 0 {
            self.idle.notify_all();
        }
    }
}

/// Marks a dequeued stub as finished when dropped, including while a panicking worker unwinds.
struct InFlight<'a>(&'a CrawlContext);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.finish_stub();
    }
}

struct Worker<'a> {
    ctx: &'a CrawlContext,
    store: &'a PageStore,
    fetcher: &'a dyn Fetcher,
    policy: &'a UrlPolicy,
    max_depth: u32,
}

impl Worker<'_> {
    fn run(&self, n: usize) -> Result<u32, StoreError> {
        let mut saved = 0;
        while let Some(stub) = self.ctx.next_stub() {
            let in_flight = InFlight(self.ctx);
            let outcome = self.process(stub);
            drop(in_flight);
            match outcome {
                Ok(true) => saved += 1,
                Ok(false) => {}
                Err(e) => {
                    error!(worker = n, error = %e, "page store failed, worker stopping");
                    return Err(e);
                }
            }
        }
        debug!(worker = n, saved, "worker done");
        Ok(saved)
    }

    /// Fetches, saves and expands one stub. `Ok(false)` means the fetch failed and the stub was dropped.
    fn process(&self, stub: Stub) -> Result<bool, StoreError> {
        let html = match self.fetcher.fetch(&stub.url) {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %stub.url, error = %e, "fetch failed, skipping");
                self.ctx.fetch_failures.fetch_add(1, Ordering::Relaxed);
                return Ok(false);
            }
        };

        let id = self.ctx.assign_id();
        let page = Page::new(stub.url, stub.depth, html);
        self.store.save(id, &page)?;
        info!(id, depth = page.depth, url = %page.url, "saved page");

        if page.depth < self.max_depth {
            for link in extract_links(&page.html_text(), &page.url) {
                let Some(url) = UrlPolicy::normalize(&link) else {
                    debug!(%link, "link does not normalize");
                    continue;
                };
                if !self.policy.is_internal(&url) {
                    debug!(%url, "external link");
                    continue;
                }
                if self.ctx.visited.insert_if_absent(url.clone()) {
                    self.ctx.enqueue(Stub { url, depth: page.depth + 1 });
                } else {
                    debug!(%url, "already visited");
                }
            }
        }
        Ok(true)
    }
}

/// Validates the configuration and prepares the page directory.
fn prepare(config: &CrawlConfig) -> Result<(UrlPolicy, String)> {
    if config.threads == 0 {
        return Err(ArgError::ThreadCount.into());
    }
    let seed = UrlPolicy::normalize(&config.seed).ok_or_else(|| ArgError::SeedUrl(config.seed.clone()))?;
    let policy = UrlPolicy::for_seed(&seed).ok_or_else(|| ArgError::SeedUrl(config.seed.clone()))?;
    fs::create_dir_all(&config.page_dir)
        .with_context(|| format!("creating page directory {}", config.page_dir.display()))?;
    Ok((policy, seed))
}

/// Crawls breadth-first from the seed with `config.threads` workers, saving each fetched page
/// as `<page_dir>/<id>` with ids 1, 2, 3, ... in fetch-completion order.
pub fn crawl(config: &CrawlConfig, fetcher: &dyn Fetcher) -> Result<CrawlSummary> {
    let (policy, seed) = prepare(config)?;
    let store = PageStore::new(&config.page_dir);
    let buckets = (config.max_depth as usize + 1).saturating_mul(config.branching.max(1));
    let ctx = CrawlContext::new(buckets);

    ctx.visited.insert_if_absent(seed.clone());
    ctx.enqueue(Stub { url: seed.clone(), depth: 0 });
    info!(seed = %seed, max_depth = config.max_depth, threads = config.threads, "crawl starting");

    let results: Vec<Result<u32, StoreError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..config.threads)
            .map(|n| {
                let worker = Worker {
                    ctx: &ctx,
                    store: &store,
                    fetcher,
                    policy: &policy,
                    max_depth: config.max_depth,
                };
                scope.spawn(move || worker.run(n))
            })
            .collect();
        handles
            .into_iter()
            .enumerate()
            .map(|(n, h)| {
                h.join().unwrap_or_else(|_| {
                    error!(worker = n, "worker panicked");
                    Err(StoreError::Io(std::io::Error::other("worker panicked")))
                })
            })
            .collect()
    });

    let pages_saved: u32 = results.iter().filter_map(|r| r.as_ref().ok()).sum();
    let failed_workers = results.iter().filter(|r| r.is_err()).count();
    let CrawlContext { visited, fetch_failures, .. } = ctx;
    let mut visited_urls = visited.close();
    visited_urls.sort();

    let summary = CrawlSummary {
        seed,
        max_depth: config.max_depth,
        threads: config.threads,
        pages_saved,
        fetch_failures: fetch_failures.into_inner(),
        visited: visited_urls.len(),
        failed_workers,
        completed_at: time::OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
        visited_urls,
    };
    write_summary(&config.page_dir, &summary)?;
    info!(
        pages = summary.pages_saved,
        visited = summary.visited,
        fetch_failures = summary.fetch_failures,
        failed_workers = summary.failed_workers,
        "crawl complete"
    );
    Ok(summary)
}

pub fn write_summary(page_dir: &Path, summary: &CrawlSummary) -> Result<()> {
    let path = page_dir.join(SUMMARY_FILE);
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
