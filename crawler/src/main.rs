use anyhow::Result;
use clap::Parser;
use crawler::{crawl, CrawlConfig, HttpFetcher};
use search_core::{ArgError, EXIT_IO, EXIT_USAGE};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "crawler")]
#[command(about = "Breadth-first crawl from a seed url, saving every page as <pagedir>/<id>")]
struct Cli {
    /// Url to start from; only pages under its directory are followed
    seed_url: String,
    /// Directory receiving the page files (created if missing)
    page_dir: PathBuf,
    /// Pages at this depth are saved but not expanded
    max_depth: u32,
    /// Number of worker threads
    threads: usize,
    /// User-Agent header sent with every request
    #[arg(long, env = "CRAWLER_USER_AGENT", default_value = "tiny-search-crawler/0.1")]
    user_agent: String,
    /// Per-request timeout in seconds
    #[arg(long, env = "CRAWLER_TIMEOUT_SECS", default_value_t = 12)]
    timeout_secs: u64,
    /// Pages larger than this many bytes are skipped
    #[arg(long, default_value_t = 2 * 1024 * 1024)]
    max_bytes: usize,
    /// Expected links per page, used to size the visited-url table
    #[arg(long, default_value_t = 50)]
    branching: usize,
}

fn main() -> ExitCode {
    fmt().with_env_filter(env_filter()).with_writer(std::io::stderr).init();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::from(EXIT_USAGE) } else { ExitCode::SUCCESS };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(arg) = err.downcast_ref::<ArgError>() {
                eprintln!("crawler: {arg}");
                return ExitCode::from(arg.exit_code());
            }
            tracing::error!(error = %format!("{err:#}"), "crawl failed");
            ExitCode::from(EXIT_IO)
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn run(cli: Cli) -> Result<()> {
    let fetcher = HttpFetcher::new(&cli.user_agent, Duration::from_secs(cli.timeout_secs), cli.max_bytes)?;
    let mut config = CrawlConfig::new(cli.seed_url, cli.page_dir, cli.max_depth, cli.threads);
    config.branching = cli.branching;
    let summary = crawl(&config, &fetcher)?;
    eprintln!(
        "done: saved={} visited={} fetch_failures={} -> {}",
        summary.pages_saved,
        summary.visited,
        summary.fetch_failures,
        config.page_dir.display()
    );
    if summary.failed_workers > 0 {
        anyhow::bail!("{} worker(s) stopped on storage errors", summary.failed_workers);
    }
    Ok(())
}
