use anyhow::{Context, Result};
use clap::Parser;
use querier::Session;
use search_core::{load_index, PageStore, EXIT_IO, EXIT_USAGE};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "querier")]
#[command(about = "Answer and/or queries from standard input against a saved index")]
struct Args {
    /// Index file written by the indexer
    #[arg(long, env = "QUERIER_INDEX", default_value = "indexer/index.file")]
    index: PathBuf,
    /// Page directory written by the crawler, used to look up result urls
    #[arg(long, env = "QUERIER_PAGES", default_value = "pages")]
    pages: PathBuf,
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::from(EXIT_USAGE) } else { ExitCode::SUCCESS };
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "querier stopped");
            ExitCode::from(EXIT_IO)
        }
    }
}

fn run(args: Args) -> Result<()> {
    let index = load_index(&args.index).with_context(|| format!("loading index {}", args.index.display()))?;
    tracing::info!(words = index.len(), index = %args.index.display(), "index loaded");
    let pages = PageStore::new(&args.pages);

    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    Session::new(&index, &pages).with_prompt(prompt).run(stdin.lock(), io::stdout().lock())
}
