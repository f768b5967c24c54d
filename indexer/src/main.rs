use clap::Parser;
use search_core::{ArgError, EXIT_IO, EXIT_USAGE};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build a word -> (document, count) index from crawled pages", long_about = None)]
struct Cli {
    /// Directory of page files written by the crawler
    page_dir: PathBuf,
    /// Index file to write
    index_file: PathBuf,
}

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::from(EXIT_USAGE) } else { ExitCode::SUCCESS };
        }
    };

    match indexer::run(&cli.page_dir, &cli.index_file) {
        Ok(stats) => {
            eprintln!(
                "done: pages={} words={} occurrences={} -> {}",
                stats.pages,
                stats.words,
                stats.occurrences,
                cli.index_file.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            if let Some(arg) = err.downcast_ref::<ArgError>() {
                eprintln!("indexer: {arg}");
                return ExitCode::from(arg.exit_code());
            }
            tracing::error!(error = %format!("{err:#}"), "indexing failed");
            ExitCode::from(EXIT_IO)
        }
    }
}
