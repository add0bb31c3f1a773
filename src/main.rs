use anyhow::Result;
use clap::Parser;
use doxy_scanner::config::DEFAULT_EXTENSIONS;
use doxy_scanner::{extract_files, perform_scan, FileDocumentation};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Extract Doxygen-style documentation comments from C++ sources.
#[derive(Parser, Debug)]
#[command(name = "doxy-scan", version, about)]
struct Cli {
    /// Files or directories to extract from
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Extensions to scan for inside directories (repeatable)
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Print JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Give up on a directory scan after this many milliseconds (0 = never)
    #[arg(long, default_value_t = 0)]
    timeout_ms: u32,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_documents(documents: &[FileDocumentation], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(documents)?);
    } else {
        for doc in documents {
            print!("{}", doc);
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<bool> {
    let extensions = if cli.extensions.is_empty() {
        DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
    } else {
        cli.extensions
    };

    let (dirs, files): (Vec<PathBuf>, Vec<PathBuf>) = cli.paths.into_iter().partition(|p| p.is_dir());

    let mut documents = Vec::new();
    let mut failed = false;
    for (path, result) in files.iter().zip(extract_files(&files)) {
        match result {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                error!(path = %path.display(), "{:#}", e);
                failed = true;
            }
        }
    }

    for dir in &dirs {
        let result = perform_scan(&dir.to_string_lossy(), extensions.clone(), cli.timeout_ms, false);
        if result.timed_out_internally {
            warn!(
                root = %dir.display(),
                processed = result.files_processed_before_timeout,
                "scan stopped early"
            );
        }
        documents.extend(result.documents);
    }

    print_documents(&documents, cli.json)?;
    Ok(!failed)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
