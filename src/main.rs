use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info, warn};

use docsift::commands::{self, CommandError, CommandResult};
use docsift::config::{AppSettings, SettingsSource};
use docsift::logging::init_logging;
use docsift::AppContext;

/// Document registry with PDF summaries, similarity and date extraction
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Settings file path (defaults to $DOCSIFT_CONFIG, then the config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy a PDF into the upload folder and register it
    Upload {
        file: PathBuf,
        /// Store under this name instead of the file's own
        #[arg(long)]
        name: Option<String>,
    },
    /// Summarize an uploaded file, extract its dates and store the result
    Analyze { filename: String },
    /// Regenerate the summary of a registered document
    Summarize { id: i64 },
    /// Compare two uploaded files
    Compare { file1: String, file2: String },
    /// Delete a document and its file
    Delete { id: i64 },
    /// Register uploaded files that have no record yet
    Sync,
    /// List registered documents
    List {
        #[arg(long)]
        limit: Option<i64>,
        #[arg(long)]
        offset: Option<i64>,
    },
    /// Show one registered document
    Show { id: i64 },
    /// List files in the upload folder
    Files,
    /// Write a document's summary to the summary folder
    SaveSummary { id: i64 },
    /// Report backend and storage status
    Status,
    /// Write a default settings file
    InitConfig {
        #[arg(long)]
        force: bool,
    },
}

fn print_json<T: Serialize>(value: &T) -> CommandResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CommandError::InvalidInput(format!("failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}

async fn run(cli: Cli, settings_path: PathBuf, settings: AppSettings) -> CommandResult<()> {
    if let Commands::InitConfig { force } = cli.command {
        let path = commands::init_settings(&settings_path, force)?;
        return print_json(&path);
    }

    let ctx = AppContext::from_settings(settings)?;

    match cli.command {
        Commands::Upload { file, name } => {
            let filename = match name {
                Some(name) => name,
                None => file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
                    .ok_or_else(|| {
                        CommandError::InvalidInput(format!("no file name in {}", file.display()))
                    })?,
            };
            let bytes = std::fs::read(&file).map_err(|e| {
                CommandError::InvalidInput(format!("failed to read {}: {}", file.display(), e))
            })?;
            print_json(&commands::upload_document(&ctx.db, &ctx.files, &filename, &bytes)?)
        }
        Commands::Analyze { filename } => {
            let report =
                commands::analyze_document(&ctx.db, &ctx.files, &ctx.analysis, &filename).await?;
            print_json(&report)
        }
        Commands::Summarize { id } => {
            let document =
                commands::generate_summary(&ctx.db, &ctx.files, &ctx.analysis, id).await?;
            print_json(&document)
        }
        Commands::Compare { file1, file2 } => {
            let report =
                commands::compare_documents(&ctx.db, &ctx.files, &ctx.analysis, &file1, &file2)?;
            print_json(&report)
        }
        Commands::Delete { id } => print_json(&commands::delete_document(&ctx.db, &ctx.files, id)?),
        Commands::Sync => print_json(&commands::sync_files(&ctx.db, &ctx.files)?),
        Commands::List { limit, offset } => {
            print_json(&commands::list_documents(&ctx.db, limit, offset)?)
        }
        Commands::Show { id } => print_json(&commands::get_document(&ctx.db, id)?),
        Commands::Files => print_json(&commands::list_files(&ctx.files)?),
        Commands::SaveSummary { id } => {
            print_json(&commands::save_summary_file(&ctx.db, &ctx.files, id)?)
        }
        Commands::Status => print_json(&commands::run_diagnostics(
            &ctx.settings,
            &ctx.db,
            &ctx.files,
        )?),
        Commands::InitConfig { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings_path = match AppSettings::resolve_path(cli.config.as_deref()) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let (settings, source) = match AppSettings::load_with_source(&settings_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Keep the guard alive so the file writer flushes on exit
    let guard = match init_logging(&settings.log_dir(), cli.verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("File logging disabled: {}", e);
            None
        }
    };
    info!("docsift {}", env!("CARGO_PKG_VERSION"));
    match &source {
        SettingsSource::File(_) => info!("Using {}", source),
        SettingsSource::Defaults(_) => warn!("Using {}", source),
    }

    match run(cli, settings_path, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if guard.is_some() {
                error!("{}", e);
            } else {
                eprintln!("{}", e);
            }
            ExitCode::FAILURE
        }
    }
}
