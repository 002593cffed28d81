use anyhow::Result;
use clap::{Parser, Subcommand};
use proofmark::chunker::DEFAULT_MAX_CHUNK_TOKENS;
use proofmark::error::CliError;
use proofmark::reader::{read_document, write_document};
use proofmark::report::{PendingReport, ProofreadReport, ResolveReport};
use proofmark::{
    build_checker, final_path, intermediate_path, resolve, scan_markers, CheckLevel, CheckerKind,
    Config, Document, PipelineOptions, Proofreader, Resolution,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit status for bad command-line input (matches clap's own usage errors)
const EXIT_USAGE: u8 = 2;
/// Exit status for configuration and I/O failures
const EXIT_FAILURE: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "proofmark")]
#[command(about = "Proofread a document in two passes: auto-corrections plus reviewable suggestion markers")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply corrections and annotate suggestions, writing <name>.proofread.<ext>
    Proofread {
        /// Document to proofread
        file: PathBuf,

        /// Checker producing findings: llm or dictionary
        #[arg(long, default_value = "llm")]
        checker: CheckerKind,

        /// How much to check: minimal, standard or thorough
        #[arg(long, default_value = "standard")]
        level: CheckLevel,

        /// Chunk size budget in estimated tokens
        #[arg(long, default_value_t = DEFAULT_MAX_CHUNK_TOKENS)]
        max_chunk_tokens: usize,

        /// Output path (defaults to <name>.proofread.<ext> next to the input)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Suppress the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Strip suggestion markers, keeping the listed ids as applied, writing <name>.final.<ext>
    Resolve {
        /// Annotated document produced by `proofread`
        file: PathBuf,

        /// Suggestion ids to accept (case-insensitive, e.g. S1 s3), or `all`
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,

        /// Output path (defaults to the input name with `.proofread.` replaced by `.final.`)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List the suggestion markers still present in an annotated document
    Pending {
        /// Annotated document produced by `proofread`
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // WHY: stdout carries only the JSON result payload, so logs go to stderr
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    // A missing .env file is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    match run(args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("proofmark: {e:#}");
            if e.downcast_ref::<CliError>().is_some() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::from(EXIT_FAILURE)
            }
        }
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Proofread {
            file,
            checker,
            level,
            max_chunk_tokens,
            output,
            no_progress,
        } => {
            let options = PipelineOptions {
                level,
                max_chunk_tokens,
                show_progress: !no_progress,
            };
            run_proofread(&file, checker, options, output).await
        }
        Command::Resolve { file, ids, output } => run_resolve(&file, &ids, output).await,
        Command::Pending { file } => run_pending(&file).await,
    }
}

async fn run_proofread(
    file: &Path,
    kind: CheckerKind,
    options: PipelineOptions,
    output: Option<PathBuf>,
) -> Result<()> {
    // WHY: configuration problems must surface before any file is read or written
    let config = Config::from_env()?;
    info!(?config, "Loaded configuration");
    let checker = build_checker(kind, &config)?;

    let output = output.unwrap_or_else(|| intermediate_path(file));
    let (text, _stats) = read_document(file).await?;

    let proofreader = Proofreader::new(checker, options);
    let outcome = proofreader.proofread(&text).await;

    write_document(&output, &outcome.document.to_text()).await?;

    let level = proofreader.options().level.to_string();
    let report = ProofreadReport::new(file, &output, &kind.to_string(), &level, outcome);
    print_json(&report)
}

async fn run_resolve(file: &Path, ids: &[String], output: Option<PathBuf>) -> Result<()> {
    // WHY: reject bad ids before touching the filesystem
    let resolution = Resolution::from_tokens(ids)?;
    info!(?resolution, "Resolving suggestions");

    let output = output.unwrap_or_else(|| final_path(file));
    let (text, _stats) = read_document(file).await?;

    let resolved = resolve(&Document::parse(&text), &resolution);
    write_document(&output, &resolved.document.to_text()).await?;

    info!(
        "Resolved {}: {} applied, {} removed",
        file.display(),
        resolved.applied.len(),
        resolved.removed.len()
    );
    print_json(&ResolveReport::new(file, &output, &resolved))
}

async fn run_pending(file: &Path) -> Result<()> {
    let (text, _stats) = read_document(file).await?;
    let report = PendingReport {
        input: file.display().to_string(),
        pending: scan_markers(&Document::parse(&text)),
    };
    print_json(&report)
}

fn print_json<T: Serialize>(payload: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}
