//! spcp - Sparse Copy
//!
//! Copy a file while keeping its holes, powered by sparsecopy.

use clap::{Parser, ValueEnum};
use indicatif::ProgressBar;
use serde_json::{Value, json};
use sparsecopy::{
    CopyMode, CopyOptions, CopyStats, CopyStrategy, Error as SparseError, ErrorCode, copy_file,
    create_progress_bar,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// spcp - Sparse-aware file copy
///
/// Copy a regular file to a new path, reading and writing only its data
/// extents. Holes in the source stay holes in the destination.
///
/// The destination must not exist. A failed copy leaves the partial
/// destination in place.
#[derive(Parser, Debug)]
#[command(name = "spcp", version, about, long_about = None)]
struct Args {
    /// Source file
    source: PathBuf,

    /// Destination file (must not exist)
    dest: PathBuf,

    /// Permission bits of the new file, in octal
    #[arg(short = 'm', long, default_value = "644", value_parser = parse_mode)]
    mode: u32,

    /// Copy strategy
    #[arg(short = 's', long, value_enum, default_value = "auto")]
    strategy: StrategyArg,

    /// Do not call fsync after copying (faster but less safe)
    #[arg(long)]
    no_sync: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    output: OutputMode,

    /// Disable progress bar
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Sparse where supported, dense otherwise
    Auto,
    /// Sparse, fail if unsupported
    Sparse,
    /// Copy every byte
    Dense,
}

impl From<StrategyArg> for CopyStrategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::Auto => CopyStrategy::Auto,
            StrategyArg::Sparse => CopyStrategy::Sparse,
            StrategyArg::Dense => CopyStrategy::Dense,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

fn parse_mode(s: &str) -> Result<u32, String> {
    let digits = s.strip_prefix("0o").unwrap_or(s);
    let mode = u32::from_str_radix(digits, 8).map_err(|e| format!("invalid octal mode: {e}"))?;
    if mode > 0o7777 {
        return Err(format!("mode out of range: {s}"));
    }
    Ok(mode)
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to copy {src} to {dst}: {source}")]
    Copy {
        src: PathBuf,
        dst: PathBuf,
        source: SparseError,
    },

    #[error("Failed to serialize JSON output: {source}")]
    JsonSerialize { source: serde_json::Error },
}

impl CliError {
    fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Copy { source, .. } => Some(source.code()),
            Self::JsonSerialize { .. } => None,
        }
    }

    fn code_str(&self) -> &'static str {
        self.code().map_or("internal", ErrorCode::as_str)
    }
}

fn exit_code_for(code: Option<ErrorCode>) -> i32 {
    match code {
        Some(
            ErrorCode::SourceNotFound
            | ErrorCode::AlreadyExists
            | ErrorCode::InvalidInput
            | ErrorCode::Unsupported,
        ) => 2,
        Some(ErrorCode::NoSpace) => 3,
        _ => 1,
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(error) = run(&args) {
        tracing::debug!(?error, "copy failed");
        if args.output == OutputMode::Json {
            let report = json!({
                "status": "failed",
                "source": display_path(&args.source),
                "destination": display_path(&args.dest),
                "error_code": error.code_str(),
                "error_message": error.to_string(),
            });
            println!("{report}");
        }
        eprintln!("error[{}]: {}", error.code_str(), error);
        std::process::exit(exit_code_for(error.code()));
    }
}

fn log_level(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let level = log_level(verbose, quiet);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> CliResult<()> {
    let pb = if args.quiet || args.output == OutputMode::Json {
        None
    } else {
        let total = args.source.metadata().map(|m| m.len()).unwrap_or(0);
        Some(create_progress_bar(total))
    };

    let options = build_options(args, pb.as_ref());

    let result = copy_file(&args.source, &args.dest, &options);

    if let Some(pb) = &pb {
        if result.is_ok() {
            pb.finish_and_clear();
        } else {
            pb.abandon();
        }
    }

    let stats = result.map_err(|source| CliError::Copy {
        src: args.source.clone(),
        dst: args.dest.clone(),
        source,
    })?;

    match args.output {
        OutputMode::Human => print_stats(&stats, args.verbose),
        OutputMode::Json => print_json_value(&stats_to_json(args, &stats)?)?,
    }
    Ok(())
}

fn build_options(args: &Args, pb: Option<&ProgressBar>) -> CopyOptions {
    let mut options = CopyOptions::default()
        .with_strategy(args.strategy.into())
        .with_mode(args.mode);

    if args.no_sync {
        options = options.without_fsync();
    }

    if let Some(pb) = pb {
        let pb = pb.clone();
        options.on_progress = Some(Arc::new(move |done, total| {
            pb.set_length(total);
            pb.set_position(done);
        }));
    }

    if args.verbose {
        eprintln!("Effective configuration:");
        eprintln!("  strategy: {:?}", options.strategy);
        eprintln!("  mode: {:#o}", options.mode);
        eprintln!("  fsync: {}", options.fsync);
    }

    options
}

fn stats_to_json(args: &Args, stats: &CopyStats) -> CliResult<Value> {
    let mut value =
        serde_json::to_value(stats).map_err(|source| CliError::JsonSerialize { source })?;
    if let Value::Object(map) = &mut value {
        map.remove("duration");
        map.insert("status".into(), json!("copied"));
        map.insert("source".into(), json!(display_path(&args.source)));
        map.insert("destination".into(), json!(display_path(&args.dest)));
        map.insert("bytes_skipped".into(), json!(stats.bytes_skipped()));
        map.insert("duration_ms".into(), json!(stats.duration.as_millis() as u64));
    }
    Ok(value)
}

fn print_stats(stats: &CopyStats, verbose: bool) {
    if verbose {
        if stats.mode == CopyMode::Dense && stats.logical_size > 0 {
            eprintln!("note: holes were not preserved (dense copy)");
        }
        println!("Copy completed in {:?}", stats.duration);
        println!("  Mode:           {}", stats.mode.as_str());
        println!("  Logical size:   {}", format_bytes(stats.logical_size));
        println!("  Data copied:    {}", format_bytes(stats.bytes_copied));
        println!("  Holes skipped:  {}", format_bytes(stats.bytes_skipped()));
        println!("  Data extents:   {}", stats.data_extents);

        if stats.duration.as_secs_f64() > 0.0 {
            let speed = stats.logical_size as f64 / stats.duration.as_secs_f64();
            println!("  Speed:          {}/s", format_bytes(speed as u64));
        }
    } else {
        println!(
            "Copied {} ({} data, {} extents, {})",
            format_bytes(stats.logical_size),
            format_bytes(stats.bytes_copied),
            stats.data_extents,
            stats.mode.as_str()
        );
    }
}

fn print_json_value(value: &Value) -> CliResult<()> {
    let serialized =
        serde_json::to_string(value).map_err(|source| CliError::JsonSerialize { source })?;
    println!("{serialized}");
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
