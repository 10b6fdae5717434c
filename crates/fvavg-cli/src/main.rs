//! FVAvg batch CLI: drives the ingest -> engine -> persist pipeline over a
//! set of input files, and the TLC-percent consolidator over a set of
//! already-processed FVAvg outputs.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info, warn};

#[derive(Parser)]
#[command(name = "fvavg", about = "Flow-volume averaging engine")]
struct Cli {
    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease log verbosity, suppressing info-level output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the FVAvg pipeline over one or more input recordings.
    Run {
        /// Input spreadsheet files.
        #[arg(long = "input", required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Use the raw-ingest path (marker-scanned column A) instead of the
        /// formatted-ingest path (Time/Vol/Flow header row).
        #[arg(long)]
        raw: bool,

        /// Number of bin intervals K (§6).
        #[arg(long, default_value_t = 100)]
        intervals: usize,

        /// Worker threads for independent per-file runs.
        #[arg(long, default_value_t = 1)]
        jobs: usize,

        /// Directory to write `<stem>_fvavg.xlsx` outputs into (defaults to
        /// each input's own directory).
        #[arg(long = "out-dir")]
        out_dir: Option<PathBuf>,
    },
    /// Consolidate already-processed FVAvg outputs into a percent-TLC table.
    Tlc {
        /// FVAvg output files to consolidate.
        #[arg(long = "input", required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// `subject_id=tlc_value` pairs, one per input file in order.
        #[arg(long = "tlc", required = true, num_args = 1..)]
        tlc: Vec<String>,

        /// Output workbook path.
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Run {
            input,
            raw,
            intervals,
            jobs,
            out_dir,
        } => run_batch(&input, raw, intervals, jobs, out_dir.as_deref()),
        Command::Tlc { input, tlc, out } => run_tlc(&input, &tlc, &out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            error!("{msg}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

struct FileOutcome {
    path: PathBuf,
    error: Option<String>,
}

fn run_batch(
    inputs: &[PathBuf],
    raw: bool,
    intervals: usize,
    jobs: usize,
    out_dir: Option<&Path>,
) -> Result<(), String> {
    let config = fvavg_engine::EngineConfig::new(intervals).map_err(|e| e.to_string())?;
    let mode = if raw {
        fvavg_ingest::IngestMode::Raw
    } else {
        fvavg_ingest::IngestMode::Formatted
    };

    let outcomes = if jobs > 1 {
        run_batch_parallel(inputs, mode, config, out_dir, jobs)
    } else {
        inputs
            .iter()
            .map(|path| run_one(path, mode, config, out_dir))
            .collect()
    };

    let (succeeded, failed): (Vec<_>, Vec<_>) = outcomes.into_iter().partition(|o| o.error.is_none());
    info!("{} succeeded, {} failed", succeeded.len(), failed.len());
    for outcome in &failed {
        warn!("{}: {}", outcome.path.display(), outcome.error.as_deref().unwrap_or(""));
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(format!("{} of {} files failed", failed.len(), inputs.len()))
    }
}

fn run_batch_parallel(
    inputs: &[PathBuf],
    mode: fvavg_ingest::IngestMode,
    config: fvavg_engine::EngineConfig,
    out_dir: Option<&Path>,
    jobs: usize,
) -> Vec<FileOutcome> {
    let chunk_size = inputs.len().div_ceil(jobs).max(1);
    let chunks: Vec<&[PathBuf]> = inputs.chunks(chunk_size).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|path| run_one(path, mode, config, out_dir))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        handles.into_iter().flat_map(|h| h.join().unwrap_or_default()).collect()
    })
}

fn run_one(
    path: &Path,
    mode: fvavg_ingest::IngestMode,
    config: fvavg_engine::EngineConfig,
    out_dir: Option<&Path>,
) -> FileOutcome {
    match run_one_inner(path, mode, config, out_dir) {
        Ok(()) => FileOutcome {
            path: path.to_path_buf(),
            error: None,
        },
        Err(e) => FileOutcome {
            path: path.to_path_buf(),
            error: Some(e.to_string()),
        },
    }
}

fn run_one_inner(
    path: &Path,
    mode: fvavg_ingest::IngestMode,
    config: fvavg_engine::EngineConfig,
    out_dir: Option<&Path>,
) -> Result<(), fvavg_core::FvavgError> {
    let recording = fvavg_ingest::ingest_file(path, mode).map_err(fvavg_core::FvavgError::from)?;
    let run = fvavg_engine::run_fvavg(&recording, config)?;

    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("output");
    let dir = out_dir.unwrap_or_else(|| path.parent().unwrap_or_else(|| Path::new(".")));
    let out_path = dir.join(format!("{stem}_fvavg.xlsx"));

    fvavg_engine::write_fvavg_output(&run, &out_path)?;
    info!("{}: {} breaths -> {}", path.display(), run.breath_count(), out_path.display());
    Ok(())
}

fn run_tlc(inputs: &[PathBuf], tlc_args: &[String], out: &Path) -> Result<(), String> {
    if inputs.len() != tlc_args.len() {
        return Err(format!(
            "{} inputs but {} --tlc values; provide one per input",
            inputs.len(),
            tlc_args.len()
        ));
    }

    let mut columns = Vec::with_capacity(inputs.len());
    for (path, spec) in inputs.iter().zip(tlc_args) {
        let (id, tlc) = parse_tlc_arg(spec)?;
        let subject_id = if id.is_empty() {
            fvavg_ingest::extract_subject_id(path)
        } else {
            id
        };
        fvavg_consolidate::validate_tlc(tlc).map_err(|e| e.to_string())?;
        let loop_ = fvavg_consolidate::read_subject_loop(path, &subject_id).map_err(|e| e.to_string())?;
        columns.push(fvavg_consolidate::SubjectColumn::from_loop(&loop_, tlc));
    }

    let table = fvavg_consolidate::build_table(&columns);
    fvavg_consolidate::write_cross_subject_table(&table, out).map_err(|e| e.to_string())?;
    info!("consolidated {} subjects -> {}", columns.len(), out.display());
    Ok(())
}

/// Parses a `--tlc` argument shaped `subject_id=value` or a bare `value`
/// (subject ID recovered from the input file name instead).
fn parse_tlc_arg(spec: &str) -> Result<(String, f64), String> {
    match spec.split_once('=') {
        Some((id, value)) => {
            let tlc: f64 = value
                .parse()
                .map_err(|_| format!("invalid TLC value {value:?} in {spec:?}"))?;
            Ok((id.to_string(), tlc))
        }
        None => {
            let tlc: f64 = spec
                .parse()
                .map_err(|_| format!("invalid TLC value {spec:?}"))?;
            Ok((String::new(), tlc))
        }
    }
}
