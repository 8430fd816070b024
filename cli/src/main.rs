//! mirror - Command-line interface for the incremental mirroring engine.
//!
//! Resolves the source/destination pair (from flags or the defaults file),
//! runs the mirror, and renders the run report: a timestamped log file, a
//! stdout summary, and the destination volume's free space.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use clap::Parser;
use engine::{run_mirror, RunReport};

/// mirror - One-way incremental directory mirroring
#[derive(Parser, Debug)]
#[command(name = "mirror")]
#[command(version = "0.1.0")]
#[command(about = "Mirror a directory tree into a destination, copying only changed files")]
struct Args {
    /// Source directory (falls back to the defaults file when omitted)
    #[arg(long, value_name = "PATH")]
    src: Option<PathBuf>,

    /// Destination directory (falls back to the defaults file when omitted)
    #[arg(long, value_name = "PATH")]
    dst: Option<PathBuf>,

    /// File holding "source,destination" on one line, used when --src/--dst
    /// are not both given
    #[arg(long, value_name = "FILE", default_value = "default.txt")]
    defaults: PathBuf,

    /// Directory where run logs are written
    #[arg(long, value_name = "DIR", default_value = "logs")]
    log_dir: PathBuf,

    /// Do not write a log file
    #[arg(long)]
    no_log: bool,

    /// Print the final counters as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Echo every diagnostic line to stderr
    #[arg(long)]
    verbose: bool,
}

/// Parse a defaults file: one line, `source,destination`.
///
/// Trailing CR/LF and surrounding whitespace are tolerated; both halves
/// must be non-empty.
fn parse_default_paths(contents: &str) -> Option<(PathBuf, PathBuf)> {
    let line = contents.lines().next()?;
    let (src, dst) = line.split_once(',')?;
    let src = src.trim();
    let dst = dst.trim();
    if src.is_empty() || dst.is_empty() {
        return None;
    }
    Some((PathBuf::from(src), PathBuf::from(dst)))
}

/// Pick the source/destination pair: explicit flags win, the defaults file
/// is the fallback.
fn resolve_paths(args: &Args) -> Result<(PathBuf, PathBuf), String> {
    if let (Some(src), Some(dst)) = (&args.src, &args.dst) {
        return Ok((src.clone(), dst.clone()));
    }
    if args.src.is_some() || args.dst.is_some() {
        return Err("--src and --dst must be given together".to_string());
    }

    let contents = fs::read_to_string(&args.defaults).map_err(|e| {
        format!(
            "No --src/--dst given and defaults file '{}' could not be read: {}",
            args.defaults.display(),
            e
        )
    })?;

    parse_default_paths(&contents).ok_or_else(|| {
        format!(
            "Defaults file '{}' must contain 'source,destination' on its first line",
            args.defaults.display()
        )
    })
}

/// Sink for the run's log lines; a disabled log swallows everything.
struct RunLog {
    file: Option<File>,
}

impl RunLog {
    /// Create `<dir>/log_<M>-<D>-<Y>_<H>-<M>-<S>.txt`, creating the log
    /// directory first if needed.
    fn create(dir: &Path) -> Result<RunLog, String> {
        fs::create_dir_all(dir)
            .map_err(|e| format!("Could not create log directory '{}': {}", dir.display(), e))?;

        let stamp = Local::now().format("%-m-%-d-%Y_%-H-%-M-%-S");
        let path = dir.join(format!("log_{stamp}.txt"));
        let file = File::create(&path)
            .map_err(|e| format!("Could not create log file '{}': {}", path.display(), e))?;

        Ok(RunLog { file: Some(file) })
    }

    fn disabled() -> RunLog {
        RunLog { file: None }
    }

    fn line(&mut self, text: &str) {
        if let Some(file) = &mut self.file {
            let _ = writeln!(file, "{text}");
        }
    }
}

const BYTES_PER_GIB: u64 = 1024 * 1024 * 1024;

/// Free and total space of the destination volume, in whole GiB.
///
/// Unavailable on some filesystems; the report simply omits the lines then.
fn volume_space_gib(path: &Path) -> Option<(u64, u64)> {
    let free = fs2::available_space(path).ok()? / BYTES_PER_GIB;
    let total = fs2::total_space(path).ok()? / BYTES_PER_GIB;
    Some((free, total))
}

fn write_stats(log: &mut RunLog, report: &RunReport, elapsed_secs: f64, dst: &Path) {
    log.line("[STATS]");
    log.line(&format!("\t{} files checked", report.files_checked));
    log.line(&format!("\t{} folders checked", report.folders_checked));
    log.line(&format!(
        "\t{} out of {} files copied.",
        report.copies_succeeded, report.should_copy
    ));
    log.line(&format!("\t{} errors occurred.", report.errors));
    log.line(&format!("\tTime elapsed: {:.3} seconds", elapsed_secs));
    if let Some((free, total)) = volume_space_gib(dst) {
        log.line(&format!("\t{} free GB", free));
        log.line(&format!("\t{} total GB", total));
    }
}

fn print_summary(args: &Args, report: &RunReport, elapsed_secs: f64, dst: &Path) {
    if args.json {
        match serde_json::to_string_pretty(&report.summary()) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Could not serialize summary: {e}"),
        }
        return;
    }

    println!("Mirror complete");
    println!("  {} files checked", report.files_checked);
    println!("  {} folders checked", report.folders_checked);
    println!(
        "  {} out of {} files copied",
        report.copies_succeeded, report.should_copy
    );
    println!("  {} errors occurred", report.errors);
    println!("  Elapsed: {:.3} seconds", elapsed_secs);
    if let Some((free, total)) = volume_space_gib(dst) {
        println!("  Destination volume: {} GB free of {} GB", free, total);
    }
}

/// Main CLI logic - separated for testability.
///
/// Returns the run's error count on success, or a setup failure message.
fn run_cli(args: &Args) -> Result<u64, String> {
    let (src, dst) = resolve_paths(args)?;

    let mut log = if args.no_log {
        RunLog::disabled()
    } else {
        RunLog::create(&args.log_dir)?
    };

    log.line(&format!(
        "[START] Mirror started on {}",
        Local::now().format("%m-%d-%Y at %H:%M:%S")
    ));
    log.line(&format!("[SOURCE] {}", src.display()));
    log.line(&format!("[DESTINATION] {}", dst.display()));

    let started = Instant::now();
    let report = run_mirror(&src, &dst).map_err(|e| e.to_string())?;
    let elapsed_secs = started.elapsed().as_secs_f64();

    for diagnostic in report.diagnostics() {
        log.line(&format!("[ERROR] {diagnostic}"));
        if args.verbose {
            eprintln!("{diagnostic}");
        }
    }

    write_stats(&mut log, &report, elapsed_secs, &dst);
    log.line(&format!(
        "[END] Mirror finished on {}",
        Local::now().format("%m-%d-%Y at %H:%M:%S")
    ));

    print_summary(args, &report, elapsed_secs, &dst);

    Ok(report.errors)
}

fn main() {
    let args = Args::parse();

    let exit_code = match run_cli(&args) {
        Ok(0) => 0,
        Ok(_) => 1,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            2
        }
    };

    std::process::exit(exit_code);
}
