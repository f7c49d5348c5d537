use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;
use tint_batch::config;
use tint_batch::imaging::ColorTransform;
use tint_batch::layout::WorkspaceLayout;
use tint_batch::output;
use tint_batch::pipeline::{self, RunReport};
use tint_batch::process::BatchEvent;

fn version_string() -> &'static str {
    let hash = env!("TINT_BATCH_GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{}@{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "tint-batch")]
#[command(about = "Extract a zip of PNGs and write grayscale, sepia and slumber variants")]
#[command(long_about = "\
Extract a zip of PNGs and write grayscale, sepia and slumber variants

All paths are fixed relative to the root directory:

  <root>/
  ├── myfile.zip       # Input archive
  ├── config.toml      # Optional settings (see 'tint-batch gen-config')
  ├── unzipped/        # Extracted archive contents
  ├── grayscaled/      # Grayscale copies of unzipped/*.png
  ├── sepia/           # Sepia copies
  ├── slumber/         # Slumber copies
  └── report.json      # Per-batch results of the last run

Only top-level .png files in unzipped/ are transformed. A file that cannot
be decoded is reported and skipped; the exit status is non-zero if any file
failed.

Set RUST_LOG=debug for per-file logging.")]
#[command(version = version_string())]
struct Cli {
    /// Working root containing myfile.zip
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Extract the archive, then apply every transform (default)
    Run,
    /// Only extract myfile.zip into unzipped/
    Extract,
    /// Apply one transform to the already-extracted images
    Apply {
        #[arg(value_enum)]
        transform: ColorTransform,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    init_logger();
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Dispatch a command. `Ok(false)` means the run finished with per-file failures.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let layout = WorkspaceLayout::new(&cli.root);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let config = config::load_config(layout.root())?;
            init_thread_pool(&config.processing);

            println!("==> Extracting {}", layout.archive().display());
            let report = with_printer(|tx| {
                pipeline::run_with(&layout, &config, Some(tx), |extracted| {
                    output::print_extract_summary(extracted);
                    println!("==> Applying transforms");
                })
            })?;
            finish(&layout, &report)
        }
        Command::Extract => {
            let extracted = pipeline::extract(&layout)?;
            output::print_extract_summary(&extracted);
            Ok(true)
        }
        Command::Apply { transform } => {
            let config = config::load_config(layout.root())?;
            init_thread_pool(&config.processing);
            let batches =
                with_printer(|tx| pipeline::run_filters(&layout, &[transform], &config, Some(tx)))?;
            let report = RunReport {
                extracted: None,
                batches,
            };
            finish(&layout, &report)
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(true)
        }
    }
}

/// Write `report.json`, print the summary, and report whether the run was clean.
fn finish(layout: &WorkspaceLayout, report: &RunReport) -> Result<bool, Box<dyn std::error::Error>> {
    report.write_json(&layout.report())?;
    println!();
    output::print_run_report(report);
    println!("==> Report: {}", layout.report().display());
    Ok(report.is_clean())
}

/// Run `work` while a printer thread renders its progress events.
fn with_printer<T>(work: impl FnOnce(Sender<BatchEvent>) -> T) -> T {
    let (tx, rx) = mpsc::channel();
    let printer: JoinHandle<()> = std::thread::spawn(move || {
        let mut position = 0;
        for event in rx {
            position = match event {
                BatchEvent::BatchStarted { .. } => 0,
                _ => position + 1,
            };
            for line in output::format_batch_event(&event, position) {
                println!("{}", line);
            }
        }
    });
    let result = work(tx);
    // All senders are dropped once `work` returns, which ends the printer loop.
    if printer.join().is_err() {
        log::warn!("progress printer panicked");
    }
    result
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

/// Log to stderr at `info` unless `RUST_LOG` says otherwise.
fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = buf.timestamp_seconds();
            writeln!(
                buf,
                "[{} {style}{}{style:#} {}:{}] {}",
                ts,
                record.level(),
                record.file().unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
