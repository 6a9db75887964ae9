// crates/vvtest-cli/src/main.rs
// ============================================================================
// Module: vvtest CLI Entry Point
// Description: Command dispatcher for decode, encode, and fetch runs.
// Purpose: Turn command-line arguments into harness runs and exit codes.
// Dependencies: clap, thiserror, vvtest-config, vvtest-core, vvtest-fetch, vvtest-runner
// ============================================================================

//! ## Overview
//! The CLI wires loaded suite definitions, skip lists, and run flags into
//! the harness layer. Configuration problems halt before anything runs,
//! naming the offending file; a completed run exits zero exactly when no
//! test finished as ERROR or CRASH. All output goes through explicit
//! stdout/stderr writers.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use thiserror::Error;

use vvtest_config::load_skip_list;
use vvtest_config::load_test_suite;
use vvtest_core::FilterOptions;
use vvtest_core::SkipFilter;
use vvtest_core::TestType;
use vvtest_core::parse_driver_from_output;
use vvtest_fetch::FetchableResource;
use vvtest_fetch::SampleFetcher;
use vvtest_runner::DecodeHarness;
use vvtest_runner::DownloadPolicy;
use vvtest_runner::EncodeHarness;
use vvtest_runner::Harness;
use vvtest_runner::HarnessConfig;
use vvtest_runner::RunOptions;
use vvtest_runner::run_suite;
use vvtest_runner::run_with_timeout;
use vvtest_runner::write_sample_listing;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Skip-list file consulted when `--skip-list` is not given.
const DEFAULT_SKIP_LIST: &str = "skipped_tests.json";

/// Deadline for the driver-detection probe run.
const DRIVER_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// SECTION: Command Line
// ============================================================================

/// Top-level argument parser.
#[derive(Parser, Debug)]
#[command(
    name = "vvtest",
    about = "Vulkan Video conformance test orchestrator",
    version,
    disable_help_subcommand = true
)]
struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run decode tests against the decoder executable.
    Decode(RunArgs),
    /// Run encode tests against the encoder executable.
    Encode(RunArgs),
    /// Download and verify sample files without running tests.
    Fetch(FetchArgs),
}

/// Arguments shared by the decode and encode subcommands.
#[derive(Args, Debug)]
struct RunArgs {
    /// Executable under test.
    #[arg(long, value_name = "PATH")]
    executable: Option<PathBuf>,
    /// Test suite definition file.
    #[arg(long, value_name = "FILE")]
    samples: PathBuf,
    /// Test only this codec.
    #[arg(long, short = 'c', value_name = "CODEC")]
    codec: Option<String>,
    /// Filter tests by name pattern (supports wildcards).
    #[arg(long, short = 't', value_name = "PATTERN")]
    test: Option<String>,
    /// Working directory for sample files and artifacts.
    #[arg(long, short = 'w', value_name = "DIR")]
    work_dir: Option<PathBuf>,
    /// Skip-list file; a missing file means no skips.
    #[arg(long, value_name = "FILE")]
    skip_list: Option<PathBuf>,
    /// Run skip-listed and disabled tests too.
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "only_skipped")]
    ignore_skip_list: bool,
    /// Run only the tests the skip list holds back.
    #[arg(long, action = ArgAction::SetTrue)]
    only_skipped: bool,
    /// List skip-rule exclusions with reasons before running.
    #[arg(long, action = ArgAction::SetTrue)]
    show_skipped: bool,
    /// Skip automatic download of missing or corrupt sample files.
    #[arg(long, action = ArgAction::SetTrue)]
    no_auto_download: bool,
    /// Skip TLS certificate verification on downloads.
    #[arg(long, action = ArgAction::SetTrue)]
    insecure: bool,
    /// Export results to this JSON file.
    #[arg(long, short = 'j', value_name = "FILE")]
    export_json: Option<PathBuf>,
    /// List available test samples and exit.
    #[arg(long, action = ArgAction::SetTrue)]
    list_samples: bool,
    /// Vulkan device index to use.
    #[arg(long, value_name = "N")]
    device_id: Option<u32>,
    /// Per-test timeout in seconds.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
    /// Show command lines and captured output.
    #[arg(long, short = 'v', action = ArgAction::SetTrue)]
    verbose: bool,
    /// Keep output artifacts produced by passing tests.
    #[arg(long, action = ArgAction::SetTrue)]
    keep_files: bool,
}

/// Arguments for the fetch subcommand.
#[derive(Args, Debug)]
struct FetchArgs {
    /// Test suite definition file.
    #[arg(long, value_name = "FILE")]
    samples: PathBuf,
    /// Suite flavor the definition file describes.
    #[arg(long, value_enum, default_value_t = SuiteKind::Decode)]
    test_type: SuiteKind,
    /// Working directory sample files are stored under.
    #[arg(long, short = 'w', value_name = "DIR")]
    work_dir: Option<PathBuf>,
    /// Skip TLS certificate verification on downloads.
    #[arg(long, action = ArgAction::SetTrue)]
    insecure: bool,
}

/// Suite flavor for fetch.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SuiteKind {
    /// Decode suite definition.
    Decode,
    /// Encode suite definition.
    Encode,
}

impl SuiteKind {
    /// Corresponding core test type.
    const fn test_type(self) -> TestType {
        match self {
            Self::Decode => TestType::Decode,
            Self::Encode => TestType::Encode,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Failure that halts the CLI before or outside a run.
#[derive(Debug, Error)]
enum CliError {
    /// A configuration file could not be loaded or was invalid.
    #[error("Configuration error: {0}")]
    Config(String),
    /// A required argument was missing for the requested operation.
    #[error("{0}")]
    Usage(String),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Decode(args) => run_tests(TestType::Decode, &args),
        Commands::Encode(args) => run_tests(TestType::Encode, &args),
        Commands::Fetch(args) => fetch_resources(&args),
    }
}

// ============================================================================
// SECTION: Run Subcommands
// ============================================================================

/// Runs the decode or encode suite described by `args`.
fn run_tests(test_type: TestType, args: &RunArgs) -> Result<ExitCode, CliError> {
    let work_dir = args
        .work_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));

    let load = load_test_suite(&args.samples, test_type)
        .map_err(|err| CliError::Config(format!("{}: {err}", args.samples.display())))?;

    if args.list_samples {
        let mut stdout = std::io::stdout();
        write_sample_listing(&mut stdout, &load.samples, test_type);
        return Ok(ExitCode::SUCCESS);
    }

    let Some(executable) = args.executable.clone() else {
        return Err(CliError::Usage(format!(
            "--executable is required to run {} tests",
            test_type.as_str()
        )));
    };

    let skip_list_path = args
        .skip_list
        .clone()
        .unwrap_or_else(|| work_dir.join(DEFAULT_SKIP_LIST));
    let skip_list = load_skip_list(&skip_list_path)
        .map_err(|err| CliError::Config(format!("{}: {err}", skip_list_path.display())))?;
    for warning in &skip_list.warnings {
        let _ = write_stderr_line(&format!("⚠️  {warning}"));
    }

    let config = HarnessConfig {
        executable: executable.clone(),
        resources_dir: work_dir.clone(),
        results_dir: work_dir.join("results"),
        device_id: args.device_id,
        timeout: args.timeout.map(Duration::from_secs),
        keep_files: args.keep_files,
        verbose: args.verbose,
    };

    let options = RunOptions {
        filter: FilterOptions {
            codec_filter: args.codec.clone(),
            test_pattern: args.test.clone(),
            skip_filter: skip_filter_from_flags(args.ignore_skip_list, args.only_skipped),
            current_driver: detect_driver(&executable),
        },
        download: DownloadPolicy {
            auto_download: !args.no_auto_download,
            insecure: args.insecure,
        },
        show_skipped: args.show_skipped,
        export_json: args.export_json.clone(),
        verbose: args.verbose,
        executable,
        work_dir: Some(work_dir),
    };

    let mut harness: Box<dyn Harness> = match test_type {
        TestType::Decode => Box::new(DecodeHarness::new(
            config,
            load.samples,
            load.format,
            skip_list.rules,
        )),
        TestType::Encode => Box::new(EncodeHarness::new(
            config,
            load.samples,
            load.format,
            skip_list.rules,
        )),
    };

    let mut stdout = std::io::stdout();
    let outcome = run_suite(harness.as_mut(), test_type, &options, &mut stdout);
    if outcome.success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Skip-list participation from the two mutually exclusive flags.
const fn skip_filter_from_flags(ignore_skip_list: bool, only_skipped: bool) -> SkipFilter {
    if only_skipped {
        SkipFilter::Skipped
    } else if ignore_skip_list {
        SkipFilter::All
    } else {
        SkipFilter::Enabled
    }
}

/// Probes the executable once and parses its device-selection banner
/// for a normalized driver name. Any failure just disables driver
/// predicates in skip-rule evaluation.
fn detect_driver(executable: &Path) -> Option<String> {
    let command = vec![executable.display().to_string()];
    let output = run_with_timeout(&command, None, DRIVER_PROBE_TIMEOUT).ok()?;
    parse_driver_from_output(&output.stdout, &output.stderr)
}

// ============================================================================
// SECTION: Fetch Subcommand
// ============================================================================

/// Downloads and verifies every downloadable resource in a suite.
fn fetch_resources(args: &FetchArgs) -> Result<ExitCode, CliError> {
    let work_dir = args
        .work_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let test_type = args.test_type.test_type();

    let load = load_test_suite(&args.samples, test_type)
        .map_err(|err| CliError::Config(format!("{}: {err}", args.samples.display())))?;

    let resources: Vec<FetchableResource> = load
        .samples
        .iter()
        .filter_map(|sample| sample.source.as_ref())
        .filter(|source| !source.url.is_empty())
        .map(|source| {
            FetchableResource::new(
                source.url.clone(),
                source.filepath.clone(),
                &source.checksum,
                &work_dir,
            )
        })
        .collect();

    let mut stdout = std::io::stdout();
    if resources.is_empty() {
        let _ = writeln!(&mut stdout, "No downloadable resources in suite");
        return Ok(ExitCode::SUCCESS);
    }

    let mut fetcher = SampleFetcher::new(resources);
    if fetcher.fetch_all(args.insecure, &mut stdout) {
        let _ = writeln!(&mut stdout, "✓ All sample files present and verified");
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes one line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Reports a fatal error and maps it to a failing exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
