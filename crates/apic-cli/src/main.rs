//! CLI entry point for the APIC troubleshooting utilities.
//!
//! # Usage
//!
//! ```bash
//! apic-util [OPTIONS] <COMMAND>
//!
//! # Cross-check actionSubj objects against pconsRefDn on the local controller
//! apic-util pcons-scan
//!
//! # Same, with debug logs and a structured report
//! apic-util -d debug pcons-scan --report /tmp/pcons.json
//!
//! # Export the SFP inventory of a remote controller
//! apic-util sfp-export -i 10.0.0.1 -u admin -p secret --layout with-location
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use apic_client::RemoteSession;
use apic_core::{Config, CsvLayout, JoinRule};
use apic_inventory::{TRANSCEIVER_CLASS, collect_rows, write_csv};
use apic_scanner::{PconsScanner, ScanReport, ScanResult, ScanUpdate, log_summary};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{WrapErr, eyre};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// APIC troubleshooting utilities.
///
/// Detects action subjects that lost their pconsRefDn reference and exports
/// transceiver inventory.
#[derive(Parser)]
#[command(name = "apic-util", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Console log level. `RUST_LOG` takes precedence when set.
    #[arg(short = 'd', long = "debug-level", global = true, value_enum, default_value_t = LogLevel::Info)]
    level: LogLevel,

    /// JSON configuration file. Command-line flags override its values.
    #[arg(long, global = true, env = "APIC_UTIL_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// File receiving every log line at debug level.
    ///
    /// Defaults to `/data/techsupport/util.log`.
    #[arg(long, global = true, env = "APIC_UTIL_LOG_FILE")]
    log_file: Option<Utf8PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Find action subjects without a matching pconsRefDn.
    PconsScan {
        /// Base URL of the local controller endpoint.
        #[arg(long)]
        endpoint: Option<String>,

        /// Objects requested per page.
        #[arg(long)]
        page_size: Option<u64>,

        /// Maximum number of units fetched concurrently.
        #[arg(long)]
        max_in_flight: Option<usize>,

        /// Per-request timeout in seconds.
        #[arg(long)]
        timeout: Option<u64>,

        /// How action subjects are matched against references.
        #[arg(long, value_enum)]
        join: Option<JoinArg>,

        /// Write a JSON report of the scan to this file.
        #[arg(long)]
        report: Option<Utf8PathBuf>,

        /// Exit with status 1 if any mismatch was found or any unit was skipped.
        #[arg(long)]
        strict: bool,
    },

    /// Export SFP transceiver inventory of a remote controller to CSV.
    SfpExport {
        /// Controller address.
        #[arg(short = 'i', long = "apic-ip")]
        apic_ip: String,

        /// Login user.
        #[arg(short, long)]
        username: String,

        /// Login password.
        #[arg(short, long, env = "APIC_UTIL_PASSWORD", hide_env_values = true)]
        password: String,

        /// Column layout.
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,

        /// Destination CSV file.
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },
}

/// Console log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    /// Everything, including per-unit progress.
    Debug,
    /// Progress and results.
    Info,
    /// Problems only.
    Warn,
}

impl LogLevel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
        }
    }
}

/// Join rule selectable on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum JoinArg {
    /// Reference present in the unit and refcont-prefixed oDn.
    Literal,
    /// Exact match of oDn against reference dns.
    DnLookup,
}

impl From<JoinArg> for JoinRule {
    fn from(arg: JoinArg) -> Self {
        match arg {
            JoinArg::Literal => Self::Literal,
            JoinArg::DnLookup => Self::DnLookup,
        }
    }
}

/// CSV layout selectable on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LayoutArg {
    /// Inventory columns only.
    Basic,
    /// Inventory columns plus pod, node and port.
    WithLocation,
}

impl From<LayoutArg> for CsvLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Basic => Self::Basic,
            LayoutArg::WithLocation => Self::WithLocation,
        }
    }
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber with a console sink and a file sink.
///
/// The console honors `RUST_LOG` if set, otherwise `level`. The file always
/// receives debug-level output without ANSI colors. HTTP client crates are
/// held at `warn` on both sinks. If the file cannot be
/// opened, logging continues on the console only and a warning is emitted.
fn init_tracing(level: LogLevel, no_color: bool, log_file: &Utf8Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| console_filter(level));

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    let (file, open_error) = match open_log_file(log_file) {
        Ok(file) => (Some(file), None),
        Err(error) => (None, Some(error)),
    };

    let file_layer = file.map(|file| {
        fmt::layer()
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .with_thread_names(true)
            .with_filter(file_filter())
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_filter(filter),
        )
        .with(file_layer)
        .init();

    if let Some(error) = open_error {
        warn!(path = %log_file, error = %error, "Cannot open log file; logging to console only");
    }
}

/// HTTP client crates stay at `warn` on every sink.
const QUIET_DEPENDENCIES: &str = "hyper=warn,reqwest=warn";

fn console_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::new(format!("{},{QUIET_DEPENDENCIES}", level.as_str()))
}

fn file_filter() -> EnvFilter {
    EnvFilter::new(format!("debug,{QUIET_DEPENDENCIES}"))
}

fn open_log_file(path: &Utf8Path) -> std::io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Builds a [`Config`] from the optional configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
fn load_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .wrap_err_with(|| format!("Failed to load configuration from {path}"))?,
        None => Config::default(),
    };
    if let Some(path) = &cli.log_file {
        config.log.file.clone_from(path);
    }
    Ok(config)
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Scan flags that override the configuration.
struct ScanArgs {
    endpoint: Option<String>,
    page_size: Option<u64>,
    max_in_flight: Option<usize>,
    timeout: Option<u64>,
    join: Option<JoinArg>,
}

impl ScanArgs {
    fn apply(self, config: &mut Config) {
        if let Some(endpoint) = self.endpoint {
            config.fetch.endpoint = endpoint;
        }
        if let Some(page_size) = self.page_size {
            config.fetch.page_size = page_size;
        }
        if let Some(timeout) = self.timeout {
            config.fetch.request_timeout_secs = timeout;
        }
        if let Some(max_in_flight) = self.max_in_flight {
            config.scan.max_in_flight = max_in_flight;
        }
        if let Some(join) = self.join {
            config.scan.join_rule = join.into();
        }
    }
}

/// Runs the pconsRefDn cross-check and logs the outcome.
///
/// The scan runs on its own thread; this thread consumes progress updates.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the worker pool cannot
/// be built, or the report cannot be written. Fetch failures are not errors.
fn run_pcons_scan(
    config: &Config,
    report: Option<&Utf8Path>,
    strict: bool,
) -> color_eyre::Result<ExitCode> {
    info!(
        endpoint = %config.fetch.endpoint,
        join_rule = ?config.scan.join_rule,
        "Starting pcons scan"
    );

    let scanner = PconsScanner::from_config(config)?;
    let (tx, mut rx) = mpsc::channel(256);
    let worker = std::thread::Builder::new()
        .name("pcons-scan".to_owned())
        .spawn(move || scanner.scan_streaming(tx))?;

    let mut planned = 0;
    let mut done = 0usize;
    let mut result: Option<ScanResult> = None;
    while let Some(update) = rx.blocking_recv() {
        match update {
            ScanUpdate::WorkPlanned(count) => {
                planned = count;
                info!(units = count, "Scanning services");
            }
            ScanUpdate::UnitScanned {
                item,
                checked,
                mismatches,
            } => {
                done += 1;
                debug!(unit = %item.tag(), checked, mismatches, done, planned, "Unit done");
            }
            ScanUpdate::UnitSkipped(skipped) => {
                done += 1;
                debug!(unit = %skipped.item.tag(), done, planned, "Unit skipped");
            }
            ScanUpdate::Complete(scan) => result = Some(scan),
        }
    }

    worker
        .join()
        .map_err(|_| eyre!("Scan thread panicked"))??;
    let result = result.ok_or_else(|| eyre!("Scan finished without a result"))?;

    log_summary(&result);

    if let Some(path) = report {
        let json = ScanReport::new(&result).to_json()?;
        std::fs::write(path, json).wrap_err_with(|| format!("Failed to write report to {path}"))?;
        info!(path = %path, "Report written");
    }

    if strict && !result.is_clean() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Logs in to a remote controller and writes its transceiver inventory.
///
/// A rejected login prints `Authentication failed` and succeeds.
///
/// # Errors
///
/// Returns an error if the controller is unreachable, replies with
/// something unexpected, or the CSV cannot be written.
fn run_sfp_export(
    config: &Config,
    apic_ip: &str,
    username: &str,
    password: &str,
) -> color_eyre::Result<ExitCode> {
    let timeout = Duration::from_secs(config.export.request_timeout_secs);
    info!(apic = apic_ip, user = username, "Logging in");

    let session = match RemoteSession::login(apic_ip, username, password, timeout) {
        Ok(session) => session,
        Err(error) if error.is_auth_failure() => {
            warn!(apic = apic_ip, error = %error, "Login rejected");
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "Authentication failed")?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(error) => return Err(error).wrap_err_with(|| format!("Login to {apic_ip} failed")),
    };

    let objects = session.get_class(TRANSCEIVER_CLASS)?;
    let rows = collect_rows(&objects);
    info!(
        objects = objects.len(),
        rows = rows.len(),
        "Fetched transceiver inventory"
    );

    write_csv(&config.export.output, &rows, config.export.layout)?;
    Ok(ExitCode::SUCCESS)
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
///
/// Not async: the HTTP clients are blocking and must not run inside a
/// runtime. The streaming channel works without one.
fn main() -> color_eyre::Result<ExitCode> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Load configuration
    let mut config = load_config(&cli)?;

    // 4. Initialize tracing (console + log file)
    init_tracing(cli.level, cli.no_color, &config.log.file);

    // 5. Route to appropriate command
    match cli.command {
        Commands::PconsScan {
            endpoint,
            page_size,
            max_in_flight,
            timeout,
            join,
            report,
            strict,
        } => {
            ScanArgs {
                endpoint,
                page_size,
                max_in_flight,
                timeout,
                join,
            }
            .apply(&mut config);
            config.validate()?;
            run_pcons_scan(&config, report.as_deref(), strict)
        }
        Commands::SfpExport {
            apic_ip,
            username,
            password,
            layout,
            output,
        } => {
            if let Some(layout) = layout {
                config.export.layout = layout.into();
            }
            if let Some(output) = output {
                config.export.output = output;
            }
            run_sfp_export(&config, &apic_ip, &username, &password)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pcons_scan_flags() {
        let cli = Cli::try_parse_from([
            "apic-util",
            "-d",
            "debug",
            "pcons-scan",
            "--page-size",
            "500",
            "--join",
            "dn-lookup",
            "--strict",
        ])
        .unwrap();
        assert_eq!(cli.level, LogLevel::Debug);
        let Commands::PconsScan {
            page_size,
            join,
            strict,
            ..
        } = cli.command
        else {
            panic!("expected pcons-scan");
        };
        assert_eq!(page_size, Some(500));
        assert!(matches!(join, Some(JoinArg::DnLookup)));
        assert!(strict);
    }

    #[test]
    fn test_default_level_is_info() {
        let cli = Cli::try_parse_from(["apic-util", "pcons-scan"]).unwrap();
        assert_eq!(cli.level, LogLevel::Info);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_sfp_export_requires_credentials() {
        assert!(Cli::try_parse_from(["apic-util", "sfp-export", "-i", "10.0.0.1"]).is_err());
        let cli = Cli::try_parse_from([
            "apic-util",
            "sfp-export",
            "-i",
            "10.0.0.1",
            "-u",
            "admin",
            "-p",
            "pw",
            "--layout",
            "with-location",
        ])
        .unwrap();
        let Commands::SfpExport {
            apic_ip, layout, ..
        } = cli.command
        else {
            panic!("expected sfp-export");
        };
        assert_eq!(apic_ip, "10.0.0.1");
        assert!(matches!(layout, Some(LayoutArg::WithLocation)));
    }

    #[test]
    fn test_scan_args_override_config() {
        let mut config = Config::default();
        ScanArgs {
            endpoint: Some("http://127.0.0.1:9999".to_owned()),
            page_size: None,
            max_in_flight: Some(4),
            timeout: Some(5),
            join: Some(JoinArg::DnLookup),
        }
        .apply(&mut config);
        assert_eq!(config.fetch.endpoint, "http://127.0.0.1:9999");
        assert_eq!(config.fetch.page_size, 75_000);
        assert_eq!(config.fetch.request_timeout_secs, 5);
        assert_eq!(config.scan.max_in_flight, 4);
        assert_eq!(config.scan.join_rule, JoinRule::DnLookup);
    }

    #[test]
    fn test_file_filter_quiets_http_crates() {
        use tracing_subscriber::filter::LevelFilter;

        let filter = file_filter();
        let directives = filter.to_string();
        assert!(directives.contains("hyper=warn"));
        assert!(directives.contains("reqwest=warn"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_console_filter_follows_level() {
        use tracing_subscriber::filter::LevelFilter;

        let filter = console_filter(LogLevel::Warn);
        assert!(filter.to_string().contains("reqwest=warn"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }
}
