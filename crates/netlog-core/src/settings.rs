use clap::Parser;
use std::path::PathBuf;

/// Default input file, relative to the working directory.
pub const DEFAULT_INPUT: &str = "network_metrics.csv";

/// Default processed output file, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "net_log_processed.csv";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Clean, aggregate and plot per-connection network metrics
#[derive(Parser, Debug, Clone)]
#[command(
    name = "netlog",
    about = "Clean, aggregate and plot per-connection network metrics",
    version
)]
pub struct Settings {
    /// Raw metrics CSV to read
    #[arg(long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Processed CSV to write (overwritten on every run)
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Directory in which the per-run plots_<timestamp> directory is created
    #[arg(long, default_value = ".")]
    pub plots_root: PathBuf,

    /// Chart width in pixels
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u32).range(200..=8000))]
    pub chart_width: u32,

    /// Chart height in pixels
    #[arg(long, default_value = "400", value_parser = clap::value_parser!(u32).range(200..=8000))]
    pub chart_height: u32,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Also append log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and apply flag overrides.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve_overrides(Settings::parse_from(args))
    }

    /// `--debug` overrides the log level.
    fn resolve_overrides(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
