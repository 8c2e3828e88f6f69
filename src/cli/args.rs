//! Command-line argument definitions.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use finrecon::models::{ResultFilter, ToleranceType};

#[derive(Parser)]
#[command(
    name = "finrecon",
    version,
    about = "Reconcile two spreadsheets through a comparison service",
    long_about = "Upload two Excel workbooks to the comparison service, match rows on key\n\
                  columns and compare one value column, optionally within a tolerance.\n\
                  Named configuration profiles are stored by the service."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding finrecon.yaml.
    #[arg(long = "config-dir", value_name = "DIR", default_value = ".", global = true)]
    pub config_dir: Utf8PathBuf,

    /// Base URL of the comparison service API (overrides settings).
    #[arg(long = "backend-url", value_name = "URL", global = true)]
    pub backend_url: Option<String>,

    /// Log at debug level.
    #[arg(long, global = true)]
    pub debug: bool,

    /// Also write logs to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the columns the service discovers in a file.
    Columns {
        #[arg(value_name = "FILE")]
        file: Utf8PathBuf,
    },

    /// Compare two files.
    Reconcile(ReconcileArgs),

    /// Manage stored configuration profiles.
    #[command(subcommand)]
    Profiles(ProfilesCommand),
}

#[derive(Args)]
pub struct ReconcileArgs {
    #[arg(value_name = "FIRST")]
    pub first: Utf8PathBuf,

    #[arg(value_name = "SECOND")]
    pub second: Utf8PathBuf,

    /// Load a stored profile before applying the options below.
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Match key columns of the first file.
    #[arg(long = "keys-first", value_name = "COLS", value_delimiter = ',')]
    pub keys_first: Vec<String>,

    /// Match key columns of the second file.
    #[arg(long = "keys-second", value_name = "COLS", value_delimiter = ',')]
    pub keys_second: Vec<String>,

    /// Value column of the first file (default: its first column).
    #[arg(long = "compare-first", value_name = "COL")]
    pub compare_first: Option<String>,

    /// Value column of the second file (default: its first column).
    #[arg(long = "compare-second", value_name = "COL")]
    pub compare_second: Option<String>,

    #[arg(long, value_enum)]
    pub tolerance: Option<ToleranceArg>,

    /// Tolerance amount, in currency units or percent.
    #[arg(long = "tolerance-value", value_name = "VALUE", default_value_t = 0.0)]
    pub tolerance_value: f64,

    /// Save the configuration as a profile before running.
    #[arg(long = "save-profile", value_name = "NAME")]
    pub save_profile: Option<String>,

    /// Which rows to print.
    #[arg(long, value_enum, default_value = "all")]
    pub show: ShowArg,

    /// Number of rows to print (overrides settings).
    #[arg(long, value_name = "N")]
    pub rows: Option<usize>,

    /// Write the result workbook to PATH.
    #[arg(
        long,
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = "reconciliation_results.xlsx"
    )]
    pub download: Option<Utf8PathBuf>,
}

#[derive(Subcommand)]
pub enum ProfilesCommand {
    /// List stored profiles.
    List {
        /// Show keys, columns and tolerance of every profile.
        #[arg(long)]
        details: bool,
    },

    /// Delete a stored profile.
    Delete {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ToleranceArg {
    None,
    Absolute,
    Percentage,
}

impl From<ToleranceArg> for ToleranceType {
    fn from(arg: ToleranceArg) -> Self {
        match arg {
            ToleranceArg::None => ToleranceType::None,
            ToleranceArg::Absolute => ToleranceType::Absolute,
            ToleranceArg::Percentage => ToleranceType::Percentage,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ShowArg {
    All,
    Diffs,
    Matches,
}

impl From<ShowArg> for ResultFilter {
    fn from(arg: ShowArg) -> Self {
        match arg {
            ShowArg::All => ResultFilter::ALL,
            ShowArg::Diffs => ResultFilter::DIFFS_ONLY,
            ShowArg::Matches => ResultFilter::MATCHES_ONLY,
        }
    }
}
