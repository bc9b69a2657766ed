use crate::analysis::SortKey;
use clap::ValueHint;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_SORT: &str = "rank"; // parsed by parser
pub const DEFAULT_FORMAT: &str = "text"; // parsed by parser
pub const DEFAULT_LOG_FILE: &str = "cryptopulse.log";
pub const DEFAULT_TICK_MS: u64 = 100;

/// Output of the `snapshot` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Styled table for a terminal
    #[default]
    Text,
    /// The derived view as JSON
    Json,
}

/// CryptoPulse Analytics: the top 50 crypto assets at a glance.
///
/// Without a subcommand the interactive dashboard is opened.
#[derive(Parser, Debug)]
#[command(author, version, about, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub(crate) cmd: Option<Command>,

    #[command(flatten)]
    pub(crate) dashboard: DashboardArgs,
}

impl Cli {
    pub(crate) fn into_command(self) -> Command {
        self.cmd.unwrap_or(Command::Dashboard(self.dashboard))
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Open the interactive dashboard
    Dashboard(DashboardArgs),

    /// Fetch once, print the derived view and exit
    Snapshot(SnapshotArgs),
}

/// Options shared by every view.
#[derive(Args, Debug, Clone)]
pub(crate) struct ViewArgs {
    /// Path to environment file (default: ./.env). Can also use APP_ENV_FILE.
    #[arg(
        long,
        value_hint = ValueHint::FilePath,
        default_value = ".env",
        env = "APP_ENV_FILE"
    )]
    pub(crate) env_file: PathBuf,

    /// Base URL of the CoinGecko v3 API (default: public endpoint)
    #[arg(long, env = "COINGECKO_API_URL", value_hint = ValueHint::Url)]
    pub(crate) api_url: Option<String>,

    /// Initial search query, matched case-insensitively against asset names
    #[arg(short = 's', long, default_value = "")]
    pub(crate) search: String,

    /// Initial sort key (rank | price | growth)
    #[arg(
        long,
        value_parser = parse_sort_key,
        default_value = DEFAULT_SORT
    )]
    pub(crate) sort: SortKey,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct DashboardArgs {
    #[command(flatten)]
    pub(crate) view: ViewArgs,

    /// File receiving logs while the dashboard owns the terminal
    #[arg(
        long,
        env = "CRYPTOPULSE_LOG_FILE",
        value_hint = ValueHint::FilePath,
        default_value = DEFAULT_LOG_FILE
    )]
    pub(crate) log_file: PathBuf,

    /// Input poll interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    pub(crate) tick_ms: u64,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct SnapshotArgs {
    #[command(flatten)]
    pub(crate) view: ViewArgs,

    /// Output format (text | json)
    #[arg(
        long,
        value_parser = parse_output_format,
        default_value = DEFAULT_FORMAT
    )]
    pub(crate) format: OutputFormat,
}

pub fn parse_sort_key(s: &str) -> Result<SortKey, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        // primary names
        "rank" => Ok(SortKey::Rank),
        "price" => Ok(SortKey::Price),
        "growth" => Ok(SortKey::Change24h),
        // upstream field names
        "market_cap_rank" => Ok(SortKey::Rank),
        "current_price" => Ok(SortKey::Price),
        "price_change_percentage_24h" => Ok(SortKey::Change24h),
        // handy aliases
        "change" | "24h" | "change24h" => Ok(SortKey::Change24h),
        other => Err(format!(
            "invalid sort key '{}'; expected one of: rank, price, growth (aliases: market_cap_rank, current_price, price_change_percentage_24h, change, 24h)",
            other
        )),
    }
}

pub fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "text" | "table" | "plain" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(format!(
            "invalid output format '{}'; expected one of: text, json",
            other
        )),
    }
}
