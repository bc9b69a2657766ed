use crate::analysis::SortKey;
use crate::args::{DashboardArgs, OutputFormat, SnapshotArgs, ViewArgs};
use crate::config::load_api_url::load_api_url;
use anyhow::{bail, Context, Result};
use derive_builder::Builder;
use dialoguer::console::style;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

mod load_api_url;

/// Where the market listing comes from.
#[derive(Builder, Clone, Debug)]
pub struct SourceConfig {
    /// Base URL of the CoinGecko v3 API
    pub(crate) api_url: Url,
}

impl SourceConfig {
    pub fn builder() -> SourceConfigBuilder {
        SourceConfigBuilder::default()
    }
}

/// Initial values of the search and sort controls.
#[derive(Builder, Clone, Debug, Default)]
pub struct ViewConfig {
    #[builder(setter(into), default)]
    pub(crate) initial_query: String,
    #[builder(default)]
    pub(crate) initial_sort: SortKey,
}

impl ViewConfig {
    pub fn builder() -> ViewConfigBuilder {
        ViewConfigBuilder::default()
    }
}

#[derive(Builder, Clone, Debug)]
#[builder(pattern = "owned")]
pub struct DashboardConfig {
    pub(crate) source: SourceConfig,
    #[builder(default)]
    pub(crate) view: ViewConfig,
    /// Input poll interval of the view loop
    #[builder(default = "Duration::from_millis(crate::args::DEFAULT_TICK_MS)")]
    pub(crate) tick: Duration,
    /// Logs go here while the terminal is in raw mode
    #[builder(setter(into), default = "PathBuf::from(crate::args::DEFAULT_LOG_FILE)")]
    pub(crate) log_file: PathBuf,
}

impl DashboardConfig {
    pub fn builder() -> DashboardConfigBuilder {
        DashboardConfigBuilder::default()
    }

    pub(crate) fn setup(args: DashboardArgs) -> Result<DashboardConfig> {
        if args.tick_ms == 0 {
            bail!("--tick-ms must be at least 1");
        }

        let (source, view) = setup_view(args.view)?;

        Self::builder()
            .source(source)
            .view(view)
            .tick(Duration::from_millis(args.tick_ms))
            .log_file(args.log_file)
            .build()
            .context("Failed to build dashboard configuration")
    }
}

#[derive(Builder, Clone, Debug)]
#[builder(pattern = "owned")]
pub struct SnapshotConfig {
    pub(crate) source: SourceConfig,
    #[builder(default)]
    pub(crate) view: ViewConfig,
    #[builder(default)]
    pub(crate) format: OutputFormat,
}

impl SnapshotConfig {
    pub fn builder() -> SnapshotConfigBuilder {
        SnapshotConfigBuilder::default()
    }

    pub(crate) fn setup(args: SnapshotArgs) -> Result<SnapshotConfig> {
        let (source, view) = setup_view(args.view)?;

        Self::builder()
            .source(source)
            .view(view)
            .format(args.format)
            .build()
            .context("Failed to build snapshot configuration")
    }

    /// Printed to the `plain` log target, which writes to stderr.
    pub(crate) fn print_config_summary(&self) {
        let check = || style("✔").green().bold();

        let kv = |k: &str, v: String| {
            format!(
                "{} {} {}",
                check(),
                style(k).bold(),
                style(format!("· {}", v)).dim()
            )
        };

        info!(target: "plain", "{}", kv("Market API", self.source.api_url.to_string()));
        info!(target: "plain", "{}", kv("Sort", self.view.initial_sort.to_string()));
        if !self.view.initial_query.is_empty() {
            info!(target: "plain", "{}", kv("Search", format!("\"{}\"", self.view.initial_query)));
        }
    }
}

fn setup_view(args: ViewArgs) -> Result<(SourceConfig, ViewConfig)> {
    // A missing env file is fine; everything has a default
    let _ = dotenvy::from_filename(&args.env_file);

    let api_url = load_api_url(args.api_url).context("Failed to load CoinGecko API URL")?;

    let source = SourceConfig::builder()
        .api_url(api_url)
        .build()
        .context("Failed to build source configuration")?;

    let view = ViewConfig::builder()
        .initial_query(args.search)
        .initial_sort(args.sort)
        .build()
        .context("Failed to build view configuration")?;

    Ok((source, view))
}
