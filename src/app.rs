use crate::args::{Cli, Command};
use crate::config::{DashboardConfig, SnapshotConfig};
use crate::logging::LogSink;
use crate::ui::{dashboard, snapshot};
use clap::Parser;

pub enum Application {
    Dashboard(DashboardConfig),
    Snapshot(SnapshotConfig),
}

impl Application {
    pub fn init() -> anyhow::Result<Application> {
        // `env` fallbacks of the CLI read from the process environment
        dotenvy::dotenv().ok();
        let cli = Cli::parse();

        let application = match cli.into_command() {
            Command::Dashboard(args) => Application::Dashboard(DashboardConfig::setup(args)?),
            Command::Snapshot(args) => Application::Snapshot(SnapshotConfig::setup(args)?),
        };

        Ok(application)
    }

    /// The dashboard owns the terminal, so it logs to a file.
    pub fn log_sink(&self) -> LogSink {
        match self {
            Self::Dashboard(conf) => LogSink::File(conf.log_file.clone()),
            Self::Snapshot(_) => LogSink::Console,
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        match self {
            Self::Dashboard(conf) => dashboard::run(conf.clone()).await,
            Self::Snapshot(conf) => {
                conf.print_config_summary();
                snapshot::run(conf).await
            }
        }
    }
}
