mod app;
mod args;
mod config;
mod logging;
mod session;
mod state;
mod utils;

pub mod analysis;
pub mod format;
pub mod market;
pub mod ui;

pub use analysis::{project, DashboardView, Signal, SortKey};
pub use app::Application;
pub use config::{DashboardConfig, SnapshotConfig, SourceConfig, ViewConfig};
pub use logging::{init_logging, LogSink};
pub use market::{Asset, CoinGeckoClient, MarketSource};
pub use session::MarketFetch;
pub use state::{DashboardState, LoadPhase};
