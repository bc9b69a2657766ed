use anyhow::{Context, Result};
use cryptopulse::{init_logging, Application, LogSink};
use dialoguer::console::style;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let app = Application::init()?;

    let sink = app.log_sink();
    let _guard = init_logging(&sink).context("initializing logging")?;

    if sink == LogSink::Console {
        print_welcome();
    }

    app.run().await
}

fn print_welcome() {
    let sep = style("◆").yellow().bold();
    let title = style("CryptoPulse Analytics").bold();
    let subtitle = style("Market snapshot from CoinGecko, top 50 by market cap.").dim();

    info!(target: "plain", "\n{sep} {title} {sep}\n{subtitle}\n");
}
