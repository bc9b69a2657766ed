//! One-shot rendering of the dashboard to stdout.

use crate::analysis::{project, DashboardView, RowView, Signal};
use crate::args::OutputFormat;
use crate::config::{SnapshotConfig, ViewConfig};
use crate::format;
use crate::market::{CoinGeckoClient, MarketSource};
use crate::session::MarketFetch;
use crate::state::{DashboardState, LoadPhase};
use crate::ui::render::{FOOTER, LOADING, SPARK_WIDTH, TAGLINE, TITLE};
use crate::ui::spinner::spin_while;
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use dialoguer::console::{pad_str, style, Alignment, StyledObject};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::debug;

const COLUMNS: [(&str, usize); 6] = [
    ("Rank", 5),
    ("Asset", 26),
    ("Price (USD)", 16),
    ("24h Dynamics", 13),
    ("Risk Signal", 12),
    ("7D Volatility (EDA)", SPARK_WIDTH),
];

#[derive(Serialize)]
struct SnapshotDocument<'a> {
    as_of: String,
    #[serde(flatten)]
    view: &'a DashboardView<'a>,
}

pub async fn run(config: &SnapshotConfig) -> Result<()> {
    let client =
        CoinGeckoClient::new(&config.source.api_url).context("Failed to build CoinGecko client")?;
    debug!(url = %client.url(), "Market listing endpoint");
    let source: Arc<dyn MarketSource> = Arc::new(client);

    let state = load_state(source, &config.view).await;
    let view = project(&state);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_snapshot(&view, Utc::now(), config.format, &mut out)
        .context("Failed to write snapshot to stdout")?;
    out.flush().context("Failed to flush stdout")
}

/// Runs the single fetch and folds its outcome into a fresh state.
pub(crate) async fn load_state(source: Arc<dyn MarketSource>, view: &ViewConfig) -> DashboardState {
    let mut state = DashboardState::new(view.initial_query.clone(), view.initial_sort);
    let fetch = MarketFetch::spawn(source);
    if let Some(outcome) = spin_while("Fetching market data", fetch.wait()).await {
        state.apply_fetch(outcome);
    }
    state
}

pub(crate) fn write_snapshot(
    view: &DashboardView<'_>,
    as_of: DateTime<Utc>,
    output: OutputFormat,
    out: &mut impl Write,
) -> io::Result<()> {
    let as_of = as_of.to_rfc3339_opts(SecondsFormat::Secs, true);
    match output {
        OutputFormat::Text => render_text(view, &as_of, out),
        OutputFormat::Json => {
            let doc = SnapshotDocument { as_of, view };
            serde_json::to_writer_pretty(&mut *out, &doc)?;
            writeln!(out)
        }
    }
}

/// Pads or truncates `text` to exactly `width` columns.
fn cell(text: &str, width: usize) -> String {
    pad_str(text, width, Alignment::Left, Some("…")).into_owned()
}

fn colored(text: String, change: f64) -> StyledObject<String> {
    if change >= 0.0 {
        style(text).green()
    } else {
        style(text).red()
    }
}

fn render_text(view: &DashboardView<'_>, as_of: &str, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", style(TITLE).yellow().bold())?;
    writeln!(out, "{}", style(TAGLINE).green())?;
    writeln!(out, "{}", style(format!("as of {as_of}")).dim())?;
    writeln!(out)?;

    let label = |s: &str| style(cell(s, 20)).dim();
    writeln!(out, "{}{}", label("Market Mean Price"), style(format::usd(view.mean_price)).bold())?;
    match &view.top_gainer {
        Some(g) => writeln!(
            out,
            "{}{} {}",
            label("Top Gainer (24h)"),
            style(g.name).bold(),
            colored(format!("({})", format::signed_percent(g.change_24h)), g.change_24h).bold()
        )?,
        None => writeln!(out, "{}{}", label("Top Gainer (24h)"), style("n/a").dim())?,
    }
    writeln!(
        out,
        "{}{}",
        label("Analysis Nodes"),
        style(format!("{} Live Assets", view.live_assets)).bold()
    )?;
    writeln!(out)?;

    let mut controls = format!("{}", style(view.sort).yellow());
    if !view.query.is_empty() {
        controls.push_str(&format!(" · search \"{}\"", view.query));
    }
    writeln!(out, "{controls}")?;
    writeln!(out)?;

    if view.phase == LoadPhase::Loading {
        writeln!(out, "{}", style(LOADING).yellow().bold())?;
    } else {
        let header: String = COLUMNS
            .iter()
            .map(|(name, width)| cell(name, *width))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{}", style(header.trim_end()).yellow().bold())?;
        for row in &view.rows {
            writeln!(out, "{}", text_row(row))?;
        }
        writeln!(
            out,
            "{}",
            style(format!("{} / {} assets", view.rows.len(), view.live_assets)).dim()
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(FOOTER).dim())
}

fn text_row(row: &RowView<'_>) -> String {
    let asset = row.asset;
    let change = asset.change_24h();

    let rank = asset
        .market_cap_rank
        .map_or_else(|| "-".to_string(), |r| r.to_string());
    let name = format!("{} {}", asset.name, asset.symbol.to_uppercase());
    let signal = style(cell(&format!("[{}]", row.signal), COLUMNS[4].1));
    let signal = match row.signal {
        Signal::Bullish => signal.green(),
        Signal::HighRisk => signal.red(),
        Signal::Stable => signal.yellow(),
    }
    .bold();

    let spark = format::sparkline(asset.sparkline(), SPARK_WIDTH);
    format!(
        "{} {} {} {} {} {}",
        style(cell(&rank, COLUMNS[0].1)).dim(),
        style(cell(&name, COLUMNS[1].1)).bold(),
        cell(&format::price(asset.current_price), COLUMNS[2].1),
        colored(cell(&format::change_cell(asset.price_change_percentage_24h), COLUMNS[3].1), change)
            .bold(),
        signal,
        colored(spark, change),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::SortKey;
    use crate::market::fixtures::btc_eth;
    use crate::market::Asset;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use dialoguer::console::strip_ansi_codes;

    struct Ready;

    #[async_trait]
    impl MarketSource for Ready {
        async fn fetch_markets(&self) -> anyhow::Result<Vec<Asset>> {
            Ok(btc_eth())
        }
    }

    struct Unreachable;

    #[async_trait]
    impl MarketSource for Unreachable {
        async fn fetch_markets(&self) -> anyhow::Result<Vec<Asset>> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap()
    }

    fn render(state: &DashboardState, output: OutputFormat) -> String {
        let mut buf = Vec::new();
        write_snapshot(&project(state), as_of(), output, &mut buf).unwrap();
        strip_ansi_codes(&String::from_utf8(buf).unwrap()).into_owned()
    }

    #[tokio::test]
    async fn text_snapshot_lists_rows_in_sort_order() {
        let view = ViewConfig::builder()
            .initial_sort(SortKey::Price)
            .build()
            .unwrap();
        let state = load_state(Arc::new(Ready), &view).await;
        let text = render(&state, OutputFormat::Text);

        assert!(text.starts_with(TITLE));
        assert!(text.contains("as of 2024-10-01T12:00:00Z"));
        assert!(text.contains("$26,500"));
        assert!(text.contains("Bitcoin (+6.20%)"));
        assert!(text.contains("50 Live Assets"));
        assert!(text.contains("Sort by Price"));
        assert!(text.contains("2 / 50 assets"));
        assert!(text.contains("[HIGH RISK]"));
        assert!(text.trim_end().ends_with(FOOTER));

        let btc = text.find("Bitcoin BTC").unwrap();
        let eth = text.find("Ether ETH").unwrap();
        assert!(btc < eth);
    }

    #[tokio::test]
    async fn failed_fetch_prints_empty_view() {
        let state = load_state(Arc::new(Unreachable), &ViewConfig::default()).await;
        let text = render(&state, OutputFormat::Text);

        assert!(text.contains("$0"));
        assert!(text.contains("n/a"));
        assert!(text.contains("0 / 50 assets"));
        assert!(!text.contains("connection refused"));
    }

    #[tokio::test]
    async fn json_snapshot_carries_view_and_timestamp() {
        let view = ViewConfig::builder().initial_query("bit").build().unwrap();
        let state = load_state(Arc::new(Ready), &view).await;
        let json: serde_json::Value =
            serde_json::from_str(&render(&state, OutputFormat::Json)).unwrap();

        assert_eq!(json["as_of"], "2024-10-01T12:00:00Z");
        assert_eq!(json["phase"], "loaded");
        assert_eq!(json["query"], "bit");
        assert_eq!(json["mean_price"], 26500.0);
        assert_eq!(json["rows"].as_array().unwrap().len(), 1);
        assert_eq!(json["rows"][0]["id"], "bitcoin");
        assert_eq!(json["rows"][0]["signal"], "BULLISH");
    }
}
