//! Interactive dashboard: one fetch, then redraws driven by key input.

use crate::analysis::project;
use crate::config::{DashboardConfig, ViewConfig};
use crate::market::{CoinGeckoClient, MarketSource};
use crate::session::MarketFetch;
use crate::state::DashboardState;
use crate::ui::events::EventReader;
use crate::ui::input::{map_key, Action};
use crate::ui::render::{self, Viewport};
use crate::ui::terminal::TerminalGuard;
use anyhow::{Context, Result};
use crossterm::event::Event;
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

pub async fn run(config: DashboardConfig) -> Result<()> {
    let client =
        CoinGeckoClient::new(&config.source.api_url).context("Failed to build CoinGecko client")?;
    debug!(url = %client.url(), "Market listing endpoint");
    let source: Arc<dyn MarketSource> = Arc::new(client);

    let mut guard = TerminalGuard::enter()?;
    let (reader, events) = EventReader::spawn(config.tick);

    let result = run_loop(guard.terminal(), events, source, &config.view, config.tick).await;

    drop(reader);
    drop(guard);

    let state = result?;
    info!(
        phase = ?state.phase(),
        assets = state.assets().len(),
        "Dashboard closed"
    );
    Ok(())
}

/// Drives the view until the user quits or the event stream ends.
///
/// The fetch is owned by the loop, so leaving it cancels a request still in
/// flight.
pub(crate) async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    mut events: UnboundedReceiver<Event>,
    source: Arc<dyn MarketSource>,
    view_config: &ViewConfig,
    tick: Duration,
) -> Result<DashboardState> {
    let mut state = DashboardState::new(view_config.initial_query.clone(), view_config.initial_sort);
    let mut viewport = Viewport::default();
    let mut fetch = MarketFetch::spawn(source);

    loop {
        if let Some(outcome) = fetch.try_take() {
            state.apply_fetch(outcome);
        }

        let rows = {
            let view = project(&state);
            terminal
                .draw(|frame| render::draw(frame, &view, &mut viewport))
                .context("Failed to draw dashboard")?;
            view.rows.len()
        };

        let event = tokio::select! {
            ev = events.recv() => match ev {
                Some(ev) => ev,
                None => {
                    debug!("Event stream closed");
                    break;
                }
            },
            _ = tokio::time::sleep(tick) => continue,
        };

        let Event::Key(key) = event else {
            continue;
        };
        let Some(action) = map_key(key) else {
            continue;
        };
        if !apply_action(action, &mut state, &mut viewport, rows) {
            break;
        }
    }

    drop(fetch);
    Ok(state)
}

/// Returns `false` once the dashboard should close.
fn apply_action(
    action: Action,
    state: &mut DashboardState,
    viewport: &mut Viewport,
    rows: usize,
) -> bool {
    match action {
        Action::Quit => return false,
        Action::Back if viewport.detail => viewport.detail = false,
        Action::Back => return false,
        Action::Type(c) => state.push_char(c),
        Action::Backspace => {
            state.pop_char();
        }
        Action::ClearQuery => state.clear_query(),
        Action::SortNext => state.cycle_sort(true),
        Action::SortPrev => state.cycle_sort(false),
        Action::SortBy(key) => state.set_sort(key),
        Action::Scroll(delta) => viewport.scroll(delta, rows),
        Action::ToggleDetail => {
            if viewport.table.selected().is_none() {
                viewport.scroll(0, rows);
            }
            viewport.detail = !viewport.detail && viewport.table.selected().is_some();
        }
    }
    true
}
