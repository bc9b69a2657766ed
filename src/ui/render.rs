//! Frame layout for the interactive dashboard.

use crate::analysis::{DashboardView, RowView, SortKey};
use crate::format;
use crate::state::LoadPhase;
use crate::ui::theme;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, BorderType, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row,
    Table, TableState,
};
use ratatui::Frame;
use strum::IntoEnumIterator;

pub const TITLE: &str = "CryptoPulse Analytics";
pub const TAGLINE: &str = "From Noise to Knowledge – Your Crypto Compass.";
pub const LOADING: &str = "Computing Real-time Data...";
pub const SEARCH_PLACEHOLDER: &str = "Search Asset...";
pub const FOOTER: &str = "CipherScope Intelligence v1.0 | Data Science EDA Project";

const HEADERS: [&str; 6] = [
    "Rank",
    "Asset",
    "Price (USD)",
    "24h Dynamics",
    "Risk Signal",
    "7D Volatility (EDA)",
];

/// Cells used by the inline sparkline.
pub const SPARK_WIDTH: usize = 24;

/// Presentation-only state: selection, scroll and the detail overlay.
#[derive(Debug, Default)]
pub struct Viewport {
    pub table: TableState,
    pub detail: bool,
}

impl Viewport {
    /// Moves the selection by `delta` rows, clamped to `rows`.
    pub fn scroll(&mut self, delta: isize, rows: usize) {
        if rows == 0 {
            self.table.select(None);
            return;
        }
        let next = match self.table.selected() {
            None if delta >= 0 => 0,
            None => rows - 1,
            Some(i) => (i as isize + delta).clamp(0, rows as isize - 1) as usize,
        };
        self.table.select(Some(next));
    }

    /// Keeps the selection valid after the row set changed.
    pub fn clamp(&mut self, rows: usize) {
        match self.table.selected() {
            Some(_) if rows == 0 => {
                self.table.select(None);
                self.detail = false;
            }
            Some(i) if i >= rows => self.table.select(Some(rows - 1)),
            _ => {}
        }
    }
}

pub fn draw(frame: &mut Frame<'_>, view: &DashboardView<'_>, viewport: &mut Viewport) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme::BG)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(4), // Stat cards
            Constraint::Length(3), // Controls
            Constraint::Min(5),    // Table
            Constraint::Length(2), // Footer
        ])
        .split(area);

    draw_title(frame, chunks[0]);
    draw_stats(frame, chunks[1], view);
    draw_controls(frame, chunks[2], view);

    match view.phase {
        LoadPhase::Loading => draw_loading(frame, chunks[3]),
        LoadPhase::Loaded => {
            viewport.clamp(view.rows.len());
            draw_table(frame, chunks[3], view, viewport);
            if viewport.detail {
                if let Some(row) = viewport.table.selected().and_then(|i| view.rows.get(i)) {
                    draw_detail(frame, area, row);
                }
            }
        }
    }

    draw_footer(frame, chunks[4]);
}

fn draw_title(frame: &mut Frame<'_>, area: Rect) {
    let text = vec![
        Line::from(theme::gradient_spans(TITLE)),
        Line::from(Span::styled(TAGLINE, Style::default().fg(theme::GREEN))),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

fn stat_card<'a>(label: &'a str, value: Line<'a>, border: ratatui::style::Color) -> Paragraph<'a> {
    Paragraph::new(vec![
        Line::from(Span::styled(label, Style::default().fg(theme::MUTED))),
        value,
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme::CARD)),
    )
}

fn draw_stats(frame: &mut Frame<'_>, area: Rect, view: &DashboardView<'_>) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mean = Line::from(Span::styled(format::usd(view.mean_price), bold));

    let gainer = match &view.top_gainer {
        Some(g) => Line::from(vec![
            Span::styled(g.name.to_string(), bold),
            Span::styled(
                format!(" ({})", format::signed_percent(g.change_24h)),
                bold.fg(theme::change_color(g.change_24h)),
            ),
        ]),
        None => Line::from(Span::styled("n/a", Style::default().fg(theme::MUTED))),
    };

    let nodes = Line::from(Span::styled(format!("{} Live Assets", view.live_assets), bold));

    frame.render_widget(stat_card("Market Mean Price", mean, theme::ACCENT), cards[0]);
    frame.render_widget(stat_card("🔥 Top Gainer (24h)", gainer, theme::GREEN), cards[1]);
    frame.render_widget(stat_card("Analysis Nodes", nodes, theme::NEUTRAL_BORDER), cards[2]);
}

fn draw_controls(frame: &mut Frame<'_>, area: Rect, view: &DashboardView<'_>) {
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let search = if view.query.is_empty() {
        Line::from(Span::styled(
            SEARCH_PLACEHOLDER,
            Style::default().fg(theme::MUTED),
        ))
    } else {
        Line::from(vec![
            Span::raw(view.query.to_string()),
            Span::styled("▏", Style::default().fg(theme::ACCENT)),
        ])
    };
    frame.render_widget(
        Paragraph::new(search).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme::ACCENT))
                .style(Style::default().bg(theme::CARD)),
        ),
        parts[0],
    );

    let options: Vec<Span> = SortKey::iter()
        .flat_map(|key| {
            let style = if key == view.sort {
                Style::default()
                    .fg(theme::BG)
                    .bg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme::ACCENT)
            };
            [Span::styled(format!(" {key} "), style), Span::raw(" ")]
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(options))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(theme::ACCENT))
                    .title(" Tab ")
                    .style(Style::default().bg(theme::CARD)),
            ),
        parts[1],
    );
}

fn draw_loading(frame: &mut Frame<'_>, area: Rect) {
    let message = Paragraph::new(Line::from(Span::styled(
        LOADING,
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().padding(ratatui::widgets::Padding::top(area.height / 3)));
    frame.render_widget(message, area);
}

fn table_row<'a>(row: &RowView<'a>) -> Row<'a> {
    let asset = row.asset;
    let change = asset.change_24h();
    let trend = theme::change_color(change);

    let name = Line::from(vec![
        Span::styled(
            asset.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}", asset.symbol.to_uppercase()),
            Style::default().fg(theme::MUTED),
        ),
    ]);

    Row::new(vec![
        Cell::from(
            asset
                .market_cap_rank
                .map_or_else(|| "-".to_string(), |r| r.to_string()),
        )
        .style(Style::default().fg(theme::RANK)),
        Cell::from(name),
        Cell::from(format::price(asset.current_price))
            .style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(format::change_cell(asset.price_change_percentage_24h)).style(
            Style::default()
                .fg(trend)
                .add_modifier(Modifier::BOLD),
        ),
        Cell::from(format!("[{}]", row.signal)).style(theme::signal_style(row.signal)),
        Cell::from(format::sparkline(asset.sparkline(), SPARK_WIDTH))
            .style(Style::default().fg(trend)),
    ])
}

fn draw_table(
    frame: &mut Frame<'_>,
    area: Rect,
    view: &DashboardView<'_>,
    viewport: &mut Viewport,
) {
    let header = Row::new(HEADERS).style(
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    );

    let widths = [
        Constraint::Length(5),
        Constraint::Min(18),
        Constraint::Length(16),
        Constraint::Length(13),
        Constraint::Length(12),
        Constraint::Length(SPARK_WIDTH as u16 + 1),
    ];

    let rows: Vec<Row> = view.rows.iter().map(table_row).collect();

    let title = format!(" {} / {} assets ", view.rows.len(), view.live_assets);
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(theme::ACCENT))
                .title(title),
        )
        .row_highlight_style(Style::default().bg(theme::ROW_RULE))
        .highlight_symbol("▶ ")
        .column_spacing(1);

    frame.render_stateful_widget(table, area, &mut viewport.table);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Full-size 7-day chart of the selected asset.
fn draw_detail(frame: &mut Frame<'_>, area: Rect, row: &RowView<'_>) {
    let area = centered_rect(80, 70, area);
    frame.render_widget(Clear, area);

    let asset = row.asset;
    let prices = asset.sparkline();
    let color = theme::change_color(asset.change_24h());
    let title = format!(
        " {} ({}) · 7D · {} ",
        asset.name,
        asset.symbol.to_uppercase(),
        format::change_cell(asset.price_change_percentage_24h)
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title(title)
        .style(Style::default().bg(theme::CARD));

    if prices.len() < 2 {
        frame.render_widget(
            Paragraph::new("  No sparkline data available")
                .style(Style::default().fg(theme::MUTED))
                .block(block),
            area,
        );
        return;
    }

    let data: Vec<(f64, f64)> = prices
        .iter()
        .enumerate()
        .map(|(i, &p)| (i as f64, p))
        .collect();
    let min_y = prices.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_y = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let pad = ((max_y - min_y) * 0.05).max(max_y.abs() * 1e-6);

    let datasets = vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&data)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(theme::MUTED))
                .bounds([0.0, (prices.len() - 1) as f64])
                .labels(vec![Span::raw("7d ago"), Span::raw("now")]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(theme::MUTED))
                .bounds([min_y - pad, max_y + pad])
                .labels(vec![
                    Span::raw(format::price(min_y)),
                    Span::raw(format::price(max_y)),
                ]),
        );

    frame.render_widget(chart, area);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect) {
    let hints = Line::from(Span::styled(
        "type to search · Backspace/Ctrl-U edit · Tab/F1-F3 sort · ↑↓ select · Enter chart · Esc quit",
        Style::default().fg(theme::MUTED),
    ));
    let footer = Line::from(Span::styled(FOOTER, Style::default().fg(theme::NEUTRAL_BORDER)));
    frame.render_widget(
        Paragraph::new(vec![hints, footer]).alignment(Alignment::Center),
        area,
    );
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::analysis::project;
    use crate::market::fixtures::btc_eth;
    use crate::state::DashboardState;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    pub(crate) fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render(state: &DashboardState, viewport: &mut Viewport) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        let view = project(state);
        terminal.draw(|f| draw(f, &view, viewport)).unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn loading_shows_status_message_only() {
        let state = DashboardState::default();
        let text = render(&state, &mut Viewport::default());
        assert!(text.contains(LOADING));
        assert!(text.contains(SEARCH_PLACEHOLDER));
        assert!(!text.contains("Risk Signal"));
    }

    #[test]
    fn loaded_shows_stats_and_rows() {
        let mut state = DashboardState::default();
        state.apply_fetch(Ok(btc_eth()));
        let text = render(&state, &mut Viewport::default());

        assert!(text.contains("$26,500"));
        assert!(text.contains("Bitcoin (+6.20%)"));
        assert!(text.contains("50 Live Assets"));
        assert!(text.contains("Risk Signal"));
        assert!(text.contains("[BULLISH]"));
        assert!(text.contains("[HIGH RISK]"));
        assert!(text.contains("$3,000"));
        assert!(text.contains("-7.10%"));
        assert!(text.contains(FOOTER));
        assert!(!text.contains(LOADING));

        let btc = text.find("[BULLISH]").unwrap();
        let eth = text.find("[HIGH RISK]").unwrap();
        assert!(btc < eth, "default order is by rank");
    }

    #[test]
    fn failed_fetch_renders_empty_table() {
        let mut state = DashboardState::default();
        state.apply_fetch(Err(anyhow::anyhow!("boom")));
        let text = render(&state, &mut Viewport::default());

        assert!(text.contains("$0"));
        assert!(text.contains(" 0 / 50 assets "));
        assert!(text.contains("Risk Signal"));
        assert!(!text.contains("boom"));
    }

    #[test]
    fn detail_overlay_titles_selected_asset() {
        let mut state = DashboardState::default();
        state.apply_fetch(Ok(btc_eth()));
        let mut viewport = Viewport::default();
        viewport.scroll(1, 2);
        viewport.detail = true;

        let text = render(&state, &mut viewport);
        assert!(text.contains("Bitcoin (BTC) · 7D"));
    }

    #[test]
    fn viewport_clamps_to_filtered_rows() {
        let mut viewport = Viewport::default();
        viewport.scroll(1, 5);
        viewport.scroll(10, 5);
        assert_eq!(viewport.table.selected(), Some(4));

        viewport.clamp(2);
        assert_eq!(viewport.table.selected(), Some(1));

        viewport.detail = true;
        viewport.clamp(0);
        assert_eq!(viewport.table.selected(), None);
        assert!(!viewport.detail);

        viewport.scroll(-1, 3);
        assert_eq!(viewport.table.selected(), Some(2));
    }
}
