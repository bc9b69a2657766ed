//! Dashboard palette.

use crate::analysis::Signal;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

pub const BG: Color = Color::Rgb(0x00, 0x00, 0x00);
pub const CARD: Color = Color::Rgb(0x11, 0x11, 0x11);
pub const ACCENT: Color = Color::Rgb(0xFF, 0xB3, 0x00);
pub const GREEN: Color = Color::Rgb(0x00, 0xFF, 0x87);
pub const RED: Color = Color::Rgb(0xFF, 0x4D, 0x4D);
pub const MUTED: Color = Color::Rgb(0x88, 0x88, 0x88);
pub const RANK: Color = Color::Rgb(0x55, 0x55, 0x55);
pub const NEUTRAL_BORDER: Color = Color::Rgb(0x44, 0x44, 0x44);
pub const ROW_RULE: Color = Color::Rgb(0x22, 0x22, 0x22);

/// Gold to orange-red, left to right.
const TITLE_STOPS: [(u8, u8, u8); 3] = [(0xFF, 0xD7, 0x00), (0xFF, 0xA5, 0x00), (0xFF, 0x45, 0x00)];

/// Green for a non-negative change, red otherwise.
pub fn change_color(change: f64) -> Color {
    if change >= 0.0 {
        GREEN
    } else {
        RED
    }
}

pub fn signal_color(signal: Signal) -> Color {
    match signal {
        Signal::Bullish => GREEN,
        Signal::HighRisk => RED,
        Signal::Stable => ACCENT,
    }
}

pub fn signal_style(signal: Signal) -> Style {
    Style::default()
        .fg(signal_color(signal))
        .add_modifier(Modifier::BOLD)
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

fn gradient_at(t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let segments = (TITLE_STOPS.len() - 1) as f64;
    let idx = ((t * segments).floor() as usize).min(TITLE_STOPS.len() - 2);
    let local = t * segments - idx as f64;
    let (r0, g0, b0) = TITLE_STOPS[idx];
    let (r1, g1, b1) = TITLE_STOPS[idx + 1];
    Color::Rgb(lerp(r0, r1, local), lerp(g0, g1, local), lerp(b0, b1, local))
}

/// One span per character, coloured along the title gradient.
pub fn gradient_spans(text: &str) -> Vec<Span<'static>> {
    let n = text.chars().count();
    text.chars()
        .enumerate()
        .map(|(i, ch)| {
            let t = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
            Span::styled(
                ch.to_string(),
                Style::default()
                    .fg(gradient_at(t))
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect()
}
