//! Derived views over the held asset list.
//!
//! Everything here is a pure function of its inputs and is recomputed on
//! every render; nothing is cached and the source slice is never reordered.

use crate::market::{Asset, PAGE_SIZE};
use crate::state::{DashboardState, LoadPhase};
use serde::Serialize;
use std::cmp::Ordering;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

/// Change above which an asset reads as bullish (exclusive).
pub const BULLISH_THRESHOLD: f64 = 5.0;
/// Change below which an asset reads as high risk (exclusive).
pub const HIGH_RISK_THRESHOLD: f64 = -5.0;

/// Ordering applied to the table. Only selectable through the sort control.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Ascending market-cap rank
    #[default]
    #[strum(serialize = "Sort by Rank")]
    Rank,
    /// Descending current price
    #[strum(serialize = "Sort by Price")]
    Price,
    /// Descending 24h change
    #[strum(serialize = "Sort by Growth")]
    Change24h,
}

impl SortKey {
    pub fn next(self) -> Self {
        Self::iter()
            .cycle()
            .skip_while(|k| *k != self)
            .nth(1)
            .unwrap_or_default()
    }

    pub fn prev(self) -> Self {
        Self::iter()
            .rev()
            .cycle()
            .skip_while(|k| *k != self)
            .nth(1)
            .unwrap_or_default()
    }
}

/// Categorical read of a 24h change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
pub enum Signal {
    #[serde(rename = "BULLISH")]
    #[strum(serialize = "BULLISH")]
    Bullish,
    #[serde(rename = "HIGH RISK")]
    #[strum(serialize = "HIGH RISK")]
    HighRisk,
    #[serde(rename = "STABLE")]
    #[strum(serialize = "STABLE")]
    Stable,
}

pub fn signal(change: f64) -> Signal {
    if change > BULLISH_THRESHOLD {
        Signal::Bullish
    } else if change < HIGH_RISK_THRESHOLD {
        Signal::HighRisk
    } else {
        Signal::Stable
    }
}

/// Arithmetic mean of `current_price`; `0.0` for an empty list.
pub fn mean_price(assets: &[Asset]) -> f64 {
    if assets.is_empty() {
        return 0.0;
    }
    assets.iter().map(|a| a.current_price).sum::<f64>() / assets.len() as f64
}

/// A missing rank reads as 0, so unranked assets lead in rank order.
fn rank_key(asset: &Asset) -> u32 {
    asset.market_cap_rank.unwrap_or(0)
}

/// The asset with the largest 24h change.
///
/// Ties go to the lower market-cap rank, then to the earlier list position.
pub fn top_gainer(assets: &[Asset]) -> Option<&Asset> {
    assets
        .iter()
        .enumerate()
        .max_by(|(ia, a), (ib, b)| {
            a.change_24h()
                .total_cmp(&b.change_24h())
                .then_with(|| rank_key(b).cmp(&rank_key(a)))
                .then_with(|| ib.cmp(ia))
        })
        .map(|(_, asset)| asset)
}

fn compare(key: SortKey, a: &Asset, b: &Asset) -> Ordering {
    match key {
        SortKey::Rank => rank_key(a).cmp(&rank_key(b)),
        SortKey::Price => b.current_price.total_cmp(&a.current_price),
        SortKey::Change24h => b.change_24h().total_cmp(&a.change_24h()),
    }
}

/// A freshly ordered projection of `assets`. The sort is stable.
pub fn sorted_view(assets: &[Asset], key: SortKey) -> Vec<&Asset> {
    let mut view: Vec<&Asset> = assets.iter().collect();
    view.sort_by(|a, b| compare(key, a, b));
    view
}

/// Case-insensitive substring match on the display name.
pub fn search_filter<'a>(view: &[&'a Asset], query: &str) -> Vec<&'a Asset> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return view.to_vec();
    }
    view.iter()
        .copied()
        .filter(|a| a.name.to_lowercase().contains(&needle))
        .collect()
}

/// Summary of the top-gainer stat card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GainerSummary<'a> {
    pub name: &'a str,
    pub change_24h: f64,
}

/// One table row, ready to draw.
#[derive(Debug, Clone, Serialize)]
pub struct RowView<'a> {
    #[serde(flatten)]
    pub asset: &'a Asset,
    pub signal: Signal,
}

/// Everything the presentation layer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<'a> {
    pub phase: LoadPhase,
    pub mean_price: f64,
    pub top_gainer: Option<GainerSummary<'a>>,
    /// Static label of the third stat card
    pub live_assets: usize,
    pub query: &'a str,
    pub sort: SortKey,
    pub rows: Vec<RowView<'a>>,
}

/// Projects the session state into a render-ready view.
pub fn project(state: &DashboardState) -> DashboardView<'_> {
    let assets = state.assets();

    let sorted = sorted_view(assets, state.sort());
    let rows = search_filter(&sorted, state.query())
        .into_iter()
        .map(|asset| RowView {
            asset,
            signal: signal(asset.change_24h()),
        })
        .collect();

    DashboardView {
        phase: state.phase(),
        mean_price: mean_price(assets),
        top_gainer: top_gainer(assets).map(|a| GainerSummary {
            name: &a.name,
            change_24h: a.change_24h(),
        }),
        live_assets: PAGE_SIZE,
        query: state.query(),
        sort: state.sort(),
        rows,
    }
}
