//! Session-scoped view state and its transitions.

use crate::analysis::SortKey;
use crate::market::Asset;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// `Loading` is the initial phase; `Loaded` is terminal for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPhase {
    #[default]
    Loading,
    Loaded,
}

/// State owned by the view loop.
///
/// The asset list is written exactly once, by [`DashboardState::apply_fetch`],
/// and is read-only afterwards. Query and sort key change freely.
#[derive(Debug, Clone)]
pub struct DashboardState {
    assets: Arc<[Asset]>,
    phase: LoadPhase,
    query: String,
    sort: SortKey,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            assets: Arc::from(Vec::new()),
            phase: LoadPhase::default(),
            query: String::new(),
            sort: SortKey::default(),
        }
    }
}

impl DashboardState {
    pub fn new(query: impl Into<String>, sort: SortKey) -> Self {
        Self {
            query: query.into(),
            sort,
            ..Self::default()
        }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Settles the fetch. Failures are logged and leave the list empty.
    ///
    /// Returns `false` if the state was already loaded; a second outcome is
    /// dropped.
    pub fn apply_fetch(&mut self, outcome: anyhow::Result<Vec<Asset>>) -> bool {
        if self.phase == LoadPhase::Loaded {
            warn!("Ignoring market fetch outcome: listing already loaded");
            return false;
        }

        match outcome {
            Ok(assets) => {
                info!(count = assets.len(), "Market listing loaded");
                self.assets = assets.into();
            }
            Err(err) => {
                error!("API Error: {err:#}");
            }
        }
        self.phase = LoadPhase::Loaded;
        true
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop_char(&mut self) -> Option<char> {
        self.query.pop()
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    pub fn cycle_sort(&mut self, forward: bool) {
        self.sort = if forward {
            self.sort.next()
        } else {
            self.sort.prev()
        };
    }
}
