//! Market snapshot model and the source abstraction used to obtain it.

pub(crate) mod client;

pub use client::{CoinGeckoClient, DEFAULT_API_URL, PAGE_SIZE};

use crate::utils::serialization::{
    de_f64_or_zero, de_opt_f64, de_opt_rank, de_prices_skip_null,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One asset as returned by `/coins/markets`.
///
/// Only the fields the dashboard reads are modelled; everything else in the
/// upstream payload is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub symbol: String,
    /// Icon URL
    #[serde(default)]
    pub image: String,
    #[serde(default, deserialize_with = "de_f64_or_zero")]
    pub current_price: f64,
    #[serde(default, deserialize_with = "de_opt_rank")]
    pub market_cap_rank: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_f64")]
    pub price_change_percentage_24h: Option<f64>,
    #[serde(default)]
    pub sparkline_in_7d: Sparkline,
}

impl Asset {
    /// 24h change with upstream `null` read as zero.
    pub fn change_24h(&self) -> f64 {
        self.price_change_percentage_24h.unwrap_or(0.0)
    }

    pub fn sparkline(&self) -> &[f64] {
        &self.sparkline_in_7d.price
    }
}

/// Trailing 7-day price samples, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sparkline {
    #[serde(default, deserialize_with = "de_prices_skip_null")]
    pub price: Vec<f64>,
}

/// Anything that can produce the market listing.
#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn fetch_markets(&self) -> anyhow::Result<Vec<Asset>>;
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::{Asset, Sparkline};

    pub(crate) fn asset(name: &str, price: f64, rank: u32, change: f64) -> Asset {
        Asset {
            id: name.to_ascii_lowercase(),
            name: name.to_string(),
            symbol: name.chars().take(3).collect::<String>().to_ascii_lowercase(),
            image: format!("https://example.invalid/{}.png", name.to_ascii_lowercase()),
            current_price: price,
            market_cap_rank: Some(rank),
            price_change_percentage_24h: Some(change),
            sparkline_in_7d: Sparkline {
                price: vec![price * 0.9, price * 0.95, price],
            },
        }
    }

    /// Bitcoin (+6.2%, bullish) and Ether (-7.1%, high risk).
    pub(crate) fn btc_eth() -> Vec<Asset> {
        let mut btc = asset("Bitcoin", 50000.0, 1, 6.2);
        btc.symbol = "btc".to_string();
        let mut eth = asset("Ether", 3000.0, 2, -7.1);
        eth.symbol = "eth".to_string();
        vec![btc, eth]
    }
}
