//! CoinGecko `/coins/markets` client.

use super::{Asset, MarketSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Instant;
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Fixed listing size; the dashboard never pages.
pub const PAGE_SIZE: usize = 50;

const MARKETS_ROUTE: &str = "coins/markets";

/// Fetches the top assets by market cap, priced in USD, with 7-day sparklines.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    markets_url: Url,
}

impl CoinGeckoClient {
    pub fn new(api_url: &Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("cryptopulse/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            markets_url: Self::markets_url(api_url)?,
        })
    }

    /// Joins the markets route onto `api_url` and sets the listing query.
    fn markets_url(api_url: &Url) -> Result<Url> {
        // `Url::join` drops the last path segment unless the base ends in '/'
        let mut base = api_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut url = base
            .join(MARKETS_ROUTE)
            .with_context(|| format!("Invalid markets URL under {api_url}"))?;

        url.query_pairs_mut()
            .append_pair("vs_currency", "usd")
            .append_pair("order", "market_cap_desc")
            .append_pair("per_page", &PAGE_SIZE.to_string())
            .append_pair("page", "1")
            .append_pair("sparkline", "true");

        Ok(url)
    }

    pub fn url(&self) -> &Url {
        &self.markets_url
    }
}

#[async_trait]
impl MarketSource for CoinGeckoClient {
    async fn fetch_markets(&self) -> Result<Vec<Asset>> {
        let start = Instant::now();

        let resp = self
            .client
            .get(self.markets_url.clone())
            .header("accept", "application/json")
            .send()
            .await
            .context("CoinGecko request failed")?
            .error_for_status()
            .context("Non-success status from CoinGecko")?;

        let bytes = resp
            .bytes()
            .await
            .context("Failed to read CoinGecko response body")?;

        // The API returns a JSON array at the top level
        let assets: Vec<Asset> = serde_json::from_slice(&bytes)
            .context("Failed to parse CoinGecko response as Vec<Asset>")?;

        debug!(
            bytes = bytes.len(),
            assets = assets.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "coins/markets fetched"
        );

        Ok(assets)
    }
}
