use crate::market::DEFAULT_API_URL;
use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::env;

const API_URL_ENV_VAR: &str = "COINGECKO_API_URL";

/// Resolves the CoinGecko base URL.
///
/// Precedence: the CLI flag, then the environment (which may have been filled
/// from the env file after argument parsing), then the public endpoint.
pub(crate) fn load_api_url(flag: Option<String>) -> Result<Url> {
    let raw = flag
        .or_else(|| env::var(API_URL_ENV_VAR).ok())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    validate_api_url(&raw)
}

pub(crate) fn validate_api_url(input: &str) -> Result<Url> {
    let s = input.trim();

    let url = Url::parse(s).with_context(|| format!("Invalid CoinGecko API URL: {s}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("CoinGecko API URL must use http:// or https://, got {}", url.scheme());
    }
    if url.query().is_some() || url.fragment().is_some() {
        bail!("Provide only the API base (e.g. {DEFAULT_API_URL}), without query or fragment.");
    }

    Ok(url)
}
