use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a JSON number, a numeric string, an empty string or `null`.
pub(crate) fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => {
            if s.trim().is_empty() {
                Ok(None)
            } else {
                s.trim().parse::<f64>().ok().map(Some).ok_or_else(|| {
                    de::Error::custom(format!("could not parse f64 from string: {s}"))
                })
            }
        }
        Some(other) => Err(de::Error::custom(format!(
            "expected number or string, got: {other}"
        ))),
    }
}

/// Like [`de_opt_f64`] but collapses a missing price to `0.0`.
pub(crate) fn de_f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    de_opt_f64(deserializer).map(|v| v.unwrap_or(0.0))
}

/// Ranks come back as integers, but `null` for unranked assets and
/// occasionally as floats (`1.0`).
pub(crate) fn de_opt_rank<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = de_opt_f64(deserializer)?;
    match v {
        None => Ok(None),
        Some(r) if r.is_finite() && r >= 0.0 && r.fract() == 0.0 && r <= u32::MAX as f64 => {
            Ok(Some(r as u32))
        }
        Some(r) => Err(de::Error::custom(format!("invalid market cap rank: {r}"))),
    }
}

/// Sparkline samples may contain `null` gaps; they are dropped.
pub(crate) fn de_prices_skip_null<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Vec<Option<f64>>>::deserialize(deserializer)?;
    Ok(v.unwrap_or_default().into_iter().flatten().collect())
}
