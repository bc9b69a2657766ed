//! Number and sparkline formatting shared by the terminal view and the
//! snapshot printer.

const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Groups the integer part with commas and keeps at most `max_fraction`
/// decimals, trimming trailing zeros. `1234.5` -> `1,234.5`.
pub fn group_thousands(value: f64, max_fraction: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    let sign = if value.is_sign_negative() && !is_zero {
        "-"
    } else {
        ""
    };

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

/// Mean-price card: dollars, at most two decimals.
pub fn usd(value: f64) -> String {
    format!("${}", group_thousands(value, 2))
}

/// Price cell. Sub-dollar assets keep enough decimals to stay readable.
pub fn price(value: f64) -> String {
    let digits = if value.abs() >= 1.0 {
        2
    } else if value.abs() >= 0.01 {
        4
    } else {
        8
    };
    format!("${}", group_thousands(value, digits))
}

/// Signed percentage with two decimals: `+6.20%`, `-7.10%`.
pub fn signed_percent(change: f64) -> String {
    format!("{change:+.2}%")
}

/// 24h change cell; upstream `null` shows as `n/a`.
pub fn change_cell(change: Option<f64>) -> String {
    change.map_or_else(|| "n/a".to_string(), signed_percent)
}

/// Buckets `data` into at most `width` averages, preserving order.
pub fn downsample(data: &[f64], width: usize) -> Vec<f64> {
    if width == 0 || data.is_empty() {
        return Vec::new();
    }
    if data.len() <= width {
        return data.to_vec();
    }

    (0..width)
        .map(|i| {
            let start = i * data.len() / width;
            let end = ((i + 1) * data.len() / width).max(start + 1);
            let bucket = &data[start..end];
            bucket.iter().sum::<f64>() / bucket.len() as f64
        })
        .collect()
}

/// Renders `data` as block characters scaled between its own min and max.
pub fn sparkline(data: &[f64], width: usize) -> String {
    let points = downsample(data, width);

    let min_val = points.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max_val = points.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let range = max_val - min_val;

    points
        .iter()
        .map(|&v| {
            let normalized = if range > 1e-12 {
                (v - min_val) / range
            } else {
                0.5
            };
            let idx = (normalized * (SPARK_CHARS.len() - 1) as f64).round() as usize;
            SPARK_CHARS[idx.min(SPARK_CHARS.len() - 1)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(26500.0, 2), "26,500");
        assert_eq!(group_thousands(1234567.891, 2), "1,234,567.89");
        assert_eq!(group_thousands(999.999, 2), "1,000");
        assert_eq!(group_thousands(100.0, 2), "100");
        assert_eq!(group_thousands(-4321.5, 2), "-4,321.5");
        assert_eq!(group_thousands(-0.001, 2), "0");
    }

    #[test]
    fn usd_of_empty_mean_is_zero_dollars() {
        assert_eq!(usd(0.0), "$0");
        assert_eq!(usd(26500.0), "$26,500");
    }

    #[test]
    fn price_keeps_small_values_readable() {
        assert_eq!(price(50000.0), "$50,000");
        assert_eq!(price(0.5123), "$0.5123");
        assert_eq!(price(0.00001234), "$0.00001234");
    }

    #[test]
    fn percentages_are_signed() {
        assert_eq!(signed_percent(6.2), "+6.20%");
        assert_eq!(signed_percent(-7.1), "-7.10%");
        assert_eq!(signed_percent(0.0), "+0.00%");
        assert_eq!(change_cell(None), "n/a");
    }

    #[test]
    fn downsample_buckets_in_order() {
        let data: Vec<f64> = (0..168).map(f64::from).collect();
        let points = downsample(&data, 12);
        assert_eq!(points.len(), 12);
        assert!(points.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(downsample(&[1.0, 2.0], 12), vec![1.0, 2.0]);
        assert!(downsample(&data, 0).is_empty());
    }

    #[test]
    fn sparkline_spans_min_to_max() {
        let spark = sparkline(&[1.0, 2.0, 3.0, 4.0, 5.0], 16);
        assert_eq!(spark.chars().count(), 5);
        assert!(spark.starts_with('▁'));
        assert!(spark.ends_with('█'));

        let flat = sparkline(&[7.0, 7.0, 7.0], 16);
        assert!(flat.chars().all(|c| c == flat.chars().next().unwrap()));

        assert!(sparkline(&[], 16).is_empty());
    }
}
