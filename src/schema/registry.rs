//! # schema::registry
//!
//! Fixed catalogue of the indicators a strategy may reference. Keyed by the
//! lowercase canonical name; lookups ignore ASCII case.

use serde::Serialize;

/// Indicator category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorCategory {
    PriceVolume,
    MovingAverage,
    Momentum,
    Volatility,
    Volume,
}

/// One registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndicatorSpec {
    pub name: &'static str,
    pub category: IndicatorCategory,
    /// `Some` iff the indicator needs `params.period`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_period: Option<u32>,
}

impl IndicatorSpec {
    const fn raw(name: &'static str) -> Self {
        Self { name, category: IndicatorCategory::PriceVolume, default_period: None }
    }

    const fn periodic(name: &'static str, category: IndicatorCategory, period: u32) -> Self {
        Self { name, category, default_period: Some(period) }
    }

    pub fn requires_period(&self) -> bool {
        self.default_period.is_some()
    }
}

/// Indicator substituted when a name is missing or unknown.
pub const FALLBACK_INDICATOR: &str = "close";

use IndicatorCategory::{Momentum, MovingAverage, Volatility, Volume};

static INDICATORS: [IndicatorSpec; 21] = [
    // Price / volume fields
    IndicatorSpec::raw("close"),
    IndicatorSpec::raw("open"),
    IndicatorSpec::raw("high"),
    IndicatorSpec::raw("low"),
    IndicatorSpec::raw("volume"),
    IndicatorSpec::raw("volume_turnover"),
    // Moving averages
    IndicatorSpec::periodic("sma", MovingAverage, 20),
    IndicatorSpec::periodic("ema", MovingAverage, 20),
    IndicatorSpec::periodic("wma", MovingAverage, 20),
    IndicatorSpec::periodic("hma", MovingAverage, 20),
    IndicatorSpec::periodic("vwma", MovingAverage, 20),
    // Momentum
    IndicatorSpec::periodic("rsi", Momentum, 14),
    IndicatorSpec::periodic("macd", Momentum, 12),
    IndicatorSpec::periodic("macd_signal", Momentum, 9),
    IndicatorSpec::periodic("adx", Momentum, 14),
    // Volatility
    IndicatorSpec::periodic("atr", Volatility, 14),
    IndicatorSpec::periodic("atr_ratio", Volatility, 14),
    IndicatorSpec::periodic("bb_high", Volatility, 20),
    IndicatorSpec::periodic("bb_mid", Volatility, 20),
    IndicatorSpec::periodic("bb_low", Volatility, 20),
    // Volume
    IndicatorSpec::periodic("volume_sma", Volume, 20),
];

/// Case-insensitive lookup.
pub fn lookup(name: &str) -> Option<&'static IndicatorSpec> {
    INDICATORS.iter().find(|spec| spec.name.eq_ignore_ascii_case(name))
}

/// Every entry, in catalogue order.
pub fn all() -> &'static [IndicatorSpec] {
    &INDICATORS
}

pub fn names() -> impl Iterator<Item = &'static str> {
    INDICATORS.iter().map(|spec| spec.name)
}

/// `['close', 'open', ...]`, as embedded in error messages and suggestions.
pub fn listing() -> String {
    let quoted: Vec<String> = names().map(|n| format!("'{n}'")).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let rsi = lookup("RSI").expect("rsi is registered");
        assert_eq!(rsi.name, "rsi");
        assert_eq!(rsi.default_period, Some(14));
        assert!(lookup("Volume_SMA").is_some());
        assert!(lookup("nope").is_none());
    }

    #[test]
    fn test_period_flags() {
        assert!(!lookup("close").unwrap().requires_period());
        assert!(!lookup("volume_turnover").unwrap().requires_period());
        assert_eq!(lookup("macd").unwrap().default_period, Some(12));
        assert_eq!(lookup("macd_signal").unwrap().default_period, Some(9));
        assert_eq!(lookup("bb_low").unwrap().default_period, Some(20));
    }

    #[test]
    fn test_names_are_unique_and_lowercase() {
        let mut seen = std::collections::HashSet::new();
        for name in names() {
            assert_eq!(name, name.to_lowercase());
            assert!(seen.insert(name), "duplicate entry {name}");
        }
        assert!(lookup(FALLBACK_INDICATOR).is_some());
    }
}
