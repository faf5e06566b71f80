//! Temperature spread across providers, used to show how far forecasts disagree.

use serde::Serialize;

use crate::model::ProviderRecord;

const NAME_NOISE: &[&str] = &["Weather", "Forecast", "天気", "予報"];
const SHORT_NAME_CHARS: usize = 5;

/// Numeric view of one provider's high/low.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperaturePoint {
    pub name: String,
    pub high: Option<f64>,
    pub low: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureSpread {
    pub points: Vec<TemperaturePoint>,
    /// `(min, max)` over the providers that reported a high.
    pub high_range: Option<(f64, f64)>,
    pub low_range: Option<(f64, f64)>,
}

impl TemperatureSpread {
    pub fn from_providers(providers: &[ProviderRecord]) -> Self {
        let points: Vec<TemperaturePoint> = providers
            .iter()
            .map(|p| TemperaturePoint {
                name: short_name(&p.source_name),
                high: temperature_value(&p.high_temp),
                low: temperature_value(&p.low_temp),
            })
            .collect();

        let high_range = range(points.iter().filter_map(|p| p.high));
        let low_range = range(points.iter().filter_map(|p| p.low));

        Self { points, high_range, low_range }
    }

    /// Widest gap between any two reported highs, in degrees.
    pub fn high_disagreement(&self) -> Option<f64> {
        self.high_range.map(|(min, max)| max - min)
    }

    pub fn low_disagreement(&self) -> Option<f64> {
        self.low_range.map(|(min, max)| max - min)
    }

    /// Lowest and highest temperature across both series.
    pub fn overall_range(&self) -> Option<(f64, f64)> {
        match (self.high_range, self.low_range) {
            (Some(h), Some(l)) => Some((h.0.min(l.0), h.1.max(l.1))),
            (Some(r), None) | (None, Some(r)) => Some(r),
            (None, None) => None,
        }
    }
}

/// Parse a display temperature like `"18°"`; `"-"` and junk yield `None`.
pub fn temperature_value(display: &str) -> Option<f64> {
    display.trim_end_matches('°').parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Provider name without generic words, cut to a few characters for chart labels.
pub fn short_name(source_name: &str) -> String {
    let mut name = source_name.to_string();
    for noise in NAME_NOISE {
        name = name.replace(noise, "");
    }
    name.trim().chars().take(SHORT_NAME_CHARS).collect()
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((min.min(v), max.max(v))),
    })
}
