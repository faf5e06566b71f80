use serde::{Deserialize, Serialize};

/// Closed set of condition classes used to pick a display glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconCategory {
    Sunny,
    Cloudy,
    Rain,
    Snow,
    Thunder,
    #[default]
    Unknown,
}

impl IconCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconCategory::Sunny => "sunny",
            IconCategory::Cloudy => "cloudy",
            IconCategory::Rain => "rain",
            IconCategory::Snow => "snow",
            IconCategory::Thunder => "thunder",
            IconCategory::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for IconCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A web source consulted by the search step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRecord {
    pub uri: String,
    pub title: String,
}

impl CitationRecord {
    pub fn new(uri: impl Into<String>, title: impl Into<String>) -> Self {
        Self { uri: uri.into(), title: title.into() }
    }
}

/// One provider's forecast for the day.
///
/// Temperatures and rain probability are display strings (`"18°"`, `"40%"`),
/// with `"-"` meaning the provider had no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRecord {
    pub source_name: String,
    pub condition: String,
    pub high_temp: String,
    pub low_temp: String,
    pub rain_prob: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub icon_category: IconCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub location: String,
    /// Human-readable date label, e.g. `10月19日月曜日`.
    pub date: String,
    pub summary: String,
    pub providers: Vec<ProviderRecord>,
    pub citations: Vec<CitationRecord>,
}
