use crate::model::{IconCategory, ProviderRecord};

/// Value shown when a provider gave no temperature or rain figure.
pub const MISSING_VALUE: &str = "-";
pub const UNKNOWN_SOURCE: &str = "Unknown";
pub const MISSING_CONDITION: &str = "---";

/// Keyword sets tested in order; the first category with a hit wins.
///
/// Rain sits before cloudy so mixed text such as `雨時々曇り` resolves to rain.
pub const ICON_RULES: &[(IconCategory, &[&str])] = &[
    (IconCategory::Snow, &["snow", "雪"]),
    (IconCategory::Thunder, &["thunder", "lightning", "雷"]),
    (IconCategory::Rain, &["rain", "drizzle", "shower", "雨"]),
    (IconCategory::Cloudy, &["cloud", "overcast", "曇"]),
    (IconCategory::Sunny, &["sun", "clear", "fair", "晴"]),
];

/// A provider block still being filled in by the classifier.
///
/// Empty strings are treated the same as absent fields when finalizing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderDraft {
    pub source_name: Option<String>,
    pub condition: Option<String>,
    pub high_temp: Option<String>,
    pub low_temp: Option<String>,
    pub rain_prob: Option<String>,
    pub icon_category: Option<IconCategory>,
}

impl ProviderDraft {
    pub fn named(source_name: impl Into<String>) -> Self {
        Self { source_name: Some(source_name.into()), ..Self::default() }
    }

    pub fn set_condition(&mut self, raw: &str) {
        self.icon_category = Some(infer_icon(raw));
        self.condition = Some(raw.to_string());
    }

    pub fn set_high(&mut self, raw: &str) {
        self.high_temp = Some(clean_temp(raw));
    }

    pub fn set_low(&mut self, raw: &str) {
        self.low_temp = Some(clean_temp(raw));
    }

    pub fn set_rain(&mut self, raw: &str) {
        self.rain_prob = Some(clean_rain(raw));
    }

    /// Fill every missing field with its fixed default.
    pub fn finalize(self) -> ProviderRecord {
        ProviderRecord {
            source_name: or_default(self.source_name, UNKNOWN_SOURCE),
            condition: or_default(self.condition, MISSING_CONDITION),
            high_temp: or_default(self.high_temp, MISSING_VALUE),
            low_temp: or_default(self.low_temp, MISSING_VALUE),
            rain_prob: or_default(self.rain_prob, MISSING_VALUE),
            url: None,
            icon_category: self.icon_category.unwrap_or_default(),
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_string())
}

fn is_unavailable(raw: &str) -> bool {
    raw.is_empty()
        || raw == MISSING_VALUE
        || raw.eq_ignore_ascii_case("n/a")
        || raw.eq_ignore_ascii_case("null")
}

/// Reduce a temperature to its numeric characters plus a `°` suffix.
pub fn clean_temp(raw: &str) -> String {
    clean_with(raw, |c| c.is_ascii_digit() || c == '.' || c == '-', '°')
}

/// Reduce a rain probability to its digits plus a `%` suffix.
pub fn clean_rain(raw: &str) -> String {
    clean_with(raw, |c| c.is_ascii_digit(), '%')
}

fn clean_with(raw: &str, keep: impl Fn(char) -> bool, suffix: char) -> String {
    if is_unavailable(raw) {
        return MISSING_VALUE.to_string();
    }

    let mut cleaned: String = raw.chars().filter(|c| keep(*c)).collect();
    if cleaned.is_empty() {
        return MISSING_VALUE.to_string();
    }

    cleaned.push(suffix);
    cleaned
}

pub fn infer_icon(condition: &str) -> IconCategory {
    if condition.is_empty() {
        return IconCategory::Unknown;
    }

    let lower = condition.to_lowercase();
    ICON_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(IconCategory::Unknown)
}
