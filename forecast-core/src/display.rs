//! Canonical display names for the known providers.

/// Checked in order against the lower-cased source name; first hit wins.
pub const PROVIDER_LABELS: &[(&[&str], &str)] = &[
    (&["yahoo"], "Yahoo!天気"),
    (&["tenki"], "tenki.jp"),
    (&["weathernews", "ウェザーニューズ"], "Weathernews"),
    (&["jma", "気象庁"], "気象庁 (JMA)"),
    (&["nhk"], "NHK 防災"),
    (&["map", "マップ"], "Weather Map"),
    (&["goo"], "goo天気"),
    (&["accu"], "AccuWeather"),
];

/// Label to show for `source_name`; names no rule recognises are shown as-is.
pub fn provider_label(source_name: &str) -> &str {
    let lower = source_name.to_lowercase();
    PROVIDER_LABELS
        .iter()
        .find(|(keys, _)| keys.iter().any(|k| lower.contains(k)))
        .map(|(_, label)| *label)
        .unwrap_or(source_name)
}
