//! Turns the model's free-text reply into a [`ComparisonResult`].
//!
//! Parsing happens in two steps: [`classify`] walks the reply line by line and
//! collects provider drafts, then the drafts are finalized with defaults and
//! matched against the citation list. Nothing in here returns an error; bad
//! input only ever produces emptier records.

use chrono::{Datelike, Local, NaiveDate, Weekday};

use crate::model::{CitationRecord, ComparisonResult, ProviderRecord};

pub mod citation;
pub mod classify;
pub mod normalize;

pub use citation::{CITATION_RULES, CitationRule, attach_citations, find_citation};
pub use classify::{Classified, classify};
pub use normalize::{ICON_RULES, ProviderDraft, clean_rain, clean_temp, infer_icon};

/// Parse a reply dated today (local clock).
pub fn parse(text: &str, original_location: &str, citations: &[CitationRecord]) -> ComparisonResult {
    parse_on(text, original_location, citations, Local::now().date_naive())
}

/// Parse a reply for an explicit date.
pub fn parse_on(
    text: &str,
    original_location: &str,
    citations: &[CitationRecord],
    date: NaiveDate,
) -> ComparisonResult {
    let Classified { detected_location, raw_summary, drafts } = classify(text, original_location);

    let mut providers: Vec<ProviderRecord> =
        drafts.into_iter().map(ProviderDraft::finalize).collect();
    attach_citations(&mut providers, citations);

    ComparisonResult {
        location: detected_location,
        date: date_label(date),
        summary: raw_summary.trim().to_string(),
        providers,
        citations: citations.to_vec(),
    }
}

/// Japanese month/day/weekday label, e.g. `10月19日月曜日`.
pub fn date_label(date: NaiveDate) -> String {
    format!("{}月{}日{}", date.month(), date.day(), weekday_ja(date.weekday()))
}

fn weekday_ja(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "月曜日",
        Weekday::Tue => "火曜日",
        Weekday::Wed => "水曜日",
        Weekday::Thu => "木曜日",
        Weekday::Fri => "金曜日",
        Weekday::Sat => "土曜日",
        Weekday::Sun => "日曜日",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IconCategory;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date")
    }

    #[test]
    fn end_to_end_single_block() {
        let text = "---SOURCE: tenki.jp---\nCondition: 晴れ\nHigh: 20\nLow: 10\nRain: 10\n---SUMMARY---\nテスト\n";
        let citations = vec![CitationRecord::new("https://tenki.jp/x", "tenki")];

        let result = parse_on(text, "東京", &citations, day());

        assert_eq!(
            result.providers,
            vec![ProviderRecord {
                source_name: "tenki.jp".into(),
                condition: "晴れ".into(),
                high_temp: "20°".into(),
                low_temp: "10°".into(),
                rain_prob: "10%".into(),
                url: Some("https://tenki.jp/x".into()),
                icon_category: IconCategory::Sunny,
            }]
        );
        assert_eq!(result.summary, "テスト");
        assert_eq!(result.location, "東京");
        assert_eq!(result.citations, citations);
    }

    #[test]
    fn provider_count_follows_block_count() {
        for n in [0usize, 1, 3, 8, 11] {
            let text: String = (0..n)
                .map(|i| format!("---SOURCE: source{i}---\nHigh: {i}\n"))
                .collect();

            let result = parse_on(&text, "x", &[], day());

            assert_eq!(result.providers.len(), n);
            for (i, p) in result.providers.iter().enumerate() {
                assert_eq!(p.source_name, format!("source{i}"));
                assert_eq!(p.high_temp, format!("{i}°"));
            }
        }
    }

    #[test]
    fn empty_reply_is_structurally_valid() {
        let result = parse_on("", "那覇", &[], day());

        assert_eq!(result.location, "那覇");
        assert!(result.providers.is_empty());
        assert_eq!(result.summary, "");
        assert_eq!(result.date, "10月19日月曜日");
    }

    #[test]
    fn unmatched_citations_leave_url_unset() {
        let text = "---SOURCE: tenki.jp---\n---SOURCE: JMA---\n---SOURCE: NHK---\n";
        let citations = vec![CitationRecord::new("https://example.com/a", "Example")];

        let result = parse_on(text, "x", &citations, day());

        assert_eq!(result.providers.len(), 3);
        assert!(result.providers.iter().all(|p| p.url.is_none()));
    }

    #[test]
    fn full_reply_with_eight_sources() {
        let text = "\
Detected Location: 東京都新宿区

---SOURCE: tenki.jp---
Condition: 晴れ
High: 22
Low: 14
Rain: 10

---SOURCE: JMA---
Condition: 晴れ時々曇り
High: 21
Low: 13
Rain: 20

---SOURCE: Weathernews---
Condition: 曇り
High: 21
Low: -
Rain: 30

---SOURCE: NHK---
Condition: 曇り一時雨
High: n/a
Low: 14
Rain: 40%

---SOURCE: Yahoo---
Condition: 晴れ
High: 22℃
Low: 13℃
Rain: 10%

---SOURCE: Weather Map---
Condition: 雷
High: 20
Low: 12
Rain: 50

---SOURCE: goo Weather---
Condition: 雪
High: 3
Low: -2
Rain: null

---SOURCE: AccuWeather---
Condition: Partly sunny
High: 72°F
Low:
Rain: 5

---SUMMARY---
各社とも概ね晴れの予報ですが、
NHKとウェザーマップは雨や雷を予想しています。
";
        let citations = vec![
            CitationRecord::new("https://tenki.jp/forecast/3/16/4410/13104/", "tenki.jp"),
            CitationRecord::new("https://www.jma.go.jp/bosai/forecast/", "気象庁"),
            CitationRecord::new("https://www3.nhk.or.jp/weather/", "NHK"),
            CitationRecord::new("https://weather.yahoo.co.jp/weather/", "Yahoo!天気"),
            CitationRecord::new("https://weathernews.jp/onebox/", "ウェザーニュース"),
        ];

        let result = parse_on(text, "35.689, 139.691", &citations, day());

        assert_eq!(result.location, "東京都新宿区");
        assert_eq!(result.providers.len(), 8);

        let icons: Vec<_> = result.providers.iter().map(|p| p.icon_category).collect();
        assert_eq!(
            icons,
            [
                IconCategory::Sunny,
                IconCategory::Cloudy,
                IconCategory::Cloudy,
                IconCategory::Rain,
                IconCategory::Sunny,
                IconCategory::Thunder,
                IconCategory::Snow,
                IconCategory::Sunny,
            ]
        );

        let nhk = &result.providers[3];
        assert_eq!(nhk.high_temp, "-");
        assert_eq!(nhk.rain_prob, "40%");
        assert_eq!(nhk.url.as_deref(), Some("https://www3.nhk.or.jp/weather/"));

        let goo = &result.providers[6];
        assert_eq!(goo.low_temp, "-2°");
        assert_eq!(goo.rain_prob, "-");

        let accu = &result.providers[7];
        assert_eq!(accu.high_temp, "72°");
        assert_eq!(accu.low_temp, "-");

        // "Weathernews" has no dedicated rule; it matches through the "weather" keyword.
        assert_eq!(result.providers[1].url.as_deref(), Some("https://www.jma.go.jp/bosai/forecast/"));
        assert_eq!(result.providers[2].url.as_deref(), Some("https://weathernews.jp/onebox/"));
        assert_eq!(result.providers[0].url.as_deref(), Some("https://tenki.jp/forecast/3/16/4410/13104/"));

        assert!(result.summary.starts_with("各社とも"));
        assert!(result.summary.ends_with("予想しています。"));
        assert!(result.summary.contains('\n'));
    }

    #[test]
    fn date_label_uses_japanese_weekday() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 4).expect("valid date");
        assert_eq!(date_label(date), "1月4日日曜日");
    }
}
