use crate::{
    Config, ComparisonResult,
    model::CitationRecord,
    parse,
    dispatch::gemini::GeminiDispatcher,
};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod gemini;

/// A source the query asks the model to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptSource {
    /// Name used in the `---SOURCE:` block marker.
    pub marker: &'static str,
    /// Longer name listed in the instructions.
    pub description: &'static str,
}

/// The eight sources every query asks about, in prompt order.
pub const PROMPT_SOURCES: &[PromptSource] = &[
    PromptSource { marker: "tenki.jp", description: "tenki.jp" },
    PromptSource { marker: "JMA", description: "JMA (Japan Meteorological Agency / 気象庁)" },
    PromptSource { marker: "Weathernews", description: "Weathernews (ウェザーニューズ)" },
    PromptSource { marker: "NHK", description: "NHK Weather (NHK 防災)" },
    PromptSource { marker: "Yahoo", description: "Yahoo! Weather (Yahoo!天気)" },
    PromptSource { marker: "Weather Map", description: "Weather Map (ウェザーマップ)" },
    PromptSource { marker: "goo Weather", description: "goo Weather (goo天気)" },
    PromptSource { marker: "AccuWeather", description: "AccuWeather" },
];

/// What the text-generation service sent back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReply {
    pub text: String,
    pub citations: Vec<CitationRecord>,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Location must not be empty")]
    EmptyLocation,

    #[error("Request to the text-generation service failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Text-generation service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode text-generation response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait QueryDispatcher: Send + Sync + Debug {
    async fn dispatch(&self, prompt: &str, location: &str) -> Result<DispatchReply, DispatchError>;
}

/// Ask `dispatcher` about `location` and parse whatever comes back.
pub async fn fetch_comparison(
    dispatcher: &dyn QueryDispatcher,
    location: &str,
) -> Result<ComparisonResult, DispatchError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(DispatchError::EmptyLocation);
    }

    let prompt = build_prompt(location);
    let reply = dispatcher.dispatch(&prompt, location).await?;

    tracing::info!(
        location,
        chars = reply.text.chars().count(),
        citations = reply.citations.len(),
        "received forecast reply"
    );

    Ok(parse::parse(&reply.text, location, &reply.citations))
}

/// Build the aggregation prompt. The output format section is what
/// [`parse::classify`] recognises, so the two must change together.
pub fn build_prompt(location: &str) -> String {
    let source_list: String = PROMPT_SOURCES
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}\n", i + 1, s.description))
        .collect();

    let blocks: String = PROMPT_SOURCES
        .iter()
        .map(|s| {
            format!(
                "{}{}---\nCondition: [Value]\nHigh: [Value]\nLow: [Value]\nRain: [Value]\n\n",
                parse::classify::SOURCE_MARKER,
                s.marker
            )
        })
        .collect();

    format!(
        r#"Act as a precise Japanese weather data aggregator.

Input Location: "{location}"

CRITICAL STEP 1 (Location Identification):
- If the input "{location}" is a coordinate pair (e.g., "35.689, 139.691"), you MUST first identify the specific Japanese address at the City or Ward level (市区町村).
- Example: "35.689, 139.691" -> "東京都新宿区"
- If it is already a place name, use it as is.
- The "Detected Location" in your output MUST be this specific Japanese City/Ward name, NOT the coordinates.

Task:
Search for the weather forecast for this detected location for TODAY (current date).

You MUST retrieve data from these exact {count} sources:
{source_list}
For EACH source, extract the following data for today:
- Condition: In Japanese (e.g., 晴れ, 曇り, 雨, 雪). Keep it short.
- High Temp: Number only (Celsius). Use "-" if unavailable.
- Low Temp: Number only (Celsius). Use "-" if unavailable.
- Rain Probability: Maximum probability for the rest of the day (Number only). Use "-" if unavailable.

Output Format (Strictly follow this structure, no markdown tables):

{location_marker} [Specific City/Ward Name in Japanese (e.g. 新宿区, 横浜市)]

{blocks}{summary_marker}
[Write a concise summary in Japanese (approx 150-200 chars). Compare the forecasts specifically noting any major disagreements among the {count} sources.]
"#,
        count = PROMPT_SOURCES.len(),
        location_marker = parse::classify::LOCATION_MARKER,
        summary_marker = parse::classify::SUMMARY_MARKER,
    )
}

/// Construct the Gemini dispatcher from config.
pub fn dispatcher_from_config(config: &Config) -> anyhow::Result<GeminiDispatcher> {
    dispatcher_with_key(config, config.resolved_api_key())
}

fn dispatcher_with_key(config: &Config, api_key: Option<String>) -> anyhow::Result<GeminiDispatcher> {
    let api_key = api_key.ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
                 Hint: run `forecast configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let mut dispatcher = GeminiDispatcher::new(api_key, config.model_name())
        .with_timeout(config.timeout())?;
    if let Some(base_url) = &config.base_url {
        dispatcher = dispatcher.with_base_url(base_url);
    }

    Ok(dispatcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IconCategory;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct CannedDispatcher {
        reply: DispatchReply,
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl QueryDispatcher for CannedDispatcher {
        async fn dispatch(&self, prompt: &str, location: &str) -> Result<DispatchReply, DispatchError> {
            self.seen
                .lock()
                .expect("lock")
                .push((prompt.to_string(), location.to_string()));
            Ok(self.reply.clone())
        }
    }

    #[derive(Debug)]
    struct FailingDispatcher;

    #[async_trait]
    impl QueryDispatcher for FailingDispatcher {
        async fn dispatch(&self, _: &str, _: &str) -> Result<DispatchReply, DispatchError> {
            Err(DispatchError::Status { status: 503, body: "unavailable".into() })
        }
    }

    #[test]
    fn prompt_names_every_source_in_parser_format() {
        let prompt = build_prompt("札幌");

        assert!(prompt.contains("Input Location: \"札幌\""));
        assert!(prompt.contains("Detected Location: [Specific City/Ward Name"));
        for source in PROMPT_SOURCES {
            assert!(prompt.contains(&format!("---SOURCE:{}---", source.marker)), "{source:?}");
        }
        assert!(prompt.contains("---SUMMARY---"));
        assert!(prompt.contains("8. AccuWeather"));
    }

    #[test]
    fn prompt_skeleton_parses_into_eight_placeholder_records() {
        let result = parse::parse(&build_prompt("x"), "x", &[]);

        assert_eq!(result.providers.len(), PROMPT_SOURCES.len());
        let names: Vec<_> = result.providers.iter().map(|p| p.source_name.as_str()).collect();
        let markers: Vec<_> = PROMPT_SOURCES.iter().map(|s| s.marker).collect();
        assert_eq!(names, markers);
        assert!(result.providers.iter().all(|p| p.icon_category == IconCategory::Unknown));
        assert!(result.providers.iter().all(|p| p.high_temp == "-"));
    }

    #[tokio::test]
    async fn fetch_comparison_parses_reply() {
        let dispatcher = CannedDispatcher {
            reply: DispatchReply {
                text: "Detected Location: 中央区\n---SOURCE: NHK---\nCondition: 雨\nRain: 80\n---SUMMARY---\n雨です".into(),
                citations: vec![CitationRecord::new("https://www3.nhk.or.jp/x", "NHK")],
            },
            ..Default::default()
        };

        let result = fetch_comparison(&dispatcher, "  銀座 ").await.expect("ok");

        assert_eq!(result.location, "中央区");
        assert_eq!(result.summary, "雨です");
        assert_eq!(result.providers[0].icon_category, IconCategory::Rain);
        assert_eq!(result.providers[0].url.as_deref(), Some("https://www3.nhk.or.jp/x"));

        let seen = dispatcher.seen.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, "銀座");
        assert!(seen[0].0.contains("\"銀座\""));
    }

    #[tokio::test]
    async fn empty_reply_falls_back_to_input_location() {
        let dispatcher = CannedDispatcher::default();

        let result = fetch_comparison(&dispatcher, "福岡").await.expect("ok");

        assert_eq!(result.location, "福岡");
        assert!(result.providers.is_empty());
    }

    #[tokio::test]
    async fn blank_location_is_rejected_before_dispatch() {
        let dispatcher = CannedDispatcher::default();

        let err = fetch_comparison(&dispatcher, "   ").await.unwrap_err();

        assert!(matches!(err, DispatchError::EmptyLocation));
        assert!(dispatcher.seen.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn dispatcher_failure_propagates() {
        let err = fetch_comparison(&FailingDispatcher, "名古屋").await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn dispatcher_errors_when_no_api_key_resolves() {
        let cfg = Config { api_key: None, ..Config::default() };

        let err = dispatcher_with_key(&cfg, None).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn dispatcher_uses_configured_model_and_base_url() {
        let cfg = Config {
            model: Some("gemini-test".into()),
            base_url: Some("http://localhost:9000/".into()),
            ..Config::default()
        };

        let dispatcher = dispatcher_with_key(&cfg, Some("KEY".into())).expect("dispatcher");

        assert_eq!(dispatcher.endpoint(), "http://localhost:9000/models/gemini-test:generateContent");
    }

    #[test]
    fn dispatcher_from_config_works_when_key_set() {
        let cfg = Config { api_key: Some("KEY".into()), ..Config::default() };
        assert!(dispatcher_from_config(&cfg).is_ok());
    }
}
