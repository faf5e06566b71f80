use tracing::{debug, trace};

use super::normalize::ProviderDraft;

pub const LOCATION_MARKER: &str = "Detected Location:";
pub const SUMMARY_MARKER: &str = "---SUMMARY---";
pub const SOURCE_MARKER: &str = "---SOURCE:";
const SOURCE_MARKER_END: &str = "---";

/// Values the model sometimes emits instead of a real place name.
const LOCATION_PLACEHOLDERS: &[&str] = &["undefined", "null"];

/// Output of the line scan, before citations are attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    pub detected_location: String,
    pub raw_summary: String,
    pub drafts: Vec<ProviderDraft>,
}

#[derive(Debug)]
enum State {
    Header,
    InProvider(ProviderDraft),
    InSummary(String),
}

#[derive(Debug, Clone, Copy)]
enum Field {
    Condition,
    High,
    Low,
    Rain,
}

const FIELD_PREFIXES: &[(&str, Field)] = &[
    ("condition:", Field::Condition),
    ("high:", Field::High),
    ("low:", Field::Low),
    ("rain:", Field::Rain),
];

/// Scan `text` once, tracking which block is open.
///
/// Never fails: unrecognised lines are skipped and missing data is left for
/// [`ProviderDraft::finalize`] to default.
pub fn classify(text: &str, fallback_location: &str) -> Classified {
    let mut detected_location = fallback_location.to_string();
    let mut drafts = Vec::new();
    let mut state = State::Header;

    for line in text.split('\n') {
        state = match state {
            State::InSummary(mut summary) => {
                summary.push_str(line);
                summary.push('\n');
                State::InSummary(summary)
            }
            open => step(open, line, &mut detected_location, &mut drafts),
        };
    }

    let raw_summary = match state {
        State::Header => String::new(),
        State::InProvider(draft) => {
            drafts.push(draft);
            String::new()
        }
        State::InSummary(summary) => summary,
    };

    debug!(providers = drafts.len(), location = %detected_location, "classified reply");

    Classified { detected_location, raw_summary, drafts }
}

fn step(
    state: State,
    line: &str,
    detected_location: &mut String,
    drafts: &mut Vec<ProviderDraft>,
) -> State {
    let trimmed = line.trim();

    if let Some(rest) = trimmed.strip_prefix(LOCATION_MARKER) {
        let location = rest.trim();
        if is_real_location(location) {
            *detected_location = location.to_string();
        } else {
            debug!(value = location, "ignoring placeholder location");
        }
        return state;
    }

    if trimmed.starts_with(SUMMARY_MARKER) {
        if let State::InProvider(draft) = state {
            drafts.push(draft);
        }
        debug!("entering summary block");
        return State::InSummary(String::new());
    }

    if let Some(rest) = trimmed.strip_prefix(SOURCE_MARKER) {
        if let State::InProvider(draft) = state {
            drafts.push(draft);
        }
        let name = rest.replacen(SOURCE_MARKER_END, "", 1);
        let name = name.trim();
        debug!(source = name, "opening provider block");
        return State::InProvider(ProviderDraft::named(name));
    }

    match state {
        State::InProvider(mut draft) => {
            match split_field(trimmed) {
                Some((Field::Condition, value)) => draft.set_condition(value),
                Some((Field::High, value)) => draft.set_high(value),
                Some((Field::Low, value)) => draft.set_low(value),
                Some((Field::Rain, value)) => draft.set_rain(value),
                None => skip(trimmed),
            }
            State::InProvider(draft)
        }
        other => {
            skip(trimmed);
            other
        }
    }
}

fn skip(line: &str) {
    if !line.is_empty() {
        trace!(line, "skipping unrecognised line");
    }
}

fn is_real_location(value: &str) -> bool {
    !value.is_empty() && !LOCATION_PLACEHOLDERS.contains(&value)
}

/// Match a case-insensitive field prefix and return the trimmed value after it.
///
/// The value stops at the next colon, so `High: 20 (14:00)` yields `20 (14`.
fn split_field(line: &str) -> Option<(Field, &str)> {
    FIELD_PREFIXES.iter().find_map(|(prefix, field)| {
        let head = line.get(..prefix.len())?;
        if !head.eq_ignore_ascii_case(prefix) {
            return None;
        }
        let rest = &line[prefix.len()..];
        let value = rest.split(':').next().unwrap_or(rest);
        Some((*field, value.trim()))
    })
}
