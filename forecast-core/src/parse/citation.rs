use crate::model::{CitationRecord, ProviderRecord};

/// Associates a provider name with the citations that plausibly came from it.
///
/// A rule applies when the lower-cased provider name contains any of `source_keys`;
/// `matches` then receives the lower-cased uri and title of a citation.
#[derive(Debug, Clone, Copy)]
pub struct CitationRule {
    pub source_keys: &'static [&'static str],
    pub matches: fn(uri: &str, title: &str) -> bool,
}

impl CitationRule {
    fn applies_to(&self, source: &str) -> bool {
        self.source_keys.iter().any(|k| source.contains(k))
    }
}

pub const CITATION_RULES: &[CitationRule] = &[
    CitationRule { source_keys: &["tenki"], matches: |uri, _| uri.contains("tenki.jp") },
    CitationRule { source_keys: &["yahoo"], matches: |uri, _| uri.contains("yahoo") },
    CitationRule {
        source_keys: &["weather", "ウェザー"],
        matches: |uri, _| uri.contains("weathernews"),
    },
    CitationRule {
        source_keys: &["jma", "気象庁"],
        matches: |uri, title| uri.contains("jma.go.jp") || title.contains("気象庁"),
    },
    CitationRule {
        source_keys: &["nhk"],
        matches: |uri, title| uri.contains("nhk.or.jp") || title.contains("nhk"),
    },
    CitationRule {
        source_keys: &["map"],
        matches: |uri, title| uri.contains("weathermap") || title.contains("ウェザーマップ"),
    },
    CitationRule { source_keys: &["goo"], matches: |uri, _| uri.contains("goo") },
    CitationRule { source_keys: &["accu"], matches: |uri, _| uri.contains("accuweather") },
];

/// First citation, in list order, that any applicable rule accepts for `source_name`.
pub fn find_citation<'a>(
    source_name: &str,
    citations: &'a [CitationRecord],
) -> Option<&'a CitationRecord> {
    let source = source_name.to_lowercase();
    let rules: Vec<&CitationRule> =
        CITATION_RULES.iter().filter(|rule| rule.applies_to(&source)).collect();

    if rules.is_empty() {
        return None;
    }

    citations.iter().find(|citation| {
        let uri = citation.uri.to_lowercase();
        let title = citation.title.to_lowercase();
        rules.iter().any(|rule| (rule.matches)(&uri, &title))
    })
}

/// Set `url` on every record that has a matching citation.
pub fn attach_citations(providers: &mut [ProviderRecord], citations: &[CitationRecord]) {
    for provider in providers.iter_mut() {
        match find_citation(&provider.source_name, citations) {
            Some(citation) => {
                tracing::trace!(source = %provider.source_name, uri = %citation.uri, "citation matched");
                provider.url = Some(citation.uri.clone());
            }
            None => {
                tracing::trace!(source = %provider.source_name, "no citation matched");
            }
        }
    }
}
