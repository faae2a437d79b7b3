use serde::Serialize;
use thiserror::Error;

use crate::services::profanity::ProfanityFilter;

/// Which backing translator is active. Real third-party providers live
/// behind the platform's translation proxy and are out of scope here; the
/// mock provider mirrors the dev behavior of skipping real lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslatorProviderType {
    Mock,
    None,
}

#[derive(Debug, Error)]
pub enum TranslatorError {
    #[error("translator not configured: {0}")]
    NotConfigured(&'static str),
}

#[derive(Debug, Clone)]
pub struct TranslationQuery {
    pub word: String,
    pub from_lang: String,
    pub to_lang: String,
    pub context: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationCandidate {
    pub translation: String,
    pub source: String,
    pub likelihood: Option<f64>,
}

#[derive(Debug)]
pub struct TranslationService {
    provider: TranslatorProviderType,
}

impl TranslationService {
    pub fn from_env() -> Self {
        let provider = match std::env::var("TRANSLATOR_PROVIDER").ok().as_deref() {
            Some("mock") => TranslatorProviderType::Mock,
            _ => TranslatorProviderType::None,
        };
        Self { provider }
    }

    pub fn with_provider(provider: TranslatorProviderType) -> Self {
        Self { provider }
    }

    pub fn is_available(&self) -> bool {
        self.provider != TranslatorProviderType::None
    }

    pub fn provider_type(&self) -> TranslatorProviderType {
        self.provider
    }

    /// Ranked candidate translations, best guess first.
    pub fn translate(
        &self,
        query: &TranslationQuery,
        number_of_results: usize,
    ) -> Result<Vec<TranslationCandidate>, TranslatorError> {
        match self.provider {
            TranslatorProviderType::None => {
                Err(TranslatorError::NotConfigured("TRANSLATOR_PROVIDER"))
            }
            TranslatorProviderType::Mock => Ok(mock_candidates(query, number_of_results)),
        }
    }

    pub fn best_guess(
        &self,
        query: &TranslationQuery,
    ) -> Result<TranslationCandidate, TranslatorError> {
        let mut candidates = self.translate(query, 1)?;
        Ok(candidates.remove(0))
    }
}

fn mock_candidates(query: &TranslationQuery, number_of_results: usize) -> Vec<TranslationCandidate> {
    let count = number_of_results.max(1);
    (0..count)
        .map(|rank| {
            let translation = if rank == 0 {
                format!("T-({})-'{}'", query.to_lang, query.word)
            } else {
                format!("T-({})-'{}'-{}", query.to_lang, query.word, rank + 1)
            };
            TranslationCandidate {
                translation,
                source: "MOCK".to_string(),
                likelihood: Some(1.0 - rank as f64 * 0.1),
            }
        })
        .collect()
}

/// Applies the caller's exclusions and the profanity list to a ranked
/// candidate list, preserving rank order.
pub fn filter_candidates(
    candidates: Vec<TranslationCandidate>,
    exclude_results: &[String],
    exclude_services: &[String],
    profanity: &ProfanityFilter,
) -> Vec<TranslationCandidate> {
    candidates
        .into_iter()
        .filter(|candidate| {
            let lowered = candidate.translation.to_lowercase();
            !exclude_results.iter().any(|excluded| excluded.to_lowercase() == lowered)
        })
        .filter(|candidate| {
            !exclude_services
                .iter()
                .any(|service| service.eq_ignore_ascii_case(&candidate.source))
        })
        .filter(|candidate| !profanity.is_bad_word(&candidate.translation))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> TranslationQuery {
        TranslationQuery {
            word: "Haus".into(),
            from_lang: "de".into(),
            to_lang: "en".into(),
            context: "Das Haus ist alt.".into(),
        }
    }

    #[test]
    fn mock_provider_returns_ranked_candidates() {
        let service = TranslationService::with_provider(TranslatorProviderType::Mock);
        let candidates = service.translate(&query(), 3).unwrap();

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].translation, "T-(en)-'Haus'");
        assert_eq!(candidates[1].translation, "T-(en)-'Haus'-2");
        assert!(candidates[0].likelihood > candidates[1].likelihood);
    }

    #[test]
    fn unconfigured_provider_errors() {
        let service = TranslationService::with_provider(TranslatorProviderType::None);
        assert!(!service.is_available());
        assert!(service.best_guess(&query()).is_err());
    }

    #[test]
    fn filters_respect_exclusions_and_order() {
        let candidates = vec![
            TranslationCandidate {
                translation: "house".into(),
                source: "MOCK".into(),
                likelihood: Some(0.9),
            },
            TranslationCandidate {
                translation: "home".into(),
                source: "OTHER".into(),
                likelihood: Some(0.8),
            },
            TranslationCandidate {
                translation: "building".into(),
                source: "MOCK".into(),
                likelihood: Some(0.7),
            },
        ];

        let kept = filter_candidates(
            candidates,
            &["House".to_string()],
            &["other".to_string()],
            &ProfanityFilter::default(),
        );

        let translations: Vec<_> = kept.iter().map(|c| c.translation.as_str()).collect();
        assert_eq!(translations, vec!["building"]);
    }
}
