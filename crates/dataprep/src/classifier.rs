//! Document classification
//!
//! Lightweight heuristics for complexity tiering and legal-domain tagging.

use lexforge_common::db::models::Complexity;

/// Keyword lists per legal domain, matched as substrings of the lowercased
/// document text
const DOMAIN_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "employment",
        &[
            "employment",
            "employee",
            "employer",
            "workplace",
            "salary",
            "benefits",
        ],
    ),
    (
        "contracts",
        &["contract", "agreement", "terms", "conditions", "obligations"],
    ),
    (
        "intellectual_property",
        &["copyright", "trademark", "patent", "intellectual property"],
    ),
    (
        "privacy",
        &[
            "privacy",
            "data protection",
            "confidential",
            "personal information",
        ],
    ),
    (
        "liability",
        &["liability", "damages", "negligence", "responsibility"],
    ),
    (
        "real_estate",
        &["property", "real estate", "lease", "rental", "mortgage"],
    ),
    (
        "corporate",
        &["corporation", "company", "business", "shareholders", "board"],
    ),
];

/// Assess document complexity from word count and average sentence length.
///
/// Sentences are period-delimited segments, trailing empties included, so
/// the divisor is never zero.
pub fn assess_complexity(content: &str) -> Complexity {
    let word_count = content.split_whitespace().count();
    let sentence_count = content.split('.').count();
    let avg_sentence_length = word_count as f64 / sentence_count as f64;

    if avg_sentence_length > 25.0 || word_count > 5000 {
        Complexity::High
    } else if avg_sentence_length > 15.0 || word_count > 2000 {
        Complexity::Medium
    } else {
        Complexity::Low
    }
}

/// Tag the legal domains a document touches.
///
/// A domain is tagged when any of its keywords appears in the lowercased
/// text; a document matching nothing gets the "general" tag.
pub fn identify_domains(content: &str) -> Vec<String> {
    let lowered = content.to_lowercase();

    let domains: Vec<String> = DOMAIN_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|(domain, _)| domain.to_string())
        .collect();

    if domains.is_empty() {
        vec!["general".to_string()]
    } else {
        domains
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic_text(words: usize, words_per_sentence: usize) -> String {
        let mut out = String::new();
        let mut in_sentence = 0;
        for i in 0..words {
            out.push_str("word");
            in_sentence += 1;
            if in_sentence == words_per_sentence {
                out.push('.');
                out.push(' ');
                in_sentence = 0;
            } else if i + 1 < words {
                out.push(' ');
            }
        }
        out
    }

    #[test]
    fn test_complexity_high_by_word_count() {
        let text = synthetic_text(6000, 10);
        assert_eq!(assess_complexity(&text), Complexity::High);
    }

    #[test]
    fn test_complexity_high_by_sentence_length() {
        let text = synthetic_text(1000, 50);
        assert_eq!(assess_complexity(&text), Complexity::High);
    }

    #[test]
    fn test_complexity_medium_by_word_count() {
        let text = synthetic_text(3000, 10);
        assert_eq!(assess_complexity(&text), Complexity::Medium);
    }

    #[test]
    fn test_complexity_medium_by_sentence_length() {
        // 1000 words in 20-word sentences: too short for the word-count
        // tier, pushed to medium by the average alone
        let text = synthetic_text(1000, 20);
        assert_eq!(assess_complexity(&text), Complexity::Medium);
    }

    #[test]
    fn test_complexity_low() {
        let text = synthetic_text(100, 10);
        assert_eq!(assess_complexity(&text), Complexity::Low);
    }

    #[test]
    fn test_complexity_empty_content() {
        assert_eq!(assess_complexity(""), Complexity::Low);
    }

    #[test]
    fn test_domains_matched() {
        let domains = identify_domains(
            "This Employment Agreement sets out the salary and benefits of the employee.",
        );
        assert!(domains.contains(&"employment".to_string()));
        assert!(domains.contains(&"contracts".to_string()));
    }

    #[test]
    fn test_domains_fallback_general() {
        assert_eq!(identify_domains("lorem ipsum dolor"), vec!["general"]);
    }

    #[test]
    fn test_domains_idempotent_on_redacted_text() {
        let text = "The lease covers the rental property at [ADDRESS_REDACTED].";
        let first = identify_domains(text);
        let second = identify_domains(text);
        assert_eq!(first, second);
        assert_eq!(first, vec!["real_estate"]);
    }
}
