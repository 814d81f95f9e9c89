//! Sensitive data redaction
//!
//! Pattern-based redaction of PII in legal documents. Patterns apply in a
//! fixed order; the PII patterns match case-insensitively, the two name
//! patterns are case-sensitive because they key off capitalization.

use std::collections::BTreeMap;

use regex_lite::Regex;

struct RedactionPattern {
    regex: Regex,
    replacement: &'static str,
    category: &'static str,
}

/// Outcome of a redaction pass
#[derive(Debug, Clone)]
pub struct RedactionOutcome {
    pub text: String,
    /// Replacement counts per category
    pub counts: BTreeMap<&'static str, usize>,
}

impl RedactionOutcome {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Redacts sensitive information from document text
pub struct Redactor {
    patterns: Vec<RedactionPattern>,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}

impl Redactor {
    pub fn new() -> Self {
        let specs: [(&str, &'static str, &'static str); 7] = [
            (r"(?i)\b\d{3}-\d{2}-\d{4}\b", "[SSN_REDACTED]", "ssn"),
            (
                r"(?i)\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
                "[EMAIL_REDACTED]",
                "email",
            ),
            (
                r"(?i)\b\d{3}[-.]?\d{3}[-.]?\d{4}\b",
                "[PHONE_REDACTED]",
                "phone",
            ),
            (
                r"(?i)\b\d{1,5}\s+[A-Za-z\s]+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Place|Pl)\b",
                "[ADDRESS_REDACTED]",
                "address",
            ),
            (r"(?i)\$[\d,]+(?:\.\d{2})?", "[AMOUNT_REDACTED]", "amount"),
            // Name patterns stay case-sensitive
            (r"\b[A-Z][a-z]+ [A-Z][a-z]+\b", "[NAME_REDACTED]", "name"),
            (
                r"\b(?:Mr\.|Mrs\.|Ms\.|Dr\.)\s+[A-Z][a-z]+\b",
                "[NAME_REDACTED]",
                "name",
            ),
        ];

        let patterns = specs
            .into_iter()
            .map(|(pattern, replacement, category)| RedactionPattern {
                regex: Regex::new(pattern).expect("static redaction pattern"),
                replacement,
                category,
            })
            .collect();

        Self { patterns }
    }

    /// Redact all sensitive spans, returning the cleaned text and the
    /// per-category replacement counts
    pub fn redact(&self, content: &str) -> RedactionOutcome {
        let mut text = content.to_string();
        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();

        for pattern in &self.patterns {
            let matched = pattern.regex.find_iter(&text).count();
            if matched > 0 {
                text = pattern
                    .regex
                    .replace_all(&text, pattern.replacement)
                    .into_owned();
                *counts.entry(pattern.category).or_insert(0) += matched;
            }
        }

        RedactionOutcome { text, counts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssn_redacted() {
        let redactor = Redactor::new();
        let out = redactor.redact("Employee SSN: 123-45-6789 on file.");
        assert!(out.text.contains("[SSN_REDACTED]"));
        assert!(!out.text.contains("123-45-6789"));
        assert_eq!(out.counts.get("ssn"), Some(&1));
    }

    #[test]
    fn test_email_redacted() {
        let redactor = Redactor::new();
        let out = redactor.redact("contact counsel at legal@example.com promptly");
        assert!(out.text.contains("[EMAIL_REDACTED]"));
        assert!(!out.text.contains("legal@example.com"));
    }

    #[test]
    fn test_phone_redacted() {
        let redactor = Redactor::new();
        for sample in ["555-123-4567", "555.123.4567", "5551234567"] {
            let out = redactor.redact(&format!("call {} anytime", sample));
            assert!(out.text.contains("[PHONE_REDACTED]"), "missed {}", sample);
        }
    }

    #[test]
    fn test_address_redacted() {
        let redactor = Redactor::new();
        let out = redactor.redact("premises located at 742 Evergreen Terrace Street thereafter");
        assert!(out.text.contains("[ADDRESS_REDACTED]"));
    }

    #[test]
    fn test_amount_redacted() {
        let redactor = Redactor::new();
        let out = redactor.redact("a penalty of $1,250,000.00 shall apply, plus $500");
        assert!(!out.text.contains("$1,250,000.00"));
        assert!(!out.text.contains("$500"));
        assert_eq!(out.counts.get("amount"), Some(&2));
    }

    #[test]
    fn test_names_redacted_case_sensitive() {
        let redactor = Redactor::new();
        let out = redactor.redact("between John Smith and the company");
        assert!(out.text.contains("[NAME_REDACTED]"));

        // lowercase words are not names
        let out = redactor.redact("the quick brown fox");
        assert_eq!(out.counts.get("name"), None);
        assert_eq!(out.text, "the quick brown fox");
    }

    #[test]
    fn test_titled_name_redacted() {
        let redactor = Redactor::new();
        let out = redactor.redact("as witnessed by Dr. Jones on the date above");
        assert!(out.text.contains("[NAME_REDACTED]"));
        assert!(!out.text.contains("Jones"));
    }

    #[test]
    fn test_clean_text_unchanged() {
        let redactor = Redactor::new();
        let input = "the parties agree to the terms stated herein";
        let out = redactor.redact(input);
        assert_eq!(out.text, input);
        assert_eq!(out.total(), 0);
    }
}
