//! Dataset metrics aggregation
//!
//! Pure computation over the full document and pair sets; persistence is
//! the caller's concern. Every ratio is zero-guarded so an empty dataset
//! aggregates to zeros rather than an error.

use std::collections::BTreeMap;

use chrono::Utc;
use lexforge_common::db::models::{
    DatasetMetricsActiveModel, LegalDocument, PromptResponsePair,
};
use sea_orm::Set;
use uuid::Uuid;

const DATA_VERSION: &str = "1.0";

/// A computed snapshot of the current dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSnapshot {
    pub total_documents: usize,
    pub total_pairs: usize,
    pub verified_pairs: usize,
    pub type_distribution: BTreeMap<String, u64>,
    pub quality_distribution: BTreeMap<String, u64>,
    pub language_distribution: BTreeMap<String, u64>,
    pub domain_distribution: BTreeMap<String, u64>,
    pub average_prompt_length: f64,
    pub average_response_length: f64,
    pub average_quality_score: f64,
    /// Share of verified pairs, as a percentage
    pub verification_rate: f64,
}

impl DatasetSnapshot {
    /// Compute a snapshot from the full document and pair sets
    pub fn compute(documents: &[LegalDocument], pairs: &[PromptResponsePair]) -> Self {
        let total_documents = documents.len();
        let total_pairs = pairs.len();
        let verified_pairs = pairs.iter().filter(|p| p.is_verified).count();

        let mut type_distribution: BTreeMap<String, u64> = BTreeMap::new();
        let mut quality_distribution: BTreeMap<String, u64> = BTreeMap::new();
        for pair in pairs {
            *type_distribution.entry(pair.pair_type.clone()).or_insert(0) += 1;
            // Quality buckets keyed by the score's string form
            *quality_distribution
                .entry(pair.quality_score.to_string())
                .or_insert(0) += 1;
        }

        let mut language_distribution: BTreeMap<String, u64> = BTreeMap::new();
        let mut domain_distribution: BTreeMap<String, u64> = BTreeMap::new();
        for doc in documents {
            *language_distribution.entry(doc.language.clone()).or_insert(0) += 1;
            for domain in doc.domain_tags() {
                *domain_distribution.entry(domain).or_insert(0) += 1;
            }
        }

        let (average_prompt_length, average_response_length, average_quality_score) =
            if total_pairs > 0 {
                let n = total_pairs as f64;
                let prompt_sum: usize = pairs.iter().map(|p| p.prompt.chars().count()).sum();
                let response_sum: usize = pairs.iter().map(|p| p.response.chars().count()).sum();
                let quality_sum: i64 = pairs.iter().map(|p| p.quality_score as i64).sum();
                (
                    prompt_sum as f64 / n,
                    response_sum as f64 / n,
                    quality_sum as f64 / n,
                )
            } else {
                (0.0, 0.0, 0.0)
            };

        let verification_rate = if total_pairs > 0 {
            verified_pairs as f64 / total_pairs as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_documents,
            total_pairs,
            verified_pairs,
            type_distribution,
            quality_distribution,
            language_distribution,
            domain_distribution,
            average_prompt_length,
            average_response_length,
            average_quality_score,
            verification_rate,
        }
    }

    /// Convert to an insertable row
    pub fn into_active_model(self) -> DatasetMetricsActiveModel {
        DatasetMetricsActiveModel {
            id: Set(Uuid::new_v4()),
            total_documents: Set(self.total_documents as i32),
            total_pairs: Set(self.total_pairs as i32),
            verified_pairs: Set(self.verified_pairs as i32),
            type_distribution: Set(serde_json::json!(self.type_distribution)),
            quality_distribution: Set(serde_json::json!(self.quality_distribution)),
            language_distribution: Set(serde_json::json!(self.language_distribution)),
            domain_distribution: Set(serde_json::json!(self.domain_distribution)),
            average_prompt_length: Set(self.average_prompt_length),
            average_response_length: Set(self.average_response_length),
            average_quality_score: Set(self.average_quality_score),
            verification_rate: Set(self.verification_rate),
            data_version: Set(DATA_VERSION.to_string()),
            created_at: Set(Utc::now().into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(pair_type: &str, quality: i32, verified: bool) -> PromptResponsePair {
        let now = Utc::now();
        PromptResponsePair {
            id: Uuid::new_v4(),
            prompt: "What governs this agreement?".to_string(),
            response: "The agreement is governed by...".to_string(),
            pair_type: pair_type.to_string(),
            source_document_id: Uuid::new_v4(),
            source_document_title: None,
            quality_score: quality,
            is_verified: verified,
            reviewed_by: None,
            tags: serde_json::json!([]),
            difficulty: Some("medium".to_string()),
            domain: Some("contracts".to_string()),
            used_in_training: false,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn document(language: &str, domains: &[&str]) -> LegalDocument {
        let now = Utc::now();
        LegalDocument {
            id: Uuid::new_v4(),
            title: "doc".to_string(),
            content: "content".to_string(),
            document_type: "contract".to_string(),
            jurisdiction: "US".to_string(),
            source: None,
            word_count: 1,
            complexity: "low".to_string(),
            domains: serde_json::json!(domains),
            language: language.to_string(),
            is_processed: true,
            is_anonymized: true,
            processing_notes: None,
            document_date: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn test_quality_distribution_and_average() {
        let pairs = vec![
            pair("qa", 1, false),
            pair("qa", 3, false),
            pair("qa", 3, false),
            pair("qa", 5, false),
        ];
        let snapshot = DatasetSnapshot::compute(&[], &pairs);

        assert_eq!(snapshot.average_quality_score, 3.0);
        assert_eq!(snapshot.quality_distribution.get("1"), Some(&1));
        assert_eq!(snapshot.quality_distribution.get("3"), Some(&2));
        assert_eq!(snapshot.quality_distribution.get("5"), Some(&1));
    }

    #[test]
    fn test_verification_rate_percentage() {
        let pairs = vec![
            pair("qa", 4, true),
            pair("qa", 4, false),
            pair("summarization", 4, false),
            pair("summarization", 4, false),
        ];
        let snapshot = DatasetSnapshot::compute(&[], &pairs);

        assert_eq!(snapshot.verified_pairs, 1);
        assert_eq!(snapshot.verification_rate, 25.0);
        assert_eq!(snapshot.type_distribution.get("qa"), Some(&2));
        assert_eq!(snapshot.type_distribution.get("summarization"), Some(&2));
    }

    #[test]
    fn test_empty_dataset_is_all_zeros() {
        let snapshot = DatasetSnapshot::compute(&[], &[]);
        assert_eq!(snapshot.total_documents, 0);
        assert_eq!(snapshot.total_pairs, 0);
        assert_eq!(snapshot.average_quality_score, 0.0);
        assert_eq!(snapshot.average_prompt_length, 0.0);
        assert_eq!(snapshot.verification_rate, 0.0);
        assert!(snapshot.type_distribution.is_empty());
    }

    #[test]
    fn test_domain_and_language_distribution() {
        let docs = vec![
            document("en", &["employment", "contracts"]),
            document("en", &["contracts"]),
            document("de", &[]),
        ];
        let snapshot = DatasetSnapshot::compute(&docs, &[]);

        assert_eq!(snapshot.language_distribution.get("en"), Some(&2));
        assert_eq!(snapshot.language_distribution.get("de"), Some(&1));
        assert_eq!(snapshot.domain_distribution.get("contracts"), Some(&2));
        assert_eq!(snapshot.domain_distribution.get("employment"), Some(&1));
    }
}
