//! Training pair synthesis
//!
//! Template-based generation of prompt-response pairs from a processed
//! document. Responses are placeholder completions; quality scores and
//! difficulty follow the pair template, not the document.

use lexforge_common::db::models::{LegalDocument, PairType};

/// A synthesized pair before persistence
#[derive(Debug, Clone)]
pub struct PairDraft {
    pub prompt: String,
    pub response: String,
    pub quality_score: i32,
    pub difficulty: &'static str,
    pub tags: Vec<String>,
}

/// Generate the pair drafts for one document and pair type.
///
/// Risk analysis is an accepted type with no templates yet, so it yields
/// nothing.
pub fn drafts_for(document: &LegalDocument, pair_type: PairType) -> Vec<PairDraft> {
    match pair_type {
        PairType::Summarization => summarization_drafts(document),
        PairType::ClauseExplanation => clause_drafts(document),
        PairType::Qa => qa_drafts(document),
        PairType::RiskAnalysis => Vec::new(),
    }
}

fn summarization_drafts(document: &LegalDocument) -> Vec<PairDraft> {
    let doc_type = &document.document_type;

    vec![
        PairDraft {
            prompt: format!(
                "Provide a comprehensive summary of this {}:\n\n{}...",
                doc_type,
                truncate_chars(&document.content, 1000)
            ),
            response: format!(
                "This {} outlines key legal provisions and obligations...",
                doc_type
            ),
            quality_score: 4,
            difficulty: "medium",
            tags: vec!["summary".to_string(), doc_type.clone()],
        },
        PairDraft {
            prompt: format!(
                "Give me a brief overview of this legal document:\n\n{}...",
                truncate_chars(&document.content, 500)
            ),
            response: "Brief overview: This document establishes...".to_string(),
            quality_score: 3,
            difficulty: "easy",
            tags: vec!["overview".to_string(), doc_type.clone()],
        },
    ]
}

fn clause_drafts(document: &LegalDocument) -> Vec<PairDraft> {
    extract_sample_clauses(&document.content)
        .into_iter()
        .take(3)
        .map(|clause| PairDraft {
            prompt: format!("Explain this legal clause in simple terms:\n\n\"{}\"", clause),
            response: "This clause means that...".to_string(),
            quality_score: 4,
            difficulty: "medium",
            tags: vec![
                "clause_explanation".to_string(),
                document.document_type.clone(),
            ],
        })
        .collect()
}

fn qa_drafts(document: &LegalDocument) -> Vec<PairDraft> {
    let doc_type = &document.document_type;

    vec![
        PairDraft {
            prompt: format!("What is the main purpose of this {}?", doc_type),
            response: format!("The main purpose of this {} is to...", doc_type),
            quality_score: 4,
            difficulty: "easy",
            tags: Vec::new(),
        },
        PairDraft {
            prompt: format!("What are the key obligations in this {}?", doc_type),
            response: "The key obligations include...".to_string(),
            quality_score: 4,
            difficulty: "medium",
            tags: Vec::new(),
        },
        PairDraft {
            prompt: format!("What happens if someone violates this {}?", doc_type),
            response: "If this agreement is violated...".to_string(),
            quality_score: 3,
            difficulty: "hard",
            tags: Vec::new(),
        },
    ]
}

/// Pull candidate clauses out of document text.
///
/// Paragraphs between 10 and 100 words (exclusive) qualify; at most five
/// are returned, in document order.
pub fn extract_sample_clauses(content: &str) -> Vec<String> {
    content
        .split("\n\n")
        .filter(|para| {
            let words = para.split_whitespace().count();
            words > 10 && words < 100
        })
        .map(|para| para.trim().to_string())
        .take(5)
        .collect()
}

/// Truncate to at most `limit` characters without splitting a character
fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_document(content: &str) -> LegalDocument {
        let now = Utc::now();
        LegalDocument {
            id: Uuid::new_v4(),
            title: "Sample Employment Agreement".to_string(),
            content: content.to_string(),
            document_type: "contract".to_string(),
            jurisdiction: "US".to_string(),
            source: None,
            word_count: content.split_whitespace().count() as i32,
            complexity: "medium".to_string(),
            domains: serde_json::json!(["employment"]),
            language: "en".to_string(),
            is_processed: true,
            is_anonymized: true,
            processing_notes: None,
            document_date: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn paragraph(words: usize) -> String {
        vec!["clause"; words].join(" ")
    }

    #[test]
    fn test_summarization_yields_two_drafts() {
        let doc = sample_document("The employee shall report to the board.");
        let drafts = drafts_for(&doc, PairType::Summarization);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].quality_score, 4);
        assert_eq!(drafts[0].difficulty, "medium");
        assert_eq!(drafts[1].quality_score, 3);
        assert_eq!(drafts[1].difficulty, "easy");
        assert!(drafts[0].prompt.contains("contract"));
    }

    #[test]
    fn test_qa_yields_three_drafts() {
        let doc = sample_document("terms");
        let drafts = drafts_for(&doc, PairType::Qa);
        assert_eq!(drafts.len(), 3);
        let difficulties: Vec<&str> = drafts.iter().map(|d| d.difficulty).collect();
        assert_eq!(difficulties, vec!["easy", "medium", "hard"]);
    }

    #[test]
    fn test_risk_analysis_yields_nothing() {
        let doc = sample_document("liability and damages");
        assert!(drafts_for(&doc, PairType::RiskAnalysis).is_empty());
    }

    #[test]
    fn test_clause_extraction_bounds() {
        let content = format!(
            "{}\n\n{}\n\n{}\n\n{}",
            paragraph(5),   // too short
            paragraph(20),  // qualifies
            paragraph(150), // too long
            paragraph(50),  // qualifies
        );
        let clauses = extract_sample_clauses(&content);
        assert_eq!(clauses.len(), 2);
        assert_eq!(clauses[0].split_whitespace().count(), 20);
    }

    #[test]
    fn test_clause_extraction_caps_at_five() {
        let paras: Vec<String> = (0..8).map(|_| paragraph(20)).collect();
        let content = paras.join("\n\n");
        assert_eq!(extract_sample_clauses(&content).len(), 5);
    }

    #[test]
    fn test_clause_drafts_cap_at_three() {
        let paras: Vec<String> = (0..8).map(|_| paragraph(20)).collect();
        let doc = sample_document(&paras.join("\n\n"));
        assert_eq!(drafts_for(&doc, PairType::ClauseExplanation).len(), 3);
    }

    #[test]
    fn test_prompt_truncation_is_char_safe() {
        let content = "é".repeat(2000);
        let doc = sample_document(&content);
        let drafts = drafts_for(&doc, PairType::Summarization);
        assert!(drafts[0].prompt.contains(&"é".repeat(1000)));
        assert!(!drafts[0].prompt.contains(&"é".repeat(1001)));
    }
}
