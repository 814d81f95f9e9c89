//! Training dataset export
//!
//! Serializes the pair set to JSONL or CSV after filtering. Filters are
//! conjunctive; a pair must satisfy every one that is set.

use lexforge_common::db::models::{PairType, PromptResponsePair};
use lexforge_common::errors::{AppError, Result};

/// Export serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Jsonl,
    Csv,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "jsonl" => Some(ExportFormat::Jsonl),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Jsonl => "application/jsonl",
            ExportFormat::Csv => "text/csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Jsonl => "jsonl",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Conjunctive filters applied before serialization
#[derive(Debug, Clone, Default)]
pub struct ExportFilter {
    /// Keep only these pair types; `None` keeps all
    pub pair_types: Option<Vec<PairType>>,
    /// Minimum quality score, inclusive
    pub min_quality: Option<i32>,
    /// Keep only verified pairs
    pub verified_only: bool,
}

impl ExportFilter {
    fn accepts(&self, pair: &PromptResponsePair) -> bool {
        if let Some(ref types) = self.pair_types {
            if !types.iter().any(|t| t.as_str() == pair.pair_type) {
                return false;
            }
        }
        if let Some(min) = self.min_quality {
            if pair.quality_score < min {
                return false;
            }
        }
        if self.verified_only && !pair.is_verified {
            return false;
        }
        true
    }
}

/// A serialized export ready to hand to the client
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub body: String,
    pub content_type: &'static str,
    pub filename: String,
    /// Pairs that survived filtering
    pub pair_count: usize,
}

/// Filter and serialize the pair set
pub fn export_pairs(
    pairs: &[PromptResponsePair],
    filter: &ExportFilter,
    format: ExportFormat,
) -> Result<ExportArtifact> {
    let filtered: Vec<&PromptResponsePair> =
        pairs.iter().filter(|p| filter.accepts(p)).collect();

    let body = match format {
        ExportFormat::Jsonl => to_jsonl(&filtered)?,
        ExportFormat::Csv => to_csv(&filtered)?,
    };

    let stamp = chrono::Utc::now().format("%Y%m%d");
    Ok(ExportArtifact {
        body,
        content_type: format.content_type(),
        filename: format!("legal_training_data_{}.{}", stamp, format.extension()),
        pair_count: filtered.len(),
    })
}

fn to_jsonl(pairs: &[&PromptResponsePair]) -> Result<String> {
    let mut lines = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let line = serde_json::json!({
            "prompt": pair.prompt,
            "response": pair.response,
            "type": pair.pair_type,
            "quality": pair.quality_score,
            "domain": pair.domain,
            "difficulty": pair.difficulty,
        });
        lines.push(serde_json::to_string(&line)?);
    }
    Ok(lines.join("\n"))
}

fn to_csv(pairs: &[&PromptResponsePair]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["prompt", "response", "type", "quality", "domain", "difficulty"])
        .map_err(csv_error)?;

    for pair in pairs {
        writer
            .write_record([
                pair.prompt.as_str(),
                pair.response.as_str(),
                pair.pair_type.as_str(),
                &pair.quality_score.to_string(),
                pair.domain.as_deref().unwrap_or(""),
                pair.difficulty.as_deref().unwrap_or(""),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer.into_inner().map_err(|e| AppError::Internal {
        message: format!("csv export failed: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal {
        message: format!("csv export produced invalid utf-8: {}", e),
    })
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::Internal {
        message: format!("csv export failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn pair(pair_type: &str, quality: i32, verified: bool) -> PromptResponsePair {
        let now = Utc::now();
        PromptResponsePair {
            id: Uuid::new_v4(),
            prompt: format!("prompt for {}", pair_type),
            response: "response text".to_string(),
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

    #[test]
    fn test_jsonl_shape() {
        let pairs = vec![pair("qa", 4, true)];
        let artifact = export_pairs(&pairs, &ExportFilter::default(), ExportFormat::Jsonl).unwrap();

        assert_eq!(artifact.pair_count, 1);
        assert_eq!(artifact.content_type, "application/jsonl");
        let parsed: serde_json::Value = serde_json::from_str(&artifact.body).unwrap();
        assert_eq!(parsed["type"], "qa");
        assert_eq!(parsed["quality"], 4);
        assert_eq!(parsed["domain"], "contracts");
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let pairs = vec![pair("qa", 4, true), pair("summarization", 3, false)];
        let artifact = export_pairs(&pairs, &ExportFilter::default(), ExportFormat::Csv).unwrap();

        let mut lines = artifact.body.lines();
        assert_eq!(
            lines.next().unwrap(),
            "prompt,response,type,quality,domain,difficulty"
        );
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let pairs = vec![
            pair("qa", 5, true),
            pair("qa", 5, false),
            pair("qa", 2, true),
            pair("summarization", 5, true),
        ];
        let filter = ExportFilter {
            pair_types: Some(vec![PairType::Qa]),
            min_quality: Some(3),
            verified_only: true,
        };
        let artifact = export_pairs(&pairs, &filter, ExportFormat::Jsonl).unwrap();
        assert_eq!(artifact.pair_count, 1);
    }

    #[test]
    fn test_min_quality_is_inclusive() {
        let pairs = vec![pair("qa", 3, false), pair("qa", 2, false)];
        let filter = ExportFilter {
            min_quality: Some(3),
            ..Default::default()
        };
        let artifact = export_pairs(&pairs, &filter, ExportFormat::Jsonl).unwrap();
        assert_eq!(artifact.pair_count, 1);
    }

    #[test]
    fn test_empty_export() {
        let artifact =
            export_pairs(&[], &ExportFilter::default(), ExportFormat::Jsonl).unwrap();
        assert_eq!(artifact.body, "");
        assert_eq!(artifact.pair_count, 0);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::parse("jsonl"), Some(ExportFormat::Jsonl));
        assert_eq!(ExportFormat::parse("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("parquet"), None);
    }
}
