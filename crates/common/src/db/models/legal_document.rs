//! Legal document entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Document type enum
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Contract,
    Constitutional,
    Statute,
    CaseLaw,
    Regulation,
}

impl DocumentType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "contract" => Some(DocumentType::Contract),
            "constitutional" => Some(DocumentType::Constitutional),
            "statute" => Some(DocumentType::Statute),
            "case_law" => Some(DocumentType::CaseLaw),
            "regulation" => Some(DocumentType::Regulation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Contract => "contract",
            DocumentType::Constitutional => "constitutional",
            DocumentType::Statute => "statute",
            DocumentType::CaseLaw => "case_law",
            DocumentType::Regulation => "regulation",
        }
    }
}

/// Complexity tier assigned by the classifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

impl From<String> for Complexity {
    fn from(s: String) -> Self {
        match s.as_str() {
            "high" => Complexity::High,
            "medium" => Complexity::Medium,
            _ => Complexity::Low,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "legal_documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    /// Raw text on upload, replaced in place once anonymized
    #[sea_orm(column_type = "Text")]
    pub content: String,

    #[sea_orm(column_type = "Text")]
    pub document_type: String,

    #[sea_orm(column_type = "Text")]
    pub jurisdiction: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub source: Option<String>,

    pub word_count: i32,

    #[sea_orm(column_type = "Text")]
    pub complexity: String,

    /// JSON array of domain tags
    pub domains: Json,

    #[sea_orm(column_type = "Text")]
    pub language: String,

    pub is_processed: bool,

    pub is_anonymized: bool,

    #[sea_orm(column_type = "Text", nullable)]
    pub processing_notes: Option<String>,

    pub document_date: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Domain tags as plain strings
    pub fn domain_tags(&self) -> Vec<String> {
        self.domains
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn complexity_tier(&self) -> Complexity {
        Complexity::from(self.complexity.clone())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::prompt_response_pair::Entity")]
    Pairs,
}

impl Related<super::prompt_response_pair::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pairs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_type_roundtrip() {
        for s in ["contract", "constitutional", "statute", "case_law", "regulation"] {
            let t = DocumentType::parse(s).unwrap();
            assert_eq!(t.as_str(), s);
        }
        assert!(DocumentType::parse("memo").is_none());
    }
}
