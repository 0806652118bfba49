// Data models that map to database rows.
//
// These are separate from the queries so other modules can use them without
// depending on rusqlite directly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::MatchAnalysis;
use crate::comparison::MatchQuality;
use crate::documents::DocumentFormat;

/// Which side of a comparison a stored document is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Resume,
    Job,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::Job => "job",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "resume" => Some(DocumentKind::Resume),
            "job" => Some(DocumentKind::Job),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resume or job description saved with its extracted skills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    pub id: i64,
    pub kind: DocumentKind,
    pub name: String,
    pub format: DocumentFormat,
    pub text: String,
    /// JSON-encoded in the DB
    pub skills: Vec<String>,
    pub created_at: String,
}

/// A document about to be saved.
#[derive(Debug, Clone, Copy)]
pub struct NewDocument<'a> {
    pub kind: DocumentKind,
    pub name: &'a str,
    pub format: DocumentFormat,
    pub text: &'a str,
    pub skills: &'a [String],
}

/// Row IDs written by one `save_comparison` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SavedComparison {
    pub resume_id: i64,
    pub job_id: i64,
    pub analysis_id: i64,
}

/// A saved analysis, with the names of the two documents it compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: i64,
    pub resume_id: i64,
    pub job_id: i64,
    pub resume_name: String,
    pub job_name: String,
    pub overall: f64,
    pub avg_section: f64,
    pub max_section: f64,
    pub min_section: f64,
    pub quality: MatchQuality,
    /// Similarity backend that produced the scores ("embedding" or "tfidf")
    pub backend: String,
    pub analysis: MatchAnalysis,
    pub created_at: String,
}
