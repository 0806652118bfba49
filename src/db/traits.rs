// Database trait: async interface over the storage backend.
//
// SqliteDatabase is the only implementor. Callers hold `Arc<dyn Database>`,
// so the CLI and the web handlers share one code path.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{AnalysisRecord, DocumentKind, NewDocument, SavedComparison, StoredDocument};
use crate::analysis::MatchAnalysis;
use crate::documents::DocumentFormat;

#[async_trait]
pub trait Database: Send + Sync {
    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Documents ---

    /// Save a document and return its ID. Saving the same text under the
    /// same kind again returns the existing ID.
    async fn save_document(
        &self,
        kind: DocumentKind,
        name: &str,
        format: DocumentFormat,
        text: &str,
        skills: &[String],
    ) -> Result<i64>;

    async fn get_document(&self, id: i64) -> Result<Option<StoredDocument>>;

    /// List documents, newest first, optionally of one kind.
    async fn list_documents(&self, kind: Option<DocumentKind>) -> Result<Vec<StoredDocument>>;

    async fn document_count(&self, kind: Option<DocumentKind>) -> Result<i64>;

    // --- Analyses ---

    /// Record an analysis and return its ID.
    async fn save_analysis(
        &self,
        resume_id: i64,
        job_id: i64,
        backend: &str,
        analysis: &MatchAnalysis,
    ) -> Result<i64>;

    /// Save both documents and their analysis atomically.
    async fn save_comparison(
        &self,
        resume: NewDocument<'_>,
        job: NewDocument<'_>,
        backend: &str,
        analysis: &MatchAnalysis,
    ) -> Result<SavedComparison>;

    async fn get_analysis(&self, id: i64) -> Result<Option<AnalysisRecord>>;

    /// Most recent analyses first.
    async fn recent_analyses(&self, limit: u32) -> Result<Vec<AnalysisRecord>>;

    async fn analysis_count(&self) -> Result<i64>;
}
