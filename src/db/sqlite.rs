// SqliteDatabase: rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across an .await.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{AnalysisRecord, DocumentKind, NewDocument, SavedComparison, StoredDocument};
use super::queries;
use super::traits::Database;
use crate::analysis::MatchAnalysis;
use crate::documents::DocumentFormat;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn save_document(
        &self,
        kind: DocumentKind,
        name: &str,
        format: DocumentFormat,
        text: &str,
        skills: &[String],
    ) -> Result<i64> {
        let conn = self.conn.lock().await;
        queries::save_document(&conn, kind, name, format, text, skills)
    }

    async fn get_document(&self, id: i64) -> Result<Option<StoredDocument>> {
        let conn = self.conn.lock().await;
        queries::get_document(&conn, id)
    }

    async fn list_documents(&self, kind: Option<DocumentKind>) -> Result<Vec<StoredDocument>> {
        let conn = self.conn.lock().await;
        queries::list_documents(&conn, kind)
    }

    async fn document_count(&self, kind: Option<DocumentKind>) -> Result<i64> {
        let conn = self.conn.lock().await;
        queries::document_count(&conn, kind)
    }

    async fn save_analysis(
        &self,
        resume_id: i64,
        job_id: i64,
        backend: &str,
        analysis: &MatchAnalysis,
    ) -> Result<i64> {
        let conn = self.conn.lock().await;
        queries::save_analysis(&conn, resume_id, job_id, backend, analysis)
    }

    async fn save_comparison(
        &self,
        resume: NewDocument<'_>,
        job: NewDocument<'_>,
        backend: &str,
        analysis: &MatchAnalysis,
    ) -> Result<SavedComparison> {
        let mut conn = self.conn.lock().await;
        queries::save_comparison(&mut conn, resume, job, backend, analysis)
    }

    async fn get_analysis(&self, id: i64) -> Result<Option<AnalysisRecord>> {
        let conn = self.conn.lock().await;
        queries::get_analysis(&conn, id)
    }

    async fn recent_analyses(&self, limit: u32) -> Result<Vec<AnalysisRecord>> {
        let conn = self.conn.lock().await;
        queries::recent_analyses(&conn, limit)
    }

    async fn analysis_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        queries::analysis_count(&conn)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::analysis::{recommendations, skill_gap};
    use crate::comparison::{MatchQuality, SimilarityReport};
    use crate::db::schema::create_tables;

    fn test_db() -> SqliteDatabase {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        SqliteDatabase::new(conn)
    }

    fn strings(s: &[&str]) -> Vec<String> {
        s.iter().map(|x| x.to_string()).collect()
    }

    fn sample_analysis(overall: f64) -> MatchAnalysis {
        let resume_skills = strings(&["python", "sql"]);
        let jd_skills = strings(&["python", "rust"]);
        let gap = skill_gap(&resume_skills, &jd_skills);
        MatchAnalysis {
            recommendations: recommendations(overall, &gap),
            resume_skills,
            jd_skills,
            resume_categories: BTreeMap::new(),
            jd_categories: BTreeMap::new(),
            similarity: SimilarityReport {
                overall_similarity: overall,
                avg_section_similarity: 0.3,
                max_section_similarity: 0.5,
                min_section_similarity: 0.1,
            },
            quality: MatchQuality::from_score(overall),
            gap,
            distribution: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_table_count() {
        assert_eq!(test_db().table_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_document_roundtrip() {
        let db = test_db();
        let skills = strings(&["python", "sql"]);
        let id = db
            .save_document(DocumentKind::Resume, "cv.pdf", DocumentFormat::Pdf, "Python and SQL", &skills)
            .await
            .unwrap();

        let doc = db.get_document(id).await.unwrap().unwrap();
        assert_eq!(doc.kind, DocumentKind::Resume);
        assert_eq!(doc.name, "cv.pdf");
        assert_eq!(doc.format, DocumentFormat::Pdf);
        assert_eq!(doc.skills, skills);
        assert!(db.get_document(id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_same_text_same_kind_deduplicates() {
        let db = test_db();
        let a = db
            .save_document(DocumentKind::Job, "a.txt", DocumentFormat::Text, "Rust role", &[])
            .await
            .unwrap();
        let b = db
            .save_document(DocumentKind::Job, "b.txt", DocumentFormat::Text, "Rust role", &[])
            .await
            .unwrap();
        let c = db
            .save_document(DocumentKind::Resume, "c.txt", DocumentFormat::Text, "Rust role", &[])
            .await
            .unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[tokio::test]
    async fn test_list_documents_filters_by_kind() {
        let db = test_db();
        db.save_document(DocumentKind::Resume, "r", DocumentFormat::Text, "resume", &[])
            .await
            .unwrap();
        db.save_document(DocumentKind::Job, "j1", DocumentFormat::Text, "job one", &[])
            .await
            .unwrap();
        db.save_document(DocumentKind::Job, "j2", DocumentFormat::Text, "job two", &[])
            .await
            .unwrap();

        assert_eq!(db.list_documents(None).await.unwrap().len(), 3);
        let jobs = db.list_documents(Some(DocumentKind::Job)).await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].name, "j2", "newest first");
    }

    #[tokio::test]
    async fn test_document_count_by_kind() {
        let db = test_db();
        assert_eq!(db.document_count(None).await.unwrap(), 0);
        db.save_document(DocumentKind::Resume, "r", DocumentFormat::Text, "resume", &[])
            .await
            .unwrap();
        db.save_document(DocumentKind::Job, "j1", DocumentFormat::Text, "job one", &[])
            .await
            .unwrap();
        db.save_document(DocumentKind::Job, "j2", DocumentFormat::Text, "job two", &[])
            .await
            .unwrap();

        assert_eq!(db.document_count(None).await.unwrap(), 3);
        assert_eq!(db.document_count(Some(DocumentKind::Resume)).await.unwrap(), 1);
        assert_eq!(db.document_count(Some(DocumentKind::Job)).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_analysis_roundtrip_with_names() {
        let db = test_db();
        let r = db
            .save_document(DocumentKind::Resume, "cv.docx", DocumentFormat::Docx, "cv", &[])
            .await
            .unwrap();
        let j = db
            .save_document(DocumentKind::Job, "pasted text", DocumentFormat::Text, "jd", &[])
            .await
            .unwrap();

        let analysis = sample_analysis(0.65);
        let id = db.save_analysis(r, j, "tfidf", &analysis).await.unwrap();

        let record = db.get_analysis(id).await.unwrap().unwrap();
        assert_eq!(record.resume_name, "cv.docx");
        assert_eq!(record.job_name, "pasted text");
        assert_eq!(record.quality, MatchQuality::Good);
        assert_eq!(record.backend, "tfidf");
        assert!((record.overall - 0.65).abs() < f64::EPSILON);
        assert!((record.min_section - 0.1).abs() < f64::EPSILON);
        assert_eq!(record.analysis, analysis);
    }

    fn new_doc<'a>(kind: DocumentKind, name: &'a str, text: &'a str, skills: &'a [String]) -> NewDocument<'a> {
        NewDocument {
            kind,
            name,
            format: DocumentFormat::Text,
            text,
            skills,
        }
    }

    #[tokio::test]
    async fn test_save_comparison_links_rows() {
        let db = test_db();
        let analysis = sample_analysis(0.7);
        let saved = db
            .save_comparison(
                new_doc(DocumentKind::Resume, "cv.txt", "Python and SQL", &analysis.resume_skills),
                new_doc(DocumentKind::Job, "jd.txt", "Python and Rust", &analysis.jd_skills),
                "tfidf",
                &analysis,
            )
            .await
            .unwrap();

        let record = db.get_analysis(saved.analysis_id).await.unwrap().unwrap();
        assert_eq!(record.resume_id, saved.resume_id);
        assert_eq!(record.job_id, saved.job_id);
        assert_eq!(record.resume_name, "cv.txt");
        assert_eq!(record.job_name, "jd.txt");
        let job = db.get_document(saved.job_id).await.unwrap().unwrap();
        assert_eq!(job.skills, analysis.jd_skills);
    }

    #[tokio::test]
    async fn test_save_comparison_rolls_back_on_failure() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_analyses BEFORE INSERT ON analyses
             BEGIN SELECT RAISE(ABORT, 'analyses are read-only'); END;",
        )
        .unwrap();
        let db = SqliteDatabase::new(conn);

        let analysis = sample_analysis(0.4);
        let result = db
            .save_comparison(
                new_doc(DocumentKind::Resume, "cv.txt", "Python and SQL", &[]),
                new_doc(DocumentKind::Job, "jd.txt", "Python and Rust", &[]),
                "tfidf",
                &analysis,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(db.document_count(None).await.unwrap(), 0, "no orphan documents");
        assert_eq!(db.analysis_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_recent_analyses_newest_first_and_limited() {
        let db = test_db();
        for score in [0.1, 0.5, 0.9] {
            db.save_analysis(1, 2, "embedding", &sample_analysis(score))
                .await
                .unwrap();
        }

        assert_eq!(db.analysis_count().await.unwrap(), 3);
        let recent = db.recent_analyses(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!((recent[0].overall - 0.9).abs() < f64::EPSILON);
        // Documents were never saved, so the names come back empty
        assert_eq!(recent[0].resume_name, "");
    }
}
