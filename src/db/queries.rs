// Database queries: CRUD operations for documents and analyses.
//
// Every SQL statement lives here. Functions take a plain Connection so they
// can be tested against an in-memory database without the async wrapper.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{AnalysisRecord, DocumentKind, NewDocument, SavedComparison, StoredDocument};
use crate::analysis::MatchAnalysis;
use crate::comparison::MatchQuality;
use crate::documents::DocumentFormat;

// --- Documents ---

/// Insert a document, or return the ID of an identical one already stored.
pub fn save_document(
    conn: &Connection,
    kind: DocumentKind,
    name: &str,
    format: DocumentFormat,
    text: &str,
    skills: &[String],
) -> Result<i64> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM documents WHERE kind = ?1 AND text = ?2 ORDER BY id LIMIT 1",
            params![kind.as_str(), text],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let skills_json = serde_json::to_string(skills)?;
    conn.execute(
        "INSERT INTO documents (kind, name, format, text, skills_json)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![kind.as_str(), name, format.as_str(), text, skills_json],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_document(conn: &Connection, id: i64) -> Result<Option<StoredDocument>> {
    let raw = conn
        .query_row(
            "SELECT id, kind, name, format, text, skills_json, created_at
             FROM documents WHERE id = ?1",
            params![id],
            RawDocument::from_row,
        )
        .optional()?;
    raw.map(RawDocument::into_document).transpose()
}

/// List stored documents, newest first.
pub fn list_documents(conn: &Connection, kind: Option<DocumentKind>) -> Result<Vec<StoredDocument>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, name, format, text, skills_json, created_at
         FROM documents
         WHERE ?1 IS NULL OR kind = ?1
         ORDER BY id DESC",
    )?;
    let rows = stmt.query_map(params![kind.map(|k| k.as_str())], RawDocument::from_row)?;

    let mut documents = Vec::new();
    for row in rows {
        documents.push(row?.into_document()?);
    }
    Ok(documents)
}

/// Count stored documents, optionally of one kind.
pub fn document_count(conn: &Connection, kind: Option<DocumentKind>) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE ?1 IS NULL OR kind = ?1",
        params![kind.map(|k| k.as_str())],
        |row| row.get(0),
    )?;
    Ok(count)
}

// --- Analyses ---

pub fn save_analysis(
    conn: &Connection,
    resume_id: i64,
    job_id: i64,
    backend: &str,
    analysis: &MatchAnalysis,
) -> Result<i64> {
    let analysis_json = serde_json::to_string(analysis)?;
    let sim = &analysis.similarity;
    conn.execute(
        "INSERT INTO analyses (resume_id, job_id, overall, avg_section, max_section,
                               min_section, quality, backend, analysis_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            resume_id,
            job_id,
            sim.overall_similarity,
            sim.avg_section_similarity,
            sim.max_section_similarity,
            sim.min_section_similarity,
            analysis.quality.as_str(),
            backend,
            analysis_json,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Save a resume, a job description and their analysis in one transaction.
/// Nothing is written if any step fails.
pub fn save_comparison(
    conn: &mut Connection,
    resume: NewDocument<'_>,
    job: NewDocument<'_>,
    backend: &str,
    analysis: &MatchAnalysis,
) -> Result<SavedComparison> {
    let tx = conn.transaction()?;
    let resume_id = save_document(&tx, resume.kind, resume.name, resume.format, resume.text, resume.skills)
        .context("Failed to save resume")?;
    let job_id = save_document(&tx, job.kind, job.name, job.format, job.text, job.skills)
        .context("Failed to save job description")?;
    let analysis_id =
        save_analysis(&tx, resume_id, job_id, backend, analysis).context("Failed to save analysis")?;
    tx.commit()?;
    Ok(SavedComparison {
        resume_id,
        job_id,
        analysis_id,
    })
}

const ANALYSIS_COLUMNS: &str = "a.id, a.resume_id, a.job_id,
    COALESCE(r.name, ''), COALESCE(j.name, ''),
    a.overall, a.avg_section, a.max_section, a.min_section,
    a.quality, a.backend, a.analysis_json, a.created_at";

pub fn get_analysis(conn: &Connection, id: i64) -> Result<Option<AnalysisRecord>> {
    let sql = format!(
        "SELECT {ANALYSIS_COLUMNS}
         FROM analyses a
         LEFT JOIN documents r ON r.id = a.resume_id
         LEFT JOIN documents j ON j.id = a.job_id
         WHERE a.id = ?1"
    );
    let raw = conn
        .query_row(&sql, params![id], RawAnalysis::from_row)
        .optional()?;
    raw.map(RawAnalysis::into_record).transpose()
}

/// Most recent analyses first. Ties on timestamp fall back to insertion order.
pub fn recent_analyses(conn: &Connection, limit: u32) -> Result<Vec<AnalysisRecord>> {
    let sql = format!(
        "SELECT {ANALYSIS_COLUMNS}
         FROM analyses a
         LEFT JOIN documents r ON r.id = a.resume_id
         LEFT JOIN documents j ON j.id = a.job_id
         ORDER BY a.created_at DESC, a.id DESC
         LIMIT ?1"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![limit], RawAnalysis::from_row)?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?.into_record()?);
    }
    Ok(records)
}

pub fn analysis_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM analyses", [], |row| row.get(0))?;
    Ok(count)
}

// --- Row mapping ---
//
// rusqlite row closures can only return rusqlite errors, so rows are read
// into raw structs first and decoded (enums, JSON) afterwards.

struct RawDocument {
    id: i64,
    kind: String,
    name: String,
    format: String,
    text: String,
    skills_json: String,
    created_at: String,
}

impl RawDocument {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            kind: row.get(1)?,
            name: row.get(2)?,
            format: row.get(3)?,
            text: row.get(4)?,
            skills_json: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_document(self) -> Result<StoredDocument> {
        let kind = DocumentKind::parse(&self.kind)
            .with_context(|| format!("Unknown document kind {:?} (id {})", self.kind, self.id))?;
        let format = DocumentFormat::parse(&self.format)
            .with_context(|| format!("Unknown document format {:?} (id {})", self.format, self.id))?;
        let skills = serde_json::from_str(&self.skills_json)
            .with_context(|| format!("Corrupt skills_json for document {}", self.id))?;
        Ok(StoredDocument {
            id: self.id,
            kind,
            name: self.name,
            format,
            text: self.text,
            skills,
            created_at: self.created_at,
        })
    }
}

struct RawAnalysis {
    id: i64,
    resume_id: i64,
    job_id: i64,
    resume_name: String,
    job_name: String,
    overall: f64,
    avg_section: f64,
    max_section: f64,
    min_section: f64,
    quality: String,
    backend: String,
    analysis_json: String,
    created_at: String,
}

impl RawAnalysis {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            resume_id: row.get(1)?,
            job_id: row.get(2)?,
            resume_name: row.get(3)?,
            job_name: row.get(4)?,
            overall: row.get(5)?,
            avg_section: row.get(6)?,
            max_section: row.get(7)?,
            min_section: row.get(8)?,
            quality: row.get(9)?,
            backend: row.get(10)?,
            analysis_json: row.get(11)?,
            created_at: row.get(12)?,
        })
    }

    fn into_record(self) -> Result<AnalysisRecord> {
        let quality = MatchQuality::parse(&self.quality)
            .with_context(|| format!("Unknown match quality {:?} (analysis {})", self.quality, self.id))?;
        let analysis = serde_json::from_str(&self.analysis_json)
            .with_context(|| format!("Corrupt analysis_json for analysis {}", self.id))?;
        Ok(AnalysisRecord {
            id: self.id,
            resume_id: self.resume_id,
            job_id: self.job_id,
            resume_name: self.resume_name,
            job_name: self.job_name,
            overall: self.overall,
            avg_section: self.avg_section,
            max_section: self.max_section,
            min_section: self.min_section,
            quality,
            backend: self.backend,
            analysis,
            created_at: self.created_at,
        })
    }
}
