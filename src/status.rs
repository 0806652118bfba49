// System status display — DB stats, saved documents, model availability.

use std::sync::Arc;

use anyhow::Result;

use crate::config::{Config, SimilarityBackend};
use crate::db::{Database, DocumentKind};
use crate::similarity::download::embedding_model_dir;

/// Display system status to the terminal.
pub async fn show(db: &Arc<dyn Database>, db_path: &str, config: &Config) -> Result<()> {
    let file_size = std::fs::metadata(db_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_path, file_size);

    let resumes = db.document_count(Some(DocumentKind::Resume)).await?;
    let jobs = db.document_count(Some(DocumentKind::Job)).await?;
    println!("Documents: {} resumes, {} job descriptions", resumes, jobs);

    let analyses = db.analysis_count().await?;
    println!("Analyses: {}", analyses);
    match db.recent_analyses(1).await?.first() {
        Some(latest) => println!(
            "  Latest: {} vs {} ({:.1}%, {}) at {}",
            latest.resume_name,
            latest.job_name,
            latest.overall * 100.0,
            latest.quality,
            latest.created_at
        ),
        None => println!("  Run `tailor compare <resume> <jd> --save` to record one"),
    }

    let model_path = embedding_model_dir(&config.model_dir);
    if config.embedding_model_present() {
        println!("Embedding model: present ({})", model_path.display());
    } else {
        println!("Embedding model: not downloaded");
        println!("  Run `tailor download-model` to fetch it");
    }

    let backend = match config.similarity_backend {
        SimilarityBackend::Embedding if !config.embedding_model_present() => {
            "embedding (falls back to tfidf until the model is downloaded)"
        }
        other => other.as_str(),
    };
    println!("Similarity backend: {}", backend);

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
