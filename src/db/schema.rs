// Database schema: table creation and migrations.
//
// A `schema_version` table tracks which migrations have run, and each
// migration is a function that executes SQL statements.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet. Idempotent.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Parsed resumes and job descriptions
        CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,                -- 'resume' or 'job'
            name TEXT NOT NULL,                -- file name, or 'pasted text'
            format TEXT NOT NULL,              -- pdf / docx / text
            text TEXT NOT NULL,
            skills_json TEXT NOT NULL,         -- JSON array of extracted skills
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- One row per resume/job comparison
        CREATE TABLE IF NOT EXISTS analyses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            resume_id INTEGER NOT NULL REFERENCES documents(id),
            job_id INTEGER NOT NULL REFERENCES documents(id),
            overall REAL NOT NULL,             -- 0.0 to 1.0
            avg_section REAL NOT NULL,
            max_section REAL NOT NULL,
            min_section REAL NOT NULL,
            quality TEXT NOT NULL,             -- 'Excellent match' ... 'Very poor match'
            analysis_json TEXT NOT NULL,       -- full MatchAnalysis
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_documents_kind
            ON documents(kind);

        CREATE INDEX IF NOT EXISTS idx_analyses_created
            ON analyses(created_at);
        ",
    )
    .context("Failed to create database tables")?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    // Migration v2: record which similarity backend scored each analysis.
    // Embedding and TF-IDF scores live on different scales, so history
    // views need to tell them apart.
    run_migration(conn, 2, |c| {
        c.execute_batch(
            "ALTER TABLE analyses ADD COLUMN backend TEXT NOT NULL DEFAULT 'embedding';",
        )
    })?;

    Ok(())
}

/// Run a migration if it hasn't been applied yet.
fn run_migration<F>(conn: &Connection, version: i64, migrate: F) -> Result<()>
where
    F: FnOnce(&Connection) -> rusqlite::Result<()>,
{
    let already_applied: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM schema_version WHERE version = ?1",
        [version],
        |row| row.get(0),
    )?;

    if !already_applied {
        migrate(conn).with_context(|| format!("Migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Count the number of tables in the database (shown by `tailor init`).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        let versions: Vec<i64> = conn
            .prepare("SELECT version FROM schema_version ORDER BY version")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(versions, vec![1, 2]);
    }

    #[test]
    fn test_table_count() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        // schema_version, documents, analyses
        assert_eq!(table_count(&conn).unwrap(), 3);
    }

    #[test]
    fn test_migration_v2_adds_backend_column() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();

        conn.execute(
            "INSERT INTO analyses (resume_id, job_id, overall, avg_section, max_section,
                                   min_section, quality, analysis_json)
             VALUES (1, 2, 0.5, 0.4, 0.6, 0.2, 'Fair match', '{}')",
            [],
        )
        .unwrap();

        let backend: String = conn
            .query_row("SELECT backend FROM analyses", [], |row| row.get(0))
            .unwrap();
        assert_eq!(backend, "embedding");
    }
}
