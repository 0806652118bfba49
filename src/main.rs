use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{info, warn};

use tailor::analysis::{Analyzer, MatchAnalysis};
use tailor::comparison::SimilarityComparator;
use tailor::config::{Config, SimilarityBackend};
use tailor::db::{Database, DocumentKind, NewDocument};
use tailor::documents::{self, DocumentFormat, ParsedDocument};
use tailor::similarity::{download, SentenceEmbedder, TextEmbedder, TfIdfEmbedder};
use tailor::skills::SkillExtractor;

/// Tailor: see how well a resume fits a job description.
///
/// Extracts skills from both documents, scores their similarity, and reports
/// the skills gap with recommendations.
#[derive(Parser)]
#[command(name = "tailor", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Download the sentence embedding model (~90 MB)
    DownloadModel,

    /// Extract and print the text of a PDF, DOCX or TXT file
    Parse {
        file: PathBuf,
    },

    /// Extract and categorize skills from a file or text
    Skills {
        /// Document to read (pdf, docx or txt)
        #[arg(required_unless_present = "text")]
        file: Option<PathBuf>,

        /// Use this text instead of a file
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// Only report catalog skills (skip discovered terms)
        #[arg(long)]
        catalog_only: bool,

        /// Print JSON instead of the formatted view
        #[arg(long)]
        json: bool,
    },

    /// Compare a resume to a job description
    Compare {
        /// Resume file (pdf, docx or txt)
        resume: PathBuf,

        /// Job description file
        #[arg(required_unless_present = "jd_text")]
        jd: Option<PathBuf>,

        /// Job description text, instead of a file
        #[arg(long, conflicts_with = "jd")]
        jd_text: Option<String>,

        /// Save both documents and the analysis to the database
        #[arg(long)]
        save: bool,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank several job descriptions against one resume
    Rank {
        /// Resume file
        resume: PathBuf,

        /// Job description files to rank
        #[arg(required = true, num_args = 1..)]
        jds: Vec<PathBuf>,

        /// How many matches to show (default: 5)
        #[arg(long, default_value = "5")]
        top_k: usize,
    },

    /// Show recently saved analyses
    History {
        /// How many analyses to show (default: 10)
        #[arg(long, default_value = "10")]
        limit: u32,
    },

    /// Write a markdown report of saved analyses
    Report {
        /// How many analyses to include (default: 50)
        #[arg(long, default_value = "50")]
        limit: u32,

        /// Where to write the report
        #[arg(long, default_value = "output/tailor-report.md")]
        output: String,
    },

    /// Run an analysis on a built-in sample resume and job description
    Demo,

    /// Show system status (DB stats, model availability, backend)
    Status,

    /// Start the web dashboard
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (overrides TAILOR_WEB_PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind (overrides TAILOR_WEB_BIND)
        #[arg(long)]
        bind: Option<String>,
    },
}

const SAMPLE_RESUME: &str = "\
Software Engineer with 5 years of experience in Python, Java, and web development.
Proficient in Django, React, and AWS. Strong background in data structures and algorithms.

Led an agile team of four, with a focus on communication and code review.
Built CI pipelines with Docker and Git.";

const SAMPLE_JD: &str = "\
We are looking for a Software Engineer with experience in Python, JavaScript, and cloud technologies.
Knowledge of React, Django, and AWS is a plus. Familiarity with agile methodologies required.

You will deploy services with Docker and Kubernetes and collaborate closely with product.";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tailor=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing Tailor database...");
            let config = Config::load()?;
            let db = tailor::db::initialize_sqlite(&config.db_path)?;
            let table_count = db.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            if !config.embedding_model_present() {
                println!("\nFor semantic matching, download the embedding model:");
                println!("  tailor download-model");
            }
            println!("\nThen run: tailor compare <resume> <job description>");
        }

        Commands::DownloadModel => {
            let config = Config::load()?;
            println!(
                "Downloading embedding model to {}",
                config.model_dir.display()
            );
            download::download_model(&config.model_dir).await?;
            println!("\n{}", "Model ready.".green().bold());
        }

        Commands::Parse { file } => {
            let doc = documents::parse_document(&file)?;
            println!(
                "{}",
                format!(
                    "=== {} ({}, {} chars) ===",
                    doc.name,
                    doc.format,
                    doc.text.chars().count()
                )
                .bold()
            );
            println!("{}", doc.text);
        }

        Commands::Skills {
            file,
            text,
            catalog_only,
            json,
        } => {
            let (title, raw) = match (file, text) {
                (_, Some(text)) => ("Skills".to_string(), text),
                (Some(path), None) => {
                    let doc = documents::parse_document(&path)?;
                    (format!("Skills in {}", doc.name), doc.text)
                }
                (None, None) => anyhow::bail!("Provide a file or --text"),
            };

            let extractor = if catalog_only {
                SkillExtractor::catalog_only()
            } else {
                SkillExtractor::default()
            };
            let skills = extractor.extract_skills(&raw);
            let categories = extractor.categorize_skills(&skills);

            if json {
                let out = serde_json::json!({ "skills": skills, "categories": categories });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                tailor::output::terminal::display_skills(&title, &skills, &categories);
            }
        }

        Commands::Compare {
            resume,
            jd,
            jd_text,
            save,
            json,
        } => {
            let config = Config::load()?;
            let resume_doc = documents::parse_document(&resume)?;
            let jd_doc = match (jd, jd_text) {
                (_, Some(text)) => pasted_document(text)?,
                (Some(path), None) => documents::parse_document(&path)?,
                (None, None) => anyhow::bail!("Provide a job description file or --jd-text"),
            };

            // Open before analyzing so a missing DB fails fast
            let db = if save {
                Some(tailor::db::open_sqlite(&config.db_path)?)
            } else {
                None
            };

            let analyzer = build_analyzer(&config);
            let analysis = analyzer.analyze(&resume_doc.text, &jd_doc.text).await?;
            let backend = analyzer.comparator.backend();

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                println!(
                    "\n{} vs {}",
                    resume_doc.name.bold(),
                    jd_doc.name.bold()
                );
                tailor::output::terminal::display_analysis(&analysis, backend);
            }

            if let Some(db) = db {
                let id = save_analysis(&db, &resume_doc, &jd_doc, backend, &analysis).await?;
                // Keep stdout clean for --json
                if json {
                    info!(id, "Saved analysis");
                } else {
                    println!("{}", format!("Saved as analysis #{id}").dimmed());
                }
            }
        }

        Commands::Rank {
            resume,
            jds,
            top_k,
        } => {
            let config = Config::load()?;
            let resume_doc = documents::parse_document(&resume)?;
            let jd_docs = parse_all(&jds).await?;

            let names: Vec<String> = jd_docs.iter().map(|d| d.name.clone()).collect();
            let texts: Vec<String> = jd_docs.into_iter().map(|d| d.text).collect();

            let comparator = SimilarityComparator::new(create_embedder(&config));
            let matches = comparator
                .find_best_matches(&resume_doc.text, &texts, top_k)
                .await?;

            println!(
                "{}",
                format!("Similarity backend: {}", comparator.backend()).dimmed()
            );
            tailor::output::terminal::display_best_matches(&matches, &names);
        }

        Commands::History { limit } => {
            let config = Config::load()?;
            let db = tailor::db::open_sqlite(&config.db_path)?;
            let records = db.recent_analyses(limit).await?;
            tailor::output::terminal::display_history(&records);
        }

        Commands::Report { limit, output } => {
            let config = Config::load()?;
            let db = tailor::db::open_sqlite(&config.db_path)?;
            let records = db.recent_analyses(limit).await?;
            let path = tailor::output::markdown::generate_report(&records, &output)?;
            println!(
                "{}",
                format!(
                    "Markdown report ({} analyses) saved to: {path}",
                    records.len()
                )
                .bold()
            );
        }

        Commands::Demo => {
            let config = Config::load()?;
            let analyzer = build_analyzer(&config);

            println!("{}", "=== Sample resume ===".bold());
            println!("{}\n", SAMPLE_RESUME.dimmed());
            println!("{}", "=== Sample job description ===".bold());
            println!("{}", SAMPLE_JD.dimmed());

            let analysis = analyzer.analyze(SAMPLE_RESUME, SAMPLE_JD).await?;
            tailor::output::terminal::display_analysis(&analysis, analyzer.comparator.backend());
        }

        Commands::Status => {
            let config = Config::load()?;
            if !Path::new(&config.db_path).exists() {
                println!("Database: not initialized ({})", config.db_path);
                println!("\nRun `tailor init` to set up the database.");
                return Ok(());
            }
            let db = tailor::db::open_sqlite(&config.db_path)?;
            tailor::status::show(&db, &config.db_path, &config).await?;
        }

        #[cfg(feature = "web")]
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            let db = tailor::db::initialize_sqlite(&config.db_path)?;
            let analyzer = build_analyzer(&config);
            let port = port.unwrap_or(config.web_port);
            let bind = bind.unwrap_or_else(|| config.web_bind.clone());
            tailor::web::run_server(db, analyzer, port, &bind).await?;
        }
    }

    Ok(())
}

/// Create the text embedder for the configured backend.
///
/// The embedding backend falls back to TF-IDF when the model is missing or
/// fails to load, so every command still works before `download-model`.
fn create_embedder(config: &Config) -> Arc<dyn TextEmbedder> {
    match config.similarity_backend {
        SimilarityBackend::TfIdf => {
            info!("Using TF-IDF similarity");
            Arc::new(TfIdfEmbedder::new())
        }
        SimilarityBackend::Embedding => {
            if !config.embedding_model_present() {
                warn!(
                    "Embedding model not downloaded, falling back to TF-IDF. Run `tailor download-model` for semantic matching."
                );
                return Arc::new(TfIdfEmbedder::new());
            }
            let embed_dir = download::embedding_model_dir(&config.model_dir);
            match SentenceEmbedder::load(&embed_dir) {
                Ok(embedder) => {
                    info!("Loaded sentence embedding model");
                    Arc::new(embedder)
                }
                Err(e) => {
                    warn!("Failed to load embedding model, falling back to TF-IDF: {e:#}");
                    Arc::new(TfIdfEmbedder::new())
                }
            }
        }
    }
}

fn build_analyzer(config: &Config) -> Analyzer {
    Analyzer::new(
        SkillExtractor::default(),
        SimilarityComparator::new(create_embedder(config)),
    )
}

fn pasted_document(text: String) -> Result<ParsedDocument> {
    let text = documents::parse_bytes(text.as_bytes(), DocumentFormat::Text)
        .context("Job description text is empty")?;
    Ok(ParsedDocument {
        name: "pasted text".to_string(),
        format: DocumentFormat::Text,
        text,
    })
}

/// Parse job description files concurrently. Parsing is CPU-bound, so each
/// file runs on the blocking pool.
async fn parse_all(paths: &[PathBuf]) -> Result<Vec<ParsedDocument>> {
    let tasks = paths.iter().cloned().map(|path| async move {
        tokio::task::spawn_blocking(move || documents::parse_document(&path))
            .await
            .context("Parser task panicked")?
    });
    futures::future::try_join_all(tasks).await
}

/// Save both documents and the analysis together; returns the analysis ID.
async fn save_analysis(
    db: &Arc<dyn Database>,
    resume: &ParsedDocument,
    jd: &ParsedDocument,
    backend: &str,
    analysis: &MatchAnalysis,
) -> Result<i64> {
    let saved = db
        .save_comparison(
            NewDocument {
                kind: DocumentKind::Resume,
                name: &resume.name,
                format: resume.format,
                text: &resume.text,
                skills: &analysis.resume_skills,
            },
            NewDocument {
                kind: DocumentKind::Job,
                name: &jd.name,
                format: jd.format,
                text: &jd.text,
                skills: &analysis.jd_skills,
            },
            backend,
            analysis,
        )
        .await?;
    Ok(saved.analysis_id)
}
