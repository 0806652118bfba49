use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Which similarity backend to use for document comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityBackend {
    /// Local ONNX sentence embeddings (default). Needs `tailor download-model`.
    Embedding,
    /// TF-IDF term vectors. No model files, fully deterministic.
    TfIdf,
}

impl SimilarityBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityBackend::Embedding => "embedding",
            SimilarityBackend::TfIdf => "tfidf",
        }
    }
}

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
pub struct Config {
    pub db_path: String,
    /// Directory containing the ONNX embedding model files
    pub model_dir: PathBuf,
    /// Which similarity backend to use (default: Embedding)
    pub similarity_backend: SimilarityBackend,
    /// Port for the web dashboard (TAILOR_WEB_PORT, default 8080)
    #[cfg(feature = "web")]
    pub web_port: u16,
    /// Bind address for the web dashboard (TAILOR_WEB_BIND, default 127.0.0.1)
    #[cfg(feature = "web")]
    pub web_bind: String,
}

impl Config {
    /// Load configuration from environment variables. Every value has a default.
    pub fn load() -> Result<Self> {
        let similarity_backend = match env::var("TAILOR_SIMILARITY").as_deref() {
            Ok("tfidf") => SimilarityBackend::TfIdf,
            // "embedding" or unset both default to embeddings
            Ok("embedding") | Err(_) => SimilarityBackend::Embedding,
            Ok(other) => anyhow::bail!(
                "Unknown TAILOR_SIMILARITY value {other:?}. Use \"embedding\" or \"tfidf\"."
            ),
        };

        let model_dir = env::var("TAILOR_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::similarity::download::default_model_dir());

        #[cfg(feature = "web")]
        let web_port = match env::var("TAILOR_WEB_PORT") {
            Ok(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("TAILOR_WEB_PORT must be a port number, got {port:?}"))?,
            Err(_) => 8080,
        };

        Ok(Self {
            db_path: env::var("TAILOR_DB_PATH").unwrap_or_else(|_| "./tailor.db".to_string()),
            model_dir,
            similarity_backend,
            #[cfg(feature = "web")]
            web_port,
            #[cfg(feature = "web")]
            web_bind: env::var("TAILOR_WEB_BIND").unwrap_or_else(|_| "127.0.0.1".to_string()),
        })
    }

    /// Whether the embedding model files have been downloaded.
    pub fn embedding_model_present(&self) -> bool {
        crate::similarity::download::embedding_files_present(&self.model_dir)
    }
}
