// Similarity: text embeddings and cosine scoring.
//
// Two backends behind the TextEmbedder trait: local ONNX sentence embeddings
// (semantic) and TF-IDF term vectors (lexical, no model needed).

pub mod download;
pub mod embeddings;
pub mod tfidf;
pub mod traits;

pub use embeddings::{cosine_similarity, mean_embedding, SentenceEmbedder};
pub use tfidf::TfIdfEmbedder;
pub use traits::TextEmbedder;
