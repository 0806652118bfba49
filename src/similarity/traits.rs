// Text embedder trait: the swap-ready abstraction behind similarity scoring.
//
// The default implementation is the local ONNX sentence embedder. The TF-IDF
// embedder is the fallback when the model hasn't been downloaded, and the
// backend used in tests.

use anyhow::Result;
use async_trait::async_trait;

/// Turns texts into vectors whose cosine similarity reflects how close the
/// texts are in meaning.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per text in input order.
    ///
    /// All vectors in one batch have the same dimension. Vectors from
    /// different batches are only comparable if the backend's vector space
    /// doesn't depend on the batch (true for sentence embeddings, false for
    /// TF-IDF), so callers compare within a single batch.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>>;

    /// Short backend name recorded alongside stored analyses.
    fn name(&self) -> &'static str;
}
