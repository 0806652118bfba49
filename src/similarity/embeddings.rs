// Sentence embedding-based similarity using all-MiniLM-L6-v2.
//
// Resumes and job descriptions rarely use the same words for the same thing
// ("built REST services" vs "backend API development"). Embedding the text
// into 384-dimensional vectors with a sentence transformer lets cosine
// similarity capture that semantic closeness.
//
// The model runs locally via ONNX. Mean pooling is applied to token embeddings
// (matching the model's training). The model only sees a limited number of
// tokens, so long documents are split into word windows that are embedded
// separately and averaged.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::Tokenizer;
use tracing::debug;

use super::traits::TextEmbedder;

/// Embedding dimension for all-MiniLM-L6-v2.
pub const EMBEDDING_DIM: usize = 384;

/// Token budget per window. all-MiniLM-L6-v2 was trained on 256 word pieces.
const MAX_TOKENS: usize = 256;

/// Words per window. Leaves headroom for word-piece splitting.
const WINDOW_WORDS: usize = 150;

/// Windows per inference call, to bound tensor size on long documents.
const INFERENCE_BATCH: usize = 32;

/// Sentence embedder using a local ONNX model.
///
/// Arc<Mutex<Session>> for thread safety, Arc<Tokenizer> for shared
/// ownership across spawn_blocking.
pub struct SentenceEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
}

impl SentenceEmbedder {
    /// Load the sentence embedding model and tokenizer from the given directory.
    ///
    /// Expects `model.onnx` and `tokenizer.json` in the directory.
    /// Call `download_model()` first if they don't exist.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            anyhow::bail!(
                "Embedding model not found: {}\nRun `tailor download-model` to download it.",
                model_path.display()
            );
        }
        if !tokenizer_path.exists() {
            anyhow::bail!(
                "Embedding tokenizer not found: {}\nRun `tailor download-model` to download it.",
                tokenizer_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| {
                format!(
                    "Failed to load embedding model from {}",
                    model_path.display()
                )
            })?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load embedding tokenizer: {}", e))?;

        debug!(
            "Loaded sentence embedding model from {}",
            model_dir.display()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
        })
    }
}

#[async_trait]
impl TextEmbedder for SentenceEmbedder {
    /// Embed a batch of documents into 384-dimensional vectors.
    ///
    /// Each document is split into word windows, every window is run through
    /// the model, and the window vectors are averaged per document. An empty
    /// document gets the zero vector.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || embed_documents(&session, &tokenizer, &texts))
            .await
            .context("spawn_blocking panicked")?
    }

    fn name(&self) -> &'static str {
        "embedding"
    }
}

/// Split each document into windows, embed all windows, and pool per document.
fn embed_documents(
    session: &Arc<Mutex<Session>>,
    tokenizer: &Arc<Tokenizer>,
    texts: &[String],
) -> Result<Vec<Vec<f64>>> {
    // (start, end) into `windows` for each document
    let mut spans = Vec::with_capacity(texts.len());
    let mut windows: Vec<String> = Vec::new();
    for text in texts {
        let start = windows.len();
        windows.extend(word_windows(text, WINDOW_WORDS));
        spans.push((start, windows.len()));
    }

    let mut window_embeddings = Vec::with_capacity(windows.len());
    for chunk in windows.chunks(INFERENCE_BATCH) {
        window_embeddings.extend(embed_sync(session, tokenizer, chunk)?);
    }

    Ok(spans
        .into_iter()
        .map(|(start, end)| {
            if start == end {
                vec![0.0; EMBEDDING_DIM]
            } else {
                mean_embedding(&window_embeddings[start..end])
            }
        })
        .collect())
}

/// Split text into windows of at most `size` whitespace-separated words.
pub fn word_windows(text: &str, size: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(size.max(1))
        .map(|chunk| chunk.join(" "))
        .collect()
}

/// Synchronous embedding: runs tokenization, inference, and mean pooling.
/// Called from spawn_blocking to avoid blocking the async runtime.
fn embed_sync(
    session: &Arc<Mutex<Session>>,
    tokenizer: &Arc<Tokenizer>,
    texts: &[String],
) -> Result<Vec<Vec<f64>>> {
    let encodings: Vec<_> = texts
        .iter()
        .map(|t| {
            tokenizer
                .encode(t.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
        })
        .collect::<Result<Vec<_>>>()?;

    let batch_size = encodings.len();
    let max_len = encodings
        .iter()
        .map(|e| e.get_ids().len().min(MAX_TOKENS))
        .max()
        .unwrap_or(0);

    if max_len == 0 {
        return Ok(vec![vec![0.0; EMBEDDING_DIM]; batch_size]);
    }

    // Build padded input tensors. BERT uses:
    //   input_ids: token IDs (pad with 0)
    //   attention_mask: 1 for real tokens, 0 for padding
    //   token_type_ids: all zeros for single-sentence input
    let mut input_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
    let mut attention_mask_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);
    let mut token_type_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * max_len);

    for enc in &encodings {
        let seq_len = enc.get_ids().len().min(MAX_TOKENS);
        let ids = &enc.get_ids()[..seq_len];
        let mask = &enc.get_attention_mask()[..seq_len];

        input_ids_flat.extend(ids.iter().map(|&id| id as i64));
        attention_mask_flat.extend(mask.iter().map(|&m| m as i64));
        token_type_ids_flat.extend(std::iter::repeat_n(0i64, seq_len));

        let pad_len = max_len - seq_len;
        input_ids_flat.extend(std::iter::repeat_n(0i64, pad_len));
        attention_mask_flat.extend(std::iter::repeat_n(0i64, pad_len));
        token_type_ids_flat.extend(std::iter::repeat_n(0i64, pad_len));
    }

    let shape = [batch_size as i64, max_len as i64];

    let input_ids_tensor =
        Tensor::from_array((shape, input_ids_flat)).context("Failed to create input_ids tensor")?;
    let attention_mask_tensor = Tensor::from_array((shape, attention_mask_flat.clone()))
        .context("Failed to create attention_mask tensor")?;
    let token_type_ids_tensor = Tensor::from_array((shape, token_type_ids_flat))
        .context("Failed to create token_type_ids tensor")?;

    // Output is last_hidden_state: [batch, seq_len, 384]
    let hidden_states = {
        let mut session = session
            .lock()
            .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

        let outputs = session
            .run(ort::inputs! {
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
                "token_type_ids" => token_type_ids_tensor
            })
            .context("Embedding ONNX inference failed")?;

        let (_shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .context("Failed to extract embedding output tensor")?;

        data.to_vec()
    };

    // Mean pooling: sum (token_embedding * attention_mask) across tokens,
    // then divide by the sum of the attention mask.
    let mut embeddings = Vec::with_capacity(batch_size);

    for i in 0..batch_size {
        let mut sum = vec![0.0_f64; EMBEDDING_DIM];
        let mut mask_sum = 0.0_f64;

        for j in 0..max_len {
            let mask_val = attention_mask_flat[i * max_len + j] as f64;
            if mask_val > 0.0 {
                mask_sum += mask_val;
                let offset = (i * max_len + j) * EMBEDDING_DIM;
                for k in 0..EMBEDDING_DIM {
                    sum[k] += hidden_states[offset + k] as f64 * mask_val;
                }
            }
        }

        if mask_sum > 0.0 {
            for val in &mut sum {
                *val /= mask_sum;
            }
        }

        embeddings.push(sum);
    }

    debug!(
        batch_size = batch_size,
        dim = EMBEDDING_DIM,
        "Computed sentence embeddings"
    );

    Ok(embeddings)
}

/// Compute the element-wise mean of embedding vectors.
///
/// The dimension is taken from the first vector; shorter vectors contribute
/// zeros past their end and longer ones are cut off. Empty input gives an
/// empty vector.
pub fn mean_embedding(embeddings: &[Vec<f64>]) -> Vec<f64> {
    let Some(first) = embeddings.first() else {
        return Vec::new();
    };

    let dim = first.len();
    let n = embeddings.len() as f64;
    let mut mean = vec![0.0_f64; dim];

    for emb in embeddings {
        for (i, &val) in emb.iter().take(dim).enumerate() {
            mean[i] += val;
        }
    }

    for val in &mut mean {
        *val /= n;
    }

    mean
}

/// Cosine similarity between two vectors, clamped to 0.0..=1.0.
///
/// Mismatched dimensions, empty vectors and zero vectors all score 0.0.
/// Negative similarity (opposite directions) also clamps to 0.0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}
