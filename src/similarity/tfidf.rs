// TF-IDF term vectors: the model-free similarity backend.
//
// The vocabulary and document frequencies are built over the batch being
// embedded, so vectors are only comparable within one batch. Weights are
// term frequency times smoothed inverse document frequency:
//
//   idf(t) = ln((1 + n) / (1 + df(t))) + 1
//
// The +1 keeps terms shared by every document from dropping to zero weight,
// which matters when the batch is just a resume and one job description.

use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::Result;
use async_trait::async_trait;
use stop_words::{get, LANGUAGE};

use super::traits::TextEmbedder;
use crate::text;

pub struct TfIdfEmbedder {
    stop_words: HashSet<String>,
}

impl Default for TfIdfEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl TfIdfEmbedder {
    pub fn new() -> Self {
        Self {
            stop_words: get(LANGUAGE::English).into_iter().collect(),
        }
    }

    fn terms(&self, doc: &str) -> Vec<String> {
        text::tokenize(&text::normalize(doc))
            .into_iter()
            .filter(|t| t.chars().count() > 1 && !self.stop_words.contains(t))
            .collect()
    }

    /// Dense TF-IDF vectors for every document, over the batch vocabulary.
    pub fn term_vectors(&self, docs: &[String]) -> Vec<Vec<f64>> {
        let tokenized: Vec<Vec<String>> = docs.iter().map(|d| self.terms(d)).collect();

        // BTreeMap keeps vocabulary indices deterministic
        let mut vocab: BTreeMap<&str, usize> = BTreeMap::new();
        for terms in &tokenized {
            for term in terms {
                vocab.entry(term.as_str()).or_insert(0);
            }
        }
        for (index, slot) in vocab.values_mut().enumerate() {
            *slot = index;
        }

        let mut doc_freq = vec![0usize; vocab.len()];
        for terms in &tokenized {
            let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();
            for term in unique {
                doc_freq[vocab[term]] += 1;
            }
        }

        let n = docs.len() as f64;
        let idf: Vec<f64> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        tokenized
            .iter()
            .map(|terms| {
                let mut vector = vec![0.0; vocab.len()];
                if terms.is_empty() {
                    return vector;
                }
                let mut counts: HashMap<&str, usize> = HashMap::new();
                for term in terms {
                    *counts.entry(term.as_str()).or_insert(0) += 1;
                }
                let len = terms.len() as f64;
                for (term, count) in counts {
                    let i = vocab[term];
                    vector[i] = (count as f64 / len) * idf[i];
                }
                vector
            })
            .collect()
    }
}

#[async_trait]
impl TextEmbedder for TfIdfEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        Ok(self.term_vectors(texts))
    }

    fn name(&self) -> &'static str {
        "tfidf"
    }
}
