// Resume-to-job comparison using any TextEmbedder.
//
// Every comparison embeds all of its texts in a single batch. For sentence
// embeddings this is just fewer inference calls; for TF-IDF it is required,
// because term weights are only comparable within one batch.

use std::cmp::Ordering;
use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::sections::split_sections;
use crate::similarity::{cosine_similarity, TextEmbedder};

/// Whole-document and section-level similarity between a resume and a JD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityReport {
    pub overall_similarity: f64,
    /// Mean over every (resume section, JD section) pair
    pub avg_section_similarity: f64,
    pub max_section_similarity: f64,
    pub min_section_similarity: f64,
}

#[derive(Clone)]
pub struct SimilarityComparator {
    embedder: Arc<dyn TextEmbedder>,
}

impl SimilarityComparator {
    pub fn new(embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { embedder }
    }

    /// Name of the embedding backend in use.
    pub fn backend(&self) -> &'static str {
        self.embedder.name()
    }

    /// Cosine similarity between two texts, 0.0 to 1.0.
    pub async fn compute_similarity(&self, text1: &str, text2: &str) -> Result<f64> {
        let vectors = self
            .embedder
            .embed_batch(&[text1.to_string(), text2.to_string()])
            .await?;
        expect_len(&vectors, 2)?;
        Ok(cosine_similarity(&vectors[0], &vectors[1]))
    }

    /// Compare a resume to a job description, whole and section by section.
    ///
    /// Sections are compared across the full cross product. When either
    /// document has no sections, the section scores are all 0.0.
    pub async fn compare_resume_to_jd(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<SimilarityReport> {
        let resume_sections = split_sections(resume_text);
        let jd_sections = split_sections(jd_text);

        // Batch layout: [resume, jd, resume sections..., jd sections...]
        let mut batch = Vec::with_capacity(2 + resume_sections.len() + jd_sections.len());
        batch.push(resume_text.to_string());
        batch.push(jd_text.to_string());
        batch.extend(resume_sections.iter().cloned());
        batch.extend(jd_sections.iter().cloned());

        let vectors = self.embedder.embed_batch(&batch).await?;
        expect_len(&vectors, batch.len())?;

        let overall_similarity = cosine_similarity(&vectors[0], &vectors[1]);

        let resume_vecs = &vectors[2..2 + resume_sections.len()];
        let jd_vecs = &vectors[2 + resume_sections.len()..];

        let section_similarities: Vec<f64> = resume_vecs
            .iter()
            .flat_map(|r| jd_vecs.iter().map(move |j| cosine_similarity(r, j)))
            .collect();

        let report = if section_similarities.is_empty() {
            SimilarityReport {
                overall_similarity,
                avg_section_similarity: 0.0,
                max_section_similarity: 0.0,
                min_section_similarity: 0.0,
            }
        } else {
            let n = section_similarities.len() as f64;
            SimilarityReport {
                overall_similarity,
                avg_section_similarity: section_similarities.iter().sum::<f64>() / n,
                max_section_similarity: section_similarities
                    .iter()
                    .copied()
                    .fold(f64::MIN, f64::max),
                min_section_similarity: section_similarities
                    .iter()
                    .copied()
                    .fold(f64::MAX, f64::min),
            }
        };

        debug!(
            resume_sections = resume_sections.len(),
            jd_sections = jd_sections.len(),
            backend = self.backend(),
            "Compared resume to job description"
        );

        Ok(report)
    }

    /// Rank job descriptions against a resume.
    ///
    /// Returns up to `top_k` (index, similarity) pairs, best first. Equal
    /// scores keep their original order.
    pub async fn find_best_matches(
        &self,
        resume_text: &str,
        jd_list: &[String],
        top_k: usize,
    ) -> Result<Vec<(usize, f64)>> {
        if jd_list.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let mut batch = Vec::with_capacity(jd_list.len() + 1);
        batch.push(resume_text.to_string());
        batch.extend(jd_list.iter().cloned());

        let vectors = self.embedder.embed_batch(&batch).await?;
        expect_len(&vectors, batch.len())?;

        let mut similarities: Vec<(usize, f64)> = vectors[1..]
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(&vectors[0], v)))
            .collect();

        // sort_by is stable, so ties stay in index order
        similarities.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        similarities.truncate(top_k);

        info!(
            candidates = jd_list.len(),
            returned = similarities.len(),
            "Ranked job descriptions"
        );

        Ok(similarities)
    }
}

fn expect_len(vectors: &[Vec<f64>], expected: usize) -> Result<()> {
    if vectors.len() != expected {
        anyhow::bail!(
            "Embedder returned {} vectors for {} texts",
            vectors.len(),
            expected
        );
    }
    Ok(())
}
