// The full resume vs job description pass.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::gap::{category_distribution, skill_gap, CategoryCount, SkillGap};
use super::recommend::{recommendations, Recommendation};
use crate::comparison::{MatchQuality, SimilarityComparator, SimilarityReport};
use crate::skills::{SkillCategory, SkillExtractor};

/// Everything known about one resume/job pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAnalysis {
    pub resume_skills: Vec<String>,
    pub jd_skills: Vec<String>,
    pub resume_categories: BTreeMap<SkillCategory, Vec<String>>,
    pub jd_categories: BTreeMap<SkillCategory, Vec<String>>,
    pub similarity: SimilarityReport,
    pub quality: MatchQuality,
    pub gap: SkillGap,
    pub distribution: Vec<CategoryCount>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Clone)]
pub struct Analyzer {
    pub extractor: SkillExtractor,
    pub comparator: SimilarityComparator,
}

impl Analyzer {
    pub fn new(extractor: SkillExtractor, comparator: SimilarityComparator) -> Self {
        Self {
            extractor,
            comparator,
        }
    }

    pub async fn analyze(&self, resume_text: &str, jd_text: &str) -> Result<MatchAnalysis> {
        if resume_text.trim().is_empty() {
            bail!("Resume text is empty");
        }
        if jd_text.trim().is_empty() {
            bail!("Job description text is empty");
        }

        let resume_skills = self.extractor.extract_skills(resume_text);
        let jd_skills = self.extractor.extract_skills(jd_text);
        let resume_categories = self.extractor.categorize_skills(&resume_skills);
        let jd_categories = self.extractor.categorize_skills(&jd_skills);

        let similarity = self
            .comparator
            .compare_resume_to_jd(resume_text, jd_text)
            .await?;
        let quality = MatchQuality::from_score(similarity.overall_similarity);

        let gap = skill_gap(&resume_skills, &jd_skills);
        let distribution = category_distribution(&resume_categories, &jd_categories);
        let recommendations = recommendations(similarity.overall_similarity, &gap);

        info!(
            overall = format!("{:.3}", similarity.overall_similarity),
            quality = %quality,
            matching = gap.matching.len(),
            missing = gap.missing.len(),
            backend = self.comparator.backend(),
            "Analysis complete"
        );

        Ok(MatchAnalysis {
            resume_skills,
            jd_skills,
            resume_categories,
            jd_categories,
            similarity,
            quality,
            gap,
            distribution,
            recommendations,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::similarity::TfIdfEmbedder;

    fn analyzer() -> Analyzer {
        Analyzer::new(
            SkillExtractor::catalog_only(),
            SimilarityComparator::new(Arc::new(TfIdfEmbedder::new())),
        )
    }

    #[tokio::test]
    async fn test_rejects_empty_text() {
        let a = analyzer();
        assert!(a.analyze("   ", "Rust engineer").await.is_err());
        assert!(a.analyze("Rust engineer", "").await.is_err());
    }

    #[tokio::test]
    async fn test_analysis_is_consistent() {
        let analysis = analyzer()
            .analyze(
                "Python developer with Django and AWS experience",
                "Looking for Python and Kubernetes on AWS",
            )
            .await
            .unwrap();

        assert_eq!(analysis.gap.matching, vec!["aws", "python"]);
        assert_eq!(analysis.gap.missing, vec!["kubernetes"]);
        assert_eq!(analysis.gap.extra, vec!["django"]);
        assert_eq!(
            analysis.quality,
            MatchQuality::from_score(analysis.similarity.overall_similarity)
        );
        assert!(!analysis.recommendations.is_empty());
        assert!(analysis
            .distribution
            .iter()
            .any(|c| c.category == SkillCategory::Tools && c.job == 2));
    }
}
