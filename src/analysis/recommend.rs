// Recommendations: advice keyed off the overall similarity score.
//
// Bands break at 0.8, 0.6 and 0.4; below 0.4 the Poor and Very Poor
// grades share the same advice.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::gap::SkillGap;

/// How many missing skills a recommendation names.
const MISSING_SKILLS_SHOWN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Warning,
    Critical,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Critical => "critical",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub level: Level,
    pub message: String,
}

impl Recommendation {
    fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Build recommendations from the overall similarity and the skill gap.
pub fn recommendations(score: f64, gap: &SkillGap) -> Vec<Recommendation> {
    let missing = (!gap.missing.is_empty()).then(|| {
        gap.missing
            .iter()
            .take(MISSING_SKILLS_SHOWN)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    });

    let mut recs = Vec::new();

    if score >= 0.8 {
        recs.push(Recommendation::new(
            Level::Success,
            "Excellent match! Your resume is well-aligned with this job description.",
        ));
        recs.push(Recommendation::new(
            Level::Info,
            "Consider tailoring your resume further by emphasizing the matching skills in your experience section.",
        ));
    } else if score >= 0.6 {
        recs.push(Recommendation::new(
            Level::Info,
            "Good match! Your resume has strong alignment with the job requirements.",
        ));
        if let Some(list) = missing {
            recs.push(Recommendation::new(
                Level::Warning,
                format!("Consider highlighting or acquiring these skills: {list}"),
            ));
        }
    } else if score >= 0.4 {
        recs.push(Recommendation::new(
            Level::Warning,
            "Fair match. Your resume partially matches the job requirements.",
        ));
        if let Some(list) = missing {
            recs.push(Recommendation::new(
                Level::Critical,
                format!("Focus on developing these key skills: {list}"),
            ));
        }
    } else {
        recs.push(Recommendation::new(
            Level::Critical,
            "Poor match. Significant gaps exist between your resume and job requirements.",
        ));
        if let Some(list) = missing {
            recs.push(Recommendation::new(
                Level::Critical,
                format!("Priority skills to develop: {list}"),
            ));
        }
    }

    recs
}
