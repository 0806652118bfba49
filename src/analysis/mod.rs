// Analysis: skill gaps, category distribution and recommendations.
//
// Combines skill extraction with similarity scoring into one MatchAnalysis:
// the record that gets displayed, persisted and served as JSON.

pub mod analyzer;
pub mod gap;
pub mod recommend;

pub use analyzer::{Analyzer, MatchAnalysis};
pub use gap::{category_distribution, skill_gap, CategoryCount, SkillGap};
pub use recommend::{recommendations, Level, Recommendation};
