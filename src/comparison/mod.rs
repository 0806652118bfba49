// Comparison: resume vs job description similarity and match grading.

pub mod comparator;
pub mod quality;
pub mod sections;

pub use comparator::{SimilarityComparator, SimilarityReport};
pub use quality::MatchQuality;
pub use sections::split_sections;
