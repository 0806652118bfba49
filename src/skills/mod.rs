// Skill extraction: catalog matching, term discovery, and categorization.

pub mod catalog;
pub mod extractor;
pub mod terms;

pub use catalog::{SkillCatalog, SkillCategory};
pub use extractor::SkillExtractor;
