// Skill catalog. The fixed vocabulary of known skills, grouped by category.
//
// Catalog skills are matched exactly (token-aware) and are the only skills
// that get categorized. Terms discovered outside the catalog still count for
// the gap analysis but show up uncategorized.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Skill categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    ProgrammingLanguages,
    Frameworks,
    Databases,
    Tools,
    SoftSkills,
    Methodologies,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 6] = [
        SkillCategory::ProgrammingLanguages,
        SkillCategory::Frameworks,
        SkillCategory::Databases,
        SkillCategory::Tools,
        SkillCategory::SoftSkills,
        SkillCategory::Methodologies,
    ];

    /// Lowercase label, e.g. "programming languages".
    pub fn label(&self) -> &'static str {
        match self {
            SkillCategory::ProgrammingLanguages => "programming languages",
            SkillCategory::Frameworks => "frameworks",
            SkillCategory::Databases => "databases",
            SkillCategory::Tools => "tools",
            SkillCategory::SoftSkills => "soft skills",
            SkillCategory::Methodologies => "methodologies",
        }
    }

    /// Title-cased label for headings, e.g. "Programming Languages".
    pub fn title(&self) -> &'static str {
        match self {
            SkillCategory::ProgrammingLanguages => "Programming Languages",
            SkillCategory::Frameworks => "Frameworks",
            SkillCategory::Databases => "Databases",
            SkillCategory::Tools => "Tools",
            SkillCategory::SoftSkills => "Soft Skills",
            SkillCategory::Methodologies => "Methodologies",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// The known-skill vocabulary. Skills are stored lowercase.
#[derive(Debug, Clone)]
pub struct SkillCatalog {
    categories: BTreeMap<SkillCategory, Vec<String>>,
}

impl Default for SkillCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        catalog.extend(
            SkillCategory::ProgrammingLanguages,
            &[
                "python", "java", "javascript", "c++", "c#", "ruby", "php", "go", "rust",
                "swift", "kotlin",
            ],
        );
        catalog.extend(
            SkillCategory::Frameworks,
            &[
                "django", "flask", "react", "angular", "vue", "spring", "hibernate",
                "tensorflow", "pytorch", "scikit-learn",
            ],
        );
        catalog.extend(
            SkillCategory::Databases,
            &["mysql", "postgresql", "mongodb", "redis", "sqlite", "oracle", "sql server"],
        );
        catalog.extend(
            SkillCategory::Tools,
            &["git", "docker", "kubernetes", "jenkins", "aws", "azure", "gcp", "linux", "windows"],
        );
        catalog.extend(
            SkillCategory::SoftSkills,
            &["communication", "leadership", "teamwork", "problem solving", "analytical thinking"],
        );
        catalog.extend(
            SkillCategory::Methodologies,
            &["agile", "scrum", "kanban", "waterfall", "devops", "ci/cd"],
        );
        catalog
    }
}

impl SkillCatalog {
    /// A catalog with no skills. Useful for building a custom vocabulary.
    pub fn empty() -> Self {
        Self {
            categories: BTreeMap::new(),
        }
    }

    /// Add skills to a category. Skills are lowercased; duplicates are ignored.
    pub fn extend(&mut self, category: SkillCategory, skills: &[&str]) {
        let entry = self.categories.entry(category).or_default();
        for skill in skills {
            let skill = skill.trim().to_lowercase();
            if !skill.is_empty() && !entry.contains(&skill) {
                entry.push(skill);
            }
        }
    }

    /// The first category (in display order) that lists this skill.
    pub fn category_of(&self, skill: &str) -> Option<SkillCategory> {
        self.categories
            .iter()
            .find(|(_, skills)| skills.iter().any(|s| s == skill))
            .map(|(category, _)| *category)
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.category_of(skill).is_some()
    }

    /// Every catalog skill, across all categories.
    pub fn skills(&self) -> impl Iterator<Item = &str> {
        self.categories.values().flatten().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
