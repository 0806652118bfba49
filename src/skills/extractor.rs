// Skill extractor: catalog matching plus optional term discovery.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use super::catalog::{SkillCatalog, SkillCategory};
use super::terms::{self, FILTERED_TERMS};
use crate::text;

/// Extracts skills from resume or job description text.
#[derive(Debug, Clone)]
pub struct SkillExtractor {
    pub catalog: SkillCatalog,
    /// Also return TF-IDF-discovered terms that aren't in the catalog
    pub discover_terms: bool,
    /// Upper bound on discovered terms per document
    pub max_discovered: usize,
}

impl Default for SkillExtractor {
    fn default() -> Self {
        Self {
            catalog: SkillCatalog::default(),
            discover_terms: true,
            max_discovered: 25,
        }
    }
}

impl SkillExtractor {
    /// An extractor that only reports catalog skills.
    pub fn catalog_only() -> Self {
        Self {
            discover_terms: false,
            ..Self::default()
        }
    }

    /// Extract skills from text. The result is lowercase, deduplicated and sorted.
    pub fn extract_skills(&self, text: &str) -> Vec<String> {
        let normalized = text::normalize(text);
        if normalized.is_empty() {
            return Vec::new();
        }

        let tokens = text::tokenize(&normalized);
        let mut found: BTreeSet<String> = self.match_catalog(&tokens);
        let catalog_hits = found.len();

        if self.discover_terms {
            for term in terms::discover_terms(text, self.max_discovered) {
                found.insert(term);
            }
        }

        // Catalog skills are always kept, even short ones like "go".
        let skills: Vec<String> = found
            .into_iter()
            .filter(|s| {
                self.catalog.contains(s)
                    || (s.chars().count() > 2 && !FILTERED_TERMS.contains(&s.as_str()))
            })
            .collect();

        debug!(
            catalog = catalog_hits,
            total = skills.len(),
            "Extracted skills"
        );

        skills
    }

    /// Group skills by catalog category. Skills outside the catalog are
    /// omitted, and so are categories with no skills.
    pub fn categorize_skills(&self, skills: &[String]) -> BTreeMap<SkillCategory, Vec<String>> {
        let mut categorized: BTreeMap<SkillCategory, Vec<String>> = BTreeMap::new();
        for skill in skills {
            if let Some(category) = self.catalog.category_of(skill) {
                let entry = categorized.entry(category).or_default();
                if !entry.contains(skill) {
                    entry.push(skill.clone());
                }
            }
        }
        categorized
    }

    /// Token-aware catalog matching.
    ///
    /// A skill matches when its tokens appear consecutively, when a
    /// slash- or dot-separated part equals it ("javascript/typescript",
    /// "react.js"), or when its space-removed form is a single token
    /// ("problemsolving").
    fn match_catalog(&self, tokens: &[String]) -> BTreeSet<String> {
        let token_set: HashSet<&str> = tokens.iter().map(String::as_str).collect();
        let compound_parts: HashSet<&str> = tokens
            .iter()
            .filter(|t| t.contains(['/', '.']))
            .flat_map(|t| t.split(['/', '.']))
            .filter(|p| !p.is_empty())
            .collect();

        let mut found = BTreeSet::new();
        for skill in self.catalog.skills() {
            let skill_tokens = text::tokenize(skill);
            let matched = match skill_tokens.as_slice() {
                [] => false,
                [single] => token_set.contains(single.as_str()) || compound_parts.contains(single.as_str()),
                multi => {
                    tokens.windows(multi.len()).any(|w| w == multi)
                        || token_set.contains(skill.replace(' ', "").as_str())
                }
            };
            if matched {
                found.insert(skill.to_string());
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_only() -> SkillExtractor {
        SkillExtractor::catalog_only()
    }

    #[test]
    fn test_empty_text() {
        assert!(SkillExtractor::default().extract_skills("").is_empty());
        assert!(SkillExtractor::default().extract_skills("  \n\t").is_empty());
    }

    #[test]
    fn test_catalog_skills_sorted_and_deduped() {
        let skills = catalog_only().extract_skills("Rust, Python, rust and PYTHON. Docker!");
        assert_eq!(skills, vec!["docker", "python", "rust"]);
    }

    #[test]
    fn test_punctuated_skill_names() {
        let skills =
            catalog_only().extract_skills("Shipped C++ and C# services with CI/CD and scikit-learn.");
        assert_eq!(skills, vec!["c#", "c++", "ci/cd", "scikit-learn"]);
    }

    #[test]
    fn test_go_not_matched_inside_other_words() {
        let skills = catalog_only().extract_skills("Worked at Google on MongoDB tooling");
        assert_eq!(skills, vec!["mongodb"]);
    }

    #[test]
    fn test_short_catalog_skill_kept() {
        let skills = catalog_only().extract_skills("Backend services in Go");
        assert_eq!(skills, vec!["go"]);
    }

    #[test]
    fn test_multi_word_skills() {
        let skills = catalog_only()
            .extract_skills("Strong problem solving on SQL Server; analytical   thinking.");
        assert_eq!(
            skills,
            vec!["analytical thinking", "problem solving", "sql server"]
        );
    }

    #[test]
    fn test_compact_multi_word_form() {
        let skills = catalog_only().extract_skills("Skills: problemsolving, sqlserver");
        assert_eq!(skills, vec!["problem solving", "sql server"]);
    }

    #[test]
    fn test_slash_separated_parts() {
        let skills = catalog_only().extract_skills("JavaScript/TypeScript and AWS/GCP");
        assert_eq!(skills, vec!["aws", "gcp", "javascript"]);
    }

    #[test]
    fn test_dotted_framework_names() {
        let skills = catalog_only().extract_skills("Built UIs in React.js and Vue.js on Node.js");
        assert_eq!(skills, vec!["react", "vue"]);
        let skills = catalog_only().extract_skills("Migrated from Angular.js.");
        assert_eq!(skills, vec!["angular"]);
    }

    #[test]
    fn test_discovery_keeps_catalog_and_filters_generic_words() {
        let extractor = SkillExtractor::default();
        let skills = extractor.extract_skills(
            "Built Terraform modules for AWS.\nAutomated Ansible playbooks.\n\
             Years of experience with team project work.",
        );
        assert!(skills.contains(&"aws".to_string()));
        for word in ["team", "project", "work", "years", "experience"] {
            assert!(!skills.contains(&word.to_string()), "{word} should be filtered");
        }
        let mut sorted = skills.clone();
        sorted.sort();
        assert_eq!(skills, sorted);
    }

    #[test]
    fn test_categorize_skills() {
        let extractor = catalog_only();
        let skills: Vec<String> = ["django", "docker", "python", "terraform", "agile"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let categories = extractor.categorize_skills(&skills);

        assert_eq!(categories.len(), 4);
        assert_eq!(categories[&SkillCategory::ProgrammingLanguages], vec!["python"]);
        assert_eq!(categories[&SkillCategory::Frameworks], vec!["django"]);
        assert_eq!(categories[&SkillCategory::Tools], vec!["docker"]);
        assert_eq!(categories[&SkillCategory::Methodologies], vec!["agile"]);
        assert!(!categories.contains_key(&SkillCategory::Databases));
    }

    #[test]
    fn test_categorize_empty() {
        assert!(catalog_only().categorize_skills(&[]).is_empty());
    }
}
