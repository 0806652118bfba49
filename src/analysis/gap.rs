// Skill gap and per-category skill counts.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::skills::SkillCategory;

/// How the resume's skills line up against the job's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    /// Skills in both documents
    pub matching: Vec<String>,
    /// Skills the job asks for that the resume lacks
    pub missing: Vec<String>,
    /// Skills on the resume the job doesn't mention
    pub extra: Vec<String>,
}

/// Resume and job skill counts for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: SkillCategory,
    pub resume: usize,
    pub job: usize,
}

/// Set differences between resume and job skills. Every list is sorted.
pub fn skill_gap(resume_skills: &[String], jd_skills: &[String]) -> SkillGap {
    let resume: BTreeSet<&str> = resume_skills.iter().map(String::as_str).collect();
    let job: BTreeSet<&str> = jd_skills.iter().map(String::as_str).collect();

    SkillGap {
        matching: resume.intersection(&job).map(|s| s.to_string()).collect(),
        missing: job.difference(&resume).map(|s| s.to_string()).collect(),
        extra: resume.difference(&job).map(|s| s.to_string()).collect(),
    }
}

/// Counts for every category present in either document, in category order.
pub fn category_distribution(
    resume_cats: &BTreeMap<SkillCategory, Vec<String>>,
    jd_cats: &BTreeMap<SkillCategory, Vec<String>>,
) -> Vec<CategoryCount> {
    let categories: BTreeSet<SkillCategory> =
        resume_cats.keys().chain(jd_cats.keys()).copied().collect();

    categories
        .into_iter()
        .map(|category| CategoryCount {
            category,
            resume: resume_cats.get(&category).map_or(0, Vec::len),
            job: jd_cats.get(&category).map_or(0, Vec::len),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(s: &[&str]) -> Vec<String> {
        s.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_gap_partitions() {
        let gap = skill_gap(
            &skills(&["python", "django", "aws", "react"]),
            &skills(&["python", "javascript", "aws", "kubernetes"]),
        );
        assert_eq!(gap.matching, skills(&["aws", "python"]));
        assert_eq!(gap.missing, skills(&["javascript", "kubernetes"]));
        assert_eq!(gap.extra, skills(&["django", "react"]));
    }

    #[test]
    fn test_gap_with_duplicates_and_empty() {
        let gap = skill_gap(&skills(&["go", "go"]), &[]);
        assert!(gap.matching.is_empty());
        assert!(gap.missing.is_empty());
        assert_eq!(gap.extra, skills(&["go"]));
    }

    #[test]
    fn test_distribution_is_union_in_category_order() {
        let mut resume = BTreeMap::new();
        resume.insert(SkillCategory::Tools, skills(&["docker", "git"]));
        let mut job = BTreeMap::new();
        job.insert(SkillCategory::ProgrammingLanguages, skills(&["rust"]));
        job.insert(SkillCategory::Tools, skills(&["docker"]));

        let dist = category_distribution(&resume, &job);
        assert_eq!(
            dist,
            vec![
                CategoryCount {
                    category: SkillCategory::ProgrammingLanguages,
                    resume: 0,
                    job: 1,
                },
                CategoryCount {
                    category: SkillCategory::Tools,
                    resume: 2,
                    job: 1,
                },
            ]
        );
    }
}
