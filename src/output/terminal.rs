// Colored terminal output for skills, analyses and history.
//
// This module handles all terminal-specific formatting: colors, tables and
// bar charts. The main.rs command handlers delegate here.

use std::collections::{BTreeMap, BTreeSet};

use colored::{ColoredString, Colorize};

use super::{preview_list, truncate_chars};
use crate::analysis::{Level, MatchAnalysis};
use crate::db::models::AnalysisRecord;
use crate::skills::SkillCategory;

/// Skills shown per list before collapsing into "+N more".
pub const SKILL_PREVIEW: usize = 20;
/// Gap list entries shown per column.
pub const GAP_PREVIEW: usize = 10;

const GAUGE_WIDTH: usize = 30;

/// Display extracted skills, grouped by category.
pub fn display_skills(
    title: &str,
    skills: &[String],
    categories: &BTreeMap<SkillCategory, Vec<String>>,
) {
    println!(
        "\n{}",
        format!("=== {title} ({} skills) ===", skills.len()).bold()
    );

    if skills.is_empty() {
        println!("  No skills found.");
        return;
    }

    for (category, members) in categories {
        println!("\n  {}", category.title().cyan().bold());
        println!("    {}", skill_line(members, SKILL_PREVIEW));
    }

    let categorized: BTreeSet<&str> = categories
        .values()
        .flatten()
        .map(String::as_str)
        .collect();
    let other: Vec<String> = skills
        .iter()
        .filter(|s| !categorized.contains(s.as_str()))
        .cloned()
        .collect();
    if !other.is_empty() {
        println!("\n  {}", "Other Terms".cyan().bold());
        println!("    {}", skill_line(&other, SKILL_PREVIEW));
    }
}

/// Display a full resume vs job description analysis.
pub fn display_analysis(analysis: &MatchAnalysis, backend: &str) {
    let sim = &analysis.similarity;

    println!("\n{}", "=== Match Analysis ===".bold());
    println!(
        "  {} {}",
        "Similarity backend:".dimmed(),
        backend.dimmed()
    );
    println!();
    println!(
        "  Overall match:       {}",
        colorize_score(sim.overall_similarity, &percent(sim.overall_similarity))
    );
    println!(
        "  Avg section match:   {}",
        percent(sim.avg_section_similarity)
    );
    println!(
        "  Section range:       {} to {}",
        percent(sim.min_section_similarity),
        percent(sim.max_section_similarity)
    );
    println!("  Resume skills:       {}", analysis.resume_skills.len());
    println!("  Required skills:     {}", analysis.jd_skills.len());

    println!("\n{}", "--- Skills Match ---".bold());
    display_gap_list(
        "Matching skills",
        "found",
        &analysis.gap.matching,
        |s| s.green(),
    );
    display_gap_list(
        "Skills to develop",
        "needed",
        &analysis.gap.missing,
        |s| s.yellow(),
    );
    display_gap_list(
        "Additional skills",
        "extra",
        &analysis.gap.extra,
        |s| s.normal(),
    );

    if !analysis.distribution.is_empty() {
        println!("\n{}", "--- Skills by Category ---".bold());
        println!(
            "  {:<22} {}",
            "".dimmed(),
            format!("{} resume  {} job", "■".blue(), "■".magenta()).dimmed()
        );
        for count in &analysis.distribution {
            println!(
                "  {:<22} {} {}",
                count.category.title(),
                "■".repeat(count.resume).blue(),
                count.resume
            );
            println!(
                "  {:<22} {} {}",
                "",
                "■".repeat(count.job).magenta(),
                count.job
            );
        }
    }

    println!("\n{}", "--- Overall Match Quality ---".bold());
    println!(
        "  {}  {}",
        gauge(sim.overall_similarity),
        colorize_score(sim.overall_similarity, analysis.quality.as_str())
    );

    if !analysis.recommendations.is_empty() {
        println!("\n{}", "--- Recommendations ---".bold());
        for rec in &analysis.recommendations {
            println!("  {} {}", level_marker(rec.level), rec.message);
        }
    }
    println!();
}

/// Display ranked job descriptions for `tailor rank`.
pub fn display_best_matches(matches: &[(usize, f64)], names: &[String]) {
    if matches.is_empty() {
        println!("No job descriptions to rank.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Best Matches ({} of {}) ===", matches.len(), names.len()).bold()
    );
    println!();
    println!(
        "  {:>4}  {:<48} {:>7}",
        "Rank".dimmed(),
        "Job description".dimmed(),
        "Match".dimmed()
    );
    println!("  {}", "-".repeat(62).dimmed());

    for (rank, &(index, score)) in matches.iter().enumerate() {
        let name = names.get(index).map(String::as_str).unwrap_or("?");
        println!(
            "  {:>4}. {:<48} {}",
            rank + 1,
            truncate_chars(name, 45),
            colorize_score(score, &format!("{:>7}", percent(score)))
        );
    }
    println!();
}

/// Display saved analyses for `tailor history`.
pub fn display_history(records: &[AnalysisRecord]) {
    if records.is_empty() {
        println!("No analyses saved yet. Run `tailor compare --save` first.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Analysis History ({} shown) ===", records.len()).bold()
    );
    println!();
    println!(
        "  {:>4}  {:<19}  {:<24} {:<24} {:>7}  {:<10}",
        "ID".dimmed(),
        "When".dimmed(),
        "Resume".dimmed(),
        "Job".dimmed(),
        "Match".dimmed(),
        "Backend".dimmed(),
    );
    println!("  {}", "-".repeat(98).dimmed());

    for record in records {
        println!(
            "  {:>4}  {:<19}  {:<24} {:<24} {}  {:<10}",
            record.id,
            record.created_at,
            truncate_chars(&record.resume_name, 21),
            truncate_chars(&record.job_name, 21),
            colorize_score(record.overall, &format!("{:>7}", percent(record.overall))),
            record.backend,
        );
    }
    println!();
}

fn display_gap_list(
    title: &str,
    noun: &str,
    skills: &[String],
    paint: impl Fn(&str) -> ColoredString,
) {
    println!("\n  {} ({} {noun})", title.bold(), skills.len());
    if skills.is_empty() {
        return;
    }
    let (shown, remaining) = preview_list(skills, GAP_PREVIEW);
    let mut line: Vec<String> = shown.iter().map(|s| paint(s.as_str()).to_string()).collect();
    if remaining > 0 {
        line.push(format!("+{remaining} more").dimmed().to_string());
    }
    println!("    {}", line.join(", "));
}

fn skill_line(skills: &[String], limit: usize) -> String {
    let (shown, remaining) = preview_list(skills, limit);
    let mut line = shown.join(", ");
    if remaining > 0 {
        line.push_str(&format!(", +{remaining} more"));
    }
    line
}

fn percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Five-color scale, one band per fifth of the score range.
fn colorize_score(score: f64, text: &str) -> ColoredString {
    match score_band(score) {
        0 => text.red(),
        1 => text.bright_red(),
        2 => text.yellow(),
        3 => text.bright_green(),
        _ => text.green().bold(),
    }
}

fn score_band(score: f64) -> usize {
    ((score.clamp(0.0, 1.0) * 5.0) as usize).min(4)
}

fn gauge(score: f64) -> String {
    let filled = ((score.clamp(0.0, 1.0) * GAUGE_WIDTH as f64).round() as usize).min(GAUGE_WIDTH);
    format!(
        "[{}{}]",
        colorize_score(score, &"█".repeat(filled)),
        "░".repeat(GAUGE_WIDTH - filled).dimmed()
    )
}

fn level_marker(level: Level) -> ColoredString {
    match level {
        Level::Success => "✓".green().bold(),
        Level::Info => "i".cyan(),
        Level::Warning => "!".yellow(),
        Level::Critical => "!!".red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_band() {
        assert_eq!(score_band(0.0), 0);
        assert_eq!(score_band(0.39), 1);
        assert_eq!(score_band(0.5), 2);
        assert_eq!(score_band(0.79), 3);
        assert_eq!(score_band(1.0), 4);
        assert_eq!(score_band(f64::NAN), 0);
    }

    #[test]
    fn test_skill_line_collapses() {
        let skills: Vec<String> = (0..25).map(|i| format!("s{i}")).collect();
        let line = skill_line(&skills, SKILL_PREVIEW);
        assert!(line.ends_with(", +5 more"));
        assert!(line.contains("s19"));
        assert!(!line.contains("s20"));
    }
}
