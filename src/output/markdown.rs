// Markdown report: analysis history written to a file.
//
// The report opens with a quality summary table, then a history table,
// then per-analysis detail (skills gap and recommendations).

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use super::preview_list;
use super::terminal::GAP_PREVIEW;
use crate::comparison::MatchQuality;
use crate::db::models::AnalysisRecord;

const QUALITY_ORDER: [MatchQuality; 5] = [
    MatchQuality::Excellent,
    MatchQuality::Good,
    MatchQuality::Fair,
    MatchQuality::Poor,
    MatchQuality::VeryPoor,
];

/// Write a markdown report for `records` to `path`. Returns the path written.
pub fn generate_report(records: &[AnalysisRecord], path: &str) -> Result<String> {
    let content = render_report(records);

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create report directory for {path}"))?;
        }
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write report to {path}"))?;

    Ok(path.to_string())
}

fn render_report(records: &[AnalysisRecord]) -> String {
    let mut out = String::new();

    // write! into a String cannot fail
    let _ = writeln!(out, "# Tailor Analysis Report\n");
    let _ = writeln!(
        out,
        "Generated {}\n",
        Local::now().format("%Y-%m-%d %H:%M")
    );

    let _ = writeln!(out, "## Summary\n");
    let _ = writeln!(out, "| Match quality | Analyses |");
    let _ = writeln!(out, "|---|---|");
    for quality in QUALITY_ORDER {
        let n = records.iter().filter(|r| r.quality == quality).count();
        let _ = writeln!(out, "| {} | {} |", quality.as_str(), n);
    }
    let _ = writeln!(out, "| **Total** | **{}** |\n", records.len());

    if records.is_empty() {
        let _ = writeln!(out, "No analyses saved yet.");
        return out;
    }

    let _ = writeln!(out, "## History\n");
    let _ = writeln!(
        out,
        "| ID | When | Resume | Job | Overall | Avg section | Quality | Backend |"
    );
    let _ = writeln!(out, "|---|---|---|---|---|---|---|---|");
    for r in records {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {:.1}% | {:.1}% | {} | {} |",
            r.id,
            r.created_at,
            escape_cell(&r.resume_name),
            escape_cell(&r.job_name),
            r.overall * 100.0,
            r.avg_section * 100.0,
            r.quality.as_str(),
            r.backend,
        );
    }
    out.push('\n');

    let _ = writeln!(out, "## Details\n");
    for r in records {
        let gap = &r.analysis.gap;
        let _ = writeln!(
            out,
            "### #{}: {} vs {}\n",
            r.id,
            r.resume_name,
            r.job_name
        );
        let _ = writeln!(
            out,
            "- Overall: {:.1}% ({})",
            r.overall * 100.0,
            r.quality.as_str()
        );
        let _ = writeln!(
            out,
            "- Section similarity: avg {:.1}%, max {:.1}%, min {:.1}%",
            r.avg_section * 100.0,
            r.max_section * 100.0,
            r.min_section * 100.0
        );
        let _ = writeln!(out, "- Matching skills: {}", skill_list(&gap.matching));
        let _ = writeln!(out, "- Skills to develop: {}", skill_list(&gap.missing));
        let _ = writeln!(out, "- Additional skills: {}", skill_list(&gap.extra));

        if !r.analysis.recommendations.is_empty() {
            let _ = writeln!(out, "\n**Recommendations**\n");
            for rec in &r.analysis.recommendations {
                let _ = writeln!(out, "- _{}_: {}", rec.level, rec.message);
            }
        }
        out.push('\n');
    }

    out
}

fn skill_list(skills: &[String]) -> String {
    if skills.is_empty() {
        return "none".to_string();
    }
    let (shown, remaining) = preview_list(skills, GAP_PREVIEW);
    let mut list = shown.join(", ");
    if remaining > 0 {
        list.push_str(&format!(" (+{remaining} more)"));
    }
    list
}

/// Keep pipes in file names from breaking the table.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
