use std::{fmt::Write as _, fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintRules {
    pub speakers: Vec<String>,
    pub long_line_chars: usize,
    pub short_line_chars: usize,
    /// Consecutive short lines that trigger a finding.
    pub short_streak: usize,
    pub chars_per_minute: f64,
    pub scene_marker: String,
    pub block_marker: String,
}

impl Default for LintRules {
    fn default() -> Self {
        Self {
            speakers: vec!["ずんだもん".to_string(), "めたん".to_string()],
            long_line_chars: 60,
            short_line_chars: 15,
            short_streak: 3,
            chars_per_minute: 330.0,
            scene_marker: "<!-- SCENE:".to_string(),
            block_marker: "## 【Block".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFinding {
    pub line_number: usize,
    pub chars: usize,
    pub line: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockStats {
    pub index: usize,
    pub scenes: usize,
    pub lines: usize,
    pub chars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintReport {
    pub total_chars: usize,
    pub line_count: usize,
    pub estimated_minutes: f64,
    pub long_lines: Vec<LineFinding>,
    pub short_streaks: Vec<LineFinding>,
    pub scene_markers: usize,
    pub blocks: Vec<BlockStats>,
}

impl LintReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.long_lines.is_empty() && self.short_streaks.is_empty()
    }
}

/// Dialogue after `speaker：` (or `speaker:`) when the line belongs to a known speaker.
fn dialogue<'a>(line: &'a str, rules: &LintRules) -> Option<&'a str> {
    let trimmed = line.trim();
    rules.speakers.iter().find_map(|speaker| {
        let rest = trimmed.strip_prefix(speaker.as_str())?;
        rest.strip_prefix('：').or_else(|| rest.strip_prefix(':'))
    })
}

#[must_use]
pub fn lint_script(text: &str, rules: &LintRules) -> LintReport {
    let mut total_chars = 0;
    let mut line_count = 0;
    let mut long_lines = Vec::new();
    let mut short_streaks = Vec::new();
    let mut streak = 0;

    for (index, line) in text.lines().enumerate() {
        let Some(spoken) = dialogue(line, rules) else {
            continue;
        };
        let chars = spoken.chars().count();
        total_chars += chars;
        line_count += 1;

        let finding = || LineFinding {
            line_number: index + 1,
            chars,
            line: line.trim().to_string(),
        };
        if chars > rules.long_line_chars {
            long_lines.push(finding());
        }
        if chars < rules.short_line_chars {
            streak += 1;
            if streak >= rules.short_streak {
                short_streaks.push(finding());
            }
        } else {
            streak = 0;
        }
    }

    let estimated_minutes = if rules.chars_per_minute > 0.0 {
        total_chars as f64 / rules.chars_per_minute
    } else {
        0.0
    };

    let blocks = text
        .split(rules.block_marker.as_str())
        .skip(1)
        .enumerate()
        .map(|(index, block)| {
            let spoken: Vec<usize> = block
                .lines()
                .filter_map(|line| dialogue(line, rules))
                .map(|spoken| spoken.chars().count())
                .collect();
            BlockStats {
                index: index + 1,
                scenes: block.matches(rules.scene_marker.as_str()).count(),
                lines: spoken.len(),
                chars: spoken.iter().sum(),
            }
        })
        .collect();

    LintReport {
        total_chars,
        line_count,
        estimated_minutes,
        long_lines,
        short_streaks,
        scene_markers: text.matches(rules.scene_marker.as_str()).count(),
        blocks,
    }
}

#[instrument(skip(rules), fields(path = %path.display()))]
pub fn lint_script_file(path: &Path, rules: &LintRules) -> Result<LintReport> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read script: {}", path.display()))?;
    let report = lint_script(&text, rules);
    info!(
        lines = report.line_count,
        long = report.long_lines.len(),
        short_streaks = report.short_streaks.len(),
        "script linted"
    );
    Ok(report)
}

#[must_use]
pub fn render_report(report: &LintReport, rules: &LintRules) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "dialogue chars: {}", report.total_chars);
    let _ = writeln!(out, "dialogue lines: {}", report.line_count);
    let _ = writeln!(
        out,
        "estimated length: ~{:.1} min",
        report.estimated_minutes
    );
    out.push('\n');

    render_findings(
        &mut out,
        &format!("lines over {} chars", rules.long_line_chars),
        &report.long_lines,
    );
    out.push('\n');
    render_findings(
        &mut out,
        &format!(
            "{}+ consecutive lines under {} chars",
            rules.short_streak, rules.short_line_chars
        ),
        &report.short_streaks,
    );

    let _ = writeln!(out, "\nscene markers: {}", report.scene_markers);
    let _ = writeln!(out, "\nblocks: {}", report.blocks.len());
    for block in &report.blocks {
        let _ = writeln!(
            out,
            "  Block {}: {} scenes, {} lines, {} chars",
            block.index, block.scenes, block.lines, block.chars
        );
    }
    out
}

fn render_findings(out: &mut String, title: &str, findings: &[LineFinding]) {
    if findings.is_empty() {
        let _ = writeln!(out, "[OK] {title}: none");
        return;
    }

    let _ = writeln!(out, "[NG] {title}: {}", findings.len());
    for finding in findings {
        let _ = writeln!(
            out,
            "  line {}: {} chars -> {}",
            finding.line_number, finding.chars, finding.line
        );
    }
}
