use std::io::IsTerminal;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use terminal_size::{terminal_size, Width};

use crate::scoring::{CompositeResult, Direction, Registry, ScenarioDirection};

/// How results are printed to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score; incomplete data appends an asterisk
pub fn format_score(score: u8, incomplete: bool) -> String {
    if incomplete {
        format!("{}*", score)
    } else {
        score.to_string()
    }
}

/// Format a 0-100 percentage without decimals
pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", value)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format results as a table with columns: Index, Score, Confidence, Location
/// Index column: 3 chars (fits "99."), score 4 chars (fits "100*"), confidence 4 chars
pub fn format_scored_table(results: &[CompositeResult], use_colors: bool) -> String {
    if results.is_empty() {
        return "No locations to score.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 3;
    let score_width = 4;
    let confidence_width = 4;
    let separator = "  ";

    results
        .iter()
        .enumerate()
        .map(|(idx, result)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format_score(result.score, result.incomplete());
            let score_padded = format!("{:>width$}", score_str, width = score_width);
            let confidence_padded = format!(
                "{:>width$}",
                format_percent(result.confidence),
                width = confidence_width
            );

            let fixed_width = index_width + 1 + score_width + confidence_width + separator.len() * 2;

            let name = if let Some(width) = term_width {
                if width > fixed_width + 10 {
                    truncate_name(&result.location, width - fixed_width)
                } else {
                    truncate_name(&result.location, 20)
                }
            } else {
                // No terminal (pipe), don't truncate
                result.location.clone()
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    confidence_padded.dimmed(),
                    separator,
                    name
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    index_str, score_padded, separator, confidence_padded, separator, name
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format results as tab-separated values for scripting
/// Columns: score, confidence, data completeness, location (no headers, no colors)
pub fn format_tsv(results: &[CompositeResult]) -> String {
    results
        .iter()
        .map(|r| {
            format!(
                "{}\t{:.0}\t{:.0}\t{}",
                r.score, r.confidence, r.data_completeness, r.location
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty JSON rendering of any result value
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize results as JSON")
}

/// Multi-line report for a single location: breakdown, drivers, narrative
/// and the sensitivity table when an explanation is attached.
pub fn format_detail(registry: &Registry, result: &CompositeResult, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let score = format_score(result.score, result.incomplete());
    if use_colors {
        lines.push(format!("{}", result.location.bold()));
        lines.push(format!("  Score: {}", score.bold()));
    } else {
        lines.push(result.location.clone());
        lines.push(format!("  Score: {}", score));
    }
    lines.push(format!(
        "  Confidence: {}  Data: {}",
        format_percent(result.confidence),
        format_percent(result.data_completeness)
    ));

    lines.push(String::new());
    lines.push("  Breakdown:".to_string());
    for entry in &result.breakdown {
        let label = registry.label(entry.indicator);
        let value = entry
            .value
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| "-".to_string());
        let adjusted = entry
            .adjusted_value
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| "-".to_string());
        let marker = if entry.active { ' ' } else { '~' };
        lines.push(format!(
            "   {}{:<22} raw {:>5}  adj {:>5}  w {:.3}  = {:>6.2}",
            marker, label, value, adjusted, entry.weight, entry.contribution
        ));
    }

    if let Some(explanation) = &result.explanation {
        if !explanation.contributors.is_empty() {
            lines.push(String::new());
            lines.push("  Top contributors:".to_string());
            for (i, c) in explanation.contributors.iter().enumerate() {
                lines.push(format!(
                    "   {}. {:<22} {:>5.1}%",
                    i + 1,
                    registry.label(c.indicator),
                    c.share * 100.0
                ));
            }
        }

        if !explanation.narratives.is_empty() {
            lines.push(String::new());
            for narrative in &explanation.narratives {
                if use_colors {
                    lines.push(format!("  {}", narrative.italic()));
                } else {
                    lines.push(format!("  {}", narrative));
                }
            }
        }

        let scenarios = &explanation.counterfactuals.scenarios;
        if !scenarios.is_empty() {
            lines.push(String::new());
            lines.push("  Sensitivity:".to_string());
            for s in scenarios {
                let arrow = match s.direction {
                    ScenarioDirection::Improve => "improve",
                    ScenarioDirection::Degrade => "degrade",
                };
                lines.push(format!(
                    "   {:<22} {:<7} {:>5.1} -> {:>5.1}  score {}",
                    registry.label(s.indicator),
                    arrow,
                    s.baseline_value,
                    s.target_value,
                    s.resulting_score
                ));
            }
        }
    }

    for diagnostic in &result.diagnostics {
        lines.push(format!("  note: {}", diagnostic));
    }

    lines.join("\n")
}

/// Registry listing for the `indicators` command
pub fn format_registry(registry: &Registry, use_colors: bool) -> String {
    registry
        .definitions()
        .iter()
        .map(|d| {
            let direction = match d.direction {
                Direction::Direct => "direct",
                Direction::Inverted => "inverted",
            };
            let id = format!("{:<22}", d.id.as_str());
            if use_colors {
                format!("{} {:<22} {:.2}  {}", id.cyan(), d.label, d.base_weight, direction)
            } else {
                format!("{} {:<22} {:.2}  {}", id, d.label, d.base_weight, direction)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
