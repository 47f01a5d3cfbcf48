use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;

use crate::calculator::{GamesReport, WinRateReport};

/// How hard a required win rate is to sustain. Only used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
}

impl Difficulty {
    pub fn from_win_rate(win_rate: f64) -> Self {
        if win_rate <= 0.5 {
            Difficulty::Easy
        } else if win_rate <= 0.6 {
            Difficulty::Moderate
        } else {
            Difficulty::Hard
        }
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a win rate report.
/// Format: "WINRATE REQUIRED IS: 62.3%"
pub fn format_win_rate(report: &WinRateReport, use_colors: bool) -> String {
    if !use_colors {
        return report.to_string();
    }

    let value = format!("{:.1}%", report.percent());
    let value = match Difficulty::from_win_rate(report.win_rate) {
        Difficulty::Easy => value.green().bold().to_string(),
        Difficulty::Moderate => value.yellow().bold().to_string(),
        Difficulty::Hard => value.red().bold().to_string(),
    };
    format!("WINRATE REQUIRED IS: {}", value)
}

/// Format a games report.
/// Format: "GAMES REQUIRED TO CLIMB 5 DIVISIONS IS: 41.7"
pub fn format_games(report: &GamesReport, use_colors: bool) -> String {
    if use_colors {
        format!(
            "GAMES REQUIRED TO CLIMB {} DIVISIONS IS: {}",
            report.divisions.cyan(),
            format!("{:.1}", report.games_required).bold()
        )
    } else {
        report.to_string()
    }
}

/// Format several games reports, one per line. With more than one report
/// each line is prefixed with the win rate it was computed for.
pub fn format_games_list(reports: &[GamesReport], use_colors: bool) -> String {
    if reports.len() == 1 {
        return format_games(&reports[0], use_colors);
    }

    reports
        .iter()
        .map(|report| {
            let rate = format!("{:>5.1}%", report.win_rate * 100.0);
            let rate = if use_colors {
                rate.dimmed().to_string()
            } else {
                rate
            };
            format!("{}  {}", rate, format_games(report, use_colors))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format games reports as tab-separated values for scripting
/// Columns: win_rate, divisions, games_required (no headers, no colors)
pub fn format_tsv_games(reports: &[GamesReport]) -> String {
    reports
        .iter()
        .map(|report| {
            format!(
                "{}\t{}\t{:.1}",
                report.win_rate, report.divisions, report.games_required
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a win rate report as tab-separated values
/// Columns: total_games, win_rate_percent
pub fn format_tsv_win_rate(report: &WinRateReport) -> String {
    format!("{}\t{:.1}", report.total_games, report.percent())
}

/// Pretty JSON for any report
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize report")
}
