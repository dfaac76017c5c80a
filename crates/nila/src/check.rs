// SPDX-FileCopyrightText: 2026 Nila Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `nila check` command implementation.

use colored::Colorize;
use nila_config::NilaConfig;
use nila_guard::{CrisisKeywordSet, HELPLINES, SAFETY_MESSAGE, SAFETY_TITLE, Verdict};

/// Runs the guard over `text` and prints the verdict.
pub fn run_check(config: &NilaConfig, text: &str) {
    let keywords = CrisisKeywordSet::from_config(&config.guard);
    print!("{}", render_check(&keywords, text));
}

/// Verdict line, plus the safety resources when the text is at risk.
pub fn render_check(keywords: &CrisisKeywordSet, text: &str) -> String {
    match keywords.find_match(text) {
        None => format!("{}\n", Verdict::Safe.to_string().green()),
        Some(keyword) => format!(
            "{} (matched \"{keyword}\")\n\n{}",
            Verdict::AtRisk.to_string().red().bold(),
            render_safety_resources()
        ),
    }
}

/// The crisis screen as plain terminal text.
pub fn render_safety_resources() -> String {
    let mut out = format!("{}\n{}\n", SAFETY_TITLE.bold(), SAFETY_MESSAGE);
    for line in HELPLINES {
        out.push_str(&format!("  {:<24} {}\n", line.name, line.number.yellow()));
    }
    out
}
