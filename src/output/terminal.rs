// Colored terminal output for verdicts, score breakdowns, and lexicon summaries.
//
// This module handles all terminal-specific formatting. The main.rs command
// handlers delegate here.

use colored::Colorize;

use crate::db::StoredPhrase;
use crate::request::Verdict;
use crate::scoring::ScoreBreakdown;

/// Display a verdict and the phrases behind it.
pub fn display_verdict(text: &str, verdict: &Verdict, breakdown: &ScoreBreakdown) {
    println!("\n{}", "=== Pyx verdict ===".bold());
    println!("  Text:     {}", super::truncate_chars(text, 120).dimmed());
    println!("  Score:    {}", colorize_score(verdict.score, verdict.bad));
    println!("  Bad:      {}", colorize_bad(verdict.bad));
    if verdict.bad {
        println!("  Censored: {}", super::truncate_chars(&verdict.censored, 120));
    }

    if breakdown.matches.is_empty() {
        println!("  {}", "No lexicon phrases matched.".dimmed());
        return;
    }

    println!("\n  Matched phrases:");
    for m in &breakdown.matches {
        let label = if m.safe {
            "safe".green()
        } else {
            m.category.as_str().red()
        };
        println!("    {:<24} {:<12} {:+.2}", m.phrase, label, m.contribution);
    }
}

/// Display a regular and a context-aware score side by side.
pub fn display_comparison(regular: f64, context_aware: f64, threshold: f64) {
    let damped = if context_aware < regular {
        " (damped by context)".yellow().to_string()
    } else {
        String::new()
    };
    println!(
        "  Regular score: {}  Context-aware score: {}{}",
        colorize_score(regular, regular >= threshold),
        colorize_score(context_aware, context_aware >= threshold),
        damped
    );
}

/// Display per-category phrase counts.
pub fn display_category_counts(counts: &[(&str, usize)]) {
    if counts.is_empty() {
        println!("  No phrases loaded.");
        return;
    }
    println!("  {:<16} {:>6}", "Category".dimmed(), "Count".dimmed());
    for (category, count) in counts {
        println!("  {:<16} {:>6}", category, count);
    }
}

/// Display recently written phrases.
pub fn display_recent_phrases(phrases: &[StoredPhrase]) {
    if phrases.is_empty() {
        return;
    }
    println!("\nRecently updated phrases:");
    for p in phrases {
        let label = if p.safe { "safe".green() } else { "unsafe".red() };
        println!(
            "  {:<28} {:<7} {:<12} {} ({})",
            super::truncate_chars(&p.text, 28),
            label,
            p.category,
            p.source.to_string().dimmed(),
            p.updated_at.dimmed()
        );
    }
}

/// Colorize a score by whether it crossed the ban line.
fn colorize_score(score: f64, bad: bool) -> colored::ColoredString {
    let text = format!("{score:.4}");
    if bad {
        text.red().bold()
    } else if score > 0.0 {
        text.yellow()
    } else {
        text.green()
    }
}

fn colorize_bad(bad: bool) -> colored::ColoredString {
    if bad {
        "yes".red().bold()
    } else {
        "no".green()
    }
}
