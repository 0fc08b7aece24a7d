//! Pure formatting functions for UI output.
//!
//! Everything the user reads about a run goes through here; diagnostic
//! detail goes to the `tracing` subscriber instead.

use std::path::PathBuf;

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::Commit;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Shorten a subject to at most `max` characters.
fn truncate_subject(subject: &str, max: usize) -> String {
    if subject.chars().count() > max {
        let short: String = subject.chars().take(max).collect();
        format!("{}…", short)
    } else {
        subject.to_string()
    }
}

/// Display the analyzed commits and the level each one implies.
///
/// Shows up to 10 commits; the remainder is summarized as a count.
pub fn display_commit_analysis(commits: &[Commit]) {
    println!("\n{}", style("Analyzing commits").bold());
    println!("{}", style(format!("{} commits:", commits.len())).underlined());

    for (i, commit) in commits.iter().take(10).enumerate() {
        let level = commit
            .level
            .map(|l| l.to_string())
            .unwrap_or_else(|| "none".to_string());
        println!(
            "  {}. [{}] {}",
            i + 1,
            style(level).cyan(),
            truncate_subject(&commit.subject, 60)
        );
    }

    if commits.len() > 10 {
        println!("  ... and {} more commits", commits.len() - 10);
    }
}

/// Display the proposed version change (or initial version).
pub fn display_proposed_version(previous: Option<&str>, next: &str) {
    match previous {
        Some(previous) => {
            println!("\n{}", style("Proposed Version Change:").bold());
            println!("  From: {}", style(previous).red());
            println!("  To:   {}", style(next).green());
        }
        None => {
            println!("\n{}", style("Initial Version:").bold());
            println!("  New version: {}", style(next).green());
        }
    }
}

/// Display the files a run wrote.
pub fn display_written_files(files: &[PathBuf]) {
    for file in files {
        display_success(&format!("Updated {}", file.display()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_subject() {
        assert_eq!(truncate_subject("short", 60), "short");
        assert_eq!(truncate_subject("abcdef", 3), "abc…");
    }

    #[test]
    fn test_truncate_subject_multibyte() {
        assert_eq!(truncate_subject("ééééé", 2), "éé…");
    }

    #[test]
    fn test_display_status() {
        // Visual verification test - output is printed to stdout
        display_status("test status");
    }
}
