use std::fmt::Write;

use chrono::NaiveDate;

use crate::domain::{Commit, IncrementLevel, ParsedCommit};

/// Facts about the release an entry is rendered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseMetadata {
    pub version: String,
    pub previous: Option<String>,
    pub date: NaiveDate,
}

/// Turns qualifying commits into changelog entry text.
pub trait EntryRenderer {
    fn render(&self, commits: &[Commit], release: &ReleaseMetadata) -> String;
}

/// Markdown entry grouped by increment level.
///
/// ```text
/// ## 1.2.0 (2026-01-31)
///
/// ### Features
///
/// - **cli:** add --dry-run
/// ```
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer;

fn section_title(level: IncrementLevel) -> &'static str {
    match level {
        IncrementLevel::Major => "Breaking Changes",
        IncrementLevel::Minor => "Features",
        IncrementLevel::Patch => "Bug Fixes",
    }
}

fn bullet(commit: &Commit) -> String {
    match ParsedCommit::parse(&commit.subject) {
        Some(ParsedCommit {
            scope: Some(scope),
            description,
            ..
        }) => format!("- **{}:** {}", scope, description),
        Some(parsed) => format!("- {}", parsed.description),
        None => format!("- {}", commit.subject),
    }
}

impl EntryRenderer for MarkdownRenderer {
    fn render(&self, commits: &[Commit], release: &ReleaseMetadata) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "## {} ({})",
            release.version,
            release.date.format("%Y-%m-%d")
        );

        for level in [
            IncrementLevel::Major,
            IncrementLevel::Minor,
            IncrementLevel::Patch,
        ] {
            let bullets: Vec<String> = commits
                .iter()
                .filter(|c| c.level == Some(level))
                .map(bullet)
                .collect();
            if bullets.is_empty() {
                continue;
            }

            let _ = writeln!(output, "\n### {}\n", section_title(level));
            for line in bullets {
                let _ = writeln!(output, "{}", line);
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(message: &str, level: Option<IncrementLevel>) -> Commit {
        Commit::from_message(message).with_level(level)
    }

    fn release() -> ReleaseMetadata {
        ReleaseMetadata {
            version: "1.2.0".to_string(),
            previous: Some("1.1.0".to_string()),
            date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        }
    }

    #[test]
    fn test_render_groups_by_level() {
        let commits = vec![
            commit("fix: handle nulls", Some(IncrementLevel::Patch)),
            commit("feat(cli): add --dry-run", Some(IncrementLevel::Minor)),
            commit("docs: readme", None),
        ];

        assert_eq!(
            MarkdownRenderer.render(&commits, &release()),
            "## 1.2.0 (2026-01-31)\n\n### Features\n\n- **cli:** add --dry-run\n\n### Bug Fixes\n\n- handle nulls\n"
        );
    }

    #[test]
    fn test_render_non_conventional_subject() {
        let commits = vec![commit("Rewrite everything", Some(IncrementLevel::Major))];
        let text = MarkdownRenderer.render(&commits, &release());
        assert!(text.contains("### Breaking Changes\n\n- Rewrite everything\n"));
    }

    #[test]
    fn test_render_header_only() {
        let text = MarkdownRenderer.render(&[], &release());
        assert_eq!(text, "## 1.2.0 (2026-01-31)\n");
    }
}
