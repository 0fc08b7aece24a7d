use std::sync::OnceLock;

use regex::Regex;

use crate::domain::IncrementLevel;

/// A commit handed over by the history collaborator.
///
/// `level` is the precomputed classification; `None` means the commit
/// does not warrant a release on its own (docs, chores, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub subject: String,
    pub body: String,
    pub level: Option<IncrementLevel>,
}

impl Commit {
    /// Split a raw message into subject (first line) and body.
    pub fn from_message(message: &str) -> Self {
        let message = message.trim();
        let (subject, body) = match message.split_once('\n') {
            Some((subject, body)) => (subject.trim(), body.trim()),
            None => (message, ""),
        };
        Commit {
            subject: subject.to_string(),
            body: body.to_string(),
            level: None,
        }
    }

    pub fn with_level(mut self, level: Option<IncrementLevel>) -> Self {
        self.level = level;
        self
    }
}

fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(r"^([a-z]+)(?:\(([^)]+)\))?(!?):\s*(.*)").expect("static header regex")
    })
}

/// Parsed representation of a conventional commit header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    pub r#type: String,
    pub scope: Option<String>,
    pub description: String,
    /// `!` marker after the type/scope
    pub has_breaking_marker: bool,
}

impl ParsedCommit {
    /// Parse a commit subject according to conventional commits.
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    ///
    /// Returns `None` for non-conventional text.
    pub fn parse(subject: &str) -> Option<Self> {
        let captures = header_regex().captures(subject)?;

        Some(ParsedCommit {
            r#type: captures
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            scope: captures.get(2).map(|m| m.as_str().to_string()),
            has_breaking_marker: captures.get(3).map(|m| m.as_str()) == Some("!"),
            description: captures
                .get(4)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
    }
}
