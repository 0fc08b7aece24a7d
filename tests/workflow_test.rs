// tests/workflow_test.rs
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use release_sync::analyzer::ConventionalClassifier;
use release_sync::boundary::BoundaryWarning;
use release_sync::changelog::{EntryRenderer, MarkdownRenderer, ReleaseMetadata};
use release_sync::cli::{run_release_workflow, ReleaseWorkflowArgs};
use release_sync::config::{parse_config, Config};
use release_sync::domain::{Commit, IncrementLevel};
use release_sync::ReleaseError;
use tempfile::TempDir;

const CONFIG: &str = r#"
[[targets]]
kind = "json"
file = "package.json"

[[targets]]
kind = "anchored"
file = "src/version.py"
prefix = '(?m)^VERSION\s*=\s*'

[changelog]
file = "CHANGELOG.md"
from_line = 1
"#;

fn setup_project(root: &Path) {
    fs::create_dir(root.join("src")).unwrap();
    fs::write(
        root.join("package.json"),
        "{\n  \"name\": \"demo\",\n  \"version\": \"1.2.3\"\n}\n",
    )
    .unwrap();
    fs::write(root.join("src/version.py"), "VERSION = \"1.2.3\"\n").unwrap();
    fs::write(root.join("CHANGELOG.md"), "# Changelog\n\n## 1.2.3 (2026-01-01)\n").unwrap();
}

fn args(root: &Path, messages: &[&str], dry_run: bool) -> ReleaseWorkflowArgs {
    ReleaseWorkflowArgs {
        root: root.to_path_buf(),
        commits: messages.iter().map(|m| Commit::from_message(m)).collect(),
        previous_versions: vec!["v1.2.3".to_string(), "v1.2.2".to_string()],
        date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        dry_run,
    }
}

fn run(root: &Path, config: &Config, messages: &[&str], dry_run: bool) -> release_sync::Result<release_sync::cli::WorkflowResult> {
    let classifier = ConventionalClassifier::new(config.commits.clone());
    run_release_workflow(args(root, messages, dry_run), config, &classifier, &MarkdownRenderer)
}

#[test]
fn test_full_release() {
    let dir = TempDir::new().unwrap();
    setup_project(dir.path());
    let config = parse_config(CONFIG).unwrap();

    let result = run(
        dir.path(),
        &config,
        &["feat(api): add search", "fix: off by one", "docs: typo"],
        false,
    )
    .unwrap();

    assert_eq!(result.level, Some(IncrementLevel::Minor));
    assert_eq!(result.previous.as_deref(), Some("1.2.3"));
    assert_eq!(result.version.as_deref(), Some("1.3.0"));
    assert_eq!(result.written.len(), 3);
    assert!(result.warnings.is_empty());

    assert_eq!(
        fs::read_to_string(dir.path().join("package.json")).unwrap(),
        "{\n  \"name\": \"demo\",\n  \"version\": \"1.3.0\"\n}\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("src/version.py")).unwrap(),
        "VERSION = \"1.3.0\"\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap(),
        "# Changelog\n\n## 1.3.0 (2026-02-01)\n\n### Features\n\n- **api:** add search\n\n### Bug Fixes\n\n- off by one\n\n## 1.2.3 (2026-01-01)\n"
    );
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    setup_project(dir.path());
    let config = parse_config(CONFIG).unwrap();

    let result = run(dir.path(), &config, &["feat!: new api"], true).unwrap();

    assert_eq!(result.version.as_deref(), Some("2.0.0"));
    assert!(result.written.is_empty());
    assert!(result.entry.unwrap().contains("### Breaking Changes"));
    assert_eq!(
        fs::read_to_string(dir.path().join("src/version.py")).unwrap(),
        "VERSION = \"1.2.3\"\n"
    );
}

#[test]
fn test_nothing_to_release() {
    let dir = TempDir::new().unwrap();
    setup_project(dir.path());
    let config = parse_config(CONFIG).unwrap();

    let result = run(dir.path(), &config, &["docs: readme", "ci: cache"], false).unwrap();

    assert_eq!(result.version, None);
    assert!(result.written.is_empty());
    assert_eq!(
        result.warnings,
        vec![BoundaryWarning::NothingToRelease { commit_count: 2 }]
    );
}

#[test]
fn test_empty_commit_set_aborts() {
    let dir = TempDir::new().unwrap();
    setup_project(dir.path());
    let config = parse_config(CONFIG).unwrap();

    let err = run(dir.path(), &config, &[], false).unwrap_err();
    assert!(matches!(err, ReleaseError::EmptyCommitSet));
}

#[test]
fn test_failing_target_stops_pipeline() {
    let dir = TempDir::new().unwrap();
    setup_project(dir.path());
    fs::write(dir.path().join("src/version.py"), "__version__ = \"1.2.3\"\n").unwrap();
    let config = parse_config(CONFIG).unwrap();

    let err = run(dir.path(), &config, &["fix: a"], false).unwrap_err();

    assert!(matches!(err, ReleaseError::PatternNotFound { .. }));
    // Earlier target stays written, the changelog step never ran
    assert!(fs::read_to_string(dir.path().join("package.json"))
        .unwrap()
        .contains("\"version\": \"1.2.4\""));
    assert_eq!(
        fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap(),
        "# Changelog\n\n## 1.2.3 (2026-01-01)\n"
    );
}

#[test]
fn test_invalid_configuration_aborts_before_writes() {
    let dir = TempDir::new().unwrap();
    setup_project(dir.path());
    let config = parse_config(
        r#"
[version]
clean = { strip = "(" }

[[targets]]
kind = "json"
file = "package.json"
"#,
    )
    .unwrap();

    let err = run(dir.path(), &config, &["fix: a"], false).unwrap_err();
    assert!(matches!(err, ReleaseError::InvalidConfiguration(_)));
    assert!(fs::read_to_string(dir.path().join("package.json"))
        .unwrap()
        .contains("1.2.3"));
}

#[test]
fn test_changelog_created_when_missing() {
    let dir = TempDir::new().unwrap();
    let config = Config::default();

    let result = run(dir.path(), &config, &["fix: a"], false).unwrap();

    let path = dir.path().join("CHANGELOG.md");
    assert_eq!(result.warnings, vec![BoundaryWarning::ChangelogCreated { path: path.clone() }]);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "## 1.2.4 (2026-02-01)\n\n### Bug Fixes\n\n- a\n"
    );
}

struct PlainRenderer;

impl EntryRenderer for PlainRenderer {
    fn render(&self, commits: &[Commit], release: &ReleaseMetadata) -> String {
        format!("{} ({} commits)\n", release.version, commits.len())
    }
}

#[test]
fn test_custom_renderer() {
    let dir = TempDir::new().unwrap();
    let config = Config::default();
    let classifier = ConventionalClassifier::new(config.commits.clone());

    let result = run_release_workflow(
        args(dir.path(), &["fix: a", "chore: b"], false),
        &config,
        &classifier,
        &PlainRenderer,
    )
    .unwrap();

    assert_eq!(result.entry.as_deref(), Some("1.2.4 (2 commits)\n"));
    assert_eq!(
        fs::read_to_string(dir.path().join("CHANGELOG.md")).unwrap(),
        "1.2.4 (2 commits)\n"
    );
}

#[test]
fn test_strip_policy_applied_once() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("VERSION.py"), "VERSION = \"10.5.0\"\n").unwrap();
    let config = parse_config(
        r#"
[version]
clean = { strip = "^1" }

[[targets]]
kind = "anchored"
file = "VERSION.py"
prefix = 'VERSION = '
"#,
    )
    .unwrap();
    let classifier = ConventionalClassifier::new(config.commits.clone());
    let args = ReleaseWorkflowArgs {
        previous_versions: vec!["v10.5.0".to_string()],
        ..args(dir.path(), &["feat!: drop legacy api"], false)
    };

    let result = run_release_workflow(args, &config, &classifier, &MarkdownRenderer).unwrap();

    // 11.0.0 stripped once is 1.0.0; a second strip would give .0.0
    assert_eq!(result.version.as_deref(), Some("1.0.0"));
    assert!(result.entry.unwrap().starts_with("## 1.0.0 "));
    assert_eq!(
        fs::read_to_string(dir.path().join("VERSION.py")).unwrap(),
        "VERSION = \"1.0.0\"\n"
    );
}
