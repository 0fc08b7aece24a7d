use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use release_sync::analyzer::{classify_all, ConventionalClassifier};
use release_sync::boundary::BoundaryWarning;
use release_sync::changelog::{merge_entry, MarkdownRenderer};
use release_sync::cleaner::CleaningPolicy;
use release_sync::cli::{compute_next_version, run_release_workflow, ReleaseWorkflowArgs};
use release_sync::config::{self, Config};
use release_sync::domain::Commit;
use release_sync::manifest::{update_manifest_version, ManifestTarget};
use release_sync::ui;

#[derive(Parser)]
#[command(
    name = "release-sync",
    version,
    about = "Compute the next semantic version from commits and keep manifests and changelog in sync"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        short = 'C',
        long,
        global = true,
        default_value = ".",
        help = "Project root that configured paths are relative to"
    )]
    root: PathBuf,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the next version implied by the commits
    Next {
        #[arg(long = "from", num_args = 1.., help = "Previous versions or tags")]
        previous: Vec<String>,

        #[arg(
            long,
            default_value = "-",
            help = "NUL-separated commit messages (git log --format=%B%x00), '-' for stdin"
        )]
        commits: String,
    },
    /// Write a version into every configured manifest target
    Bump {
        #[arg(help = "Version to write")]
        version: String,
    },
    /// Merge an entry file into the changelog
    Changelog {
        #[arg(long, help = "File holding the entry text")]
        entry: PathBuf,

        #[arg(long, help = "Changelog path (defaults to the configured one)")]
        file: Option<PathBuf>,

        #[arg(long, help = "Line index to insert at (defaults to the configured one)")]
        from_line: Option<usize>,
    },
    /// Run the whole release pipeline
    Release {
        #[arg(long = "from", num_args = 1.., help = "Previous versions or tags")]
        previous: Vec<String>,

        #[arg(
            long,
            default_value = "-",
            help = "NUL-separated commit messages (git log --format=%B%x00), '-' for stdin"
        )]
        commits: String,

        #[arg(long, help = "Release date for the changelog entry (YYYY-MM-DD)")]
        date: Option<NaiveDate>,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,

        #[arg(short, long, help = "Skip confirmation prompts")]
        yes: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Read NUL-separated commit messages from a file or stdin.
fn read_commits(source: &str) -> Result<Vec<Commit>> {
    let raw = if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read commits from stdin")?;
        buf
    } else {
        fs::read_to_string(source).with_context(|| format!("Failed to read commits from {}", source))?
    };

    Ok(raw
        .split('\0')
        .filter(|message| !message.trim().is_empty())
        .map(Commit::from_message)
        .collect())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    match args.command {
        Command::Next { previous, commits } => next(&config, &previous, &commits),
        Command::Bump { version } => bump(&config, &args.root, &version),
        Command::Changelog {
            entry,
            file,
            from_line,
        } => changelog(&config, &args.root, &entry, file, from_line),
        Command::Release {
            previous,
            commits,
            date,
            dry_run,
            yes,
        } => release(&config, args.root, previous, &commits, date, dry_run, yes),
    }
}

fn next(config: &Config, previous: &[String], commits: &str) -> Result<()> {
    let classifier = ConventionalClassifier::new(config.commits.clone());
    let next = compute_next_version(read_commits(commits)?, previous, config, &classifier)?;

    for warning in &next.warnings {
        ui::display_boundary_warning(warning);
    }
    if let Some(version) = next.version {
        println!("{}", version);
    }
    Ok(())
}

fn bump(config: &Config, root: &Path, version: &str) -> Result<()> {
    if config.targets.is_empty() {
        bail!("No manifest targets configured");
    }

    let policy = CleaningPolicy::from_config(&config.version.clean)?;
    let targets = config
        .targets
        .iter()
        .map(|target| ManifestTarget::from_config(target, root))
        .collect::<release_sync::Result<Vec<_>>>()?;

    for target in &targets {
        let update = update_manifest_version(target, &policy, version)
            .with_context(|| format!("Failed to update {}", target.path().display()))?;
        ui::display_written_files(&update.written);
        for path in update.skipped {
            ui::display_boundary_warning(&BoundaryWarning::LockFileMissing { path });
        }
    }
    Ok(())
}

fn changelog(
    config: &Config,
    root: &Path,
    entry: &Path,
    file: Option<PathBuf>,
    from_line: Option<usize>,
) -> Result<()> {
    let text = fs::read_to_string(entry)
        .with_context(|| format!("Failed to read entry from {}", entry.display()))?;
    let path = root.join(file.unwrap_or_else(|| config.changelog.file.clone()));

    merge_entry(&path, &text, from_line.unwrap_or(config.changelog.from_line))?;
    ui::display_success(&format!("Updated {}", path.display()));
    Ok(())
}

fn release(
    config: &Config,
    root: PathBuf,
    previous: Vec<String>,
    commits: &str,
    date: Option<NaiveDate>,
    dry_run: bool,
    yes: bool,
) -> Result<()> {
    if commits == "-" && !yes && !dry_run {
        bail!("Commits are read from stdin, so confirmation is impossible; pass --yes or --commits <FILE>");
    }

    let commits = read_commits(commits)?;
    let classifier = ConventionalClassifier::new(config.commits.clone());

    // Preview first so the user sees what is about to be written
    let preview_args = ReleaseWorkflowArgs {
        root,
        commits: commits.clone(),
        previous_versions: previous,
        date: date.unwrap_or_else(|| Utc::now().date_naive()),
        dry_run: true,
    };
    let preview = run_release_workflow(preview_args.clone(), config, &classifier, &MarkdownRenderer)?;

    ui::display_commit_analysis(&classify_all(&classifier, commits.clone()));
    for warning in &preview.warnings {
        ui::display_boundary_warning(warning);
    }

    let Some(version) = preview.version.as_deref() else {
        return Ok(());
    };
    ui::display_proposed_version(preview.previous.as_deref(), version);

    if dry_run {
        ui::display_status("Dry run, no files written. Entry:");
        println!("\n{}", preview.entry.unwrap_or_default());
        return Ok(());
    }

    if !yes && !ui::confirm_action("Write this release?")? {
        println!("Release cancelled by user.");
        return Ok(());
    }

    let result = run_release_workflow(
        ReleaseWorkflowArgs {
            dry_run: false,
            ..preview_args
        },
        config,
        &classifier,
        &MarkdownRenderer,
    )?;

    for warning in result.warnings.iter().filter(|w| !preview.warnings.contains(w)) {
        ui::display_boundary_warning(warning);
    }
    ui::display_written_files(&result.written);
    ui::display_success(&format!("Prepared release {}", version));
    Ok(())
}
