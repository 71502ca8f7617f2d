//! Command dispatch
//!
//! Turns a parsed [Cli] into calls on the library operators, prints the
//! results and runs the daily update check afterwards.

use std::path::Path;

use anyhow::Result;
use chrono::{Local, Utc};
use clap::CommandFactory;
use tracing::{debug, warn};

use crate::bump::{bump, BumpReport};
use crate::cli::{resolve_dir, Cli, Commands};
use crate::config::{AppConfig, AppPaths};
use crate::git::{CommandGit, Git};
use crate::ops::grep::GrepOptions;
use crate::ops::standup::last_working_day;
use crate::ops::{self, BranchTarget, PullOptions};
use crate::report::WalkSummary;
use crate::tag::{create_tag, TagOutcome, TagRequest};
use crate::ui::{self, StdinPicker};
use crate::update::{GithubReleases, UpdateChecker, UpdateStatus, CURRENT_VERSION, INSTALL_URL};

/// Run the command described by `cli`.
///
/// Per-repository failures are printed and do not fail the run; anything
/// returned as `Err` is fatal.
pub fn run(cli: Cli) -> Result<()> {
    let paths = AppPaths::resolve()?;
    let config_path = paths.config_file();
    let mut config = AppConfig::load_or_init(&config_path)?;

    if cli.config {
        println!("App Directory: {}", paths.dir.display());
        println!("Config File Path: {}", config_path.display());
        return Ok(());
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let git = CommandGit::new();
    dispatch(&git, command, &config, &config_path)?;

    if !cli.no_update_check && config.update_check.enabled {
        check_for_update(&mut config, &config_path);
    }
    Ok(())
}

fn dispatch(git: &dyn Git, command: Commands, config: &AppConfig, config_path: &Path) -> Result<()> {
    match command {
        Commands::Bump { part } => {
            let root = resolve_dir(None)?;
            let report = bump(git, &root, part.into())?;
            print_bump(&report);
        }
        Commands::Checkout { branch, dir } => {
            let root = resolve_dir(dir)?;
            let summary = ops::checkout(git, &root, &branch, &mut StdinPicker)?;
            print_summary(&summary);
        }
        Commands::Fetch { branches, dir } => {
            let root = resolve_dir(dir)?;
            let target = BranchTarget::parse(&branches)?;
            let summary = ops::fetch(git, &root, &target)?;
            print_summary(&summary);
        }
        Commands::Grep {
            pattern,
            dir,
            buffer,
        } => {
            let root = resolve_dir(dir)?;
            let options = GrepOptions { pattern, buffer };
            let report = ops::grep(&root, &options)?;
            debug!("grep scanned {} files, {} matches", report.files, report.matches);
        }
        Commands::Pull {
            branches,
            dir,
            dry_run,
        } => {
            let root = resolve_dir(dir)?;
            let target = BranchTarget::parse(&branches)?;
            let summary = ops::pull(git, &root, &target, PullOptions { dry_run })?;
            print_summary(&summary);
        }
        Commands::Tag {
            tag_name,
            tag_message,
            dir,
        } => {
            let dir = resolve_dir(dir)?;
            let request = TagRequest::new(tag_name, tag_message);
            match create_tag(git, &dir, config, config_path, &request)? {
                TagOutcome::MissingInput => {
                    let mut cmd = Cli::command();
                    if let Some(tag) = cmd.find_subcommand_mut("tag") {
                        tag.print_help()?;
                    }
                }
                TagOutcome::Created { tag, message } => {
                    ui::display_success(&format!("Created tag '{}'", tag));
                    println!("{}", message);
                    ui::display_status("Push it with: git push --tags");
                }
            }
        }
        Commands::Standup { dir } => {
            let dir = resolve_dir(dir)?;
            let since = last_working_day(Local::now().date_naive());
            let commits = ops::standup(git, &dir, since)?;
            if commits.is_empty() {
                println!("No activity found.");
            }
            for commit in &commits {
                println!("{}", commit);
            }
        }
    }
    Ok(())
}

fn print_summary(summary: &WalkSummary) {
    if summary.visited == 0 {
        ui::display_status("No git repositories found");
    } else {
        ui::display_status(&summary.to_string());
    }
}

fn print_bump(report: &BumpReport) {
    ui::display_success(&report.summary());
    for file in &report.files {
        println!("  updated {}", file.display());
    }
    if report.committed {
        ui::display_success("Committed version bump");
    }
    if let Some(tag) = &report.tag {
        ui::display_success(&format!("Created tag '{}'", tag));
    }
}

fn check_for_update(config: &mut AppConfig, config_path: &Path) {
    let checker = UpdateChecker::new(CURRENT_VERSION, config.update_check.comparison);
    let status = checker.check(config, &GithubReleases::default(), Utc::now());

    if let Some(latest) = status.newer_release() {
        ui::display_status(&format!(
            "A new version of git-utils is available: {} (current {}). See {}",
            latest, CURRENT_VERSION, INSTALL_URL
        ));
    }
    if matches!(status, UpdateStatus::Fetched { .. }) {
        if let Err(e) = config.save(config_path) {
            warn!("could not save update check: {}", e);
        }
    }
}
