//! Command-line surface

pub mod orchestration;

use std::env;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::VersionBump;
use crate::error::{GitUtilsError, Result};
use crate::ops::grep::DEFAULT_BUFFER_SIZE;

#[derive(Parser, Debug)]
#[command(
    name = "git-utils",
    version,
    about = "Run common git operations across many repositories at once"
)]
pub struct Cli {
    #[arg(long, help = "Print the app directory and config file path")]
    pub config: bool,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Skip the daily check for a newer release")]
    pub no_update_check: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Bump the version in the current repository using .git-utils-bump.cfg
    Bump {
        /// Component to bump; without it the last component is incremented
        #[arg(value_enum)]
        part: Option<BumpPart>,
    },

    /// Check out a remote branch matching a prefix in every repository
    Checkout {
        /// Branch name prefix
        branch: String,

        #[arg(long, help = "Directory to search for repositories")]
        dir: Option<PathBuf>,
    },

    /// Fetch branches in every repository
    Fetch {
        /// Comma-separated branch list, or `all`
        branches: String,

        #[arg(long, help = "Directory to search for repositories")]
        dir: Option<PathBuf>,
    },

    /// Search every file below a directory for a fixed string
    Grep {
        pattern: String,

        #[arg(long, help = "Directory to search")]
        dir: Option<PathBuf>,

        #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE, help = "Longest line in bytes")]
        buffer: usize,
    },

    /// Pull branches in every repository
    Pull {
        /// Comma-separated branch list, or `all`
        branches: String,

        #[arg(long, help = "Directory to search for repositories")]
        dir: Option<PathBuf>,

        #[arg(long, help = "Fetch and show what would change without pulling")]
        dry_run: bool,
    },

    /// Create an annotated tag with a message from the config templates
    Tag {
        #[arg(short = 'a', long = "tag_name", default_value = "", help = "Name of the new tag")]
        tag_name: String,

        #[arg(short = 'm', long = "tag_message", default_value = "", help = "Key of the message template")]
        tag_message: String,

        #[arg(long, help = "Repository directory")]
        dir: Option<PathBuf>,
    },

    /// Show commits since the last working day
    Standup {
        #[arg(long, help = "Repository directory")]
        dir: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpPart {
    Major,
    Minor,
    Patch,
}

impl From<Option<BumpPart>> for VersionBump {
    fn from(part: Option<BumpPart>) -> Self {
        match part {
            None => VersionBump::Increment,
            Some(BumpPart::Major) => VersionBump::Major,
            Some(BumpPart::Minor) => VersionBump::Minor,
            Some(BumpPart::Patch) => VersionBump::Patch,
        }
    }
}

/// `--dir` or the current directory; a missing directory is an error
pub fn resolve_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match dir {
        Some(dir) => dir,
        None => env::current_dir()?,
    };
    if !dir.is_dir() {
        return Err(GitUtilsError::DirectoryNotFound(dir));
    }
    Ok(dir)
}
