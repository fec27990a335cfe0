//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tagline - Edit text files at tagged lines instead of line numbers
#[derive(Parser, Debug)]
#[command(name = "tagline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Rule file (.toml, .json, .yaml) mapping tags to line patterns
    #[arg(short, long, global = true, env = "TAGLINE_RULES")]
    pub rules: Option<PathBuf>,

    /// Inline rule tagging lines that match REGEX with TAG
    #[arg(short = 'm', long = "match", global = true, value_name = "TAG=REGEX")]
    pub matches: Vec<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List tagged lines
    Tags {
        /// File to scan
        file: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Insert lines after every line carrying one of the tags
    ///
    /// Without any --tag the whole file is replaced by the given lines.
    ///
    /// Examples:
    ///   tagline -m 'deps=^\[dependencies\]' insert Cargo.toml -t deps -l 'serde = "1"'
    Insert {
        /// File to edit
        file: PathBuf,

        /// Target tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Line to insert (repeatable)
        #[arg(short, long = "line", allow_hyphen_values = true)]
        lines: Vec<String>,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Insert lines right before the end line of a start/end tag pair
    InsertBetween {
        /// File to edit
        file: PathBuf,

        /// Start tag
        #[arg(short, long)]
        start: String,

        /// End tag
        #[arg(short, long)]
        end: String,

        /// Line to insert (repeatable)
        #[arg(short, long = "line", allow_hyphen_values = true)]
        lines: Vec<String>,

        /// Skip lines already present between the tags
        #[arg(short, long)]
        unique: bool,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete every line carrying one of the tags
    ///
    /// Without any --tag the whole file content is deleted.
    Delete {
        /// File to edit
        file: PathBuf,

        /// Target tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete a tag-bounded range of lines
    ///
    /// With both tags, the lines between the pair are removed. With only
    /// --start, everything from the start line to the end of the file goes.
    /// With only --end, everything from the top through the end line goes.
    DeleteBetween {
        /// File to edit
        file: PathBuf,

        /// Start tag
        #[arg(short, long, default_value = "")]
        start: String,

        /// End tag
        #[arg(short, long, default_value = "")]
        end: String,

        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },
}

impl Commands {
    /// The file the command operates on.
    pub fn file(&self) -> &PathBuf {
        match self {
            Commands::Tags { file, .. }
            | Commands::Insert { file, .. }
            | Commands::InsertBetween { file, .. }
            | Commands::Delete { file, .. }
            | Commands::DeleteBetween { file, .. } => file,
        }
    }
}
