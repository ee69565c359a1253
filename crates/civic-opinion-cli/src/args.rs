use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "civic-opinion")]
#[command(about = "Keyword-based classification and summaries for citizen opinions")]
#[command(version)]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.civic-opinion)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// User identifier for comments and reactions (default: $CIVIC_OPINION_USER or "anonymous")
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a title/content pair without storing anything
    Classify {
        /// Opinion title
        #[arg(short, long, default_value = "")]
        title: String,

        /// Opinion body
        #[arg(short, long, default_value = "")]
        content: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Show per-category scores
        #[arg(long)]
        explain: bool,
    },

    /// Submit a new opinion (classified on creation)
    Submit {
        /// Opinion title
        #[arg(short, long)]
        title: String,

        /// Opinion body
        #[arg(short, long, default_value = "")]
        content: String,

        /// Author display name
        #[arg(short, long)]
        author: Option<String>,

        /// User supplied tag (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Store without classifying
        #[arg(long)]
        no_classify: bool,
    },

    /// Re-run classification for stored opinions
    Reclassify {
        /// Opinion id
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        id: Option<String>,

        /// Reclassify every stored opinion
        #[arg(long)]
        all: bool,
    },

    /// List stored opinions (newest first)
    List {
        /// Maximum opinions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Only show opinions in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show one opinion with its comments and reactions
    Show {
        /// Opinion id
        id: String,
    },

    /// Summarize the most recent opinions by category
    Summarize {
        /// Number of recent opinions (default: summary.limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List categories in tie-break order
    Categories,

    /// Manage comments
    Comment {
        #[command(subcommand)]
        action: CommentAction,
    },

    /// Toggle a reaction on an opinion
    React {
        /// Opinion id
        id: String,

        /// Reaction type (e.g., like, agree)
        reaction_type: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CommentAction {
    /// Add a comment to an opinion
    Add {
        /// Opinion id
        id: String,

        /// Comment body
        #[arg(short, long)]
        content: String,

        /// Author display name
        #[arg(short, long)]
        author: Option<String>,
    },

    /// List comments on an opinion (oldest first)
    List {
        /// Opinion id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., summary.limit)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., summary.limit)
        key: String,

        /// Value to set (e.g., "50" or "categories.toml")
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}
