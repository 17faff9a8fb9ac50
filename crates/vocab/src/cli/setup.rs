use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vocabapp::SortKey;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.0"
/// Format for dev builds: "v0.3.0\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

fn parse_sort(value: &str) -> Result<SortKey, String> {
    value.parse()
}

#[derive(Parser, Debug)]
#[command(
    name = "vocab",
    bin_name = "vocab",
    version = get_version(),
    disable_help_subcommand = true,
    after_help = "Remote store: set VOCAB_REMOTE_URL and VOCAB_REMOTE_KEY (and VOCAB_ACCESS_TOKEN to sign in).\nWithout them, words are kept locally."
)]
#[command(about = "A vocabulary notebook for the terminal", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory for the local store (overrides VOCAB_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Ignore any remote configuration and use the local store only
    #[arg(long, global = true, help_heading = "Options")]
    pub local: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a word
    Add {
        /// The term being learned
        original: String,

        /// What it means
        translation: String,

        /// How it is pronounced
        #[arg(short, long)]
        pronunciation: Option<String>,

        /// An example sentence
        #[arg(short, long)]
        example: Option<String>,
    },

    /// List words, favorites first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Search words across all fields
    Search {
        term: String,

        #[arg(short, long, value_parser = parse_sort)]
        sort: Option<SortKey>,
    },

    /// Change fields of a word
    Edit {
        id: String,

        #[arg(long)]
        original: Option<String>,

        #[arg(long)]
        translation: Option<String>,

        /// Empty string clears it
        #[arg(long)]
        pronunciation: Option<String>,

        /// Empty string clears it
        #[arg(long)]
        example: Option<String>,
    },

    /// Toggle a word's favorite mark
    Fav { id: String },

    /// Delete a word
    #[command(alias = "delete")]
    Rm { id: String },

    /// Learning statistics
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Add a starter set of words to an empty store
    Seed,

    /// Print the SQL that creates the remote table
    Schema,

    /// Show which stores are configured and reachable
    Status,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// updated_desc, updated_asc, original_asc, original_desc, translation_asc, translation_desc
    #[arg(short, long, value_parser = parse_sort)]
    pub sort: Option<SortKey>,

    /// Only show words matching this term
    #[arg(long)]
    pub search: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}
