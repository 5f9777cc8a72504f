use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::memory::record::LookupKey;

/// onpull: archive encrypted memories to IPFS and sweep pinned files
#[derive(Parser, Debug)]
#[command(
    name = "onpull",
    version,
    about = "Archive encrypted memories to IPFS and sweep pinned files",
    long_about = "onpull pins encrypted text memories through Pinata, indexes them in Supabase,\n\
                   reads them back by id, and can bulk-delete every pinned file.",
    after_help = "EXAMPLES:\n  \
        onpull archive \"today was good\"           Encrypt, pin and index a memory\n  \
        onpull archive --ai-id ai_core_002 < note   Archive stdin for another identity\n  \
        onpull recall ai_core_001                   Show every memory for an identity\n  \
        onpull recall --by batch_id <uuid>          Show a single archived batch\n  \
        onpull import memory.json                   Archive the first record of a JSON file\n  \
        onpull keygen                               Generate an encryption key\n  \
        onpull clean                                Delete all public, then private files\n  \
        onpull clean --keep-going                   Continue to private if public fails\n\n\
        ENVIRONMENT (.env is loaded automatically):\n  \
        PINATA_JWT, SUPABASE_URL, SUPABASE_KEY, ENCRYPTION_KEY_<AI_ID>"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode, minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Delete every pinned file, public scope first, then private
    Clean {
        /// Keep cleaning the next scope when listing one fails
        #[arg(long)]
        keep_going: bool,
    },

    /// Encrypt, pin and index a memory
    Archive {
        /// Memory text (read from stdin when omitted)
        content: Option<String>,

        /// Identity the memory is stored under
        #[arg(long, env = "ONPULL_AI_ID", default_value = "ai_core_001")]
        ai_id: String,

        /// Display name shown in output only; never stored
        #[arg(long)]
        display_name: Option<String>,
    },

    /// Look up memories and decrypt them
    Recall {
        /// Value to match
        value: String,

        /// Column to match on
        #[arg(long, default_value = "ai_id")]
        by: LookupMode,

        /// Identity whose key decrypts the results
        #[arg(long, env = "ONPULL_AI_ID", default_value = "ai_core_001")]
        ai_id: String,
    },

    /// Archive the first record of a JSON file
    Import {
        /// JSON file holding an object or an array of objects
        path: PathBuf,

        /// Identity the memory is stored under (the file's own id is ignored)
        #[arg(long, env = "ONPULL_AI_ID", default_value = "ai_core_001")]
        ai_id: String,
    },

    /// Generate a new encryption key
    Keygen {
        /// Where to write the key
        #[arg(long, short, default_value = "generated_key.txt")]
        output: PathBuf,
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
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset to default configuration
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Write a default config file to ~/.onpull
    Init,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum LookupMode {
    AiId,
    IpfsCid,
    BatchId,
}

impl From<LookupMode> for LookupKey {
    fn from(mode: LookupMode) -> Self {
        match mode {
            LookupMode::AiId => LookupKey::AiId,
            LookupMode::IpfsCid => LookupKey::IpfsCid,
            LookupMode::BatchId => LookupKey::BatchId,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
