//! Command-line definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ookstats_core::Region;

#[derive(Parser)]
#[command(name = "ookstats", about = "Search Challenge Mode players on ookstats", version)]
pub struct Cli {
    /// Site serving the player search shards [env: OOKSTATS_BASE_URL]
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Read shards from a directory of generated players-NNN.json files instead
    #[arg(long, global = true, conflicts_with = "base_url")]
    pub shards_dir: Option<PathBuf>,

    /// Directory holding the cached player list [env: OOKSTATS_CACHE_DIR]
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fuzzy search players by name, realm, region, class or spec
    Search {
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },

    /// Player-name suggestions as a chat bot would offer them
    Autocomplete {
        /// Part of a player name; may be empty
        #[arg(default_value = "")]
        query: String,

        #[arg(long)]
        region: Option<Region>,

        /// Realm slug, e.g. `area-52`
        #[arg(long)]
        realm: Option<String>,

        /// Class name, e.g. `death knight`
        #[arg(long)]
        class: Option<String>,
    },

    /// Inspect or clear the cached player list
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Drive the search widget from the terminal
    ///
    /// Plain lines are typed into the search box. Lines starting with `:`
    /// are keys: `:down`, `:up`, `:tab`, `:stab`, `:enter`, `:esc`, `:clear`,
    /// `:focus`, `:slash`, `:hover N`, `:click N` and `:quit`.
    Interactive,
}

#[derive(Subcommand)]
pub enum CacheAction {
    Status,
    Clear,
}
