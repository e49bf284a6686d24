pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "repo-behaviors")]
#[command(about = "Preview how configured behaviors shape repo init/sync")]
pub struct CliConfig {
    /// Path to the behaviors TOML file
    #[arg(short, long, default_value = "repo-behaviors.toml")]
    pub config: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the decorated `repo init` and `repo sync` commandlines
    Plan {
        /// Also show what pre-sync behaviors would launch in this workspace
        #[arg(long)]
        workspace: Option<String>,
    },
    /// Run post-init behaviors against an initialised workspace
    PostInit {
        #[arg(long)]
        workspace: String,
    },
    /// Compare two revision snapshots (JSON) and report whether a rebuild is warranted
    Changes {
        #[arg(long)]
        current: String,
        #[arg(long)]
        baseline: String,
    },
}
