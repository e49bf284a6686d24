pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::toml_config::BehaviorsConfig;
pub use core::chain::BehaviorChain;
pub use core::engine::{BehaviorEngine, ChangeReport, CommandPlan};
pub use domain::model::{Decision, EnvVars, HookPhase, ProjectState, RevisionState, Workspace};
pub use domain::ports::{Launcher, RepoBehavior, TaskListener};
pub use utils::error::{RepoError, Result};
