pub mod chain;
pub mod command;
pub mod engine;

pub use crate::domain::model::{
    Decision, EnvVars, HookPhase, LaunchOutput, ProjectState, RevisionState, Workspace,
};
pub use crate::domain::ports::{LaunchRequest, Launcher, RepoBehavior, TaskListener};
pub use crate::utils::error::Result;
