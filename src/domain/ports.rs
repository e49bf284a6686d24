use crate::domain::model::{
    Decision, EnvVars, LaunchOutput, ProjectState, RevisionState, Workspace,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Sink for messages that should end up in the build log.
pub trait TaskListener: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub env: EnvVars,
}

impl LaunchRequest {
    /// The full command line, program first.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Capability to start processes on the machine that owns the workspace.
#[async_trait]
pub trait Launcher: Send + Sync {
    async fn launch(&self, request: &LaunchRequest) -> Result<LaunchOutput>;
}

/// Extension point for commandline additions to the `repo` command and
/// reactions to its lifecycle.
///
/// Every hook has a pass-through default, so a behavior only overrides what it needs.
/// Returning [`Decision::Abort`] from a hook signals that something needs the
/// user's attention and abandons the rest of the phase.
#[async_trait]
pub trait RepoBehavior: Send + Sync {
    fn name(&self) -> &str;

    /// Decorate the `repo init` commandline.
    async fn decorate_init(
        &self,
        _commands: &mut Vec<String>,
        _env: &EnvVars,
        _listener: &dyn TaskListener,
    ) -> Decision {
        Decision::Continue
    }

    /// Decorate the `repo sync` commandline.
    async fn decorate_sync(
        &self,
        _commands: &mut Vec<String>,
        _env: &EnvVars,
        _listener: &dyn TaskListener,
    ) -> Decision {
        Decision::Continue
    }

    /// Called just after a successful `repo init`.
    async fn post_init(
        &self,
        _workspace: &Workspace,
        _env: &EnvVars,
        _listener: &dyn TaskListener,
    ) -> Decision {
        Decision::Continue
    }

    /// Called just before `repo sync`. `executable` is the path or name of `repo`.
    async fn pre_sync(
        &self,
        _executable: &str,
        _launcher: &dyn Launcher,
        _workspace: &Workspace,
        _listener: &dyn TaskListener,
        _env: &EnvVars,
    ) -> Decision {
        Decision::Continue
    }

    /// Whether the detected changes are not worth a rebuild.
    fn should_ignore_changes(
        &self,
        _changed_projects: &[ProjectState],
        _current: &RevisionState,
        _baseline: &RevisionState,
    ) -> bool {
        false
    }
}
