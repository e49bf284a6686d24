use crate::core::{
    Decision, EnvVars, LaunchRequest, Launcher, RepoBehavior, TaskListener, Workspace,
};
use async_trait::async_trait;

/// Throws away local modifications in every project before syncing:
/// `repo forall -c git reset --hard`, followed by `git clean -fdx` when `clean` is set.
#[derive(Debug, Clone, Default)]
pub struct ResetFirst {
    pub clean: bool,
}

impl ResetFirst {
    fn forall(executable: &str, workspace: &Workspace, env: &EnvVars, git: &str) -> LaunchRequest {
        LaunchRequest {
            program: executable.to_string(),
            args: vec!["forall".to_string(), "-c".to_string(), git.to_string()],
            cwd: workspace.path().to_path_buf(),
            env: env.clone(),
        }
    }

    fn commands(&self) -> Vec<&'static str> {
        if self.clean {
            vec!["git reset --hard", "git clean -fdx"]
        } else {
            vec!["git reset --hard"]
        }
    }
}

#[async_trait]
impl RepoBehavior for ResetFirst {
    fn name(&self) -> &str {
        "reset_first"
    }

    async fn pre_sync(
        &self,
        executable: &str,
        launcher: &dyn Launcher,
        workspace: &Workspace,
        listener: &dyn TaskListener,
        env: &EnvVars,
    ) -> Decision {
        if tokio::fs::metadata(workspace.repo_dir()).await.is_err() {
            tracing::debug!(workspace = %workspace.path().display(), "No checkout yet, nothing to reset");
            return Decision::Continue;
        }

        for git in self.commands() {
            let request = Self::forall(executable, workspace, env, git);
            listener.info(&format!("$ {}", request.command_line()));

            let output = match launcher.launch(&request).await {
                Ok(output) => output,
                Err(e) => {
                    listener.error(&e.to_string());
                    return Decision::abort(format!("could not run '{}': {}", git, e));
                }
            };

            if !output.success() {
                if !output.stderr.is_empty() {
                    listener.error(output.stderr.trim_end());
                }
                return Decision::abort(format!("'{}' exited with status {}", git, output.status));
            }
        }

        Decision::Continue
    }
}
