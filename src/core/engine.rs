use crate::core::chain::BehaviorChain;
use crate::core::command::{RepoCommand, RepoSettings};
use crate::core::{
    Decision, EnvVars, Launcher, ProjectState, Result, RevisionState, TaskListener, Workspace,
};

/// Decorated command lines for one build.
///
/// A `None` command means a behavior stopped that phase and the host should skip it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    pub init: Option<Vec<String>>,
    pub sync: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChangeReport {
    pub changed: Vec<ProjectState>,
    pub ignored: bool,
}

impl ChangeReport {
    /// True when there is something new and no behavior claimed it.
    pub fn warrants_rebuild(&self) -> bool {
        !self.changed.is_empty() && !self.ignored
    }
}

/// Walks a [`BehaviorChain`] through the `repo` lifecycle on behalf of the host.
/// It never runs `repo` itself.
pub struct BehaviorEngine {
    settings: RepoSettings,
    chain: BehaviorChain,
    env: EnvVars,
}

impl BehaviorEngine {
    pub fn new(settings: RepoSettings, chain: BehaviorChain, env: EnvVars) -> Self {
        Self {
            settings,
            chain,
            env,
        }
    }

    pub fn chain(&self) -> &BehaviorChain {
        &self.chain
    }

    pub fn settings(&self) -> &RepoSettings {
        &self.settings
    }

    pub async fn plan(&self, listener: &dyn TaskListener) -> Result<CommandPlan> {
        tracing::info!(behaviors = self.chain.len(), "Decorating repo commandlines");

        let mut init = RepoCommand::init_command(&self.settings);
        let decision = self.chain.decorate_init(&mut init, &self.env, listener).await?;
        let init = decision.should_continue().then_some(init);

        let mut sync = RepoCommand::sync_command(&self.settings);
        let decision = self.chain.decorate_sync(&mut sync, &self.env, listener).await?;
        let sync = decision.should_continue().then_some(sync);

        tracing::debug!(?init, ?sync, "Commandlines decorated");
        Ok(CommandPlan { init, sync })
    }

    pub async fn post_init(
        &self,
        workspace: &Workspace,
        listener: &dyn TaskListener,
    ) -> Result<Decision> {
        tracing::info!(workspace = %workspace.path().display(), "Running post-init behaviors");
        self.chain.post_init(workspace, &self.env, listener).await
    }

    pub async fn pre_sync(
        &self,
        launcher: &dyn Launcher,
        workspace: &Workspace,
        listener: &dyn TaskListener,
    ) -> Result<Decision> {
        tracing::info!(workspace = %workspace.path().display(), "Running pre-sync behaviors");
        self.chain
            .pre_sync(
                &self.settings.executable,
                launcher,
                workspace,
                listener,
                &self.env,
            )
            .await
    }

    pub fn evaluate_changes(&self, current: &RevisionState, baseline: &RevisionState) -> ChangeReport {
        let changed = current.changed_projects(baseline);
        let ignored = !changed.is_empty()
            && self.chain.should_ignore_changes(&changed, current, baseline);

        tracing::info!(changed = changed.len(), ignored, "Evaluated revision changes");
        ChangeReport { changed, ignored }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::BufferedListener;
    use crate::app::behaviors::{IgnoreProjects, SyncOptions};
    use crate::core::RepoBehavior;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct NoSync;

    #[async_trait]
    impl RepoBehavior for NoSync {
        fn name(&self) -> &str {
            "no_sync"
        }

        async fn decorate_sync(
            &self,
            _commands: &mut Vec<String>,
            _env: &EnvVars,
            _listener: &dyn TaskListener,
        ) -> Decision {
            Decision::Stop
        }
    }

    fn settings() -> RepoSettings {
        RepoSettings::new("https://example.com/manifest")
    }

    #[tokio::test]
    async fn test_plan_with_sync_options() {
        let mut chain = BehaviorChain::new();
        chain.register(Arc::new(SyncOptions {
            jobs: Some(2),
            ..Default::default()
        }));
        let engine = BehaviorEngine::new(settings(), chain, EnvVars::new());

        let plan = engine.plan(&BufferedListener::new()).await.unwrap();

        assert_eq!(
            plan.init.unwrap(),
            vec!["repo", "init", "-u", "https://example.com/manifest"]
        );
        assert_eq!(plan.sync.unwrap(), vec!["repo", "sync", "-d", "--jobs=2"]);
    }

    #[tokio::test]
    async fn test_stopped_phase_is_skipped() {
        let mut chain = BehaviorChain::new();
        chain.register(Arc::new(NoSync));
        let engine = BehaviorEngine::new(settings(), chain, EnvVars::new());

        let plan = engine.plan(&BufferedListener::new()).await.unwrap();

        assert!(plan.init.is_some());
        assert!(plan.sync.is_none());
    }

    #[test]
    fn test_evaluate_changes() {
        let mut chain = BehaviorChain::new();
        chain.register(Arc::new(IgnoreProjects::new(&["^docs/".to_string()]).unwrap()));
        let engine = BehaviorEngine::new(settings(), chain, EnvVars::new());

        let baseline = RevisionState::new(None, None)
            .with_project(ProjectState::new("docs/guide", "docs/guide", "1"))
            .with_project(ProjectState::new("kernel", "kernel", "1"));
        let docs_only = baseline
            .clone()
            .with_project(ProjectState::new("docs/guide", "docs/guide", "2"));
        let kernel_too = docs_only
            .clone()
            .with_project(ProjectState::new("kernel", "kernel", "2"));

        let report = engine.evaluate_changes(&docs_only, &baseline);
        assert!(report.ignored);
        assert!(!report.warrants_rebuild());

        let report = engine.evaluate_changes(&kernel_too, &baseline);
        assert_eq!(report.changed.len(), 2);
        assert!(report.warrants_rebuild());

        let report = engine.evaluate_changes(&baseline, &baseline);
        assert!(report.changed.is_empty());
        assert!(!report.ignored);
    }
}
