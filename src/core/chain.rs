use crate::core::{
    Decision, EnvVars, HookPhase, Launcher, ProjectState, RepoBehavior, Result, RevisionState,
    TaskListener, Workspace,
};
use crate::utils::error::RepoError;
use std::sync::Arc;

pub const DEFAULT_PRIORITY: u32 = 100;

struct BehaviorEntry {
    behavior: Arc<dyn RepoBehavior>,
    priority: u32,
}

/// Ordered set of behaviors invoked by the host at each lifecycle point.
///
/// Behaviors run in priority order (lower number first, registration order for ties).
/// Within a phase:
/// - `Stop` ends the phase; the host should skip the call. Later behaviors are not asked.
/// - `Abort` ends the phase with [`RepoError::BehaviorAborted`].
#[derive(Default)]
pub struct BehaviorChain {
    entries: Vec<BehaviorEntry>,
}

impl BehaviorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, behavior: Arc<dyn RepoBehavior>) {
        self.register_with_priority(behavior, DEFAULT_PRIORITY);
    }

    pub fn register_with_priority(&mut self, behavior: Arc<dyn RepoBehavior>, priority: u32) {
        tracing::debug!(behavior = behavior.name(), priority, "Registering behavior");
        self.entries.push(BehaviorEntry { behavior, priority });
        // stable sort: ties keep registration order
        self.entries.sort_by_key(|e| e.priority);
    }

    /// Remove every behavior with this name. Returns `true` if any was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.behavior.name() != name);
        self.entries.len() < before
    }

    /// Behavior names in invocation order.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.behavior.name().to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn behaviors(&self) -> impl Iterator<Item = &Arc<dyn RepoBehavior>> {
        self.entries.iter().map(|e| &e.behavior)
    }

    pub async fn decorate_init(
        &self,
        commands: &mut Vec<String>,
        env: &EnvVars,
        listener: &dyn TaskListener,
    ) -> Result<Decision> {
        for behavior in self.behaviors() {
            let decision = behavior.decorate_init(commands, env, listener).await;
            if let Some(end) = settle(behavior.as_ref(), HookPhase::DecorateInit, decision)? {
                return Ok(end);
            }
        }
        Ok(Decision::Continue)
    }

    pub async fn decorate_sync(
        &self,
        commands: &mut Vec<String>,
        env: &EnvVars,
        listener: &dyn TaskListener,
    ) -> Result<Decision> {
        for behavior in self.behaviors() {
            let decision = behavior.decorate_sync(commands, env, listener).await;
            if let Some(end) = settle(behavior.as_ref(), HookPhase::DecorateSync, decision)? {
                return Ok(end);
            }
        }
        Ok(Decision::Continue)
    }

    pub async fn post_init(
        &self,
        workspace: &Workspace,
        env: &EnvVars,
        listener: &dyn TaskListener,
    ) -> Result<Decision> {
        for behavior in self.behaviors() {
            let decision = behavior.post_init(workspace, env, listener).await;
            if let Some(end) = settle(behavior.as_ref(), HookPhase::PostInit, decision)? {
                return Ok(end);
            }
        }
        Ok(Decision::Continue)
    }

    pub async fn pre_sync(
        &self,
        executable: &str,
        launcher: &dyn Launcher,
        workspace: &Workspace,
        listener: &dyn TaskListener,
        env: &EnvVars,
    ) -> Result<Decision> {
        for behavior in self.behaviors() {
            let decision = behavior
                .pre_sync(executable, launcher, workspace, listener, env)
                .await;
            if let Some(end) = settle(behavior.as_ref(), HookPhase::PreSync, decision)? {
                return Ok(end);
            }
        }
        Ok(Decision::Continue)
    }

    /// The first behavior to say `true` gets it.
    pub fn should_ignore_changes(
        &self,
        changed_projects: &[ProjectState],
        current: &RevisionState,
        baseline: &RevisionState,
    ) -> bool {
        let claimant = self
            .behaviors()
            .find(|b| b.should_ignore_changes(changed_projects, current, baseline));

        match claimant {
            Some(behavior) => {
                tracing::info!(
                    behavior = behavior.name(),
                    changed = changed_projects.len(),
                    "Changes ignored"
                );
                true
            }
            None => false,
        }
    }
}

/// `Ok(None)` keeps the phase going, `Ok(Some(Stop))` ends it quietly.
fn settle(
    behavior: &dyn RepoBehavior,
    phase: HookPhase,
    decision: Decision,
) -> Result<Option<Decision>> {
    match decision {
        Decision::Continue => {
            tracing::trace!(behavior = behavior.name(), %phase, "continue");
            Ok(None)
        }
        Decision::Stop => {
            tracing::debug!(behavior = behavior.name(), %phase, "Behavior stopped the phase");
            Ok(Some(Decision::Stop))
        }
        Decision::Abort(reason) => {
            tracing::warn!(behavior = behavior.name(), %phase, "Behavior aborted: {}", reason);
            Err(RepoError::BehaviorAborted {
                behavior: behavior.name().to_string(),
                phase,
                reason,
            })
        }
    }
}
