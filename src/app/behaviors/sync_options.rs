use super::push_once;
use crate::core::{Decision, EnvVars, RepoBehavior, TaskListener};
use async_trait::async_trait;

/// Common `repo sync` switches.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    pub jobs: Option<u32>,
    pub current_branch: bool,
    pub no_tags: bool,
    pub force_sync: bool,
}

#[async_trait]
impl RepoBehavior for SyncOptions {
    fn name(&self) -> &str {
        "sync_options"
    }

    async fn decorate_sync(
        &self,
        commands: &mut Vec<String>,
        _env: &EnvVars,
        _listener: &dyn TaskListener,
    ) -> Decision {
        if let Some(jobs) = self.jobs {
            push_once(commands, format!("--jobs={}", jobs));
        }
        if self.current_branch {
            push_once(commands, "-c".to_string());
        }
        if self.no_tags {
            push_once(commands, "--no-tags".to_string());
        }
        if self.force_sync {
            push_once(commands, "--force-sync".to_string());
        }
        Decision::Continue
    }
}
