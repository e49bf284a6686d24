use crate::core::{Decision, EnvVars, RepoBehavior, TaskListener};
use async_trait::async_trait;

/// Free-form tokens appended to `repo init` and `repo sync`, with `${VAR}` expansion.
#[derive(Debug, Clone, Default)]
pub struct ExtraArgs {
    pub init: Vec<String>,
    pub sync: Vec<String>,
}

impl ExtraArgs {
    fn append(tokens: &[String], commands: &mut Vec<String>, env: &EnvVars) {
        commands.extend(tokens.iter().map(|token| env.expand(token)));
    }
}

#[async_trait]
impl RepoBehavior for ExtraArgs {
    fn name(&self) -> &str {
        "extra_args"
    }

    async fn decorate_init(
        &self,
        commands: &mut Vec<String>,
        env: &EnvVars,
        _listener: &dyn TaskListener,
    ) -> Decision {
        Self::append(&self.init, commands, env);
        Decision::Continue
    }

    async fn decorate_sync(
        &self,
        commands: &mut Vec<String>,
        env: &EnvVars,
        _listener: &dyn TaskListener,
    ) -> Decision {
        Self::append(&self.sync, commands, env);
        Decision::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::BufferedListener;

    #[tokio::test]
    async fn test_extra_args_per_command() {
        let behavior = ExtraArgs {
            init: vec!["--no-clone-bundle".to_string()],
            sync: vec!["--optimized-fetch".to_string(), "--retry-fetches=${RETRIES}".to_string()],
        };
        let env: EnvVars = [("RETRIES", "3")].into_iter().collect();
        let listener = BufferedListener::new();

        let mut init = vec!["repo".to_string(), "init".to_string()];
        let mut sync = vec!["repo".to_string(), "sync".to_string()];
        behavior.decorate_init(&mut init, &env, &listener).await;
        behavior.decorate_sync(&mut sync, &env, &listener).await;

        assert_eq!(init, vec!["repo", "init", "--no-clone-bundle"]);
        assert_eq!(
            sync,
            vec!["repo", "sync", "--optimized-fetch", "--retry-fetches=3"]
        );
    }
}
