use super::push_once;
use crate::core::{Decision, EnvVars, RepoBehavior, TaskListener};
use async_trait::async_trait;
use std::path::PathBuf;

/// `repo init --depth=N`
#[derive(Debug, Clone)]
pub struct ShallowClone {
    depth: u32,
}

impl ShallowClone {
    pub fn new(depth: u32) -> Self {
        Self { depth }
    }
}

#[async_trait]
impl RepoBehavior for ShallowClone {
    fn name(&self) -> &str {
        "shallow_clone"
    }

    async fn decorate_init(
        &self,
        commands: &mut Vec<String>,
        _env: &EnvVars,
        _listener: &dyn TaskListener,
    ) -> Decision {
        push_once(commands, format!("--depth={}", self.depth));
        Decision::Continue
    }
}

/// `repo init -g <groups>`
#[derive(Debug, Clone)]
pub struct ManifestGroups {
    groups: Vec<String>,
}

impl ManifestGroups {
    pub fn new(groups: Vec<String>) -> Self {
        Self { groups }
    }
}

#[async_trait]
impl RepoBehavior for ManifestGroups {
    fn name(&self) -> &str {
        "manifest_groups"
    }

    async fn decorate_init(
        &self,
        commands: &mut Vec<String>,
        env: &EnvVars,
        _listener: &dyn TaskListener,
    ) -> Decision {
        if self.groups.is_empty() {
            return Decision::Continue;
        }
        if has_groups_flag(commands) {
            tracing::debug!("Manifest groups already on the commandline, leaving them");
            return Decision::Continue;
        }
        let groups: Vec<String> = self.groups.iter().map(|g| env.expand(g)).collect();
        commands.push("-g".to_string());
        commands.push(groups.join(","));
        Decision::Continue
    }
}

fn has_groups_flag(commands: &[String]) -> bool {
    commands
        .iter()
        .any(|c| c == "-g" || c == "--groups" || c.starts_with("--groups="))
}

/// `repo init --reference=<dir>`, pointing at a local mirror.
/// Aborts the init when the mirror directory does not exist.
#[derive(Debug, Clone)]
pub struct ReferenceMirror {
    path: String,
}

impl ReferenceMirror {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RepoBehavior for ReferenceMirror {
    fn name(&self) -> &str {
        "reference_mirror"
    }

    async fn decorate_init(
        &self,
        commands: &mut Vec<String>,
        env: &EnvVars,
        listener: &dyn TaskListener,
    ) -> Decision {
        let mirror = PathBuf::from(env.expand(&self.path));

        let is_dir = tokio::fs::metadata(&mirror)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !is_dir {
            listener.error(&format!(
                "Reference mirror {} does not exist or is not a directory",
                mirror.display()
            ));
            return Decision::abort(format!("reference mirror {} is missing", mirror.display()));
        }

        listener.info(&format!("Using reference mirror {}", mirror.display()));
        push_once(commands, format!("--reference={}", mirror.display()));
        Decision::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::BufferedListener;
    use tempfile::TempDir;

    fn base() -> Vec<String> {
        vec!["repo".to_string(), "init".to_string()]
    }

    #[tokio::test]
    async fn test_shallow_clone_adds_depth_once() {
        let behavior = ShallowClone::new(1);
        let listener = BufferedListener::new();
        let mut commands = base();

        behavior
            .decorate_init(&mut commands, &EnvVars::new(), &listener)
            .await;
        behavior
            .decorate_init(&mut commands, &EnvVars::new(), &listener)
            .await;

        assert_eq!(commands, vec!["repo", "init", "--depth=1"]);
    }

    #[tokio::test]
    async fn test_manifest_groups_expand_env() {
        let behavior = ManifestGroups::new(vec!["default".to_string(), "${BOARD}".to_string()]);
        let env: EnvVars = [("BOARD", "pixel")].into_iter().collect();
        let mut commands = base();

        let decision = behavior
            .decorate_init(&mut commands, &env, &BufferedListener::new())
            .await;

        assert_eq!(decision, Decision::Continue);
        assert_eq!(commands, vec!["repo", "init", "-g", "default,pixel"]);
    }

    #[tokio::test]
    async fn test_manifest_groups_added_once() {
        let behavior = ManifestGroups::new(vec!["default".to_string()]);
        let listener = BufferedListener::new();
        let mut commands = base();

        behavior
            .decorate_init(&mut commands, &EnvVars::new(), &listener)
            .await;
        behavior
            .decorate_init(&mut commands, &EnvVars::new(), &listener)
            .await;
        assert_eq!(commands, vec!["repo", "init", "-g", "default"]);

        let mut preset = vec!["repo".to_string(), "init".to_string(), "--groups=all".to_string()];
        behavior
            .decorate_init(&mut preset, &EnvVars::new(), &listener)
            .await;
        assert_eq!(preset, vec!["repo", "init", "--groups=all"]);
    }

    #[tokio::test]
    async fn test_reference_mirror_present() {
        let mirror = TempDir::new().unwrap();
        let env: EnvVars = [("MIRROR", mirror.path().to_str().unwrap())]
            .into_iter()
            .collect();
        let behavior = ReferenceMirror::new("${MIRROR}");
        let listener = BufferedListener::new();
        let mut commands = base();

        let decision = behavior.decorate_init(&mut commands, &env, &listener).await;

        assert_eq!(decision, Decision::Continue);
        assert_eq!(
            commands.last().unwrap(),
            &format!("--reference={}", mirror.path().display())
        );
        assert_eq!(listener.lines().len(), 1);
    }

    #[tokio::test]
    async fn test_reference_mirror_missing_aborts() {
        let behavior = ReferenceMirror::new("/definitely/not/a/mirror");
        let listener = BufferedListener::new();
        let mut commands = base();

        let decision = behavior
            .decorate_init(&mut commands, &EnvVars::new(), &listener)
            .await;

        assert!(matches!(decision, Decision::Abort(_)));
        assert_eq!(commands, base());
        assert!(listener.lines()[0].starts_with("ERROR: "));
    }
}
