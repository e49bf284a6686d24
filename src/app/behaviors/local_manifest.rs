use crate::core::{Decision, EnvVars, RepoBehavior, Result, TaskListener, Workspace};
use crate::utils::error::RepoError;
use crate::utils::validation::validate_path;
use async_trait::async_trait;

/// Drops a local manifest into `.repo/local_manifests/` once `repo init` is done,
/// so the following sync picks it up.
#[derive(Debug, Clone)]
pub struct LocalManifest {
    file_name: String,
    content: String,
}

impl LocalManifest {
    /// `name` must be a plain file name; it is placed inside `local_manifests/`.
    pub fn new(name: &str, content: impl Into<String>) -> Result<Self> {
        Self::validate_name("local_manifest.name", name)?;
        let file_name = if name.ends_with(".xml") {
            name.to_string()
        } else {
            format!("{}.xml", name)
        };
        Ok(Self {
            file_name,
            content: content.into(),
        })
    }

    pub fn validate_name(field_name: &str, name: &str) -> Result<()> {
        validate_path(field_name, name)?;
        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(RepoError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: name.to_string(),
                reason: "Manifest name must be a plain file name".to_string(),
            });
        }
        Ok(())
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

#[async_trait]
impl RepoBehavior for LocalManifest {
    fn name(&self) -> &str {
        "local_manifest"
    }

    async fn post_init(
        &self,
        workspace: &Workspace,
        env: &EnvVars,
        listener: &dyn TaskListener,
    ) -> Decision {
        let dir = workspace.local_manifests_dir();
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            listener.error(&format!("Cannot create {}: {}", dir.display(), e));
            return Decision::abort(format!("cannot create {}: {}", dir.display(), e));
        }

        let target = dir.join(&self.file_name);
        match tokio::fs::write(&target, env.expand(&self.content)).await {
            Ok(()) => {
                listener.info(&format!("Wrote local manifest {}", target.display()));
                Decision::Continue
            }
            Err(e) => {
                listener.error(&format!("Cannot write {}: {}", target.display(), e));
                Decision::abort(format!("cannot write {}: {}", target.display(), e))
            }
        }
    }
}
