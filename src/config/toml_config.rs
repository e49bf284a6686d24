use crate::app::behaviors::{
    ExtraArgs, IgnoreProjects, LocalManifest, ManifestGroups, ReferenceMirror, ResetFirst,
    ShallowClone, SyncOptions,
};
use crate::core::chain::{BehaviorChain, DEFAULT_PRIORITY};
use crate::core::command::RepoSettings;
use crate::core::engine::BehaviorEngine;
use crate::core::{EnvVars, RepoBehavior};
use crate::utils::error::{RepoError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_regex,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorsConfig {
    pub repo: RepoSettings,
    /// Extra variables layered over the process environment.
    pub environment: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub behaviors: Vec<BehaviorEntry>,
}

fn default_enabled() -> bool {
    true
}

fn default_manifest_name() -> String {
    "local".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorEntry {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub priority: Option<u32>,
    #[serde(flatten)]
    pub spec: BehaviorSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BehaviorSpec {
    ShallowClone {
        depth: u32,
    },
    ManifestGroups {
        groups: Vec<String>,
    },
    ReferenceMirror {
        path: String,
    },
    SyncOptions {
        jobs: Option<u32>,
        #[serde(default)]
        current_branch: bool,
        #[serde(default)]
        no_tags: bool,
        #[serde(default)]
        force_sync: bool,
    },
    ExtraArgs {
        #[serde(default)]
        init: Vec<String>,
        #[serde(default)]
        sync: Vec<String>,
    },
    LocalManifest {
        #[serde(default = "default_manifest_name")]
        name: String,
        content: String,
    },
    ResetFirst {
        #[serde(default)]
        clean: bool,
    },
    IgnoreProjects {
        patterns: Vec<String>,
    },
}

impl BehaviorSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            BehaviorSpec::ShallowClone { .. } => "shallow_clone",
            BehaviorSpec::ManifestGroups { .. } => "manifest_groups",
            BehaviorSpec::ReferenceMirror { .. } => "reference_mirror",
            BehaviorSpec::SyncOptions { .. } => "sync_options",
            BehaviorSpec::ExtraArgs { .. } => "extra_args",
            BehaviorSpec::LocalManifest { .. } => "local_manifest",
            BehaviorSpec::ResetFirst { .. } => "reset_first",
            BehaviorSpec::IgnoreProjects { .. } => "ignore_projects",
        }
    }

    pub fn build(&self) -> Result<Arc<dyn RepoBehavior>> {
        let behavior: Arc<dyn RepoBehavior> = match self {
            BehaviorSpec::ShallowClone { depth } => Arc::new(ShallowClone::new(*depth)),
            BehaviorSpec::ManifestGroups { groups } => {
                Arc::new(ManifestGroups::new(groups.clone()))
            }
            BehaviorSpec::ReferenceMirror { path } => Arc::new(ReferenceMirror::new(path.clone())),
            BehaviorSpec::SyncOptions {
                jobs,
                current_branch,
                no_tags,
                force_sync,
            } => Arc::new(SyncOptions {
                jobs: *jobs,
                current_branch: *current_branch,
                no_tags: *no_tags,
                force_sync: *force_sync,
            }),
            BehaviorSpec::ExtraArgs { init, sync } => Arc::new(ExtraArgs {
                init: init.clone(),
                sync: sync.clone(),
            }),
            BehaviorSpec::LocalManifest { name, content } => {
                Arc::new(LocalManifest::new(name, content.clone())?)
            }
            BehaviorSpec::ResetFirst { clean } => Arc::new(ResetFirst { clean: *clean }),
            BehaviorSpec::IgnoreProjects { patterns } => Arc::new(IgnoreProjects::new(patterns)?),
        };
        Ok(behavior)
    }

    fn validate_at(&self, index: usize) -> Result<()> {
        let field = |name: &str| format!("behaviors[{}].{}", index, name);

        match self {
            BehaviorSpec::ShallowClone { depth } => {
                validate_positive_number(&field("depth"), *depth, 1)
            }
            BehaviorSpec::ManifestGroups { groups } => {
                if groups.is_empty() {
                    return Err(RepoError::MissingConfigError {
                        field: field("groups"),
                    });
                }
                groups
                    .iter()
                    .try_for_each(|g| validate_non_empty_string(&field("groups"), g))
            }
            BehaviorSpec::ReferenceMirror { path } => validate_path(&field("path"), path),
            BehaviorSpec::SyncOptions { jobs, .. } => match jobs {
                Some(jobs) => validate_positive_number(&field("jobs"), *jobs, 1),
                None => Ok(()),
            },
            BehaviorSpec::ExtraArgs { init, sync } => init
                .iter()
                .chain(sync.iter())
                .try_for_each(|arg| validate_non_empty_string(&field("args"), arg)),
            BehaviorSpec::LocalManifest { name, content } => {
                LocalManifest::validate_name(&field("name"), name)?;
                validate_non_empty_string(&field("content"), content)
            }
            BehaviorSpec::ResetFirst { .. } => Ok(()),
            BehaviorSpec::IgnoreProjects { patterns } => {
                if patterns.is_empty() {
                    return Err(RepoError::MissingConfigError {
                        field: field("patterns"),
                    });
                }
                patterns
                    .iter()
                    .try_for_each(|p| validate_regex(&field("patterns"), p).map(|_| ()))
            }
        }
    }
}

impl BehaviorsConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RepoError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parse, then resolve `${VAR}` references.
    ///
    /// `[environment]` values are expanded against the process environment; the
    /// `[repo]` table is expanded against [`env`](Self::env). Behavior fields stay
    /// verbatim and are expanded by the behaviors themselves at hook time.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(content).map_err(|e| RepoError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        if let Some(extra) = config.environment.as_mut() {
            let process = EnvVars::from_process();
            for value in extra.values_mut() {
                *value = process.expand(value);
            }
        }

        let env = config.env();
        let repo = &mut config.repo;
        repo.executable = env.expand(&repo.executable);
        repo.manifest_url = env.expand(&repo.manifest_url);
        if let Some(branch) = repo.manifest_branch.as_mut() {
            *branch = env.expand(branch);
        }
        if let Some(file) = repo.manifest_file.as_mut() {
            *file = env.expand(file);
        }

        Ok(config)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("repo.executable", &self.repo.executable)?;
        validate_url("repo.manifest_url", &self.repo.manifest_url)?;

        if let Some(branch) = &self.repo.manifest_branch {
            validate_non_empty_string("repo.manifest_branch", branch)?;
        }
        if let Some(file) = &self.repo.manifest_file {
            validate_path("repo.manifest_file", file)?;
        }

        for (index, entry) in self.behaviors.iter().enumerate() {
            entry.spec.validate_at(index)?;
        }

        Ok(())
    }

    /// Process environment with the `[environment]` table layered on top.
    pub fn env(&self) -> EnvVars {
        let mut env = EnvVars::from_process();
        if let Some(extra) = &self.environment {
            for (key, value) in extra {
                env.insert(key.clone(), value.clone());
            }
        }
        env
    }

    /// Enabled behaviors, in priority order.
    pub fn build_chain(&self) -> Result<BehaviorChain> {
        let mut chain = BehaviorChain::new();
        for entry in self.behaviors.iter().filter(|e| e.enabled) {
            let priority = entry.priority.unwrap_or(DEFAULT_PRIORITY);
            chain.register_with_priority(entry.spec.build()?, priority);
        }

        let skipped = self.behaviors.iter().filter(|e| !e.enabled).count();
        if skipped > 0 {
            tracing::debug!(skipped, "Disabled behaviors skipped");
        }

        Ok(chain)
    }

    pub fn into_engine(self) -> Result<BehaviorEngine> {
        let chain = self.build_chain()?;
        let env = self.env();
        Ok(BehaviorEngine::new(self.repo, chain, env))
    }
}

impl Validate for BehaviorsConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
