use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static VAR_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("variable reference pattern"));

/// Environment handed to every hook, ordered by variable name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVars {
    vars: BTreeMap<String, String>,
}

impl EnvVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment.
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Replace `${NAME}` references with their values. Unknown names are kept as written.
    pub fn expand(&self, input: &str) -> String {
        VAR_REFERENCE
            .replace_all(input, |caps: &Captures| {
                let name = &caps[1];
                self.get(name)
                    .map(str::to_string)
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A single repository checked out by `repo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectState {
    /// Path of the project relative to the workspace root.
    pub path: String,
    /// Name of the project on the remote server.
    pub server_path: String,
    pub revision: String,
}

impl ProjectState {
    pub fn new(
        path: impl Into<String>,
        server_path: impl Into<String>,
        revision: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            server_path: server_path.into(),
            revision: revision.into(),
        }
    }
}

/// Resolved revisions of every managed repository at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionState {
    pub branch: Option<String>,
    pub manifest_url: Option<String>,
    #[serde(default)]
    pub projects: BTreeMap<String, ProjectState>,
    #[serde(default = "Utc::now")]
    pub captured_at: DateTime<Utc>,
}

impl RevisionState {
    pub fn new(branch: Option<String>, manifest_url: Option<String>) -> Self {
        Self {
            branch,
            manifest_url,
            projects: BTreeMap::new(),
            captured_at: Utc::now(),
        }
    }

    /// Load a snapshot written as JSON. Read failures surface as `IoError`,
    /// malformed content as `SerializationError`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn with_project(mut self, project: ProjectState) -> Self {
        self.projects.insert(project.path.clone(), project);
        self
    }

    pub fn project(&self, path: &str) -> Option<&ProjectState> {
        self.projects.get(path)
    }

    /// Projects that are new or whose revision moved since `baseline`, ordered by path.
    pub fn changed_projects(&self, baseline: &RevisionState) -> Vec<ProjectState> {
        self.projects
            .values()
            .filter(|project| match baseline.project(&project.path) {
                Some(previous) => previous.revision != project.revision,
                None => true,
            })
            .cloned()
            .collect()
    }
}

/// Directory in which `repo init` and `repo sync` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn repo_dir(&self) -> PathBuf {
        self.root.join(".repo")
    }

    pub fn local_manifests_dir(&self) -> PathBuf {
        self.repo_dir().join("local_manifests")
    }
}

/// What a behavior wants the host to do after one of its hooks ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Keep going with the call.
    Continue,
    /// Do not perform the call. Not an error.
    Stop,
    /// Something needs the user's attention; the phase is abandoned.
    Abort(String),
}

impl Decision {
    pub fn abort(reason: impl Into<String>) -> Self {
        Decision::Abort(reason.into())
    }

    pub fn should_continue(&self) -> bool {
        matches!(self, Decision::Continue)
    }
}

impl From<bool> for Decision {
    fn from(proceed: bool) -> Self {
        if proceed {
            Decision::Continue
        } else {
            Decision::Stop
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPhase {
    DecorateInit,
    DecorateSync,
    PostInit,
    PreSync,
    IgnoreChanges,
}

impl HookPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookPhase::DecorateInit => "decorate_init",
            HookPhase::DecorateSync => "decorate_sync",
            HookPhase::PostInit => "post_init",
            HookPhase::PreSync => "pre_sync",
            HookPhase::IgnoreChanges => "ignore_changes",
        }
    }
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a process started through a [`Launcher`](crate::domain::ports::Launcher).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl LaunchOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(revisions: &[(&str, &str)]) -> RevisionState {
        revisions.iter().fold(
            RevisionState::new(Some("main".to_string()), None),
            |state, (path, rev)| state.with_project(ProjectState::new(*path, *path, *rev)),
        )
    }

    #[test]
    fn test_expand_known_and_unknown_variables() {
        let env: EnvVars = [("MIRROR", "/srv/mirror"), ("JOBS", "8")]
            .into_iter()
            .collect();

        assert_eq!(env.expand("--reference=${MIRROR}"), "--reference=/srv/mirror");
        assert_eq!(env.expand("-j${JOBS} ${MISSING}"), "-j8 ${MISSING}");
        assert_eq!(env.expand("plain"), "plain");
    }

    #[test]
    fn test_changed_projects_reports_new_and_moved() {
        let baseline = snapshot(&[("build", "aaa"), ("kernel", "bbb"), ("removed", "ccc")]);
        let current = snapshot(&[("build", "aaa"), ("kernel", "bbd"), ("vendor", "eee")]);

        let changed: Vec<String> = current
            .changed_projects(&baseline)
            .into_iter()
            .map(|p| p.path)
            .collect();

        assert_eq!(changed, vec!["kernel", "vendor"]);
    }

    #[test]
    fn test_changed_projects_identical_snapshots() {
        let state = snapshot(&[("build", "aaa")]);
        assert!(state.changed_projects(&state.clone()).is_empty());
    }

    #[test]
    fn test_revision_state_json_without_timestamp() {
        let json = r#"{
            "branch": "main",
            "manifest_url": null,
            "projects": {
                "build": {"path": "build", "server_path": "platform/build", "revision": "abc"}
            }
        }"#;

        let state: RevisionState = serde_json::from_str(json).unwrap();
        assert_eq!(state.project("build").unwrap().server_path, "platform/build");
    }

    #[test]
    fn test_snapshot_file_errors_are_typed() {
        use crate::utils::error::RepoError;
        use std::io::Write;

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "{{ \"branch\": ").unwrap();
        assert!(matches!(
            RevisionState::from_json_file(bad.path()),
            Err(RepoError::SerializationError(_))
        ));

        let dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(
            RevisionState::from_json_file(dir.path().join("missing.json")),
            Err(RepoError::IoError(_))
        ));
    }

    #[test]
    fn test_snapshot_file_round_trip() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"{"branch": "main", "projects": {"art": {"path": "art", "server_path": "platform/art", "revision": "abc"}}}"#,
        )
        .unwrap();

        let state = RevisionState::from_json_file(file.path()).unwrap();
        assert_eq!(state.branch.as_deref(), Some("main"));
        assert_eq!(state.project("art").unwrap().revision, "abc");
    }

    #[test]
    fn test_decision_from_bool() {
        assert_eq!(Decision::from(true), Decision::Continue);
        assert_eq!(Decision::from(false), Decision::Stop);
        assert!(!Decision::abort("x").should_continue());
    }

    #[test]
    fn test_workspace_paths() {
        let ws = Workspace::new("/work");
        assert_eq!(ws.local_manifests_dir(), PathBuf::from("/work/.repo/local_manifests"));
    }
}
