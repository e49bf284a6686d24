use crate::core::{ProjectState, RepoBehavior, Result, RevisionState};
use crate::utils::validation::validate_regex;
use regex::Regex;

/// Ignores a change set when every changed project matches one of the patterns,
/// either by workspace path or by server path.
#[derive(Debug, Clone)]
pub struct IgnoreProjects {
    patterns: Vec<Regex>,
}

impl IgnoreProjects {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| validate_regex("ignore_projects.patterns", p))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    fn matches(&self, project: &ProjectState) -> bool {
        self.patterns
            .iter()
            .any(|re| re.is_match(&project.path) || re.is_match(&project.server_path))
    }
}

impl RepoBehavior for IgnoreProjects {
    fn name(&self) -> &str {
        "ignore_projects"
    }

    fn should_ignore_changes(
        &self,
        changed_projects: &[ProjectState],
        _current: &RevisionState,
        _baseline: &RevisionState,
    ) -> bool {
        !changed_projects.is_empty() && changed_projects.iter().all(|p| self.matches(p))
    }
}
