use serde::{Deserialize, Serialize};

fn default_executable() -> String {
    "repo".to_string()
}

/// How to reach the manifest and which `repo` binary to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSettings {
    #[serde(default = "default_executable")]
    pub executable: String,
    pub manifest_url: String,
    pub manifest_branch: Option<String>,
    pub manifest_file: Option<String>,
}

impl RepoSettings {
    pub fn new(manifest_url: impl Into<String>) -> Self {
        Self {
            executable: default_executable(),
            manifest_url: manifest_url.into(),
            manifest_branch: None,
            manifest_file: None,
        }
    }
}

/// Undecorated command lines; behaviors add to these.
pub struct RepoCommand;

impl RepoCommand {
    pub fn init_command(settings: &RepoSettings) -> Vec<String> {
        let mut commands = vec![
            settings.executable.clone(),
            "init".to_string(),
            "-u".to_string(),
            settings.manifest_url.clone(),
        ];

        if let Some(branch) = &settings.manifest_branch {
            commands.push("-b".to_string());
            commands.push(branch.clone());
        }
        if let Some(file) = &settings.manifest_file {
            commands.push("-m".to_string());
            commands.push(file.clone());
        }

        commands
    }

    pub fn sync_command(settings: &RepoSettings) -> Vec<String> {
        vec![
            settings.executable.clone(),
            "sync".to_string(),
            "-d".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_command_minimal() {
        let settings = RepoSettings::new("https://example.com/manifest");
        assert_eq!(
            RepoCommand::init_command(&settings),
            vec!["repo", "init", "-u", "https://example.com/manifest"]
        );
    }

    #[test]
    fn test_init_command_with_branch_and_file() {
        let mut settings = RepoSettings::new("https://example.com/manifest");
        settings.executable = "/opt/bin/repo".to_string();
        settings.manifest_branch = Some("android-14".to_string());
        settings.manifest_file = Some("ci.xml".to_string());

        assert_eq!(
            RepoCommand::init_command(&settings),
            vec![
                "/opt/bin/repo",
                "init",
                "-u",
                "https://example.com/manifest",
                "-b",
                "android-14",
                "-m",
                "ci.xml"
            ]
        );
    }

    #[test]
    fn test_sync_command_detaches() {
        let settings = RepoSettings::new("https://example.com/manifest");
        assert_eq!(RepoCommand::sync_command(&settings), vec!["repo", "sync", "-d"]);
    }
}
