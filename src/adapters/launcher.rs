use crate::core::{LaunchOutput, LaunchRequest, Launcher, Result};
use crate::utils::error::RepoError;
use async_trait::async_trait;
use std::sync::Mutex;

/// Records what would have been started and reports success without running anything.
#[derive(Debug, Default)]
pub struct DryRunLauncher {
    launched: Mutex<Vec<LaunchRequest>>,
}

impl DryRunLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launched(&self) -> Vec<LaunchRequest> {
        self.launched
            .lock()
            .map(|launched| launched.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Launcher for DryRunLauncher {
    async fn launch(&self, request: &LaunchRequest) -> Result<LaunchOutput> {
        if request.program.trim().is_empty() {
            return Err(RepoError::LaunchError {
                command: request.command_line(),
                message: "no program given".to_string(),
            });
        }
        tracing::info!(
            cwd = %request.cwd.display(),
            "[dry-run] {}",
            request.command_line()
        );
        if let Ok(mut launched) = self.launched.lock() {
            launched.push(request.clone());
        }
        Ok(LaunchOutput::default())
    }
}
