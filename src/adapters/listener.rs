use crate::core::TaskListener;
use std::sync::Mutex;

/// Forwards build log lines to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingListener;

impl TaskListener for TracingListener {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

/// Keeps every line in memory. Error lines are prefixed with `ERROR: `.
#[derive(Debug, Default)]
pub struct BufferedListener {
    lines: Mutex<Vec<String>>,
}

impl BufferedListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}

impl TaskListener for BufferedListener {
    fn info(&self, message: &str) {
        self.push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.push(format!("ERROR: {}", message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_listener_keeps_order() {
        let listener = BufferedListener::new();
        listener.info("fetching manifest");
        listener.error("mirror unreachable");

        assert_eq!(
            listener.lines(),
            vec!["fetching manifest", "ERROR: mirror unreachable"]
        );
    }
}
