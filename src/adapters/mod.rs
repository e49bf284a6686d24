// Adapters layer: concrete implementations of the host collaborator ports.

pub mod launcher;
pub mod listener;

pub use launcher::DryRunLauncher;
pub use listener::{BufferedListener, TracingListener};
