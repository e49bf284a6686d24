//! Built-in behaviors. Each one overrides only the hooks it cares about.

pub mod extra_args;
pub mod ignore_projects;
pub mod init_options;
pub mod local_manifest;
pub mod reset_first;
pub mod sync_options;

pub use extra_args::ExtraArgs;
pub use ignore_projects::IgnoreProjects;
pub use init_options::{ManifestGroups, ReferenceMirror, ShallowClone};
pub use local_manifest::LocalManifest;
pub use reset_first::ResetFirst;
pub use sync_options::SyncOptions;

/// Append `token` unless the commandline already carries it.
pub(crate) fn push_once(commands: &mut Vec<String>, token: String) {
    if !commands.contains(&token) {
        commands.push(token);
    }
}
