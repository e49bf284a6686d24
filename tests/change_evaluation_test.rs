use anyhow::Result;
use repo_behaviors::{BehaviorsConfig, ProjectState, RevisionState};
use tempfile::TempDir;

const CONFIG: &str = r#"
[repo]
manifest_url = "https://example.com/platform/manifest"

[[behaviors]]
kind = "ignore_projects"
patterns = ["^docs/", "^tools/translations$"]
"#;

fn snapshot(projects: &[(&str, &str)]) -> RevisionState {
    projects.iter().fold(
        RevisionState::new(Some("main".to_string()), None),
        |state, (path, revision)| {
            state.with_project(ProjectState::new(*path, format!("platform/{}", path), *revision))
        },
    )
}

#[test]
fn test_snapshots_round_trip_through_files() -> Result<()> {
    let dir = TempDir::new()?;
    let baseline = snapshot(&[("kernel", "a1"), ("docs/guide", "b1")]);
    let current = snapshot(&[("kernel", "a1"), ("docs/guide", "b2")]);

    let baseline_path = dir.path().join("baseline.json");
    let current_path = dir.path().join("current.json");
    std::fs::write(&baseline_path, serde_json::to_string_pretty(&baseline)?)?;
    std::fs::write(&current_path, serde_json::to_string_pretty(&current)?)?;

    let baseline: RevisionState = serde_json::from_str(&std::fs::read_to_string(&baseline_path)?)?;
    let current: RevisionState = serde_json::from_str(&std::fs::read_to_string(&current_path)?)?;

    let engine = BehaviorsConfig::from_toml_str(CONFIG)?.into_engine()?;
    let report = engine.evaluate_changes(&current, &baseline);

    assert_eq!(report.changed.len(), 1);
    assert_eq!(report.changed[0].server_path, "platform/docs/guide");
    assert!(report.ignored);
    Ok(())
}

#[test]
fn test_relevant_change_triggers_rebuild() -> Result<()> {
    let engine = BehaviorsConfig::from_toml_str(CONFIG)?.into_engine()?;
    let baseline = snapshot(&[("kernel", "a1"), ("tools/translations", "c1")]);
    let current = snapshot(&[("kernel", "a2"), ("tools/translations", "c2")]);

    let report = engine.evaluate_changes(&current, &baseline);

    assert!(!report.ignored);
    assert!(report.warrants_rebuild());
    Ok(())
}

#[test]
fn test_new_project_counts_as_change() -> Result<()> {
    let engine = BehaviorsConfig::from_toml_str(CONFIG)?.into_engine()?;
    let baseline = snapshot(&[("kernel", "a1")]);
    let current = snapshot(&[("kernel", "a1"), ("vendor/acme", "d1")]);

    let report = engine.evaluate_changes(&current, &baseline);

    assert_eq!(report.changed, vec![ProjectState::new("vendor/acme", "platform/vendor/acme", "d1")]);
    assert!(report.warrants_rebuild());
    Ok(())
}

#[test]
fn test_empty_chain_never_ignores() -> Result<()> {
    let config = BehaviorsConfig::from_toml_str(
        r#"
[repo]
manifest_url = "https://example.com/platform/manifest"
"#,
    )?;
    let chain = config.build_chain()?;
    assert!(chain.is_empty());

    let baseline = snapshot(&[("docs/guide", "b1")]);
    let current = snapshot(&[("docs/guide", "b2")]);
    let changed = current.changed_projects(&baseline);

    assert!(!chain.should_ignore_changes(&changed, &current, &baseline));
    Ok(())
}
