use clap::Parser;
use repo_behaviors::adapters::{DryRunLauncher, TracingListener};
use repo_behaviors::utils::{logger, validation::Validate};
use repo_behaviors::{
    BehaviorEngine, BehaviorsConfig, CliConfig, Command, Decision, RepoError, RevisionState,
    Workspace,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting repo-behaviors");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match BehaviorsConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    let engine = match config.into_engine() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };
    tracing::info!("✅ Loaded behaviors: {}", engine.chain().names().join(", "));

    let result = match &cli.command {
        Command::Plan { workspace } => plan(&engine, workspace.as_deref()).await,
        Command::PostInit { workspace } => post_init(&engine, workspace).await,
        Command::Changes { current, baseline } => changes(&engine, current, baseline),
    };

    if let Err(e) = result {
        match e.downcast_ref::<RepoError>() {
            Some(repo_error) => {
                tracing::error!(
                    "❌ {} (Category: {:?}, Severity: {:?})",
                    repo_error,
                    repo_error.category(),
                    repo_error.severity()
                );
                eprintln!("❌ {}", repo_error.user_friendly_message());
                eprintln!("💡 {}", repo_error.recovery_suggestion());
                std::process::exit(repo_error.exit_code());
            }
            None => {
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn print_command(label: &str, command: &Option<Vec<String>>) {
    match command {
        Some(tokens) => println!("{}: {}", label, tokens.join(" ")),
        None => println!("{}: (skipped by a behavior)", label),
    }
}

async fn plan(engine: &BehaviorEngine, workspace: Option<&str>) -> anyhow::Result<()> {
    let listener = TracingListener;
    let plan = engine.plan(&listener).await?;

    print_command("init", &plan.init);
    print_command("sync", &plan.sync);

    if let Some(workspace) = workspace {
        let launcher = DryRunLauncher::new();
        let decision = engine
            .pre_sync(&launcher, &Workspace::new(workspace), &listener)
            .await?;

        for request in launcher.launched() {
            println!("pre-sync: {}", request.command_line());
        }
        if decision == Decision::Stop {
            println!("pre-sync: sync would be skipped");
        }
    }

    Ok(())
}

async fn post_init(engine: &BehaviorEngine, workspace: &str) -> anyhow::Result<()> {
    let workspace = Workspace::new(workspace);
    if !workspace.repo_dir().is_dir() {
        anyhow::bail!(
            "{} has not been initialised with repo init",
            workspace.path().display()
        );
    }

    let decision = engine.post_init(&workspace, &TracingListener).await?;
    println!("post-init: {:?}", decision);
    Ok(())
}

fn load_snapshot(path: &str) -> repo_behaviors::Result<RevisionState> {
    tracing::debug!("Loading revision snapshot {}", path);
    RevisionState::from_json_file(path)
}

fn changes(engine: &BehaviorEngine, current: &str, baseline: &str) -> anyhow::Result<()> {
    let current = load_snapshot(current)?;
    let baseline = load_snapshot(baseline)?;

    let report = engine.evaluate_changes(&current, &baseline);
    for project in &report.changed {
        println!("changed: {} ({}) @ {}", project.path, project.server_path, project.revision);
    }

    if report.warrants_rebuild() {
        println!("✅ rebuild");
    } else if report.ignored {
        println!("⏭️  changes ignored");
    } else {
        println!("⏭️  no changes");
    }

    Ok(())
}
