use anyhow::Context;
use clap::Parser;
use std::io::Write;
use tjkt_groups::config::{Command, GroupsCommand, RosterCommand};
use tjkt_groups::core::export;
use tjkt_groups::utils::error::ErrorSeverity;
use tjkt_groups::utils::{logger, validation::Validate};
use tjkt_groups::{
    CliConfig, DrawSettings, GroupEngine, GroupError, JsonFileStore, StateStore, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(&cli).await {
        let exit_code = match e.downcast_ref::<GroupError>() {
            Some(err) => {
                tracing::error!(
                    "❌ {} (Category: {:?}, Severity: {:?})",
                    err,
                    err.category(),
                    err.severity()
                );
                eprintln!("❌ {}", err.user_friendly_message());
                eprintln!("💡 {}", err.recovery_suggestion());
                match err.severity() {
                    ErrorSeverity::Low => 2,
                    ErrorSeverity::Medium => 2,
                    ErrorSeverity::High => 1,
                    ErrorSeverity::Critical => 3,
                }
            }
            None => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                1
            }
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

fn load_config(cli: &CliConfig) -> anyhow::Result<TomlConfig> {
    let mut config = match &cli.config {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("reading configuration from {}", path))?,
        None => TomlConfig::default(),
    };

    if let Some(state) = &cli.state {
        config.set_state_path(state.clone());
    }

    // 驗證配置
    cli.validate()?;
    config.validate()?;
    Ok(config)
}

async fn run(cli: &CliConfig) -> anyhow::Result<()> {
    let config = load_config(cli)?;

    let store = JsonFileStore::new(config.state_path());
    let mut state = store.load().await?;
    if state.class_name.is_empty() {
        state.class_name = config.class_name().to_string();
    }
    tracing::debug!(
        "Loaded {} students and {} groups from {}",
        state.students.len(),
        state.groups.len(),
        store.path().display()
    );

    let mut engine = GroupEngine::with_seed(state, DrawSettings::from_config(&config), cli.seed);

    let changed = match &cli.command {
        Command::Roster { action } => run_roster(&mut engine, action)?,
        Command::Pool => {
            let pool = engine.compute_pool();
            println!("{} students available", pool.len());
            for student in &pool {
                println!("  {:<38} {:<24} {}", student.id, student.name, student.role);
            }
            false
        }
        Command::Draw {
            size,
            name,
            no_spin,
        } => {
            let size = size.unwrap_or(config.default_group_size());
            let spinner = config.spinner();
            let spin = config.spinner_enabled() && !no_spin;

            if engine.available().is_empty() {
                return Err(GroupError::NoCandidates.into());
            }

            while engine.buffer().len() < size && !engine.available().is_empty() {
                engine.begin_draw()?;
                if spin {
                    let display_pool = engine.compute_pool();
                    spinner
                        .play(&display_pool, |name| {
                            print!("\r  🎲 {:<32}", name);
                            let _ = std::io::stdout().flush();
                        })
                        .await;
                }
                let student = engine.complete_draw()?;
                println!("\r  {}. {:<32}", engine.buffer().len(), student.name);
            }

            let group = engine.finalize(name)?;
            println!("✅ {} ({} members, id {})", group.name, group.members.len(), group.id);
            true
        }
        Command::Groups { action } => run_groups(&mut engine, action).await?,
    };

    if changed {
        store
            .save(engine.state())
            .await
            .with_context(|| format!("saving class data to {}", store.path().display()))?;
    }

    Ok(())
}

fn run_roster(engine: &mut GroupEngine, action: &RosterCommand) -> anyhow::Result<bool> {
    match action {
        RosterCommand::List => {
            let state = engine.state();
            println!("{}: {} students", state.class_name, state.students.len());
            for student in &state.students {
                println!("  {:<38} {:<24} {}", student.id, student.name, student.role);
            }
            Ok(false)
        }
        RosterCommand::Add { name, role } => {
            let student = engine.add_student(name, role)?;
            println!("✅ Added {} ({})", student.name, student.id);
            Ok(true)
        }
        RosterCommand::Rename { id, name } => {
            let student = engine.rename_student(id, name)?;
            println!("✅ Renamed {} to {}", student.id, student.name);
            Ok(true)
        }
        RosterCommand::Remove { id } => {
            let student = engine.remove_student(id)?;
            println!("✅ Removed {}", student.name);
            Ok(true)
        }
        RosterCommand::Import { file } => {
            let reader = std::fs::File::open(file)
                .with_context(|| format!("opening roster file {}", file))?;
            let students = export::roster_from_csv(reader)?;
            let total = students.len();
            let added = engine.import_roster(students);
            println!("✅ Imported {} of {} students", added, total);
            Ok(added > 0)
        }
    }
}

async fn run_groups(engine: &mut GroupEngine, action: &GroupsCommand) -> anyhow::Result<bool> {
    match action {
        GroupsCommand::List => {
            let groups = &engine.state().groups;
            if groups.is_empty() {
                println!("No groups yet");
            }
            for group in groups {
                println!(
                    "{} [{}] {}",
                    group.name,
                    group.id,
                    group.created_at.format("%Y-%m-%d %H:%M")
                );
                for (slot, member) in group.members.iter().enumerate() {
                    println!("  {}. {}", slot + 1, member.name);
                }
            }
            Ok(false)
        }
        GroupsCommand::Delete { id } => {
            let group = engine.delete_group(id)?;
            println!("✅ Deleted {}", group.name);
            Ok(true)
        }
        GroupsCommand::Clear => {
            let removed = engine.clear_all_groups();
            println!("✅ Cleared {} groups", removed);
            Ok(removed > 0)
        }
        GroupsCommand::Export { file } => {
            let csv_output = export::groups_to_csv(&engine.state().groups)?;
            match file {
                Some(path) => {
                    tokio::fs::write(path, csv_output)
                        .await
                        .with_context(|| format!("writing {}", path))?;
                    println!("📁 Groups exported to {}", path);
                }
                None => print!("{}", csv_output),
            }
            Ok(false)
        }
    }
}
