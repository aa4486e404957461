//! Subcommand implementations.

use anyhow::Result;
use tracing::info;

use pimtrack::config::Config;
use pimtrack::db::Database;
use pimtrack::{dashboard, project, Registry, RegistryError, Store};

use crate::Cli;

/// Load the config file and fold in the global `--database-url`.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = &cli.database_url {
        config.database.url = Some(url.clone());
    }
    Ok(config)
}

async fn connect(config: &Config) -> Result<Database> {
    let database_url = config.database.url.as_deref().ok_or_else(|| {
        anyhow::anyhow!("DATABASE_URL is required (set via --database-url, env, or [database] url)")
    })?;
    Database::connect_with(database_url, config.database.max_connections).await
}

/// Insert each demo project, skipping numbers already present.
async fn seed_database(database: &Database) -> Result<usize> {
    let mut inserted = 0;
    for candidate in project::demo_projects() {
        match database.create_project(candidate).await {
            Ok(p) => {
                info!(id = p.id, project_number = %p.project_number, "seeded project");
                inserted += 1;
            }
            Err(RegistryError::Conflict(number)) => {
                info!(project_number = %number, "already present, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(inserted)
}

pub fn run_serve(cli: &Cli, port: Option<u16>, bind: Option<String>, seed: bool) -> Result<()> {
    let mut config = load_config(cli)?;
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    config.server.seed |= seed;
    config.validate()?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let store = if config.database.url.is_some() {
            let database = connect(&config).await?;
            database.migrate().await?;
            if config.server.seed {
                seed_database(&database).await?;
            }
            Store::Postgres(database)
        } else if config.server.seed {
            Store::Memory(Registry::seeded())
        } else {
            Store::Memory(Registry::new())
        };
        dashboard::run(config.server, store).await
    })
}

pub fn run_migrate(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let database = connect(&config).await?;
        database.migrate().await
    })?;
    eprintln!("Table `pim` is ready");
    Ok(())
}

pub fn run_seed(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let rt = tokio::runtime::Runtime::new()?;
    let inserted = rt.block_on(async {
        let database = connect(&config).await?;
        database.migrate().await?;
        seed_database(&database).await
    })?;
    eprintln!("Inserted {inserted} demo project(s)");
    Ok(())
}

pub fn run_list(cli: &Cli, team: Option<&str>, engineer: Option<&str>, json: bool) -> Result<()> {
    let config = load_config(cli)?;
    let rt = tokio::runtime::Runtime::new()?;
    let projects = rt.block_on(async {
        let database = connect(&config).await?;
        let projects = match (team, engineer) {
            (Some(team), Some(engineer)) => {
                database
                    .list_projects_by_team_and_engineer(team, engineer)
                    .await?
            }
            (Some(team), None) => database.list_projects_by_team(team).await?,
            _ => database.list_projects().await?,
        };
        anyhow::Ok(projects)
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }
    if projects.is_empty() {
        eprintln!("No projects found");
        return Ok(());
    }
    println!(
        "{:<6} {:<18} {:<5} {:<16} {:<16} {:<30} {:>8}",
        "ID", "NUMBER", "TEAM", "ENGINEER", "CUSTOMER", "NAME", "PROGRESS"
    );
    println!("{}", "-".repeat(105));
    for p in &projects {
        println!(
            "{:<6} {:<18} {:<5} {:<16} {:<16} {:<30} {:>7}%",
            p.id, p.project_number, p.team, p.engineer, p.customer, p.project_name, p.progress
        );
    }
    Ok(())
}
