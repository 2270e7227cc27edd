//! Applies or rolls back the embedded schema migrations.
//!
//! Connection settings come from the same layered configuration as the server
//! unless `--database-url` is given.

use anyhow::Context;
use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use inventory_api::{config, db, migrator::Migrator};

#[derive(Debug, Parser)]
#[command(name = "migrate")]
#[command(about = "Schema migrations for the inventory API")]
#[command(version)]
struct Cli {
    /// Database connection URL, overriding the configured one
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Show applied and pending migrations
    Status,

    /// Apply pending migrations
    Up {
        /// Number of migrations to apply (default: all pending)
        #[arg(long)]
        steps: Option<u32>,
    },

    /// Roll back applied migrations
    Down {
        /// Number of migrations to roll back
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load_config().context("failed to load configuration")?;
    if let Some(url) = cli.database_url {
        cfg.database_url = url;
    }
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;

    match cli.command {
        Commands::Status => Migrator::status(&pool)
            .await
            .context("failed to read migration status")?,
        Commands::Up { steps: None } => db::run_migrations(&pool).await.context("migration failed")?,
        Commands::Up { steps } => {
            info!(?steps, "Applying migrations");
            Migrator::up(&pool, steps).await.context("migration failed")?;
        }
        Commands::Down { steps } => {
            info!(steps, "Rolling back migrations");
            Migrator::down(&pool, Some(steps))
                .await
                .context("rollback failed")?;
        }
    }

    db::close_pool(pool).await.context("failed to close pool")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_subcommands_and_steps() {
        let cli = Cli::try_parse_from(["migrate", "down", "--steps", "2"]).unwrap();
        assert_eq!(cli.command, Commands::Down { steps: 2 });

        let cli = Cli::try_parse_from(["migrate", "down"]).unwrap();
        assert_eq!(cli.command, Commands::Down { steps: 1 });

        let cli = Cli::try_parse_from(["migrate", "up"]).unwrap();
        assert_eq!(cli.command, Commands::Up { steps: None });

        let cli = Cli::try_parse_from(["migrate", "--database-url", "sqlite::memory:", "status"])
            .unwrap();
        assert_eq!(cli.command, Commands::Status);
        assert_eq!(cli.database_url.as_deref(), Some("sqlite::memory:"));
    }

    #[test]
    fn unknown_commands_and_help_stop_before_connecting() {
        let err = Cli::try_parse_from(["migrate", "bogus"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);

        let err = Cli::try_parse_from(["migrate", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
