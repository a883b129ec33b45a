//! oxide-schema CLI
//!
//! Reconciles live tables with a JSON schema file.

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_schema::prelude::*;

/// Keep database tables in line with a schema file.
#[derive(Parser)]
#[command(name = "oxide-schema")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database URL (`sqlite:` or `mysql://`).
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
    database: String,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or alter tables to match the schema file.
    Migrate {
        /// Schema file.
        #[arg(short, long)]
        schema: PathBuf,

        /// Only migrate this table.
        #[arg(short, long)]
        table: Option<String>,

        /// Compute the changes without executing them.
        #[arg(long)]
        dry_run: bool,

        /// Report format: none, simple, detailed or structured.
        #[arg(short, long, default_value = "simple")]
        report: ReportFormat,
    },

    /// Print the statements a migrate would run.
    Sql {
        /// Schema file.
        #[arg(short, long)]
        schema: PathBuf,

        /// Only this table.
        #[arg(short, long)]
        table: Option<String>,
    },

    /// Drop a table if it exists.
    Drop {
        /// Table name.
        #[arg(short, long)]
        table: String,
    },

    /// Rename a table.
    Rename {
        /// Current name.
        #[arg(long)]
        from: String,

        /// New name.
        #[arg(long)]
        to: String,
    },

    /// Print the DDL of one statement kind without executing it.
    Ddl {
        /// Statement kind: create, alter, drop or rename.
        #[arg(short, long)]
        mode: RenderMode,

        /// Table name (required for drop and rename).
        #[arg(short, long)]
        table: Option<String>,

        /// New name for rename.
        #[arg(long)]
        to: Option<String>,

        /// Schema file (required for create and alter).
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create, drop and rename DDL only needs the dialect.
    if let Commands::Ddl {
        mode,
        table,
        to,
        schema,
    } = &cli.command
    {
        if *mode != RenderMode::Alter {
            let profile = DialectKind::from_url(&cli.database)?.profile();
            let statements =
                offline_ddl(&profile, *mode, table.as_deref(), to.as_deref(), schema.as_ref())?;
            for sql in statements {
                println!("{sql};");
            }
            return Ok(());
        }
    }

    let conn = SqlxConnection::connect(&cli.database)
        .await
        .with_context(|| format!("connecting to {}", cli.database))?;
    let migrator = Migrator::new(conn);

    match cli.command {
        Commands::Migrate {
            schema,
            table,
            dry_run,
            report,
        } => {
            if dry_run {
                info!("Dry run mode - changes will be reported but not executed.");
            }
            for builder in SchemaFile::load(&schema)?.builders(table.as_deref())? {
                let desired = migrator.desired(&builder)?;
                let result = migrator.migrate(&desired, dry_run).await?;
                print_report(&result.report().report(report))?;
            }
        }

        Commands::Sql { schema, table } => {
            for builder in SchemaFile::load(&schema)?.builders(table.as_deref())? {
                let desired = migrator.desired(&builder)?;
                let result = migrator.diff(&desired).await?;
                for sql in migrator.sql_for(&result, &desired)? {
                    println!("{sql};");
                }
            }
        }

        Commands::Drop { table } => {
            migrator.drop(&table).await?;
            info!(table = %table, "Table dropped");
        }

        Commands::Rename { from, to } => {
            migrator.rename(&from, &to).await?;
            info!(from = %from, to = %to, "Table renamed");
        }

        Commands::Ddl { schema, table, .. } => {
            let Some(schema) = schema else {
                bail!("--schema is required for alter");
            };
            for builder in SchemaFile::load(&schema)?.builders(table.as_deref())? {
                let desired = migrator.desired(&builder)?;
                let result = migrator.diff(&desired).await?;
                match result.mode() {
                    DiffMode::Create => {
                        warn!(table = desired.table(), "Table does not exist, nothing to alter");
                    }
                    DiffMode::Alter if result.is_empty() => {
                        info!(table = desired.table(), "No changes");
                    }
                    DiffMode::Alter => {
                        for sql in migrator.sql_for(&result, &desired)? {
                            println!("{sql};");
                        }
                    }
                }
            }
        }
    }

    migrator.connection().close().await;
    Ok(())
}

fn offline_ddl(
    profile: &DialectProfile,
    mode: RenderMode,
    table: Option<&str>,
    to: Option<&str>,
    schema: Option<&PathBuf>,
) -> anyhow::Result<Vec<String>> {
    let renderer = Renderer::new(profile);
    match mode {
        RenderMode::Create => {
            let Some(schema) = schema else {
                bail!("--schema is required for create");
            };
            let mut statements = Vec::new();
            for builder in SchemaFile::load(schema)?.builders(table)? {
                let desired = builder.build(profile)?;
                statements.extend(renderer.statements(&Statement::Create(&desired))?);
            }
            Ok(statements)
        }
        RenderMode::Drop => {
            let Some(table) = table else {
                bail!("--table is required for drop");
            };
            Ok(renderer.statements(&Statement::Drop { table })?)
        }
        RenderMode::Rename => {
            let (Some(from), Some(to)) = (table, to) else {
                bail!("--table and --to are required for rename");
            };
            Ok(renderer.statements(&Statement::Rename { from, to })?)
        }
        RenderMode::Alter => bail!("alter needs a database connection"),
    }
}

fn print_report(output: &ReportOutput) -> anyhow::Result<()> {
    match output {
        ReportOutput::None => {}
        ReportOutput::Text(text) => println!("{text}"),
        ReportOutput::Structured(report) => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
