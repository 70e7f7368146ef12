//! Blueprint CLI - design a database schema from an application idea

use std::path::{Path, PathBuf};

use blueprint_lib::{
    ApprovedDesign, BlueprintError, Config, ConfigStore, InquirePrompter, SchemaArchitect,
    run_first_run_wizard, run_session,
};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blueprint")]
#[command(about = "Design a database schema from an application idea with an LLM", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Config file to use [default: $BLUEPRINT_CONFIG or ~/.blueprint/config.yaml]
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Write the approved design as JSON to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose the LLM provider and store its API key
    Config,
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    // RUST_LOG wins; otherwise only warnings unless -v is given
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,blueprint_lib=info".to_string(),
            2 => "info,blueprint_lib=debug".to_string(),
            _ => "debug,blueprint_lib=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

/// Loads the config, running first-time setup when none exists yet.
fn load_or_setup(store: &ConfigStore, prompter: &mut InquirePrompter) -> Result<Config, BlueprintError> {
    if store.exists() {
        store.read()
    } else {
        println!("{}", "No configuration found, starting setup.".yellow());
        run_first_run_wizard(prompter, store)
    }
}

/// Hands the approved design to the next step: a file or stdout.
fn emit_design(design: &ApprovedDesign, output: Option<&Path>) -> Result<(), BlueprintError> {
    // ApprovedDesign only holds strings, bools and enums.
    let json = serde_json::to_string_pretty(design).unwrap_or_default();
    match output {
        Some(path) => std::fs::write(path, format!("{json}\n")).map_err(|source| {
            BlueprintError::Output {
                path: path.to_path_buf(),
                source,
            }
        }),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

async fn design(store: &ConfigStore, output: Option<&Path>) -> Result<(), BlueprintError> {
    let mut prompter = InquirePrompter::new();
    let config = load_or_setup(store, &mut prompter)?;
    let architect = SchemaArchitect::from_config(&config)?;

    println!(
        "{} {} ({})\n",
        "Using".dimmed(),
        architect.provider().bold(),
        architect.model()
    );

    let design = run_session(&mut prompter, &architect).await?;

    println!(
        "\n{} schema for {} approved after {} revision(s)",
        "✓".green(),
        design.project_name.bold(),
        design.revisions
    );
    emit_design(&design, output)?;
    if let Some(path) = output {
        println!("Design written to {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.json);

    let store = match cli.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::locate(),
    };
    tracing::debug!(path = %store.path().display(), "config location");

    let result = match cli.command {
        Some(Commands::Config) => {
            run_first_run_wizard(&mut InquirePrompter::new(), &store).map(|_| ())
        }
        None => design(&store, cli.output.as_deref()).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
