use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;
use owo_colors::OwoColorize;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Mallard: config-driven ETL for local and object-storage files, powered by DuckDB
#[derive(Parser)]
#[command(name = "mallard", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source credentials from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run pipelines from a config file
    Run {
        /// The pipeline config file
        #[arg(short, long, default_value = "mallard.json5")]
        config: String,

        /// Pipelines to run, in order (all configured pipelines when empty)
        pipelines: Vec<String>,
    },

    /// Parse a config file and construct every pipeline without running any
    Validate {
        /// The pipeline config file
        #[arg(default_value = "mallard.json5")]
        config: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // credentials may come from the environment; a missing dotenv file is fine
    let _ = dotenvy::from_filename(&cli.env);

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    match cli.command {
        Commands::Run { config, pipelines } => {
            log::info!("Loading config {}", config.bright_black());
            let loaded = mallard::config::Config::load(&config)?;
            mallard::cli::run_pipelines(loaded, &pipelines)?;
        }
        Commands::Validate { config } => {
            log::info!("Validating {}", config.bright_black());
            mallard::cli::validate_config(&config)?;
        }
    }

    Ok(())
}
