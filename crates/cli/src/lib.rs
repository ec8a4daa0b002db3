pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use cafeteria_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "cafeteria",
    about = "Cafeteria menu catalog CLI",
    long_about = "Manage a JSON-backed menu catalog: list products, add new ones, and total orders.",
    after_help = "Examples:\n  cafeteria list\n  cafeteria add --name \"Mocha Blanco\" --price 4.95 --category \"Café Especial\"\n  cafeteria total --item 1 --item 5"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a cafeteria.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Catalog JSON file (overrides config and env)")]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Show the menu grouped by category")]
    List,
    #[command(about = "Add a product and save the catalog")]
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, allow_hyphen_values = true)]
        price: String,
        #[arg(long)]
        category: String,
    },
    #[command(about = "Compute subtotal, tax and total for catalog item ids")]
    Total {
        #[arg(long = "item", value_name = "ID")]
        items: Vec<u64>,
    },
    #[command(about = "Add the demo products that are not in the catalog yet")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                catalog_path: self.catalog.clone(),
                ..ConfigOverrides::default()
            },
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();

    // Config errors are reported by the command itself; logging falls back to defaults.
    let config = AppConfig::load(options.clone()).unwrap_or_default();
    init_logging(&config);

    let result = match cli.command {
        Command::List => commands::list::run(options),
        Command::Add { name, price, category } => {
            commands::add::run(options, name, price, category)
        }
        Command::Total { items } => commands::total::run(options, items),
        Command::Seed => commands::seed::run(options),
        Command::Config => commands::config::run(options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;
    use LogFormat::*;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(log_level);

    match config.logging.format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}
