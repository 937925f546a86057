use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use vitrine::{cli, config, logging};

#[derive(Debug, Parser)]
#[command(name = "vitrine")]
#[command(about = "Card portfolio built from a JSON manifest of resources")]
struct App {
    /// Site root directory (overrides config and VITRINE_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// HTTP origin serving the site (overrides config and VITRINE_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the portfolio page, resource files and JSON API
    Serve {
        /// Listen address (default: 127.0.0.1:8000)
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser
        #[arg(long)]
        no_open: bool,
    },
    /// Load the manifest and print the cards
    List {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show what the detail panel displays for a resource
    Show {
        /// Resource identifier as listed in the manifest
        id: String,
    },
    /// Show which cards match a search term
    Filter {
        term: String,
    },
    /// Write the rendered page
    Render {
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Check manifest reachability and descriptor failures
    Check,
    /// Inspect or edit configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default config to ~/.vitrine/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `panel.open_delay_ms 150`
    Set { key: String, value: String },
    /// Reset ~/.vitrine/config.toml to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    let mut cfg = config::load();
    let overrides = config::Overrides {
        root: app.root,
        base_url: app.base_url,
        addr: match &app.command {
            Commands::Serve { addr, .. } => addr.clone(),
            _ => None,
        },
    };
    overrides.apply(&mut cfg);

    logging::init(&cfg.logging.level);

    match app.command {
        Commands::Serve { no_open, .. } => cli::run_serve(&cfg, no_open),
        Commands::List { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_list(&cfg, fmt)
        }
        Commands::Show { id } => cli::run_show(&cfg, &id),
        Commands::Filter { term } => cli::run_filter(&cfg, &term),
        Commands::Render { out } => cli::run_render(&cfg, out.as_deref()),
        Commands::Check => cli::run_check(&cfg),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(&cfg),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
