//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `vitrine serve` — run the web server
//! - `vitrine list` — load and print the cards
//! - `vitrine show <id>` — resolve what the detail panel shows for a resource
//! - `vitrine filter <term>` — show which cards a search term keeps
//! - `vitrine render` — write the rendered page to a file or stdout
//! - `vitrine check` — manifest reachability and descriptor failures
//! - `vitrine config show|init|set|reset` — configuration management

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::catalog::{self, Access, LoadOutcome, NoteKind, ResourcePaths};
use crate::config::{self, VitrineConfig};
use crate::panel::PanelContent;
use crate::portfolio::Portfolio;
use crate::source;
use crate::web;

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

fn portfolio(config: &VitrineConfig) -> Result<Portfolio> {
    let source = source::open(&config.source).context("failed to open resource source")?;
    Ok(Portfolio::new(source, config))
}

// ---------------------------------------------------------------------------
// vitrine serve
// ---------------------------------------------------------------------------

pub fn run_serve(config: &VitrineConfig, no_open: bool) -> Result<()> {
    let portfolio = portfolio(config)?;
    web::serve(
        portfolio,
        &config.server.addr,
        config.server.open_browser && !no_open,
    )
}

// ---------------------------------------------------------------------------
// vitrine list
// ---------------------------------------------------------------------------

pub fn run_list(config: &VitrineConfig, format: OutputFormat) -> Result<()> {
    let mut portfolio = portfolio(config)?;
    let outcome = portfolio.load_cards();

    if format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(outcome).context("failed to serialize cards")?;
        println!("{json}");
        return Ok(());
    }

    match outcome {
        LoadOutcome::Failed { message } => {
            println!("{}", message.red());
        }
        LoadOutcome::Empty { message } => {
            println!("{}", message.yellow());
        }
        LoadOutcome::Cards { cards } => {
            println!("{}", "Resources".bold().cyan());
            println!("{}", "=".repeat(60));
            for card in cards {
                let content = if card.descriptor.content_source().is_some() {
                    "●".green()
                } else {
                    "○".dimmed()
                };
                println!("  {} {:<20} {}", content, truncate(&card.id, 20), card.title().bold());
                println!("    {}", card.body().dimmed());
                if let Some((note, kind)) = card.note(&config.render.important_marker) {
                    match kind {
                        NoteKind::Important => println!("    {}", note.red().bold()),
                        NoteKind::Plain => println!("    {}", note.italic()),
                    }
                }
            }
            println!();
            println!("  {} card(s)", cards.len());
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// vitrine show
// ---------------------------------------------------------------------------

pub fn run_show(config: &VitrineConfig, resource_id: &str) -> Result<()> {
    let mut portfolio = portfolio(config)?;
    portfolio.load_cards();

    let now = Instant::now();
    portfolio.open_panel(resource_id, now);
    portfolio.tick(now + portfolio.panel().open_delay());

    let panel = portfolio.panel();
    println!(
        "{} {}",
        "Viewing".bold().cyan(),
        panel.title().unwrap_or(resource_id).bold()
    );
    println!("{}", "-".repeat(60));

    match panel.content() {
        PanelContent::Frame { url, title } => {
            println!("{} {}", "frame:".green(), url);
            println!("{} {}", "title:".green(), title);
        }
        PanelContent::Text { text } => print!("{text}"),
        PanelContent::ComingSoon => println!("{}", "Coming soon".yellow()),
        PanelContent::Unavailable => println!("{}", "Content unavailable".yellow()),
        PanelContent::Loading => println!("{}", "Loading...".dimmed()),
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// vitrine filter
// ---------------------------------------------------------------------------

pub fn run_filter(config: &VitrineConfig, term: &str) -> Result<()> {
    let mut portfolio = portfolio(config)?;
    if let LoadOutcome::Failed { message } = portfolio.load_cards() {
        println!("{}", message.red());
        return Ok(());
    }

    let visible = portfolio.filter_resources(term).len();
    for card in portfolio.cards() {
        if portfolio.is_hidden(&card.id) {
            println!("  {} {}", "-".dimmed(), card.title().dimmed());
        } else {
            println!("  {} {}", "+".green(), card.title());
        }
    }
    println!();
    println!("  {visible} of {} card(s) match \"{term}\"", portfolio.cards().len());

    Ok(())
}

// ---------------------------------------------------------------------------
// vitrine render
// ---------------------------------------------------------------------------

pub fn run_render(config: &VitrineConfig, out: Option<&Path>) -> Result<()> {
    let mut portfolio = portfolio(config)?;
    portfolio.load_cards();
    let html = portfolio.page_html();

    match out {
        Some(path) => {
            fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
            println!("{} {}", "Wrote".green(), path.display());
        }
        None => print!("{html}"),
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// vitrine check
// ---------------------------------------------------------------------------

pub fn run_check(config: &VitrineConfig) -> Result<()> {
    let source = source::open(&config.source).context("failed to open resource source")?;
    let paths = ResourcePaths::from_config(&config.source);

    println!("{}", "vitrine check".bold().cyan());
    println!("{}", "=".repeat(60));
    println!("  {} {}", "Origin:  ".bold(), source.origin());
    println!("  {} {}", "Manifest:".bold(), source.locate(&paths.manifest()));

    let access = Access::of(source.as_ref());
    let catalog = match catalog::load_catalog(source.as_ref(), &paths, access) {
        Ok(catalog) => catalog,
        Err(e) => {
            println!("  {} {}", "✗".red(), e.to_string().red());
            return Ok(());
        }
    };

    println!("  {} {} listed, {} loaded", "✓".green(), catalog.listed, catalog.cards.len());
    for (id, error) in &catalog.failures {
        println!("  {} {:<20} {}", "✗".red(), truncate(id, 20), error);
    }
    if catalog.listed == 0 {
        println!("  {}", "manifest lists no resources".yellow());
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// vitrine config
// ---------------------------------------------------------------------------

pub fn run_config_show(config: &VitrineConfig) -> Result<()> {
    let text = config::to_toml(config)?;
    println!("{}", "Effective configuration".bold().cyan());
    if let Some(path) = config::global_config_file() {
        println!("  global:  {} {}", path.display(), exists_marker(&path));
    }
    if let Some(path) = config::project_config_file() {
        println!("  project: {} {}", path.display(), exists_marker(&path));
    }
    println!();
    print!("{text}");
    Ok(())
}

pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} {}", "Created".green(), path.display());
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} {key} = {value}", "Set".green());
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!("{} {}", "Reset".green(), path.display());
    Ok(())
}

fn exists_marker(path: &Path) -> colored::ColoredString {
    if path.exists() {
        "(found)".green()
    } else {
        "(absent)".dimmed()
    }
}

/// Truncate to `max` characters, marking the cut with `…`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
