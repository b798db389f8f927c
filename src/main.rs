use anyhow::{Context, Result};
use clap::Parser;
use erdflow::config::{CONFIG_FILE, Config};
use erdflow::ir::GraphIR;
use erdflow::layout::{LayoutEngine, LayoutMode, RankDirection};
use erdflow::parser::{TypeSuffix, parse_with};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Lay out the models of a Prisma-style schema and print the result as JSON
#[derive(Parser)]
#[command(name = "erdflow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Schema file to read
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Layout mode: grid, flowchart, hierarchical, traditional
    #[arg(short, long)]
    layout: Option<LayoutMode>,

    /// Grid step, or gap between hierarchical layers
    #[arg(short, long, allow_negative_numbers = true)]
    spacing: Option<i64>,

    /// Path to config file (default: erdflow.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Strip `[]` and `?` from field types before matching models
    #[arg(long)]
    strip_type_modifiers: bool,

    /// Link fields to models declared later in the file
    #[arg(long)]
    forward_references: bool,

    /// Rank direction for hierarchical layouts: tb or lr
    #[arg(long)]
    direction: Option<RankDirection>,

    /// Write JSON on a single line
    #[arg(long)]
    compact: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Command-line flags win over the config file.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(layout) = self.layout {
            config.layout = layout;
        }
        if let Some(spacing) = self.spacing {
            config.spacing = spacing;
        }
        if let Some(direction) = self.direction {
            config.direction = direction;
        }
        if self.strip_type_modifiers {
            config.parse.type_suffix = TypeSuffix::StripModifiers;
        }
        if self.forward_references {
            config.parse.forward_references = true;
        }
        config
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    let default = Path::new(CONFIG_FILE);
    if default.exists() {
        Config::from_file(default)
            .with_context(|| format!("Failed to load config {}", default.display()))
    } else {
        debug!("no config file found, using defaults");
        Ok(Config::default())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = cli.apply(load_config(cli.config.as_deref())?);
    debug!(
        layout = %config.layout,
        spacing = config.spacing,
        direction = ?config.direction,
        "using settings"
    );

    let input = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;

    if input.trim().is_empty() {
        warn!(input = %cli.input.display(), "schema is blank");
    }

    let schema = parse_with(&input, &config.parse);
    if schema.is_empty() {
        warn!(input = %cli.input.display(), "no models found, check the schema syntax");
    }

    let ir = GraphIR::from_schema(&schema);
    let layout = LayoutEngine::default()
        .with_direction(config.direction)
        .layout(&ir, config.layout, config.spacing);

    let json = if cli.compact {
        serde_json::to_string(&layout)
    } else {
        serde_json::to_string_pretty(&layout)
    }
    .context("Failed to serialize layout")?;

    match &cli.output {
        Some(path) => fs::write(path, format!("{json}\n"))
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}
