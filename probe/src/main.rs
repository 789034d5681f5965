use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use engine::{is_valid_thumbnail, zoom_url, HoverEvaluator, Preferences, SiteRuleRegistry};

#[derive(Parser)]
#[command(name = "imagezoom-probe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect the image zoom site rules", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Preferences file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in site rules in lookup order
    Rules,

    /// Resolve image URLs as if hovered on the given page
    Check {
        #[arg(short, long)]
        page: String,

        #[arg(required = true)]
        images: Vec<String>,
    },

    /// Print the effective preferences
    Prefs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let registry = SiteRuleRegistry::builtin().context("building site rules")?;
    let prefs = load_prefs(cli.config.as_ref())?;

    match cli.command {
        Commands::Rules => print_rules(&registry, &prefs),
        Commands::Check { page, images } => check(&registry, &prefs, &page, &images)?,
        Commands::Prefs => print!("{}", prefs.to_toml().context("serializing preferences")?),
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_prefs(path: Option<&PathBuf>) -> Result<Preferences> {
    match path {
        Some(path) => Preferences::load(path)
            .with_context(|| format!("loading preferences from {}", path.display())),
        None => Ok(Preferences::default()),
    }
}

fn print_rules(registry: &SiteRuleRegistry, prefs: &Preferences) {
    println!("{:<4} {:<12} {:<16} {:<8} PREFERENCE", "#", "KEY", "NAME", "ENABLED");
    for (index, rule) in registry.iter() {
        println!(
            "{:<4} {:<12} {:<16} {:<8} {}",
            index.get(),
            rule.key(),
            rule.display_name(),
            prefs.site_enabled(rule.key()),
            registry.preference_key(index).unwrap_or_default()
        );
    }
}

fn check(
    registry: &SiteRuleRegistry,
    prefs: &Preferences,
    page: &str,
    images: &[String],
) -> Result<()> {
    let hover = HoverEvaluator::new(registry, prefs);
    let binding = match hover.bind_page(page) {
        Ok(binding) => binding,
        Err(miss) => bail!("{}: {}", page, miss),
    };
    let rule = registry
        .get(binding.rule)
        .context("page bound to a rule outside the registry")?;
    debug!(rule = rule.key(), page, "checking images");
    println!("{} ({})", rule.display_name(), rule.key());

    for image in images {
        let valid = is_valid_thumbnail(image, rule);
        match zoom_url(image, rule) {
            Some(zoomed) => println!("  {} [{}] -> {}", image, thumbnail_label(valid), zoomed),
            None => println!("  {} [{}] -> no zoom", image, thumbnail_label(valid)),
        }
    }
    Ok(())
}

fn thumbnail_label(valid: bool) -> &'static str {
    if valid {
        "thumbnail"
    } else {
        "foreign"
    }
}
