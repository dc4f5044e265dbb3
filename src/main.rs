// src/main.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fpack::config::{ConfigCustomizations, ConfigId, ConfigModel};
use fpack::document::{self, Format};
use fpack::layers::LayerDirective;
use fpack::provisioning::ProvisioningConfig;
use tracing::info;

#[derive(Parser)]
#[command(name = "fpack")]
#[command(author, version, about = "Feature-pack provisioning configuration tool", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a provisioning document
    Show {
        /// Path to the provisioning document (TOML or JSON)
        file: PathBuf,
    },
    /// Rewrite a provisioning document in another format
    Convert {
        /// Path to the provisioning document
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Toml)]
        to: OutputFormat,
    },
    /// Resolve the layers of a config model
    Layers {
        /// Layer catalog (TOML or JSON)
        #[arg(long)]
        catalog: PathBuf,
        /// Config model the layers belong to
        #[arg(long)]
        model: String,
        /// Start from the config of this name defined in --provisioning
        #[arg(long, requires = "provisioning")]
        name: Option<String>,
        /// Provisioning document defining the starting config
        #[arg(long)]
        provisioning: Option<PathBuf>,
        /// Directives applied in order: `layer`, `-layer` or `+layer`
        #[arg(allow_hyphen_values = true)]
        directives: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Toml,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Show { file } => {
            let config = load_provisioning(&file)?;
            print_provisioning(&config);
            Ok(())
        }
        Commands::Convert { file, to } => {
            let config = load_provisioning(&file)?;
            let output = match to {
                OutputFormat::Toml => document::provisioning_to_toml(&config)?,
                OutputFormat::Json => document::provisioning_to_json(&config)?,
            };
            println!("{}", output);
            Ok(())
        }
        Commands::Layers {
            catalog,
            model,
            name,
            provisioning,
            directives,
        } => {
            let graph = document::parse_layer_catalog_file(&catalog)
                .with_context(|| format!("Failed to load layer catalog {}", catalog.display()))?;

            let mut config = match &provisioning {
                Some(path) => {
                    let provisioning = load_provisioning(path)?;
                    let id = ConfigId::new(Some(model.clone()), name.clone());
                    provisioning
                        .configs()
                        .defined_config(&id)
                        .cloned()
                        .with_context(|| format!("Config {} is not defined in {}", id, path.display()))?
                }
                None => ConfigModel::builder(Some(model.clone()), None).build(),
            };

            for directive in &directives {
                let directive = LayerDirective::parse(directive)?;
                info!("applying layer directive {}", directive);
                config = graph.apply(&config, &directive)?;
            }

            let resolution = graph.resolve(&config)?;
            println!("Config: {}", config.id());
            println!("Active layers: {}", resolution.active().join(", "));
            if !resolution.excluded().is_empty() {
                println!("Excluded layers: {}", resolution.excluded().join(", "));
            }
            if !resolution.dropped().is_empty() {
                println!("Dropped layers: {}", resolution.dropped().join(", "));
            }
            Ok(())
        }
    }
}

fn load_provisioning(path: &std::path::Path) -> Result<ProvisioningConfig> {
    info!("loading {} as {:?}", path.display(), Format::from_path(path));
    document::parse_provisioning_file(path)
        .with_context(|| format!("Failed to load provisioning document {}", path.display()))
}

fn print_provisioning(config: &ProvisioningConfig) {
    let deps = config.deps();

    if let Some(universe) = deps.default_universe() {
        println!("Default universe: {}", universe);
    }
    for (name, universe) in deps.universes() {
        println!("Universe {}: {}", name, universe);
    }

    println!("Dependencies:");
    for dep in deps.feature_pack_deps().chain(deps.transitive_deps()) {
        let kind = if dep.is_transitive() { "transitive" } else { "direct" };
        match deps.origin_of(&dep.location().producer()) {
            Some(origin) => println!("  {} ({}, origin {})", dep.location(), kind, origin),
            None => println!("  {} ({})", dep.location(), kind),
        }
        let included: Vec<_> = dep.included_packages().map(String::as_str).collect();
        if !included.is_empty() {
            println!("    include packages: {}", included.join(", "));
        }
        let excluded: Vec<_> = dep.excluded_packages().map(String::as_str).collect();
        if !excluded.is_empty() {
            println!("    exclude packages: {}", excluded.join(", "));
        }
        for patch in dep.patches() {
            println!("    patch: {}", patch);
        }
        print_customizations(dep.configs(), "    ");
    }

    print_customizations(config.configs(), "");

    if !config.options().is_empty() {
        println!("Options:");
        for (name, value) in config.options() {
            println!("  {} = {}", name, value);
        }
    }
}

fn print_customizations(configs: &ConfigCustomizations, indent: &str) {
    if let Some(inherit) = configs.inherit_configs() {
        println!("{}inherit configs: {}", indent, inherit);
    }
    for id in configs.configs().included().keys() {
        println!("{}include config: {}", indent, id);
    }
    for id in configs.configs().excluded().keys() {
        println!("{}exclude config: {}", indent, id);
    }
    for config in configs.defined_configs() {
        let layers: Vec<_> = config.included_layers().collect();
        if layers.is_empty() {
            println!("{}config: {}", indent, config.id());
        } else {
            println!("{}config: {} (layers {})", indent, config.id(), layers.join(", "));
        }
    }
}
