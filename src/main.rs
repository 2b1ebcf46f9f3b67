use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use encounter_catalogue::{
    CatalogueStore, EncounterQuery, LocationResolver, SpeciesId, Validator, canonicalize,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "encounter-catalogue", about = "Query the encounter catalogue")]
struct Cli {
    /// Catalogue file (.json, .yaml or .yml)
    #[arg(long)]
    catalogue: PathBuf,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List species in catalogue order
    Species,
    /// Method labels recorded for a species
    Methods { species: String },
    /// Locations for a species, optionally narrowed to one method
    Locations {
        species: String,
        #[arg(long)]
        method: Option<String>,
    },
    /// Check whether an encounter is legal
    Check {
        species: String,
        #[arg(long)]
        method: String,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        area: Option<String>,
        /// Require an exact raw-record match instead of the categorical rules
        #[arg(long)]
        strict: bool,
    },
    /// Show the canonical method for a label
    Canonicalize { label: String },
}

fn resolve_species(store: &CatalogueStore, input: &str) -> anyhow::Result<SpeciesId> {
    if let Ok(raw) = input.trim().parse::<u32>() {
        let id = SpeciesId::new(raw);
        if store.find_species(id).is_some() {
            return Ok(id);
        }
        bail!("no species with id {raw}");
    }
    match store.find_species_by_name(input) {
        Some(species) => Ok(species.id),
        None => bail!("no species named {input}"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let store = Arc::new(
        CatalogueStore::from_path(&cli.catalogue)
            .with_context(|| format!("loading catalogue {}", cli.catalogue.display()))?,
    );
    let resolver = LocationResolver::new(Arc::clone(&store));
    let validator = Validator::new(Arc::clone(&store));

    match cli.command {
        Command::Species => {
            for species in store.list_species() {
                println!("{:>5}  {}", species.id, species.name);
            }
        }
        Command::Methods { species } => {
            let id = resolve_species(&store, &species)?;
            for label in resolver.get_methods_for_species(id) {
                println!("{label} ({})", canonicalize(&label));
            }
        }
        Command::Locations { species, method } => {
            let id = resolve_species(&store, &species)?;
            let options = match method.as_deref() {
                Some(method) => resolver.get_locations_for_method(id, method),
                None => resolver.get_valid_locations(id),
            };
            for option in options {
                match option.rarity.as_deref() {
                    Some(rarity) => {
                        println!("{} [{}, {rarity}]", option.label, option.method_label)
                    }
                    None => println!("{} [{}]", option.label, option.method_label),
                }
            }
        }
        Command::Check {
            species,
            method,
            region,
            area,
            strict,
        } => {
            let id = resolve_species(&store, &species)?;
            let valid = if strict {
                let query = EncounterQuery::new(&method, region.as_deref(), area.as_deref());
                validator.validate_encounter(id, &query)
            } else {
                validator.is_method_valid_for_location(
                    id,
                    region.as_deref(),
                    area.as_deref(),
                    &method,
                )
            };
            let policy = if strict { "strict" } else { "categorical" };
            println!("{} ({policy})", if valid { "legal" } else { "not legal" });
        }
        Command::Canonicalize { label } => {
            println!("{}", canonicalize(&label));
        }
    }

    Ok(())
}
