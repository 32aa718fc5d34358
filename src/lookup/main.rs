//! One-shot console lookups against the reference dataset.
//!
//! Resolves codes to names, prints hierarchies and child listings, and
//! validates dataset directories. Exit status follows the grep convention:
//! 0 for a hit, 1 for "no such code" (a listing that selects nothing
//! counts as a miss), 2 for load or usage failures.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::FmtSubscriber;

use baobab::geo::{load_embedded, load_from_dir};
use baobab::models::{AdminCode, ArrondissementKey, DepartmentKey, Level};
use baobab::GeoResolver;

#[derive(Parser, Debug)]
#[command(name = "lookup")]
#[command(about = "Resolve administrative codes from the console")]
struct Args {
    /// Dataset directory (defaults to the embedded snapshot)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve an arrondissement name
    Arrondissement {
        region: String,
        department: String,
        arrondissement: String,
    },
    /// Resolve a commune name
    Commune {
        region: String,
        department: String,
        arrondissement: String,
        commune: String,
    },
    /// Resolve every level of a coded path
    Hierarchy {
        region: String,
        department: Option<String>,
        arrondissement: Option<String>,
        commune: Option<String>,

        /// Print the hierarchy as JSON
        #[arg(long)]
        json: bool,
    },
    /// List child units of a node
    List {
        #[command(subcommand)]
        listing: Listing,
    },
    /// Load and validate the dataset, printing per-level counts
    Check,
}

#[derive(Subcommand, Debug)]
enum Listing {
    /// All regions
    Regions,
    /// Departments of a region
    Departments { region: String },
    /// Arrondissements of a department
    Arrondissements { region: String, department: String },
    /// Communes of an arrondissement
    Communes {
        region: String,
        department: String,
        arrondissement: String,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(status) => ExitCode::from(status),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<u8> {
    // Keep info-level load chatter off the lookup output
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::WARN)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let table = match &args.data_dir {
        Some(dir) => {
            load_from_dir(dir).with_context(|| format!("loading dataset {}", dir.display()))?
        }
        None => load_embedded().context("loading embedded dataset")?,
    };
    let resolver = GeoResolver::new(table);

    let status = match args.command {
        Command::Arrondissement {
            region,
            department,
            arrondissement,
        } => print_resolution(resolver.resolve_arrondissement(
            &region,
            &department,
            &arrondissement,
        )),
        Command::Commune {
            region,
            department,
            arrondissement,
            commune,
        } => print_resolution(resolver.resolve_commune(
            &region,
            &department,
            &arrondissement,
            &commune,
        )),
        Command::Hierarchy {
            region,
            department,
            arrondissement,
            commune,
            json,
        } => {
            let hierarchy = resolver.resolve_hierarchy(
                &region,
                department.as_deref(),
                arrondissement.as_deref(),
                commune.as_deref(),
            );
            if hierarchy.is_empty() {
                eprintln!("not found");
                1
            } else if json {
                println!("{}", serde_json::to_string_pretty(&hierarchy)?);
                0
            } else {
                for level in Level::all() {
                    if let Some(entry) = hierarchy.get(*level) {
                        println!("{:<15} {:<12} {}", level.field_name(), entry.code, entry.name);
                    }
                }
                0
            }
        }
        Command::List { listing } => {
            let entries = match listing {
                Listing::Regions => resolver
                    .table()
                    .regions()
                    .into_iter()
                    .map(|(code, name)| (code.to_string(), name.to_string()))
                    .collect::<Vec<_>>(),
                Listing::Departments { region } => match AdminCode::parse(&region) {
                    Some(region) => resolver
                        .table()
                        .departments_of(&region)
                        .into_iter()
                        .map(|(key, name)| (key.to_string(), name.to_string()))
                        .collect(),
                    None => Vec::new(),
                },
                Listing::Arrondissements { region, department } => {
                    match DepartmentKey::parse(&region, &department) {
                        Some(key) => resolver
                            .table()
                            .arrondissements_of(&key)
                            .into_iter()
                            .map(|(key, name)| (key.to_string(), name.to_string()))
                            .collect(),
                        None => Vec::new(),
                    }
                }
                Listing::Communes {
                    region,
                    department,
                    arrondissement,
                } => match ArrondissementKey::parse(&region, &department, &arrondissement) {
                    Some(key) => resolver
                        .table()
                        .communes_of(&key)
                        .into_iter()
                        .map(|(key, name)| (key.to_string(), name.to_string()))
                        .collect(),
                    None => Vec::new(),
                },
            };
            print_listing(&entries)
        }
        Command::Check => {
            let table = resolver.table();
            println!(
                "dataset {} ok: {} regions, {} departments, {} arrondissements, {} communes",
                table.version(),
                table.count(Level::Region),
                table.count(Level::Department),
                table.count(Level::Arrondissement),
                table.count(Level::Commune)
            );
            0
        }
    };

    Ok(status)
}

fn print_resolution(name: Option<&str>) -> u8 {
    match name {
        Some(name) => {
            println!("{name}");
            0
        }
        None => {
            eprintln!("not found");
            1
        }
    }
}

/// A listing that selects nothing is a miss, like a grep with no matches.
fn print_listing(entries: &[(String, String)]) -> u8 {
    if entries.is_empty() {
        eprintln!("no matches");
        return 1;
    }
    for (code, name) in entries {
        println!("{:<12} {}", code, name);
    }
    0
}
