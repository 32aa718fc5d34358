//! HTTP query server for administrative code resolution.
//!
//! Serves code-to-name lookups, hierarchy resolution, and child listings
//! over the bundled reference dataset (or an external data directory).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use baobab::geo::{load_embedded, load_from_dir};
use baobab::models::{AdminCode, ArrondissementKey, DepartmentKey, Hierarchy, Level};
use baobab::GeoResolver;

mod config;
use config::Config;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Administrative code resolution server")]
struct Args {
    /// Listen address
    #[arg(short, long)]
    listen: Option<String>,

    /// Dataset directory (defaults to the embedded snapshot)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Optional TOML config file; flags take precedence over it
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Application state shared across handlers
struct AppState {
    resolver: GeoResolver,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    let listen = args
        .listen
        .or(config.server.listen)
        .unwrap_or_else(|| "0.0.0.0:3000".to_string());
    let data_dir = args.data_dir.or(config.server.data_dir);

    info!("Baobab resolution server");

    let table = match &data_dir {
        Some(dir) => {
            info!("Loading dataset from {}", dir.display());
            load_from_dir(dir).with_context(|| format!("loading dataset {}", dir.display()))?
        }
        None => load_embedded().context("loading embedded dataset")?,
    };
    let state = Arc::new(AppState {
        resolver: GeoResolver::new(table),
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/arrondissement", get(arrondissement_handler))
        .route("/v1/commune", get(commune_handler))
        .route("/v1/hierarchy", get(hierarchy_handler))
        .route("/v1/list/regions", get(list_regions_handler))
        .route("/v1/list/departments", get(list_departments_handler))
        .route("/v1/list/arrondissements", get(list_arrondissements_handler))
        .route("/v1/list/communes", get(list_communes_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", listen);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint with dataset stats
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let table = state.resolver.table();
    Json(HealthResponse {
        status: "ok",
        dataset: DatasetStats {
            version: table.version().to_string(),
            loaded_at: table.loaded_at(),
            regions: table.count(Level::Region),
            departments: table.count(Level::Department),
            arrondissements: table.count(Level::Arrondissement),
            communes: table.count(Level::Commune),
        },
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    dataset: DatasetStats,
}

#[derive(Serialize)]
struct DatasetStats {
    version: String,
    loaded_at: DateTime<Utc>,
    regions: usize,
    departments: usize,
    arrondissements: usize,
    communes: usize,
}

/// Resolve an arrondissement code to its name
async fn arrondissement_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ArrondissementParams>,
) -> Json<ResolutionResponse> {
    let name = state.resolver.resolve_arrondissement(
        &params.region,
        &params.department,
        &params.arrondissement,
    );
    Json(ResolutionResponse::new(
        name,
        format!(
            "{}/{}/{}",
            params.region, params.department, params.arrondissement
        ),
    ))
}

/// Resolve a commune code to its name
async fn commune_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CommuneParams>,
) -> Json<ResolutionResponse> {
    let name = state.resolver.resolve_commune(
        &params.region,
        &params.department,
        &params.arrondissement,
        &params.commune,
    );
    Json(ResolutionResponse::new(
        name,
        format!(
            "{}/{}/{}/{}",
            params.region, params.department, params.arrondissement, params.commune
        ),
    ))
}

/// Resolve every level of a coded path
async fn hierarchy_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HierarchyParams>,
) -> Json<Hierarchy> {
    Json(state.resolver.resolve_hierarchy(
        &params.region,
        params.department.as_deref(),
        params.arrondissement.as_deref(),
        params.commune.as_deref(),
    ))
}

/// List all regions
async fn list_regions_handler(State(state): State<Arc<AppState>>) -> Json<ListResponse> {
    let entries = state
        .resolver
        .table()
        .regions()
        .into_iter()
        .map(|(code, name)| ListEntry {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect();
    Json(ListResponse::new(entries))
}

/// List the departments of a region
async fn list_departments_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RegionParams>,
) -> Json<ListResponse> {
    let entries = match AdminCode::parse(&params.region) {
        Some(region) => state
            .resolver
            .table()
            .departments_of(&region)
            .into_iter()
            .map(|(key, name)| ListEntry {
                code: key.to_string(),
                name: name.to_string(),
            })
            .collect(),
        None => Vec::new(),
    };
    Json(ListResponse::new(entries))
}

/// List the arrondissements of a department
async fn list_arrondissements_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DepartmentParams>,
) -> Json<ListResponse> {
    let entries = match DepartmentKey::parse(&params.region, &params.department) {
        Some(key) => state
            .resolver
            .table()
            .arrondissements_of(&key)
            .into_iter()
            .map(|(key, name)| ListEntry {
                code: key.to_string(),
                name: name.to_string(),
            })
            .collect(),
        None => Vec::new(),
    };
    Json(ListResponse::new(entries))
}

/// List the communes of an arrondissement
async fn list_communes_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ArrondissementParams>,
) -> Json<ListResponse> {
    let entries = match ArrondissementKey::parse(
        &params.region,
        &params.department,
        &params.arrondissement,
    ) {
        Some(key) => state
            .resolver
            .table()
            .communes_of(&key)
            .into_iter()
            .map(|(key, name)| ListEntry {
                code: key.to_string(),
                name: name.to_string(),
            })
            .collect(),
        None => Vec::new(),
    };
    Json(ListResponse::new(entries))
}

#[derive(Deserialize)]
struct RegionParams {
    region: String,
}

#[derive(Deserialize)]
struct DepartmentParams {
    region: String,
    department: String,
}

#[derive(Deserialize)]
struct ArrondissementParams {
    region: String,
    department: String,
    arrondissement: String,
}

#[derive(Deserialize)]
struct CommuneParams {
    region: String,
    department: String,
    arrondissement: String,
    commune: String,
}

/// Only the region is required; deeper levels resolve as far as supplied.
#[derive(Deserialize)]
struct HierarchyParams {
    region: String,
    department: Option<String>,
    arrondissement: Option<String>,
    commune: Option<String>,
}

/// A lookup answer. A miss is a normal response, not a transport error.
#[derive(Serialize)]
struct ResolutionResponse {
    found: bool,
    name: Option<String>,
    key: String,
}

impl ResolutionResponse {
    fn new(name: Option<&str>, key: String) -> Self {
        Self {
            found: name.is_some(),
            name: name.map(String::from),
            key,
        }
    }
}

#[derive(Serialize)]
struct ListEntry {
    code: String,
    name: String,
}

#[derive(Serialize)]
struct ListResponse {
    count: usize,
    entries: Vec<ListEntry>,
}

impl ListResponse {
    fn new(entries: Vec<ListEntry>) -> Self {
        Self {
            count: entries.len(),
            entries,
        }
    }
}
