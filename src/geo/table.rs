//! Immutable lookup table for administrative reference data.

use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use tracing::info;

use crate::models::{AdminCode, ArrondissementKey, CommuneKey, DepartmentKey, Level};

/// Display names for every coded unit, keyed by composite code.
///
/// Built once by the dataset loader and read-only afterwards: there is no
/// `&mut` surface, so a table behind an `Arc` is safe to share across
/// threads without locking. Lookups are direct hash-map hits, O(1) expected.
#[derive(Debug, Clone)]
pub struct GeoTable {
    version: String,
    loaded_at: DateTime<Utc>,
    regions: HashMap<AdminCode, String>,
    departments: HashMap<DepartmentKey, String>,
    arrondissements: HashMap<ArrondissementKey, String>,
    communes: HashMap<CommuneKey, String>,
}

impl GeoTable {
    /// Assemble a table from validated per-level maps.
    ///
    /// Crate-private so that every table goes through the dataset loader,
    /// which checks key uniqueness and referential integrity before the
    /// maps ever reach this constructor.
    pub(crate) fn new(
        version: String,
        regions: HashMap<AdminCode, String>,
        departments: HashMap<DepartmentKey, String>,
        arrondissements: HashMap<ArrondissementKey, String>,
        communes: HashMap<CommuneKey, String>,
    ) -> Self {
        let table = Self {
            version,
            loaded_at: Utc::now(),
            regions,
            departments,
            arrondissements,
            communes,
        };

        info!(
            "Reference table built: {} regions, {} departments, {} arrondissements, {} communes",
            table.regions.len(),
            table.departments.len(),
            table.arrondissements.len(),
            table.communes.len()
        );

        table
    }

    /// Dataset version string from the manifest
    pub fn version(&self) -> &str {
        &self.version
    }

    /// When this table was loaded into the process
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Name of a region
    pub fn region_name(&self, region: &AdminCode) -> Option<&str> {
        self.regions.get(region).map(String::as_str)
    }

    /// Name of a department
    pub fn department_name(&self, key: &DepartmentKey) -> Option<&str> {
        self.departments.get(key).map(String::as_str)
    }

    /// Name of an arrondissement
    pub fn arrondissement_name(&self, key: &ArrondissementKey) -> Option<&str> {
        self.arrondissements.get(key).map(String::as_str)
    }

    /// Name of a commune
    pub fn commune_name(&self, key: &CommuneKey) -> Option<&str> {
        self.communes.get(key).map(String::as_str)
    }

    /// All regions, ordered by code
    pub fn regions(&self) -> Vec<(AdminCode, &str)> {
        let mut rows: Vec<_> = self
            .regions
            .iter()
            .map(|(code, name)| (*code, name.as_str()))
            .collect();
        rows.sort_by_key(|(code, _)| *code);
        rows
    }

    /// Departments of a region, ordered by code; empty for an unknown region
    pub fn departments_of(&self, region: &AdminCode) -> Vec<(DepartmentKey, &str)> {
        let mut rows: Vec<_> = self
            .departments
            .iter()
            .filter(|(key, _)| key.region == *region)
            .map(|(key, name)| (*key, name.as_str()))
            .collect();
        rows.sort_by_key(|(key, _)| *key);
        rows
    }

    /// Arrondissements of a department, ordered by code
    pub fn arrondissements_of(&self, department: &DepartmentKey) -> Vec<(ArrondissementKey, &str)> {
        let mut rows: Vec<_> = self
            .arrondissements
            .iter()
            .filter(|(key, _)| key.department_key() == *department)
            .map(|(key, name)| (*key, name.as_str()))
            .collect();
        rows.sort_by_key(|(key, _)| *key);
        rows
    }

    /// Communes of an arrondissement, ordered by code
    pub fn communes_of(&self, arrondissement: &ArrondissementKey) -> Vec<(CommuneKey, &str)> {
        let mut rows: Vec<_> = self
            .communes
            .iter()
            .filter(|(key, _)| key.arrondissement_key() == *arrondissement)
            .map(|(key, name)| (*key, name.as_str()))
            .collect();
        rows.sort_by_key(|(key, _)| *key);
        rows
    }

    /// Number of units at one level
    pub fn count(&self, level: Level) -> usize {
        match level {
            Level::Region => self.regions.len(),
            Level::Department => self.departments.len(),
            Level::Arrondissement => self.arrondissements.len(),
            Level::Commune => self.communes.len(),
        }
    }

    /// Total number of coded units across all levels
    pub fn len(&self) -> usize {
        Level::all().iter().map(|level| self.count(*level)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
