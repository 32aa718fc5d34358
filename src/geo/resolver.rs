//! Code-to-name resolution over a loaded reference table.

use super::GeoTable;
use crate::models::{
    AdminCode, ArrondissementKey, CommuneKey, DepartmentKey, Hierarchy, HierarchyEntry, Level,
};

/// Resolves administrative codes to display names.
///
/// Owns the table it answers from; construct one with whichever dataset the
/// caller loaded. Every resolution is a pure function of the input codes:
/// misses and malformed codes come back as `None`, never as an error.
pub struct GeoResolver {
    table: GeoTable,
}

impl GeoResolver {
    pub fn new(table: GeoTable) -> Self {
        Self { table }
    }

    /// The table this resolver answers from
    pub fn table(&self) -> &GeoTable {
        &self.table
    }

    /// Name of a region, by its 2-digit code.
    pub fn resolve_region(&self, region: &str) -> Option<&str> {
        let region = AdminCode::parse(region)?;
        self.table.region_name(&region)
    }

    /// Name of a department within a region.
    pub fn resolve_department(&self, region: &str, department: &str) -> Option<&str> {
        let key = DepartmentKey::parse(region, department)?;
        self.table.department_name(&key)
    }

    /// Name of an arrondissement within a department.
    ///
    /// All three codes must be well formed and the full path must exist:
    /// a valid arrondissement code under the wrong department is a miss.
    pub fn resolve_arrondissement(
        &self,
        region: &str,
        department: &str,
        arrondissement: &str,
    ) -> Option<&str> {
        let key = ArrondissementKey::parse(region, department, arrondissement)?;
        self.table.arrondissement_name(&key)
    }

    /// Name of a commune within an arrondissement.
    pub fn resolve_commune(
        &self,
        region: &str,
        department: &str,
        arrondissement: &str,
        commune: &str,
    ) -> Option<&str> {
        let key = CommuneKey::parse(region, department, arrondissement, commune)?;
        self.table.commune_name(&key)
    }

    /// Resolve every level of a coded path in one pass.
    ///
    /// Each level is filled iff its own composite key is known; a miss at
    /// one level does not blank out the others. A malformed code ends the
    /// descent, since deeper keys cannot be formed without it.
    pub fn resolve_hierarchy(
        &self,
        region: &str,
        department: Option<&str>,
        arrondissement: Option<&str>,
        commune: Option<&str>,
    ) -> Hierarchy {
        let mut hierarchy = Hierarchy::default();

        let Some(region) = AdminCode::parse(region) else {
            return hierarchy;
        };
        if let Some(name) = self.table.region_name(&region) {
            hierarchy.set(
                Level::Region,
                HierarchyEntry::new(region.to_string(), name.to_string()),
            );
        }

        let Some(department) = department.and_then(AdminCode::parse) else {
            return hierarchy;
        };
        let department = DepartmentKey::new(region, department);
        if let Some(name) = self.table.department_name(&department) {
            hierarchy.set(
                Level::Department,
                HierarchyEntry::new(department.to_string(), name.to_string()),
            );
        }

        let Some(arrondissement) = arrondissement.and_then(AdminCode::parse) else {
            return hierarchy;
        };
        let arrondissement = ArrondissementKey::new(
            department.region,
            department.department,
            arrondissement,
        );
        if let Some(name) = self.table.arrondissement_name(&arrondissement) {
            hierarchy.set(
                Level::Arrondissement,
                HierarchyEntry::new(arrondissement.to_string(), name.to_string()),
            );
        }

        let Some(commune) = commune.and_then(AdminCode::parse) else {
            return hierarchy;
        };
        let commune = CommuneKey::new(
            arrondissement.region,
            arrondissement.department,
            arrondissement.arrondissement,
            commune,
        );
        if let Some(name) = self.table.commune_name(&commune) {
            hierarchy.set(
                Level::Commune,
                HierarchyEntry::new(commune.to_string(), name.to_string()),
            );
        }

        hierarchy
    }
}
