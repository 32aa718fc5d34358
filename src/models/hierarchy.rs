//! Resolved name chain for a coded unit.

use serde::{Deserialize, Serialize};

use super::Level;

/// One resolved level: the 2-digit code and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyEntry {
    pub code: String,
    pub name: String,
}

impl HierarchyEntry {
    pub fn new(code: String, name: String) -> Self {
        Self { code, name }
    }
}

/// Denormalized parent chain for a coded unit, one optional entry per level.
///
/// A miss at one level leaves that slot `None` without disturbing the levels
/// above it, so callers can render whatever part of the chain resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<HierarchyEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<HierarchyEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrondissement: Option<HierarchyEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub commune: Option<HierarchyEntry>,
}

impl Hierarchy {
    /// Set the entry for a given level
    pub fn set(&mut self, level: Level, entry: HierarchyEntry) {
        match level {
            Level::Region => self.region = Some(entry),
            Level::Department => self.department = Some(entry),
            Level::Arrondissement => self.arrondissement = Some(entry),
            Level::Commune => self.commune = Some(entry),
        }
    }

    /// Get the entry for a given level
    pub fn get(&self, level: Level) -> Option<&HierarchyEntry> {
        match level {
            Level::Region => self.region.as_ref(),
            Level::Department => self.department.as_ref(),
            Level::Arrondissement => self.arrondissement.as_ref(),
            Level::Commune => self.commune.as_ref(),
        }
    }

    /// Most specific level that resolved, if any
    pub fn deepest(&self) -> Option<Level> {
        Level::all()
            .iter()
            .rev()
            .copied()
            .find(|level| self.get(*level).is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.deepest().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_round_trip() {
        let mut hierarchy = Hierarchy::default();
        for level in Level::all() {
            assert!(hierarchy.get(*level).is_none());
            hierarchy.set(
                *level,
                HierarchyEntry::new("01".to_string(), format!("unit at {level}")),
            );
        }
        for level in Level::all() {
            let entry = hierarchy.get(*level).unwrap();
            assert_eq!(entry.code, "01");
            assert_eq!(entry.name, format!("unit at {level}"));
        }
    }

    #[test]
    fn test_deepest() {
        let mut hierarchy = Hierarchy::default();
        assert!(hierarchy.is_empty());
        assert_eq!(hierarchy.deepest(), None);

        hierarchy.set(
            Level::Region,
            HierarchyEntry::new("01".to_string(), "Dakar".to_string()),
        );
        assert_eq!(hierarchy.deepest(), Some(Level::Region));

        hierarchy.set(
            Level::Arrondissement,
            HierarchyEntry::new("01".to_string(), "Almadies".to_string()),
        );
        assert_eq!(hierarchy.deepest(), Some(Level::Arrondissement));
        assert!(!hierarchy.is_empty());
    }

    #[test]
    fn test_unresolved_levels_are_skipped_in_json() {
        let mut hierarchy = Hierarchy::default();
        hierarchy.set(
            Level::Region,
            HierarchyEntry::new("01".to_string(), "Dakar".to_string()),
        );

        let json = serde_json::to_value(&hierarchy).unwrap();
        assert_eq!(json["region"]["name"], "Dakar");
        assert!(json.get("commune").is_none());
    }
}
