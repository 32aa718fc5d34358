//! Typed administrative codes and composite lookup keys.
//!
//! Senegal's ANSD coding assigns two decimal digits per level, scoped to the
//! parent unit: region `01` is Dakar, department `01/01` is the Dakar
//! department, and so on down to communes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Administrative level in the subdivision hierarchy, top-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Région (admin level 1)
    Region,
    /// Département (admin level 2)
    Department,
    /// Arrondissement (admin level 3)
    Arrondissement,
    /// Commune / commune d'arrondissement (admin level 4)
    Commune,
}

impl Level {
    /// All levels in hierarchical order (region first)
    pub fn all() -> &'static [Level] {
        &[
            Level::Region,
            Level::Department,
            Level::Arrondissement,
            Level::Commune,
        ]
    }

    /// 1-based depth of this level (region = 1, commune = 4)
    pub fn depth(&self) -> u8 {
        match self {
            Level::Region => 1,
            Level::Department => 2,
            Level::Arrondissement => 3,
            Level::Commune => 4,
        }
    }

    /// Get the field name for this level
    pub fn field_name(&self) -> &'static str {
        match self {
            Level::Region => "region",
            Level::Department => "department",
            Level::Arrondissement => "arrondissement",
            Level::Commune => "commune",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// A single 2-digit code component (`"01"` through `"99"`).
///
/// Stored as the two ASCII digit bytes, so keys stay `Copy` and hash without
/// allocation. Construction goes through [`AdminCode::parse`], which is the
/// only input validation in the lookup path: anything that is not exactly two
/// ASCII digits can never match a table key and is rejected up front.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdminCode([u8; 2]);

impl AdminCode {
    /// Parse a code from its string form. Returns `None` unless the input is
    /// exactly two ASCII digits; no trimming, no case folding.
    pub fn parse(s: &str) -> Option<Self> {
        match s.as_bytes() {
            [a, b] if a.is_ascii_digit() && b.is_ascii_digit() => Some(Self([*a, *b])),
            _ => None,
        }
    }
}

impl fmt::Display for AdminCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0] as char, self.0[1] as char)
    }
}

impl fmt::Debug for AdminCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AdminCode({self})")
    }
}

/// Composite key of a department: `region/department`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DepartmentKey {
    pub region: AdminCode,
    pub department: AdminCode,
}

impl DepartmentKey {
    pub fn new(region: AdminCode, department: AdminCode) -> Self {
        Self { region, department }
    }

    /// Parse from string codes; `None` when any component is malformed.
    pub fn parse(region: &str, department: &str) -> Option<Self> {
        Some(Self {
            region: AdminCode::parse(region)?,
            department: AdminCode::parse(department)?,
        })
    }
}

impl fmt::Display for DepartmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.region, self.department)
    }
}

/// Composite key of an arrondissement: `region/department/arrondissement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArrondissementKey {
    pub region: AdminCode,
    pub department: AdminCode,
    pub arrondissement: AdminCode,
}

impl ArrondissementKey {
    pub fn new(region: AdminCode, department: AdminCode, arrondissement: AdminCode) -> Self {
        Self {
            region,
            department,
            arrondissement,
        }
    }

    /// Parse from string codes; `None` when any component is malformed.
    pub fn parse(region: &str, department: &str, arrondissement: &str) -> Option<Self> {
        Some(Self {
            region: AdminCode::parse(region)?,
            department: AdminCode::parse(department)?,
            arrondissement: AdminCode::parse(arrondissement)?,
        })
    }

    /// Key of the parent department
    pub fn department_key(&self) -> DepartmentKey {
        DepartmentKey::new(self.region, self.department)
    }
}

impl fmt::Display for ArrondissementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.region, self.department, self.arrondissement
        )
    }
}

/// Composite key of a commune: `region/department/arrondissement/commune`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommuneKey {
    pub region: AdminCode,
    pub department: AdminCode,
    pub arrondissement: AdminCode,
    pub commune: AdminCode,
}

impl CommuneKey {
    pub fn new(
        region: AdminCode,
        department: AdminCode,
        arrondissement: AdminCode,
        commune: AdminCode,
    ) -> Self {
        Self {
            region,
            department,
            arrondissement,
            commune,
        }
    }

    /// Parse from string codes; `None` when any component is malformed.
    pub fn parse(
        region: &str,
        department: &str,
        arrondissement: &str,
        commune: &str,
    ) -> Option<Self> {
        Some(Self {
            region: AdminCode::parse(region)?,
            department: AdminCode::parse(department)?,
            arrondissement: AdminCode::parse(arrondissement)?,
            commune: AdminCode::parse(commune)?,
        })
    }

    /// Key of the parent arrondissement
    pub fn arrondissement_key(&self) -> ArrondissementKey {
        ArrondissementKey::new(self.region, self.department, self.arrondissement)
    }
}

impl fmt::Display for CommuneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.region, self.department, self.arrondissement, self.commune
        )
    }
}
