//! Core data models for administrative code resolution.

pub mod code;
pub mod hierarchy;

pub use code::{AdminCode, ArrondissementKey, CommuneKey, DepartmentKey, Level};
pub use hierarchy::{Hierarchy, HierarchyEntry};
