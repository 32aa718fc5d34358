//! Baobab - code-to-name resolution for Senegal's administrative subdivisions
//!
//! This library provides shared types and modules for the serve and lookup binaries.

pub mod geo;
pub mod models;

pub use geo::{GeoResolver, GeoTable};
pub use models::{AdminCode, Hierarchy, Level};
