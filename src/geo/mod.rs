//! Administrative code resolution.
//!
//! Loads the coded subdivision dataset into an immutable [`GeoTable`] and
//! answers code-to-name lookups through a [`GeoResolver`].

mod error;
mod load;
mod resolver;
mod table;

pub use error::DatasetError;
pub use load::{load_embedded, load_from_dir};
pub use resolver::GeoResolver;
pub use table::GeoTable;
