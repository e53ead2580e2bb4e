pub mod artifacts;
pub mod metadata;

pub use artifacts::{Catalog, FeatureMatrix, LoadError};
pub use metadata::load_id_map;
