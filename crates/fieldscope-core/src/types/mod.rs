//! Core types shared by projection, catalog and suggestions

mod entity;
mod options;
mod path;

pub use entity::{EntityType, UnknownEntityType};
pub use options::ProjectionOptions;
pub use path::{FieldPath, UnsupportedPath};
