//! Handler-facing façade over projection and suggestions

mod field_shaper;
mod request;

pub use field_shaper::FieldShaper;
pub use request::{ProjectionRequest, ShapedBatch, ShapedRecord};
