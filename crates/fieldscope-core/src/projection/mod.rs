//! Field projection
//!
//! Shapes a tracker record down to the fields a caller asked for:
//!
//! ```rust
//! use fieldscope_core::projection::project;
//! use fieldscope_core::ProjectionOptions;
//! use serde_json::json;
//!
//! let issue = json!({
//!     "id": "1",
//!     "status": { "name": "In Progress" },
//!     "assignee": { "displayName": "John Doe" }
//! });
//! let fields = ["status.name".to_string()];
//! let shaped = project(&issue, Some(&fields[..]), &ProjectionOptions::default());
//! assert_eq!(shaped.into_owned(), json!({ "status": { "name": "In Progress" } }));
//! ```

mod projector;

pub use projector::{project, BatchProjection, ProjectionReport, Projector};
