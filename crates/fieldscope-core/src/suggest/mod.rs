//! Field-name suggestions
//!
//! ```rust
//! use fieldscope_core::catalog::FieldCatalog;
//! use fieldscope_core::suggest::SuggestionEngine;
//!
//! let engine = SuggestionEngine::new(FieldCatalog::builtin()?);
//! let suggestion = engine.suggest("issue", "summry")?;
//! assert_eq!(suggestion.corrected.as_deref(), Some("summary"));
//! # Ok::<(), fieldscope_core::catalog::CatalogError>(())
//! ```

mod engine;
mod suggestion;

pub use engine::{SuggestionEngine, DEFAULT_MAX_ALTERNATIVES};
pub use suggestion::{FieldValidation, Suggestion};
pub(crate) use suggestion::unsupported_hint;
