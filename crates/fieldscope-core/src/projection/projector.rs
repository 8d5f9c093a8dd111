//! Record projection
//!
//! Resolution walks the record one segment at a time and stops as soon as
//! the current container is not an object or the key is absent. Nothing in
//! here returns an error: a field that cannot be resolved is simply left out
//! of the result.

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::log_debug;
use crate::logging::{NoOpLogger, SharedLogger};
use crate::types::{FieldPath, ProjectionOptions};

/// Outcome of projecting a single record
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionReport<'r> {
    /// The projected record (borrowed when projection was a no-op)
    pub value: Cow<'r, Value>,
    /// Requested paths that resolved to a value
    pub resolved: Vec<String>,
    /// Supported paths with no value in the record
    pub unresolved: Vec<String>,
    /// Paths rejected by the parser
    pub unsupported: Vec<String>,
}

impl ProjectionReport<'_> {
    /// Whether the record was returned as-is
    pub fn is_passthrough(&self) -> bool {
        matches!(self.value, Cow::Borrowed(_))
    }
}

/// Outcome of projecting a batch of records
#[derive(Debug, Clone, PartialEq)]
pub struct BatchProjection {
    /// Projected records, in input order
    pub records: Vec<Value>,
    /// Supported paths that did not resolve in any record
    pub never_resolved: Vec<String>,
    /// Paths rejected by the parser
    pub unsupported: Vec<String>,
}

/// Projects records down to a requested set of field paths
#[derive(Clone)]
pub struct Projector {
    logger: SharedLogger,
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(Arc::new(NoOpLogger))
    }
}

impl std::fmt::Debug for Projector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Projector").finish_non_exhaustive()
    }
}

impl Projector {
    /// Create a projector that reports diagnostics to `logger`
    ///
    /// The logger is only used when `ProjectionOptions::log_filtering` is set.
    pub fn new(logger: SharedLogger) -> Self {
        Self { logger }
    }

    /// Project `record` to the requested paths
    ///
    /// Returns the record itself (borrowed, not copied) when no paths are
    /// requested or when the record is not an object.
    pub fn project<'r, S: AsRef<str>>(
        &self,
        record: &'r Value,
        paths: Option<&[S]>,
        options: &ProjectionOptions,
    ) -> Cow<'r, Value> {
        self.project_with_report(record, paths, options).value
    }

    /// Owned variant of [`Projector::project`]
    ///
    /// The identity cases hand the input back without cloning it.
    pub fn project_owned<S: AsRef<str>>(
        &self,
        record: Value,
        paths: Option<&[S]>,
        options: &ProjectionOptions,
    ) -> Value {
        if !needs_projection(&record, paths) {
            return record;
        }
        self.project(&record, paths, options).into_owned()
    }

    /// Project `record` and report which paths resolved
    pub fn project_with_report<'r, S: AsRef<str>>(
        &self,
        record: &'r Value,
        paths: Option<&[S]>,
        options: &ProjectionOptions,
    ) -> ProjectionReport<'r> {
        let Some(paths) = paths.filter(|p| !p.is_empty()) else {
            return passthrough(record);
        };
        let Value::Object(source) = record else {
            // Returned as-is, but bracket paths are still reported
            let mut report = passthrough(record);
            report.unsupported = paths
                .iter()
                .map(|raw| raw.as_ref())
                .filter(|raw| !FieldPath::is_supported(raw))
                .map(str::to_string)
                .collect();
            return report;
        };

        let mut result = Map::new();
        let mut resolved = Vec::new();
        let mut unresolved = Vec::new();
        let mut unsupported = Vec::new();

        for raw in paths {
            let raw = raw.as_ref();
            let Ok(path) = FieldPath::parse(raw) else {
                unsupported.push(raw.to_string());
                continue;
            };

            match resolve(source, path.segments()) {
                Some(value) => {
                    if options.respect_nesting {
                        merge_nested(&mut result, path.segments(), value.clone());
                    } else {
                        result.insert(raw.to_string(), value.clone());
                    }
                    resolved.push(raw.to_string());
                }
                None => unresolved.push(raw.to_string()),
            }
        }

        if options.log_filtering {
            let entity = options.entity_type.map(|e| e.as_str()).unwrap_or("record");
            log_debug!(
                self.logger,
                "[Projector] {}: kept {}/{} requested fields (unresolved: {:?}, unsupported: {:?})",
                entity,
                resolved.len(),
                paths.len(),
                unresolved,
                unsupported
            );
        }

        ProjectionReport {
            value: Cow::Owned(Value::Object(result)),
            resolved,
            unresolved,
            unsupported,
        }
    }

    /// Project every record of a batch
    ///
    /// Also reports the paths that did not resolve in any record, which is
    /// what callers use to decide whether a requested field is wrong rather
    /// than merely sparse.
    pub fn project_many<S: AsRef<str>>(
        &self,
        records: &[Value],
        paths: Option<&[S]>,
        options: &ProjectionOptions,
    ) -> BatchProjection {
        let requested: Vec<&str> = paths
            .map(|p| p.iter().map(|s| s.as_ref()).collect())
            .unwrap_or_default();

        let unsupported: Vec<String> = requested
            .iter()
            .filter(|raw| !FieldPath::is_supported(raw))
            .map(|raw| raw.to_string())
            .collect();
        let mut never_resolved: Vec<&str> = requested
            .iter()
            .copied()
            .filter(|raw| FieldPath::is_supported(raw))
            .collect();

        let mut projected = Vec::with_capacity(records.len());
        for record in records {
            let report = self.project_with_report(record, paths, options);
            if !report.resolved.is_empty() {
                never_resolved.retain(|raw| !report.resolved.iter().any(|r| r == raw));
            }
            projected.push(report.value.into_owned());
        }

        BatchProjection {
            records: projected,
            never_resolved: dedup(never_resolved),
            unsupported: dedup(unsupported),
        }
    }
}

/// Project with a silent projector
pub fn project<'r, S: AsRef<str>>(
    record: &'r Value,
    paths: Option<&[S]>,
    options: &ProjectionOptions,
) -> Cow<'r, Value> {
    Projector::default().project(record, paths, options)
}

fn needs_projection<S: AsRef<str>>(record: &Value, paths: Option<&[S]>) -> bool {
    record.is_object() && paths.is_some_and(|p| !p.is_empty())
}

fn passthrough(record: &Value) -> ProjectionReport<'_> {
    ProjectionReport {
        value: Cow::Borrowed(record),
        resolved: Vec::new(),
        unresolved: Vec::new(),
        unsupported: Vec::new(),
    }
}

fn resolve<'r>(source: &'r Map<String, Value>, segments: &[&str]) -> Option<&'r Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = source.get(*first)?;
    for segment in rest {
        current = match current {
            Value::Object(map) => map.get(*segment)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Insert `value` at `segments`, creating objects along the way
///
/// A non-object sitting where an intermediate object is needed is replaced.
fn merge_nested(target: &mut Map<String, Value>, segments: &[&str], value: Value) {
    let Some((leaf, parents)) = segments.split_last() else {
        return;
    };

    let mut cursor = target;
    for segment in parents {
        let slot = cursor
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        cursor = match slot {
            Value::Object(next) => next,
            _ => return,
        };
    }
    cursor.insert((*leaf).to_string(), value);
}

fn dedup<T: AsRef<str>>(items: Vec<T>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.as_ref();
        if !out.iter().any(|existing| existing == item) {
            out.push(item.to_string());
        }
    }
    out
}
