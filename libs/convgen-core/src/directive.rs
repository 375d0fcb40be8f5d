//! Field-path mapping directives
//!
//! A directive tells struct matching where a target field reads its value from, as a path
//! from the method's source value. Paths are already split into segments by the front end.
//! An empty source path is the method's source value itself; an empty target path is the
//! whole target, which rebases the entire conversion onto a source prefix.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::catalog::TypeCatalog;
use crate::error::{Error, FieldPath, Result};
use crate::shape::Shape;

/// One `(target, source)` override for a converter method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingDirective {
    #[serde(default)]
    pub source: Vec<String>,
    #[serde(default)]
    pub target: Vec<String>,
}

impl MappingDirective {
    pub fn new<S, T>(source: S, target: T) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            source: source.into_iter().map(Into::into).collect(),
            target: target.into_iter().map(Into::into).collect(),
        }
    }

    /// Build a directive from dotted paths, where `.` stands for the empty path.
    pub fn from_dotted(source: &str, target: &str) -> Self {
        Self {
            source: split_dotted(source),
            target: split_dotted(target),
        }
    }

    fn source_path(&self) -> FieldPath {
        FieldPath::from_segments(normalize(&self.source))
    }

    fn target_path(&self) -> FieldPath {
        FieldPath::from_segments(normalize(&self.target))
    }
}

impl fmt::Display for MappingDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "map {} {}", self.source_path(), self.target_path())
    }
}

/// Split a dotted path into segments. `.` and the empty string yield no segments.
pub fn split_dotted(path: &str) -> Vec<String> {
    path.split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn normalize(segments: &[String]) -> Vec<String> {
    segments
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(String::from)
        .collect()
}

/// Validated directives of one method, keyed by target path
#[derive(Debug, Clone, Default)]
pub struct DirectiveTable {
    entries: BTreeMap<FieldPath, FieldPath>,
}

impl DirectiveTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate `directives` against the method's source and target shapes and index them.
    pub fn build(
        directives: &[MappingDirective],
        source: &Shape,
        target: &Shape,
        catalog: &dyn TypeCatalog,
    ) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for directive in directives {
            let target_path = directive.target_path();
            let source_path = directive.source_path();

            walk_target(catalog, target, &target_path)
                .map_err(|reason| invalid(directive, reason))?;
            walk_source(catalog, source, &source_path)
                .map_err(|reason| invalid(directive, reason))?;

            if entries.insert(target_path.clone(), source_path).is_some() {
                return Err(invalid(
                    directive,
                    format!("target {} is mapped more than once", target_path),
                ));
            }
        }
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Source path for an exact target path
    pub fn get(&self, target: &FieldPath) -> Option<&FieldPath> {
        self.entries.get(target)
    }

    /// Whether any directive addresses `path` or something below it.
    pub fn touches(&self, path: &FieldPath) -> bool {
        self.entries.keys().any(|target| target.starts_with(path))
    }

    /// Whether any directive addresses a path strictly below `path`.
    pub fn touches_below(&self, path: &FieldPath) -> bool {
        self.entries
            .keys()
            .any(|target| target != path && target.starts_with(path))
    }
}

fn invalid(directive: &MappingDirective, reason: String) -> Error {
    Error::InvalidDirective {
        directive: directive.to_string(),
        reason,
    }
}

/// Shape found at `path` below a source shape. Only struct fields can be traversed.
pub fn walk_source(
    catalog: &dyn TypeCatalog,
    root: &Shape,
    path: &FieldPath,
) -> std::result::Result<Shape, String> {
    let mut current = root.clone();
    for segment in path.segments() {
        let name = match &current {
            Shape::Named(name) => name.clone(),
            other => return Err(format!("cannot read {} from {}", segment, other)),
        };
        let named = catalog
            .named(&name)
            .ok_or_else(|| format!("unknown type {}", name))?;
        let field = named
            .field(segment)
            .ok_or_else(|| format!("source {} has no field {}", name, segment))?;
        current = field.shape.clone();
    }
    Ok(current)
}

/// Shape found at `path` below a target shape. Pointers to structs are looked through,
/// since the pointer rules keep the field path unchanged.
pub fn walk_target(
    catalog: &dyn TypeCatalog,
    root: &Shape,
    path: &FieldPath,
) -> std::result::Result<Shape, String> {
    let mut current = root.clone();
    for segment in path.segments() {
        let name = current
            .struct_name()
            .ok_or_else(|| format!("cannot address {} inside {}", segment, current))?
            .to_string();
        let named = catalog
            .named(&name)
            .ok_or_else(|| format!("unknown type {}", name))?;
        let field = named
            .field(segment)
            .ok_or_else(|| format!("target {} has no field {}", name, segment))?;
        current = field.shape.clone();
    }
    Ok(current)
}
