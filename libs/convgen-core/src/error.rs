//! Error types for conversion synthesis

use std::fmt;

use thiserror::Error;

use crate::shape::Shape;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Dotted path of target field names, rooted at a declared method.
///
/// A generated helper function reports paths from the field it was first needed for.
/// List elements and map entries appear as `[]`, `[key]` and `[value]` segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    pub fn element(&self) -> Self {
        self.child("[]")
    }

    pub fn key(&self) -> Self {
        self.child("[key]")
    }

    pub fn value(&self) -> Self {
        self.child("[value]")
    }

    /// Whether `self` is `other` or lies below it.
    pub fn starts_with(&self, other: &FieldPath) -> bool {
        self.0.starts_with(&other.0)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 && !segment.starts_with('[') {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

/// Conversion synthesis errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("could not find {0}")]
    NotFound(String),

    #[error("invalid signature for {name}: expected 1 parameter and 1 result, got {params} parameter(s) and {results} result(s)")]
    InvalidSignature {
        name: String,
        params: usize,
        results: usize,
    },

    #[error("{path}: no conversion rule for {from} to {to}")]
    UnsupportedConversion {
        from: Shape,
        to: Shape,
        path: FieldPath,
    },

    #[error("{path}: cannot convert {from} to {to}")]
    TypeMismatch {
        from: Shape,
        to: Shape,
        path: FieldPath,
    },

    #[error("{path}: source {source_type} has no field named {field}")]
    MissingField {
        source_type: String,
        field: String,
        path: FieldPath,
    },

    #[error("invalid directive {directive}: {reason}")]
    InvalidDirective { directive: String, reason: String },

    #[error("duplicate signature {from} -> {to}: {reason}")]
    DuplicateSignature { from: Shape, to: Shape, reason: String },

    #[error("{context}: {inner}")]
    Context { context: String, inner: Box<Error> },
}

impl Error {
    /// Wrap this error with the name of the unit being processed.
    pub fn context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            inner: Box::new(self),
        }
    }

    /// The innermost error, with all context layers removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { inner, .. } => inner.root(),
            other => other,
        }
    }
}

/// Attach context to the error of a [`Result`].
pub trait ResultExt<T> {
    fn context_with<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context_with<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}
