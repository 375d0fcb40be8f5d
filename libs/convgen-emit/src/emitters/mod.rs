//! Source emitters for different target languages
//!
//! Each language has its own module that implements the `Emitter` trait.

pub mod rust;

use crate::error::Result;
use convgen_core::GeneratedFile;
use serde::{Deserialize, Serialize};

/// Header written at the top of every generated module by default
pub const DEFAULT_HEADER: &str = "// Code generated by convgen. DO NOT EDIT.";

/// Trait that all language emitters must implement
pub trait Emitter {
    /// The output type of this emitter
    type Output;

    /// Render a generated file
    fn emit(&self, file: &GeneratedFile) -> Result<Self::Output>;
}

/// Configuration options for emission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Whether to generate documentation comments
    pub generate_docs: bool,
    /// First lines of every module; `None` omits the header
    pub header: Option<String>,
    /// Extra `use` paths each converter module needs, e.g. `crate::models::*`
    pub imports: Vec<String>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            generate_docs: true,
            header: Some(DEFAULT_HEADER.to_string()),
            imports: Vec::new(),
        }
    }
}
