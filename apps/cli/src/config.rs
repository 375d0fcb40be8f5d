//! Project file
//!
//! A project names the catalog to read, where to write the generated modules, emitter options
//! and the converters to generate. YAML and JSON are both accepted, chosen by file extension.
//!
//! ```yaml
//! catalog: catalog.json
//! output: src/generated
//! emit:
//!   imports: ["crate::model::*"]
//! converters:
//!   - declaration: Converter
//!     name: ConverterImpl
//!     methods:
//!       Convert:
//!         - { source: ".", target: "Address" }
//!         - { source: "Street", target: "Address.StreetInfo.Name" }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use convgen_core::catalog::{Catalog, CatalogFile};
use convgen_core::{ConverterConfig, MappingDirective};
use convgen_emit::emitters::EmitterConfig;
use serde::{Deserialize, Serialize};

use crate::logging::LoggingConfig;

/// Parsed project file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub catalog: CatalogSource,
    /// Output directory, relative to the project file
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default)]
    pub emit: EmitterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub converters: Vec<ConverterEntry>,
    /// Directory of the project file; relative paths resolve against it
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn default_output() -> PathBuf {
    PathBuf::from("generated")
}

/// Where the catalog comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogSource {
    /// Path to a JSON catalog file
    Path(PathBuf),
    Inline(CatalogFile),
}

/// One converter to generate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterEntry {
    pub declaration: String,
    pub name: String,
    #[serde(default)]
    pub extend: Vec<String>,
    #[serde(default)]
    pub methods: BTreeMap<String, Vec<DirectiveEntry>>,
}

/// A directive with dotted paths; `.` is the empty path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveEntry {
    pub source: String,
    pub target: String,
}

impl Project {
    /// Load a project file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading project file {}", path.display()))?;
        let mut project = Self::parse(&contents, path)
            .with_context(|| format!("parsing project file {}", path.display()))?;
        project.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(project)
    }

    /// Parse project contents; `path` only selects the format.
    pub fn parse(contents: &str, path: &Path) -> Result<Self> {
        let project = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(contents)?,
            _ => serde_yaml::from_str(contents)?,
        };
        Ok(project)
    }

    /// Build the catalog, reading it from disk when it is given as a path.
    pub fn load_catalog(&self) -> Result<Catalog> {
        match &self.catalog {
            CatalogSource::Inline(file) => Ok(Catalog::from(file.clone())),
            CatalogSource::Path(path) => {
                let path = self.base_dir.join(path);
                let json = fs::read_to_string(&path)
                    .with_context(|| format!("reading catalog {}", path.display()))?;
                Catalog::from_json_str(&json)
                    .with_context(|| format!("parsing catalog {}", path.display()))
            }
        }
    }

    pub fn converter_configs(&self) -> Vec<ConverterConfig> {
        self.converters.iter().map(ConverterEntry::to_config).collect()
    }

    /// Output directory, resolved against the project file's directory
    pub fn output_dir(&self) -> PathBuf {
        self.base_dir.join(&self.output)
    }
}

impl ConverterEntry {
    fn to_config(&self) -> ConverterConfig {
        let mut config = ConverterConfig::new(&self.declaration, &self.name);
        for function in &self.extend {
            config = config.extend(function);
        }
        for (method, directives) in &self.methods {
            for directive in directives {
                config = config.map(
                    method,
                    MappingDirective::from_dotted(&directive.source, &directive.target),
                );
            }
        }
        config
    }
}
