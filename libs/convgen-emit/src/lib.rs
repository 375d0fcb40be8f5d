//! Conversion Code Emitter
//!
//! Turns the functions synthesized by `convgen_core` into source files.
//!
//! ## Architecture
//!
//! The pipeline has three stages:
//! 1. **Catalog**: shapes and converter declarations of the host program
//! 2. **Synthesis**: `convgen_core` derives every conversion function as language-agnostic IR
//! 3. **Emitters**: language-specific rendering of that IR
//!
//! Synthesis either succeeds for every converter or produces nothing, so an emitter never sees
//! a partial result.

pub mod emitters;
pub mod error;
pub mod utils;

use std::path::Path;

use convgen_core::{ConverterConfig, GeneratedFile, Generator, TypeCatalog};
use emitters::rust::RustEmitter;
use emitters::{Emitter, EmitterConfig};

pub use error::{Error, Result};

/// Synthesized converters, ready to be rendered by any [`Emitter`]
pub struct CodeGenerator {
    file: GeneratedFile,
}

impl CodeGenerator {
    /// Synthesize all converters from a catalog
    pub fn from_catalog(catalog: &dyn TypeCatalog, converters: &[ConverterConfig]) -> Result<Self> {
        Self::with_generator(&Generator::new(catalog), converters)
    }

    /// Synthesize with a configured generator (custom rule chain or parameter name)
    pub fn with_generator(generator: &Generator<'_>, converters: &[ConverterConfig]) -> Result<Self> {
        let file = generator.generate(converters)?;
        Ok(Self { file })
    }

    /// Get the synthesized functions
    pub fn file(&self) -> &GeneratedFile {
        &self.file
    }

    /// Render with a specific emitter
    pub fn emit<E: Emitter>(&self, emitter: E) -> Result<E::Output> {
        emitter.emit(&self.file)
    }
}

/// Synthesize `converters` and write one Rust module per converter plus `mod.rs` into
/// `output_dir`. The count of files written is returned.
pub fn generate_rust(
    catalog: &dyn TypeCatalog,
    converters: &[ConverterConfig],
    output_dir: &Path,
    config: EmitterConfig,
) -> Result<usize> {
    let codegen = CodeGenerator::from_catalog(catalog, converters)?;
    let output = codegen.emit(RustEmitter::new(config))?;

    utils::write_modules(output_dir, &output.modules)?;

    Ok(output.modules.len())
}
