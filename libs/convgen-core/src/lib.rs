//! Conversion Code Synthesizer
//!
//! Derives field-by-field conversion functions between structurally similar types, at
//! generation time, from shape descriptions alone.
//!
//! ## Architecture
//!
//! 1. **Catalog**: the declarations of the host program ([`catalog::TypeCatalog`])
//! 2. **Synthesis**: a rule chain ([`rules`]) driven recursively by the block synthesizer
//!    ([`synth`]), with a signature registry ([`registry`]) that forward-declares functions so
//!    recursive type graphs terminate, and per-method field directives ([`directive`])
//! 3. **IR**: the resulting functions as language-agnostic statements ([`ir`]), handed to an
//!    emitter
//!
//! ```
//! use convgen_core::catalog::{Catalog, Declaration, FunctionDecl};
//! use convgen_core::generator::{generate, ConverterConfig};
//! use convgen_core::shape::{BasicKind, Field, NamedShape, Shape};
//!
//! let mut catalog = Catalog::new();
//! catalog
//!     .add_type(NamedShape::new("In", vec![Field::new("Id", Shape::basic(BasicKind::Int))]))
//!     .add_type(NamedShape::new("Out", vec![Field::new("Id", Shape::basic(BasicKind::Int))]))
//!     .add_declaration(Declaration::new(
//!         "Converter",
//!         vec![FunctionDecl::unary("Convert", Shape::named("In"), Shape::named("Out"))],
//!     ));
//!
//! let file = generate(&catalog, &[ConverterConfig::new("Converter", "ConverterImpl")]).unwrap();
//! assert_eq!(file.converters[0].functions.len(), 1);
//! ```

pub mod catalog;
pub mod directive;
pub mod error;
pub mod generator;
pub mod ir;
pub mod namer;
pub mod registry;
pub mod rules;
pub mod shape;
pub mod synth;

pub use catalog::{Catalog, TypeCatalog};
pub use directive::MappingDirective;
pub use error::{Error, FieldPath, Result};
pub use generator::{generate, ConverterConfig, Generator};
pub use ir::GeneratedFile;
pub use shape::{BasicKind, Field, NamedShape, Shape, Signature};
