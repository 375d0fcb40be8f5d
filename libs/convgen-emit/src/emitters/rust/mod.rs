//! Rust emitter for synthesized converters
//!
//! Each converter becomes a unit struct with one method per conversion function. Methods take
//! the source by reference and return an owned target. Extend functions are called as free
//! functions with the same calling convention: `fn(&Source) -> Target`.

mod body;
mod types;

pub use types::{rust_type, sanitize_field_name};

use std::collections::HashMap;

use convgen_core::ir::{walk_stmts, ConverterOutput, Origin, Stmt};
use convgen_core::GeneratedFile;
use heck::ToSnakeCase;

use crate::emitters::{Emitter, EmitterConfig};
use crate::error::{Error, Result};

/// Output of the Rust emitter
#[derive(Debug)]
pub struct RustOutput {
    /// Generated modules indexed by file name
    pub modules: HashMap<String, String>,
}

/// Rust source emitter
pub struct RustEmitter {
    config: EmitterConfig,
}

impl RustEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn new_default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

impl Emitter for RustEmitter {
    type Output = RustOutput;

    fn emit(&self, file: &GeneratedFile) -> Result<Self::Output> {
        let mut modules = HashMap::new();

        // One file per converter
        for converter in &file.converters {
            let file_name = self.get_module_name(&converter.name);
            if modules.contains_key(&file_name) {
                return Err(Error::Render(format!(
                    "converter {}: module {} is already generated",
                    converter.name, file_name
                )));
            }
            let code = self.generate_converter_module(converter)?;
            tracing::info!(
                converter = %converter.name,
                module = %file_name,
                functions = converter.functions.len(),
                "emitted converter module"
            );
            modules.insert(file_name, code);
        }

        // mod.rs that exports all converters
        modules.insert("mod.rs".to_string(), self.generate_mod_rs(file));

        Ok(RustOutput { modules })
    }
}

impl RustEmitter {
    /// Convert a converter name to a module file name (snake_case)
    fn get_module_name(&self, name: &str) -> String {
        format!("{}.rs", name.to_snake_case())
    }

    fn generate_converter_module(&self, converter: &ConverterOutput) -> Result<String> {
        if !types::is_identifier(&converter.name) {
            return Err(Error::Render(format!(
                "converter name {} is not a Rust identifier",
                converter.name
            )));
        }

        let mut code = String::new();
        self.push_header(&mut code);

        if self.config.generate_docs {
            code.push_str(&format!(
                "//! `{}` conversions for `{}`\n\n",
                converter.name, converter.declaration
            ));
        }

        code.push_str(&self.generate_imports(converter));

        if self.config.generate_docs {
            code.push_str(&format!(
                "/// Implements the `{}` conversions.\n",
                converter.declaration
            ));
        }
        code.push_str("#[derive(Debug, Clone, Copy, Default)]\n");
        code.push_str(&format!("pub struct {};\n\n", converter.name));

        code.push_str(&format!("impl {} {{\n", converter.name));
        for (i, method) in converter.functions.iter().enumerate() {
            if i > 0 {
                code.push('\n');
            }

            let source = rust_type(&method.signature.source);
            let target = rust_type(&method.signature.target);
            let visibility = match method.origin {
                Origin::Declared => {
                    if self.config.generate_docs {
                        code.push_str(&format!(
                            "    /// Converts `{}` into `{}`.\n",
                            source, target
                        ));
                    }
                    "pub "
                }
                Origin::Generated => "",
            };

            code.push_str(&format!(
                "    {}fn {}(&self, {}: &{}) -> {} {{\n",
                visibility,
                body::method_name(&method.name),
                body::local(&method.param),
                source,
                target
            ));
            let rendered = body::render_body(method, 2).map_err(|e| match e {
                Error::Render(reason) => {
                    Error::Render(format!("{}::{}: {}", converter.name, method.name, reason))
                }
                other => other,
            })?;
            code.push_str(&rendered);
            code.push_str("    }\n");
        }
        code.push_str("}\n");

        Ok(code)
    }

    fn push_header(&self, code: &mut String) {
        if let Some(header) = &self.config.header {
            code.push_str(header);
            if !header.ends_with('\n') {
                code.push('\n');
            }
            code.push('\n');
        }
    }

    /// `use` lines: `HashMap` when any map is involved, then the configured imports
    fn generate_imports(&self, converter: &ConverterOutput) -> String {
        let mut code = String::new();

        let mut needs_map = false;
        for method in &converter.functions {
            needs_map |= types::uses_map(&method.signature.source)
                || types::uses_map(&method.signature.target);
            walk_stmts(&method.body, &mut |stmt| {
                if let Stmt::Declare { shape, .. } = stmt {
                    needs_map |= types::uses_map(shape);
                }
            });
        }
        if needs_map {
            code.push_str("use std::collections::HashMap;\n");
        }

        for import in &self.config.imports {
            code.push_str(&format!("use {};\n", import.trim_end_matches(';')));
        }

        if !code.is_empty() {
            code.push('\n');
        }
        code
    }

    fn generate_mod_rs(&self, file: &GeneratedFile) -> String {
        let mut code = String::new();
        self.push_header(&mut code);

        if self.config.generate_docs {
            code.push_str("//! Generated converters\n\n");
        }

        let mut converters: Vec<_> = file.converters.iter().collect();
        converters.sort_by(|a, b| a.name.cmp(&b.name));

        for converter in &converters {
            code.push_str(&format!("pub mod {};\n", converter.name.to_snake_case()));
        }

        if !converters.is_empty() {
            code.push('\n');
        }
        for converter in &converters {
            code.push_str(&format!(
                "pub use {}::{};\n",
                converter.name.to_snake_case(),
                converter.name
            ));
        }

        code
    }
}
