//! Generation orchestration
//!
//! For each converter: resolve its declaration, register extend functions, forward-declare
//! every declared method, synthesize the declared bodies with their directives, then drain
//! the functions promoted along the way until none are pending. The first error aborts the
//! whole run and nothing is returned.

use std::collections::BTreeMap;

use crate::catalog::TypeCatalog;
use crate::directive::{DirectiveTable, MappingDirective};
use crate::error::{Error, Result, ResultExt};
use crate::ir::{ConverterOutput, GeneratedFile};
use crate::registry::{MethodId, SignatureRegistry};
use crate::rules::{default_rules, Rule};
use crate::synth::Synthesizer;

/// Name of the parameter every generated function takes
pub const DEFAULT_PARAM: &str = "source";

/// What to generate for one converter declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConverterConfig {
    /// Declaration to implement, looked up in the catalog
    pub declaration: String,
    /// Name of the generated marker type
    pub name: String,
    /// Catalog functions used for their exact signature instead of generated code
    pub extend: Vec<String>,
    /// Directives per declared method
    pub methods: BTreeMap<String, Vec<MappingDirective>>,
}

impl ConverterConfig {
    pub fn new(declaration: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            declaration: declaration.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn extend(mut self, function: impl Into<String>) -> Self {
        self.extend.push(function.into());
        self
    }

    pub fn map(mut self, method: impl Into<String>, directive: MappingDirective) -> Self {
        self.methods
            .entry(method.into())
            .or_default()
            .push(directive);
        self
    }
}

/// Conversion code generator over a catalog
pub struct Generator<'c> {
    catalog: &'c dyn TypeCatalog,
    rules: Vec<Box<dyn Rule>>,
    param: String,
}

impl<'c> Generator<'c> {
    pub fn new(catalog: &'c dyn TypeCatalog) -> Self {
        Self {
            catalog,
            rules: default_rules(),
            param: DEFAULT_PARAM.to_string(),
        }
    }

    /// Replace the rule chain
    pub fn with_rules(mut self, rules: Vec<Box<dyn Rule>>) -> Self {
        self.rules = rules;
        self
    }

    /// Use a different parameter name in generated functions
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    /// Generate all converters, or nothing.
    pub fn generate(&self, converters: &[ConverterConfig]) -> Result<GeneratedFile> {
        let mut file = GeneratedFile::default();
        for config in converters {
            let output = self
                .generate_converter(config)
                .context_with(|| format!("converter {}", config.name))?;
            file.converters.push(output);
        }
        Ok(file)
    }

    /// Generate a single converter.
    pub fn generate_converter(&self, config: &ConverterConfig) -> Result<ConverterOutput> {
        let declaration = self.catalog.lookup(&config.declaration).ok_or_else(|| {
            Error::NotFound(format!("converter declaration {}", config.declaration))
        })?;

        let mut registry = SignatureRegistry::new();
        for name in &config.extend {
            let function = self
                .catalog
                .function(name)
                .ok_or_else(|| Error::NotFound(format!("extend function {}", name)))?;
            let signature = function.signature()?;
            registry.register_extend(name, signature)?;
        }

        if let Some(unknown) = config
            .methods
            .keys()
            .find(|name| declaration.method(name).is_none())
        {
            return Err(Error::NotFound(format!(
                "method {} on {}",
                unknown, declaration.name
            )));
        }

        let mut declared: Vec<(MethodId, &[MappingDirective])> = Vec::new();
        for method in &declaration.methods {
            let signature = method.signature()?;
            let id = registry.declare(&method.name, signature)?;
            let directives = config
                .methods
                .get(&method.name)
                .map(Vec::as_slice)
                .unwrap_or_default();
            declared.push((id, directives));
        }

        for (id, directives) in declared {
            let name = registry.name(id).to_string();
            let signature = registry.signature(id).clone();
            let table =
                DirectiveTable::build(directives, &signature.source, &signature.target, self.catalog)
                    .context_with(|| format!("method {}", name))?;
            tracing::debug!(method = %name, signature = %signature, directives = table.len(), "synthesizing declared method");
            self.build_function(&mut registry, id, &table)
                .context_with(|| format!("method {}", name))?;
        }

        let empty = DirectiveTable::empty();
        while let Some(id) = registry.next_pending() {
            let name = registry.name(id).to_string();
            tracing::debug!(function = %name, signature = %registry.signature(id), path = %registry.origin_path(id), "synthesizing promoted function");
            self.build_function(&mut registry, id, &empty)
                .context_with(|| format!("function {}", name))?;
        }

        tracing::info!(
            converter = %config.name,
            declaration = %declaration.name,
            functions = registry.len(),
            "converter generated"
        );

        Ok(ConverterOutput {
            declaration: declaration.name.clone(),
            name: config.name.clone(),
            functions: registry.into_methods(),
        })
    }

    fn build_function(
        &self,
        registry: &mut SignatureRegistry,
        id: MethodId,
        directives: &DirectiveTable,
    ) -> Result<()> {
        let signature = registry.signature(id).clone();
        let root_path = registry.origin_path(id).clone();
        let (stmts, ret) = Synthesizer::new(
            self.catalog,
            registry,
            &self.rules,
            directives,
            &self.param,
            signature,
        )
        .at_path(root_path)
        .build_method()?;
        registry.complete(id, self.param.clone(), stmts, ret)
    }
}

/// Generate all converters with the default rule chain.
pub fn generate(
    catalog: &dyn TypeCatalog,
    converters: &[ConverterConfig],
) -> Result<GeneratedFile> {
    Generator::new(catalog).generate(converters)
}
