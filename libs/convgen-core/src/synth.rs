//! Block synthesizer
//!
//! Drives the rule chain over one (source, target) pair at a time. Each call to
//! [`Synthesizer::build`] runs exactly one rule; rules recurse through it for their children
//! and compose the returned [`Block`]s. All state of one function body lives here, so nothing
//! leaks between functions or runs.

use crate::catalog::TypeCatalog;
use crate::directive::DirectiveTable;
use crate::error::{Error, FieldPath, Result};
use crate::ir::{Block, Callee, Expr, Stmt};
use crate::namer::Namer;
use crate::registry::SignatureRegistry;
use crate::rules::Rule;
use crate::shape::{Shape, Signature};

/// One recursive step: convert `input` of shape `source` into `target`.
#[derive(Debug, Clone)]
pub struct Step {
    pub input: Expr,
    pub source: Shape,
    pub target: Shape,
    /// Target field path from the declared method the body was first needed by
    pub path: FieldPath,
    /// Number of rule applications above this one
    pub depth: usize,
}

impl Step {
    pub fn signature(&self) -> Signature {
        Signature::new(self.source.clone(), self.target.clone())
    }

    /// A child step one level deeper.
    pub fn descend(&self, input: Expr, source: Shape, target: Shape, path: FieldPath) -> Step {
        Step {
            input,
            source,
            target,
            path,
            depth: self.depth + 1,
        }
    }
}

/// Synthesis context for one function body
pub struct Synthesizer<'a> {
    catalog: &'a dyn TypeCatalog,
    registry: &'a mut SignatureRegistry,
    rules: &'a [Box<dyn Rule>],
    directives: &'a DirectiveTable,
    vars: Namer,
    param: String,
    signature: Signature,
    root_path: FieldPath,
}

impl<'a> Synthesizer<'a> {
    pub fn new(
        catalog: &'a dyn TypeCatalog,
        registry: &'a mut SignatureRegistry,
        rules: &'a [Box<dyn Rule>],
        directives: &'a DirectiveTable,
        param: &str,
        signature: Signature,
    ) -> Self {
        let mut vars = Namer::new();
        vars.register(param);
        Self {
            catalog,
            registry,
            rules,
            directives,
            vars,
            param: param.to_string(),
            signature,
            root_path: FieldPath::root(),
        }
    }

    /// Report paths in this body below `path` instead of the root.
    pub fn at_path(mut self, path: FieldPath) -> Self {
        self.root_path = path;
        self
    }

    /// Synthesize the whole function body.
    ///
    /// A directive on the empty target path rebases the root onto its source path before
    /// the chain runs.
    pub fn build_method(mut self) -> Result<(Vec<Stmt>, Expr)> {
        let directives = self.directives;
        let (input, source) = match directives.get(&FieldPath::root()) {
            Some(source_path) => self.resolve_source(source_path)?,
            None => (
                Expr::var(self.param.as_str()).deref(),
                self.signature.source.clone(),
            ),
        };

        let block = self.build(Step {
            input,
            source,
            target: self.signature.target.clone(),
            path: self.root_path.clone(),
            depth: 0,
        })?;
        Ok((block.stmts, block.value))
    }

    /// Run the first matching rule for `step`.
    pub fn build(&mut self, step: Step) -> Result<Block> {
        let rules = self.rules;
        for rule in rules {
            if rule.matches(self, &step) {
                tracing::trace!(rule = rule.name(), path = %step.path, signature = %step.signature(), "rule matched");
                return rule.build(self, step);
            }
        }
        Err(Error::UnsupportedConversion {
            from: step.source,
            to: step.target,
            path: step.path,
        })
    }

    pub fn catalog(&self) -> &'a dyn TypeCatalog {
        self.catalog
    }

    pub fn directives(&self) -> &'a DirectiveTable {
        self.directives
    }

    /// A fresh local name for this function body
    pub fn fresh(&mut self, base: &str) -> String {
        self.vars.name(base)
    }

    /// Whether `step` may be handed to a separate function instead of being expanded inline.
    ///
    /// The method root is always expanded, and so is any subtree a directive of the current
    /// method reaches into, since directives only apply inside the method they belong to.
    pub fn may_delegate(&self, step: &Step) -> bool {
        step.depth > 0 && !self.directives.touches(&step.path)
    }

    /// A function that already converts exactly this pair, if one may be called here.
    pub fn existing_function(&self, step: &Step) -> Option<Callee> {
        let signature = step.signature();
        if let Some(extend) = self.registry.lookup_extend(&signature) {
            return Some(Callee::Extend(extend.name.clone()));
        }
        if !self.may_delegate(step) {
            return None;
        }
        self.registry
            .lookup(&signature)
            .map(|id| Callee::Method(self.registry.name(id).to_string()))
    }

    /// Forward-declare (or reuse) a separate function for this pair.
    pub fn delegate(&mut self, step: &Step) -> Callee {
        self.registry.resolve(&step.signature(), &step.path)
    }

    /// Place expression and shape for a source path taken from the method's parameter.
    pub fn resolve_source(&self, path: &FieldPath) -> Result<(Expr, Shape)> {
        let mut expr = Expr::var(self.param.as_str()).deref();
        let mut shape = self.signature.source.clone();
        for segment in path.segments() {
            let named = shape
                .as_named()
                .and_then(|name| self.catalog.named(name))
                .ok_or_else(|| Error::InvalidDirective {
                    directive: path.to_string(),
                    reason: format!("cannot read {} from {}", segment, shape),
                })?;
            let field = named.field(segment).ok_or_else(|| Error::InvalidDirective {
                directive: path.to_string(),
                reason: format!("source {} has no field {}", named.name, segment),
            })?;
            expr = expr.field(field.name.as_str());
            shape = field.shape.clone();
        }
        Ok((expr, shape))
    }
}
