//! Signature registry
//!
//! Tracks, for one converter, which (source, target) pairs already have a function: a
//! user-supplied extend function, a declared converter method, or a nested conversion that
//! was promoted to its own function. Entries are forward-declared before their body exists,
//! so a struct that reaches its own shape again (directly or through a partner type) calls
//! the unfinished function instead of expanding forever.

use heck::ToSnakeCase;
use std::collections::HashMap;

use crate::error::{Error, FieldPath, Result};
use crate::ir::{Callee, Expr, Method, Origin, Stmt};
use crate::namer::Namer;
use crate::shape::{Shape, Signature};

/// Index of a function entry in the registry
pub type MethodId = usize;

/// A user-supplied conversion function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendMethod {
    pub name: String,
    pub signature: Signature,
}

#[derive(Debug)]
struct Entry {
    name: String,
    signature: Signature,
    origin: Origin,
    /// Target path at which the function was first needed; root for declared methods
    origin_path: FieldPath,
    body: Option<Body>,
}

#[derive(Debug)]
struct Body {
    param: String,
    stmts: Vec<Stmt>,
    ret: Expr,
}

/// Registry of conversion functions for one converter
#[derive(Debug, Default)]
pub struct SignatureRegistry {
    extend: HashMap<Signature, ExtendMethod>,
    index: HashMap<Signature, MethodId>,
    entries: Vec<Entry>,
    names: Namer,
}

impl SignatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user-supplied function. Must happen before synthesis starts.
    pub fn register_extend(&mut self, name: &str, signature: Signature) -> Result<()> {
        if let Some(existing) = self.extend.get(&signature) {
            return Err(Error::DuplicateSignature {
                from: signature.source.clone(),
                to: signature.target.clone(),
                reason: format!(
                    "extend functions {} and {} convert the same types",
                    existing.name, name
                ),
            });
        }
        self.extend.insert(
            signature.clone(),
            ExtendMethod {
                name: name.to_string(),
                signature,
            },
        );
        Ok(())
    }

    pub fn lookup_extend(&self, signature: &Signature) -> Option<&ExtendMethod> {
        self.extend.get(signature)
    }

    /// Register a method declared on the converter.
    pub fn declare(&mut self, name: &str, signature: Signature) -> Result<MethodId> {
        if let Some(&id) = self.index.get(&signature) {
            return Err(Error::DuplicateSignature {
                from: signature.source.clone(),
                to: signature.target.clone(),
                reason: format!(
                    "methods {} and {} convert the same types",
                    self.entries[id].name, name
                ),
            });
        }
        self.names.register(name);
        self.names.register(&name.to_snake_case());
        Ok(self.insert(name.to_string(), signature, Origin::Declared, FieldPath::root()))
    }

    pub fn lookup(&self, signature: &Signature) -> Option<MethodId> {
        self.index.get(signature).copied()
    }

    /// The function to call for `signature`.
    ///
    /// Extend functions win over registered ones. Unknown pairs get a pending entry with a
    /// fresh name; its body is built later from [`next_pending`](Self::next_pending), rooted
    /// at `path` so its errors name the fields leading to it.
    pub fn resolve(&mut self, signature: &Signature, path: &FieldPath) -> Callee {
        if let Some(extend) = self.extend.get(signature) {
            return Callee::Extend(extend.name.clone());
        }
        if let Some(&id) = self.index.get(signature) {
            return Callee::Method(self.entries[id].name.clone());
        }

        let base = format!(
            "{}_to_{}",
            shape_slug(&signature.source),
            shape_slug(&signature.target)
        );
        let name = self.names.name(&base);
        tracing::debug!(function = %name, signature = %signature, path = %path, "forward-declared conversion function");
        self.insert(name.clone(), signature.clone(), Origin::Generated, path.clone());
        Callee::Method(name)
    }

    /// The oldest entry still waiting for its body.
    pub fn next_pending(&self) -> Option<MethodId> {
        self.entries.iter().position(|e| e.body.is_none())
    }

    pub fn name(&self, id: MethodId) -> &str {
        &self.entries[id].name
    }

    pub fn signature(&self, id: MethodId) -> &Signature {
        &self.entries[id].signature
    }

    pub fn origin(&self, id: MethodId) -> Origin {
        self.entries[id].origin
    }

    pub fn origin_path(&self, id: MethodId) -> &FieldPath {
        &self.entries[id].origin_path
    }

    /// Fill in the body of a forward-declared entry.
    pub fn complete(&mut self, id: MethodId, param: String, stmts: Vec<Stmt>, ret: Expr) -> Result<()> {
        let entry = &mut self.entries[id];
        if entry.body.is_some() {
            return Err(Error::DuplicateSignature {
                from: entry.signature.source.clone(),
                to: entry.signature.target.clone(),
                reason: format!("function {} was already generated", entry.name),
            });
        }
        entry.body = Some(Body { param, stmts, ret });
        Ok(())
    }

    /// Number of registered (non-extend) functions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All completed functions in registration order.
    pub fn into_methods(self) -> Vec<Method> {
        self.entries
            .into_iter()
            .filter_map(|entry| {
                let body = entry.body?;
                Some(Method {
                    name: entry.name,
                    signature: entry.signature,
                    origin: entry.origin,
                    param: body.param,
                    body: body.stmts,
                    ret: body.ret,
                })
            })
            .collect()
    }

    fn insert(
        &mut self,
        name: String,
        signature: Signature,
        origin: Origin,
        origin_path: FieldPath,
    ) -> MethodId {
        let id = self.entries.len();
        self.index.insert(signature.clone(), id);
        self.entries.push(Entry {
            name,
            signature,
            origin,
            origin_path,
            body: None,
        });
        id
    }
}

fn shape_slug(shape: &Shape) -> String {
    match shape {
        Shape::Named(name) => name.to_snake_case(),
        Shape::Basic(kind) => kind.as_str().to_string(),
        Shape::Pointer(elem) => format!("{}_ptr", shape_slug(elem)),
        Shape::List { elem, .. } => format!("{}_list", shape_slug(elem)),
        Shape::Map { key, value } => format!("{}_{}_map", shape_slug(key), shape_slug(value)),
    }
}
