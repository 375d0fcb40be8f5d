//! Type catalog
//!
//! The catalog is the boundary to whatever front end knows the host program's declarations.
//! Generation only needs three lookups, captured by [`TypeCatalog`]. [`Catalog`] is an
//! in-memory implementation that can be built programmatically or loaded from JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::shape::{NamedShape, Shape, Signature};

/// Read-only view of the declarations visible to the generator
pub trait TypeCatalog {
    /// A converter declaration by name
    fn lookup(&self, name: &str) -> Option<&Declaration>;

    /// A struct declaration by name
    fn named(&self, name: &str) -> Option<&NamedShape>;

    /// A free function by name, used for extend methods
    fn function(&self, name: &str) -> Option<&FunctionDecl>;
}

/// A function signature as declared, before arity validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Shape>,
    #[serde(default)]
    pub results: Vec<Shape>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, params: Vec<Shape>, results: Vec<Shape>) -> Self {
        Self {
            name: name.into(),
            params,
            results,
        }
    }

    /// Shorthand for the common one-in, one-out form.
    pub fn unary(name: impl Into<String>, source: Shape, target: Shape) -> Self {
        Self::new(name, vec![source], vec![target])
    }

    /// The conversion signature, if this function takes exactly one parameter and returns
    /// exactly one result.
    pub fn signature(&self) -> Result<Signature> {
        match (self.params.as_slice(), self.results.as_slice()) {
            ([source], [target]) => Ok(Signature::new(source.clone(), target.clone())),
            _ => Err(Error::InvalidSignature {
                name: self.name.clone(),
                params: self.params.len(),
                results: self.results.len(),
            }),
        }
    }
}

/// A converter declaration: the set of conversion methods the host program asks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<FunctionDecl>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, methods: Vec<FunctionDecl>) -> Self {
        Self {
            name: name.into(),
            methods,
        }
    }

    pub fn method(&self, name: &str) -> Option<&FunctionDecl> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// Serialized form of a catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub types: Vec<NamedShape>,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
}

/// In-memory catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    types: HashMap<String, NamedShape>,
    declarations: HashMap<String, Declaration>,
    functions: HashMap<String, FunctionDecl>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from its JSON form
    pub fn from_json_str(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::from(file))
    }

    /// Add a struct declaration. A later declaration replaces an earlier one of the same name.
    pub fn add_type(&mut self, shape: NamedShape) -> &mut Self {
        self.types.insert(shape.name.clone(), shape);
        self
    }

    pub fn add_declaration(&mut self, declaration: Declaration) -> &mut Self {
        self.declarations
            .insert(declaration.name.clone(), declaration);
        self
    }

    pub fn add_function(&mut self, function: FunctionDecl) -> &mut Self {
        self.functions.insert(function.name.clone(), function);
        self
    }
}

impl From<CatalogFile> for Catalog {
    fn from(file: CatalogFile) -> Self {
        let mut catalog = Catalog::new();
        for shape in file.types {
            catalog.add_type(shape);
        }
        for declaration in file.declarations {
            catalog.add_declaration(declaration);
        }
        for function in file.functions {
            catalog.add_function(function);
        }
        catalog
    }
}

impl TypeCatalog for Catalog {
    fn lookup(&self, name: &str) -> Option<&Declaration> {
        self.declarations.get(name)
    }

    fn named(&self, name: &str) -> Option<&NamedShape> {
        self.types.get(name)
    }

    fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.get(name)
    }
}

/// Look up a struct declaration or fail with [`Error::NotFound`].
pub fn require_named<'c>(catalog: &'c dyn TypeCatalog, name: &str) -> Result<&'c NamedShape> {
    catalog
        .named(name)
        .ok_or_else(|| Error::NotFound(format!("type {}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::BasicKind;

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "types": [
                {"name": "Person", "fields": [{"name": "Name", "shape": {"basic": "string"}}]}
            ],
            "declarations": [
                {"name": "Converter", "methods": [
                    {"name": "Convert", "params": [{"named": "Person"}], "results": [{"named": "Person"}]}
                ]}
            ],
            "functions": [
                {"name": "conv::itoa", "params": [{"basic": "int"}], "results": [{"basic": "string"}]}
            ]
        }"#;
        let catalog = Catalog::from_json_str(json).unwrap();

        let person = catalog.named("Person").unwrap();
        assert_eq!(person.fields[0].shape, Shape::basic(BasicKind::String));

        let decl = catalog.lookup("Converter").unwrap();
        assert!(decl.method("Convert").is_some());

        let itoa = catalog.function("conv::itoa").unwrap();
        assert_eq!(
            itoa.signature().unwrap(),
            Signature::new(Shape::basic(BasicKind::Int), Shape::basic(BasicKind::String))
        );
    }

    #[test]
    fn test_signature_arity() {
        let decl = FunctionDecl::new(
            "Convert",
            vec![Shape::named("A"), Shape::named("B")],
            vec![Shape::named("C")],
        );
        assert_eq!(
            decl.signature().unwrap_err(),
            Error::InvalidSignature {
                name: "Convert".into(),
                params: 2,
                results: 1,
            }
        );

        let decl = FunctionDecl::new("Convert", vec![Shape::named("A")], vec![]);
        assert!(matches!(
            decl.signature(),
            Err(Error::InvalidSignature { results: 0, .. })
        ));
    }

    #[test]
    fn test_require_named_missing() {
        let catalog = Catalog::new();
        assert_eq!(
            require_named(&catalog, "Ghost").unwrap_err(),
            Error::NotFound("type Ghost".into())
        );
    }
}
