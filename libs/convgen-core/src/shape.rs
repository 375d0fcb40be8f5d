//! Shape model
//!
//! Structural descriptors for the source and target side of a conversion. Named shapes are
//! referenced by name; their fields are resolved through the [`TypeCatalog`](crate::catalog::TypeCatalog),
//! which keeps self-referential type graphs finite.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive kinds. Conversions between different kinds are never implicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
    String,
}

impl BasicKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::String => "string",
        }
    }
}

impl fmt::Display for BasicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural descriptor of a type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// A struct declared in the catalog
    Named(String),
    /// A primitive value
    Basic(BasicKind),
    /// A nullable indirection
    Pointer(Box<Shape>),
    /// A sequence; `len` is set for fixed-length arrays
    List {
        elem: Box<Shape>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        len: Option<usize>,
    },
    /// A key/value mapping
    Map { key: Box<Shape>, value: Box<Shape> },
}

impl Shape {
    pub fn named(name: impl Into<String>) -> Self {
        Shape::Named(name.into())
    }

    pub fn basic(kind: BasicKind) -> Self {
        Shape::Basic(kind)
    }

    pub fn pointer(elem: Shape) -> Self {
        Shape::Pointer(Box::new(elem))
    }

    pub fn list(elem: Shape) -> Self {
        Shape::List {
            elem: Box::new(elem),
            len: None,
        }
    }

    pub fn array(elem: Shape, len: usize) -> Self {
        Shape::List {
            elem: Box::new(elem),
            len: Some(len),
        }
    }

    pub fn map(key: Shape, value: Shape) -> Self {
        Shape::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn is_basic(&self) -> bool {
        matches!(self, Shape::Basic(_))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Shape::Pointer(_))
    }

    pub fn as_named(&self) -> Option<&str> {
        match self {
            Shape::Named(name) => Some(name),
            _ => None,
        }
    }

    /// The pointee of a pointer shape.
    pub fn pointee(&self) -> Option<&Shape> {
        match self {
            Shape::Pointer(elem) => Some(elem),
            _ => None,
        }
    }

    /// The struct name behind this shape, looking through one pointer.
    pub fn struct_name(&self) -> Option<&str> {
        match self {
            Shape::Named(name) => Some(name),
            Shape::Pointer(elem) => elem.as_named(),
            _ => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Named(name) => f.write_str(name),
            Shape::Basic(kind) => write!(f, "{}", kind),
            Shape::Pointer(elem) => write!(f, "*{}", elem),
            Shape::List { elem, len: None } => write!(f, "[{}]", elem),
            Shape::List {
                elem,
                len: Some(len),
            } => write!(f, "[{}; {}]", elem, len),
            Shape::Map { key, value } => write!(f, "{{{}: {}}}", key, value),
        }
    }
}

/// A field of a named shape. Its position in [`NamedShape::fields`] is its declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub shape: Shape,
}

impl Field {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }
}

/// A struct declaration with its ordered fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedShape {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl NamedShape {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A (source, target) shape pair identifying one conversion function
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature {
    pub source: Shape,
    pub target: Shape,
}

impl Signature {
    pub fn new(source: Shape, target: Shape) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
