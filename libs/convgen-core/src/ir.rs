//! Intermediate Representation (IR)
//!
//! Language-agnostic statement form produced by synthesis and consumed by emitters.
//! Expressions that read source data are place expressions: `Var`, `Field` and `Deref`
//! chains rooted at the method parameter or at a loop/branch binding. Bindings and the
//! method parameter are references; `Deref` reads the value behind them.

use crate::shape::{BasicKind, Shape, Signature};

/// An expression producing a value
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A local, binding or parameter
    Var(String),
    /// Field read on a place
    Field(Box<Expr>, String),
    /// The value behind a reference binding
    Deref(Box<Expr>),
    /// Passthrough of a basic value
    Scalar(Box<Expr>, BasicKind),
    /// Allocate a new pointee holding the value
    Pointer(Box<Expr>),
    /// Call another conversion function with a place as argument
    Call { callee: Callee, arg: Box<Expr> },
    /// Struct construction; fields appear in declared order
    Struct {
        name: String,
        fields: Vec<(String, Expr)>,
    },
    /// Fixed-length array built from a list local
    Array { list: String, len: usize },
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn field(self, name: impl Into<String>) -> Self {
        Expr::Field(Box::new(self), name.into())
    }

    pub fn deref(self) -> Self {
        Expr::Deref(Box::new(self))
    }

    pub fn scalar(self, kind: BasicKind) -> Self {
        Expr::Scalar(Box::new(self), kind)
    }

    pub fn pointer(self) -> Self {
        Expr::Pointer(Box::new(self))
    }

    pub fn call(callee: Callee, arg: Expr) -> Self {
        Expr::Call {
            callee,
            arg: Box::new(arg),
        }
    }
}

/// Target of a call expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callee {
    /// A function of the converter being generated
    Method(String),
    /// A user-supplied function
    Extend(String),
}

impl Callee {
    pub fn name(&self) -> &str {
        match self {
            Callee::Method(name) | Callee::Extend(name) => name,
        }
    }
}

/// Initial value of a declared local
#[derive(Debug, Clone, PartialEq)]
pub enum Init {
    /// Immutable binding of a computed value
    Value(Expr),
    /// Nil pointer, assigned later
    Nil,
    /// Empty growable list, sized after the given source place
    EmptyList(Expr),
    /// Empty map, sized after the given source place
    EmptyMap(Expr),
}

/// A statement of a generated function body
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Declare {
        name: String,
        shape: Shape,
        init: Init,
    },
    /// Run `body` with `binding` referring to the pointee when `input` is not nil
    IfPresent {
        input: Expr,
        binding: String,
        body: Vec<Stmt>,
    },
    ForEach {
        input: Expr,
        item: String,
        body: Vec<Stmt>,
    },
    ForEachEntry {
        input: Expr,
        key: String,
        value: String,
        body: Vec<Stmt>,
    },
    Assign {
        target: String,
        value: Expr,
    },
    Push {
        list: String,
        value: Expr,
    },
    Insert {
        map: String,
        key: Expr,
        value: Expr,
    },
}

/// Statements computing a value, plus the value
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub value: Expr,
}

impl Block {
    /// A block that is a single expression
    pub fn expr(value: Expr) -> Self {
        Self {
            stmts: Vec::new(),
            value,
        }
    }

    pub fn new(stmts: Vec<Stmt>, value: Expr) -> Self {
        Self { stmts, value }
    }
}

/// Where a generated function came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Declared on the converter
    Declared,
    /// Promoted from a nested struct conversion
    Generated,
}

/// A complete conversion function
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub signature: Signature,
    pub origin: Origin,
    /// Name of the parameter, a reference to the source value
    pub param: String,
    pub body: Vec<Stmt>,
    pub ret: Expr,
}

/// Everything generated for one converter declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterOutput {
    /// Declaration the converter implements
    pub declaration: String,
    /// Name of the generated marker type
    pub name: String,
    /// Functions in registration order
    pub functions: Vec<Method>,
}

impl ConverterOutput {
    pub fn function(&self, name: &str) -> Option<&Method> {
        self.functions.iter().find(|m| m.name == name)
    }
}

/// Output of a successful generation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedFile {
    pub converters: Vec<ConverterOutput>,
}

/// Visit every statement in `stmts`, nested ones included, in order.
pub fn walk_stmts<'a>(stmts: &'a [Stmt], visit: &mut dyn FnMut(&'a Stmt)) {
    for stmt in stmts {
        visit(stmt);
        match stmt {
            Stmt::IfPresent { body, .. }
            | Stmt::ForEach { body, .. }
            | Stmt::ForEachEntry { body, .. } => walk_stmts(body, visit),
            _ => {}
        }
    }
}
