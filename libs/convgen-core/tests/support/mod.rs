//! Shared helpers: shape builders and an interpreter for generated functions.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use convgen_core::catalog::{Catalog, Declaration, FunctionDecl};
use convgen_core::ir::{Callee, ConverterOutput, Expr, Init, Method, Stmt};
use convgen_core::shape::{BasicKind, Field, NamedShape, Shape};

pub fn string() -> Shape {
    Shape::basic(BasicKind::String)
}

pub fn int() -> Shape {
    Shape::basic(BasicKind::Int)
}

pub fn named(name: &str) -> Shape {
    Shape::named(name)
}

pub fn strukt(name: &str, fields: &[(&str, Shape)]) -> NamedShape {
    NamedShape::new(
        name,
        fields
            .iter()
            .map(|(n, s)| Field::new(*n, s.clone()))
            .collect(),
    )
}

/// Catalog with one declaration `Converter` holding the given methods.
pub fn catalog_with(types: Vec<NamedShape>, methods: Vec<FunctionDecl>) -> Catalog {
    let mut catalog = Catalog::new();
    for t in types {
        catalog.add_type(t);
    }
    catalog.add_declaration(Declaration::new("Converter", methods));
    catalog
}

pub fn method(name: &str, source: Shape, target: Shape) -> FunctionDecl {
    FunctionDecl::unary(name, source, target)
}

/// Runtime value of the generated program
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Str(String),
    Ptr(Box<Value>),
    Struct(String, Vec<(String, Value)>),
    List(Vec<Value>),
    /// Entries in insertion order; inserting an existing key replaces its value
    Map(Vec<(Value, Value)>),
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(s.to_string())
    }

    pub fn ptr(v: Value) -> Self {
        Value::Ptr(Box::new(v))
    }

    pub fn strukt(name: &str, fields: Vec<(&str, Value)>) -> Self {
        Value::Struct(
            name.to_string(),
            fields
                .into_iter()
                .map(|(n, v)| (n.to_string(), v))
                .collect(),
        )
    }

    pub fn field(&self, name: &str) -> &Value {
        match self {
            Value::Struct(_, fields) => fields
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v)
                .unwrap_or_else(|| panic!("no field {name} in {self:?}")),
            other => panic!("field {name} read on {other:?}"),
        }
    }
}

type ExtendFn = Box<dyn Fn(&Value) -> Value>;

/// Executes the IR of one converter
pub struct Interpreter<'a> {
    functions: HashMap<&'a str, &'a Method>,
    extend: HashMap<String, ExtendFn>,
    calls: RefCell<Vec<String>>,
}

impl<'a> Interpreter<'a> {
    pub fn new(converter: &'a ConverterOutput) -> Self {
        Self {
            functions: converter
                .functions
                .iter()
                .map(|m| (m.name.as_str(), m))
                .collect(),
            extend: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_extend(mut self, name: &str, f: impl Fn(&Value) -> Value + 'static) -> Self {
        self.extend.insert(name.to_string(), Box::new(f));
        self
    }

    /// Names of every function invoked so far, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call(&self, name: &str, arg: Value) -> Value {
        self.calls.borrow_mut().push(name.to_string());
        if let Some(f) = self.extend.get(name) {
            return f(&arg);
        }
        let method = self
            .functions
            .get(name)
            .unwrap_or_else(|| panic!("unknown function {name}"));
        let mut env = HashMap::new();
        env.insert(method.param.clone(), arg);
        self.exec(&method.body, &mut env);
        self.eval(&method.ret, &env)
    }

    fn exec(&self, stmts: &[Stmt], env: &mut HashMap<String, Value>) {
        for stmt in stmts {
            match stmt {
                Stmt::Declare { name, init, .. } => {
                    let value = match init {
                        Init::Value(expr) => self.eval(expr, env),
                        Init::Nil => Value::Nil,
                        Init::EmptyList(_) => Value::List(Vec::new()),
                        Init::EmptyMap(_) => Value::Map(Vec::new()),
                    };
                    env.insert(name.clone(), value);
                }
                Stmt::IfPresent {
                    input,
                    binding,
                    body,
                } => match self.eval(input, env) {
                    Value::Nil => {}
                    Value::Ptr(inner) => {
                        env.insert(binding.clone(), *inner);
                        self.exec(body, env);
                    }
                    other => panic!("nil check on {other:?}"),
                },
                Stmt::ForEach { input, item, body } => match self.eval(input, env) {
                    Value::List(items) => {
                        for v in items {
                            env.insert(item.clone(), v);
                            self.exec(body, env);
                        }
                    }
                    other => panic!("iteration over {other:?}"),
                },
                Stmt::ForEachEntry {
                    input,
                    key,
                    value,
                    body,
                } => match self.eval(input, env) {
                    Value::Map(entries) => {
                        for (k, v) in entries {
                            env.insert(key.clone(), k);
                            env.insert(value.clone(), v);
                            self.exec(body, env);
                        }
                    }
                    other => panic!("entry iteration over {other:?}"),
                },
                Stmt::Assign { target, value } => {
                    let v = self.eval(value, env);
                    env.insert(target.clone(), v);
                }
                Stmt::Push { list, value } => {
                    let v = self.eval(value, env);
                    match env.get_mut(list) {
                        Some(Value::List(items)) => items.push(v),
                        other => panic!("push onto {other:?}"),
                    }
                }
                Stmt::Insert { map, key, value } => {
                    let k = self.eval(key, env);
                    let v = self.eval(value, env);
                    match env.get_mut(map) {
                        Some(Value::Map(entries)) => {
                            match entries.iter_mut().find(|(existing, _)| *existing == k) {
                                Some(entry) => entry.1 = v,
                                None => entries.push((k, v)),
                            }
                        }
                        other => panic!("insert into {other:?}"),
                    }
                }
            }
        }
    }

    fn eval(&self, expr: &Expr, env: &HashMap<String, Value>) -> Value {
        match expr {
            Expr::Var(name) => env
                .get(name)
                .cloned()
                .unwrap_or_else(|| panic!("unbound {name}")),
            Expr::Field(base, name) => self.eval(base, env).field(name).clone(),
            Expr::Deref(inner) | Expr::Scalar(inner, _) => self.eval(inner, env),
            Expr::Pointer(inner) => Value::ptr(self.eval(inner, env)),
            Expr::Call { callee, arg } => {
                let arg = self.eval(arg, env);
                match callee {
                    Callee::Method(name) | Callee::Extend(name) => self.call(name, arg),
                }
            }
            Expr::Struct { name, fields } => Value::Struct(
                name.clone(),
                fields
                    .iter()
                    .map(|(n, e)| (n.clone(), self.eval(e, env)))
                    .collect(),
            ),
            Expr::Array { list, len } => match env.get(list) {
                Some(Value::List(items)) => {
                    assert_eq!(items.len(), *len, "array length");
                    Value::List(items.clone())
                }
                other => panic!("array from {other:?}"),
            },
        }
    }
}
