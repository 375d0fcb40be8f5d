//! Function bodies: statements and expressions
//!
//! Place expressions render as Rust places. The method parameter and every branch or loop
//! binding is a reference, so `Deref` of one of them is only spelled out where auto-deref does
//! not apply.

use convgen_core::ir::{Callee, Expr, Init, Method, Stmt};
use heck::ToSnakeCase;

use super::types::{escape_ident, is_copy, is_rust_path, rust_type, sanitize_field_name};
use crate::error::{Error, Result};

const INDENT: &str = "    ";

/// Rust name of a conversion function
pub fn method_name(name: &str) -> String {
    escape_ident(name.to_snake_case())
}

/// Rust name of a local, binding or parameter
pub fn local(name: &str) -> String {
    escape_ident(name.to_string())
}

/// Statements of `method` followed by its tail expression, indented to `depth`.
pub fn render_body(method: &Method, depth: usize) -> Result<String> {
    let mut code = String::new();
    render_stmts(&method.body, depth, &mut code)?;
    push_line(&mut code, depth, &render_value(&method.ret, depth)?);
    Ok(code)
}

fn render_stmts(stmts: &[Stmt], depth: usize, code: &mut String) -> Result<()> {
    for stmt in stmts {
        match stmt {
            Stmt::Declare { name, shape, init } => {
                let name = local(name);
                let line = match init {
                    Init::Value(expr) => format!("let {} = {};", name, render_value(expr, depth)?),
                    Init::Nil => format!("let mut {}: {} = None;", name, rust_type(shape)),
                    Init::EmptyList(input) => format!(
                        "let mut {}: {} = Vec::with_capacity({}.len());",
                        name,
                        rust_type(shape),
                        render_receiver(input)?
                    ),
                    Init::EmptyMap(input) => format!(
                        "let mut {}: {} = HashMap::with_capacity({}.len());",
                        name,
                        rust_type(shape),
                        render_receiver(input)?
                    ),
                };
                push_line(code, depth, &line);
            }
            Stmt::IfPresent {
                input,
                binding,
                body,
            } => {
                push_line(
                    code,
                    depth,
                    &format!(
                        "if let Some({}) = {}.as_deref() {{",
                        local(binding),
                        render_receiver(input)?
                    ),
                );
                render_stmts(body, depth + 1, code)?;
                push_line(code, depth, "}");
            }
            Stmt::ForEach { input, item, body } => {
                push_line(
                    code,
                    depth,
                    &format!("for {} in {}.iter() {{", local(item), render_receiver(input)?),
                );
                render_stmts(body, depth + 1, code)?;
                push_line(code, depth, "}");
            }
            Stmt::ForEachEntry {
                input,
                key,
                value,
                body,
            } => {
                push_line(
                    code,
                    depth,
                    &format!(
                        "for ({}, {}) in {}.iter() {{",
                        local(key),
                        local(value),
                        render_receiver(input)?
                    ),
                );
                render_stmts(body, depth + 1, code)?;
                push_line(code, depth, "}");
            }
            Stmt::Assign { target, value } => {
                let line = format!("{} = {};", local(target), render_value(value, depth)?);
                push_line(code, depth, &line);
            }
            Stmt::Push { list, value } => {
                let line = format!("{}.push({});", local(list), render_value(value, depth)?);
                push_line(code, depth, &line);
            }
            Stmt::Insert { map, key, value } => {
                let line = format!(
                    "{}.insert({}, {});",
                    local(map),
                    render_value(key, depth)?,
                    render_value(value, depth)?
                );
                push_line(code, depth, &line);
            }
        }
    }
    Ok(())
}

/// An owned value. `depth` is the indentation of the line the expression starts on.
fn render_value(expr: &Expr, depth: usize) -> Result<String> {
    match expr {
        Expr::Var(name) => Ok(local(name)),
        Expr::Scalar(inner, kind) if is_copy(*kind) => render_place(inner),
        Expr::Scalar(inner, _) => Ok(format!("{}.clone()", render_receiver(inner)?)),
        Expr::Pointer(inner) => Ok(format!("Some(Box::new({}))", render_value(inner, depth)?)),
        Expr::Call { callee, arg } => {
            let arg = render_ref(arg)?;
            match callee {
                Callee::Method(name) => Ok(format!("self.{}({})", method_name(name), arg)),
                Callee::Extend(path) if is_rust_path(path) => Ok(format!("{}({})", path, arg)),
                Callee::Extend(path) => Err(Error::Render(format!(
                    "extend function {}: not a Rust path",
                    path
                ))),
            }
        }
        Expr::Struct { name, fields } if fields.is_empty() => Ok(format!("{} {{}}", name)),
        Expr::Struct { name, fields } => {
            let mut code = format!("{} {{\n", name);
            for (field, value) in fields {
                let field = sanitize_field_name(field);
                let value = render_value(value, depth + 1)?;
                code.push_str(&INDENT.repeat(depth + 1));
                if field == value {
                    code.push_str(&format!("{},\n", field));
                } else {
                    code.push_str(&format!("{}: {},\n", field, value));
                }
            }
            code.push_str(&INDENT.repeat(depth));
            code.push('}');
            Ok(code)
        }
        Expr::Array { list, len } => Ok(format!(
            "{}.try_into().unwrap_or_else(|v: Vec<_>| panic!(\"expected {} elements, got {{}}\", v.len()))",
            local(list),
            len
        )),
        Expr::Field(..) | Expr::Deref(_) => Err(Error::Render(format!(
            "place {} used as an owned value",
            render_place(expr)?
        ))),
    }
}

fn render_place(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Var(name) => Ok(local(name)),
        Expr::Deref(inner) => Ok(format!("*{}", render_place(inner)?)),
        Expr::Field(base, name) => Ok(format!(
            "{}.{}",
            render_receiver(base)?,
            sanitize_field_name(name)
        )),
        other => Err(Error::Render(format!("{:?} is not a place", other))),
    }
}

/// A place used as a method receiver or field base, relying on auto-deref.
fn render_receiver(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Deref(inner) => render_place(inner),
        other => render_place(other),
    }
}

/// A borrow of a place, for a function argument.
fn render_ref(expr: &Expr) -> Result<String> {
    match expr {
        // already a reference
        Expr::Deref(inner) => render_place(inner),
        other => Ok(format!("&{}", render_place(other)?)),
    }
}

fn push_line(code: &mut String, depth: usize, line: &str) {
    code.push_str(&INDENT.repeat(depth));
    code.push_str(line);
    code.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use convgen_core::BasicKind;

    fn source() -> Expr {
        Expr::var("source").deref()
    }

    #[test]
    fn test_field_reads_use_auto_deref() {
        let expr = source().field("ZipCode").scalar(BasicKind::String);
        assert_eq!(render_value(&expr, 0).unwrap(), "source.zip_code.clone()");

        let expr = source().field("Age").scalar(BasicKind::Int);
        assert_eq!(render_value(&expr, 0).unwrap(), "source.age");
    }

    #[test]
    fn test_copy_binding_is_dereferenced() {
        let expr = Expr::var("item").deref().scalar(BasicKind::Int);
        assert_eq!(render_value(&expr, 0).unwrap(), "*item");
    }

    #[test]
    fn test_call_arguments_are_borrowed() {
        let field = Expr::call(
            Callee::Method("ConvertCustomer".into()),
            source().field("Customer"),
        );
        assert_eq!(
            render_value(&field, 0).unwrap(),
            "self.convert_customer(&source.customer)"
        );

        let binding = Expr::call(Callee::Extend("conv::itoa".into()), Expr::var("inner").deref());
        assert_eq!(render_value(&binding, 0).unwrap(), "conv::itoa(inner)");
    }

    #[test]
    fn test_extend_name_must_be_rust_path() {
        let expr = Expr::call(Callee::Extend("conv.Itoa".into()), source());
        assert!(matches!(render_value(&expr, 0), Err(Error::Render(_))));
    }

    #[test]
    fn test_struct_literal_layout() {
        let expr = Expr::Struct {
            name: "StreetInfo".into(),
            fields: vec![(
                "Name".into(),
                source().field("Street").scalar(BasicKind::String),
            )],
        };
        assert_eq!(
            render_value(&expr, 1).unwrap(),
            "StreetInfo {\n        name: source.street.clone(),\n    }"
        );
    }

    #[test]
    fn test_place_as_value_rejected() {
        assert!(render_value(&source().field("Name"), 0).is_err());
    }

    #[test]
    fn test_pointer_branch() {
        let stmts = vec![
            Stmt::Declare {
                name: "pointer".into(),
                shape: convgen_core::Shape::pointer(convgen_core::Shape::named("AddressDto")),
                init: Init::Nil,
            },
            Stmt::IfPresent {
                input: source().field("Address"),
                binding: "inner".into(),
                body: vec![Stmt::Assign {
                    target: "pointer".into(),
                    value: Expr::call(
                        Callee::Method("address_to_address_dto".into()),
                        Expr::var("inner").deref(),
                    )
                    .pointer(),
                }],
            },
        ];
        let mut code = String::new();
        render_stmts(&stmts, 0, &mut code).unwrap();
        assert_eq!(
            code,
            "let mut pointer: Option<Box<AddressDto>> = None;\n\
             if let Some(inner) = source.address.as_deref() {\n\
             \x20   pointer = Some(Box::new(self.address_to_address_dto(inner)));\n\
             }\n"
        );
    }
}
