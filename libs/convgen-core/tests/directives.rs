//! Field-path directives: flattening, nesting and root rebasing

mod support;

use convgen_core::{generate, ConverterConfig, Error, MappingDirective};
use support::*;

fn flat_person_catalog() -> convgen_core::Catalog {
    catalog_with(
        vec![
            strukt(
                "FlatPerson",
                &[
                    ("Name", string()),
                    ("Age", int()),
                    ("Street", string()),
                    ("ZipCode", string()),
                ],
            ),
            strukt(
                "Person",
                &[("Name", string()), ("Age", int()), ("Address", named("Address"))],
            ),
            strukt(
                "Address",
                &[("StreetInfo", named("StreetInfo")), ("ZipCode", string())],
            ),
            strukt("StreetInfo", &[("Name", string())]),
        ],
        vec![method("Convert", named("FlatPerson"), named("Person"))],
    )
}

fn flat_person(name: &str, age: i64, street: &str, zip: &str) -> Value {
    Value::strukt(
        "FlatPerson",
        vec![
            ("Name", Value::str(name)),
            ("Age", Value::Int(age)),
            ("Street", Value::str(street)),
            ("ZipCode", Value::str(zip)),
        ],
    )
}

#[test]
fn test_flat_source_fills_nested_target() {
    let catalog = flat_person_catalog();
    let config = ConverterConfig::new("Converter", "ConverterImpl")
        .map("Convert", MappingDirective::from_dotted(".", "Address"))
        .map("Convert", MappingDirective::from_dotted(".", "Address.StreetInfo"))
        .map("Convert", MappingDirective::from_dotted("Street", "Address.StreetInfo.Name"));
    let file = generate(&catalog, &[config]).unwrap();
    let converter = &file.converters[0];

    // every struct is built inline because directives reach into it
    assert_eq!(converter.functions.len(), 1);

    let output = Interpreter::new(converter).call("Convert", flat_person("a", 1, "Main", "12345"));
    assert_eq!(
        output,
        Value::strukt(
            "Person",
            vec![
                ("Name", Value::str("a")),
                ("Age", Value::Int(1)),
                (
                    "Address",
                    Value::strukt(
                        "Address",
                        vec![
                            (
                                "StreetInfo",
                                Value::strukt("StreetInfo", vec![("Name", Value::str("Main"))]),
                            ),
                            ("ZipCode", Value::str("12345")),
                        ],
                    ),
                ),
            ],
        )
    );
}

#[test]
fn test_intermediate_structs_built_implicitly() {
    // No directive for Address or StreetInfo themselves: the deeper one is enough.
    let catalog = flat_person_catalog();
    let config = ConverterConfig::new("Converter", "ConverterImpl")
        .map("Convert", MappingDirective::from_dotted("Street", "Address.StreetInfo.Name"));
    let file = generate(&catalog, &[config]).unwrap();

    let output = Interpreter::new(&file.converters[0])
        .call("Convert", flat_person("b", 2, "Elm", "999"));
    let address = output.field("Address");
    assert_eq!(address.field("ZipCode"), &Value::str("999"));
    assert_eq!(address.field("StreetInfo").field("Name"), &Value::str("Elm"));
}

#[test]
fn test_directive_renames_single_field() {
    let catalog = catalog_with(
        vec![
            strukt("User", &[("Login", string()), ("Id", int())]),
            strukt("UserDto", &[("Username", string()), ("Id", int())]),
        ],
        vec![method("Convert", named("User"), named("UserDto"))],
    );
    let config = ConverterConfig::new("Converter", "ConverterImpl")
        .map("Convert", MappingDirective::new(["Login"], ["Username"]));
    let file = generate(&catalog, &[config]).unwrap();

    let input = Value::strukt("User", vec![("Login", Value::str("ada")), ("Id", Value::Int(3))]);
    let output = Interpreter::new(&file.converters[0]).call("Convert", input);
    assert_eq!(
        output,
        Value::strukt("UserDto", vec![("Username", Value::str("ada")), ("Id", Value::Int(3))])
    );
}

#[test]
fn test_directive_wins_over_same_name_field() {
    let catalog = catalog_with(
        vec![
            strukt("In", &[("Name", string()), ("Nick", string())]),
            strukt("Out", &[("Name", string())]),
        ],
        vec![method("Convert", named("In"), named("Out"))],
    );
    let config = ConverterConfig::new("Converter", "ConverterImpl")
        .map("Convert", MappingDirective::from_dotted("Nick", "Name"));
    let file = generate(&catalog, &[config]).unwrap();

    let input = Value::strukt("In", vec![("Name", Value::str("x")), ("Nick", Value::str("y"))]);
    let output = Interpreter::new(&file.converters[0]).call("Convert", input);
    assert_eq!(output.field("Name"), &Value::str("y"));
}

#[test]
fn test_empty_target_path_rebases_root() {
    let catalog = catalog_with(
        vec![
            strukt("Envelope", &[("Body", named("Person")), ("Seq", int())]),
            strukt("Person", &[("Name", string())]),
            strukt("PersonDto", &[("Name", string())]),
        ],
        vec![method("Convert", named("Envelope"), named("PersonDto"))],
    );
    let config = ConverterConfig::new("Converter", "ConverterImpl")
        .map("Convert", MappingDirective::from_dotted("Body", "."));
    let file = generate(&catalog, &[config]).unwrap();

    let input = Value::strukt(
        "Envelope",
        vec![
            ("Body", Value::strukt("Person", vec![("Name", Value::str("n"))])),
            ("Seq", Value::Int(9)),
        ],
    );
    let output = Interpreter::new(&file.converters[0]).call("Convert", input);
    assert_eq!(output, Value::strukt("PersonDto", vec![("Name", Value::str("n"))]));
}

#[test]
fn test_directives_apply_only_to_their_method() {
    let catalog = catalog_with(
        vec![
            strukt("In", &[("Nick", string()), ("Name", string())]),
            strukt("Out", &[("Name", string())]),
            strukt("Other", &[("Name", string())]),
        ],
        vec![
            method("Convert", named("In"), named("Out")),
            method("ConvertOther", named("In"), named("Other")),
        ],
    );
    let config = ConverterConfig::new("Converter", "ConverterImpl")
        .map("Convert", MappingDirective::from_dotted("Nick", "Name"));
    let file = generate(&catalog, &[config]).unwrap();
    let interpreter = Interpreter::new(&file.converters[0]);

    let input = Value::strukt("In", vec![("Nick", Value::str("nick")), ("Name", Value::str("name"))]);
    assert_eq!(
        interpreter.call("Convert", input.clone()).field("Name"),
        &Value::str("nick")
    );
    assert_eq!(
        interpreter.call("ConvertOther", input).field("Name"),
        &Value::str("name")
    );
}

#[test]
fn test_unknown_target_field_rejected() {
    let catalog = flat_person_catalog();
    let config = ConverterConfig::new("Converter", "ConverterImpl")
        .map("Convert", MappingDirective::from_dotted("Street", "Address.Zip"));
    let err = generate(&catalog, &[config]).unwrap_err();

    match err.root() {
        Error::InvalidDirective { directive, reason } => {
            assert_eq!(directive, "map Street Address.Zip");
            assert_eq!(reason, "target Address has no field Zip");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().starts_with("converter ConverterImpl: method Convert: "));
}

#[test]
fn test_unknown_source_field_rejected() {
    let catalog = flat_person_catalog();
    let config = ConverterConfig::new("Converter", "ConverterImpl")
        .map("Convert", MappingDirective::from_dotted("Road", "Address.StreetInfo.Name"));
    let err = generate(&catalog, &[config]).unwrap_err();
    assert!(matches!(err.root(), Error::InvalidDirective { .. }));
}

#[test]
fn test_target_mapped_twice_rejected() {
    let catalog = flat_person_catalog();
    let config = ConverterConfig::new("Converter", "ConverterImpl")
        .map("Convert", MappingDirective::from_dotted("Street", "Name"))
        .map("Convert", MappingDirective::from_dotted("ZipCode", "Name"));
    let err = generate(&catalog, &[config]).unwrap_err();
    assert!(matches!(err.root(), Error::InvalidDirective { .. }));
}

#[test]
fn test_directive_for_unknown_method_rejected() {
    let catalog = flat_person_catalog();
    let config = ConverterConfig::new("Converter", "ConverterImpl")
        .map("Missing", MappingDirective::from_dotted("Street", "Name"));
    let err = generate(&catalog, &[config]).unwrap_err();
    assert_eq!(
        err.root(),
        &Error::NotFound("method Missing on Converter".to_string())
    );
}
