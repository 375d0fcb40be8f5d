use heck::ToSnakeCase;

use crate::catalog::require_named;
use crate::error::{Error, Result, ResultExt};
use crate::ir::{Block, Expr, Init, Stmt};
use crate::rules::Rule;
use crate::synth::{Step, Synthesizer};

/// Named struct to named struct, field by field in the target's declared order.
///
/// Each target field reads from, in order of precedence:
/// 1. the source path of a directive on exactly this field path,
/// 2. the source field with the same name,
/// 3. the current source value itself, when the field is a struct that directives reach
///    into further down (the intermediate struct is built transparently).
///
/// Nested pairs no directive reaches into are promoted to their own function.
pub struct StructRule;

impl Rule for StructRule {
    fn name(&self) -> &'static str {
        "struct"
    }

    fn matches(&self, _synth: &Synthesizer<'_>, step: &Step) -> bool {
        step.source.as_named().is_some() && step.target.as_named().is_some()
    }

    fn build(&self, synth: &mut Synthesizer<'_>, step: Step) -> Result<Block> {
        if synth.may_delegate(&step) {
            let callee = synth.delegate(&step);
            return Ok(Block::expr(Expr::call(callee, step.input)));
        }

        let catalog = synth.catalog();
        let directives = synth.directives();
        let (Some(source_name), Some(target_name)) = (step.source.as_named(), step.target.as_named())
        else {
            return Err(Error::UnsupportedConversion {
                from: step.source.clone(),
                to: step.target.clone(),
                path: step.path.clone(),
            });
        };
        let source_def = require_named(catalog, source_name).context_with(|| step.path.to_string())?;
        let target_def = require_named(catalog, target_name).context_with(|| step.path.to_string())?;

        let mut stmts = Vec::new();
        let mut fields = Vec::with_capacity(target_def.fields.len());

        for target_field in &target_def.fields {
            let path = step.path.child(&target_field.name);

            let (input, source) = if let Some(source_path) = directives.get(&path) {
                synth.resolve_source(source_path)?
            } else if let Some(source_field) = source_def.field(&target_field.name) {
                (
                    step.input.clone().field(source_field.name.as_str()),
                    source_field.shape.clone(),
                )
            } else if directives.touches_below(&path) && target_field.shape.struct_name().is_some() {
                (step.input.clone(), step.source.clone())
            } else {
                return Err(Error::MissingField {
                    source_type: source_def.name.clone(),
                    field: target_field.name.clone(),
                    path,
                });
            };

            let block = synth.build(step.descend(input, source, target_field.shape.clone(), path))?;
            stmts.extend(block.stmts);
            fields.push((target_field.name.clone(), block.value));
        }

        let name = synth.fresh(&target_name.to_snake_case());
        stmts.push(Stmt::Declare {
            name: name.clone(),
            shape: step.target.clone(),
            init: Init::Value(Expr::Struct {
                name: target_def.name.clone(),
                fields,
            }),
        });
        Ok(Block::new(stmts, Expr::Var(name)))
    }
}
