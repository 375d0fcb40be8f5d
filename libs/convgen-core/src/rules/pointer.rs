use crate::error::{Error, Result};
use crate::ir::{Block, Expr, Init, Stmt};
use crate::rules::Rule;
use crate::shape::Shape;
use crate::synth::{Step, Synthesizer};

/// Basic source into a pointer to a basic target: convert the value, then box it.
pub struct BasicTargetPointerRule;

impl Rule for BasicTargetPointerRule {
    fn name(&self) -> &'static str {
        "basic-target-pointer"
    }

    fn matches(&self, _synth: &Synthesizer<'_>, step: &Step) -> bool {
        step.source.is_basic() && step.target.pointee().is_some_and(Shape::is_basic)
    }

    fn build(&self, synth: &mut Synthesizer<'_>, step: Step) -> Result<Block> {
        boxed(synth, step)
    }
}

/// Pointer to pointer. A nil source stays nil and the pointee is only converted when
/// present.
pub struct PointerRule;

impl Rule for PointerRule {
    fn name(&self) -> &'static str {
        "pointer"
    }

    fn matches(&self, _synth: &Synthesizer<'_>, step: &Step) -> bool {
        step.source.is_pointer() && step.target.is_pointer()
    }

    fn build(&self, synth: &mut Synthesizer<'_>, step: Step) -> Result<Block> {
        let (source, target) = match (step.source.pointee(), step.target.pointee()) {
            (Some(source), Some(target)) => (source.clone(), target.clone()),
            _ => return Err(unsupported(step)),
        };

        let result = synth.fresh("pointer");
        let binding = synth.fresh("inner");
        let inner = synth.build(step.descend(
            Expr::var(binding.as_str()).deref(),
            source,
            target,
            step.path.clone(),
        ))?;

        let mut body = inner.stmts;
        body.push(Stmt::Assign {
            target: result.clone(),
            value: inner.value.pointer(),
        });

        let stmts = vec![
            Stmt::Declare {
                name: result.clone(),
                shape: step.target.clone(),
                init: Init::Nil,
            },
            Stmt::IfPresent {
                input: step.input,
                binding,
                body,
            },
        ];
        Ok(Block::new(stmts, Expr::Var(result)))
    }
}

/// Non-pointer source into a pointer to a non-basic target: convert, then box.
pub struct TargetPointerRule;

impl Rule for TargetPointerRule {
    fn name(&self) -> &'static str {
        "target-pointer"
    }

    fn matches(&self, _synth: &Synthesizer<'_>, step: &Step) -> bool {
        !step.source.is_pointer() && step.target.pointee().is_some_and(|elem| !elem.is_basic())
    }

    fn build(&self, synth: &mut Synthesizer<'_>, step: Step) -> Result<Block> {
        boxed(synth, step)
    }
}

/// Convert `step.source` into the pointee of `step.target` and wrap the result.
fn boxed(synth: &mut Synthesizer<'_>, step: Step) -> Result<Block> {
    let Some(elem) = step.target.pointee().cloned() else {
        return Err(unsupported(step));
    };
    let inner = synth.build(step.descend(
        step.input.clone(),
        step.source.clone(),
        elem,
        step.path.clone(),
    ))?;
    Ok(Block::new(inner.stmts, inner.value.pointer()))
}

fn unsupported(step: Step) -> Error {
    Error::UnsupportedConversion {
        from: step.source,
        to: step.target,
        path: step.path,
    }
}
