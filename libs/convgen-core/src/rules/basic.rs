use crate::error::{Error, Result};
use crate::ir::Block;
use crate::rules::Rule;
use crate::shape::Shape;
use crate::synth::{Step, Synthesizer};

/// Basic to basic of the same kind. Different kinds are never coerced.
pub struct BasicRule;

impl Rule for BasicRule {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn matches(&self, _synth: &Synthesizer<'_>, step: &Step) -> bool {
        step.source.is_basic() && step.target.is_basic()
    }

    fn build(&self, _synth: &mut Synthesizer<'_>, step: Step) -> Result<Block> {
        match (&step.source, &step.target) {
            (Shape::Basic(source), Shape::Basic(target)) if source == target => {
                Ok(Block::expr(step.input.scalar(*target)))
            }
            _ => Err(Error::TypeMismatch {
                from: step.source,
                to: step.target,
                path: step.path,
            }),
        }
    }
}
