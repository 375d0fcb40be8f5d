use crate::error::{Error, Result};
use crate::ir::{Block, Expr};
use crate::rules::Rule;
use crate::synth::{Step, Synthesizer};

/// Calls a function that already converts the exact pair: a user-supplied extend function,
/// or a converter function registered earlier (declared or promoted).
pub struct ExtendLookup;

impl Rule for ExtendLookup {
    fn name(&self) -> &'static str {
        "extend-lookup"
    }

    fn matches(&self, synth: &Synthesizer<'_>, step: &Step) -> bool {
        synth.existing_function(step).is_some()
    }

    fn build(&self, synth: &mut Synthesizer<'_>, step: Step) -> Result<Block> {
        match synth.existing_function(&step) {
            Some(callee) => Ok(Block::expr(Expr::call(callee, step.input))),
            None => Err(Error::UnsupportedConversion {
                from: step.source,
                to: step.target,
                path: step.path,
            }),
        }
    }
}
