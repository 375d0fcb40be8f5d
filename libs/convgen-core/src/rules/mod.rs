//! Conversion rules
//!
//! The rule chain is an ordered list of strategies, each owning one class of shape pairs.
//! The first rule whose [`Rule::matches`] accepts a step builds it; there is no fallthrough.
//! Supporting a new kind of shape means adding a variant and a rule, not editing existing ones.

mod basic;
mod extend;
mod list;
mod map;
mod pointer;
mod structs;

pub use basic::BasicRule;
pub use extend::ExtendLookup;
pub use list::ListRule;
pub use map::MapRule;
pub use pointer::{BasicTargetPointerRule, PointerRule, TargetPointerRule};
pub use structs::StructRule;

use crate::error::Result;
use crate::ir::Block;
use crate::synth::{Step, Synthesizer};

/// One conversion strategy
pub trait Rule {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Whether this rule handles the step's shape pair
    fn matches(&self, synth: &Synthesizer<'_>, step: &Step) -> bool;

    /// Emit the conversion, recursing through `synth` for nested shapes
    fn build(&self, synth: &mut Synthesizer<'_>, step: Step) -> Result<Block>;
}

/// The standard chain, in priority order
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(ExtendLookup),
        Box::new(BasicTargetPointerRule),
        Box::new(PointerRule),
        Box::new(TargetPointerRule),
        Box::new(BasicRule),
        Box::new(StructRule),
        Box::new(ListRule),
        Box::new(MapRule),
    ]
}
