use crate::error::{Error, Result};
use crate::ir::{Block, Expr, Init, Stmt};
use crate::rules::Rule;
use crate::shape::Shape;
use crate::synth::{Step, Synthesizer};

/// Map to map. Keys and values are converted independently; when two source keys convert
/// to the same target key, the entry inserted last wins.
pub struct MapRule;

impl Rule for MapRule {
    fn name(&self) -> &'static str {
        "map"
    }

    fn matches(&self, _synth: &Synthesizer<'_>, step: &Step) -> bool {
        matches!(
            (&step.source, &step.target),
            (Shape::Map { .. }, Shape::Map { .. })
        )
    }

    fn build(&self, synth: &mut Synthesizer<'_>, step: Step) -> Result<Block> {
        let (
            Shape::Map {
                key: source_key,
                value: source_value,
            },
            Shape::Map {
                key: target_key,
                value: target_value,
            },
        ) = (&step.source, &step.target)
        else {
            return Err(Error::UnsupportedConversion {
                from: step.source.clone(),
                to: step.target.clone(),
                path: step.path.clone(),
            });
        };

        let map = synth.fresh("map");
        let key = synth.fresh("key");
        let value = synth.fresh("value");

        let key_block = synth.build(step.descend(
            Expr::var(key.as_str()).deref(),
            (**source_key).clone(),
            (**target_key).clone(),
            step.path.key(),
        ))?;
        let value_block = synth.build(step.descend(
            Expr::var(value.as_str()).deref(),
            (**source_value).clone(),
            (**target_value).clone(),
            step.path.value(),
        ))?;

        let mut body = key_block.stmts;
        body.extend(value_block.stmts);
        body.push(Stmt::Insert {
            map: map.clone(),
            key: key_block.value,
            value: value_block.value,
        });

        let stmts = vec![
            Stmt::Declare {
                name: map.clone(),
                shape: step.target.clone(),
                init: Init::EmptyMap(step.input.clone()),
            },
            Stmt::ForEachEntry {
                input: step.input.clone(),
                key,
                value,
                body,
            },
        ];
        Ok(Block::new(stmts, Expr::Var(map)))
    }
}
