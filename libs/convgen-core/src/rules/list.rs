use crate::error::{Error, Result};
use crate::ir::{Block, Expr, Init, Stmt};
use crate::rules::Rule;
use crate::shape::Shape;
use crate::synth::{Step, Synthesizer};

/// List to list. The element conversion is synthesized once and applied in a loop, so the
/// result has the source's length and order.
pub struct ListRule;

impl Rule for ListRule {
    fn name(&self) -> &'static str {
        "list"
    }

    fn matches(&self, _synth: &Synthesizer<'_>, step: &Step) -> bool {
        matches!(
            (&step.source, &step.target),
            (Shape::List { .. }, Shape::List { .. })
        )
    }

    fn build(&self, synth: &mut Synthesizer<'_>, step: Step) -> Result<Block> {
        let (
            Shape::List {
                elem: source_elem,
                len: source_len,
            },
            Shape::List {
                elem: target_elem,
                len: target_len,
            },
        ) = (&step.source, &step.target)
        else {
            return Err(Error::UnsupportedConversion {
                from: step.source.clone(),
                to: step.target.clone(),
                path: step.path.clone(),
            });
        };

        if let (Some(source_len), Some(target_len)) = (source_len, target_len) {
            if source_len != target_len {
                return Err(Error::TypeMismatch {
                    from: step.source.clone(),
                    to: step.target.clone(),
                    path: step.path.clone(),
                });
            }
        }

        let list = synth.fresh("list");
        let item = synth.fresh("item");
        let inner = synth.build(step.descend(
            Expr::var(item.as_str()).deref(),
            (**source_elem).clone(),
            (**target_elem).clone(),
            step.path.element(),
        ))?;

        let mut body = inner.stmts;
        body.push(Stmt::Push {
            list: list.clone(),
            value: inner.value,
        });

        let stmts = vec![
            Stmt::Declare {
                name: list.clone(),
                shape: Shape::list((**target_elem).clone()),
                init: Init::EmptyList(step.input.clone()),
            },
            Stmt::ForEach {
                input: step.input.clone(),
                item,
                body,
            },
        ];

        let value = match target_len {
            Some(len) => Expr::Array { list, len: *len },
            None => Expr::Var(list),
        };
        Ok(Block::new(stmts, value))
    }
}
