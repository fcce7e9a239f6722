//! Species action tables: validated layouts plus one handler per state.

use super::layout::{ActionCode, ActionDef, ActionLayout, FrameEnd};
use super::machine::ActionStateMachine;
use crate::actor::Body;
use crate::context::FrameContext;
use crate::error::ActionTableError;

/// Per-tick behaviour of a bound state.
pub type Handler<S> = fn(&mut S, &mut Body, &mut FrameContext<'_>);

/// Immutable table shared by every actor of species `S`.
///
/// Tables are built once per species, usually inside a `LazyLock`, and
/// handed out as `&'static` so state machines can point into them.
pub struct ActionTable<S> {
    layout: ActionLayout,
    handlers: Vec<Handler<S>>,
    initial: ActionCode,
}

impl<S> ActionTable<S> {
    pub fn builder(initial: ActionCode) -> ActionTableBuilder<S> {
        ActionTableBuilder {
            initial,
            entries: Vec::new(),
        }
    }

    pub fn layout(&self) -> &ActionLayout {
        &self.layout
    }

    pub fn initial(&self) -> ActionCode {
        self.initial
    }

    /// Handler bound to the state whose entry code is `code`.
    pub fn handler(&self, code: ActionCode) -> Option<Handler<S>> {
        let index = self.layout.index_of(code)?;
        (self.layout.defs()[index].code == code).then(|| self.handlers[index])
    }

    /// Fresh machine sitting on the initial state.
    pub fn machine(&'static self) -> ActionStateMachine {
        let index = self.layout.index_of(self.initial).unwrap_or_default();
        ActionStateMachine::bound_at(&self.layout, index)
    }

    /// Runs the handler of the state `body` is currently bound to.
    pub fn dispatch(&self, species: &mut S, body: &mut Body, ctx: &mut FrameContext<'_>) {
        let Some(code) = body.machine.bound_code() else {
            return;
        };
        match self.handler(code) {
            Some(handler) => handler(species, body, ctx),
            None => tracing::warn!(code, "bound state has no handler in this table"),
        }
    }
}

impl<S> std::fmt::Debug for ActionTable<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionTable")
            .field("layout", &self.layout)
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}

/// Collects states and validates them into an [`ActionTable`].
pub struct ActionTableBuilder<S> {
    initial: ActionCode,
    entries: Vec<(ActionDef, Handler<S>)>,
}

impl<S> ActionTableBuilder<S> {
    pub fn state(mut self, def: ActionDef, handler: Handler<S>) -> Self {
        self.entries.push((def, handler));
        self
    }

    pub fn build(mut self) -> Result<ActionTable<S>, ActionTableError> {
        if self.entries.is_empty() {
            return Err(ActionTableError::Empty);
        }
        self.entries.sort_by_key(|(def, _)| def.code);

        for (def, _) in &self.entries {
            if def.frames == 0 {
                return Err(ActionTableError::ZeroFrames(def.code));
            }
            if def.ticks_per_frame == 0 {
                return Err(ActionTableError::ZeroTicks(def.code));
            }
        }

        for pair in self.entries.windows(2) {
            let (first, second) = (&pair[0].0, &pair[1].0);
            if first.code == second.code {
                return Err(ActionTableError::Duplicate(first.code));
            }
            if first.last() >= second.code {
                return Err(ActionTableError::Overlap {
                    first: first.code,
                    second: second.code,
                });
            }
        }

        let (defs, handlers): (Vec<_>, Vec<_>) = self.entries.into_iter().unzip();
        let layout = ActionLayout::from_sorted(defs);

        for def in layout.defs() {
            if let FrameEnd::Chain(to) = def.end {
                if layout.state_of(to).is_none() {
                    return Err(ActionTableError::DanglingChain { from: def.code, to });
                }
            }
        }

        match layout.state_of(self.initial) {
            Some(def) if def.code == self.initial => {}
            _ => return Err(ActionTableError::BadInitial(self.initial)),
        }

        Ok(ActionTable {
            layout,
            handlers,
            initial: self.initial,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy;

    fn idle(_: &mut Dummy, _: &mut Body, _: &mut FrameContext<'_>) {}

    fn build(defs: &[ActionDef], initial: ActionCode) -> Result<ActionTable<Dummy>, ActionTableError> {
        defs.iter()
            .fold(ActionTable::builder(initial), |builder, def| {
                builder.state(*def, idle)
            })
            .build()
    }

    #[test]
    fn accepts_well_formed_tables() {
        let table = build(
            &[
                ActionDef::new(1, 6).then(FrameEnd::Chain(0)),
                ActionDef::new(0, 1),
            ],
            0,
        )
        .unwrap();
        assert_eq!(table.layout().defs()[0].code, 0);
        assert!(table.handler(1).is_some());
        assert!(table.handler(3).is_none());
    }

    #[test]
    fn rejects_structural_mistakes() {
        assert!(matches!(build(&[], 0), Err(ActionTableError::Empty)));
        assert_eq!(
            build(&[ActionDef::new(0, 0)], 0).err(),
            Some(ActionTableError::ZeroFrames(0))
        );
        assert_eq!(
            build(&[ActionDef::new(0, 1).ticks(0)], 0).err(),
            Some(ActionTableError::ZeroTicks(0))
        );
        assert_eq!(
            build(&[ActionDef::new(0, 1), ActionDef::new(0, 2)], 0).err(),
            Some(ActionTableError::Duplicate(0))
        );
        assert_eq!(
            build(&[ActionDef::new(0, 3), ActionDef::new(2, 1)], 0).err(),
            Some(ActionTableError::Overlap {
                first: 0,
                second: 2
            })
        );
    }

    #[test]
    fn rejects_dangling_chains_and_bad_initials() {
        assert_eq!(
            build(&[ActionDef::new(0, 2).then(FrameEnd::Chain(9))], 0).err(),
            Some(ActionTableError::DanglingChain { from: 0, to: 9 })
        );
        assert_eq!(
            build(&[ActionDef::new(0, 2)], 1).err(),
            Some(ActionTableError::BadInitial(1))
        );
    }
}
