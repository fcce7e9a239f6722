//! Per-actor cursor over a species' [`ActionLayout`].

use super::layout::{ActionCode, ActionDef, ActionLayout, FrameEnd};
use crate::error::ActionError;

/// Outcome of one animation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationSignal {
    Continue,
    /// A [`FrameEnd::Hold`] state reached its last frame.
    Finished,
    /// A [`FrameEnd::Despawn`] state reached its last frame.
    Despawn,
}

static EMPTY_LAYOUT: ActionLayout = ActionLayout::empty();

/// Tracks which state is bound and which animation frame is showing.
///
/// The bound state decides which handler runs each tick. The current code
/// walks through that state's frames and may chain into a different state's
/// frames without rebinding; only [`ActionStateMachine::set_action`] rebinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionStateMachine {
    layout: &'static ActionLayout,
    bound: Option<usize>,
    code: ActionCode,
    ticks: u16,
    signal: AnimationSignal,
    frame_changed: bool,
}

impl ActionStateMachine {
    /// Starts bound to `initial`, which must be a state's entry code.
    pub fn new(layout: &'static ActionLayout, initial: ActionCode) -> Result<Self, ActionError> {
        let index = Self::resolve(layout, initial)?;
        Ok(Self::bound_at(layout, index))
    }

    /// Machine without any states. Every request is rejected and
    /// [`advance`](Self::advance) never leaves `Continue`.
    pub fn inert() -> Self {
        Self {
            layout: &EMPTY_LAYOUT,
            bound: None,
            code: 0,
            ticks: 0,
            signal: AnimationSignal::Continue,
            frame_changed: false,
        }
    }

    pub(crate) fn bound_at(layout: &'static ActionLayout, index: usize) -> Self {
        let code = layout.get(index).map(|def| def.code).unwrap_or_default();
        Self {
            layout,
            bound: Some(index),
            code,
            ticks: 0,
            signal: AnimationSignal::Continue,
            frame_changed: true,
        }
    }

    fn resolve(layout: &ActionLayout, code: ActionCode) -> Result<usize, ActionError> {
        let index = layout.index_of(code).ok_or(ActionError::UnknownCode(code))?;
        let def = &layout.defs()[index];
        if def.code != code {
            return Err(ActionError::Unbound {
                code,
                owner: def.code,
            });
        }
        Ok(index)
    }

    /// Requests a transition to `code`.
    ///
    /// Asking for a code inside the bound state's frame run while the cursor
    /// is still inside that run keeps the animation going. Asking for another
    /// state's entry code rebinds and restarts at its first frame.
    pub fn set_action(&mut self, code: ActionCode) -> Result<(), ActionError> {
        if let Some(def) = self.bound_def() {
            if def.contains(code) && def.contains(self.code) {
                return Ok(());
            }
        }

        let index = Self::resolve(self.layout, code)?;
        self.bound = Some(index);
        self.code = code;
        self.ticks = 0;
        self.signal = AnimationSignal::Continue;
        self.frame_changed = true;
        tracing::trace!(code, "action bound");
        Ok(())
    }

    /// Jumps straight to frame `code`, binding the state that owns it.
    /// Used when rebuilding a machine from a saved frame.
    pub fn seek(&mut self, code: ActionCode) -> Result<(), ActionError> {
        let index = self
            .layout
            .index_of(code)
            .ok_or(ActionError::UnknownCode(code))?;
        self.bound = Some(index);
        self.code = code;
        self.ticks = 0;
        self.signal = AnimationSignal::Continue;
        self.frame_changed = true;
        Ok(())
    }

    /// True when the current frame code is exactly `code`.
    pub fn action_number(&self, code: ActionCode) -> bool {
        self.code == code
    }

    /// True when the current frame code lies in the frame run of the state
    /// owning `code`.
    pub fn action_status(&self, code: ActionCode) -> bool {
        self.layout
            .state_of(code)
            .is_some_and(|def| def.contains(self.code))
    }

    /// Steps the animation by one tick.
    pub fn advance(&mut self) -> AnimationSignal {
        self.frame_changed = false;
        if self.signal != AnimationSignal::Continue {
            return self.signal;
        }
        let Some(def) = self.layout.state_of(self.code).copied() else {
            return AnimationSignal::Continue;
        };

        self.ticks += 1;
        if self.ticks < def.ticks_per_frame {
            return AnimationSignal::Continue;
        }
        self.ticks = 0;

        if self.code < def.last() {
            self.show(self.code + 1);
            return AnimationSignal::Continue;
        }

        match def.end {
            FrameEnd::Loop => {
                if def.frames > 1 {
                    self.show(def.code);
                }
            }
            FrameEnd::Chain(next) => self.show(next),
            FrameEnd::Hold => self.signal = AnimationSignal::Finished,
            FrameEnd::Despawn => self.signal = AnimationSignal::Despawn,
        }
        self.signal
    }

    fn show(&mut self, code: ActionCode) {
        self.code = code;
        self.frame_changed = true;
    }

    /// Current frame code.
    pub fn code(&self) -> ActionCode {
        self.code
    }

    /// Offset of the current frame inside the run that contains it.
    pub fn cursor(&self) -> u16 {
        self.layout
            .state_of(self.code)
            .map(|def| self.code - def.code)
            .unwrap_or_default()
    }

    /// Entry code of the bound state, whose handler runs this tick.
    pub fn bound_code(&self) -> Option<ActionCode> {
        self.bound_def().map(|def| def.code)
    }

    pub fn bound_def(&self) -> Option<&ActionDef> {
        self.bound.and_then(|index| self.layout.get(index))
    }

    /// True for the tick in which the current frame code changed.
    pub fn frame_changed(&self) -> bool {
        self.frame_changed
    }

    pub fn signal(&self) -> AnimationSignal {
        self.signal
    }

    pub fn layout(&self) -> &'static ActionLayout {
        self.layout
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;

    const SIT: ActionCode = 0;
    const WALK: ActionCode = 1;
    const JUMP: ActionCode = 7;
    const POOF: ActionCode = 10;

    static LAYOUT: LazyLock<ActionLayout> = LazyLock::new(|| {
        ActionLayout::from_sorted(vec![
            ActionDef::new(SIT, 1).ticks(1),
            ActionDef::new(WALK, 6).ticks(1).then(FrameEnd::Chain(SIT)),
            ActionDef::new(JUMP, 3).ticks(2).then(FrameEnd::Hold),
            ActionDef::new(POOF, 2).ticks(1).then(FrameEnd::Despawn),
        ])
    });

    fn machine() -> ActionStateMachine {
        ActionStateMachine::new(&LAYOUT, SIT).unwrap()
    }

    #[test]
    fn status_covers_the_whole_frame_run() {
        let mut machine = machine();
        machine.set_action(WALK).unwrap();
        for _ in 0..3 {
            machine.advance();
        }
        assert_eq!(machine.code(), 4);
        assert!(machine.action_status(WALK));
        assert!(machine.action_status(6));
        assert!(!machine.action_number(WALK));
        assert!(machine.action_number(4));
        assert_eq!(machine.cursor(), 3);
    }

    #[test]
    fn chained_frames_keep_the_first_binding() {
        let mut machine = machine();
        machine.set_action(WALK).unwrap();
        for _ in 0..6 {
            machine.advance();
        }
        assert!(machine.action_number(SIT));
        assert!(machine.action_status(SIT));
        assert_eq!(machine.bound_code(), Some(WALK));
    }

    #[test]
    fn rebinding_the_running_state_is_a_noop() {
        let mut machine = machine();
        machine.set_action(WALK).unwrap();
        machine.advance();
        machine.advance();
        machine.set_action(WALK).unwrap();
        assert_eq!(machine.code(), 3);
    }

    #[test]
    fn member_codes_of_other_states_are_rejected() {
        let mut machine = machine();
        assert_eq!(
            machine.set_action(3),
            Err(ActionError::Unbound {
                code: 3,
                owner: WALK
            })
        );
        assert_eq!(machine.set_action(40), Err(ActionError::UnknownCode(40)));
        assert!(machine.action_number(SIT));
    }

    #[test]
    fn hold_reports_finished_on_the_last_frame() {
        let mut machine = machine();
        machine.set_action(JUMP).unwrap();
        let mut signals = Vec::new();
        for _ in 0..6 {
            signals.push(machine.advance());
        }
        assert_eq!(signals.last(), Some(&AnimationSignal::Finished));
        assert!(machine.action_number(9));
        assert_eq!(machine.advance(), AnimationSignal::Finished);

        machine.set_action(SIT).unwrap();
        assert_eq!(machine.advance(), AnimationSignal::Continue);
    }

    #[test]
    fn despawn_is_sticky() {
        let mut machine = machine();
        machine.set_action(POOF).unwrap();
        assert_eq!(machine.advance(), AnimationSignal::Continue);
        assert_eq!(machine.advance(), AnimationSignal::Despawn);
        assert_eq!(machine.advance(), AnimationSignal::Despawn);
    }

    #[test]
    fn single_frame_loop_never_reports_a_change() {
        let mut machine = machine();
        machine.advance();
        assert!(!machine.frame_changed());
        assert!(machine.action_number(SIT));
    }

    #[test]
    fn seek_binds_the_owner_of_a_member_frame() {
        let mut machine = machine();
        machine.seek(4).unwrap();
        assert_eq!(machine.bound_code(), Some(WALK));
        assert_eq!(machine.cursor(), 3);
        assert_eq!(machine.seek(40), Err(ActionError::UnknownCode(40)));
    }

    #[test]
    fn inert_machine_rejects_everything() {
        let mut machine = ActionStateMachine::inert();
        assert_eq!(machine.set_action(0), Err(ActionError::UnknownCode(0)));
        assert_eq!(machine.advance(), AnimationSignal::Continue);
        assert_eq!(machine.bound_code(), None);
    }
}
