//! Action tables and the per-actor state machine that walks them.
//!
//! A species declares its states once as [`ActionDef`]s, each owning a
//! contiguous run of frame codes and a handler. Only a state's first code is
//! a valid `set_action` target; the remaining codes are animation frames that
//! [`ActionStateMachine::advance`] steps through on its own.

mod layout;
mod machine;
mod table;

pub use layout::{ActionCode, ActionDef, ActionLayout, FrameEnd};
pub use machine::{ActionStateMachine, AnimationSignal};
pub use table::{ActionTable, ActionTableBuilder, Handler};
