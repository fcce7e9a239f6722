//! Static description of a species' action states and their frame runs.

/// Discriminator of an actor's logical state or animation frame.
pub type ActionCode = u16;

/// What happens when a state's last frame has been shown long enough.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameEnd {
    /// Start over at the first frame of the same state.
    Loop,
    /// Continue with `code`, which usually belongs to another state. The
    /// current handler stays bound until it calls `set_action` itself.
    Chain(ActionCode),
    /// Stay on the last frame and report [`AnimationSignal::Finished`].
    ///
    /// [`AnimationSignal::Finished`]: super::AnimationSignal::Finished
    Hold,
    /// Stay on the last frame and report [`AnimationSignal::Despawn`].
    ///
    /// [`AnimationSignal::Despawn`]: super::AnimationSignal::Despawn
    Despawn,
}

/// One logical state: a bound entry code and the contiguous frames after it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActionDef {
    pub code: ActionCode,
    pub frames: u16,
    pub ticks_per_frame: u16,
    pub end: FrameEnd,
}

impl ActionDef {
    pub const DEFAULT_TICKS: u16 = 8;

    pub const fn new(code: ActionCode, frames: u16) -> Self {
        Self {
            code,
            frames,
            ticks_per_frame: Self::DEFAULT_TICKS,
            end: FrameEnd::Loop,
        }
    }

    pub const fn ticks(mut self, ticks_per_frame: u16) -> Self {
        self.ticks_per_frame = ticks_per_frame;
        self
    }

    pub const fn then(mut self, end: FrameEnd) -> Self {
        self.end = end;
        self
    }

    /// Last code of the frame run.
    pub const fn last(&self) -> ActionCode {
        self.code + self.frames.saturating_sub(1)
    }

    pub const fn contains(&self, code: ActionCode) -> bool {
        code >= self.code && code <= self.last()
    }
}

/// Validated, code-sorted list of states shared by every actor of a species.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionLayout {
    defs: Vec<ActionDef>,
}

impl ActionLayout {
    /// Layout without states, used by inert placeholders.
    pub const fn empty() -> Self {
        Self { defs: Vec::new() }
    }

    /// Callers guarantee `defs` is sorted by code and free of overlaps.
    pub(crate) fn from_sorted(defs: Vec<ActionDef>) -> Self {
        Self { defs }
    }

    pub fn defs(&self) -> &[ActionDef] {
        &self.defs
    }

    pub fn get(&self, index: usize) -> Option<&ActionDef> {
        self.defs.get(index)
    }

    /// Index of the state whose frame run contains `code`.
    pub fn index_of(&self, code: ActionCode) -> Option<usize> {
        let index = self.defs.partition_point(|def| def.code <= code);
        let candidate = index.checked_sub(1)?;
        self.defs[candidate].contains(code).then_some(candidate)
    }

    /// State whose frame run contains `code`.
    pub fn state_of(&self, code: ActionCode) -> Option<&ActionDef> {
        self.index_of(code).map(|index| &self.defs[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ActionLayout {
        ActionLayout::from_sorted(vec![
            ActionDef::new(0, 1),
            ActionDef::new(1, 6),
            ActionDef::new(10, 2),
        ])
    }

    #[test]
    fn state_of_resolves_members_to_their_owner() {
        let layout = layout();
        assert_eq!(layout.state_of(0).map(|d| d.code), Some(0));
        assert_eq!(layout.state_of(4).map(|d| d.code), Some(1));
        assert_eq!(layout.state_of(6).map(|d| d.code), Some(1));
        assert_eq!(layout.state_of(11).map(|d| d.code), Some(10));
    }

    #[test]
    fn gaps_belong_to_nobody() {
        let layout = layout();
        assert_eq!(layout.state_of(7), None);
        assert_eq!(layout.state_of(12), None);
        assert_eq!(ActionLayout::empty().state_of(0), None);
    }
}
