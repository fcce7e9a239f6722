//! Append-only event sink filled by behaviours during a frame.
//!
//! Handlers push events while they run; an external consumer drains the
//! queue between frames. Nothing in the core waits for delivery.

use std::fmt;

/// Sound effect identifier resolved by the audio layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SoundId(pub u16);

impl SoundId {
    /// First step of the walk cycle; the second step is [`SoundId::next`].
    pub const AMPTON_WALK: Self = Self(40);
    pub const ROBOT_STUN: Self = Self(42);
    pub const ORBATRIX_BUMP: Self = Self(50);
    pub const GRABBITER_HUNGRY: Self = Self(60);
    pub const GRABBITER_SLEEP: Self = Self(61);
    pub const SHOT_HIT: Self = Self(10);

    /// The sound one step after this one in the sound table.
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sound#{}", self.0)
    }
}

/// Key into the external string table for dialog text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DialogKey(pub &'static str);

impl DialogKey {
    pub const GRABBITER_HUNGRY: Self = Self("GRABBITER_HUNGRY");
    pub const GRABBITER_SLEEPY: Self = Self("GRABBITER_SLEEPY");
}

impl fmt::Display for DialogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Something a behaviour wants the outside world to react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Sound(SoundId),
    Dialog(DialogKey),
    /// A trigger tile (switch) was activated at tile coordinates `(x, y)`.
    TileTrigger { x: i32, y: i32 },
}

/// FIFO of events produced during the current frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventQueue {
    events: Vec<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, event: Event) {
        tracing::trace!(?event, "event appended");
        self.events.push(event);
    }

    pub fn play(&mut self, sound: SoundId) {
        self.append(Event::Sound(sound));
    }

    pub fn dialog(&mut self, key: DialogKey) {
        self.append(Event::Dialog(key));
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Hands every pending event to the consumer, oldest first.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Event> {
        self.events.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_append_order() {
        let mut queue = EventQueue::new();
        queue.play(SoundId::GRABBITER_HUNGRY);
        queue.dialog(DialogKey::GRABBITER_HUNGRY);
        queue.append(Event::TileTrigger { x: 1, y: 2 });

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(
            drained,
            vec![
                Event::Sound(SoundId::GRABBITER_HUNGRY),
                Event::Dialog(DialogKey::GRABBITER_HUNGRY),
                Event::TileTrigger { x: 1, y: 2 },
            ]
        );
        assert!(queue.is_empty());
    }
}
