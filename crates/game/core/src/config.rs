/// Simulation constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Game difficulty; some species scale their health with it.
    pub difficulty: Difficulty,

    /// Frames a defeated actor stays stunned before it is swept.
    pub stun_duration: u32,

    /// Acceleration and terminal velocity per gravity tier.
    pub gravity: GravityTable,
}

impl SimConfig {
    // ===== compile-time constants =====
    /// Coordinate shift factor: one tile spans `1 << CSF` sub-units.
    pub const CSF: u32 = 9;
    /// Tile edge length in sub-units.
    pub const TILE: i32 = 1 << Self::CSF;
    /// Shift between sub-units and screen pixels (16 pixels per tile).
    pub const PIXEL_SHIFT: u32 = Self::CSF - 4;
    /// Upper bound on the live actor container, also enforced on restore.
    pub const MAX_ACTORS: usize = 512;
    /// Plane holding collision-relevant foreground tiles.
    pub const FOREGROUND_PLANE: u8 = 1;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_STUN_DURATION: u32 = 600;

    pub fn new() -> Self {
        Self {
            difficulty: Difficulty::default(),
            stun_duration: Self::DEFAULT_STUN_DURATION,
            gravity: GravityTable::default(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_stun_duration(mut self, stun_duration: u32) -> Self {
        self.stun_duration = stun_duration;
        self
    }

    /// Converts whole tiles into sub-units.
    #[inline]
    pub const fn tiles(count: i32) -> i32 {
        count << Self::CSF
    }

    /// Converts screen pixels into sub-units.
    #[inline]
    pub const fn pixels(count: i32) -> i32 {
        count << Self::PIXEL_SHIFT
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Difficulty selected for the session.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
    Ninja,
    Elite,
}

/// Gravity strength applied by [`crate::physics::apply_gravity`].
///
/// `Mid` is the standard walker tier and `High` the heavy tier used by
/// bouncing bodies. `Low` is the weak hover tier. No built-in species
/// falls under it; it is only reachable through configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GravityTier {
    Low,
    Mid,
    High,
}

/// Per-tier gravity parameters in sub-units per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GravityParams {
    pub acceleration: i32,
    pub terminal_velocity: i32,
}

impl GravityParams {
    pub const fn new(acceleration: i32, terminal_velocity: i32) -> Self {
        Self {
            acceleration,
            terminal_velocity,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GravityTable {
    pub low: GravityParams,
    pub mid: GravityParams,
    pub high: GravityParams,
}

impl GravityTable {
    pub fn params(&self, tier: GravityTier) -> GravityParams {
        match tier {
            GravityTier::Low => self.low,
            GravityTier::Mid => self.mid,
            GravityTier::High => self.high,
        }
    }
}

impl Default for GravityTable {
    fn default() -> Self {
        Self {
            low: GravityParams::new(2, 40),
            mid: GravityParams::new(5, 120),
            high: GravityParams::new(8, 160),
        }
    }
}
