//! Display (screen layer) seam.
//!
//! The core needs two facts about the primary display: its rotation and its
//! size, from which the aspect correction for 90° rotation is derived. Both
//! are read once and cached until the destination changes.

mod cache;

pub use cache::DisplayCache;

/// Display rotation in 90° steps.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Parses an angle in degrees. Only multiples of 90 in `[0, 360)` are accepted.
    pub fn from_degrees(deg: i32) -> Option<Self> {
        match deg {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// Screen layer queries.
pub trait Display {
    fn rotation(&self) -> Rotation;
    /// Physical screen size `(width, height)`.
    fn screen_size(&self) -> (u32, u32);
}

/// Display with fixed properties.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedDisplay {
    pub rotation: Rotation,
    pub width: u32,
    pub height: u32,
}

impl FixedDisplay {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { rotation: Rotation::Deg0, width, height }
    }

    pub const fn rotated(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }
}

impl Display for FixedDisplay {
    fn rotation(&self) -> Rotation {
        self.rotation
    }

    fn screen_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
