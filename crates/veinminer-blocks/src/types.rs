use std::fmt;

/// Opaque block substance id. `0` is always air.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, PartialOrd, Ord)]
pub struct MaterialId(pub u16);

impl MaterialId {
    pub const AIR: MaterialId = MaterialId(0);

    #[inline]
    pub fn is_air(self) -> bool {
        self == Self::AIR
    }
}

/// Closed experience interval `[min, max]`; `min <= max` always holds.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct XpRange {
    min: u32,
    max: u32,
}

impl XpRange {
    /// `None` when the bounds are inverted.
    pub const fn new(min: u32, max: u32) -> Option<Self> {
        if min <= max {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub const fn constant(value: u32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    #[inline]
    pub const fn min(self) -> u32 {
        self.min
    }

    #[inline]
    pub const fn max(self) -> u32 {
        self.max
    }

    #[inline]
    pub const fn is_constant(self) -> bool {
        self.min == self.max
    }
}

impl fmt::Display for XpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}
