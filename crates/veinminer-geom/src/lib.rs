//! Lattice positions, block boxes and the 26-cell neighbourhood.
#![forbid(unsafe_code)]

use core::fmt;
use core::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Integer block coordinate in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const ORIGIN: BlockPos = BlockPos::new(0, 0, 0);

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Chebyshev distance; 1 means the two cells touch by face, edge or corner.
    #[inline]
    pub fn chebyshev(self, other: BlockPos) -> u32 {
        self.x
            .abs_diff(other.x)
            .max(self.y.abs_diff(other.y))
            .max(self.z.abs_diff(other.z))
    }

    #[inline]
    pub fn is_adjacent26(self, other: BlockPos) -> bool {
        self.chebyshev(other) == 1
    }

    /// `None` when any axis leaves the i32 lattice.
    #[inline]
    pub fn checked_offset(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            z: self.z.checked_add(dz)?,
        })
    }

    /// Iterates the surrounding cells in [`NEIGHBORS_26`] order. Cells past the
    /// edge of the i32 lattice are skipped, so fewer than 26 come back there.
    #[inline]
    pub fn neighbors26(self) -> impl Iterator<Item = BlockPos> {
        NEIGHBORS_26
            .into_iter()
            .filter_map(move |d| self.checked_offset(d.x, d.y, d.z))
    }

    /// World-space centre of the cell, where dropped items appear.
    #[inline]
    pub fn center(self) -> Vec3 {
        Vec3::new(
            self.x as f32 + 0.5,
            self.y as f32 + 0.5,
            self.z as f32 + 0.5,
        )
    }
}

impl Add for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn add(self, rhs: BlockPos) -> BlockPos {
        self.offset(rhs.x, rhs.y, rhs.z)
    }
}

impl Sub for BlockPos {
    type Output = BlockPos;
    #[inline]
    fn sub(self, rhs: BlockPos) -> BlockPos {
        self.offset(-rhs.x, -rhs.y, -rhs.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<[i32; 3]> for BlockPos {
    fn from(value: [i32; 3]) -> Self {
        Self::new(value[0], value[1], value[2])
    }
}

impl From<BlockPos> for [i32; 3] {
    fn from(value: BlockPos) -> Self {
        [value.x, value.y, value.z]
    }
}

/// Offsets of the 3x3x3 cube minus its centre, lexicographic over (dx, dy, dz).
pub const NEIGHBORS_26: [BlockPos; 26] = neighbors_26();

const fn neighbors_26() -> [BlockPos; 26] {
    let mut out = [BlockPos::ORIGIN; 26];
    let mut i = 0;
    let mut n = 0;
    while i < 27 {
        let dx = (i / 9) as i32 - 1;
        let dy = ((i / 3) % 3) as i32 - 1;
        let dz = (i % 3) as i32 - 1;
        if dx != 0 || dy != 0 || dz != 0 {
            out[n] = BlockPos::new(dx, dy, dz);
            n += 1;
        }
        i += 1;
    }
    out
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

/// Inclusive box of block cells. Corners may be given in any order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct BlockBox {
    pub min: BlockPos,
    pub max: BlockPos,
}

impl BlockBox {
    pub fn new(a: BlockPos, b: BlockPos) -> Self {
        Self {
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    #[inline]
    pub fn contains(&self, p: BlockPos) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Cells in y, z, x order.
    pub fn cells(&self) -> impl Iterator<Item = BlockPos> + '_ {
        let b = BlockBox::new(self.min, self.max);
        (b.min.y..=b.max.y).flat_map(move |y| {
            (b.min.z..=b.max.z)
                .flat_map(move |z| (b.min.x..=b.max.x).map(move |x| BlockPos::new(x, y, z)))
        })
    }

    pub fn volume(&self) -> u64 {
        let b = BlockBox::new(self.min, self.max);
        let w = u64::from(b.max.x.abs_diff(b.min.x)) + 1;
        let h = u64::from(b.max.y.abs_diff(b.min.y)) + 1;
        let d = u64::from(b.max.z.abs_diff(b.min.z)) + 1;
        w.saturating_mul(h).saturating_mul(d)
    }
}
