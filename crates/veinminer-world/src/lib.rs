//! Sparse chunked block storage with build height limits.
#![forbid(unsafe_code)]

use std::collections::HashMap;

use veinminer_blocks::MaterialId;
use veinminer_geom::{BlockBox, BlockPos};

pub type ChunkKey = (i32, i32, i32);

#[derive(Default, Debug, Clone, Copy)]
pub struct WorldStats {
    pub chunk_entries: usize,
    pub block_edits: usize,
}

/// Chunk-keyed world: explicit cells are stored, everything else is implied
/// by the fill material below `surface_y` and air above it.
pub struct World {
    sx: i32,
    sy: i32,
    sz: i32,
    min_y: i32,
    max_y: i32,
    surface_y: i32,
    fill: MaterialId,
    // key=(cx,cy,cz) -> world coords -> material
    inner: HashMap<ChunkKey, HashMap<BlockPos, MaterialId>>,
}

impl World {
    pub fn new(sx: i32, sy: i32, sz: i32) -> Self {
        Self {
            sx: sx.max(1),
            sy: sy.max(1),
            sz: sz.max(1),
            min_y: i32::MIN,
            max_y: i32::MAX,
            surface_y: i32::MIN,
            fill: MaterialId::AIR,
            inner: HashMap::new(),
        }
    }

    /// Inclusive build limits; cells outside read as air and reject writes.
    pub fn with_height(mut self, min_y: i32, max_y: i32) -> Self {
        self.min_y = min_y.min(max_y);
        self.max_y = max_y.max(min_y);
        self
    }

    /// Unedited cells at or below `surface_y` read as `fill`.
    pub fn with_fill(mut self, fill: MaterialId, surface_y: i32) -> Self {
        self.fill = fill;
        self.surface_y = surface_y;
        self
    }

    #[inline]
    pub fn in_height(&self, p: BlockPos) -> bool {
        p.y >= self.min_y && p.y <= self.max_y
    }

    #[inline]
    fn chunk_key(&self, p: BlockPos) -> ChunkKey {
        (
            p.x.div_euclid(self.sx),
            p.y.div_euclid(self.sy),
            p.z.div_euclid(self.sz),
        )
    }

    pub fn get(&self, p: BlockPos) -> MaterialId {
        if !self.in_height(p) {
            return MaterialId::AIR;
        }
        let k = self.chunk_key(p);
        if let Some(m) = self.inner.get(&k).and_then(|c| c.get(&p)) {
            return *m;
        }
        if p.y <= self.surface_y {
            self.fill
        } else {
            MaterialId::AIR
        }
    }

    /// Stores `m` at `p`. `false` outside the height limits.
    pub fn set(&mut self, p: BlockPos, m: MaterialId) -> bool {
        if !self.in_height(p) {
            return false;
        }
        let k = self.chunk_key(p);
        self.inner.entry(k).or_default().insert(p, m);
        true
    }

    /// Returns how many cells were written.
    pub fn fill_box(&mut self, bx: BlockBox, m: MaterialId) -> usize {
        let mut n = 0;
        for p in bx.cells() {
            if self.set(p, m) {
                n += 1;
            }
        }
        n
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            chunk_entries: self.inner.len(),
            block_edits: self.inner.values().map(|m| m.len()).sum(),
        }
    }
}
