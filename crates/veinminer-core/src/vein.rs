use std::collections::VecDeque;

use hashbrown::HashSet;
use veinminer_blocks::MaterialId;
use veinminer_geom::BlockPos;

/// Read-only material lookup. Must answer consistently for the duration of one search.
pub trait WorldView {
    fn material_at(&self, pos: BlockPos) -> MaterialId;
}

impl<F> WorldView for F
where
    F: Fn(BlockPos) -> MaterialId,
{
    #[inline]
    fn material_at(&self, pos: BlockPos) -> MaterialId {
        self(pos)
    }
}

/// Connected same-material cells in discovery order. Never empty; index 0 is the seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vein {
    material: MaterialId,
    cells: Vec<BlockPos>,
}

impl Vein {
    #[inline]
    pub fn seed(&self) -> BlockPos {
        self.cells[0]
    }

    #[inline]
    pub fn material(&self) -> MaterialId {
        self.material
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> &[BlockPos] {
        &self.cells
    }

    /// Everything but the seed.
    #[inline]
    pub fn rest(&self) -> &[BlockPos] {
        &self.cells[1..]
    }
}

/// Bounded breadth-first search over the 26-neighbourhood.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VeinFinder {
    max_size: usize,
}

impl VeinFinder {
    /// A cap of zero still yields the seed.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size: max_size.max(1),
        }
    }

    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// `target` is assumed to be the material at `seed`; the seed itself is never looked up.
    /// Performs at most `26 * max_size` lookups.
    pub fn find<W: WorldView + ?Sized>(&self, seed: BlockPos, target: MaterialId, world: &W) -> Vein {
        let mut cells = Vec::with_capacity(self.max_size.min(256));
        let mut visited: HashSet<BlockPos> = HashSet::new();
        let mut frontier = VecDeque::new();
        cells.push(seed);
        visited.insert(seed);
        frontier.push_back(seed);

        while cells.len() < self.max_size {
            let Some(cur) = frontier.pop_front() else {
                break;
            };
            for n in cur.neighbors26() {
                if world.material_at(n) != target || !visited.insert(n) {
                    continue;
                }
                cells.push(n);
                frontier.push_back(n);
                if cells.len() >= self.max_size {
                    return Vein {
                        material: target,
                        cells,
                    };
                }
            }
        }
        Vein {
            material: target,
            cells,
        }
    }
}

pub fn find_vein<W: WorldView + ?Sized>(
    seed: BlockPos,
    target: MaterialId,
    world: &W,
    max_size: usize,
) -> Vein {
    VeinFinder::new(max_size).find(seed, target, world)
}
