use veinminer_blocks::{MaterialCatalog, MaterialId};
use veinminer_geom::BlockPos;

use crate::host::{PlayerId, VeinHost};
use crate::resolve::{MineResolver, ResolutionSummary};
use crate::tool::ToolState;
use crate::vein::VeinFinder;
use crate::xp::{RandomXp, XpRoll};

/// A player-initiated break as delivered by the server, before the block is removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockBreak {
    pub pos: BlockPos,
    pub material: MaterialId,
    pub player: PlayerId,
    pub tool: ToolState,
}

/// Break-event entry point: filters non-ore breaks, finds the vein, resolves it.
pub struct VeinMiner<X = RandomXp> {
    catalog: MaterialCatalog,
    finder: VeinFinder,
    xp: X,
    enabled: bool,
}

impl<X: XpRoll> VeinMiner<X> {
    /// Starts disabled; call [`VeinMiner::enable`] once the server is ready.
    pub fn new(catalog: MaterialCatalog, xp: X) -> Self {
        let finder = VeinFinder::new(catalog.max_vein_size);
        Self {
            catalog,
            finder,
            xp,
            enabled: false,
        }
    }

    pub fn with_max_vein_size(mut self, max: usize) -> Self {
        self.finder = VeinFinder::new(max);
        self
    }

    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    pub fn max_vein_size(&self) -> usize {
        self.finder.max_size()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        log::info!(
            "vein miner enabled ({} ores, max vein size {})",
            self.catalog.ores().count(),
            self.finder.max_size()
        );
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        log::info!("vein miner disabled");
    }

    /// `None` when disabled or the broken block is not an ore. The seed itself is
    /// left to the server's own break pipeline.
    pub fn on_block_break<H: VeinHost + ?Sized>(
        &mut self,
        ev: &BlockBreak,
        host: &mut H,
    ) -> Option<ResolutionSummary> {
        if !self.enabled || !self.catalog.is_ore(ev.material) {
            return None;
        }
        let vein = {
            let view = |p: BlockPos| host.material_at(p);
            self.finder.find(ev.pos, ev.material, &view)
        };
        log::debug!(
            "{:?} broke {} at {}; vein of {} cell(s)",
            ev.player,
            self.catalog.key(ev.material),
            ev.pos,
            vein.len()
        );

        let mut resolver = MineResolver::new(&self.catalog, &mut self.xp);
        let summary = resolver.resolve(&vein, &ev.tool, ev.player, host);

        log::info!("vein miner processed {} blocks", vein.len());
        if summary.denied > 0 || !summary.failures.is_empty() {
            log::debug!(
                "vein at {}: {} broken, {} denied, {} failure(s)",
                ev.pos,
                summary.processed,
                summary.denied,
                summary.failures.len()
            );
        }
        Some(summary)
    }
}
