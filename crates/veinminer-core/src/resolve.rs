use veinminer_blocks::MaterialCatalog;
use veinminer_geom::BlockPos;

use crate::host::{HostError, PlayerId, VeinHost};
use crate::tool::ToolState;
use crate::vein::Vein;
use crate::xp::{XpRoll, experience_for};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockFailure {
    pub pos: BlockPos,
    pub error: HostError,
}

/// Outcome counters for one vein. Informational only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolutionSummary {
    // Permitted cells whose mutation went through.
    pub processed: usize,
    pub denied: usize,
    pub experience: u32,
    pub failures: Vec<BlockFailure>,
}

/// Applies the per-block break policy to every non-seed cell of a vein.
pub struct MineResolver<'a, X> {
    catalog: &'a MaterialCatalog,
    xp: X,
}

impl<'a, X: XpRoll> MineResolver<'a, X> {
    pub fn new(catalog: &'a MaterialCatalog, xp: X) -> Self {
        Self { catalog, xp }
    }

    /// Experience and block mutation are independent: a failure in one neither
    /// suppresses nor rolls back the other.
    pub fn resolve<H: VeinHost + ?Sized>(
        &mut self,
        vein: &Vein,
        tool: &ToolState,
        breaker: PlayerId,
        host: &mut H,
    ) -> ResolutionSummary {
        let silk = tool.has_silk_touch();
        let mut summary = ResolutionSummary::default();

        for &pos in vein.rest() {
            if !host.request_break_permission(pos, breaker) {
                log::trace!("break at {} denied for {:?}", pos, breaker);
                summary.denied += 1;
                continue;
            }
            let material = host.material_at(pos);

            if !silk {
                let range = self.catalog.experience_range_for(material);
                let amount = experience_for(range, &mut self.xp);
                match host.grant_experience(breaker, amount) {
                    Ok(()) => summary.experience = summary.experience.saturating_add(amount),
                    Err(error) => {
                        log::warn!("experience grant at {} failed: {}", pos, error);
                        summary.failures.push(BlockFailure { pos, error });
                    }
                }
            }

            let mutation = if silk {
                host.set_empty(pos)
                    .and_then(|()| host.spawn_dropped_item(material, pos.center(), 1))
            } else {
                host.break_naturally(pos, tool).map(|fx| {
                    log::trace!(
                        "broke {} at {}: {} drop stack(s), tool damage {}",
                        self.catalog.key(material),
                        pos,
                        fx.drops.len(),
                        fx.tool_damage
                    );
                })
            };
            match mutation {
                Ok(()) => summary.processed += 1,
                Err(error) => {
                    log::warn!("break at {} failed: {}", pos, error);
                    summary.failures.push(BlockFailure { pos, error });
                }
            }
        }
        summary
    }
}
