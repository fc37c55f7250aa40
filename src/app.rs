use veinminer_blocks::MaterialId;
use veinminer_core::{PlayerId, ResolutionSummary, VeinMiner, XpRoll};
use veinminer_geom::BlockPos;

use crate::event::{Event, EventEnvelope, EventQueue};
use crate::scene::ScheduledBreak;
use crate::server::Server;

/// One vein mined on behalf of a player.
#[derive(Clone, Debug)]
pub struct VeinReport {
    pub tick: u64,
    pub player: PlayerId,
    pub seed: BlockPos,
    pub material: MaterialId,
    pub summary: ResolutionSummary,
}

pub struct App<X> {
    pub server: Server,
    pub miner: VeinMiner<X>,
    pub queue: EventQueue,
    pub reports: Vec<VeinReport>,
}

impl<X: XpRoll> App<X> {
    pub fn new(server: Server, miner: VeinMiner<X>, breaks: &[ScheduledBreak]) -> Self {
        let mut queue = EventQueue::new();
        for b in breaks {
            queue.emit_at(
                b.tick,
                Event::BlockBreakRequested {
                    player: b.player,
                    pos: b.pos,
                },
            );
        }
        Self {
            server,
            miner,
            queue,
            reports: Vec::new(),
        }
    }

    /// Drains the current tick, then advances.
    pub fn step(&mut self) {
        while let Some(env) = self.queue.pop_ready() {
            Self::log_event(&env);
            self.handle_event(env);
        }
        self.queue.advance_tick();
    }

    /// Runs until no events remain; returns the number of ticks stepped.
    pub fn run(&mut self) -> u64 {
        let start = self.queue.now;
        log::debug!("{} event(s) queued", self.queue.pending());
        while !self.queue.is_idle() {
            self.step();
        }
        self.queue.now - start
    }

    fn handle_event(&mut self, env: EventEnvelope) {
        match env.kind {
            Event::BlockBreakRequested { player, pos } => {
                let Some(ev) = self.server.begin_break(pos, player) else {
                    log::debug!(target: "events", "[tick {}] break at {} cancelled", env.tick, pos);
                    return;
                };
                // listeners run before the server removes the block
                if let Some(summary) = self.miner.on_block_break(&ev, &mut self.server) {
                    self.reports.push(VeinReport {
                        tick: env.tick,
                        player,
                        seed: pos,
                        material: ev.material,
                        summary,
                    });
                }
                if let Err(e) = self.server.finish_break(&ev) {
                    log::warn!("break at {} failed: {}", pos, e);
                }
            }
        }
    }

    fn log_event(env: &EventEnvelope) {
        match &env.kind {
            Event::BlockBreakRequested { player, pos } => {
                log::info!(target: "events", "[tick {}] #{} BlockBreakRequested {:?} at {}", env.tick, env.id, player, pos);
            }
        }
    }
}
