use serde::{Deserialize, Serialize};
use thiserror::Error;
use veinminer_blocks::MaterialId;
use veinminer_geom::{BlockPos, Vec3};

use crate::tool::ToolState;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// What a host-side normal break produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DropEffects {
    pub drops: Vec<(MaterialId, u32)>,
    pub tool_damage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("block {0} is outside the world")]
    OutOfWorld(BlockPos),
    #[error("unknown player {0:?}")]
    UnknownPlayer(PlayerId),
    #[error("host rejected the operation: {0}")]
    Rejected(String),
}

/// Game-server capabilities used while mining a vein.
pub trait VeinHost {
    fn material_at(&self, pos: BlockPos) -> MaterialId;

    /// Dry run of the server's own break validation (protection, cancellation) for `player` at `pos`.
    fn request_break_permission(&mut self, pos: BlockPos, player: PlayerId) -> bool;

    /// Direct credit, no orb entity.
    fn grant_experience(&mut self, player: PlayerId, amount: u32) -> Result<(), HostError>;

    /// Standard break: drop table plus tool wear.
    fn break_naturally(&mut self, pos: BlockPos, tool: &ToolState) -> Result<DropEffects, HostError>;

    fn set_empty(&mut self, pos: BlockPos) -> Result<(), HostError>;

    fn spawn_dropped_item(
        &mut self,
        material: MaterialId,
        at: Vec3,
        quantity: u32,
    ) -> Result<(), HostError>;
}
