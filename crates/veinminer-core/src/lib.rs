//! Vein discovery and bulk break resolution.
//!
//! Everything here runs synchronously on the thread that delivered the break
//! event. The finder and resolver keep no state between events and take no
//! locks; callers that dispatch break events in parallel must serialize world
//! mutation themselves.
#![forbid(unsafe_code)]

pub mod host;
pub mod miner;
pub mod resolve;
pub mod tool;
pub mod vein;
pub mod xp;

#[cfg(test)]
mod tests;

pub use host::{DropEffects, HostError, PlayerId, VeinHost};
pub use miner::{BlockBreak, VeinMiner};
pub use resolve::{BlockFailure, MineResolver, ResolutionSummary};
pub use tool::{Enchantment, ToolState};
pub use vein::{Vein, VeinFinder, WorldView, find_vein};
pub use xp::{RandomXp, XpRoll, experience_for};

pub use veinminer_blocks::DEFAULT_MAX_VEIN_SIZE as MAX_VEIN_SIZE;
