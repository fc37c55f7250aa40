use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use veinminer_blocks::{MaterialCatalog, MaterialId};
use veinminer_core::{PlayerId, ToolState};
use veinminer_geom::{BlockBox, BlockPos};
use veinminer_world::World;

use crate::server::{Claim, Server};

// Top-level scene file: a world, the people in it, and what they break when
#[derive(Deserialize, Debug, Default)]
pub struct SceneConfig {
    #[serde(default)]
    pub world: WorldDef,
    #[serde(default)]
    pub blocks: Vec<BlockPlacement>,
    #[serde(default)]
    pub players: Vec<PlayerDef>,
    #[serde(default)]
    pub claims: Vec<ClaimDef>,
    #[serde(default)]
    pub breaks: Vec<BreakDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct WorldDef {
    #[serde(default = "default_min_y")]
    pub min_y: i32,
    #[serde(default = "default_max_y")]
    pub max_y: i32,
    #[serde(default)]
    pub surface_y: i32,
    #[serde(default = "default_fill")]
    pub fill: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: i32,
}

impl Default for WorldDef {
    fn default() -> Self {
        Self {
            min_y: default_min_y(),
            max_y: default_max_y(),
            surface_y: 0,
            fill: default_fill(),
            chunk_size: default_chunk_size(),
        }
    }
}

// Either a single cell (`at`) or an inclusive cuboid (`from`/`to`)
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum BlockPlacement {
    Single {
        material: String,
        at: BlockPos,
    },
    Cuboid {
        material: String,
        from: BlockPos,
        to: BlockPos,
    },
}

#[derive(Deserialize, Debug, Clone)]
pub struct PlayerDef {
    pub name: String,
    #[serde(default)]
    pub tool: ToolState,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ClaimDef {
    pub owner: String,
    pub from: BlockPos,
    pub to: BlockPos,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BreakDef {
    #[serde(default)]
    pub tick: u64,
    pub player: String,
    pub at: BlockPos,
}

/// A break resolved against the player table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledBreak {
    pub tick: u64,
    pub player: PlayerId,
    pub pos: BlockPos,
}

fn default_min_y() -> i32 {
    -64
}
fn default_max_y() -> i32 {
    319
}
fn default_fill() -> String {
    "stone".into()
}
fn default_chunk_size() -> i32 {
    16
}

impl SceneConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Builds the server and the break schedule. Unknown material or player names are errors.
    pub fn build(
        &self,
        catalog: MaterialCatalog,
    ) -> Result<(Server, Vec<ScheduledBreak>), Box<dyn Error>> {
        let material = |key: &str| -> Result<MaterialId, Box<dyn Error>> {
            catalog
                .get_id(key)
                .ok_or_else(|| format!("scene: unknown material `{key}`").into())
        };

        let w = &self.world;
        if w.chunk_size <= 0 {
            return Err(format!("scene: chunk_size must be positive, got {}", w.chunk_size).into());
        }
        let mut world = World::new(w.chunk_size, w.chunk_size, w.chunk_size)
            .with_height(w.min_y, w.max_y)
            .with_fill(material(&w.fill)?, w.surface_y);
        for b in &self.blocks {
            match b {
                BlockPlacement::Single { material: m, at } => {
                    if !world.set(*at, material(m)?) {
                        log::warn!("scene: {} at {} is outside the world", m, at);
                    }
                }
                BlockPlacement::Cuboid { material: m, from, to } => {
                    let bx = BlockBox::new(*from, *to);
                    let written = world.fill_box(bx, material(m)?);
                    let clipped = bx.volume() - written as u64;
                    if clipped > 0 {
                        log::warn!("scene: {} {} cell(s) clipped by world height", clipped, m);
                    }
                }
            }
        }

        let mut server = Server::new(world, catalog);
        for p in &self.players {
            if server.player_by_name(&p.name).is_some() {
                return Err(format!("scene: duplicate player `{}`", p.name).into());
            }
            server.add_player(&p.name, p.tool.clone());
        }
        let player = |server: &Server, name: &str| -> Result<PlayerId, Box<dyn Error>> {
            server
                .player_by_name(name)
                .ok_or_else(|| format!("scene: unknown player `{name}`").into())
        };
        for c in &self.claims {
            let owner = player(&server, &c.owner)?;
            server.claims.push(Claim {
                owner,
                area: BlockBox::new(c.from, c.to),
            });
        }
        let mut breaks = Vec::with_capacity(self.breaks.len());
        for b in &self.breaks {
            breaks.push(ScheduledBreak {
                tick: b.tick,
                player: player(&server, &b.player)?,
                pos: b.at,
            });
        }
        Ok((server, breaks))
    }
}
