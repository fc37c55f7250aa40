use std::collections::BTreeMap;

use hashbrown::HashMap;
use veinminer_blocks::{MaterialCatalog, MaterialId};
use veinminer_core::{
    BlockBreak, DropEffects, HostError, PlayerId, RandomXp, ToolState, VeinHost, experience_for,
};
use veinminer_geom::{BlockBox, BlockPos, Vec3};
use veinminer_world::World;

pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub experience: u32,
    pub tool: ToolState,
}

impl Player {
    pub fn new(id: PlayerId, name: String, tool: ToolState) -> Self {
        Self {
            id,
            name,
            experience: 0,
            tool,
        }
    }
}

/// Protected area; only the owner may break blocks inside.
#[derive(Clone, Copy, Debug)]
pub struct Claim {
    pub owner: PlayerId,
    pub area: BlockBox,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ItemEntity {
    pub material: MaterialId,
    pub pos: Vec3,
    pub count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExperienceOrb {
    pub pos: Vec3,
    pub amount: u32,
}

#[derive(Default, Debug, Clone, Copy)]
pub struct ServerStats {
    pub blocks_broken: usize,
    pub breaks_cancelled: usize,
    pub tool_damage: u32,
}

/// In-process game server: the host side of vein mining.
pub struct Server {
    pub world: World,
    pub catalog: MaterialCatalog,
    pub players: BTreeMap<PlayerId, Player>,
    pub claims: Vec<Claim>,
    pub items: Vec<ItemEntity>,
    pub orbs: Vec<ExperienceOrb>,
    pub stats: ServerStats,
    by_name: HashMap<String, PlayerId>,
    orb_xp: RandomXp,
}

impl Server {
    pub fn new(world: World, catalog: MaterialCatalog) -> Self {
        Self {
            world,
            catalog,
            players: BTreeMap::new(),
            claims: Vec::new(),
            items: Vec::new(),
            orbs: Vec::new(),
            stats: ServerStats::default(),
            by_name: HashMap::new(),
            orb_xp: RandomXp::from_os_rng(),
        }
    }

    /// Seeds the server's own orb rolls so runs are reproducible.
    pub fn with_orb_seed(mut self, seed: u64) -> Self {
        self.orb_xp = RandomXp::seeded(seed);
        self
    }

    pub fn add_player(&mut self, name: &str, tool: ToolState) -> PlayerId {
        if let Some(id) = self.player_by_name(name) {
            return id;
        }
        let id = PlayerId(self.players.len() as u32 + 1);
        self.players.insert(id, Player::new(id, name.to_string(), tool));
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn player_by_name(&self, name: &str) -> Option<PlayerId> {
        self.by_name.get(name).copied()
    }

    pub fn player_name(&self, id: PlayerId) -> &str {
        self.players.get(&id).map(|p| p.name.as_str()).unwrap_or("?")
    }

    /// The server's own protection rules, shared by real and dry-run breaks.
    pub fn may_break(&self, pos: BlockPos, player: PlayerId) -> bool {
        self.players.contains_key(&player)
            && self.world.in_height(pos)
            && !self
                .claims
                .iter()
                .any(|c| c.owner != player && c.area.contains(pos))
    }

    /// Validates a player's break and, if allowed, builds the event to hand to listeners.
    pub fn begin_break(&mut self, pos: BlockPos, player: PlayerId) -> Option<BlockBreak> {
        let material = self.world.get(pos);
        if material.is_air() || !self.may_break(pos, player) {
            self.stats.breaks_cancelled += 1;
            return None;
        }
        let tool = self.players.get(&player)?.tool.clone();
        Some(BlockBreak {
            pos,
            material,
            player,
            tool,
        })
    }

    /// Default break pipeline for the block the player actually hit: drops plus an orb.
    pub fn finish_break(&mut self, ev: &BlockBreak) -> Result<(), HostError> {
        let material = self.world.get(ev.pos);
        if ev.tool.has_silk_touch() {
            self.set_empty(ev.pos)?;
            return self.spawn_dropped_item(material, ev.pos.center(), 1);
        }
        self.break_naturally(ev.pos, &ev.tool)?;
        let amount = experience_for(self.catalog.experience_range_for(material), &mut self.orb_xp);
        if amount > 0 {
            self.orbs.push(ExperienceOrb {
                pos: ev.pos.center(),
                amount,
            });
        }
        Ok(())
    }

    /// Items on the ground summed per material.
    pub fn item_totals(&self) -> BTreeMap<MaterialId, u32> {
        let mut out = BTreeMap::new();
        for it in &self.items {
            *out.entry(it.material).or_insert(0) += it.count;
        }
        out
    }
}

impl VeinHost for Server {
    fn material_at(&self, pos: BlockPos) -> MaterialId {
        self.world.get(pos)
    }

    fn request_break_permission(&mut self, pos: BlockPos, player: PlayerId) -> bool {
        self.may_break(pos, player)
    }

    fn grant_experience(&mut self, player: PlayerId, amount: u32) -> Result<(), HostError> {
        let p = self
            .players
            .get_mut(&player)
            .ok_or(HostError::UnknownPlayer(player))?;
        p.experience = p.experience.saturating_add(amount);
        Ok(())
    }

    fn break_naturally(&mut self, pos: BlockPos, tool: &ToolState) -> Result<DropEffects, HostError> {
        let material = self.world.get(pos);
        if material.is_air() {
            return Ok(DropEffects::default());
        }
        self.set_empty(pos)?;
        let drop = self.catalog.drop_for(material);
        self.items.push(ItemEntity {
            material: drop,
            pos: pos.center(),
            count: 1,
        });
        let tool_damage = u32::from(!tool.is_empty_hand());
        self.stats.tool_damage += tool_damage;
        Ok(DropEffects {
            drops: vec![(drop, 1)],
            tool_damage,
        })
    }

    fn set_empty(&mut self, pos: BlockPos) -> Result<(), HostError> {
        if !self.world.set(pos, MaterialId::AIR) {
            return Err(HostError::OutOfWorld(pos));
        }
        self.stats.blocks_broken += 1;
        Ok(())
    }

    fn spawn_dropped_item(&mut self, material: MaterialId, at: Vec3, quantity: u32) -> Result<(), HostError> {
        if material.is_air() {
            return Err(HostError::Rejected(format!("cannot drop air at {at}")));
        }
        self.items.push(ItemEntity {
            material,
            pos: at,
            count: quantity,
        });
        Ok(())
    }
}
