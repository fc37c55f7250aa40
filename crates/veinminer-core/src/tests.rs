use super::*;
use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use veinminer_blocks::{MaterialCatalog, MaterialId, XpRange};
use veinminer_geom::{BlockPos, Vec3};

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Permission(BlockPos),
    Grant(PlayerId, u32),
    BreakNaturally(BlockPos),
    SetEmpty(BlockPos),
    Spawn(MaterialId, Vec3, u32),
}

/// Host double that records every capability call.
#[derive(Default)]
struct RecordingHost {
    blocks: HashMap<BlockPos, MaterialId>,
    fill: MaterialId,
    denied: HashSet<BlockPos>,
    failing: HashSet<BlockPos>,
    grant_fails: bool,
    calls: Vec<Call>,
}

impl RecordingHost {
    fn with_blocks(cat: &MaterialCatalog, cells: &[(BlockPos, MaterialId)]) -> Self {
        Self {
            blocks: cells.iter().copied().collect(),
            fill: id(cat, "stone"),
            ..Default::default()
        }
    }

    fn grants(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Grant(_, n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

impl VeinHost for RecordingHost {
    fn material_at(&self, pos: BlockPos) -> MaterialId {
        self.blocks.get(&pos).copied().unwrap_or(self.fill)
    }

    fn request_break_permission(&mut self, pos: BlockPos, _player: PlayerId) -> bool {
        self.calls.push(Call::Permission(pos));
        !self.denied.contains(&pos)
    }

    fn grant_experience(&mut self, player: PlayerId, amount: u32) -> Result<(), HostError> {
        self.calls.push(Call::Grant(player, amount));
        if self.grant_fails {
            return Err(HostError::UnknownPlayer(player));
        }
        Ok(())
    }

    fn break_naturally(&mut self, pos: BlockPos, _tool: &ToolState) -> Result<DropEffects, HostError> {
        self.calls.push(Call::BreakNaturally(pos));
        if self.failing.contains(&pos) {
            return Err(HostError::OutOfWorld(pos));
        }
        let m = self.blocks.insert(pos, MaterialId::AIR).unwrap_or(self.fill);
        Ok(DropEffects {
            drops: vec![(m, 1)],
            tool_damage: 1,
        })
    }

    fn set_empty(&mut self, pos: BlockPos) -> Result<(), HostError> {
        self.calls.push(Call::SetEmpty(pos));
        if self.failing.contains(&pos) {
            return Err(HostError::OutOfWorld(pos));
        }
        self.blocks.insert(pos, MaterialId::AIR);
        Ok(())
    }

    fn spawn_dropped_item(&mut self, material: MaterialId, at: Vec3, quantity: u32) -> Result<(), HostError> {
        self.calls.push(Call::Spawn(material, at, quantity));
        Ok(())
    }
}

/// Panics when asked to draw; proves constant and absent ranges never roll.
struct NoRoll;

impl XpRoll for NoRoll {
    fn roll(&mut self, range: XpRange) -> u32 {
        panic!("unexpected draw in {range}");
    }
}

const STONE: MaterialId = MaterialId(1);
const ORE: MaterialId = MaterialId(5);

fn catalog() -> MaterialCatalog {
    MaterialCatalog::from_toml_str(
        r#"
        materials = ["air", "stone"]

        [ores.iron_ore]
        xp = [0, 1]

        [ores.lapis_ore]
        xp = 3

        [ores.plain_ore]
    "#,
    )
    .unwrap()
}

fn id(cat: &MaterialCatalog, key: &str) -> MaterialId {
    cat.get_id(key).unwrap()
}

fn p(x: i32, y: i32, z: i32) -> BlockPos {
    BlockPos::new(x, y, z)
}

const ALEX: PlayerId = PlayerId(7);

fn pickaxe() -> ToolState {
    ToolState::new("iron_pickaxe")
}

fn silk_pickaxe() -> ToolState {
    ToolState::new("iron_pickaxe").with(Enchantment::SilkTouch)
}

fn iron_l(cat: &MaterialCatalog) -> RecordingHost {
    let iron = id(cat, "iron_ore");
    RecordingHost::with_blocks(cat, &[(p(0, 0, 0), iron), (p(1, 0, 0), iron), (p(1, 1, 0), iron)])
}

#[test]
fn end_to_end_iron_vein_order() {
    let cat = catalog();
    let host = iron_l(&cat);
    let vein = find_vein(p(0, 0, 0), id(&cat, "iron_ore"), &|q: BlockPos| host.material_at(q), 64);
    assert_eq!(vein.cells(), &[p(0, 0, 0), p(1, 0, 0), p(1, 1, 0)]);
    assert_eq!(vein.seed(), p(0, 0, 0));
    assert_eq!(vein.rest(), &[p(1, 0, 0), p(1, 1, 0)]);
}

#[test]
fn end_to_end_with_silk_touch() {
    let cat = catalog();
    let iron = id(&cat, "iron_ore");
    let mut host = iron_l(&cat);
    let vein = find_vein(p(0, 0, 0), iron, &|q: BlockPos| host.material_at(q), 64);
    let summary = MineResolver::new(&cat, NoRoll).resolve(&vein, &silk_pickaxe(), ALEX, &mut host);

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.experience, 0);
    assert!(host.grants().is_empty());
    assert_eq!(host.count(|c| matches!(c, Call::BreakNaturally(_))), 0);
    assert_eq!(
        host.calls,
        vec![
            Call::Permission(p(1, 0, 0)),
            Call::SetEmpty(p(1, 0, 0)),
            Call::Spawn(iron, p(1, 0, 0).center(), 1),
            Call::Permission(p(1, 1, 0)),
            Call::SetEmpty(p(1, 1, 0)),
            Call::Spawn(iron, p(1, 1, 0).center(), 1),
        ]
    );
    // seed untouched: the server breaks it itself
    assert_eq!(host.material_at(p(0, 0, 0)), iron);
    assert_eq!(host.material_at(p(1, 1, 0)), MaterialId::AIR);
}

#[test]
fn end_to_end_without_silk_touch() {
    let cat = catalog();
    let iron = id(&cat, "iron_ore");
    let mut host = iron_l(&cat);
    let vein = find_vein(p(0, 0, 0), iron, &|q: BlockPos| host.material_at(q), 64);
    let summary =
        MineResolver::new(&cat, RandomXp::seeded(11)).resolve(&vein, &pickaxe(), ALEX, &mut host);

    let grants = host.grants();
    assert_eq!(grants.len(), 2);
    assert!(grants.iter().all(|g| *g <= 1));
    assert_eq!(summary.experience, grants.iter().sum::<u32>());
    assert_eq!(host.count(|c| matches!(c, Call::BreakNaturally(_))), 2);
    assert_eq!(host.count(|c| matches!(c, Call::SetEmpty(_) | Call::Spawn(..))), 0);
    // experience is granted before the break of the same cell
    let first_grant = host.calls.iter().position(|c| matches!(c, Call::Grant(..))).unwrap();
    assert_eq!(host.calls[first_grant + 1], Call::BreakNaturally(p(1, 0, 0)));
}

#[test]
fn seeded_draws_are_reproducible() {
    let cat = catalog();
    let iron = id(&cat, "iron_ore");
    let run = || {
        let mut host = iron_l(&cat);
        let vein = find_vein(p(0, 0, 0), iron, &|q: BlockPos| host.material_at(q), 64);
        MineResolver::new(&cat, RandomXp::seeded(99)).resolve(&vein, &pickaxe(), ALEX, &mut host);
        host.grants()
    };
    assert_eq!(run(), run());
}

#[test]
fn constant_range_grants_exact_value_without_drawing() {
    let cat = catalog();
    let lapis = id(&cat, "lapis_ore");
    let mut host = RecordingHost::with_blocks(&cat, &[(p(0, 0, 0), lapis), (p(0, 1, 0), lapis), (p(1, 2, 1), lapis)]);
    let vein = find_vein(p(0, 0, 0), lapis, &|q: BlockPos| host.material_at(q), 64);
    let summary = MineResolver::new(&cat, NoRoll).resolve(&vein, &pickaxe(), ALEX, &mut host);
    assert_eq!(host.grants(), vec![3, 3]);
    assert_eq!(summary.experience, 6);
}

#[test]
fn ore_without_range_grants_zero() {
    let cat = catalog();
    let plain = id(&cat, "plain_ore");
    let mut host = RecordingHost::with_blocks(&cat, &[(p(0, 0, 0), plain), (p(-1, -1, -1), plain)]);
    let vein = find_vein(p(0, 0, 0), plain, &|q: BlockPos| host.material_at(q), 64);
    let summary = MineResolver::new(&cat, NoRoll).resolve(&vein, &pickaxe(), ALEX, &mut host);
    assert_eq!(host.grants(), vec![0]);
    assert_eq!(summary.experience, 0);
    assert_eq!(summary.processed, 1);
}

#[test]
fn denied_cells_are_skipped_and_processing_continues() {
    let cat = catalog();
    let iron = id(&cat, "iron_ore");
    let mut host = iron_l(&cat);
    host.denied.insert(p(1, 0, 0));
    let vein = find_vein(p(0, 0, 0), iron, &|q: BlockPos| host.material_at(q), 64);
    let summary = MineResolver::new(&cat, RandomXp::seeded(1)).resolve(&vein, &pickaxe(), ALEX, &mut host);

    assert_eq!(summary.denied, 1);
    assert_eq!(summary.processed, 1);
    assert_eq!(host.grants().len(), 1);
    // only the permission query touched the denied cell
    let touching: Vec<&Call> = host
        .calls
        .iter()
        .filter(|c| matches!(c, Call::Permission(q) | Call::BreakNaturally(q) | Call::SetEmpty(q) if *q == p(1, 0, 0)))
        .collect();
    assert_eq!(touching, vec![&Call::Permission(p(1, 0, 0))]);
    assert_eq!(host.material_at(p(1, 0, 0)), iron);
    assert_eq!(host.material_at(p(1, 1, 0)), MaterialId::AIR);
}

#[test]
fn mutation_failure_keeps_experience_and_continues() {
    let cat = catalog();
    let lapis = id(&cat, "lapis_ore");
    let mut host = RecordingHost::with_blocks(&cat, &[(p(0, 0, 0), lapis), (p(1, 0, 0), lapis), (p(2, 0, 0), lapis)]);
    host.failing.insert(p(1, 0, 0));
    let vein = find_vein(p(0, 0, 0), lapis, &|q: BlockPos| host.material_at(q), 64);
    let summary = MineResolver::new(&cat, NoRoll).resolve(&vein, &pickaxe(), ALEX, &mut host);

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.experience, 6);
    assert_eq!(
        summary.failures,
        vec![BlockFailure {
            pos: p(1, 0, 0),
            error: HostError::OutOfWorld(p(1, 0, 0)),
        }]
    );
    assert_eq!(host.material_at(p(2, 0, 0)), MaterialId::AIR);
}

#[test]
fn grant_failure_does_not_block_the_break() {
    let cat = catalog();
    let iron = id(&cat, "iron_ore");
    let mut host = iron_l(&cat);
    host.grant_fails = true;
    let vein = find_vein(p(0, 0, 0), iron, &|q: BlockPos| host.material_at(q), 64);
    let summary = MineResolver::new(&cat, RandomXp::seeded(5)).resolve(&vein, &pickaxe(), ALEX, &mut host);
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.experience, 0);
    assert_eq!(summary.failures.len(), 2);
    assert_eq!(host.count(|c| matches!(c, Call::BreakNaturally(_))), 2);
}

#[test]
fn empty_hand_never_counts_as_silk_touch() {
    let mut hand = ToolState::empty_hand();
    hand.enchantments.push(Enchantment::SilkTouch);
    assert!(!hand.has_silk_touch());
    assert!(silk_pickaxe().has_silk_touch());
    assert!(!pickaxe().has_silk_touch());
    assert!(!pickaxe().with(Enchantment::Fortune).has_silk_touch());
}

#[test]
fn tool_state_reads_from_toml() {
    let t: ToolState = toml::from_str(
        r#"
        item = "diamond_pickaxe"
        enchantments = ["silk_touch", "unbreaking"]
    "#,
    )
    .unwrap();
    assert!(t.has_silk_touch());
    assert!(t.has(Enchantment::Unbreaking));
    let bare: ToolState = toml::from_str("").unwrap();
    assert!(bare.is_empty_hand());
}

#[test]
fn isolated_seed_yields_singleton() {
    let iron = ORE;
    let vein = find_vein(p(3, 3, 3), iron, &|_q: BlockPos| STONE, 64);
    assert_eq!(vein.cells(), &[p(3, 3, 3)]);
    assert!(vein.rest().is_empty());
}

#[test]
fn solid_ore_body_truncates_at_cap() {
    let iron = ORE;
    let all_iron = |_q: BlockPos| iron;
    let a = find_vein(p(0, 0, 0), iron, &all_iron, 64);
    let b = find_vein(p(0, 0, 0), iron, &all_iron, 64);
    assert_eq!(a.len(), 64);
    assert_eq!(a, b);
    // first ring is the neighbour table in order
    assert_eq!(&a.cells()[1..27], &p(0, 0, 0).neighbors26().collect::<Vec<_>>()[..]);
}

#[test]
fn cap_stops_mid_enumeration() {
    let iron = ORE;
    let lookups = Cell::new(0usize);
    let counting = |_q: BlockPos| {
        lookups.set(lookups.get() + 1);
        iron
    };
    let vein = find_vein(p(0, 0, 0), iron, &counting, 3);
    assert_eq!(vein.cells(), &[p(0, 0, 0), p(-1, -1, -1), p(-1, -1, 0)]);
    assert_eq!(lookups.get(), 2);
}

#[test]
fn lookups_are_bounded() {
    let iron = ORE;
    let lookups = Cell::new(0usize);
    // checkerboard-ish sparse ore so the search runs long
    let sparse = |q: BlockPos| {
        lookups.set(lookups.get() + 1);
        if (q.x + q.y + q.z).rem_euclid(2) == 0 { iron } else { STONE }
    };
    for max in [1, 2, 10, 64] {
        lookups.set(0);
        let vein = find_vein(p(0, 0, 0), iron, &sparse, max);
        assert_eq!(vein.len(), max);
        assert!(lookups.get() <= 26 * max);
    }
}

#[test]
fn seed_on_lattice_edge_stays_on_its_side() {
    let seed = p(i32::MAX, 0, i32::MIN);
    let lone = find_vein(seed, ORE, &|_q: BlockPos| STONE, 64);
    assert_eq!(lone.cells(), &[seed]);

    let body = find_vein(seed, ORE, &|_q: BlockPos| ORE, 64);
    assert_eq!(body.len(), 64);
    assert_eq!(body.cells()[1], p(i32::MAX - 1, -1, i32::MIN));
    // no cell wrapped around to the far side of the world
    assert!(body.cells().iter().all(|c| c.x > i32::MAX - 64 && c.z < i32::MIN + 64));
}

#[test]
fn huge_experience_saturates_the_total() {
    let cat = MaterialCatalog::from_toml_str(
        r#"
        materials = ["stone"]

        [ores.star_ore]
        xp = 4294967295
    "#,
    )
    .unwrap();
    let star = id(&cat, "star_ore");
    let mut host = RecordingHost::with_blocks(&cat, &[(p(0, 0, 0), star), (p(1, 0, 0), star), (p(2, 0, 0), star)]);
    let vein = find_vein(p(0, 0, 0), star, &|q: BlockPos| host.material_at(q), 64);
    let summary = MineResolver::new(&cat, NoRoll).resolve(&vein, &pickaxe(), ALEX, &mut host);
    assert_eq!(host.grants(), vec![u32::MAX, u32::MAX]);
    assert_eq!(summary.experience, u32::MAX);
    assert_eq!(summary.processed, 2);
}

#[test]
fn zero_cap_still_returns_seed() {
    let vein = find_vein(p(0, 0, 0), ORE, &|_q: BlockPos| ORE, 0);
    assert_eq!(vein.cells(), &[p(0, 0, 0)]);
}

#[test]
fn miner_filters_non_ore_and_disabled() {
    let cat = catalog();
    let iron = id(&cat, "iron_ore");
    let stone_id = id(&cat, "stone");
    let mut host = iron_l(&cat);
    let mut miner = VeinMiner::new(cat, NoRoll);
    let ev = BlockBreak {
        pos: p(0, 0, 0),
        material: iron,
        player: ALEX,
        tool: silk_pickaxe(),
    };
    assert!(miner.on_block_break(&ev, &mut host).is_none());
    miner.enable();
    let stone = BlockBreak {
        pos: p(5, 5, 5),
        material: stone_id,
        ..ev.clone()
    };
    assert!(miner.on_block_break(&stone, &mut host).is_none());
    assert!(host.calls.is_empty());

    let summary = miner.on_block_break(&ev, &mut host).unwrap();
    assert_eq!(summary.processed, 2);
    miner.disable();
    assert!(miner.on_block_break(&ev, &mut host).is_none());
}

#[test]
fn miner_respects_configured_cap() {
    let cat = catalog();
    let iron = id(&cat, "iron_ore");
    let mut host = iron_l(&cat);
    let mut miner = VeinMiner::new(cat, NoRoll).with_max_vein_size(2);
    miner.enable();
    assert_eq!(miner.max_vein_size(), 2);
    let ev = BlockBreak {
        pos: p(0, 0, 0),
        material: iron,
        player: ALEX,
        tool: silk_pickaxe(),
    };
    let summary = miner.on_block_break(&ev, &mut host).unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(host.material_at(p(1, 1, 0)), iron);
}
