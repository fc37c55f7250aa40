use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;
use veinminer_blocks::MaterialCatalog;
use veinminer_core::{RandomXp, VeinMiner, XpRoll};

mod app;
mod event;
mod scene;
mod server;

use app::App;
use scene::SceneConfig;

#[derive(Parser, Debug)]
#[command(name = "veinminer", about = "Replay scripted block breaks with vein mining enabled")]
struct Args {
    /// Scene file describing the world, players and breaks
    #[arg(long, default_value = "assets/scenes/iron_vein.toml")]
    scene: PathBuf,
    /// Material catalog; the builtin ore table is used when omitted
    #[arg(long)]
    materials: Option<PathBuf>,
    /// Seed for experience rolls (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Override the catalog's vein cap
    #[arg(long)]
    max_vein_size: Option<usize>,
    /// off|error|warn|info|debug|trace; RUST_LOG takes precedence
    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("unknown log level `{s}`, expected off|error|warn|info|debug|trace"))
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .parse_default_env()
        .init();

    let catalog = match &args.materials {
        Some(path) => MaterialCatalog::from_path(path)?,
        None => MaterialCatalog::builtin()?,
    };
    let scene = SceneConfig::from_path(&args.scene)?;
    let (mut server, breaks) = scene.build(catalog.clone())?;
    log::info!(
        "loaded {:?}: {} player(s), {} break(s)",
        args.scene,
        server.players.len(),
        breaks.len()
    );

    let xp = match args.seed {
        Some(seed) => {
            server = server.with_orb_seed(seed.rotate_left(17));
            RandomXp::seeded(seed)
        }
        None => RandomXp::from_os_rng(),
    };
    let mut miner = VeinMiner::new(catalog, xp);
    if let Some(max) = args.max_vein_size {
        miner = miner.with_max_vein_size(max);
    }

    let mut app = App::new(server, miner, &breaks);
    app.miner.enable();
    let ticks = app.run();
    app.miner.disable();

    print_report(&app, ticks);
    Ok(())
}

fn print_report<X: XpRoll>(app: &App<X>, ticks: u64) {
    let server = &app.server;
    let cat = &server.catalog;
    println!("ran {} tick(s)", ticks);
    for r in &app.reports {
        println!(
            "  tick {:>3} {:<8} {} at {}: {} broken, {} denied, {} xp, {} failure(s)",
            r.tick,
            server.player_name(r.player),
            cat.key(r.material),
            r.seed,
            r.summary.processed,
            r.summary.denied,
            r.summary.experience,
            r.summary.failures.len()
        );
    }
    println!("players:");
    for p in server.players.values() {
        println!("  {:<8} {} xp", p.name, p.experience);
    }
    println!("items on ground:");
    for (m, n) in server.item_totals() {
        println!("  {:<24} x{}", cat.key(m), n);
    }
    let orb_xp: u32 = server.orbs.iter().map(|o| o.amount).sum();
    println!("orbs: {} worth {} xp", server.orbs.len(), orb_xp);
    let stats = server.world.stats();
    println!(
        "world: {} edited cell(s) in {} chunk(s); {} block(s) broken, {} break(s) cancelled, tool damage {}",
        stats.block_edits,
        stats.chunk_entries,
        server.stats.blocks_broken,
        server.stats.breaks_cancelled,
        server.stats.tool_damage
    );
}
