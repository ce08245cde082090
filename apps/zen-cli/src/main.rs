use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use zen_author::{EditorSession, HeadlessSpawner};
use zen_common::{GameConfig, GridPosition, LevelObjectType};
use zen_input::{EditorAction, RawInput};
use zen_kernel::LevelState;
use zen_motion::PlaySession;
use zen_persist::LevelStore;
use zen_render::{DebugTextRenderer, RenderView, Renderer, Retiler, Scene, SpriteTable};
use zen_tools::LevelInspector;

#[derive(Parser)]
#[command(name = "zen-cli", about = "CLI tool for zen platformer levels")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the data directory from the config
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and effective configuration
    Info,
    /// List saved levels
    List,
    /// Summarise and draw a saved level
    Show { name: String },
    /// Fill a rectangle of empty cells, creating the level if needed
    Paint {
        name: String,
        /// First corner as ROW,COLUMN
        #[arg(long, value_parser = parse_cell)]
        from: GridPosition,
        /// Opposite corner as ROW,COLUMN
        #[arg(long, value_parser = parse_cell)]
        to: GridPosition,
        #[arg(long, value_enum, default_value = "block")]
        object: Placeable,
    },
    /// Remove every object in a rectangle
    Erase {
        name: String,
        #[arg(long, value_parser = parse_cell)]
        from: GridPosition,
        #[arg(long, value_parser = parse_cell)]
        to: GridPosition,
    },
    /// Play a saved level headlessly
    Simulate {
        name: String,
        /// Number of ticks to run
        #[arg(short, long, default_value = "120")]
        ticks: u64,
        /// Hold right for the whole run
        #[arg(long)]
        right: bool,
        /// Press jump on these ticks
        #[arg(long, value_delimiter = ',')]
        jump_at: Vec<u64>,
    },
    /// Delete a saved level
    Delete { name: String },
    /// Build, save and play a small sample level
    Demo,
}

#[derive(Clone, Copy, ValueEnum)]
enum Placeable {
    Block,
    Start,
}

impl From<Placeable> for LevelObjectType {
    fn from(value: Placeable) -> Self {
        match value {
            Placeable::Block => LevelObjectType::Block,
            Placeable::Start => LevelObjectType::PlayerStart,
        }
    }
}

fn parse_cell(s: &str) -> Result<GridPosition, String> {
    let (row, column) = s
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COLUMN, got {s:?}"))?;
    let row = row.trim().parse().map_err(|e| format!("bad row: {e}"))?;
    let column = column.trim().parse().map_err(|e| format!("bad column: {e}"))?;
    Ok(GridPosition::new(row, column))
}

const TICK_DT: f32 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }

    match cli.command {
        Commands::Info => {
            println!("zen-cli v{}", env!("CARGO_PKG_VERSION"));
            let grid = &config.grid;
            println!(
                "grid: cell_size={} origin=({}, {}) extents={}",
                grid.cell_size,
                grid.origin.x,
                grid.origin.y,
                grid.extents
                    .map(|e| format!("{}x{}", e.rows, e.columns))
                    .unwrap_or_else(|| "unbounded".into())
            );
            let motion = &config.player.motion;
            println!(
                "player: size=({}, {}) jump_height={} apex_time={} air_jumps={}",
                config.player.size.x,
                config.player.size.y,
                motion.jump_height,
                motion.time_to_jump_apex,
                motion.air_jumps
            );
            println!("levels: {}", config.storage.levels_path().display());
        }
        Commands::List => {
            let store = LevelStore::open(&config.storage)?;
            if store.names().is_empty() {
                println!("(no saved levels)");
            }
            for name in store.names() {
                println!("{name}");
            }
        }
        Commands::Show { name } => {
            let store = LevelStore::open(&config.storage)?;
            let level = load(&store, &name)?;
            show(&level, None);
        }
        Commands::Paint {
            name,
            from,
            to,
            object,
        } => {
            let mut store = LevelStore::open(&config.storage)?;
            let mut editor = open_in_editor(&config, &store, &name)?;
            if editor.level().is_occupied(from) {
                bail!("paint must start on an empty cell, {from} is occupied");
            }
            drag(&mut editor, &mut store, from, to, object.into())?;
            editor.handle(EditorAction::Deselect, &mut store)?;
            editor.handle(EditorAction::Save, &mut store)?;
            println!("{}", LevelInspector::summary(editor.level()));
            report_tiles(&config, &mut editor);
        }
        Commands::Erase { name, from, to } => {
            let mut store = LevelStore::open(&config.storage)?;
            let mut editor = open_in_editor(&config, &store, &name)?;
            if !editor.level().is_occupied(from) {
                bail!("erase must start on an occupied cell, {from} is empty");
            }
            drag(&mut editor, &mut store, from, to, LevelObjectType::Block)?;
            let deleted = editor.selection().len();
            editor.handle(EditorAction::DeleteSelection, &mut store)?;
            editor.handle(EditorAction::Save, &mut store)?;
            println!("erased {deleted} objects");
            println!("{}", LevelInspector::summary(editor.level()));
        }
        Commands::Simulate {
            name,
            ticks,
            right,
            jump_at,
        } => {
            let store = LevelStore::open(&config.storage)?;
            let level = load(&store, &name)?;
            simulate(&config, &level, ticks, right, &jump_at)?;
        }
        Commands::Delete { name } => {
            let mut store = LevelStore::open(&config.storage)?;
            if store.delete(&name)? {
                println!("deleted {name}");
            } else {
                println!("no level named {name}");
            }
        }
        Commands::Demo => {
            let mut store = LevelStore::open(&config.storage)?;
            let mut editor = EditorSession::new(config.grid, HeadlessSpawner::new());
            editor.set_level_name("demo");
            let floor = (GridPosition::new(0, 0), GridPosition::new(0, 15));
            let wall = (GridPosition::new(1, 15), GridPosition::new(6, 15));
            let start = GridPosition::new(4, 2);
            drag(&mut editor, &mut store, floor.0, floor.1, LevelObjectType::Block)?;
            drag(&mut editor, &mut store, wall.0, wall.1, LevelObjectType::Block)?;
            drag(&mut editor, &mut store, start, start, LevelObjectType::PlayerStart)?;
            editor.handle(EditorAction::Deselect, &mut store)?;
            editor.handle(EditorAction::Save, &mut store)?;
            println!("saved level demo");
            show(editor.level(), None);
            simulate(&config, editor.level(), 180, true, &[60, 75])?;
        }
    }

    Ok(())
}

fn load(store: &LevelStore, name: &str) -> anyhow::Result<LevelState> {
    store
        .load(name)?
        .with_context(|| format!("no level named {name}"))
}

/// Editor holding `name` if it is saved, or an empty level with that name.
fn open_in_editor(
    config: &GameConfig,
    store: &LevelStore,
    name: &str,
) -> anyhow::Result<EditorSession<HeadlessSpawner>> {
    let mut editor = EditorSession::new(config.grid, HeadlessSpawner::new());
    if !editor.load_level(store, name)? {
        tracing::info!(%name, "starting a new level");
        editor.set_level_name(name);
    }
    Ok(editor)
}

/// One pointer drag from the centre of `from` to the centre of `to`.
fn drag(
    editor: &mut EditorSession<HeadlessSpawner>,
    store: &mut LevelStore,
    from: GridPosition,
    to: GridPosition,
    placement: LevelObjectType,
) -> anyhow::Result<()> {
    let grid = *editor.grid();
    let began = editor.handle(
        EditorAction::BeginDrag {
            pointer: grid.grid_to_world(from),
            placement,
        },
        store,
    )?;
    if !began {
        bail!("cell {from} is outside the grid");
    }
    editor.handle(
        EditorAction::Drag {
            pointer: grid.grid_to_world(to),
        },
        store,
    )?;
    editor.handle(EditorAction::EndDrag, store)?;
    Ok(())
}

fn report_tiles(config: &GameConfig, editor: &mut EditorSession<HeadlessSpawner>) {
    let mut tiles = Retiler::new(config.grid, SpriteTable::standard());
    let events = editor.drain_events();
    tiles.apply(editor.level(), &events);
    println!("tiles: {}", tiles.len());
}

fn show(level: &LevelState, player: Option<GridPosition>) {
    println!("{}", LevelInspector::summary(level));
    for extra in LevelInspector::extra_player_starts(level) {
        tracing::warn!(%extra, "extra player start is ignored in play");
    }
    let highlight = BTreeSet::new();
    let scene = Scene {
        level,
        highlight: &highlight,
        player,
    };
    match RenderView::fit(&scene, 1) {
        Some(view) => print!("{}", DebugTextRenderer::new().render(&scene, &view)),
        None => println!("(empty level)"),
    }
}

fn simulate(
    config: &GameConfig,
    level: &LevelState,
    ticks: u64,
    right: bool,
    jump_at: &[u64],
) -> anyhow::Result<()> {
    let mut session = PlaySession::start(level, &config.grid, &config.player)?;
    let mut last = None;
    for tick in 0..ticks {
        let raw = RawInput {
            right,
            jump_held: jump_at.contains(&tick),
            ..RawInput::default()
        };
        let frame = session.step(raw, TICK_DT);
        if let Some(kind) = frame.jump {
            println!("tick {}: jump {kind:?}", frame.tick);
        }
        last = Some(frame);
    }

    if let Some(frame) = last {
        println!(
            "after {} ticks: position=({:.3}, {:.3}) velocity=({:.3}, {:.3}) grounded={} wall={}",
            frame.tick,
            frame.position.x,
            frame.position.y,
            frame.velocity.x,
            frame.velocity.y,
            frame.collisions.below,
            frame.collisions.touching_wall()
        );
        let cell = config.grid.world_to_grid(frame.position);
        show(session.level(), Some(cell));
    }
    Ok(())
}
