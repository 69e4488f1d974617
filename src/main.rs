//! hexboard demo
//!
//! Generates a seeded board, renders it to a PNG and optionally writes a
//! minimap and frame metrics. With `--animate` the first unit walks a few
//! hexes under the real background ticker before the frame is taken.

use std::path::PathBuf;

use clap::Parser;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use hexboard::animation::{spawn_ticker, RenderMessage, Waypoint};
use hexboard::board::{generate_board, BoardModel, GeneratorConfig, GridBoard};
use hexboard::core::{RenderConfig, RenderError, Result};
use hexboard::renderer::{DisplayMode, TileSet};
use hexboard::view::{BoardEvent, BoardView, EventSink};

#[derive(Parser, Debug)]
#[command(name = "hexboard")]
#[command(about = "Render a generated hex board to PNG")]
struct Args {
    /// Board width in hexes
    #[arg(long, default_value_t = 16)]
    width: i32,

    /// Board height in hexes
    #[arg(long, default_value_t = 17)]
    height: i32,

    /// Random seed for the generated board
    #[arg(long)]
    seed: Option<u64>,

    /// Render scale (1.0 = 84x72 pixel hexes)
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// TOML render configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML tile manifest
    #[arg(long)]
    tiles: Option<PathBuf>,

    /// Output PNG
    #[arg(long, short = 'o', default_value = "board.png")]
    output: PathBuf,

    /// Also write a minimap PNG
    #[arg(long)]
    minimap: Option<PathBuf>,

    /// Render at night
    #[arg(long)]
    night: bool,

    /// Shade hexes by elevation
    #[arg(long)]
    height_shading: bool,

    /// Animate a short move before rendering
    #[arg(long)]
    animate: bool,

    /// Print frame metrics as JSON
    #[arg(long)]
    metrics: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hexboard=info")),
        )
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };

    let mut board = generate_board(&GeneratorConfig {
        width: args.width,
        height: args.height,
        seed,
        ..Default::default()
    });
    board.set_night(args.night);
    tracing::info!("Board {}x{}, seed {}", board.width(), board.height(), seed);

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mut view = BoardView::new(config, 0.0, 0.0, EventSink::new(event_tx))?;
    view.set_scale(args.scale)?;
    view.attach_board(&board);
    view.set_display_mode(DisplayMode {
        night: args.night,
        height_shading: args.height_shading,
        deployment_for: None,
    });
    if let Some(manifest) = &args.tiles {
        view.set_tiles(TileSet::load_manifest(manifest)?);
    }

    let full = view.viewport().board_pixels();
    view.resize(full.x, full.y);

    if args.animate {
        animate(&mut view, &board, event_rx)?;
    }

    let frame = view.render_frame(&board);
    tracing::info!(
        "Rendered {} hexes, {} text runs",
        view.metrics().summary().hexes_drawn,
        frame.text_runs().len()
    );
    frame.into_image().save(&args.output)?;
    tracing::info!("Wrote {}", args.output.display());

    if let Some(path) = &args.minimap {
        view.minimap(&board, 0.15)?.save(path)?;
        tracing::info!("Wrote {}", path.display());
    }

    if args.metrics {
        match serde_json::to_string_pretty(&view.metrics().summary()) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::warn!("Could not serialize metrics: {}", e),
        }
    }

    Ok(())
}

/// Walk the first unit south under the background ticker until it arrives
fn animate(
    view: &mut BoardView,
    board: &GridBoard,
    mut events: mpsc::UnboundedReceiver<BoardEvent>,
) -> Result<()> {
    let Some(mover) = board.entities().into_iter().find(|e| !e.is_wreck()) else {
        tracing::warn!("No unit to animate");
        return Ok(());
    };

    let mut path = Vec::new();
    let mut at = mover.position;
    for _ in 0..4 {
        let next = at.neighbor(mover.facing);
        if !board.contains(next) {
            break;
        }
        path.push(Waypoint::new(next, mover.facing));
        at = next;
    }
    if !view.start_moving(mover.id, path) {
        tracing::warn!("{} has nowhere to go", mover.name);
        return Ok(());
    }

    let rt = Runtime::new()?;
    rt.block_on(async {
        let (tx, rx) = mpsc::channel(8);
        let ticker = spawn_ticker(view.config().tick_period(), tx.clone());

        let watcher = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if event == BoardEvent::FinishedMoving {
                    return tx
                        .send(RenderMessage::Shutdown)
                        .await
                        .map_err(|_| RenderError::ChannelClosed);
                }
            }
            Ok(())
        });

        let mut frames = 0u32;
        view.run(board, rx, |_| frames += 1).await;
        ticker.abort();
        tracing::info!("{} finished moving after {} frames", mover.name, frames);

        match watcher.await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Event watcher failed: {}", e);
                Ok(())
            }
        }
    })
}
