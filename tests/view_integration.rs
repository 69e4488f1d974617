//! Board view: input protocol, tooltips, tiles and field drawing

use std::time::Duration;

use hexboard::board::{Entity, FieldEmitter, GridBoard, Hex, TerrainKind};
use hexboard::core::{Color, EntityId, PlayerId, Point, RenderConfig};
use hexboard::hex::{Coord, HexGeometry};
use hexboard::renderer::{TileSet, TileState};
use hexboard::view::{BoardEvent, BoardView, EventSink, Modifiers, PointerButton, PointerEvent};
use image::{Rgba, RgbaImage};
use tokio::sync::mpsc::{self, UnboundedReceiver};

fn view_for(board: &GridBoard) -> (BoardView, UnboundedReceiver<BoardEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut view = BoardView::new(RenderConfig::default(), 400.0, 300.0, EventSink::new(tx)).unwrap();
    view.attach_board(board);
    (view, rx)
}

fn press(view: &mut BoardView, board: &GridBoard, pos: Point, mods: Modifiers, ms: u64) {
    let time = Duration::from_millis(ms);
    let button = PointerButton::Primary;
    view.handle_pointer(board, PointerEvent::Down { pos, button, mods, time });
    view.handle_pointer(board, PointerEvent::Up { pos, button, mods, time });
}

fn center(coord: Coord) -> Point {
    HexGeometry::UNIT.pixel_center(coord)
}

fn drain(rx: &mut UnboundedReceiver<BoardEvent>) -> Vec<BoardEvent> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

#[test]
fn test_los_probe_reports_blocking_hill() {
    let mut board = GridBoard::new(6, 8);
    board.set_elevation(Coord::new(0, 2), 3);
    let (mut view, mut rx) = view_for(&board);

    press(&mut view, &board, center(Coord::new(0, 0)), Modifiers::ctrl(), 0);
    press(&mut view, &board, center(Coord::new(0, 5)), Modifiers::ctrl(), 1000);

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    match &events[1] {
        BoardEvent::SecondLos { report, .. } => {
            assert!(report.blocked);
            assert_eq!(report.blocked_at, Some(Coord::new(0, 2)));
        }
        other => panic!("expected SecondLos, got {:?}", other),
    }
}

#[test]
fn test_double_click_activates() {
    let board = GridBoard::new(6, 6);
    let (mut view, mut rx) = view_for(&board);
    let at = center(Coord::new(2, 2));
    press(&mut view, &board, at, Modifiers::NONE, 0);
    press(&mut view, &board, at, Modifiers::NONE, 150);
    assert_eq!(
        drain(&mut rx),
        vec![
            BoardEvent::Selected(Coord::new(2, 2)),
            BoardEvent::HexActivated(Coord::new(2, 2))
        ]
    );
}

#[test]
fn test_drag_scrolls_view() {
    let board = GridBoard::new(16, 17);
    let (mut view, mut rx) = view_for(&board);
    let button = PointerButton::Primary;
    let mods = Modifiers::NONE;
    view.handle_pointer(
        &board,
        PointerEvent::Down {
            pos: Point::new(200.0, 150.0),
            button,
            mods,
            time: Duration::ZERO,
        },
    );
    view.handle_pointer(&board, PointerEvent::Move { pos: Point::new(100.0, 150.0) });
    view.handle_pointer(
        &board,
        PointerEvent::Up {
            pos: Point::new(100.0, 150.0),
            button,
            mods,
            time: Duration::from_millis(50),
        },
    );
    assert_eq!(view.viewport().scroll(), Point::new(100.0, 0.0));
    // A drag is not a click
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_tooltip_for_screen_point() {
    let mut board = GridBoard::new(6, 6);
    board.set_hex(
        Coord::new(1, 1),
        Hex::new(1).with_terrain(TerrainKind::Building, 3),
    );
    board.place_entity(Entity::new(EntityId(4), "Griffin", PlayerId(1), Coord::new(1, 1)));
    let (view, _rx) = view_for(&board);

    let lines = view.tooltip_at(&board, center(Coord::new(1, 1)));
    assert_eq!(
        lines,
        vec![
            "Hex 0202".to_string(),
            "Level 1".to_string(),
            "Building, height 3".to_string(),
            "Griffin (mech)".to_string(),
            "Player 1, ready".to_string(),
        ]
    );
    assert!(view.tooltip_at(&board, Point::new(-10.0, -10.0)).is_empty());
}

#[test]
fn test_field_tint_reaches_terrain() {
    let board = GridBoard::new(8, 8);
    let (mut view, _rx) = view_for(&board);
    let probe = center(Coord::new(3, 3));
    let plain = view.render_frame(&board).pixel_at(probe);

    view.upsert_entity(
        Entity::new(EntityId(9), "Raven", PlayerId(0), Coord::new(3, 5)).with_emitter(FieldEmitter::new(2)),
    );
    assert!(view.fields().overlay().get(Coord::new(3, 3)).is_some());
    let tinted = view.render_frame(&board).pixel_at(probe);
    assert_ne!(plain, tinted);
}

#[test]
fn test_manifest_tiles_are_drawn() {
    let dir = tempfile::tempdir().unwrap();
    RgbaImage::from_pixel(84, 72, Rgba([255, 0, 0, 255]))
        .save(dir.path().join("woods.png"))
        .unwrap();
    let manifest = dir.path().join("tiles.toml");
    std::fs::write(
        &manifest,
        r#"
[[terrain]]
kind = "woods"
zoom = "normal"
path = "woods.png"

[[marker]]
name = "minefield"
path = "missing.png"
"#,
    )
    .unwrap();

    let tiles = TileSet::load_manifest(&manifest).unwrap();
    assert!(matches!(tiles.terrain(TerrainKind::Woods, 1.0), TileState::Ready(_)));
    assert!(matches!(tiles.marker("minefield"), TileState::Missing));

    let mut board = GridBoard::new(6, 6);
    board.set_terrain(Coord::new(2, 2), TerrainKind::Woods, 1);
    board.set_hex(Coord::new(4, 1), Hex::new(0).with_marker("minefield"));
    let (mut view, _rx) = view_for(&board);
    view.set_tiles(tiles);

    let frame = view.render_frame(&board);
    assert_eq!(frame.pixel_at(center(Coord::new(2, 2))), Some(Color::rgb(255, 0, 0)));
    // The missing marker still gets its fallback label
    assert!(frame.text_runs().iter().any(|t| t.text == "MINEFIELD"));
}

#[test]
fn test_minimap_covers_board() {
    let board = GridBoard::new(10, 10);
    let (view, _rx) = view_for(&board);
    let image = view.minimap(&board, 0.1).unwrap();
    let (w, h) = HexGeometry::new(0.1).unwrap().board_size(10, 10);
    assert_eq!(image.width(), w.ceil() as u32);
    assert_eq!(image.height(), h.ceil() as u32);
}
