//! The board view: one render-thread object tying the renderer, the sprite
//! store, the field calculator and the animation scheduler together.
//!
//! All mutation happens through `&mut self` on the task that owns the view.
//! The background ticker only posts [`RenderMessage`]s; the field calculator
//! and tile loader publish through their own swap/channel hand-offs.

use std::sync::Arc;
use std::time::Duration;

use image::RgbaImage;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::animation::{AnimationScheduler, MoveEvent, RedrawFlag, RenderMessage, TickOutcome, Waypoint};
use crate::board::{BoardModel, Entity, LosQuery};
use crate::core::config::RenderConfig;
use crate::core::error::Result;
use crate::core::types::{EntityId, Point, Rect};
use crate::field::{FieldBounds, FieldCalculator, FieldSource};
use crate::hex::Coord;
use crate::renderer::canvas::{Canvas, RasterCanvas};
use crate::renderer::metrics::FrameMetrics;
use crate::renderer::minimap::Minimap;
use crate::renderer::sprites::{CursorKind, MovementStep, SpriteStore};
use crate::renderer::terrain::{DisplayMode, TerrainRenderer};
use crate::renderer::tiles::TileSet;
use crate::view::events::{BoardEvent, EventSink};
use crate::view::input::{Gesture, GestureClassifier, PointerEvent};
use crate::view::tooltip::tooltip_at;
use crate::view::viewport::Viewport;

/// Width of the sliding HUD panel in screen pixels
const HUD_WIDTH: f64 = 240.0;
const HUD_LINE_HEIGHT: f64 = 16.0;

pub struct BoardView {
    config: Arc<RenderConfig>,
    viewport: Viewport,
    sprites: SpriteStore,
    tiles: TileSet,
    fields: FieldCalculator,
    scheduler: AnimationScheduler,
    input: GestureClassifier,
    redraw: Arc<RedrawFlag>,
    metrics: FrameMetrics,
    events: EventSink,
    mode: DisplayMode,
    /// First hex of a pending LOS probe
    los_probe: Option<Coord>,
    /// First hex of a pending ruler measurement
    ruler_start: Option<Coord>,
}

impl BoardView {
    pub fn new(config: RenderConfig, view_width: f64, view_height: f64, events: EventSink) -> Result<Self> {
        config.validate()?;
        let viewport = Viewport::new(&config, view_width, view_height)?;
        let config = Arc::new(config);
        Ok(Self {
            sprites: SpriteStore::new(viewport.geometry(), Arc::clone(&config)),
            scheduler: AnimationScheduler::new(&config),
            viewport,
            config,
            tiles: TileSet::new(),
            fields: FieldCalculator::new(),
            input: GestureClassifier::new(),
            redraw: Arc::new(RedrawFlag::new()),
            metrics: FrameMetrics::new(),
            events,
            mode: DisplayMode::default(),
            los_probe: None,
            ruler_start: None,
        })
    }

    // === ACCESSORS ===

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn sprites(&self) -> &SpriteStore {
        &self.sprites
    }

    pub fn fields(&self) -> &FieldCalculator {
        &self.fields
    }

    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    /// Shared handle for anything that wants to request a redraw
    pub fn redraw_flag(&self) -> Arc<RedrawFlag> {
        Arc::clone(&self.redraw)
    }

    /// Consume the pending redraw request, if any
    pub fn take_redraw(&self) -> bool {
        self.redraw.take()
    }

    pub fn set_tiles(&mut self, tiles: TileSet) {
        self.tiles = tiles;
        self.redraw.request();
    }

    pub fn tiles_mut(&mut self) -> &mut TileSet {
        &mut self.tiles
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        if self.mode != mode {
            self.mode = mode;
            self.redraw.request();
        }
    }

    pub fn toggle_hud(&mut self) {
        self.scheduler.hud.toggle();
    }

    // === BOARD FEED ===

    /// Take the dimensions and entities of a (new) board and rebuild
    /// everything derived from it
    pub fn attach_board(&mut self, board: &dyn BoardModel) {
        self.viewport.set_board_dims(board.width(), board.height());
        self.los_probe = None;
        self.ruler_start = None;
        self.sync_entities(board);
        self.sprites.invalidate_all();
        self.recompute_fields();
        tracing::info!(
            "Attached {}x{} board with {} entities",
            board.width(),
            board.height(),
            self.sprites.entities().count()
        );
    }

    /// Bring the sprite store in line with the board's entity list: unknown
    /// entities are dropped, the rest are upserted
    pub fn sync_entities(&mut self, board: &dyn BoardModel) {
        let entities = board.entities();
        let sources_before = self.field_sources();
        let stale: Vec<EntityId> = self
            .sprites
            .entities()
            .map(|e| e.id)
            .filter(|id| !entities.iter().any(|e| e.id == *id))
            .collect();
        for id in stale {
            tracing::debug!("Dropping stale entity {}", id);
            self.forget_entity(id);
        }
        for entity in entities {
            self.sprites.upsert(entity);
        }
        if self.field_sources() != sources_before {
            self.recompute_fields();
        }
        self.redraw.request();
    }

    /// An entity changed (or appeared). Fields are recomputed only if its
    /// emitter changed.
    pub fn upsert_entity(&mut self, entity: Entity) {
        let tint = self.config.palette.field_default;
        let before = self
            .sprites
            .entity(entity.id)
            .and_then(|e| FieldSource::from_entity(e, tint));
        let after = FieldSource::from_entity(&entity, tint);
        self.sprites.upsert(entity);
        if before != after {
            self.recompute_fields();
        }
        self.redraw.request();
    }

    pub fn remove_entity(&mut self, id: EntityId) {
        let had_field = self
            .sprites
            .entity(id)
            .and_then(|e| FieldSource::from_entity(e, self.config.palette.field_default))
            .is_some();
        self.forget_entity(id);
        if had_field {
            self.recompute_fields();
        }
        self.redraw.request();
    }

    /// Drop an entity's sprites and any path it was still walking. Cancelling
    /// the last mover ends the movement the same way an arrival would.
    fn forget_entity(&mut self, id: EntityId) {
        if self.scheduler.cancel_moving(id) && !self.scheduler.has_movers() {
            self.events.emit(BoardEvent::FinishedMoving);
        }
        self.sprites.remove_entity(id);
    }

    pub fn add_attack(&mut self, attacker: EntityId, target: EntityId, label: impl Into<String>) {
        self.sprites.add_attack(attacker, target, label);
        self.redraw.request();
    }

    /// New game phase: phase-scoped overlays go away
    pub fn begin_phase(&mut self) {
        self.los_probe = None;
        self.ruler_start = None;
        self.sprites.begin_phase();
        self.redraw.request();
    }

    /// Animate an entity along `path`. Returns `false` for unknown entities
    /// and empty paths.
    pub fn start_moving(&mut self, id: EntityId, path: Vec<Waypoint>) -> bool {
        if self.sprites.entity(id).is_none() || path.is_empty() {
            return false;
        }
        if !self.sprites.is_in_transit(id) {
            self.sprites.begin_transit(id);
        }
        let started = self.scheduler.start_moving(id, path);
        self.redraw.request();
        started
    }

    pub fn set_movement_path(&mut self, steps: Vec<MovementStep>) {
        self.sprites.set_movement_path(steps);
        self.redraw.request();
    }

    pub fn clear_movement_path(&mut self) {
        self.sprites.clear_movement_path();
        self.redraw.request();
    }

    pub fn set_field_markers(&mut self, markers: Vec<(Coord, String)>) {
        self.sprites.set_field_markers(markers);
        self.redraw.request();
    }

    // === CURSORS ===

    pub fn highlight(&mut self, coord: Option<Coord>) {
        self.place_cursor(CursorKind::Highlight, coord, BoardEvent::Highlighted);
    }

    pub fn select(&mut self, coord: Option<Coord>) {
        self.place_cursor(CursorKind::Selection, coord, BoardEvent::Selected);
    }

    pub fn cursor(&mut self, coord: Option<Coord>) {
        self.place_cursor(CursorKind::Pointer, coord, BoardEvent::CursorMoved);
    }

    /// Off-board coordinates are ignored
    fn place_cursor(&mut self, kind: CursorKind, coord: Option<Coord>, event: fn(Coord) -> BoardEvent) {
        if coord.is_some_and(|c| !self.viewport.contains(c)) {
            return;
        }
        if self.sprites.cursor(kind) == coord {
            return;
        }
        self.sprites.set_cursor(kind, coord);
        if let Some(c) = coord {
            self.events.emit(event(c));
        }
        self.redraw.request();
    }

    // === VIEWPORT ===

    pub fn center_on_hex(&mut self, coord: Coord) {
        self.viewport.center_on_hex(coord);
        self.redraw.request();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.set_view_size(width, height);
        self.redraw.request();
    }

    pub fn zoom_in(&mut self) -> bool {
        let changed = self.viewport.zoom_in();
        if changed {
            self.rescale();
        }
        changed
    }

    pub fn zoom_out(&mut self) -> bool {
        let changed = self.viewport.zoom_out();
        if changed {
            self.rescale();
        }
        changed
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<()> {
        self.viewport.set_scale(scale)?;
        self.rescale();
        Ok(())
    }

    fn rescale(&mut self) {
        tracing::debug!("Zoom changed to {:.2}", self.viewport.scale());
        self.sprites
            .reconfigure(self.viewport.geometry(), Arc::clone(&self.config));
        self.redraw.request();
    }

    /// Replace the configuration. Everything derived from it is rebuilt.
    pub fn reconfigure(&mut self, config: RenderConfig) -> Result<()> {
        config.validate()?;
        self.viewport.reconfigure(&config)?;
        self.scheduler.reconfigure(&config);
        self.config = Arc::new(config);
        self.sprites
            .reconfigure(self.viewport.geometry(), Arc::clone(&self.config));
        self.recompute_fields();
        self.redraw.request();
        Ok(())
    }

    // === FIELDS ===

    /// Fields of every known entity, in entity order
    pub fn field_sources(&self) -> Vec<FieldSource> {
        let tint = self.config.palette.field_default;
        self.sprites
            .entities()
            .filter_map(|e| FieldSource::from_entity(e, tint))
            .collect()
    }

    fn field_bounds(&self) -> FieldBounds {
        let (width, height) = self.viewport.board_dims();
        FieldBounds { width, height }
    }

    fn recompute_fields(&mut self) {
        self.fields.recompute(self.field_sources(), self.field_bounds());
        self.redraw.request();
    }

    /// Recompute the field overlay now, on this thread
    pub fn refresh_fields(&mut self) {
        self.recompute_fields();
    }

    /// Recompute on the blocking pool. A redraw is requested once the new
    /// overlay is published; a superseded run publishes nothing.
    pub fn refresh_fields_async(&self) -> JoinHandle<bool> {
        let handle = self
            .fields
            .recompute_async(self.field_sources(), self.field_bounds());
        let redraw = Arc::clone(&self.redraw);
        tokio::spawn(async move {
            let published = handle.await.unwrap_or(false);
            if published {
                redraw.request();
            }
            published
        })
    }

    // === TICKS ===

    /// Handle one message from the ticker. Returns `false` on shutdown.
    pub fn handle_message(&mut self, message: RenderMessage) -> bool {
        match message {
            RenderMessage::Tick { elapsed, done } => {
                self.tick(elapsed);
                // The ticker may already be gone
                let _ = done.send(());
                true
            }
            RenderMessage::Shutdown => false,
        }
    }

    /// Advance animations by `elapsed` and apply the results
    pub fn tick(&mut self, elapsed: Duration) -> TickOutcome {
        let outcome = self.scheduler.tick(elapsed);
        let mut fields_moved = false;

        for event in &outcome.moves {
            match *event {
                MoveEvent::Stepped { entity, to } => {
                    self.sprites.advance_transit(entity, to.coord, to.facing);
                }
                MoveEvent::Arrived { entity } => {
                    self.sprites.end_transit(entity);
                    fields_moved |= self
                        .sprites
                        .entity(entity)
                        .is_some_and(|e| e.emitter.is_some_and(|em| em.active));
                }
                MoveEvent::AllFinished => self.events.emit(BoardEvent::FinishedMoving),
            }
        }
        if fields_moved {
            self.recompute_fields();
        }

        let loaded = self.tiles.poll_loaded();
        if outcome.changed() || loaded > 0 {
            self.redraw.request();
        }
        outcome
    }

    /// Process ticker messages until shutdown or until the channel closes,
    /// presenting a fresh frame whenever a redraw is pending
    pub async fn run(
        &mut self,
        board: &dyn BoardModel,
        mut rx: mpsc::Receiver<RenderMessage>,
        mut present: impl FnMut(&RasterCanvas),
    ) {
        while let Some(message) = rx.recv().await {
            if !self.handle_message(message) {
                break;
            }
            if self.take_redraw() {
                let frame = self.render_frame(board);
                present(&frame);
            }
        }
        tracing::debug!("Render loop stopped after {} ticks", self.scheduler.ticks());
    }

    // === INPUT ===

    /// Feed one pointer event. Pointer positions are in screen pixels.
    pub fn handle_pointer(&mut self, board: &dyn BoardModel, event: PointerEvent) {
        let Some(gesture) = self.input.classify(event) else {
            return;
        };
        match gesture {
            Gesture::Hover(pos) => {
                let coord = self.viewport.coord_at_screen(pos);
                if board.contains(coord) {
                    self.cursor(Some(coord));
                }
            }
            Gesture::Click { at, mods } => {
                let coord = self.viewport.coord_at_screen(at);
                if !board.contains(coord) {
                    return;
                }
                if mods.ctrl {
                    self.los_click(board, coord);
                } else if mods.alt {
                    self.ruler_click(coord);
                } else {
                    self.select(Some(coord));
                }
            }
            Gesture::DoubleClick { at } => {
                let coord = self.viewport.coord_at_screen(at);
                if board.contains(coord) {
                    self.events.emit(BoardEvent::HexActivated(coord));
                }
            }
            Gesture::Drag { delta } => {
                // Content follows the pointer
                self.viewport.pan(-delta);
                self.redraw.request();
            }
            Gesture::DragEnd => {}
            Gesture::Popup { at } => {
                let coord = self.viewport.coord_at_screen(at);
                if board.contains(coord) {
                    let entities = self.sprites.entities_at(self.viewport.screen_to_board(at));
                    self.events
                        .emit(BoardEvent::PopupRequested { coord, entities });
                }
            }
        }
    }

    /// Two-click LOS protocol: the first click sets the probe origin, the
    /// second queries the board and resets the probe.
    fn los_click(&mut self, board: &dyn BoardModel, coord: Coord) {
        match self.los_probe.take() {
            None => {
                self.los_probe = Some(coord);
                self.sprites.set_cursor(CursorKind::SecondLos, None);
                self.sprites.set_cursor(CursorKind::FirstLos, Some(coord));
                self.events.emit(BoardEvent::FirstLos(coord));
            }
            Some(from) => {
                let report = board.line_of_sight(LosQuery {
                    from,
                    to: coord,
                    attacker_height: self.config.los.attacker,
                    target_height: self.config.los.target,
                });
                self.sprites.set_cursor(CursorKind::SecondLos, Some(coord));
                self.events.emit(BoardEvent::SecondLos {
                    from,
                    to: coord,
                    report,
                });
            }
        }
        self.redraw.request();
    }

    fn ruler_click(&mut self, coord: Coord) {
        match self.ruler_start.take() {
            None => {
                self.ruler_start = Some(coord);
                self.sprites.set_ruler(None);
            }
            Some(start) => {
                self.sprites.set_ruler(Some((start, coord)));
                self.events.emit(BoardEvent::RulerMeasured {
                    start,
                    end: coord,
                    distance: start.distance(&coord),
                });
            }
        }
        self.redraw.request();
    }

    /// Tooltip lines for a screen point
    pub fn tooltip_at(&self, board: &dyn BoardModel, screen: Point) -> Vec<String> {
        tooltip_at(board, &self.sprites, self.viewport.screen_to_board(screen))
    }

    // === DRAWING ===

    /// Draw terrain, sprites and the HUD into `canvas`, in that order
    pub fn render(&mut self, board: &dyn BoardModel, canvas: &mut dyn Canvas) {
        self.metrics.begin_frame();

        let overlay = self.fields.overlay();
        let terrain = TerrainRenderer {
            geometry: self.viewport.geometry(),
            config: &self.config,
            tiles: &self.tiles,
            overlay: &overlay,
            mode: self.mode,
        };
        terrain.draw(canvas, board, &mut self.metrics);

        let (drawn, skipped) = self.sprites.draw(canvas);
        self.metrics.record_sprites(drawn, skipped);

        self.draw_hud(canvas);
        self.metrics.end_frame();
    }

    /// Render the visible part of the board into a fresh back buffer
    pub fn render_frame(&mut self, board: &dyn BoardModel) -> RasterCanvas {
        let mut canvas = RasterCanvas::new(self.viewport.visible_rect(), self.config.palette.background);
        self.render(board, &mut canvas);
        canvas
    }

    fn draw_hud(&self, canvas: &mut dyn Canvas) {
        let hud = &self.scheduler.hud;
        if hud.is_hidden() {
            return;
        }
        let view = self.viewport.visible_rect();
        let panel = Rect::new(view.x + hud.offset(), view.y, HUD_WIDTH, view.height);
        canvas.fill_rect(panel, self.config.palette.hud_background);

        let mut lines = vec![format!("Zoom {:.0}%", self.viewport.scale() * 100.0)];
        if let Some(c) = self.sprites.cursor(CursorKind::Selection) {
            lines.push(format!("Selected {}", c.board_label()));
        }
        if let Some(c) = self.sprites.cursor(CursorKind::Pointer) {
            lines.push(format!("Hex {}", c.board_label()));
        }
        for (i, line) in lines.iter().enumerate() {
            let at = Point::new(panel.x + 8.0, panel.y + HUD_LINE_HEIGHT * (i + 1) as f64);
            canvas.draw_text(at, line, self.config.palette.highlight);
        }
    }

    /// Overview of the whole board with the current view outlined
    pub fn minimap(&self, board: &dyn BoardModel, scale: f64) -> Result<RgbaImage> {
        let minimap = Minimap::new(scale)?;
        let entities: Vec<Entity> = self.sprites.entities().cloned().collect();
        Ok(minimap.render(
            board,
            &self.config.palette,
            &entities,
            Some((self.viewport.visible_rect(), self.viewport.scale())),
        ))
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc::UnboundedReceiver;

    use super::*;
    use crate::board::{FieldEmitter, GridBoard};
    use crate::core::types::PlayerId;
    use crate::hex::{HexDirection, HexGeometry};
    use crate::view::input::{Modifiers, PointerButton};

    fn setup() -> (BoardView, GridBoard, UnboundedReceiver<BoardEvent>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let mut board = GridBoard::new(8, 8);
        board.place_entity(Entity::new(EntityId(1), "Atlas", PlayerId(0), Coord::new(2, 2)));
        let mut view = BoardView::new(RenderConfig::default(), 400.0, 300.0, EventSink::new(tx)).unwrap();
        view.attach_board(&board);
        (view, board, rx)
    }

    fn click(view: &mut BoardView, board: &GridBoard, coord: Coord, mods: Modifiers, ms: u64) {
        let pos = HexGeometry::UNIT.pixel_center(coord);
        let time = Duration::from_millis(ms);
        view.handle_pointer(
            board,
            PointerEvent::Down {
                pos,
                button: PointerButton::Primary,
                mods,
                time,
            },
        );
        view.handle_pointer(
            board,
            PointerEvent::Up {
                pos,
                button: PointerButton::Primary,
                mods,
                time,
            },
        );
    }

    fn drain(rx: &mut UnboundedReceiver<BoardEvent>) -> Vec<BoardEvent> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    #[test]
    fn test_click_selects() {
        let (mut view, board, mut rx) = setup();
        click(&mut view, &board, Coord::new(1, 1), Modifiers::NONE, 0);
        assert_eq!(drain(&mut rx), vec![BoardEvent::Selected(Coord::new(1, 1))]);
        assert_eq!(view.sprites().cursor(CursorKind::Selection), Some(Coord::new(1, 1)));
    }

    #[test]
    fn test_los_two_click_protocol() {
        let (mut view, board, mut rx) = setup();
        click(&mut view, &board, Coord::new(0, 0), Modifiers::ctrl(), 0);
        click(&mut view, &board, Coord::new(0, 3), Modifiers::ctrl(), 1000);
        let events = drain(&mut rx);
        assert_eq!(events[0], BoardEvent::FirstLos(Coord::new(0, 0)));
        match &events[1] {
            BoardEvent::SecondLos { from, to, report } => {
                assert_eq!(*from, Coord::new(0, 0));
                assert_eq!(*to, Coord::new(0, 3));
                assert_eq!(report.distance, 3);
                assert!(!report.blocked);
            }
            other => panic!("unexpected {:?}", other),
        }

        // Probe was reset: the next ctrl-click starts a new pair
        click(&mut view, &board, Coord::new(4, 4), Modifiers::ctrl(), 2000);
        assert_eq!(drain(&mut rx), vec![BoardEvent::FirstLos(Coord::new(4, 4))]);
        assert_eq!(view.sprites().cursor(CursorKind::SecondLos), None);
    }

    #[test]
    fn test_off_board_click_is_ignored() {
        let (mut view, board, mut rx) = setup();
        let pos = HexGeometry::UNIT.pixel_center(Coord::new(9, 1));
        view.handle_pointer(
            &board,
            PointerEvent::Down {
                pos,
                button: PointerButton::Primary,
                mods: Modifiers::NONE,
                time: Duration::ZERO,
            },
        );
        view.handle_pointer(
            &board,
            PointerEvent::Up {
                pos,
                button: PointerButton::Primary,
                mods: Modifiers::NONE,
                time: Duration::ZERO,
            },
        );
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_ruler() {
        let (mut view, board, mut rx) = setup();
        click(&mut view, &board, Coord::new(0, 0), Modifiers::alt(), 0);
        click(&mut view, &board, Coord::new(0, 4), Modifiers::alt(), 1000);
        assert_eq!(
            drain(&mut rx),
            vec![BoardEvent::RulerMeasured {
                start: Coord::new(0, 0),
                end: Coord::new(0, 4),
                distance: 4
            }]
        );
        assert!(view.sprites().snapshot().ruler.is_some());
    }

    #[test]
    fn test_hover_moves_pointer_cursor_once() {
        let (mut view, board, mut rx) = setup();
        let pos = HexGeometry::UNIT.pixel_center(Coord::new(3, 3));
        view.handle_pointer(&board, PointerEvent::Move { pos });
        view.handle_pointer(&board, PointerEvent::Move { pos: pos + Point::new(1.0, 1.0) });
        assert_eq!(drain(&mut rx), vec![BoardEvent::CursorMoved(Coord::new(3, 3))]);
    }

    #[test]
    fn test_popup_lists_entities() {
        let (mut view, board, mut rx) = setup();
        let pos = HexGeometry::UNIT.pixel_center(Coord::new(2, 2));
        view.handle_pointer(
            &board,
            PointerEvent::Down {
                pos,
                button: PointerButton::Secondary,
                mods: Modifiers::NONE,
                time: Duration::ZERO,
            },
        );
        assert_eq!(
            drain(&mut rx),
            vec![BoardEvent::PopupRequested {
                coord: Coord::new(2, 2),
                entities: vec![EntityId(1)]
            }]
        );
    }

    #[test]
    fn test_movement_finishes_with_one_event() {
        let (mut view, _board, mut rx) = setup();
        let path = vec![
            Waypoint::new(Coord::new(2, 3), HexDirection::South),
            Waypoint::new(Coord::new(2, 4), HexDirection::South),
            Waypoint::new(Coord::new(3, 4), HexDirection::NorthEast),
        ];
        assert!(view.start_moving(EntityId(1), path));
        assert!(view.sprites().is_in_transit(EntityId(1)));
        assert_eq!(view.sprites().snapshot().ghosts.len(), 1);

        for _ in 0..15 {
            view.tick(Duration::from_millis(20));
        }
        assert_eq!(drain(&mut rx), vec![BoardEvent::FinishedMoving]);
        let entity = view.sprites().entity(EntityId(1)).unwrap();
        assert_eq!(entity.position, Coord::new(3, 4));
        assert_eq!(entity.facing, HexDirection::NorthEast);
        assert!(!view.sprites().is_in_transit(EntityId(1)));
        assert!(view.sprites().snapshot().ghosts.is_empty());
    }

    fn two_step_path() -> Vec<Waypoint> {
        vec![
            Waypoint::new(Coord::new(2, 3), HexDirection::South),
            Waypoint::new(Coord::new(2, 4), HexDirection::South),
        ]
    }

    #[test]
    fn test_removing_last_mover_finishes_movement() {
        let (mut view, _board, mut rx) = setup();
        assert!(view.start_moving(EntityId(1), two_step_path()));
        for _ in 0..5 {
            view.tick(Duration::from_millis(20));
        }
        assert!(drain(&mut rx).is_empty());

        view.remove_entity(EntityId(1));
        assert!(!view.scheduler().is_moving(EntityId(1)));
        assert_eq!(drain(&mut rx), vec![BoardEvent::FinishedMoving]);

        for _ in 0..10 {
            view.tick(Duration::from_millis(20));
        }
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_sync_drops_mover_missing_from_board() {
        let (mut view, mut board, mut rx) = setup();
        board.place_entity(Entity::new(EntityId(2), "Rook", PlayerId(1), Coord::new(5, 5)));
        view.sync_entities(&board);
        assert!(view.start_moving(EntityId(1), two_step_path()));
        assert!(view.start_moving(EntityId(2), vec![Waypoint::new(Coord::new(5, 6), HexDirection::South)]));
        for _ in 0..5 {
            view.tick(Duration::from_millis(20));
        }
        // Entity 2 arrived; entity 1 still has a step left
        assert!(drain(&mut rx).is_empty());

        board.remove_entity(EntityId(1));
        view.sync_entities(&board);
        assert!(!view.scheduler().is_moving(EntityId(1)));
        assert!(view.sprites().entity(EntityId(1)).is_none());
        assert!(view.sprites().snapshot().ghosts.is_empty());
        assert_eq!(drain(&mut rx), vec![BoardEvent::FinishedMoving]);

        for _ in 0..10 {
            view.tick(Duration::from_millis(20));
        }
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_removing_one_of_two_movers_waits_for_the_other() {
        let (mut view, mut board, mut rx) = setup();
        board.place_entity(Entity::new(EntityId(2), "Rook", PlayerId(1), Coord::new(5, 5)));
        view.sync_entities(&board);
        assert!(view.start_moving(EntityId(1), two_step_path()));
        assert!(view.start_moving(EntityId(2), vec![Waypoint::new(Coord::new(5, 6), HexDirection::South)]));

        view.remove_entity(EntityId(1));
        assert!(drain(&mut rx).is_empty());
        for _ in 0..5 {
            view.tick(Duration::from_millis(20));
        }
        assert_eq!(drain(&mut rx), vec![BoardEvent::FinishedMoving]);
    }

    #[test]
    fn test_start_moving_rejects_unknown_and_empty() {
        let (mut view, _board, _rx) = setup();
        assert!(!view.start_moving(EntityId(99), vec![Waypoint::new(Coord::new(0, 0), HexDirection::North)]));
        assert!(!view.start_moving(EntityId(1), Vec::new()));
        assert!(!view.sprites().is_in_transit(EntityId(1)));
    }

    #[test]
    fn test_emitter_change_recomputes_fields() {
        let (mut view, _board, _rx) = setup();
        assert!(view.fields().overlay().is_empty());
        let jammer = Entity::new(EntityId(2), "Raven", PlayerId(1), Coord::new(4, 4))
            .with_emitter(FieldEmitter::new(1));
        view.upsert_entity(jammer);
        assert_eq!(view.fields().overlay().len(), 7);
        view.remove_entity(EntityId(2));
        assert!(view.fields().overlay().is_empty());
    }

    #[test]
    fn test_handle_message_acks_tick() {
        let (mut view, _board, _rx) = setup();
        let (done, mut ack) = tokio::sync::oneshot::channel();
        assert!(view.handle_message(RenderMessage::Tick {
            elapsed: Duration::from_millis(20),
            done
        }));
        assert!(ack.try_recv().is_ok());
        assert!(!view.handle_message(RenderMessage::Shutdown));
    }

    #[test]
    fn test_redraw_requests_coalesce() {
        let (mut view, _board, _rx) = setup();
        view.take_redraw();
        view.highlight(Some(Coord::new(1, 1)));
        view.select(Some(Coord::new(1, 2)));
        assert!(view.take_redraw());
        assert!(!view.take_redraw());
        // An idle tick changes nothing
        view.tick(Duration::from_millis(20));
        assert!(!view.take_redraw());
    }

    #[test]
    fn test_render_frame_draws_unit() {
        let (mut view, board, _rx) = setup();
        let frame = view.render_frame(&board);
        let center = HexGeometry::UNIT.pixel_center(Coord::new(2, 2));
        let owner = view.config().palette.player(PlayerId(0));
        assert_eq!(frame.pixel_at(center), Some(owner));
        assert!(view.metrics().summary().hexes_drawn > 0);
    }

    #[test]
    fn test_zoom_rebuilds_sprites() {
        let (mut view, _board, _rx) = setup();
        assert!(view.zoom_in());
        assert_eq!(view.sprites().geometry().scale(), 1.25);
        assert!(view.zoom_out());
        assert_eq!(view.sprites().geometry().scale(), 1.0);
    }

    #[test]
    fn test_reconfigure_rejects_invalid() {
        let (mut view, _board, _rx) = setup();
        let bad = RenderConfig {
            zoom_levels: Vec::new(),
            ..Default::default()
        };
        assert!(view.reconfigure(bad).is_err());
        let slow = RenderConfig {
            move_step_delay_ms: 500,
            ..Default::default()
        };
        assert!(view.reconfigure(slow).is_ok());
        assert_eq!(view.config().move_step_delay_ms, 500);
    }
}
