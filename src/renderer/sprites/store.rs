//! Sprite store: owns every transient drawable on the board.
//!
//! The store keeps the logical state (entity snapshots, attacks, cursors,
//! paths) and derives sprites from it. The derived [`SpriteSet`] is only
//! ever replaced whole through [`Swap`], so the draw path always sees a
//! complete set. Sprites that did not change are carried over by `Arc`, which
//! keeps their cached images.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::board::Entity;
use crate::core::config::RenderConfig;
use crate::core::swap::Swap;
use crate::core::types::{EntityId, Point, Rect};
use crate::hex::{Coord, HexDirection, HexGeometry};
use crate::renderer::canvas::Canvas;
use crate::renderer::sprites::sprite::{
    CursorKind, MovementStep, Sprite, SpriteKind, StepKind, UnitGlyph,
};

/// Unit counter radius as a fraction of hex height
const UNIT_RADIUS: f64 = 0.32;
const STEP_RADIUS: f64 = 0.12;

/// Order within the unit layer: wrecks under live counters, then by id
fn unit_layer_key(sprite: &Arc<Sprite>) -> (bool, Option<EntityId>) {
    (!matches!(sprite.kind, SpriteKind::Wreck(_)), sprite.kind.entity())
}

/// Every sprite, grouped by draw layer
#[derive(Debug, Clone, Default)]
pub struct SpriteSet {
    pub field_markers: Vec<Arc<Sprite>>,
    /// Sorted by cursor priority
    pub cursors: Vec<Arc<Sprite>>,
    pub links: Vec<Arc<Sprite>>,
    /// Units at rest and wrecks
    pub units: Vec<Arc<Sprite>>,
    pub moving: Vec<Arc<Sprite>>,
    pub ghosts: Vec<Arc<Sprite>>,
    pub arrows: Vec<Arc<Sprite>>,
    pub steps: Vec<Arc<Sprite>>,
    pub ruler: Option<Arc<Sprite>>,
}

impl SpriteSet {
    /// Sprites in the order they are drawn; later entries occlude earlier ones
    pub fn in_draw_order(&self) -> impl Iterator<Item = &Arc<Sprite>> {
        self.field_markers
            .iter()
            .chain(&self.cursors)
            .chain(&self.links)
            .chain(&self.units)
            .chain(&self.moving)
            .chain(&self.ghosts)
            .chain(&self.arrows)
            .chain(&self.steps)
            .chain(self.ruler.iter())
    }

    pub fn len(&self) -> usize {
        self.in_draw_order().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An attack arrow found by a hit query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrowInfo {
    pub attacker: EntityId,
    pub target: EntityId,
    pub halved: bool,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct Transit {
    origin: Coord,
    at: Coord,
    facing: HexDirection,
}

/// Sprite bookkeeping for one board view
pub struct SpriteStore {
    geometry: HexGeometry,
    config: Arc<RenderConfig>,
    entities: BTreeMap<EntityId, Entity>,
    transit: BTreeMap<EntityId, Transit>,
    /// (attacker, target) -> labels of every attack between them
    attacks: BTreeMap<(EntityId, EntityId), Vec<String>>,
    cursors: BTreeMap<CursorKind, Coord>,
    path: Vec<MovementStep>,
    ruler: Option<(Coord, Coord)>,
    field_markers: Vec<(Coord, String)>,
    set: Swap<SpriteSet>,
}

impl SpriteStore {
    pub fn new(geometry: HexGeometry, config: Arc<RenderConfig>) -> Self {
        Self {
            geometry,
            config,
            entities: BTreeMap::new(),
            transit: BTreeMap::new(),
            attacks: BTreeMap::new(),
            cursors: BTreeMap::new(),
            path: Vec::new(),
            ruler: None,
            field_markers: Vec::new(),
            set: Swap::new(SpriteSet::default()),
        }
    }

    /// Current sprite set
    pub fn snapshot(&self) -> Arc<SpriteSet> {
        self.set.load()
    }

    pub fn geometry(&self) -> HexGeometry {
        self.geometry
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn is_in_transit(&self, id: EntityId) -> bool {
        self.transit.contains_key(&id)
    }

    /// Where the entity is currently drawn
    fn position_of(&self, id: EntityId) -> Option<Coord> {
        if let Some(t) = self.transit.get(&id) {
            return Some(t.at);
        }
        self.entities.get(&id).map(|e| e.position)
    }

    fn show_text(&self) -> bool {
        self.geometry.scale() >= self.config.text_min_scale
    }

    // === ENTITIES ===

    /// Create or replace the sprite for an entity. Links and arrows touching
    /// it are re-derived because its position may have changed.
    pub fn upsert(&mut self, entity: Entity) {
        let id = entity.id;
        self.entities.insert(id, entity);

        let unit = self.unit_sprite(id);
        let ghost = self.ghost_sprite(id);
        let moving = self.moving_sprite(id);
        let links = self.link_sprites_touching(id);
        let arrows = self.arrow_sprites_touching(id);
        self.set.update(|set| {
            set.units.retain(|s| s.kind.entity() != Some(id));
            set.units.extend(unit);
            set.units.sort_by_key(unit_layer_key);
            set.ghosts.retain(|s| s.kind.entity() != Some(id));
            set.ghosts.extend(ghost);
            set.moving.retain(|s| s.kind.entity() != Some(id));
            set.moving.extend(moving);
            set.links.retain(|s| !s.kind.references(id));
            set.links.extend(links);
            set.arrows.retain(|s| !s.kind.references(id));
            set.arrows.extend(arrows);
        });
    }

    /// Forget an entity and every sprite referencing it
    pub fn remove_entity(&mut self, id: EntityId) {
        self.entities.remove(&id);
        self.transit.remove(&id);
        self.attacks.retain(|(a, t), _| *a != id && *t != id);
        self.set.update(|set| {
            for layer in [
                &mut set.units,
                &mut set.moving,
                &mut set.ghosts,
                &mut set.links,
                &mut set.arrows,
            ] {
                layer.retain(|s| !s.kind.references(id));
            }
        });
    }

    fn unit_glyph(&self, entity: &Entity, at: Coord, facing: HexDirection) -> UnitGlyph {
        let palette = &self.config.palette;
        UnitGlyph {
            entity: entity.id,
            center: self.geometry.pixel_center(at),
            radius: self.geometry.hex_height() * UNIT_RADIUS,
            facing,
            color: palette.player(entity.owner),
            outline: palette.arrow_outline,
        }
    }

    fn unit_sprite(&self, id: EntityId) -> Option<Arc<Sprite>> {
        if self.transit.contains_key(&id) {
            return None;
        }
        let entity = self.entities.get(&id)?;
        let mut glyph = self.unit_glyph(entity, entity.position, entity.facing);
        let kind = if entity.is_wreck() {
            glyph.color = self.config.palette.wreck;
            SpriteKind::Wreck(glyph)
        } else {
            SpriteKind::Unit(glyph)
        };
        let mut sprite =
            Sprite::new(kind, self.geometry.hex_bounds(entity.position)).with_hidden(entity.hidden);
        if self.show_text() {
            let at = self.geometry.pixel_center(entity.position)
                + Point::new(0.0, self.geometry.hex_height() * 0.42);
            sprite = sprite.with_label(at, entity.name.clone(), self.config.palette.text);
        }
        Some(Arc::new(sprite))
    }

    fn unit_sprites(&self) -> Vec<Arc<Sprite>> {
        let mut units: Vec<Arc<Sprite>> = self
            .entities
            .keys()
            .filter_map(|id| self.unit_sprite(*id))
            .collect();
        units.sort_by_key(unit_layer_key);
        units
    }

    // === LINKS ===

    fn link_pairs(&self) -> BTreeSet<(EntityId, EntityId)> {
        if !self.config.show_links {
            return BTreeSet::new();
        }
        self.entities
            .values()
            .filter_map(|e| {
                let partner = e.link_to?;
                if partner == e.id || !self.entities.contains_key(&partner) {
                    return None;
                }
                Some((e.id.min(partner), e.id.max(partner)))
            })
            .collect()
    }

    fn link_sprite(&self, from: EntityId, to: EntityId) -> Option<Arc<Sprite>> {
        let a = self.geometry.pixel_center(self.position_of(from)?);
        let b = self.geometry.pixel_center(self.position_of(to)?);
        let width = (2.0 * self.geometry.scale()).max(1.0);
        let hidden = [from, to]
            .iter()
            .any(|id| self.entities.get(id).is_some_and(|e| e.hidden));
        let kind = SpriteKind::Link {
            from,
            to,
            a,
            b,
            width,
            color: self.config.palette.link,
        };
        Some(Arc::new(
            Sprite::new(kind, Rect::from_points(a, b).inflate(width)).with_hidden(hidden),
        ))
    }

    fn link_sprites(&self) -> Vec<Arc<Sprite>> {
        self.link_pairs()
            .into_iter()
            .filter_map(|(a, b)| self.link_sprite(a, b))
            .collect()
    }

    fn link_sprites_touching(&self, id: EntityId) -> Vec<Arc<Sprite>> {
        self.link_pairs()
            .into_iter()
            .filter(|(a, b)| *a == id || *b == id)
            .filter_map(|(a, b)| self.link_sprite(a, b))
            .collect()
    }

    /// Re-derive every relationship link from the current entity snapshots
    pub fn refresh_links(&mut self) {
        let links = self.link_sprites();
        self.set.update(|set| set.links = links);
    }

    // === ATTACKS ===

    /// Register an attack. A second attack between the same pair merges its
    /// label into the existing arrow; a reverse attack halves both arrows.
    pub fn add_attack(&mut self, attacker: EntityId, target: EntityId, label: impl Into<String>) {
        self.attacks
            .entry((attacker, target))
            .or_default()
            .push(label.into());

        let pair = |s: &Arc<Sprite>| {
            matches!(&s.kind, SpriteKind::AttackArrow { attacker: a, target: t, .. }
                if (*a == attacker && *t == target) || (*a == target && *t == attacker))
        };
        let mut fresh = Vec::new();
        fresh.extend(self.arrow_sprite(attacker, target));
        fresh.extend(self.arrow_sprite(target, attacker));
        self.set.update(|set| {
            set.arrows.retain(|s| !pair(s));
            set.arrows.extend(fresh);
        });
    }

    pub fn clear_attacks(&mut self) {
        self.attacks.clear();
        self.set.update(|set| set.arrows.clear());
    }

    fn arrow_sprite(&self, attacker: EntityId, target: EntityId) -> Option<Arc<Sprite>> {
        let labels = self.attacks.get(&(attacker, target))?.clone();
        let owner = self.entities.get(&attacker)?.owner;
        let hidden = [attacker, target]
            .iter()
            .any(|id| self.entities.get(id).is_some_and(|e| e.hidden));
        let a = self.geometry.pixel_center(self.position_of(attacker)?);
        let full = self.geometry.pixel_center(self.position_of(target)?);
        let halved = self.attacks.contains_key(&(target, attacker));
        let b = if halved { (a + full) / 2.0 } else { full };
        let width = (3.0 * self.geometry.scale()).max(1.5);

        let mut sprite = Sprite::new(
            SpriteKind::AttackArrow {
                attacker,
                target,
                a,
                b,
                halved,
                width,
                color: self.config.palette.player(owner),
                outline: self.config.palette.arrow_outline,
                labels: labels.clone(),
            },
            Rect::from_points(a, b).inflate(width * 3.0 + 2.0),
        )
        .with_hidden(hidden);
        if self.show_text() {
            sprite = sprite.with_label((a + b) / 2.0, labels.join(", "), self.config.palette.text);
        }
        Some(Arc::new(sprite))
    }

    fn arrow_sprites(&self) -> Vec<Arc<Sprite>> {
        self.attacks
            .keys()
            .filter_map(|(a, t)| self.arrow_sprite(*a, *t))
            .collect()
    }

    fn arrow_sprites_touching(&self, id: EntityId) -> Vec<Arc<Sprite>> {
        self.attacks
            .keys()
            .filter(|(a, t)| *a == id || *t == id)
            .filter_map(|(a, t)| self.arrow_sprite(*a, *t))
            .collect()
    }

    // === CURSORS, PATH, RULER, MARKERS ===

    /// Place or clear one of the cursors
    pub fn set_cursor(&mut self, kind: CursorKind, coord: Option<Coord>) {
        match coord {
            Some(c) => self.cursors.insert(kind, c),
            None => self.cursors.remove(&kind),
        };
        let cursors = self.cursor_sprites();
        self.set.update(|set| set.cursors = cursors);
    }

    pub fn cursor(&self, kind: CursorKind) -> Option<Coord> {
        self.cursors.get(&kind).copied()
    }

    fn cursor_sprites(&self) -> Vec<Arc<Sprite>> {
        let palette = &self.config.palette;
        let width = (2.0 * self.geometry.scale()).max(1.0);
        // BTreeMap iteration is already in priority order
        self.cursors
            .iter()
            .map(|(kind, coord)| {
                let color = match kind {
                    CursorKind::Pointer => palette.cursor,
                    CursorKind::Highlight => palette.highlight,
                    CursorKind::Selection => palette.selection,
                    CursorKind::FirstLos => palette.first_los,
                    CursorKind::SecondLos => palette.second_los,
                };
                Arc::new(Sprite::new(
                    SpriteKind::Cursor {
                        kind: *kind,
                        coord: *coord,
                        outline: self.geometry.hex_vertices(*coord),
                        width,
                        color,
                    },
                    self.geometry.hex_bounds(*coord).inflate(width),
                ))
            })
            .collect()
    }

    /// Show a planned movement path, replacing any previous one
    pub fn set_movement_path(&mut self, steps: Vec<MovementStep>) {
        self.path = steps;
        let steps = self.step_sprites();
        self.set.update(|set| set.steps = steps);
    }

    pub fn clear_movement_path(&mut self) {
        self.set_movement_path(Vec::new());
    }

    fn step_sprites(&self) -> Vec<Arc<Sprite>> {
        let palette = &self.config.palette;
        let radius = self.geometry.hex_height() * STEP_RADIUS;
        self.path
            .iter()
            .map(|step| {
                let color = match step.kind {
                    StepKind::Walk => palette.step_walk,
                    StepKind::Run => palette.step_run,
                    StepKind::Jump => palette.step_jump,
                    StepKind::Turn => palette.step_turn,
                };
                let center = self.geometry.pixel_center(step.coord);
                let mut sprite = Sprite::new(
                    SpriteKind::StepMarker {
                        coord: step.coord,
                        kind: step.kind,
                        center,
                        facing: step.facing,
                        radius,
                        color,
                    },
                    self.geometry.hex_bounds(step.coord),
                );
                if let (Some(cost), true) = (step.cost, self.show_text()) {
                    sprite = sprite.with_label(
                        center + Point::new(0.0, radius * 2.5),
                        cost.to_string(),
                        palette.text,
                    );
                }
                Arc::new(sprite)
            })
            .collect()
    }

    /// Show or clear the distance ruler
    pub fn set_ruler(&mut self, ends: Option<(Coord, Coord)>) {
        self.ruler = ends;
        let ruler = self.ruler_sprite();
        self.set.update(|set| set.ruler = ruler);
    }

    fn ruler_sprite(&self) -> Option<Arc<Sprite>> {
        let (start, end) = self.ruler?;
        let a = self.geometry.pixel_center(start);
        let b = self.geometry.pixel_center(end);
        let width = (2.0 * self.geometry.scale()).max(1.0);
        let distance = start.distance(&end);
        Some(Arc::new(
            Sprite::new(
                SpriteKind::Ruler {
                    start,
                    end,
                    a,
                    b,
                    distance,
                    width,
                    color: self.config.palette.ruler,
                },
                Rect::from_points(a, b).inflate(width * 2.0 + 1.0),
            )
            .with_label((a + b) / 2.0, format!("{} hexes", distance), self.config.palette.ruler),
        ))
    }

    /// Replace the per-hex field markers (artillery targets, flares, ...)
    pub fn set_field_markers(&mut self, markers: Vec<(Coord, String)>) {
        self.field_markers = markers;
        let sprites = self.field_marker_sprites();
        self.set.update(|set| set.field_markers = sprites);
    }

    fn field_marker_sprites(&self) -> Vec<Arc<Sprite>> {
        self.field_markers
            .iter()
            .map(|(coord, name)| {
                let mut sprite = Sprite::new(
                    SpriteKind::FieldMarker {
                        coord: *coord,
                        name: name.clone(),
                        outline: self.geometry.hex_vertices(*coord),
                        color: self.config.palette.marker,
                    },
                    self.geometry.hex_bounds(*coord),
                );
                if self.show_text() {
                    let at = self.geometry.pixel_center(*coord)
                        - Point::new(0.0, self.geometry.hex_height() * 0.25);
                    sprite = sprite.with_label(at, name.clone(), self.config.palette.text);
                }
                Arc::new(sprite)
            })
            .collect()
    }

    // === TRANSIT ===

    /// Start animating an entity: its static sprite becomes a ghost and a
    /// moving sprite appears at the same hex. Returns `false` for unknown
    /// entities.
    pub fn begin_transit(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.entities.get(&id) else {
            return false;
        };
        let transit = Transit {
            origin: entity.position,
            at: entity.position,
            facing: entity.facing,
        };
        self.transit.insert(id, transit);
        let ghost = self.ghost_sprite(id);
        let moving = self.moving_sprite(id);
        self.set.update(|set| {
            set.units.retain(|s| s.kind.entity() != Some(id));
            set.ghosts.retain(|s| s.kind.entity() != Some(id));
            set.ghosts.extend(ghost);
            set.moving.retain(|s| s.kind.entity() != Some(id));
            set.moving.extend(moving);
        });
        true
    }

    /// Move an in-transit entity's moving sprite to the next waypoint
    pub fn advance_transit(&mut self, id: EntityId, to: Coord, facing: HexDirection) {
        let Some(t) = self.transit.get_mut(&id) else {
            return;
        };
        t.at = to;
        t.facing = facing;
        let moving = self.moving_sprite(id);
        let links = self.link_sprites_touching(id);
        let arrows = self.arrow_sprites_touching(id);
        self.set.update(|set| {
            set.moving.retain(|s| s.kind.entity() != Some(id));
            set.moving.extend(moving);
            set.links.retain(|s| !s.kind.references(id));
            set.links.extend(links);
            set.arrows.retain(|s| !s.kind.references(id));
            set.arrows.extend(arrows);
        });
    }

    /// Finish a transit: ghost and moving sprites are replaced by a normal
    /// static sprite at the last waypoint.
    pub fn end_transit(&mut self, id: EntityId) {
        let Some(t) = self.transit.remove(&id) else {
            return;
        };
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.position = t.at;
            entity.facing = t.facing;
        }
        self.set.update(|set| {
            set.ghosts.retain(|s| s.kind.entity() != Some(id));
            set.moving.retain(|s| s.kind.entity() != Some(id));
        });
        if let Some(entity) = self.entities.get(&id).cloned() {
            self.upsert(entity);
        }
    }

    fn ghost_sprite(&self, id: EntityId) -> Option<Arc<Sprite>> {
        let t = self.transit.get(&id)?;
        let entity = self.entities.get(&id)?;
        let alpha = self.config.palette.ghost_alpha;
        let mut glyph = self.unit_glyph(entity, t.origin, entity.facing);
        glyph.color = glyph.color.with_alpha(alpha);
        glyph.outline = glyph.outline.with_alpha(alpha);
        Some(Arc::new(
            Sprite::new(SpriteKind::Ghost(glyph), self.geometry.hex_bounds(t.origin))
                .with_hidden(entity.hidden),
        ))
    }

    fn moving_sprite(&self, id: EntityId) -> Option<Arc<Sprite>> {
        let t = self.transit.get(&id)?;
        let entity = self.entities.get(&id)?;
        let glyph = self.unit_glyph(entity, t.at, t.facing);
        Some(Arc::new(
            Sprite::new(SpriteKind::Moving(glyph), self.geometry.hex_bounds(t.at))
                .with_hidden(entity.hidden),
        ))
    }

    // === REBUILD ===

    /// Rebuild every sprite from the logical state with fresh image caches
    pub fn invalidate_all(&mut self) {
        let set = SpriteSet {
            field_markers: self.field_marker_sprites(),
            cursors: self.cursor_sprites(),
            links: self.link_sprites(),
            units: self.unit_sprites(),
            moving: self
                .transit
                .keys()
                .filter_map(|id| self.moving_sprite(*id))
                .collect(),
            ghosts: self
                .transit
                .keys()
                .filter_map(|id| self.ghost_sprite(*id))
                .collect(),
            arrows: self.arrow_sprites(),
            steps: self.step_sprites(),
            ruler: self.ruler_sprite(),
        };
        tracing::debug!("Rebuilt sprite set: {} sprites", set.len());
        self.set.store(set);
    }

    /// Enter a new phase: attacks, the movement path and the ruler are
    /// phase-scoped and are dropped; everything else is rebuilt.
    pub fn begin_phase(&mut self) {
        self.attacks.clear();
        self.path.clear();
        self.ruler = None;
        self.invalidate_all();
    }

    /// New zoom level or configuration
    pub fn reconfigure(&mut self, geometry: HexGeometry, config: Arc<RenderConfig>) {
        self.geometry = geometry;
        self.config = config;
        self.invalidate_all();
    }

    // === DRAW & QUERIES ===

    /// Draw all visible sprites intersecting the clip in layer order.
    /// Returns (drawn, skipped).
    pub fn draw(&self, canvas: &mut dyn Canvas) -> (usize, usize) {
        let set = self.set.load();
        let clip = canvas.clip();
        let mut drawn = 0;
        let mut skipped = 0;
        for sprite in set.in_draw_order() {
            if sprite.is_visible_in(&clip) {
                sprite.draw(canvas);
                drawn += 1;
            } else {
                skipped += 1;
            }
        }
        (drawn, skipped)
    }

    /// Entities whose counters cover `point`, topmost first
    pub fn entities_at(&self, point: Point) -> Vec<EntityId> {
        let set = self.set.load();
        let mut ids = Vec::new();
        for sprite in set.moving.iter().rev().chain(set.units.iter().rev()) {
            if let Some(id) = sprite.kind.entity() {
                if sprite.hit(point) && !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }

    /// Attack arrows passing under `point`
    pub fn arrows_at(&self, point: Point) -> Vec<ArrowInfo> {
        let set = self.set.load();
        set.arrows
            .iter()
            .filter(|s| s.hit(point))
            .filter_map(|s| match &s.kind {
                SpriteKind::AttackArrow {
                    attacker,
                    target,
                    halved,
                    labels,
                    ..
                } => Some(ArrowInfo {
                    attacker: *attacker,
                    target: *target,
                    halved: *halved,
                    labels: labels.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}
