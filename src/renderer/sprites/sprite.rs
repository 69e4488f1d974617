//! The sprite value type.
//!
//! A sprite is immutable once built: any change to what it shows produces a
//! new sprite, so its cached image never needs invalidating in place.

use std::sync::OnceLock;

use image::RgbaImage;

use crate::core::types::{Color, EntityId, Point, Rect};
use crate::hex::{Coord, HexDirection};
use crate::renderer::canvas::{Canvas, TextRun};
use crate::renderer::sprites::paint;

/// Cursor role. Ordering is draw priority: later variants draw on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CursorKind {
    /// Follows the pointer
    Pointer,
    Highlight,
    Selection,
    FirstLos,
    SecondLos,
}

impl CursorKind {
    pub fn all() -> [CursorKind; 5] {
        [
            CursorKind::Pointer,
            CursorKind::Highlight,
            CursorKind::Selection,
            CursorKind::FirstLos,
            CursorKind::SecondLos,
        ]
    }
}

/// How a unit enters a hex on a planned path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Walk,
    Run,
    Jump,
    /// Facing change without leaving the hex
    Turn,
}

/// One step of a planned movement path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementStep {
    pub coord: Coord,
    pub facing: HexDirection,
    pub kind: StepKind,
    /// Movement points spent so far, shown next to the marker
    pub cost: Option<u32>,
}

impl MovementStep {
    pub fn new(coord: Coord, facing: HexDirection, kind: StepKind) -> Self {
        Self {
            coord,
            facing,
            kind,
            cost: None,
        }
    }

    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = Some(cost);
        self
    }
}

/// Drawing data for anything shaped like a unit counter
#[derive(Debug, Clone, PartialEq)]
pub struct UnitGlyph {
    pub entity: EntityId,
    pub center: Point,
    pub radius: f64,
    pub facing: HexDirection,
    pub color: Color,
    pub outline: Color,
}

/// What a sprite shows, with everything needed to paint it.
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteKind {
    Unit(UnitGlyph),
    /// In-transit unit at its current waypoint
    Moving(UnitGlyph),
    /// Translucent copy at the unit's last static position while in transit
    Ghost(UnitGlyph),
    Wreck(UnitGlyph),
    StepMarker {
        coord: Coord,
        kind: StepKind,
        center: Point,
        facing: HexDirection,
        radius: f64,
        color: Color,
    },
    Link {
        from: EntityId,
        to: EntityId,
        a: Point,
        b: Point,
        width: f64,
        color: Color,
    },
    AttackArrow {
        attacker: EntityId,
        target: EntityId,
        /// Tail and head of the drawn portion
        a: Point,
        b: Point,
        /// Only the attacker's half of the connecting line is drawn
        halved: bool,
        width: f64,
        color: Color,
        outline: Color,
        labels: Vec<String>,
    },
    Cursor {
        kind: CursorKind,
        coord: Coord,
        outline: [Point; 6],
        width: f64,
        color: Color,
    },
    FieldMarker {
        coord: Coord,
        name: String,
        outline: [Point; 6],
        color: Color,
    },
    Ruler {
        start: Coord,
        end: Coord,
        a: Point,
        b: Point,
        distance: u32,
        width: f64,
        color: Color,
    },
}

impl SpriteKind {
    /// Entities this sprite depends on
    pub fn references(&self, id: EntityId) -> bool {
        match self {
            SpriteKind::Unit(g) | SpriteKind::Moving(g) | SpriteKind::Ghost(g) | SpriteKind::Wreck(g) => {
                g.entity == id
            }
            SpriteKind::Link { from, to, .. } => *from == id || *to == id,
            SpriteKind::AttackArrow { attacker, target, .. } => *attacker == id || *target == id,
            _ => false,
        }
    }

    /// Entity shown by a unit-like sprite
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            SpriteKind::Unit(g) | SpriteKind::Moving(g) | SpriteKind::Ghost(g) | SpriteKind::Wreck(g) => {
                Some(g.entity)
            }
            _ => None,
        }
    }
}

/// A positioned drawable with a lazily built image.
#[derive(Debug)]
pub struct Sprite {
    pub kind: SpriteKind,
    bounds: Rect,
    pub hidden: bool,
    label: Option<TextRun>,
    image: OnceLock<RgbaImage>,
}

impl Sprite {
    /// Bounds are widened to whole pixels so the cached image lines up with
    /// the back buffer exactly.
    pub fn new(kind: SpriteKind, bounds: Rect) -> Self {
        Self {
            kind,
            bounds: bounds.snap_out(),
            hidden: false,
            label: None,
            image: OnceLock::new(),
        }
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_label(mut self, at: Point, text: impl Into<String>, color: Color) -> Self {
        self.label = Some(TextRun {
            at,
            text: text.into(),
            color,
        });
        self
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn label(&self) -> Option<&TextRun> {
        self.label.as_ref()
    }

    pub fn is_cached(&self) -> bool {
        self.image.get().is_some()
    }

    /// The cached image, painting it on first use
    pub fn image(&self) -> &RgbaImage {
        self.image
            .get_or_init(|| paint::paint(&self.kind, self.bounds))
    }

    /// Whether a draw into `clip` would show anything
    pub fn is_visible_in(&self, clip: &Rect) -> bool {
        !self.hidden && self.bounds.intersects(clip)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.blit(self.image(), self.bounds.origin());
        if let Some(label) = &self.label {
            canvas.draw_text(label.at, &label.text, label.color);
        }
    }

    /// Hit test against the painted shape's extent
    pub fn hit(&self, point: Point) -> bool {
        if self.hidden || !self.bounds.contains(point) {
            return false;
        }
        match &self.kind {
            SpriteKind::Unit(g) | SpriteKind::Moving(g) | SpriteKind::Ghost(g) | SpriteKind::Wreck(g) => {
                g.center.distance(point) <= g.radius
            }
            SpriteKind::AttackArrow { a, b, width, .. }
            | SpriteKind::Link { a, b, width, .. }
            | SpriteKind::Ruler { a, b, width, .. } => segment_distance(point, *a, *b) <= width * 2.0,
            _ => true,
        }
    }
}

/// Distance from `p` to the segment `a`-`b`
pub(crate) fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
