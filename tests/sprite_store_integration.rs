//! Sprite store layering, arrows and stale references

use std::sync::Arc;

use hexboard::board::Entity;
use hexboard::core::{EntityId, PlayerId, Rect, RenderConfig};
use hexboard::hex::{Coord, HexDirection, HexGeometry};
use hexboard::renderer::{CursorKind, RasterCanvas, SpriteKind, SpriteStore};

fn store() -> SpriteStore {
    SpriteStore::new(HexGeometry::UNIT, Arc::new(RenderConfig::default()))
}

fn canvas() -> RasterCanvas {
    RasterCanvas::new(Rect::new(0.0, 0.0, 600.0, 600.0), RenderConfig::default().palette.background)
}

fn unit(id: u32, owner: u8, at: Coord) -> Entity {
    Entity::new(EntityId(id), format!("Unit {}", id), PlayerId(owner), at)
}

fn halved_flags(store: &SpriteStore) -> Vec<bool> {
    store
        .snapshot()
        .arrows
        .iter()
        .filter_map(|s| match &s.kind {
            SpriteKind::AttackArrow { halved, .. } => Some(*halved),
            _ => None,
        })
        .collect()
}

#[test]
fn test_unit_drawn_over_every_cursor() {
    let palette = RenderConfig::default().palette;
    let at = Coord::new(2, 2);
    let mut store = store();
    store.upsert(unit(1, 0, at));
    for kind in CursorKind::all() {
        store.set_cursor(kind, Some(at));
    }

    let mut canvas = canvas();
    let (drawn, _) = store.draw(&mut canvas);
    assert_eq!(drawn, 6);
    let center = HexGeometry::UNIT.pixel_center(at);
    assert_eq!(canvas.pixel_at(center), Some(palette.player(PlayerId(0))));
}

#[test]
fn test_moving_unit_drawn_over_static_unit() {
    let palette = RenderConfig::default().palette;
    let mut store = store();
    store.upsert(unit(1, 0, Coord::new(2, 2)));
    store.upsert(unit(2, 1, Coord::new(2, 4)));

    assert!(store.begin_transit(EntityId(1)));
    store.advance_transit(EntityId(1), Coord::new(2, 4), HexDirection::South);

    let mut canvas = canvas();
    store.draw(&mut canvas);
    let center = HexGeometry::UNIT.pixel_center(Coord::new(2, 4));
    assert_eq!(canvas.pixel_at(center), Some(palette.player(PlayerId(0))));
    assert_eq!(store.entities_at(center), vec![EntityId(1), EntityId(2)]);
}

#[test]
fn test_mutual_attack_halves_both_arrows() {
    let mut store = store();
    store.upsert(unit(1, 0, Coord::new(1, 1)));
    store.upsert(unit(2, 1, Coord::new(1, 5)));

    store.add_attack(EntityId(1), EntityId(2), "LRM-10");
    assert_eq!(halved_flags(&store), vec![false]);

    store.add_attack(EntityId(2), EntityId(1), "PPC");
    assert_eq!(halved_flags(&store), vec![true, true]);

    // Removing one side drops every arrow that referenced it
    store.remove_entity(EntityId(2));
    assert!(store.snapshot().arrows.is_empty());
}

#[test]
fn test_links_follow_moved_entity() {
    let mut store = store();
    store.upsert(unit(1, 0, Coord::new(1, 1)).with_link(EntityId(2)));
    store.upsert(unit(2, 0, Coord::new(3, 3)));
    assert_eq!(store.snapshot().links.len(), 1);

    let moved = Coord::new(5, 5);
    store.upsert(unit(2, 0, moved));
    let snapshot = store.snapshot();
    assert_eq!(snapshot.links.len(), 1);
    match &snapshot.links[0].kind {
        SpriteKind::Link { b, .. } => assert_eq!(*b, HexGeometry::UNIT.pixel_center(moved)),
        other => panic!("expected link, got {:?}", other),
    }
}

#[test]
fn test_phase_change_drops_phase_scoped_sprites() {
    let mut store = store();
    store.upsert(unit(1, 0, Coord::new(1, 1)).with_link(EntityId(2)));
    store.upsert(unit(2, 1, Coord::new(1, 4)));
    store.add_attack(EntityId(1), EntityId(2), "AC/5");
    store.set_ruler(Some((Coord::new(0, 0), Coord::new(4, 4))));

    store.begin_phase();
    let snapshot = store.snapshot();
    assert!(snapshot.arrows.is_empty());
    assert!(snapshot.ruler.is_none());
    assert_eq!(snapshot.units.len(), 2);
    assert_eq!(snapshot.links.len(), 1);
}

#[test]
fn test_replaced_sprite_is_a_new_instance() {
    let mut store = store();
    store.upsert(unit(1, 0, Coord::new(1, 1)));
    let before = Arc::clone(&store.snapshot().units[0]);
    store.upsert(unit(1, 0, Coord::new(1, 1)).with_facing(HexDirection::South));
    let after = Arc::clone(&store.snapshot().units[0]);
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(store.snapshot().units.len(), 1);
}
