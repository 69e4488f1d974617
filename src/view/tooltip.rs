//! Tooltip text for a board point

use crate::board::BoardModel;
use crate::core::types::{EntityId, Point};
use crate::renderer::sprites::SpriteStore;

/// Lines describing whatever is under `point` (board pixels): the hex, then
/// every entity counter, then every attack arrow. Empty off the board.
pub fn tooltip_at(board: &dyn BoardModel, sprites: &SpriteStore, point: Point) -> Vec<String> {
    let coord = sprites.geometry().coord_at(point);
    let Some(hex) = board.hex(coord) else {
        return Vec::new();
    };

    let mut lines = vec![format!("Hex {}", coord.board_label())];
    lines.extend(hex.describe());

    for id in sprites.entities_at(point) {
        if let Some(entity) = sprites.entity(id) {
            lines.extend(entity.describe());
        }
    }

    for arrow in sprites.arrows_at(point) {
        let mut line = format!("{} -> {}", name_of(sprites, arrow.attacker), name_of(sprites, arrow.target));
        if !arrow.labels.is_empty() {
            line.push_str(": ");
            line.push_str(&arrow.labels.join(", "));
        }
        lines.push(line);
    }

    lines
}

fn name_of(sprites: &SpriteStore, id: EntityId) -> String {
    sprites
        .entity(id)
        .map(|e| e.name.clone())
        .unwrap_or_else(|| format!("#{}", id.0))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::board::{Entity, GridBoard, TerrainKind};
    use crate::core::config::RenderConfig;
    use crate::core::types::PlayerId;
    use crate::hex::{Coord, HexGeometry};

    #[test]
    fn test_tooltip_lists_hex_entity_and_arrow() {
        let mut board = GridBoard::new(6, 6);
        board.set_terrain(Coord::new(1, 1), TerrainKind::Woods, 1);
        let mut store = SpriteStore::new(HexGeometry::UNIT, Arc::new(RenderConfig::default()));
        store.upsert(Entity::new(EntityId(1), "Atlas", PlayerId(0), Coord::new(1, 1)));
        store.upsert(Entity::new(EntityId(2), "Locust", PlayerId(1), Coord::new(1, 4)));
        store.add_attack(EntityId(1), EntityId(2), "AC/20");

        let center = HexGeometry::UNIT.pixel_center(Coord::new(1, 1));
        let lines = tooltip_at(&board, &store, center);
        assert_eq!(lines[0], "Hex 0202");
        assert!(lines.contains(&"Woods".to_string()));
        assert!(lines.contains(&"Atlas (mech)".to_string()));

        // Halfway down the arrow, clear of both counters
        let mid = HexGeometry::UNIT.pixel_center(Coord::new(1, 2))
            + Point::new(0.0, HexGeometry::UNIT.hex_height() / 2.0);
        let lines = tooltip_at(&board, &store, mid);
        assert!(lines.contains(&"Atlas -> Locust: AC/20".to_string()));
    }

    #[test]
    fn test_tooltip_off_board_is_empty() {
        let board = GridBoard::new(2, 2);
        let store = SpriteStore::new(HexGeometry::UNIT, Arc::new(RenderConfig::default()));
        assert!(tooltip_at(&board, &store, Point::new(-50.0, -50.0)).is_empty());
    }
}
