//! Property tests for the hex geometry laws

use hexboard::board::{generate_board, GeneratorConfig};
use hexboard::core::Color;
use hexboard::field::blend;
use hexboard::hex::{Coord, HexDirection, HexGeometry};
use hexboard::renderer::elevation_borders;
use proptest::prelude::*;

fn direction() -> impl Strategy<Value = HexDirection> {
    (0usize..6).prop_map(HexDirection::from_index)
}

fn color() -> impl Strategy<Value = Color> {
    any::<[u8; 4]>().prop_map(|[r, g, b, a]| Color::rgba(r, g, b, a))
}

proptest! {
    #[test]
    fn prop_center_roundtrip(x in -40i32..120, y in -40i32..120, scale in 0.2f64..3.0) {
        let g = HexGeometry::new(scale).unwrap();
        let c = Coord::new(x, y);
        prop_assert_eq!(g.coord_at(g.pixel_center(c)), c);
    }

    #[test]
    fn prop_adjacency_symmetric(x in -100i32..100, y in -100i32..100, d in direction()) {
        let c = Coord::new(x, y);
        let n = c.neighbor(d);
        prop_assert_eq!(n.neighbor(d.opposite()), c);
        prop_assert_eq!(c.distance(&n), 1);
        prop_assert_eq!(c.direction_to(&n), Some(d));
    }

    #[test]
    fn prop_distance_symmetric(ax in -30i32..30, ay in -30i32..30, bx in -30i32..30, by in -30i32..30) {
        let a = Coord::new(ax, ay);
        let b = Coord::new(bx, by);
        prop_assert_eq!(a.distance(&b), b.distance(&a));
        let line = a.line_to(&b);
        prop_assert_eq!(line.len() as u32, a.distance(&b) + 1);
        prop_assert_eq!(line.first(), Some(&a));
        prop_assert_eq!(line.last(), Some(&b));
    }

    #[test]
    fn prop_shared_edge_has_same_endpoints(x in -20i32..20, y in -20i32..20, d in direction(), scale in 0.3f64..2.0) {
        let g = HexGeometry::new(scale).unwrap();
        let c = Coord::new(x, y);
        let (a, b) = g.hex_edge(c, d);
        let (c2, d2) = g.hex_edge(c.neighbor(d), d.opposite());
        prop_assert!((a - d2).length() < 1e-9);
        prop_assert!((b - c2).length() < 1e-9);
    }

    #[test]
    fn prop_elevation_borders_symmetric(seed in any::<u64>()) {
        let config = GeneratorConfig { width: 8, height: 8, seed, hills: 4, ..Default::default() };
        let board = generate_board(&config);
        for x in 0..8 {
            for y in 0..8 {
                let c = Coord::new(x, y);
                let borders = elevation_borders(&board, c);
                for d in HexDirection::all() {
                    let n = c.neighbor(d);
                    let back = elevation_borders(&board, n);
                    prop_assert_eq!(borders[d.index()], back[d.opposite().index()], "{:?} {:?}", c, d);
                }
            }
        }
    }

    #[test]
    fn prop_blend_commutative(a in color(), b in color()) {
        prop_assert_eq!(blend(a, b), blend(b, a));
    }
}
