//! Step-by-step unit movement.
//!
//! Movement speed depends only on the step delay: idle time accumulates
//! across ticks, and every full delay pops one waypoint off every moving
//! unit. Tick period and frame rate do not change how fast units move.

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use crate::core::types::EntityId;
use crate::hex::{Coord, HexDirection};

/// One hex of an animated move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waypoint {
    pub coord: Coord,
    pub facing: HexDirection,
}

impl Waypoint {
    pub fn new(coord: Coord, facing: HexDirection) -> Self {
        Self { coord, facing }
    }
}

/// A unit with waypoints still to visit
#[derive(Debug, Clone, PartialEq)]
pub struct MovingUnit {
    pub entity: EntityId,
    pub path: VecDeque<Waypoint>,
}

/// What one advance did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveEvent {
    Stepped { entity: EntityId, to: Waypoint },
    /// The unit's queue is empty
    Arrived { entity: EntityId },
    /// The last moving unit arrived
    AllFinished,
}

#[derive(Debug, Clone)]
pub struct MoveAdvancer {
    units: BTreeMap<EntityId, MovingUnit>,
    idle: Duration,
    step_delay: Duration,
}

impl MoveAdvancer {
    pub fn new(step_delay: Duration) -> Self {
        Self {
            units: BTreeMap::new(),
            idle: Duration::ZERO,
            step_delay,
        }
    }

    pub fn set_step_delay(&mut self, step_delay: Duration) {
        self.step_delay = step_delay;
    }

    /// Queue a path. Replaces any path the entity is still on; an empty path
    /// is ignored.
    pub fn start(&mut self, entity: EntityId, path: Vec<Waypoint>) -> bool {
        if path.is_empty() {
            return false;
        }
        if self.units.is_empty() {
            self.idle = Duration::ZERO;
        }
        self.units.insert(
            entity,
            MovingUnit {
                entity,
                path: path.into(),
            },
        );
        true
    }

    pub fn is_moving(&self, entity: EntityId) -> bool {
        self.units.contains_key(&entity)
    }

    pub fn is_idle(&self) -> bool {
        self.units.is_empty()
    }

    pub fn moving(&self) -> impl Iterator<Item = &MovingUnit> {
        self.units.values()
    }

    /// Drop a unit without finishing its path
    pub fn cancel(&mut self, entity: EntityId) -> Option<MovingUnit> {
        self.units.remove(&entity)
    }

    /// Accumulate `elapsed` and consume one waypoint per unit for every full
    /// step delay accumulated.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<MoveEvent> {
        let mut events = Vec::new();
        if self.units.is_empty() {
            self.idle = Duration::ZERO;
            return events;
        }
        self.idle += elapsed;

        while self.idle >= self.step_delay && !self.units.is_empty() {
            self.idle -= self.step_delay;

            let mut arrived = Vec::new();
            for unit in self.units.values_mut() {
                if let Some(to) = unit.path.pop_front() {
                    events.push(MoveEvent::Stepped {
                        entity: unit.entity,
                        to,
                    });
                }
                if unit.path.is_empty() {
                    arrived.push(unit.entity);
                }
            }
            for entity in arrived {
                self.units.remove(&entity);
                events.push(MoveEvent::Arrived { entity });
            }
            if self.units.is_empty() {
                events.push(MoveEvent::AllFinished);
                self.idle = Duration::ZERO;
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: i32) -> Vec<Waypoint> {
        (1..=n)
            .map(|y| Waypoint::new(Coord::new(0, y), HexDirection::South))
            .collect()
    }

    fn finished(events: &[MoveEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, MoveEvent::AllFinished))
            .count()
    }

    #[test]
    fn test_three_steps_in_300ms() {
        let mut mover = MoveAdvancer::new(Duration::from_millis(100));
        mover.start(EntityId(1), path(3));

        let mut events = Vec::new();
        for _ in 0..14 {
            events.extend(mover.advance(Duration::from_millis(20)));
        }
        // 280 ms: two steps
        assert_eq!(events.len(), 2);
        assert!(mover.is_moving(EntityId(1)));

        events.extend(mover.advance(Duration::from_millis(20)));
        assert_eq!(finished(&events), 1);
        assert!(mover.is_idle());
        assert!(events.contains(&MoveEvent::Arrived { entity: EntityId(1) }));

        for _ in 0..10 {
            events.extend(mover.advance(Duration::from_millis(20)));
        }
        assert_eq!(finished(&events), 1);
    }

    #[test]
    fn test_speed_independent_of_tick_size() {
        let mut coarse = MoveAdvancer::new(Duration::from_millis(100));
        coarse.start(EntityId(1), path(5));
        let coarse_events = coarse.advance(Duration::from_millis(250));

        let mut fine = MoveAdvancer::new(Duration::from_millis(100));
        fine.start(EntityId(1), path(5));
        let mut fine_events = Vec::new();
        for _ in 0..50 {
            fine_events.extend(fine.advance(Duration::from_millis(5)));
        }
        assert_eq!(coarse_events, fine_events);
    }

    #[test]
    fn test_units_finish_independently() {
        let mut mover = MoveAdvancer::new(Duration::from_millis(100));
        mover.start(EntityId(1), path(1));
        mover.start(EntityId(2), path(2));
        let first = mover.advance(Duration::from_millis(100));
        assert!(first.contains(&MoveEvent::Arrived { entity: EntityId(1) }));
        assert_eq!(finished(&first), 0);
        let second = mover.advance(Duration::from_millis(100));
        assert_eq!(finished(&second), 1);
    }

    #[test]
    fn test_idle_time_not_banked() {
        let mut mover = MoveAdvancer::new(Duration::from_millis(100));
        mover.advance(Duration::from_secs(5));
        mover.start(EntityId(1), path(2));
        let events = mover.advance(Duration::from_millis(20));
        assert!(events.is_empty());
    }

    #[test]
    fn test_empty_path_ignored() {
        let mut mover = MoveAdvancer::new(Duration::from_millis(100));
        assert!(!mover.start(EntityId(1), Vec::new()));
        assert!(mover.is_idle());
    }
}
