//! Entity snapshots as reported by the rule engine

use serde::{Deserialize, Serialize};

use crate::core::types::{Color, EntityId, PlayerId};
use crate::hex::{Coord, HexDirection};

/// Activation status of an entity for the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EntityStatus {
    #[default]
    Ready,
    /// Already acted this phase
    Done,
    Immobile,
    /// Drawn as a wreck
    Destroyed,
}

/// Broad unit class, used to pick the sprite glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UnitClass {
    #[default]
    Mech,
    Vehicle,
    Infantry,
    Aero,
}

impl UnitClass {
    pub fn name(&self) -> &'static str {
        match self {
            UnitClass::Mech => "mech",
            UnitClass::Vehicle => "vehicle",
            UnitClass::Infantry => "infantry",
            UnitClass::Aero => "aero",
        }
    }
}

/// Area-of-effect equipment carried by an entity (e.g. a jammer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEmitter {
    pub radius: u32,
    /// Tint override; the palette's field color is used when `None`
    pub tint: Option<Color>,
    /// Restrict the field to the 60 degree sector facing this way
    pub arc: Option<HexDirection>,
    pub active: bool,
}

impl FieldEmitter {
    pub fn new(radius: u32) -> Self {
        Self {
            radius,
            tint: None,
            arc: None,
            active: true,
        }
    }
}

/// Immutable snapshot of a game entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub owner: PlayerId,
    pub class: UnitClass,
    pub position: Coord,
    pub facing: HexDirection,
    pub status: EntityStatus,
    /// Concealed from the local player; kept but not drawn
    pub hidden: bool,
    /// Network/relationship partner this entity links to
    pub link_to: Option<EntityId>,
    pub emitter: Option<FieldEmitter>,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, owner: PlayerId, position: Coord) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
            class: UnitClass::default(),
            position,
            facing: HexDirection::default(),
            status: EntityStatus::default(),
            hidden: false,
            link_to: None,
            emitter: None,
        }
    }

    pub fn with_facing(mut self, facing: HexDirection) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_status(mut self, status: EntityStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_class(mut self, class: UnitClass) -> Self {
        self.class = class;
        self
    }

    pub fn with_link(mut self, partner: EntityId) -> Self {
        self.link_to = Some(partner);
        self
    }

    pub fn with_emitter(mut self, emitter: FieldEmitter) -> Self {
        self.emitter = Some(emitter);
        self
    }

    pub fn is_wreck(&self) -> bool {
        self.status == EntityStatus::Destroyed
    }

    /// Tooltip lines
    pub fn describe(&self) -> Vec<String> {
        let status = match self.status {
            EntityStatus::Ready => "ready",
            EntityStatus::Done => "done",
            EntityStatus::Immobile => "immobile",
            EntityStatus::Destroyed => "destroyed",
        };
        vec![
            format!("{} ({})", self.name, self.class.name()),
            format!("Player {}, {}", self.owner.0, status),
        ]
    }
}
