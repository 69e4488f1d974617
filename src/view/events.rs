//! Semantic events emitted to UI collaborators

use tokio::sync::mpsc::UnboundedSender;

use crate::board::LosReport;
use crate::core::types::EntityId;
use crate::hex::Coord;

/// Something the board view wants the surrounding UI to know about
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    Highlighted(Coord),
    Selected(Coord),
    CursorMoved(Coord),
    /// First click of the two-click LOS probe
    FirstLos(Coord),
    /// Second click of the LOS probe, with the rule engine's answer
    SecondLos {
        from: Coord,
        to: Coord,
        report: LosReport,
    },
    /// The last moving unit reached its destination
    FinishedMoving,
    /// Double-click on a hex
    HexActivated(Coord),
    /// Context menu requested over a hex; `entities` are under the pointer,
    /// topmost first
    PopupRequested {
        coord: Coord,
        entities: Vec<EntityId>,
    },
    RulerMeasured {
        start: Coord,
        end: Coord,
        distance: u32,
    },
}

/// Outgoing event feed. A closed receiver is not an error: nobody is
/// listening, so events are dropped.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<UnboundedSender<BoardEvent>>,
}

impl EventSink {
    pub fn new(tx: UnboundedSender<BoardEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// A sink that discards everything
    pub fn none() -> Self {
        Self { tx: None }
    }

    pub fn emit(&self, event: BoardEvent) {
        tracing::trace!("Board event: {:?}", event);
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }
}
