//! Engine events and per-tick reports
//!
//! Events are plain serializable records; the runner writes them as JSON
//! lines. The engine itself never performs I/O.

use serde::Serialize;
use tetr_types::{EntityId, GameOverReason, GridPos, PieceType, Rotation};

use crate::gate::GatedActions;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    Spawned {
        tick: u64,
        piece: EntityId,
        kind: PieceType,
        origin: GridPos,
        next: PieceType,
    },
    Locked {
        tick: u64,
        piece: EntityId,
        kind: PieceType,
        rotation: Rotation,
        origin: GridPos,
    },
    LinesCleared {
        tick: u64,
        count: u32,
        total: u32,
        fall_interval: f32,
    },
    GameOver {
        tick: u64,
        reason: GameOverReason,
    },
}

impl EngineEvent {
    pub fn tick(&self) -> u64 {
        match self {
            EngineEvent::Spawned { tick, .. }
            | EngineEvent::Locked { tick, .. }
            | EngineEvent::LinesCleared { tick, .. }
            | EngineEvent::GameOver { tick, .. } => *tick,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::Spawned { .. } => "spawned",
            EngineEvent::Locked { .. } => "locked",
            EngineEvent::LinesCleared { .. } => "lines_cleared",
            EngineEvent::GameOver { .. } => "game_over",
        }
    }
}

/// What happened during one `Engine::tick`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    /// Tick number after this tick ran (unchanged if the session is over)
    pub tick: u64,
    /// Actions the gate released this tick
    pub actions: GatedActions,
    pub lines_cleared: u32,
    /// Events raised since the previous report, in order
    pub events: Vec<EngineEvent>,
}

impl TickReport {
    pub fn locked(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, EngineEvent::Locked { .. }))
    }

    pub fn spawned(&self) -> Option<PieceType> {
        self.events.iter().find_map(|e| match e {
            EngineEvent::Spawned { kind, .. } => Some(*kind),
            _ => None,
        })
    }

    pub fn game_over(&self) -> Option<GameOverReason> {
        self.events.iter().find_map(|e| match e {
            EngineEvent::GameOver { reason, .. } => Some(*reason),
            _ => None,
        })
    }
}
