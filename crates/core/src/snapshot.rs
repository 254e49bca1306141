use serde::Serialize;
use tetr_types::{EntityId, GameOverReason, GridPos, PieceType, Rotation};

use crate::controller::FallingPiece;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSnapshot {
    pub id: EntityId,
    pub kind: PieceType,
    pub rotation: Rotation,
    pub origin: GridPos,
    pub cells: Vec<GridPos>,
}

impl From<FallingPiece> for ActiveSnapshot {
    fn from(piece: FallingPiece) -> Self {
        Self {
            id: piece.id,
            kind: piece.kind,
            rotation: piece.rotation,
            origin: piece.origin,
            cells: piece.pips().to_vec(),
        }
    }
}

/// Read-only view of one frame for a drawing collaborator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub width: usize,
    pub height: usize,
    pub floor_row: usize,
    /// Row-major playfield copy, 0 = empty
    pub cells: Vec<u8>,
    pub active: Option<ActiveSnapshot>,
    /// Origin the active piece would land at
    pub ghost: Option<GridPos>,
    pub next: PieceType,
    pub lines_cleared: u32,
    pub pieces_locked: u32,
    pub fall_interval: f32,
    pub game_over: Option<GameOverReason>,
}

impl FrameSnapshot {
    /// Cell value at (x, y), `None` if out of bounds
    pub fn cell(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x).copied()
    }

    pub fn playable(&self) -> bool {
        self.game_over.is_none()
    }
}

impl Default for FrameSnapshot {
    fn default() -> Self {
        Self {
            tick: 0,
            width: 0,
            height: 0,
            floor_row: 0,
            cells: Vec::new(),
            active: None,
            ghost: None,
            next: PieceType::I,
            lines_cleared: 0,
            pieces_locked: 0,
            fall_interval: 0.0,
            game_over: None,
        }
    }
}
