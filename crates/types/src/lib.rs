//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used by the simulation core and the
//! runner. All types are plain data with no game logic, so a drawing or input
//! collaborator can depend on them without pulling in the engine.
//!
//! # Grid Dimensions
//!
//! The observed configuration is a narrow, tall well:
//!
//! - **Width**: 12 columns (indexed 0-11)
//! - **Height**: 33 rows (indexed 0-32, row 0 is the top)
//! - **Floor row**: 32, occupied by static ground obstacles
//! - **Spawn origin**: (1, 1), the top-left corner of the 4x4 piece box
//!
//! # Timing Defaults
//!
//! All timing values are seconds (`f32`), matching the per-tick elapsed time
//! the engine is driven with:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_SECS` | 1/60 | Nominal frame time |
//! | `BASE_FALL_INTERVAL_SECS` | 0.8 | Gravity step at session start |
//! | `FALL_SPEEDUP_PER_LINE_SECS` | 0.1 | Interval reduction per cleared line |
//! | `MIN_FALL_INTERVAL_SECS` | 0.05 | Gravity never gets faster than this |
//! | `LOCK_DELAY_SECS` | 1.0 | Idle time before a grounded piece locks |
//!
//! # Examples
//!
//! ```
//! use tetr_types::{PieceType, Rotation, PieceAction, GRID_WIDTH, GRID_HEIGHT};
//!
//! let kind = PieceType::from_str("t").unwrap();
//! assert_eq!(kind, PieceType::T);
//!
//! let rotation = Rotation::SPAWN.cw().cw();
//! assert_eq!(rotation.index(), 2);
//! assert!(Rotation::new(4).is_err());
//!
//! assert_eq!(PieceAction::from_str("hardDrop"), Some(PieceAction::HardDrop));
//! assert_eq!((GRID_WIDTH, GRID_HEIGHT), (12, 33));
//! ```

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};

mod config;

pub use config::{ConfigError, EngineConfig, GateIntervals};

/// Grid width in cells (12 columns)
pub const GRID_WIDTH: u16 = 12;

/// Grid height in cells (33 rows)
pub const GRID_HEIGHT: u16 = 33;

/// Row holding the static ground; pieces settle above it
pub const FLOOR_ROW: u16 = GRID_HEIGHT - 1;

/// Spawn anchor for new pieces (top-left of the 4x4 box)
pub const SPAWN_ORIGIN: GridPos = GridPos::new(1, 1);

/// Nominal frame time (60 FPS)
pub const TICK_SECS: f32 = 1.0 / 60.0;

/// Gravity interval at session start
pub const BASE_FALL_INTERVAL_SECS: f32 = 0.8;

/// Gravity interval reduction per cleared line
pub const FALL_SPEEDUP_PER_LINE_SECS: f32 = 0.1;

/// Lower bound for the gravity interval
pub const MIN_FALL_INTERVAL_SECS: f32 = 0.05;

/// Time without player input before a grounded piece is committed
pub const LOCK_DELAY_SECS: f32 = 1.0;

/// Auto-repeat interval for left/right movement
pub const MOVE_REPEAT_SECS: f32 = 0.1;

/// Auto-repeat interval for soft drop
pub const SOFT_DROP_REPEAT_SECS: f32 = 0.05;

/// Auto-repeat interval for rotation
pub const ROTATE_REPEAT_SECS: f32 = 0.2;

/// Cadence of the hard-drop channel
pub const HARD_DROP_REPEAT_SECS: f32 = 0.25;

/// The seven piece types
///
/// Declaration order is the shape table order and fixes [`PieceType::index`]:
/// - **I**: tower, four in a line
/// - **O**: box, 2x2 square (rotation-invariant)
/// - **T**: pyramid
/// - **Z**: left lean
/// - **S**: right lean (mirror of Z)
/// - **J**: left knight
/// - **L**: right knight (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    I,
    O,
    T,
    Z,
    S,
    J,
    L,
}

impl PieceType {
    /// Every piece type in shape table order
    pub const ALL: [PieceType; 7] = [
        PieceType::I,
        PieceType::O,
        PieceType::T,
        PieceType::Z,
        PieceType::S,
        PieceType::J,
        PieceType::L,
    ];

    /// Position in the shape table (0..=6)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`PieceType::index`]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse piece type from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetr_types::PieceType;
    ///
    /// assert_eq!(PieceType::from_str("i"), Some(PieceType::I));
    /// assert_eq!(PieceType::from_str("O"), Some(PieceType::O));
    /// assert_eq!(PieceType::from_str("box"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceType::I),
            "o" => Some(PieceType::O),
            "t" => Some(PieceType::T),
            "z" => Some(PieceType::Z),
            "s" => Some(PieceType::S),
            "j" => Some(PieceType::J),
            "l" => Some(PieceType::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceType::I => "i",
            PieceType::O => "o",
            PieceType::T => "t",
            PieceType::Z => "z",
            PieceType::S => "s",
            PieceType::J => "j",
            PieceType::L => "l",
        }
    }

    /// Value written into the playfield when a piece of this type locks.
    ///
    /// Always non-zero; zero means an empty cell.
    pub fn cell_value(self) -> u8 {
        self.index() as u8 + 1
    }
}

/// Returned when a raw rotation index is outside 0..=3
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRotation(pub u8);

impl fmt::Display for InvalidRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid rotation index {} (expected 0..=3)", self.0)
    }
}

impl std::error::Error for InvalidRotation {}

/// Rotation index (0 = spawn orientation, each step is 90° clockwise)
///
/// Only values 0..=3 can be constructed, so every shape lookup is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rotation(u8);

impl Rotation {
    /// Spawn orientation
    pub const SPAWN: Rotation = Rotation(0);

    /// Build from a raw index
    pub fn new(raw: u8) -> Result<Self, InvalidRotation> {
        if raw < 4 {
            Ok(Rotation(raw))
        } else {
            Err(InvalidRotation(raw))
        }
    }

    /// Rotate clockwise: `(r + 1) mod 4`
    ///
    /// # Examples
    ///
    /// ```
    /// use tetr_types::Rotation;
    ///
    /// let west = Rotation::new(3).unwrap();
    /// assert_eq!(west.cw(), Rotation::SPAWN);
    /// ```
    pub fn cw(self) -> Self {
        Rotation((self.0 + 1) % 4)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for Rotation {
    type Error = InvalidRotation;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Rotation::new(raw)
    }
}

impl From<Rotation> for u8 {
    fn from(rotation: Rotation) -> Self {
        rotation.0
    }
}

/// A cell coordinate in grid units (row 0 is the top)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position shifted by `(dx, dy)`
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl Add for GridPos {
    type Output = GridPos;

    fn add(self, rhs: GridPos) -> GridPos {
        self.offset(rhs.x, rhs.y)
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Identity of anything that occupies space as a discrete entity
/// (falling pieces and static ground obstacles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete player actions forwarded to the piece controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PieceAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one cell down
    SoftDrop,
    /// Rotate piece 90° clockwise (with wall kicks)
    Rotate,
    /// Drop piece to the lowest valid row and lock it
    HardDrop,
}

impl PieceAction {
    /// Parse action from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(PieceAction::MoveLeft),
            "moveright" => Some(PieceAction::MoveRight),
            "softdrop" => Some(PieceAction::SoftDrop),
            "rotate" => Some(PieceAction::Rotate),
            "harddrop" => Some(PieceAction::HardDrop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceAction::MoveLeft => "moveLeft",
            PieceAction::MoveRight => "moveRight",
            PieceAction::SoftDrop => "softDrop",
            PieceAction::Rotate => "rotate",
            PieceAction::HardDrop => "hardDrop",
        }
    }
}

/// Raw per-tick input reading, one analog magnitude per logical action.
///
/// Device noise (key vs. gamepad axis vs. button) is already folded away by
/// the input collector; a channel counts as active when its value is `> 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub move_left: f32,
    pub move_right: f32,
    pub soft_drop: f32,
    pub rotate: f32,
    pub hard_drop: f32,
}

impl InputSnapshot {
    /// No channel active
    pub const IDLE: InputSnapshot = InputSnapshot {
        move_left: 0.0,
        move_right: 0.0,
        soft_drop: 0.0,
        rotate: 0.0,
        hard_drop: 0.0,
    };

    /// Snapshot with exactly one action held at full magnitude
    pub fn holding(action: PieceAction) -> Self {
        let mut s = Self::IDLE;
        s.press(action);
        s
    }

    /// Mark `action` as held at full magnitude
    pub fn press(&mut self, action: PieceAction) {
        match action {
            PieceAction::MoveLeft => self.move_left = 1.0,
            PieceAction::MoveRight => self.move_right = 1.0,
            PieceAction::SoftDrop => self.soft_drop = 1.0,
            PieceAction::Rotate => self.rotate = 1.0,
            PieceAction::HardDrop => self.hard_drop = 1.0,
        }
    }

    pub fn is_active(&self, action: PieceAction) -> bool {
        let v = match action {
            PieceAction::MoveLeft => self.move_left,
            PieceAction::MoveRight => self.move_right,
            PieceAction::SoftDrop => self.soft_drop,
            PieceAction::Rotate => self.rotate,
            PieceAction::HardDrop => self.hard_drop,
        };
        v > 0.0
    }

    pub fn any_active(&self) -> bool {
        [
            PieceAction::MoveLeft,
            PieceAction::MoveRight,
            PieceAction::SoftDrop,
            PieceAction::Rotate,
            PieceAction::HardDrop,
        ]
        .iter()
        .any(|&a| self.is_active(a))
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    /// The freshly spawned piece overlapped settled cells
    BlockOut,
    /// A piece locked with cells above the top row
    LockOut,
}

impl GameOverReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverReason::BlockOut => "block_out",
            GameOverReason::LockOut => "lock_out",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_rejects_out_of_range() {
        for raw in 0..4u8 {
            assert_eq!(Rotation::new(raw).map(Rotation::index), Ok(raw as usize));
        }
        assert_eq!(Rotation::new(4), Err(InvalidRotation(4)));
        assert_eq!(Rotation::try_from(255u8), Err(InvalidRotation(255)));
    }

    #[test]
    fn rotation_cw_cycles() {
        let mut r = Rotation::SPAWN;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(r.index());
            r = r.cw();
        }
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(r, Rotation::SPAWN);
    }

    #[test]
    fn piece_type_index_roundtrip() {
        for (i, kind) in PieceType::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(PieceType::from_index(i), Some(*kind));
            assert_eq!(PieceType::from_str(kind.as_str()), Some(*kind));
            assert!(kind.cell_value() > 0);
        }
        assert_eq!(PieceType::from_index(7), None);
    }

    #[test]
    fn rotation_serde_rejects_bad_index() {
        assert_eq!(serde_json::to_string(&Rotation::SPAWN.cw()).unwrap(), "1");
        assert!(serde_json::from_str::<Rotation>("2").is_ok());
        assert!(serde_json::from_str::<Rotation>("9").is_err());
    }

    #[test]
    fn input_snapshot_activity() {
        let idle = InputSnapshot::IDLE;
        assert!(!idle.any_active());

        let s = InputSnapshot::holding(PieceAction::Rotate);
        assert!(s.is_active(PieceAction::Rotate));
        assert!(!s.is_active(PieceAction::HardDrop));
        assert!(s.any_active());

        let analog = InputSnapshot {
            move_left: 0.3,
            ..InputSnapshot::IDLE
        };
        assert!(analog.is_active(PieceAction::MoveLeft));
    }

    #[test]
    fn grid_pos_add() {
        let p = GridPos::new(1, 1) + GridPos::new(-2, 3);
        assert_eq!(p, GridPos::new(-1, 4));
        assert_eq!(GridPos::from((2, 5)).offset(0, 1), GridPos::new(2, 6));
    }
}
