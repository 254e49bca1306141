//! Shape table - 4x4 rotation masks and wall kick offsets
//!
//! Each piece type has four clockwise rotation states stored as 16-bit
//! occupancy masks. Bit 15 is the top-left cell of the 4x4 box and bits run
//! row-major, so `0xF000` is a full top row.
//!
//! Kick tables are indexed by the *target* rotation and use grid coordinates
//! (y grows downward).

use std::fmt;

use tetr_types::{PieceType, Rotation};

/// A 4x4 occupancy mask for one (piece type, rotation) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape(u16);

impl Shape {
    pub const fn from_bits(bits: u16) -> Self {
        Shape(bits)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    /// Whether the cell at column `col`, row `row` (both 0..4) is set
    #[inline(always)]
    pub fn is_set(self, col: usize, row: usize) -> bool {
        debug_assert!(col < 4 && row < 4);
        (self.0 >> (15 - (row * 4 + col))) & 1 == 1
    }

    /// Offsets `(col, row)` of every set cell, row-major
    pub fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        (0..16usize)
            .filter(move |i| (self.0 >> (15 - i)) & 1 == 1)
            .map(|i| ((i % 4) as i32, (i / 4) as i32))
    }

    /// Number of set cells
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Mask as a flat row-major array (`true` = occupied)
    pub fn to_array(self) -> [bool; 16] {
        let mut out = [false; 16];
        for (i, cell) in out.iter_mut().enumerate() {
            *cell = (self.0 >> (15 - i)) & 1 == 1;
        }
        out
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4 {
            for col in 0..4 {
                f.write_str(if self.is_set(col, row) { "#" } else { "." })?;
            }
            if row < 3 {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}

/// Rotation masks in `PieceType::ALL` order
const SHAPES: [[u16; 4]; 7] = [
    // I
    [0xF000, 0x2222, 0x00F0, 0x4444],
    // O
    [0x6600, 0x6600, 0x6600, 0x6600],
    // T
    [0x4E00, 0x4640, 0x0E40, 0x4C40],
    // Z
    [0xC600, 0x2640, 0x0C60, 0x4C80],
    // S
    [0x6C00, 0x4620, 0x06C0, 0x8C40],
    // J
    [0x8E00, 0x6440, 0x0E20, 0x44C0],
    // L
    [0x2E00, 0x4460, 0x0E80, 0xC440],
];

/// Get the shape for a piece type and rotation
pub fn shape_for(kind: PieceType, rotation: Rotation) -> Shape {
    Shape(SHAPES[kind.index()][rotation.index()])
}

/// A single kick candidate `(dx, dy)`
pub type Kick = (i32, i32);

/// Kick table indexed by target rotation
pub type KickTable = [[Kick; 4]; 4];

/// I piece kicks
const LONG_KICKS: KickTable = [
    [(-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(-1, 0), (2, 0), (-1, 2), (2, -1)],
    [(2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(1, 0), (-2, 0), (1, -2), (-2, 1)],
];

/// Kicks shared by T, Z, S, J, L
const COMMON_KICKS: KickTable = [
    [(-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(1, 0), (1, -1), (0, 2), (1, 2)],
    [(1, 0), (1, 1), (0, -2), (1, -2)],
    [(-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// Ordered kick candidates to try when rotating into `target`.
///
/// The identity offset is not included; callers test it first. The box piece
/// gets an empty slice since its shape never changes.
pub fn wall_kick_offsets(kind: PieceType, target: Rotation) -> &'static [Kick] {
    match kind {
        PieceType::O => &[],
        PieceType::I => &LONG_KICKS[target.index()],
        _ => &COMMON_KICKS[target.index()],
    }
}
