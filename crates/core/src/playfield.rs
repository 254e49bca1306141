//! Playfield module - settled geometry of the well
//!
//! The playfield is a `width x height` grid of `u8` cells stored as a flat
//! row-major array. 0 is empty, any other value is a locked cell (the engine
//! writes `PieceType::cell_value()` so renderers can color settled cells).
//! Coordinates: (x, y) with x left to right and y top to bottom; row 0 is the top.
//!
//! The playfield is pure storage. It does not treat out-of-bounds cells as
//! occupied; bounds are the collision resolver's concern.

use std::fmt;

use tetr_types::GridPos;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playfield {
    width: usize,
    height: usize,
    floor_row: usize,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<u8>,
}

impl Playfield {
    /// Create an empty playfield whose floor is the bottom row
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_floor(width, height, height.saturating_sub(1))
    }

    /// Create an empty playfield with an explicit floor row.
    ///
    /// Locking never writes at or below `floor_row`.
    pub fn with_floor(width: u16, height: u16, floor_row: u16) -> Self {
        assert!(width > 0 && height > 0, "playfield must not be empty");
        assert!(floor_row < height, "floor row {} outside height {}", floor_row, height);
        let (width, height) = (width as usize, height as usize);
        Self {
            width,
            height,
            floor_row: floor_row as usize,
            cells: vec![0; width * height],
        }
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn floor_row(&self) -> usize {
        self.floor_row
    }

    /// Cell value at (x, y), `None` if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Overwrite a cell without any lock contract checks.
    ///
    /// Returns false if out of bounds. Intended for fixtures and tooling; the
    /// simulation itself only writes through [`Playfield::lock`].
    pub fn set(&mut self, x: i32, y: i32, value: u8) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Whether a cell holds settled geometry. Out-of-bounds cells are not occupied.
    pub fn is_occupied(&self, pos: GridPos) -> bool {
        matches!(self.get(pos.x, pos.y), Some(v) if v > 0)
    }

    /// Commit a piece's cells with the given non-zero value.
    ///
    /// # Panics
    ///
    /// If `value` is 0, or any cell is out of bounds, at or below the floor
    /// row, or already occupied. These mean a collision check was skipped
    /// upstream. Nothing is written when the contract is violated.
    pub fn lock<I>(&mut self, cells: I, value: u8)
    where
        I: IntoIterator<Item = GridPos>,
    {
        assert!(value > 0, "lock value must be non-zero");

        let mut targets = [0usize; 16];
        let mut n = 0usize;
        for pos in cells {
            let Some(idx) = self.index(pos.x, pos.y) else {
                panic!("lock outside playfield at ({}, {})", pos.x, pos.y);
            };
            assert!(
                (pos.y as usize) < self.floor_row,
                "lock at ({}, {}) is at or below floor row {}",
                pos.x,
                pos.y,
                self.floor_row
            );
            assert!(
                self.cells[idx] == 0 && !targets[..n].contains(&idx),
                "lock over occupied cell ({}, {})",
                pos.x,
                pos.y
            );
            assert!(n < targets.len(), "lock with more than 16 cells");
            targets[n] = idx;
            n += 1;
        }

        for &idx in &targets[..n] {
            self.cells[idx] = value;
        }
    }

    /// Check if a row is completely filled across the full width
    pub fn is_row_full(&self, y: usize) -> bool {
        y < self.height && self.row(y).iter().all(|&c| c > 0)
    }

    /// One row as a slice
    ///
    /// # Panics
    ///
    /// If `y` is not a valid row.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.cells[start..start + self.width]
    }

    /// Remove every full row and collapse the rows above; returns the count.
    ///
    /// Rows are compacted bottom-up with a write cursor that never passes the
    /// read cursor, so every row is tested for fullness before anything is
    /// copied over it: the set of cleared rows is exactly the set of rows that
    /// were full before the call. Each surviving row drops by the number of
    /// cleared rows beneath it and the vacated rows at the top become empty.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.width;
        let mut cleared = 0usize;
        let mut write_y = self.height;

        for read_y in (0..self.height).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src = read_y * width;
                self.cells.copy_within(src..src + width, write_y * width);
            }
        }

        for cell in &mut self.cells[..write_y * width] {
            *cell = 0;
        }

        cleared
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Number of locked cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c > 0).count()
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.fill(0);
    }
}

impl fmt::Display for Playfield {
    /// Text dump: `#` for locked cells, `.` for empty, `=` marks the floor row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for &c in self.row(y) {
                let ch = if c > 0 {
                    '#'
                } else if y == self.floor_row {
                    '='
                } else {
                    '.'
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
