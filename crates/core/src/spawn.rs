//! Spawn sequencer - one-ahead piece buffer backed by a seeded RNG
//!
//! The buffered type is what the next spawn will produce, so a preview can
//! show it. Every spawn refills the buffer with a uniform draw over all seven
//! types. The same seed always yields the same sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tetr_types::{EntityId, GridPos, PieceType};

use crate::collision::CollisionResolver;
use crate::controller::{FallingPiece, PieceController};
use crate::playfield::Playfield;

/// Result of a spawn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// The piece is now the active piece
    Spawned(FallingPiece),
    /// The piece overlapped solid geometry at the spawn origin and was not activated
    Blocked(FallingPiece),
}

#[derive(Debug, Clone)]
pub struct SpawnSequencer {
    seed: u64,
    rng: StdRng,
    next: PieceType,
    origin: GridPos,
    first_id: u32,
    next_id: u32,
}

impl SpawnSequencer {
    /// Create a sequencer; piece ids are handed out from `first_id` upward
    pub fn new(seed: u64, origin: GridPos, first_id: u32) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let next = Self::draw(&mut rng);
        Self {
            seed,
            rng,
            next,
            origin,
            first_id,
            next_id: first_id,
        }
    }

    fn draw(rng: &mut StdRng) -> PieceType {
        PieceType::ALL[rng.gen_range(0..PieceType::ALL.len())]
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Type the next spawn will produce
    pub fn peek_next(&self) -> PieceType {
        self.next
    }

    /// Overwrite the buffered type (scripted sessions and fixtures)
    pub fn set_next(&mut self, kind: PieceType) {
        self.next = kind;
    }

    /// Spawn the buffered piece if no piece is falling.
    ///
    /// Returns `None` when a piece is already active. A blocked spawn still
    /// consumes the buffer and an id; the caller decides what a block-out means.
    pub fn spawn_if_empty(
        &mut self,
        controller: &mut PieceController,
        field: &Playfield,
        resolver: &CollisionResolver,
    ) -> Option<SpawnOutcome> {
        if controller.active().is_some() {
            return None;
        }

        let id = EntityId(self.next_id);
        self.next_id += 1;
        let piece = FallingPiece::new(id, self.next, self.origin);
        self.next = Self::draw(&mut self.rng);

        if resolver.would_collide(field, id, piece.shape(), piece.origin) {
            return Some(SpawnOutcome::Blocked(piece));
        }
        controller.activate(piece);
        Some(SpawnOutcome::Spawned(piece))
    }

    /// Rewind to the state right after construction
    pub fn reset(&mut self) {
        *self = Self::new(self.seed, self.origin, self.first_id);
    }
}
