//! Piece controller - the single falling piece and everything that moves it
//!
//! States: no active piece, or one piece falling. Locking is a transition,
//! not a resting state: [`PieceController::lock`] commits the piece to the
//! playfield and leaves the controller empty in the same call.
//!
//! Every candidate placement goes through the collision resolver. A rejected
//! move or rotation is a normal outcome and leaves the piece untouched.

use arrayvec::ArrayVec;
use tetr_types::{EntityId, GridPos, PieceType, Rotation};

use crate::collision::{pips, CollisionResolver};
use crate::playfield::Playfield;
use crate::shapes::{shape_for, wall_kick_offsets, Kick, Shape};

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FallingPiece {
    pub id: EntityId,
    pub kind: PieceType,
    pub rotation: Rotation,
    /// Top-left anchor of the 4x4 box
    pub origin: GridPos,
}

impl FallingPiece {
    /// Create a piece in spawn orientation
    pub fn new(id: EntityId, kind: PieceType, origin: GridPos) -> Self {
        Self {
            id,
            kind,
            rotation: Rotation::SPAWN,
            origin,
        }
    }

    /// Get the shape for the current rotation
    pub fn shape(&self) -> Shape {
        shape_for(self.kind, self.rotation)
    }

    /// Absolute cells covered by the piece
    pub fn pips(&self) -> ArrayVec<GridPos, 16> {
        pips(self.shape(), self.origin)
    }
}

/// Controller state as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceState {
    NoActivePiece,
    Falling,
}

/// What one gravity step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GravityOutcome {
    /// No piece, or the fall timer has not run out yet
    Waiting,
    /// The piece moved down one row
    Fell,
    /// The row below is blocked but the player acted recently; the piece stays put
    Stalled,
    /// The row below is blocked and the grace period is over
    LockDue,
}

/// Result of committing the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    /// Cells written into the playfield
    Locked(FallingPiece),
    /// The piece still had cells above the top row; nothing was written
    LockOut(FallingPiece),
}

#[derive(Debug, Clone)]
pub struct PieceController {
    active: Option<FallingPiece>,
    /// Countdown to the next gravity step
    fall_timer: f32,
    /// Seconds since the gate last forwarded an action
    since_last_action: f32,
}

impl PieceController {
    pub fn new(fall_interval: f32) -> Self {
        Self {
            active: None,
            fall_timer: fall_interval,
            since_last_action: 0.0,
        }
    }

    pub fn state(&self) -> PieceState {
        match self.active {
            Some(_) => PieceState::Falling,
            None => PieceState::NoActivePiece,
        }
    }

    pub fn active(&self) -> Option<&FallingPiece> {
        self.active.as_ref()
    }

    /// Install a freshly spawned piece.
    ///
    /// # Panics
    ///
    /// If a piece is already falling; only one may exist at a time.
    pub fn activate(&mut self, piece: FallingPiece) {
        assert!(
            self.active.is_none(),
            "activate while piece {} is still falling",
            piece.id
        );
        self.active = Some(piece);
    }

    /// Drop the active piece without locking it
    pub fn discard(&mut self) -> Option<FallingPiece> {
        self.active.take()
    }

    pub fn fall_timer(&self) -> f32 {
        self.fall_timer
    }

    pub fn since_last_action(&self) -> f32 {
        self.since_last_action
    }

    /// Record that the player just acted (restarts the lock grace period)
    pub fn note_action(&mut self) {
        self.since_last_action = 0.0;
    }

    fn collides(
        piece: &FallingPiece,
        field: &Playfield,
        resolver: &CollisionResolver,
        shape: Shape,
        origin: GridPos,
    ) -> bool {
        resolver.would_collide(field, piece.id, shape, origin)
    }

    /// Try to shift the active piece by `(dx, dy)`
    pub fn try_move(
        &mut self,
        field: &Playfield,
        resolver: &CollisionResolver,
        dx: i32,
        dy: i32,
    ) -> bool {
        debug_assert!((-1..=1).contains(&dx) && (0..=1).contains(&dy));
        let Some(piece) = self.active.as_mut() else {
            return false;
        };

        let candidate = piece.origin.offset(dx, dy);
        if Self::collides(piece, field, resolver, piece.shape(), candidate) {
            return false;
        }
        piece.origin = candidate;
        true
    }

    /// Rotate clockwise, trying the in-place position first and then each
    /// wall kick for the target rotation in table order.
    ///
    /// Returns the offset that was applied (`(0, 0)` for an in-place
    /// rotation), or `None` if every candidate collided.
    pub fn try_rotate(&mut self, field: &Playfield, resolver: &CollisionResolver) -> Option<Kick> {
        let piece = self.active.as_mut()?;
        let current = *piece;

        let target = current.rotation.cw();
        let new_shape = shape_for(current.kind, target);

        let kick = std::iter::once((0, 0))
            .chain(wall_kick_offsets(current.kind, target).iter().copied())
            .find(|&(dx, dy)| {
                !Self::collides(&current, field, resolver, new_shape, current.origin.offset(dx, dy))
            })?;

        piece.rotation = target;
        piece.origin = piece.origin.offset(kick.0, kick.1);
        Some(kick)
    }

    /// Lowest reachable origin straight below the piece, without moving it.
    ///
    /// Bounded by the playfield height.
    pub fn ghost_origin(
        &self,
        field: &Playfield,
        resolver: &CollisionResolver,
    ) -> Option<GridPos> {
        let piece = self.active.as_ref()?;
        let shape = piece.shape();
        let limit = field.height() as i32 + 4;

        let mut origin = piece.origin;
        for _ in 0..limit {
            let next = origin.offset(0, 1);
            if Self::collides(piece, field, resolver, shape, next) {
                break;
            }
            origin = next;
        }
        Some(origin)
    }

    /// Move the piece to its landing row. Returns the distance dropped.
    ///
    /// The caller locks the piece right after; hard drops skip the lock delay.
    pub fn hard_drop(&mut self, field: &Playfield, resolver: &CollisionResolver) -> Option<u32> {
        let landing = self.ghost_origin(field, resolver)?;
        let piece = self.active.as_mut()?;
        let distance = (landing.y - piece.origin.y) as u32;
        piece.origin = landing;
        Some(distance)
    }

    /// Advance gravity by `dt`.
    ///
    /// The fall timer runs whether or not a piece is active. When it crosses
    /// below zero it is reset to `fall_interval` and the piece tries to move
    /// down one row. If the row below is blocked, the piece is due to lock
    /// only once `lock_delay` seconds have passed without player action.
    pub fn gravity(
        &mut self,
        dt: f32,
        fall_interval: f32,
        lock_delay: f32,
        field: &Playfield,
        resolver: &CollisionResolver,
    ) -> GravityOutcome {
        self.since_last_action += dt;
        self.fall_timer -= dt;
        if self.fall_timer >= 0.0 {
            return GravityOutcome::Waiting;
        }
        self.fall_timer = fall_interval;

        let since_last_action = self.since_last_action;
        let Some(piece) = self.active.as_mut() else {
            return GravityOutcome::Waiting;
        };

        let below = piece.origin.offset(0, 1);
        if Self::collides(piece, field, resolver, piece.shape(), below) {
            if since_last_action > lock_delay {
                GravityOutcome::LockDue
            } else {
                GravityOutcome::Stalled
            }
        } else {
            piece.origin = below;
            GravityOutcome::Fell
        }
    }

    /// Commit the active piece to the playfield.
    ///
    /// A piece with any cell above row 0 cannot be written and is reported as
    /// [`LockOutcome::LockOut`]. Either way the controller is empty afterwards.
    pub fn lock(&mut self, field: &mut Playfield) -> Option<LockOutcome> {
        let piece = self.active.take()?;
        let cells = piece.pips();
        if cells.iter().any(|p| p.y < 0) {
            return Some(LockOutcome::LockOut(piece));
        }
        field.lock(cells, piece.kind.cell_value());
        Some(LockOutcome::Locked(piece))
    }

    /// Forget the piece and rearm the timers
    pub fn reset(&mut self, fall_interval: f32) {
        *self = Self::new(fall_interval);
    }
}
