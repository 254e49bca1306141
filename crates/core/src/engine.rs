//! Engine - owns the session and runs the fixed per-tick pipeline
//!
//! One tick, in order:
//! 1. the action gate samples input
//! 2. rotate, horizontal move, soft drop, hard drop (each only if released)
//! 3. gravity and lock delay
//! 4. lock, line clear and speed-up
//! 5. spawn if no piece is active
//!
//! A lock is therefore always followed by a spawn within the same tick.
//! Game Over freezes the session until [`Engine::restart`].

use tetr_types::{
    ConfigError, EngineConfig, GameOverReason, GridPos, InputSnapshot, PieceAction, PieceType,
};

use crate::collision::CollisionResolver;
use crate::controller::{FallingPiece, GravityOutcome, LockOutcome, PieceController};
use crate::events::{EngineEvent, TickReport};
use crate::gate::ActionGate;
use crate::playfield::Playfield;
use crate::snapshot::{ActiveSnapshot, FrameSnapshot};
use crate::spawn::{SpawnOutcome, SpawnSequencer};

/// First id handed to ground obstacles; pieces continue after them
const FIRST_ENTITY_ID: u32 = 1;

#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    field: Playfield,
    resolver: CollisionResolver,
    controller: PieceController,
    sequencer: SpawnSequencer,
    gate: ActionGate,
    /// Current gravity interval; shrinks as lines are cleared
    fall_interval: f32,
    lines_cleared: u32,
    pieces_locked: u32,
    game_over: Option<GameOverReason>,
    tick: u64,
    pending: Vec<EngineEvent>,
}

impl Engine {
    /// Validate `config` and start a session; the first piece is already falling
    pub fn new(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    /// Session with the default configuration
    pub fn with_seed(seed: u64) -> Self {
        Self::build(EngineConfig::default(), seed)
    }

    fn build(config: EngineConfig, seed: u64) -> Self {
        let floor_row = config.floor_row();
        let field = Playfield::with_floor(config.width, config.height, floor_row);
        let (resolver, first_piece_id) =
            CollisionResolver::with_ground(config.width, floor_row, FIRST_ENTITY_ID);
        let sequencer = SpawnSequencer::new(seed, config.spawn_origin, first_piece_id);

        let mut engine = Self {
            controller: PieceController::new(config.base_fall_interval),
            gate: ActionGate::new(config.gate),
            fall_interval: config.base_fall_interval,
            field,
            resolver,
            sequencer,
            config,
            lines_cleared: 0,
            pieces_locked: 0,
            game_over: None,
            tick: 0,
            pending: Vec::new(),
        };
        engine.spawn_if_empty();
        engine
    }

    /// Start over with the same configuration and seed
    pub fn restart(&mut self) {
        let base = self.config.base_fall_interval;
        self.field.clear();
        self.controller.reset(base);
        self.sequencer.reset();
        self.gate.reset();
        self.fall_interval = base;
        self.lines_cleared = 0;
        self.pieces_locked = 0;
        self.game_over = None;
        self.tick = 0;
        self.pending.clear();
        self.spawn_if_empty();
    }

    /// Advance the session by `dt` seconds with the given input
    pub fn tick(&mut self, dt: f32, input: &InputSnapshot) -> TickReport {
        if self.game_over.is_some() {
            return TickReport {
                tick: self.tick,
                events: std::mem::take(&mut self.pending),
                ..TickReport::default()
            };
        }

        self.tick += 1;
        let lines_before = self.lines_cleared;

        let actions = self.gate.update(dt, input);
        if self.controller.active().is_some() && !actions.is_empty() {
            self.controller.note_action();
        }
        for action in actions.actions() {
            self.apply_action(action);
        }

        let gravity = self.controller.gravity(
            dt,
            self.fall_interval,
            self.config.lock_delay,
            &self.field,
            &self.resolver,
        );
        if gravity == GravityOutcome::LockDue {
            self.lock_active();
        }

        self.spawn_if_empty();

        TickReport {
            tick: self.tick,
            actions,
            lines_cleared: self.lines_cleared - lines_before,
            events: std::mem::take(&mut self.pending),
        }
    }

    /// Apply one action immediately, bypassing the gate.
    ///
    /// Counts as player activity for the lock delay. A hard drop locks and the
    /// next piece spawns before this returns. Events are delivered with the
    /// next tick report or [`Engine::drain_events`].
    pub fn apply(&mut self, action: PieceAction) -> bool {
        if self.game_over.is_some() || self.controller.active().is_none() {
            return false;
        }
        self.controller.note_action();
        let accepted = self.apply_action(action);
        self.spawn_if_empty();
        accepted
    }

    fn apply_action(&mut self, action: PieceAction) -> bool {
        let (field, resolver) = (&self.field, &self.resolver);
        match action {
            PieceAction::MoveLeft => self.controller.try_move(field, resolver, -1, 0),
            PieceAction::MoveRight => self.controller.try_move(field, resolver, 1, 0),
            PieceAction::SoftDrop => self.controller.try_move(field, resolver, 0, 1),
            PieceAction::Rotate => self.controller.try_rotate(field, resolver).is_some(),
            PieceAction::HardDrop => {
                if self.controller.hard_drop(field, resolver).is_none() {
                    return false;
                }
                self.lock_active();
                true
            }
        }
    }

    fn lock_active(&mut self) {
        let Some(outcome) = self.controller.lock(&mut self.field) else {
            return;
        };

        match outcome {
            LockOutcome::Locked(piece) => {
                self.pieces_locked += 1;
                self.pending.push(EngineEvent::Locked {
                    tick: self.tick,
                    piece: piece.id,
                    kind: piece.kind,
                    rotation: piece.rotation,
                    origin: piece.origin,
                });

                let cleared = self.field.clear_full_rows() as u32;
                if cleared > 0 {
                    self.lines_cleared += cleared;
                    self.fall_interval = (self.fall_interval
                        - self.config.fall_speedup_per_line * cleared as f32)
                        .max(self.config.min_fall_interval);
                    self.pending.push(EngineEvent::LinesCleared {
                        tick: self.tick,
                        count: cleared,
                        total: self.lines_cleared,
                        fall_interval: self.fall_interval,
                    });
                }
            }
            LockOutcome::LockOut(_) => self.end(GameOverReason::LockOut),
        }
    }

    fn end(&mut self, reason: GameOverReason) {
        self.game_over = Some(reason);
        self.pending.push(EngineEvent::GameOver {
            tick: self.tick,
            reason,
        });
    }

    /// Spawn the buffered piece if nothing is falling.
    ///
    /// Returns true if a piece was spawned. A blocked spawn ends the session.
    pub fn spawn_if_empty(&mut self) -> bool {
        if self.game_over.is_some() {
            return false;
        }
        match self
            .sequencer
            .spawn_if_empty(&mut self.controller, &self.field, &self.resolver)
        {
            Some(SpawnOutcome::Spawned(piece)) => {
                self.pending.push(EngineEvent::Spawned {
                    tick: self.tick,
                    piece: piece.id,
                    kind: piece.kind,
                    origin: piece.origin,
                    next: self.sequencer.peek_next(),
                });
                true
            }
            Some(SpawnOutcome::Blocked(_)) => {
                self.end(GameOverReason::BlockOut);
                false
            }
            None => false,
        }
    }

    /// Replace the active piece with a fresh piece of `kind` at the spawn origin.
    ///
    /// Meant for scripted sessions and fixtures.
    pub fn respawn_as(&mut self, kind: PieceType) -> bool {
        self.controller.discard();
        self.sequencer.set_next(kind);
        self.spawn_if_empty()
    }

    /// Events raised since the last report
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Origin the active piece would land at if hard-dropped now
    pub fn ghost_origin(&self) -> Option<GridPos> {
        self.controller.ghost_origin(&self.field, &self.resolver)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let mut out = FrameSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    /// Fill `out` in place, reusing its cell buffer
    pub fn snapshot_into(&self, out: &mut FrameSnapshot) {
        out.tick = self.tick;
        out.width = self.field.width();
        out.height = self.field.height();
        out.floor_row = self.field.floor_row();
        out.cells.clear();
        out.cells.extend_from_slice(self.field.cells());
        out.active = self.controller.active().copied().map(ActiveSnapshot::from);
        out.ghost = self.ghost_origin();
        out.next = self.sequencer.peek_next();
        out.lines_cleared = self.lines_cleared;
        out.pieces_locked = self.pieces_locked;
        out.fall_interval = self.fall_interval;
        out.game_over = self.game_over;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.sequencer.seed()
    }

    pub fn field(&self) -> &Playfield {
        &self.field
    }

    /// Direct playfield access for fixtures; writes here skip the lock checks
    pub fn field_mut(&mut self) -> &mut Playfield {
        &mut self.field
    }

    pub fn resolver(&self) -> &CollisionResolver {
        &self.resolver
    }

    pub fn controller(&self) -> &PieceController {
        &self.controller
    }

    pub fn gate(&self) -> &ActionGate {
        &self.gate
    }

    pub fn active(&self) -> Option<&FallingPiece> {
        self.controller.active()
    }

    pub fn next_piece(&self) -> PieceType {
        self.sequencer.peek_next()
    }

    pub fn fall_interval(&self) -> f32 {
        self.fall_interval
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn game_over(&self) -> Option<GameOverReason> {
        self.game_over
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }
}
