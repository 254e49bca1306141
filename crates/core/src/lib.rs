//! Core simulation - deterministic, tick-driven, no I/O
//!
//! This crate holds every rule of the falling-block session: the shape
//! table, the settled playfield, collision, the falling piece, spawning,
//! input gating and the engine that sequences them once per tick. It has
//! **no dependencies** on drawing or device I/O, so it is:
//!
//! - **Deterministic**: the same seed and the same inputs replay the same session
//! - **Testable**: every rule is reachable from plain function calls
//! - **Headless**: a runner, a renderer or an agent can drive it equally
//!
//! # Module Structure
//!
//! - [`shapes`]: 4x4 rotation masks and wall kick tables
//! - [`playfield`]: settled cells, locking and line clearing
//! - [`collision`]: bounds and overlap predicate, ground obstacles
//! - [`controller`]: the falling piece, gravity and lock delay
//! - [`spawn`]: seeded one-ahead piece sequencer
//! - [`gate`]: per-channel input rate limiting
//! - [`engine`]: the per-tick pipeline and session state
//! - [`events`], [`snapshot`]: what the engine reports outward
//!
//! # Rules
//!
//! - **Uniform draws**: each spawn refills the preview with one of the seven types
//! - **Clockwise rotation** with wall kicks (the box never kicks)
//! - **Lock delay**: a grounded piece locks once the player has been idle
//!   longer than the lock delay
//! - **Speed-up**: each cleared line shortens the gravity interval, down to a floor
//! - **Game Over**: a blocked spawn, or a piece locking above the top row
//!
//! # Example
//!
//! ```
//! use tetr_core::Engine;
//! use tetr_types::{InputSnapshot, PieceAction};
//!
//! let mut engine = Engine::with_seed(12345);
//! assert!(engine.active().is_some());
//!
//! engine.apply(PieceAction::MoveRight);
//! engine.apply(PieceAction::HardDrop);
//! assert_eq!(engine.pieces_locked(), 1);
//!
//! let report = engine.tick(1.0 / 60.0, &InputSnapshot::IDLE);
//! assert_eq!(report.tick, 1);
//! ```

pub mod collision;
pub mod controller;
pub mod engine;
pub mod events;
pub mod gate;
pub mod playfield;
pub mod shapes;
pub mod snapshot;
pub mod spawn;

pub use tetr_types as types;

pub use collision::{pips, CollisionResolver, Obstacle};
pub use controller::{FallingPiece, GravityOutcome, LockOutcome, PieceController, PieceState};
pub use engine::Engine;
pub use events::{EngineEvent, TickReport};
pub use gate::{ActionGate, ChannelTimer, GatedActions};
pub use playfield::Playfield;
pub use shapes::{shape_for, wall_kick_offsets, Kick, Shape};
pub use snapshot::{ActiveSnapshot, FrameSnapshot};
pub use spawn::{SpawnOutcome, SpawnSequencer};
