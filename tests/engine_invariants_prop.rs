//! Property tests for the tick pipeline.
//!
//! Invariants covered:
//! - At most one piece is active, and it never overlaps settled cells.
//! - Settled cells never appear at or below the floor row.
//! - Counters only grow and the fall interval never leaves its bounds.
//! - Hard drop terminates on something solid for every reachable piece.
//! - Four rotations in open space return to the start.

use proptest::prelude::*;
use tetr::core::{CollisionResolver, Engine, FallingPiece, PieceController, Playfield};
use tetr::types::{EntityId, GridPos, InputSnapshot, PieceAction, PieceType};

fn input_from_bits(bits: u8) -> InputSnapshot {
    let mut s = InputSnapshot::IDLE;
    let actions = [
        PieceAction::MoveLeft,
        PieceAction::MoveRight,
        PieceAction::SoftDrop,
        PieceAction::Rotate,
        PieceAction::HardDrop,
    ];
    for (i, action) in actions.into_iter().enumerate() {
        if bits & (1 << i) != 0 {
            s.press(action);
        }
    }
    s
}

fn assert_field_consistent(engine: &Engine) {
    let field = engine.field();
    let floor = field.floor_row();
    for y in floor..field.height() {
        assert!(field.row(y).iter().all(|&c| c == 0), "settled cell on row {}", y);
    }
    if let Some(piece) = engine.active() {
        for cell in piece.pips() {
            assert!(!field.is_occupied(cell), "active piece overlaps {:?}", cell);
            assert!(cell.x >= 0 && cell.x < field.width() as i32);
            assert!(cell.y < floor as i32, "active piece below the floor at {:?}", cell);
        }
    }
}

proptest! {
    #[test]
    fn tick_sequences_keep_invariants(
        seed in any::<u64>(),
        steps in prop::collection::vec((0u8..32, 1u32..40), 1..300),
    ) {
        let mut engine = Engine::with_seed(seed);
        let config = engine.config().clone();

        for (bits, centis) in steps {
            let before_lines = engine.lines_cleared();
            let before_locked = engine.pieces_locked();
            let dt = centis as f32 / 100.0;

            engine.tick(dt, &input_from_bits(bits));
            assert_field_consistent(&engine);

            prop_assert!(engine.lines_cleared() >= before_lines);
            prop_assert!(engine.pieces_locked() >= before_locked);
            prop_assert!(engine.fall_interval() >= config.min_fall_interval);
            prop_assert!(engine.fall_interval() <= config.base_fall_interval);
            if engine.is_game_over() {
                prop_assert!(engine.active().is_none());
                break;
            }
            prop_assert!(engine.active().is_some());
        }
    }

    #[test]
    fn hard_drop_terminates_on_solid_ground(
        seed in any::<u64>(),
        moves in prop::collection::vec(0u8..3, 0..12),
    ) {
        let mut engine = Engine::with_seed(seed);
        for m in moves {
            let action = match m {
                0 => PieceAction::MoveLeft,
                1 => PieceAction::MoveRight,
                _ => PieceAction::Rotate,
            };
            engine.apply(action);
        }

        let piece = engine.active().copied().unwrap();
        let landing = engine.ghost_origin().unwrap();
        prop_assert!(landing.y >= piece.origin.y);
        prop_assert!(engine.resolver().would_collide(
            engine.field(),
            piece.id,
            piece.shape(),
            landing.offset(0, 1),
        ));

        prop_assert!(engine.apply(PieceAction::HardDrop));
        prop_assert_eq!(engine.pieces_locked(), 1);
    }

    #[test]
    fn four_rotations_are_identity(
        kind_idx in 0usize..7,
        x in 0i32..8,
        y in 0i32..28,
    ) {
        let kind = PieceType::from_index(kind_idx).unwrap();
        let field = Playfield::new(12, 33);
        let (resolver, _) = CollisionResolver::with_ground(12, 32, 1);
        let start = FallingPiece::new(EntityId(100), kind, GridPos::new(x, y));
        let mut c = PieceController::new(1.0);
        c.activate(start);

        for _ in 0..4 {
            prop_assert_eq!(c.try_rotate(&field, &resolver), Some((0, 0)));
        }
        prop_assert_eq!(c.active().copied(), Some(start));
    }
}
