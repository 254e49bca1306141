//! Shape table and rotation tests

use tetr::core::{shape_for, wall_kick_offsets, CollisionResolver, FallingPiece, PieceController, Playfield};
use tetr::types::{EntityId, GridPos, PieceType, Rotation};

fn open_field() -> (Playfield, CollisionResolver) {
    let (resolver, _) = CollisionResolver::with_ground(12, 32, 1);
    (Playfield::new(12, 33), resolver)
}

fn controller_at(kind: PieceType, rotation: u8, origin: GridPos) -> PieceController {
    let mut piece = FallingPiece::new(EntityId(99), kind, origin);
    piece.rotation = Rotation::new(rotation).unwrap();
    let mut c = PieceController::new(1.0);
    c.activate(piece);
    c
}

#[test]
fn test_shape_lookup_is_total_and_stable() {
    for kind in PieceType::ALL {
        for r in 0..4 {
            let rotation = Rotation::new(r).unwrap();
            let a = shape_for(kind, rotation);
            let b = shape_for(kind, rotation);
            assert_eq!(a, b);
            assert_eq!(a.count(), 4, "{:?} rotation {}", kind, r);
        }
    }
}

#[test]
fn test_rotation_out_of_range_is_rejected() {
    assert!(Rotation::new(4).is_err());
    assert_eq!(Rotation::try_from(7u8).unwrap_err().0, 7);
}

#[test]
fn test_four_rotations_are_identity_in_open_space() {
    let (field, resolver) = open_field();
    for kind in PieceType::ALL {
        let origin = GridPos::new(4, 10);
        let mut c = controller_at(kind, 0, origin);
        for _ in 0..4 {
            assert_eq!(c.try_rotate(&field, &resolver), Some((0, 0)), "{:?}", kind);
        }
        let piece = c.active().unwrap();
        assert_eq!(piece.rotation, Rotation::SPAWN);
        assert_eq!(piece.origin, origin);
    }
}

#[test]
fn test_rotation_against_wall_kicks_right() {
    let (field, resolver) = open_field();
    // Rotation 1 pyramid hugging the left wall; rotation 2 is one column wider.
    let mut c = controller_at(PieceType::T, 1, GridPos::new(-1, 10));

    assert_eq!(c.try_rotate(&field, &resolver), Some((1, 0)));
    let piece = c.active().unwrap();
    assert_eq!(piece.rotation.index(), 2);
    assert_eq!(piece.origin, GridPos::new(0, 10));
    assert!(piece.pips().iter().all(|p| p.x >= 0));
}

#[test]
fn test_kick_order_is_table_order() {
    let (mut field, resolver) = open_field();
    // Block the first common kick for target rotation 2 so the second wins.
    let mut c = controller_at(PieceType::T, 1, GridPos::new(-1, 10));
    field.set(2, 11, 1);

    let kicks = wall_kick_offsets(PieceType::T, Rotation::new(2).unwrap());
    assert_eq!(kicks[0], (1, 0));
    assert_eq!(kicks[1], (1, 1));

    assert_eq!(c.try_rotate(&field, &resolver), Some((1, 1)));
    assert_eq!(c.active().unwrap().origin, GridPos::new(0, 11));
}

#[test]
fn test_box_never_kicks() {
    let (field, resolver) = open_field();
    for r in 0..4 {
        assert!(wall_kick_offsets(PieceType::O, Rotation::new(r).unwrap()).is_empty());
    }
    let mut c = controller_at(PieceType::O, 0, GridPos::new(-1, 5));
    assert_eq!(c.try_rotate(&field, &resolver), Some((0, 0)));
    assert_eq!(c.active().unwrap().origin, GridPos::new(-1, 5));
}
