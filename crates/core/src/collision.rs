//! Collision resolver - overlap and bounds predicate for candidate placements
//!
//! A candidate placement is a shape at an origin. It collides when any of its
//! pips lands outside the side walls, below the floor row, on a locked
//! playfield cell, or on a static obstacle entity other than the excluded one.
//!
//! The top edge is not checked: pips with negative y are allowed
//! during spawn and kick search.

use arrayvec::ArrayVec;
use tetr_types::{EntityId, GridPos, PieceType, Rotation};

use crate::playfield::Playfield;
use crate::shapes::{shape_for, Shape};

/// Absolute cells covered by `shape` anchored at `origin`
pub fn pips(shape: Shape, origin: GridPos) -> ArrayVec<GridPos, 16> {
    shape
        .cells()
        .map(|(dx, dy)| origin.offset(dx, dy))
        .collect()
}

/// A static piece-shaped entity that blocks movement but is not part of the
/// playfield grid (the ground along the floor row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obstacle {
    pub id: EntityId,
    pub kind: PieceType,
    pub origin: GridPos,
    cells: ArrayVec<GridPos, 16>,
}

impl Obstacle {
    pub fn new(id: EntityId, kind: PieceType, rotation: Rotation, origin: GridPos) -> Self {
        Self {
            id,
            kind,
            origin,
            cells: pips(shape_for(kind, rotation), origin),
        }
    }

    pub fn cells(&self) -> &[GridPos] {
        &self.cells
    }

    pub fn covers(&self, pos: GridPos) -> bool {
        self.cells.contains(&pos)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CollisionResolver {
    obstacles: Vec<Obstacle>,
}

impl CollisionResolver {
    /// Resolver with no obstacles: only walls and locked cells collide
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver with ground pieces laid along `floor_row`.
    ///
    /// Ground is a row of flat `I` pieces at x = 0, 4, 8, ... covering the whole
    /// width. Ids are assigned from `first_id` upward; returns the resolver and
    /// the next unused id.
    pub fn with_ground(width: u16, floor_row: u16, first_id: u32) -> (Self, u32) {
        let mut next = first_id;
        let mut obstacles = Vec::new();
        for x in (0..width as i32).step_by(4) {
            obstacles.push(Obstacle::new(
                EntityId(next),
                PieceType::I,
                Rotation::SPAWN,
                GridPos::new(x, floor_row as i32),
            ));
            next += 1;
        }
        (Self { obstacles }, next)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Whether placing `shape` at `origin` would overlap anything solid.
    ///
    /// `exclude` is the id of the entity being moved; an obstacle with that id
    /// never blocks itself.
    pub fn would_collide(
        &self,
        field: &Playfield,
        exclude: EntityId,
        shape: Shape,
        origin: GridPos,
    ) -> bool {
        let width = field.width() as i32;
        let floor = field.floor_row() as i32;
        let cells = pips(shape, origin);
        for &pip in &cells {
            if pip.x < 0 || pip.x > width - 1 || pip.y > floor {
                return true;
            }
            if field.is_occupied(pip) {
                return true;
            }
        }

        self.obstacles
            .iter()
            .filter(|o| o.id != exclude)
            .any(|o| cells.iter().any(|&p| o.covers(p)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVER: EntityId = EntityId(100);

    fn setup() -> (Playfield, CollisionResolver) {
        let field = Playfield::new(12, 33);
        let (resolver, next) = CollisionResolver::with_ground(12, 32, 1);
        assert_eq!(next, 4);
        (field, resolver)
    }

    #[test]
    fn ground_covers_floor_row() {
        let (_, resolver) = setup();
        for x in 0..12 {
            assert!(
                resolver.obstacles().iter().any(|o| o.covers(GridPos::new(x, 32))),
                "column {} uncovered",
                x
            );
        }
        assert!(!resolver
            .obstacles()
            .iter()
            .any(|o| o.covers(GridPos::new(0, 31))));
    }

    #[test]
    fn side_walls_collide() {
        let (field, resolver) = setup();
        let tower = shape_for(PieceType::I, Rotation::SPAWN);
        assert!(!resolver.would_collide(&field, MOVER, tower, GridPos::new(0, 5)));
        assert!(!resolver.would_collide(&field, MOVER, tower, GridPos::new(8, 5)));
        assert!(resolver.would_collide(&field, MOVER, tower, GridPos::new(-1, 5)));
        assert!(resolver.would_collide(&field, MOVER, tower, GridPos::new(9, 5)));
    }

    #[test]
    fn top_edge_is_open() {
        let (field, resolver) = setup();
        let tower = shape_for(PieceType::I, Rotation::SPAWN);
        assert!(!resolver.would_collide(&field, MOVER, tower, GridPos::new(2, -3)));
    }

    #[test]
    fn locked_cells_collide() {
        let (mut field, resolver) = setup();
        let boxy = shape_for(PieceType::O, Rotation::SPAWN);
        field.set(4, 11, 1);
        // box pips at (x+1..x+2, y..y+1)
        assert!(resolver.would_collide(&field, MOVER, boxy, GridPos::new(3, 10)));
        assert!(!resolver.would_collide(&field, MOVER, boxy, GridPos::new(4, 10)));
    }

    #[test]
    fn ground_collides_unless_excluded() {
        let (field, resolver) = setup();
        let boxy = shape_for(PieceType::O, Rotation::SPAWN);
        assert!(!resolver.would_collide(&field, MOVER, boxy, GridPos::new(0, 30)));
        assert!(resolver.would_collide(&field, MOVER, boxy, GridPos::new(0, 31)));

        // Box pips at x = 1, 2 sit on the first ground segment only.
        let first_ground = resolver.obstacles()[0].id;
        assert!(!resolver.would_collide(&field, first_ground, boxy, GridPos::new(0, 31)));
    }

    #[test]
    fn below_floor_collides_even_without_ground() {
        let field = Playfield::new(12, 33);
        let bare = CollisionResolver::new();
        let tower = shape_for(PieceType::I, Rotation::new(1).unwrap());
        // Column 2 of the box, rows y..=y+3
        assert!(!bare.would_collide(&field, MOVER, tower, GridPos::new(0, 29)));
        assert!(bare.would_collide(&field, MOVER, tower, GridPos::new(0, 30)));
        assert!(bare.would_collide(&field, MOVER, tower, GridPos::new(0, 33)));

        let raised = Playfield::with_floor(12, 33, 20);
        assert!(bare.would_collide(&raised, MOVER, tower, GridPos::new(0, 18)));
        assert!(!bare.would_collide(&raised, MOVER, tower, GridPos::new(0, 17)));
    }
}
