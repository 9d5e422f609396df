//! Robinson half-tiles and their substitution rules.
//!
//! A half-tile is one of eight triangle types: parity `P2`/`P3` (which
//! step of the two-phase substitution it is in), shape `X`/`Y` (wide or
//! narrow triangle) and orientation `L`/`R` (mirror image). Eight
//! substitution steps bring a tile back to its own type at `1/phi^3`
//! of the size.

use std::rc::Rc;

use tracing::trace;

use crate::bbox::{Direction, Triangle};
use crate::cyclotomic::Cyclotomic;

//////////////////////////////////////////////////////////////////////
// some useful types for constructing Penrose tiles

#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Hash)]
pub enum Parity {
    P2,
    P3,
}

#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Hash)]
pub enum Shape {
    X,
    Y,
}

#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Hash)]
pub enum Orientation {
    L,
    R,
}

impl Parity {

    pub fn flip(self) -> Parity {
        match self {
            Parity::P2 => Parity::P3,
            Parity::P3 => Parity::P2,
        }
    }

}

impl Orientation {

    pub fn flip(self) -> Orientation {
        match self {
            Orientation::L => Orientation::R,
            Orientation::R => Orientation::L,
        }
    }

    // +1 for L, -1 for R
    pub fn sign(self) -> i32 {
        match self {
            Orientation::L => 1,
            Orientation::R => -1,
        }
    }

}

#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Clone, Copy, Hash)]
pub struct TileType {
    pub parity:      Parity,
    pub shape:       Shape,
    pub orientation: Orientation,
}

impl TileType {

    pub const fn new(parity: Parity, shape: Shape, orientation: Orientation) -> TileType {
        TileType { parity: parity, shape: shape, orientation: orientation }
    }

    pub fn flip_parity(self) -> TileType {
        TileType { parity: self.parity.flip(), ..self }
    }

    pub const ALL: [TileType; 8] = [
        P2XL, P2XR, P2YL, P2YR,
        P3XL, P3XR, P3YL, P3YR,
    ];

}

pub const P2XL: TileType = TileType::new(Parity::P2, Shape::X, Orientation::L);
pub const P2XR: TileType = TileType::new(Parity::P2, Shape::X, Orientation::R);
pub const P2YL: TileType = TileType::new(Parity::P2, Shape::Y, Orientation::L);
pub const P2YR: TileType = TileType::new(Parity::P2, Shape::Y, Orientation::R);
pub const P3XL: TileType = TileType::new(Parity::P3, Shape::X, Orientation::L);
pub const P3XR: TileType = TileType::new(Parity::P3, Shape::X, Orientation::R);
pub const P3YL: TileType = TileType::new(Parity::P3, Shape::Y, Orientation::L);
pub const P3YR: TileType = TileType::new(Parity::P3, Shape::Y, Orientation::R);

/// Child types along the route from a spine tile at level `L` down to
/// the spine tile at level `L - 1`.
pub const PATHS: [TileType; 8] = [
    P2YR, P3YR, P2YR, P3XR,
    P2YL, P3YL, P2YL, P3XL,
];

//////////////////////////////////////////////////////////////////////
// visibility of a tile against the current viewport

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum State {
    Empty,   // outside the viewport
    Partial, // crosses the viewport boundary
    Full,    // inside the viewport
}

//////////////////////////////////////////////////////////////////////
// Penrose half-tile

#[derive(Debug, Clone)]
pub struct HalfTile {
    pub state: State,
    kind:      TileType,
    tri:       Rc<Triangle>, // shared by parity flips
}

impl HalfTile {

    /// Build a tile of the given type on vertices `[a, b, c]`; the
    /// directions of edges `ca` and `ab` follow from that of `bc`.
    pub fn make(kind: TileType, bc: Direction, vertices: [Cyclotomic; 3]) -> HalfTile {

        let n = match kind.shape {
            Shape::X => 2,
            Shape::Y => -1,
        } * kind.orientation.sign();

        let [a, b, c] = vertices;

        let tri = Triangle::new(a, b, c, [bc, bc.rotate(n), bc.rotate(-n)]);

        HalfTile { state: State::Empty, kind: kind, tri: Rc::new(tri) }

    }

    pub fn kind(&self) -> TileType {
        self.kind
    }

    pub fn triangle(&self) -> &Triangle {
        &self.tri
    }

    fn bc(&self) -> Direction {
        self.tri.directions()[0]
    }

    /// Replace the tile by its children under one substitution step.
    pub fn subdivision(&self) -> Vec<HalfTile> {

        let kind = self.kind;
        let o = kind.orientation;
        let s = o.sign();
        let bc = self.bc();
        let (a, b, c) = (self.tri.a(), self.tri.b(), self.tri.c());

        match (kind.parity, kind.shape) {

            (Parity::P3, Shape::X) => {

                let d = division_point(o, a, b);

                vec![
                    HalfTile::make(TileType::new(Parity::P2, Shape::X, o),
                                   bc.rotate(2 * s),
                                   [d.clone(), c.clone(), a.clone()]),
                    HalfTile::make(TileType::new(Parity::P2, Shape::Y, o.flip()),
                                   bc.rotate(-s),
                                   [b.clone(), a.clone(), d]),
                ]

            }

            (Parity::P2, Shape::Y) => {

                let d = division_point(o, b, c);

                vec![
                    HalfTile::make(TileType::new(Parity::P3, Shape::Y, o),
                                   bc.rotate(s),
                                   [c.clone(), d.clone(), b.clone()]),
                    HalfTile::make(TileType::new(Parity::P3, Shape::X, o),
                                   bc.rotate(-s),
                                   [d, c.clone(), a.clone()]),
                ]

            }

            // the other half of the two-phase step keeps the triangle
            _ => vec![HalfTile {
                state: State::Empty,
                kind: kind.flip_parity(),
                tri: Rc::clone(&self.tri),
            }],

        }

    }

}

// b plus the edge a->b turned by 2/5 (L) or 3/5 (R) of a full turn
fn division_point(o: Orientation, a: &Cyclotomic, b: &Cyclotomic) -> Cyclotomic {

    let turn = match o {
        Orientation::L => Cyclotomic::zeta_pow(2),
        Orientation::R => Cyclotomic::zeta_pow(3),
    };

    b + &((b - a) * turn)

}

//////////////////////////////////////////////////////////////////////
// the spine: a nested sequence of P3XL tiles, each of which
// contains the previous one as its descendant along PATHS

#[derive(Debug)]
pub struct Spine {
    tiles:  Vec<HalfTile>,
    scale:  Cyclotomic,
    offset: Cyclotomic,
}

impl Spine {

    pub fn new() -> Spine {

        let base = HalfTile::make(P3XL, Direction::Zeta0,
                                  [Cyclotomic::zero(),
                                   Cyclotomic::zeta_pow(3),
                                   -Cyclotomic::zeta_pow(2)]);

        Spine {
            tiles: vec![base],
            scale: Cyclotomic::from_integers([2, 0, -3, -3]),
            offset: Cyclotomic::zeta_pow(1) - Cyclotomic::zeta_pow(4),
        }

    }

    /// Spine tile at `level`, extending the list as needed.
    pub fn tile(&mut self, level: usize) -> &HalfTile {

        while self.tiles.len() <= level {

            let next = {

                let prev = &self.tiles[self.tiles.len() - 1];
                let tri = prev.triangle();

                let grow = |v: &Cyclotomic| &(v * &self.scale) + &self.offset;

                HalfTile {
                    state: State::Empty,
                    kind: prev.kind,
                    tri: Rc::new(Triangle::new(grow(tri.a()), grow(tri.b()), grow(tri.c()),
                                               *tri.directions())),
                }

            };

            trace!(level = self.tiles.len(), "extending spine");

            self.tiles.push(next);

        }

        &self.tiles[level]

    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

}

impl Default for Spine {
    fn default() -> Spine {
        Spine::new()
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;

    fn descend(tile: &HalfTile, steps: usize) -> HalfTile {
        let mut node = tile.clone();
        for step in 0..steps {
            let children = node.subdivision();
            let matching: Vec<_> = children.into_iter()
                .filter(|c| c.kind() == PATHS[step % 8])
                .collect();
            assert_eq!(matching.len(), 1, "step {}", step);
            node = matching.into_iter().next().unwrap();
        }
        node
    }

    #[test]
    fn descendants_keep_canonical_directions() {
        let mut spine = Spine::new();
        let mut frontier = vec![spine.tile(1).clone()];
        let mut seen = std::collections::HashSet::new();
        for _ in 0..8 {
            frontier = frontier.iter().flat_map(|t| t.subdivision()).collect();
            for tile in &frontier {
                assert!(tile.triangle().check_directions().is_ok(), "{:?}", tile.kind());
                seen.insert(tile.kind());
            }
        }
        assert_eq!(seen.len(), TileType::ALL.len());
    }

    #[test]
    fn eight_steps_along_paths_reach_previous_spine_tile() {
        let mut spine = Spine::new();
        for level in 1..3 {
            let top = spine.tile(level).clone();
            let reached = descend(&top, 8);
            let below = spine.tile(level - 1);
            assert_eq!(reached.kind(), P3XL);
            assert_eq!(reached.triangle().vertices(), below.triangle().vertices());
            assert_eq!(reached.triangle().directions(), below.triangle().directions());
        }
    }

    #[test]
    fn spine_grows_outward() {
        let mut spine = Spine::new();
        let (ax, ay) = spine.tile(1).triangle().a().to_f64_pair();
        let (bx, by) = spine.tile(1).triangle().b().to_f64_pair();
        assert_abs_diff_eq!(ax, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ay, 1.902113, epsilon = 1e-5);
        assert_abs_diff_eq!(by, -2.126627, epsilon = 1e-5);
        assert_abs_diff_eq!(bx.abs(), 5.545085, epsilon = 1e-5);
        let (_, apex2) = spine.tile(2).triangle().a().to_f64_pair();
        assert_abs_diff_eq!(apex2, 14.94, epsilon = 0.01);
        assert_eq!(spine.len(), 3);
    }

    #[test]
    fn parity_flip_shares_the_triangle() {
        let mut spine = Spine::new();
        let top = spine.tile(1).clone();
        let parent = descend(&top, 2);
        assert_eq!(parent.kind(), P3YR);
        let children = parent.subdivision();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind(), P2YR);
        assert!(std::ptr::eq(children[0].triangle(), parent.triangle()));
    }

}
