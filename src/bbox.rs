//! Exact separating-axis tests between tile triangles and the viewing
//! box.
//!
//! Every tile edge runs along one of the five directions `zeta^n`, and
//! the box edges run along `1` (which is `zeta^0`) and `i`. Those six
//! directions are therefore the only candidate separating axes. Each
//! direction gets an axis whose real projection is constant along lines
//! of that direction, so testing a direction means comparing the two
//! shapes' intervals of `real(p * axis)`.

use std::cell::OnceCell;

use crate::cyclotomic::Cyclotomic;
use crate::errors::*;
use crate::golden::GoldenFraction;
use crate::rational::Rational;

//////////////////////////////////////////////////////////////////////
// line directions

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Direction {
    Zeta0, // along 1
    Zeta1, // along zeta
    Zeta2,
    Zeta3,
    Zeta4,
    Imag,  // along i; box edges only
}

impl Direction {

    pub const ALL: [Direction; 6] = [
        Direction::Zeta0,
        Direction::Zeta1,
        Direction::Zeta2,
        Direction::Zeta3,
        Direction::Zeta4,
        Direction::Imag,
    ];

    /// Direction of `zeta^n`, for any integer `n`.
    pub fn zeta(n: i32) -> Direction {
        Direction::ALL[n.rem_euclid(5) as usize]
    }

    pub fn index(self) -> usize {
        match self {
            Direction::Zeta0 => 0,
            Direction::Zeta1 => 1,
            Direction::Zeta2 => 2,
            Direction::Zeta3 => 3,
            Direction::Zeta4 => 4,
            Direction::Imag => 5,
        }
    }

    /// Rotate by `k` fifths of a full turn. Only the five `zeta`
    /// directions form a cycle; `Imag` is left alone.
    pub fn rotate(self, k: i32) -> Direction {
        match self {
            Direction::Imag => Direction::Imag,
            _ => Direction::zeta(self.index() as i32 + k),
        }
    }

    /// `real(p * axis())` is constant along lines of this direction.
    pub fn axis(self) -> Cyclotomic {
        match self {
            Direction::Imag => Cyclotomic::one(),
            _ => Cyclotomic::neg_2_imag_zeta() * Cyclotomic::zeta_pow(-(self.index() as i32)),
        }
    }

}

//////////////////////////////////////////////////////////////////////
// closed interval of projections onto one axis

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub min: GoldenFraction,
    pub max: GoldenFraction,
}

impl Projection {

    fn span<I>(first: GoldenFraction, rest: I) -> Projection
        where I: Iterator<Item = GoldenFraction>
    {

        let mut min = first.clone();
        let mut max = first;

        for v in rest {
            if v < min {
                min = v;
            } else if v > max {
                max = v;
            }
        }

        Projection { min: min, max: max }

    }

}

fn project(p: &Cyclotomic, axis: &Cyclotomic) -> GoldenFraction {
    GoldenFraction::from(&(p * axis).real())
}

//////////////////////////////////////////////////////////////////////
// triangle with exact vertices, the direction of each edge, and
// lazily cached projections

#[derive(Debug)]
pub struct Triangle {

    a: Cyclotomic,
    b: Cyclotomic,
    c: Cyclotomic,

    directions: [Direction; 3], // edges bc, ca, ab

    projections: [OnceCell<Projection>; 6],

}

impl Triangle {

    pub fn new(a: Cyclotomic, b: Cyclotomic, c: Cyclotomic,
               directions: [Direction; 3]) -> Triangle {

        let tri = Triangle {
            a: a,
            b: b,
            c: c,
            directions: directions,
            projections: Default::default(),
        };

        debug_assert!(tri.check_directions().is_ok());

        tri

    }

    pub fn a(&self) -> &Cyclotomic {
        &self.a
    }

    pub fn b(&self) -> &Cyclotomic {
        &self.b
    }

    pub fn c(&self) -> &Cyclotomic {
        &self.c
    }

    pub fn vertices(&self) -> [&Cyclotomic; 3] {
        [&self.a, &self.b, &self.c]
    }

    pub fn directions(&self) -> &[Direction; 3] {
        &self.directions
    }

    /// Each edge must project to a single point on its own axis.
    pub fn check_directions(&self) -> Result<()> {

        let edges = [
            (&self.c - &self.b, "bc"),
            (&self.a - &self.c, "ca"),
            (&self.b - &self.a, "ab"),
        ];

        for ((edge, name), &dir) in edges.iter().zip(self.directions.iter()) {
            if (edge * &dir.axis()).real().signum() != std::cmp::Ordering::Equal {
                bail!(ErrorKind::GeometryInvariant(
                    format!("edge {} of {} {} {} does not run along {:?}",
                            name, self.a, self.b, self.c, dir)));
            }
        }

        Ok(())

    }

    pub fn projection(&self, dir: Direction) -> &Projection {

        self.projections[dir.index()].get_or_init(|| {
            let axis = dir.axis();
            Projection::span(project(&self.a, &axis),
                             [&self.b, &self.c].iter().map(|p| project(p, &axis)))
        })

    }

}

//////////////////////////////////////////////////////////////////////
// axis-aligned box given by exact bottom-left and top-right corners

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BBox {
    bl: Cyclotomic,
    tr: Cyclotomic,
}

impl BBox {

    pub fn new(bl: Cyclotomic, tr: Cyclotomic) -> BBox {
        BBox { bl: bl, tr: tr }
    }

    pub fn bl(&self) -> &Cyclotomic {
        &self.bl
    }

    pub fn tr(&self) -> &Cyclotomic {
        &self.tr
    }

    /// Corners in the order bottom-left, bottom-right, top-right,
    /// top-left.
    pub fn corners(&self) -> [Cyclotomic; 4] {

        let half = Rational::reduced(1.into(), 2.into());

        let (bl_re, bl_im) = self.bl.real_imag_2();
        let (tr_re, tr_im) = self.tr.real_imag_2();

        let br = (tr_re + &bl_im).mul_coeff(&half);
        let tl = (bl_re + &tr_im).mul_coeff(&half);

        [self.bl.clone(), br, self.tr.clone(), tl]

    }

}

/// A box with its projections onto all six axes computed up front,
/// since it is tested against many triangles.
#[derive(Debug, Clone)]
pub struct CachedBBox {
    bbox:        BBox,
    projections: Vec<Projection>, // indexed by Direction::index
}

impl CachedBBox {

    pub fn new(bbox: &BBox) -> CachedBBox {

        let corners = bbox.corners();

        let projections = Direction::ALL.iter().map(|&dir| {
            let axis = dir.axis();
            Projection::span(project(&corners[0], &axis),
                             corners[1..].iter().map(|p| project(p, &axis)))
        }).collect();

        CachedBBox { bbox: bbox.clone(), projections: projections }

    }

    pub fn bbox(&self) -> &BBox {
        &self.bbox
    }

    pub fn projection(&self, dir: Direction) -> &Projection {
        &self.projections[dir.index()]
    }

}

//////////////////////////////////////////////////////////////////////
// classification, as seen from the triangle

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Intersection {
    Disjoint,    // no overlap
    Intersect,   // partial overlap
    Contain,     // triangle contains the box
    BeContained, // triangle lies inside the box
}

fn relate(tile: &Projection, bound: &Projection) -> Intersection {

    if bound.max < tile.min || tile.max < bound.min {
        Intersection::Disjoint
    } else if tile.min < bound.min && bound.max < tile.max {
        Intersection::Contain
    } else if bound.min < tile.min && tile.max < bound.max {
        Intersection::BeContained
    } else {
        Intersection::Intersect
    }

}

/// Classify a triangle against a box by separating axes.
///
/// Only the triangle's own edge axes plus the box's `Imag` and `Zeta0`
/// axes are examined. That subset is complete for tiles whose edges all
/// run along the six canonical directions; it is not a general
/// triangle/box test.
pub fn classify(tri: &Triangle, bound: &CachedBBox) -> Intersection {

    let mut contain = true;
    let mut be_contained = true;

    for &dir in tri.directions() {

        let rel = relate(tri.projection(dir), bound.projection(dir));

        if rel == Intersection::Disjoint {
            return Intersection::Disjoint;
        }

        contain = contain && rel == Intersection::Contain;

        if dir == Direction::Zeta0 {
            be_contained = be_contained && rel == Intersection::BeContained;
        }

    }

    if contain {
        return Intersection::Contain;
    }

    let mut box_axes = vec![Direction::Imag];

    if !tri.directions().contains(&Direction::Zeta0) {
        box_axes.push(Direction::Zeta0);
    }

    for dir in box_axes {

        let rel = relate(tri.projection(dir), bound.projection(dir));

        if rel == Intersection::Disjoint {
            return Intersection::Disjoint;
        }

        be_contained = be_contained && rel == Intersection::BeContained;

    }

    if be_contained {
        Intersection::BeContained
    } else {
        Intersection::Intersect
    }

}
