//! Exact Penrose tiling of a viewing window.
//!
//! Every decision about which tiles are visible is made with exact
//! arithmetic over the cyclotomic field generated by a 5th root of unity.
//! Floating point only appears at the very end, when exact vertices are
//! approximated for display.

// bunch of third party stuff used everywhere
#[macro_use]
extern crate error_chain;

//////////////////////////////////////////////////////////////////////
// forward owned/borrowed operator combinations to the
// `&T op &T` implementation

macro_rules! forward_binop {

    (impl $imp:ident, $method:ident for $t:ty) => {

        impl $imp<$t> for $t {
            type Output = $t;
            fn $method(self, other: $t) -> $t {
                $imp::$method(&self, &other)
            }
        }

        impl<'a> $imp<&'a $t> for $t {
            type Output = $t;
            fn $method(self, other: &'a $t) -> $t {
                $imp::$method(&self, other)
            }
        }

        impl<'a> $imp<$t> for &'a $t {
            type Output = $t;
            fn $method(self, other: $t) -> $t {
                $imp::$method(self, &other)
            }
        }

    }

}

pub mod errors;

pub mod rational;
pub mod expr;
pub mod golden;
pub mod cyclotomic;

pub mod bbox;
pub mod approximate;

pub mod penrose;
pub mod tree;

pub mod view;

pub use crate::approximate::{approx_bbox, approx_point, approx_triangle, Rounding};
pub use crate::bbox::{classify, BBox, CachedBBox, Direction, Intersection, Triangle};
pub use crate::cyclotomic::Cyclotomic;
pub use crate::golden::{Golden, GoldenFraction};
pub use crate::penrose::{HalfTile, State, TileType};
pub use crate::rational::Rational;
pub use crate::tree::{PenroseTree, RefineStats};
pub use crate::view::{Step, ViewSpec, Viewport};

/// Display coordinates produced by the approximator.
pub type Point2d = nalgebra::geometry::Point2<f64>;
