//! Rounding exact algebraic quantities to rationals with a chosen
//! denominator, and from there to display coordinates.
//!
//! Each quantity is the root of an integer polynomial in the numerator
//! `n` of the wanted rational `n / d`; the root is bracketed between
//! adjacent integers by [`solve`] and the bracket end picked by the
//! requested [`Rounding`].

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use crate::bbox::{BBox, Triangle};
use crate::cyclotomic::Cyclotomic;
use crate::errors::*;
use crate::golden::Golden;
use crate::rational::Rational;
use crate::Point2d;

// 8 / (5 + sqrt 5) = 1 / Im(zeta)^2, to nine decimals; only used to
// seed the solver
const INV_IMAG_ZETA_SQ_E9: i64 = 1_105_572_809;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Rounding {
    Floor,
    Ceil,
}

impl Rounding {

    pub fn flip(self) -> Rounding {
        match self {
            Rounding::Floor => Rounding::Ceil,
            Rounding::Ceil => Rounding::Floor,
        }
    }

}

//////////////////////////////////////////////////////////////////////
// integer root finding

/// Find an integer root of `f`, or the pair of adjacent integers
/// straddling a sign change, starting from seeds `x0`, `x1`.
///
/// False position is used while the seeds bracket a root, secant
/// extrapolation while they do not; a step that would revisit an
/// endpoint is nudged by one, and two consecutive steps that keep the
/// same endpoint fall back to bisection. When no exact root exists the
/// lower (`Floor`) or upper (`Ceil`) integer of the final bracket is
/// returned.
pub fn solve<F>(f: F, x0: BigInt, x1: BigInt, rounding: Rounding) -> BigInt
    where F: Fn(&BigInt) -> BigInt
{

    let mut x0 = x0;
    let mut x1 = x1;

    let mut y0 = f(&x0);
    if y0.is_zero() {
        return x0;
    }

    if x0 == x1 {
        x1 = &x0 + 1u32;
    }

    let mut y1 = f(&x1);
    if y1.is_zero() {
        return x1;
    }

    // which end was replaced last time, while bracketed
    let mut last_kept: Option<bool> = None;
    let mut stalled = false;

    loop {

        let bracketed = y0.signum() != y1.signum();
        let ascending = x0 < x1;

        if bracketed && (&x1 - &x0).abs().is_one() {
            return if (rounding == Rounding::Floor) == ascending { x0 } else { x1 };
        }

        let mut x2 = if bracketed && stalled {
            (&x0 + &x1) / 2u32
        } else if y0 == y1 {
            &x1 + (&x1 - &x0)
        } else {
            (&x1 * &y0 - &x0 * &y1) / (&y0 - &y1)
        };

        // inward while bracketed, outward otherwise
        if x2 == x0 {
            x2 = if bracketed == ascending { &x0 + 1u32 } else { &x0 - 1u32 };
        }

        if x2 == x1 {
            x2 = if bracketed == ascending { &x1 - 1u32 } else { &x1 + 1u32 };
        }

        let y2 = f(&x2);
        if y2.is_zero() {
            return x2;
        }

        if bracketed {

            let replace_x0 = y2.signum() == y0.signum();

            stalled = last_kept == Some(replace_x0);
            last_kept = Some(replace_x0);

            if replace_x0 {
                x0 = x2;
                y0 = y2;
            } else {
                x1 = x2;
                y1 = y2;
            }

        } else if (x2 < x0) == ascending {
            x1 = x2;
            y1 = y2;
        } else {
            x0 = x2;
            y0 = y2;
        }

    }

}

// smallest q * 2^k that is at least `floor`
fn scaled_denominator(q: &BigInt, floor: &BigInt) -> BigInt {

    let mut d = q.clone();

    while &d < floor {
        d = d << 1usize;
    }

    d

}

//////////////////////////////////////////////////////////////////////
// rounded roots

/// `sqrt(value)` as `n / denominator`; `None` for negative input.
pub fn sqrt(value: &Rational, rounding: Rounding, denominator: &BigInt) -> Option<Rational> {

    if value.is_negative() {
        return None;
    }

    Some(sqrt_nonneg(value, rounding, denominator))

}

fn sqrt_nonneg(value: &Rational, rounding: Rounding, denominator: &BigInt) -> Rational {

    let a = value.numerator();
    let b = value.denominator();
    let d = denominator;

    let target = a * d * d;

    // b n^2 = a d^2
    let f = |n: &BigInt| b * n * n - &target;

    let seed = (&target / b).sqrt();
    let seed_up = &seed + 1u32;

    Rational::reduced(solve(f, seed, seed_up, rounding), d.clone())

}

/// `value * sqrt 5`, with a denominator of at least `denominator`.
pub fn mul_sqrt5(value: &Rational, rounding: Rounding, denominator: &BigInt) -> Rational {

    if value.is_negative() {
        return -mul_sqrt5(&-value, rounding.flip(), denominator);
    }

    let p = value.numerator();
    let q = value.denominator();
    let d = scaled_denominator(q, denominator);

    // q^2 n^2 = 5 p^2 d^2
    let q2 = q * q;
    let target = p * p * &d * &d * 5u32;
    let f = |n: &BigInt| &q2 * n * n - &target;

    let seed = (&target / &q2).sqrt();
    let seed_up = &seed + 1u32;

    Rational::reduced(solve(f, seed, seed_up, rounding), d)

}

/// `value / Im(zeta)^2`, using `Im(zeta)^2 = (5 + sqrt 5) / 8`.
pub fn div_zeta_imag_sq(value: &Rational, rounding: Rounding, denominator: &BigInt) -> Rational {

    if value.is_negative() {
        return -div_zeta_imag_sq(&-value, rounding.flip(), denominator);
    }

    let p = value.numerator();
    let q = value.denominator();
    let d = scaled_denominator(q, denominator);

    // x = n/d solves (5 + sqrt 5) x = 8 p/q, i.e. (5qn - 8pd)^2 = 5 q^2 n^2
    // on the branch below 8p/(5q)
    let five_q = q * 5u32;
    let eight_pd = p * &d * 8u32;
    let five_q2 = q * q * 5u32;
    let f = |n: &BigInt| {
        let lhs = &five_q * n - &eight_pd;
        &lhs * &lhs - &five_q2 * n * n
    };

    let seed = p * &d * INV_IMAG_ZETA_SQ_E9 / (q * 1_000_000_000i64);
    let seed_down = &seed - 1u32;

    Rational::reduced(solve(f, seed, seed_down, rounding), d)

}

/// `value / Im(zeta)`.
pub fn div_zeta_imag(value: &Rational, rounding: Rounding, denominator: &BigInt) -> Rational {

    if value.is_negative() {
        return -div_zeta_imag(&-value, rounding.flip(), denominator);
    }

    let squared = div_zeta_imag_sq(&(value * value), rounding, &(denominator * denominator));

    sqrt_nonneg(&squared, rounding, denominator)

}

/// `a + b sqrt 5` rounded to a rational.
pub fn approx_golden(value: &Golden, rounding: Rounding, denominator: &BigInt) -> Rational {
    value.a() + mul_sqrt5(value.b(), rounding, denominator)
}

//////////////////////////////////////////////////////////////////////
// viewport boundary

/// Exact box covering the rectangle `[left, right] x [bottom, top]`.
///
/// Horizontal coordinates are exact. Vertical ones are expressed as
/// multiples of `2 Im(zeta) i` and rounded outward, so the returned box
/// always contains the requested rectangle.
pub fn approx_bbox(left: &Rational, bottom: &Rational,
                   right: &Rational, top: &Rational,
                   denominator: &BigInt) -> BBox {

    let half = Rational::reduced(BigInt::one(), BigInt::from(2));

    let b = &div_zeta_imag(bottom, Rounding::Floor, denominator) * &half;
    let t = &div_zeta_imag(top, Rounding::Ceil, denominator) * &half;

    let bl = Cyclotomic::normalize([left.clone(), b.clone(), Rational::zero(), Rational::zero(), -b]);
    let tr = Cyclotomic::normalize([right.clone(), t.clone(), Rational::zero(), Rational::zero(), -t]);

    BBox::new(bl, tr)

}

/// Position of `value` inside `frame`, with `(0, 0)` at the bottom
/// left and `(1, 1)` at the top right.
pub fn approx_point(value: &Cyclotomic, frame: &BBox, denominator: &BigInt) -> Result<Point2d> {

    let rel = value - frame.bl();
    let span = frame.tr() - frame.bl();

    let k = Cyclotomic::neg_2_imag_zeta();

    let x = rel.real() * span.real().inv()
        .chain_err(|| "frame has no width")?;
    let y = (&rel * &k).real() * (&span * &k).real().inv()
        .chain_err(|| "frame has no height")?;

    Ok(Point2d::new(approx_golden(&x, Rounding::Floor, denominator).to_f64(),
                    approx_golden(&y, Rounding::Floor, denominator).to_f64()))

}

pub fn approx_triangle(tri: &Triangle, frame: &BBox, denominator: &BigInt) -> Result<[Point2d; 3]> {

    Ok([approx_point(tri.a(), frame, denominator)?,
        approx_point(tri.b(), frame, denominator)?,
        approx_point(tri.c(), frame, denominator)?])

}

#[cfg(test)]
mod tests {

    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn q(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    fn big(n: i64) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn solver_finds_exact_roots() {
        let f = |x: &BigInt| x * x - big(49);
        assert_eq!(solve(f, big(1), big(2), Rounding::Floor), big(7));
        let g = |x: &BigInt| big(3) * x - big(12);
        assert_eq!(solve(g, big(100), big(90), Rounding::Ceil), big(4));
    }

    #[test]
    fn solver_rounding_picks_bracket_end() {
        // root of x^2 - 50 lies between 7 and 8
        let f = |x: &BigInt| x * x - big(50);
        assert_eq!(solve(f, big(0), big(100), Rounding::Floor), big(7));
        assert_eq!(solve(f, big(0), big(100), Rounding::Ceil), big(8));
        // decreasing function, seeds in reverse order
        let g = |x: &BigInt| big(50) - x * x;
        assert_eq!(solve(g, big(20), big(1), Rounding::Floor), big(7));
        assert_eq!(solve(g, big(20), big(1), Rounding::Ceil), big(8));
    }

    #[test]
    fn solver_straddles_a_large_cube_root() {
        let c = BigInt::from(10).pow(30) + 7u32;
        let f = |x: &BigInt| x * x * x - &c;
        let seeds = || (big(0), BigInt::from(10).pow(12));
        let (x0, x1) = seeds();
        let lo = solve(&f, x0, x1, Rounding::Floor);
        let (x0, x1) = seeds();
        let hi = solve(&f, x0, x1, Rounding::Ceil);
        assert_eq!(&hi - &lo, big(1));
        assert!(&lo * &lo * &lo < c);
        assert!(&hi * &hi * &hi > c);
    }

    #[test]
    fn negative_square_root_is_none() {
        assert!(sqrt(&q(-1, 4), Rounding::Floor, &big(100)).is_none());
        assert_eq!(sqrt(&q(9, 4), Rounding::Floor, &big(10)), Some(q(3, 2)));
    }

    #[test]
    fn sqrt5_bounds() {
        let d = big(1_000_000);
        let lo = mul_sqrt5(&Rational::one(), Rounding::Floor, &d);
        let hi = mul_sqrt5(&Rational::one(), Rounding::Ceil, &d);
        assert!(&lo * &lo < q(5, 1));
        assert!(&hi * &hi > q(5, 1));
        assert_eq!(&hi - &lo, q(1, 1 << 20));
        let neg = mul_sqrt5(&q(-1, 1), Rounding::Floor, &d);
        assert_eq!(neg, -hi);
    }

    #[test]
    fn division_by_imag_zeta() {
        let d = big(1_000_000_000);
        let imag = (2.0 * std::f64::consts::PI / 5.0).sin();
        for &(n, m) in &[(1, 1), (3, 7), (-5, 2), (100, 3)] {
            let r = q(n, m);
            let lo = div_zeta_imag(&r, Rounding::Floor, &d);
            let hi = div_zeta_imag(&r, Rounding::Ceil, &d);
            assert!(lo <= hi);
            assert_abs_diff_eq!(lo.to_f64(), r.to_f64() / imag, epsilon = 1e-6);
            assert_abs_diff_eq!(hi.to_f64(), r.to_f64() / imag, epsilon = 1e-6);
        }
        assert_eq!(div_zeta_imag(&Rational::zero(), Rounding::Ceil, &d), Rational::zero());
    }

    #[test]
    fn bbox_covers_requested_rectangle() {
        let bbox = approx_bbox(&q(-2, 1), &q(-2, 1), &q(2, 1), &q(-1, 2), &big(1_000_000_000));
        let (l, b) = bbox.bl().to_f64_pair();
        let (r, t) = bbox.tr().to_f64_pair();
        assert_abs_diff_eq!(l, -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r, 2.0, epsilon = 1e-12);
        assert!(b <= -2.0 && b > -2.0 - 1e-6);
        assert!(t >= -0.5 && t < -0.5 + 1e-6);
    }

    #[test]
    fn points_map_into_unit_square() {
        let d = big(1_000_000_000);
        let frame = approx_bbox(&q(-1, 1), &q(-1, 1), &q(1, 1), &q(1, 1), &d);
        let origin = approx_point(&Cyclotomic::zero(), &frame, &d).unwrap();
        assert_abs_diff_eq!(origin.x, 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(origin.y, 0.5, epsilon = 1e-6);
        let corner = approx_point(frame.tr(), &frame, &d).unwrap();
        assert_abs_diff_eq!(corner.x, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(corner.y, 1.0, epsilon = 1e-9);
        let z = approx_point(&Cyclotomic::zeta_pow(1), &frame, &d).unwrap();
        let (zx, zy) = Cyclotomic::zeta_pow(1).to_f64_pair();
        assert_abs_diff_eq!(z.x, (zx + 1.0) / 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(z.y, (zy + 1.0) / 2.0, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_frame_is_an_error() {
        let flat = BBox::new(Cyclotomic::zero(), Cyclotomic::zero());
        assert!(approx_point(&Cyclotomic::one(), &flat, &big(10)).is_err());
    }

    proptest! {

        #[test]
        fn prop_sqrt_straddles(n in 0i64..1_000_000, m in 1i64..1000) {
            let r = q(n, m);
            let d = big(1 << 20);
            let lo = sqrt(&r, Rounding::Floor, &d).unwrap();
            let hi = sqrt(&r, Rounding::Ceil, &d).unwrap();
            prop_assert!(&lo * &lo <= r);
            prop_assert!(&hi * &hi >= r);
            prop_assert!(&hi - &lo <= Rational::new(1, d.clone()).unwrap());
        }

        #[test]
        fn prop_mul_sqrt5_straddles(n in -100_000i64..100_000, m in 1i64..1000) {
            let r = q(n, m);
            let five_r2 = &(&r * &r) * &q(5, 1);
            let d = big(1 << 24);
            let lo = mul_sqrt5(&r, Rounding::Floor, &d);
            let hi = mul_sqrt5(&r, Rounding::Ceil, &d);
            prop_assert!(lo <= hi);
            if r.is_negative() {
                prop_assert!(&lo * &lo >= five_r2 && &hi * &hi <= five_r2);
            } else {
                prop_assert!(&lo * &lo <= five_r2 && &hi * &hi >= five_r2);
            }
        }

        #[test]
        fn prop_div_zeta_imag_sq_straddles(n in 1i64..100_000, m in 1i64..1000) {
            // x = r / Im(zeta)^2 satisfies (5 + sqrt5) x = 8 r, so
            // 5x - 8r is negative with (5x - 8r)^2 = 5 x^2 at the root
            let r = q(n, m);
            let d = big(1 << 24);
            let lo = div_zeta_imag_sq(&r, Rounding::Floor, &d);
            let hi = div_zeta_imag_sq(&r, Rounding::Ceil, &d);
            let below = |x: &Rational| {
                let lhs = &(x * &q(5, 1)) - &(&r * &q(8, 1));
                &lhs * &lhs > &(x * x) * &q(5, 1)
            };
            prop_assert!(below(&lo));
            prop_assert!(!below(&hi));
            prop_assert!(&hi - &lo <= Rational::new(1, lo.denominator().clone()).unwrap());
        }

    }

}
