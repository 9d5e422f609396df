//! The real quadratic field Q(sqrt 5), where all projections of tile
//! vertices onto the separating axes live.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;

use crate::errors::*;
use crate::rational::Rational;

//////////////////////////////////////////////////////////////////////
// sign of a + b*sqrt(5) for integers a, b

pub(crate) fn sign_of(a: &BigInt, b: &BigInt) -> Ordering {

    let zero = BigInt::zero();

    match (a.cmp(&zero), b.cmp(&zero)) {

        (Ordering::Equal, Ordering::Equal) => Ordering::Equal,

        (sa, sb) if sa != Ordering::Less && sb != Ordering::Less => Ordering::Greater,

        (sa, sb) if sa != Ordering::Greater && sb != Ordering::Greater => Ordering::Less,

        // opposite strict signs: the larger magnitude wins, and
        // a^2 == 5 b^2 is impossible for nonzero integers
        (sa, sb) => {
            if a * a > b * b * 5u32 {
                sa
            } else {
                sb
            }
        }

    }

}

//////////////////////////////////////////////////////////////////////
// a + b sqrt(5)

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Golden {
    a: Rational,
    b: Rational,
}

impl Golden {

    pub fn new(a: Rational, b: Rational) -> Golden {
        Golden { a: a, b: b }
    }

    pub fn from_rational(a: Rational) -> Golden {
        Golden { a: a, b: Rational::zero() }
    }

    pub fn zero() -> Golden {
        Self::from_rational(Rational::zero())
    }

    pub fn one() -> Golden {
        Self::from_rational(Rational::one())
    }

    pub fn sqrt5() -> Golden {
        Golden { a: Rational::zero(), b: Rational::one() }
    }

    pub fn a(&self) -> &Rational {
        &self.a
    }

    pub fn b(&self) -> &Rational {
        &self.b
    }

    pub fn is_zero(&self) -> bool {
        self.a.is_zero() && self.b.is_zero()
    }

    pub fn mul_coeff(&self, k: &Rational) -> Golden {
        Golden { a: &self.a * k, b: &self.b * k }
    }

    /// Galois conjugate `a - b sqrt(5)`.
    pub fn conj(&self) -> Golden {
        Golden { a: self.a.clone(), b: -&self.b }
    }

    /// Field norm `a^2 - 5 b^2`, zero only for zero.
    pub fn norm(&self) -> Rational {
        &self.a * &self.a - (&self.b * &self.b) * Rational::from_integer(5)
    }

    pub fn inv(&self) -> Result<Golden> {

        let norm = self.norm();

        if norm.is_zero() {
            bail!(ErrorKind::DivisionByZero("golden inverse"));
        }

        Ok(self.conj().mul_coeff(&norm.inv()?))

    }

    pub fn signum(&self) -> Ordering {
        GoldenFraction::from(self).signum()
    }

    pub fn to_f64(&self) -> f64 {
        self.a.to_f64() + self.b.to_f64() * 5f64.sqrt()
    }

}

impl From<Rational> for Golden {
    fn from(a: Rational) -> Golden {
        Golden::from_rational(a)
    }
}

impl fmt::Display for Golden {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} + {}*sqrt5", self.a, self.b)
    }
}

impl Ord for Golden {
    fn cmp(&self, other: &Golden) -> Ordering {
        (self - other).signum()
    }
}

impl PartialOrd for Golden {
    fn partial_cmp(&self, other: &Golden) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<'a, 'b> Add<&'b Golden> for &'a Golden {

    type Output = Golden;

    fn add(self, other: &'b Golden) -> Golden {
        Golden { a: &self.a + &other.a, b: &self.b + &other.b }
    }

}

impl<'a, 'b> Sub<&'b Golden> for &'a Golden {

    type Output = Golden;

    fn sub(self, other: &'b Golden) -> Golden {
        Golden { a: &self.a - &other.a, b: &self.b - &other.b }
    }

}

impl<'a, 'b> Mul<&'b Golden> for &'a Golden {

    type Output = Golden;

    fn mul(self, other: &'b Golden) -> Golden {

        let five = Rational::from_integer(5);

        Golden {
            a: &self.a * &other.a + &(&self.b * &other.b) * &five,
            b: &self.a * &other.b + &self.b * &other.a,
        }

    }

}

impl<'a> Neg for &'a Golden {

    type Output = Golden;

    fn neg(self) -> Golden {
        Golden { a: -&self.a, b: -&self.b }
    }

}

impl Neg for Golden {

    type Output = Golden;

    fn neg(self) -> Golden {
        -&self
    }

}

forward_binop!(impl Add, add for Golden);
forward_binop!(impl Sub, sub for Golden);
forward_binop!(impl Mul, mul for Golden);

//////////////////////////////////////////////////////////////////////
// (a + b sqrt(5)) / denominator with integer a, b and a shared
// denominator that is never reduced; cheap to compare, which is all
// the projection cache needs

#[derive(Clone, Debug)]
pub struct GoldenFraction {
    a:           BigInt,
    b:           BigInt,
    denominator: BigInt, // > 0
}

impl GoldenFraction {

    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    pub fn signum(&self) -> Ordering {
        sign_of(&self.a, &self.b)
    }

    pub fn to_golden(&self) -> Golden {
        Golden {
            a: Rational::reduced(self.a.clone(), self.denominator.clone()),
            b: Rational::reduced(self.b.clone(), self.denominator.clone()),
        }
    }

}

impl<'a> From<&'a Golden> for GoldenFraction {

    fn from(value: &'a Golden) -> GoldenFraction {

        let denominator = value.a.denominator().lcm(value.b.denominator());

        let scale_a = &denominator / value.a.denominator();
        let scale_b = &denominator / value.b.denominator();

        GoldenFraction {
            a: value.a.numerator() * scale_a,
            b: value.b.numerator() * scale_b,
            denominator: denominator,
        }

    }

}

impl Ord for GoldenFraction {

    fn cmp(&self, other: &GoldenFraction) -> Ordering {

        if self.denominator == other.denominator {
            return sign_of(&(&self.a - &other.a), &(&self.b - &other.b));
        }

        let a = &self.a * &other.denominator - &other.a * &self.denominator;
        let b = &self.b * &other.denominator - &other.b * &self.denominator;

        sign_of(&a, &b)

    }

}

impl PartialOrd for GoldenFraction {
    fn partial_cmp(&self, other: &GoldenFraction) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GoldenFraction {
    fn eq(&self, other: &GoldenFraction) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GoldenFraction {}
