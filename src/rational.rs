//! Arbitrary precision rationals, always kept in lowest terms with a
//! positive denominator.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::errors::*;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rational {
    numerator:   BigInt,
    denominator: BigInt, // > 0, coprime with numerator
}

impl Rational {

    /// Construct `n/d` in lowest terms. Fails if `d` is zero.
    pub fn new<N: Into<BigInt>, D: Into<BigInt>>(n: N, d: D) -> Result<Rational> {

        let n = n.into();
        let d = d.into();

        if d.is_zero() {
            bail!(ErrorKind::InvalidRational(n.to_string()));
        }

        Ok(Self::reduced(n, d))

    }

    // caller guarantees d != 0
    pub(crate) fn reduced(n: BigInt, d: BigInt) -> Rational {

        debug_assert!(!d.is_zero());

        let g = n.gcd(&d);

        let (mut n, mut d) = (n / &g, d / &g);

        if d.is_negative() {
            n = -n;
            d = -d;
        }

        Rational { numerator: n, denominator: d }

    }

    pub fn from_integer<N: Into<BigInt>>(n: N) -> Rational {
        Rational { numerator: n.into(), denominator: BigInt::one() }
    }

    pub fn zero() -> Rational {
        Self::from_integer(0)
    }

    pub fn one() -> Rational {
        Self::from_integer(1)
    }

    pub fn numerator(&self) -> &BigInt {
        &self.numerator
    }

    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.numerator.is_negative()
    }

    pub fn is_integer(&self) -> bool {
        self.denominator.is_one()
    }

    pub fn signum(&self) -> Ordering {
        self.numerator.cmp(&BigInt::zero())
    }

    pub fn abs(&self) -> Rational {
        Rational {
            numerator: self.numerator.abs(),
            denominator: self.denominator.clone(),
        }
    }

    /// Multiplicative inverse; zero has none.
    pub fn inv(&self) -> Result<Rational> {

        if self.is_zero() {
            bail!(ErrorKind::DivisionByZero("rational inverse"));
        }

        Ok(Self::reduced(self.denominator.clone(), self.numerator.clone()))

    }

    pub fn checked_div(&self, other: &Rational) -> Result<Rational> {
        Ok(self * other.inv()?)
    }

    pub fn pow(&self, exponent: u32) -> Rational {

        // powers of coprime integers stay coprime
        Rational {
            numerator: self.numerator.pow(exponent),
            denominator: self.denominator.pow(exponent),
        }

    }

    /// Floor of the value, so that `integer() + fractional() == self`
    /// with the fractional part in `[0, 1)`.
    pub fn integer(&self) -> BigInt {
        self.numerator.div_floor(&self.denominator)
    }

    pub fn fractional(&self) -> Rational {
        Rational {
            numerator: self.numerator.mod_floor(&self.denominator),
            denominator: self.denominator.clone(),
        }
    }

    /// Lossy conversion for display. Operands far outside the f64 range
    /// are scaled to 64 significant bits before dividing.
    pub fn to_f64(&self) -> f64 {

        if self.is_zero() {
            return 0.0;
        }

        let shift = 64 + self.denominator.bits() as i64 - self.numerator.bits() as i64;

        let q = if shift >= 0 {
            (&self.numerator << shift as usize) / &self.denominator
        } else {
            &self.numerator / (&self.denominator << (-shift) as usize)
        };

        match q.to_f64() {
            Some(q) => q * 2f64.powi(-shift as i32),
            None => f64::NAN,
        }

    }

}

//////////////////////////////////////////////////////////////////////
// conversions

impl From<i64> for Rational {
    fn from(n: i64) -> Rational {
        Rational::from_integer(n)
    }
}

impl From<BigInt> for Rational {
    fn from(n: BigInt) -> Rational {
        Rational::from_integer(n)
    }
}

impl fmt::Display for Rational {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }

}

impl FromStr for Rational {

    type Err = Error;

    fn from_str(s: &str) -> Result<Rational> {
        crate::expr::parse_rational_expr(s)
    }

}

//////////////////////////////////////////////////////////////////////
// ordering by cross multiplication (denominators are positive)

impl Ord for Rational {

    fn cmp(&self, other: &Rational) -> Ordering {

        if self.denominator == other.denominator {
            return self.numerator.cmp(&other.numerator);
        }

        (&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator))

    }

}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Rational) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

//////////////////////////////////////////////////////////////////////
// arithmetic

impl<'a, 'b> Add<&'b Rational> for &'a Rational {

    type Output = Rational;

    fn add(self, other: &'b Rational) -> Rational {

        if self.denominator == other.denominator {
            return Rational::reduced(&self.numerator + &other.numerator,
                                     self.denominator.clone());
        }

        Rational::reduced(&self.numerator * &other.denominator +
                          &other.numerator * &self.denominator,
                          &self.denominator * &other.denominator)

    }

}

impl<'a, 'b> Sub<&'b Rational> for &'a Rational {

    type Output = Rational;

    fn sub(self, other: &'b Rational) -> Rational {
        self + &(-other)
    }

}

impl<'a, 'b> Mul<&'b Rational> for &'a Rational {

    type Output = Rational;

    fn mul(self, other: &'b Rational) -> Rational {
        Rational::reduced(&self.numerator * &other.numerator,
                          &self.denominator * &other.denominator)
    }

}

impl<'a> Neg for &'a Rational {

    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            numerator: -&self.numerator,
            denominator: self.denominator.clone(),
        }
    }

}

impl Neg for Rational {

    type Output = Rational;

    fn neg(self) -> Rational {
        Rational {
            numerator: -self.numerator,
            denominator: self.denominator,
        }
    }

}

forward_binop!(impl Add, add for Rational);
forward_binop!(impl Sub, sub for Rational);
forward_binop!(impl Mul, mul for Rational);

#[cfg(test)]
mod tests {

    use super::*;
    use proptest::prelude::*;

    fn q(n: i64, d: i64) -> Rational {
        Rational::new(n, d).unwrap()
    }

    #[test]
    fn powers_stay_reduced() {
        assert_eq!(q(-2, 3).pow(3), q(-8, 27));
        assert_eq!(q(4, 6).pow(0), Rational::one());
    }

    #[test]
    fn normalizes_sign_and_gcd() {
        let r = q(6, -4);
        assert_eq!(r.numerator(), &BigInt::from(-3));
        assert_eq!(r.denominator(), &BigInt::from(2));
        assert_eq!(q(0, -7), Rational::zero());
    }

    #[test]
    fn zero_denominator_is_rejected() {
        match Rational::new(3, 0) {
            Err(Error(ErrorKind::InvalidRational(n), _)) => assert_eq!(n, "3"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn inverse_of_zero_fails() {
        assert!(Rational::zero().inv().is_err());
        assert_eq!(q(-2, 3).inv().unwrap(), q(-3, 2));
    }

    #[test]
    fn floor_decomposition() {
        let r = q(-7, 2);
        assert_eq!(r.integer(), BigInt::from(-4));
        assert_eq!(r.fractional(), q(1, 2));
        assert_eq!(q(7, 2).integer(), BigInt::from(3));
    }

    #[test]
    fn huge_values_convert_to_f64() {
        let big = BigInt::from(10).pow(400);
        let r = Rational::new(big.clone() * 3u32, big).unwrap();
        assert_eq!(r.to_f64(), 3.0);
        let tiny = Rational::new(1, BigInt::from(2).pow(2000)).unwrap();
        assert_eq!(tiny.to_f64(), 0.0);
        assert!((q(1, 3).to_f64() - 1.0 / 3.0).abs() < 1e-16);
    }

    #[test]
    fn display() {
        assert_eq!(q(4, 2).to_string(), "2");
        assert_eq!(q(-1, 3).to_string(), "-1/3");
    }

    fn rational() -> impl Strategy<Value = Rational> {
        (-10_000i64..10_000, 1i64..10_000).prop_map(|(n, d)| q(n, d))
    }

    proptest! {

        #[test]
        fn prop_always_reduced(n in -10_000i64..10_000, d in 1i64..10_000) {
            let r = q(n, d);
            prop_assert!(r.numerator().gcd(r.denominator()).is_one());
            prop_assert!(r.denominator() > &BigInt::zero());
        }

        #[test]
        fn prop_field_identities(a in rational(), b in rational(), c in rational()) {
            prop_assert_eq!(&(&a + &b) + &c, &a + &(&b + &c));
            prop_assert_eq!(&a * &(&b + &c), &(&a * &b) + &(&a * &c));
            prop_assert_eq!(&a - &a, Rational::zero());
            if !a.is_zero() {
                prop_assert_eq!(&a * &a.inv().unwrap(), Rational::one());
            }
        }

        #[test]
        fn prop_order_matches_f64(a in rational(), b in rational()) {
            if a != b {
                prop_assert_eq!(a < b, a.to_f64() < b.to_f64());
            }
        }

    }

}
