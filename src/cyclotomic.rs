//! The cyclotomic field Q(zeta), zeta = exp(2 pi i / 5). Every tile
//! vertex of the tiling is an element of this field.
//!
//! Elements are stored on the basis `1, zeta, zeta^2, zeta^3`; a
//! `zeta^4` term is folded away using `1 + zeta + ... + zeta^4 = 0`.

use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;

use crate::errors::*;
use crate::golden::Golden;
use crate::rational::Rational;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Cyclotomic {
    c: [Rational; 4],
}

impl Cyclotomic {

    pub fn new(c0: Rational, c1: Rational, c2: Rational, c3: Rational) -> Cyclotomic {
        Cyclotomic { c: [c0, c1, c2, c3] }
    }

    /// Reduce five coefficients on `1..zeta^4` to the four-term basis.
    pub fn normalize(c: [Rational; 5]) -> Cyclotomic {

        let [c0, c1, c2, c3, c4] = c;

        Cyclotomic {
            c: [&c0 - &c4, &c1 - &c4, &c2 - &c4, &c3 - &c4],
        }

    }

    pub fn from_integers(c: [i64; 4]) -> Cyclotomic {
        Cyclotomic::new(Rational::from_integer(c[0]),
                        Rational::from_integer(c[1]),
                        Rational::from_integer(c[2]),
                        Rational::from_integer(c[3]))
    }

    pub fn from_rational(r: Rational) -> Cyclotomic {
        Cyclotomic::new(r, Rational::zero(), Rational::zero(), Rational::zero())
    }

    pub fn zero() -> Cyclotomic {
        Self::from_integers([0, 0, 0, 0])
    }

    pub fn one() -> Cyclotomic {
        Self::from_integers([1, 0, 0, 0])
    }

    /// `zeta^n` for any integer `n`.
    pub fn zeta_pow(n: i32) -> Cyclotomic {

        match n.rem_euclid(5) {
            0 => Self::from_integers([1, 0, 0, 0]),
            1 => Self::from_integers([0, 1, 0, 0]),
            2 => Self::from_integers([0, 0, 1, 0]),
            3 => Self::from_integers([0, 0, 0, 1]),
            _ => Self::from_integers([-1, -1, -1, -1]),
        }

    }

    /// `zeta^4 - zeta`, i.e. `-2 i Im(zeta)`: multiplying by it turns
    /// imaginary parts into real parts.
    pub fn neg_2_imag_zeta() -> Cyclotomic {
        Self::from_integers([-1, -2, -1, -1])
    }

    pub fn coefficients(&self) -> &[Rational; 4] {
        &self.c
    }

    pub fn is_zero(&self) -> bool {
        self.c.iter().all(|x| x.is_zero())
    }

    pub fn mul_coeff(&self, k: &Rational) -> Cyclotomic {
        Cyclotomic::new(&self.c[0] * k, &self.c[1] * k, &self.c[2] * k, &self.c[3] * k)
    }

    /// Automorphism `zeta -> zeta^k`, for `k` coprime to 5.
    pub fn galois(&self, k: usize) -> Cyclotomic {

        debug_assert!(k % 5 != 0);

        let mut out = [Rational::zero(), Rational::zero(), Rational::zero(),
                       Rational::zero(), Rational::zero()];

        for (j, cj) in self.c.iter().enumerate() {
            let slot = (j * k) % 5;
            out[slot] = &out[slot] + cj;
        }

        Self::normalize(out)

    }

    /// Complex conjugate, which is the automorphism `zeta -> zeta^4`.
    pub fn conj(&self) -> Cyclotomic {
        self.galois(4)
    }

    /// Product of all four conjugates, always rational.
    pub fn norm(&self) -> Rational {

        let product = self * &self.conjugate_product();

        debug_assert!(product.c[1..].iter().all(|x| x.is_zero()));

        product.c[0].clone()

    }

    fn conjugate_product(&self) -> Cyclotomic {
        &(&self.galois(2) * &self.galois(3)) * &self.galois(4)
    }

    pub fn inv(&self) -> Result<Cyclotomic> {

        let others = self.conjugate_product();
        let norm = (self * &others).c[0].clone();

        if norm.is_zero() {
            bail!(ErrorKind::DivisionByZero("cyclotomic inverse"));
        }

        Ok(others.mul_coeff(&norm.inv()?))

    }

    /// Real part, in Q(sqrt 5).
    pub fn real(&self) -> Golden {

        let quarter = Rational::reduced(BigInt::from(1), BigInt::from(4));

        let c23 = &(&self.c[2] + &self.c[3]) * &quarter;
        let c1 = &self.c[1] * &quarter;

        Golden::new(&(&self.c[0] - &c1) - &c23, &c1 - &c23)

    }

    /// `(z + conj z, z - conj z)`, twice the real and imaginary parts
    /// as field elements.
    pub fn real_imag_2(&self) -> (Cyclotomic, Cyclotomic) {
        let conj = self.conj();
        (self + &conj, self - &conj)
    }

    pub fn to_f64_pair(&self) -> (f64, f64) {

        let mut re = 0.0;
        let mut im = 0.0;

        for (j, cj) in self.c.iter().enumerate() {
            let theta = 2.0 * PI * (j as f64) / 5.0;
            let v = cj.to_f64();
            re += v * theta.cos();
            im += v * theta.sin();
        }

        (re, im)

    }

}

impl fmt::Display for Cyclotomic {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.c[0], self.c[1], self.c[2], self.c[3])
    }

}

impl<'a, 'b> Add<&'b Cyclotomic> for &'a Cyclotomic {

    type Output = Cyclotomic;

    fn add(self, other: &'b Cyclotomic) -> Cyclotomic {
        Cyclotomic::new(&self.c[0] + &other.c[0],
                        &self.c[1] + &other.c[1],
                        &self.c[2] + &other.c[2],
                        &self.c[3] + &other.c[3])
    }

}

impl<'a, 'b> Sub<&'b Cyclotomic> for &'a Cyclotomic {

    type Output = Cyclotomic;

    fn sub(self, other: &'b Cyclotomic) -> Cyclotomic {
        Cyclotomic::new(&self.c[0] - &other.c[0],
                        &self.c[1] - &other.c[1],
                        &self.c[2] - &other.c[2],
                        &self.c[3] - &other.c[3])
    }

}

impl<'a, 'b> Mul<&'b Cyclotomic> for &'a Cyclotomic {

    type Output = Cyclotomic;

    fn mul(self, other: &'b Cyclotomic) -> Cyclotomic {

        let l = &self.c;
        let r = &other.c;

        // zeta^5 = 1 wraps the degree 5 and 6 terms around
        let t0 = &l[0] * &r[0] + &l[2] * &r[3] + &l[3] * &r[2];
        let t1 = &l[0] * &r[1] + &l[1] * &r[0] + &l[3] * &r[3];
        let t2 = &l[0] * &r[2] + &l[1] * &r[1] + &l[2] * &r[0];
        let t3 = &l[0] * &r[3] + &l[1] * &r[2] + &l[2] * &r[1] + &l[3] * &r[0];
        let t4 = &l[1] * &r[3] + &l[2] * &r[2] + &l[3] * &r[1];

        Cyclotomic::normalize([t0, t1, t2, t3, t4])

    }

}

impl<'a> Neg for &'a Cyclotomic {

    type Output = Cyclotomic;

    fn neg(self) -> Cyclotomic {
        Cyclotomic::new(-&self.c[0], -&self.c[1], -&self.c[2], -&self.c[3])
    }

}

impl Neg for Cyclotomic {

    type Output = Cyclotomic;

    fn neg(self) -> Cyclotomic {
        -&self
    }

}

forward_binop!(impl Add, add for Cyclotomic);
forward_binop!(impl Sub, sub for Cyclotomic);
forward_binop!(impl Mul, mul for Cyclotomic);
