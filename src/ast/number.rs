//! Numeric atoms.
//!
//! The reader produces integers, floats and complex numbers; arithmetic
//! primitives promote along `Int -> Float -> Complex`. Complex literals use a
//! trailing `i` for the imaginary unit (`3i`, `1.5-2i`).

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::errors::ErrorKind;

// ============================================================================
// COMPLEX
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Magnitude.
    pub fn norm(&self) -> f64 {
        self.re.hypot(self.im)
    }

    pub fn sqrt(&self) -> Complex {
        let r = self.norm();
        let re = ((r + self.re) / 2.0).sqrt();
        let im = ((r - self.re) / 2.0).sqrt().copysign(self.im);
        Complex::new(re, im)
    }
}

impl Add for Complex {
    type Output = Complex;
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Div for Complex {
    type Output = Complex;
    fn div(self, rhs: Complex) -> Complex {
        let denom = rhs.re * rhs.re + rhs.im * rhs.im;
        Complex::new(
            (self.re * rhs.re + self.im * rhs.im) / denom,
            (self.im * rhs.re - self.re * rhs.im) / denom,
        )
    }
}

impl Neg for Complex {
    type Output = Complex;
    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.re == 0.0 {
            return write!(f, "{}i", self.im);
        }
        let sign = if self.im.is_sign_negative() { '-' } else { '+' };
        write!(f, "{}{}{}i", self.re, sign, self.im.abs())
    }
}

// ============================================================================
// LITERAL PARSING
// ============================================================================

/// Only tokens made of digits, signs, dots and exponents are numeric. This
/// keeps `inf`, `nan` and friends available as symbols.
fn looks_numeric(text: &str) -> bool {
    text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
}

pub fn parse_int(token: &str) -> Option<i64> {
    token.parse::<i64>().ok()
}

pub fn parse_float(token: &str) -> Option<f64> {
    if !looks_numeric(token) {
        return None;
    }
    token.parse::<f64>().ok()
}

/// Parses `<im>i` or `<re>(+|-)<im>i`. Both parts need explicit digits.
pub fn parse_complex(token: &str) -> Option<Complex> {
    let body = token.strip_suffix('i')?;
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&k| matches!(bytes[k], b'+' | b'-') && !matches!(bytes[k - 1], b'e' | b'E'));

    match split {
        Some(k) => Some(Complex::new(parse_float(&body[..k])?, parse_float(&body[k..])?)),
        None => Some(Complex::new(0.0, parse_float(body)?)),
    }
}

// ============================================================================
// NUMERIC TOWER
// ============================================================================

/// A number lifted out of a `Value` for arithmetic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
    Complex(Complex),
}

impl Number {
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(x) => x,
            Number::Complex(c) => c.re,
        }
    }

    pub fn to_complex(self) -> Complex {
        match self {
            Number::Complex(c) => c,
            other => Complex::new(other.to_f64(), 0.0),
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(x) => x == 0.0,
            Number::Complex(c) => c.re == 0.0 && c.im == 0.0,
        }
    }

    fn is_complex(self) -> bool {
        matches!(self, Number::Complex(_))
    }

    /// Applies an operation at the lowest common rank of both operands.
    fn promote(
        self,
        rhs: Number,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
        complex_op: fn(Complex, Complex) -> Complex,
        name: &str,
    ) -> Result<Number, ErrorKind> {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => {
                int_op(a, b).map(Number::Int).ok_or_else(|| ErrorKind::IntegerOverflow {
                    operation: name.into(),
                })
            }
            _ if self.is_complex() || rhs.is_complex() => Ok(Number::Complex(complex_op(
                self.to_complex(),
                rhs.to_complex(),
            ))),
            _ => Ok(Number::Float(float_op(self.to_f64(), rhs.to_f64()))),
        }
    }

    pub fn add(self, rhs: Number) -> Result<Number, ErrorKind> {
        self.promote(rhs, i64::checked_add, |a, b| a + b, |a, b| a + b, "+")
    }

    pub fn sub(self, rhs: Number) -> Result<Number, ErrorKind> {
        self.promote(rhs, i64::checked_sub, |a, b| a - b, |a, b| a - b, "-")
    }

    pub fn mul(self, rhs: Number) -> Result<Number, ErrorKind> {
        self.promote(rhs, i64::checked_mul, |a, b| a * b, |a, b| a * b, "*")
    }

    /// True division: two integers divide to a float.
    pub fn div(self, rhs: Number) -> Result<Number, ErrorKind> {
        if rhs.is_zero() {
            return Err(ErrorKind::DivisionByZero);
        }
        if self.is_complex() || rhs.is_complex() {
            return Ok(Number::Complex(self.to_complex() / rhs.to_complex()));
        }
        Ok(Number::Float(self.to_f64() / rhs.to_f64()))
    }

    pub fn neg(self) -> Result<Number, ErrorKind> {
        match self {
            Number::Int(i) => i.checked_neg().map(Number::Int).ok_or(ErrorKind::IntegerOverflow {
                operation: "-".into(),
            }),
            Number::Float(x) => Ok(Number::Float(-x)),
            Number::Complex(c) => Ok(Number::Complex(-c)),
        }
    }

    /// Numeric equality across ranks: `(= 1 1.0)` is true.
    pub fn num_eq(self, rhs: Number) -> bool {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => a == b,
            _ if self.is_complex() || rhs.is_complex() => self.to_complex() == rhs.to_complex(),
            _ => self.to_f64() == rhs.to_f64(),
        }
    }

    /// Ordering for real numbers; `None` for complex operands or NaN.
    pub fn compare(self, rhs: Number) -> Option<Ordering> {
        match (self, rhs) {
            (Number::Complex(_), _) | (_, Number::Complex(_)) => None,
            (Number::Int(a), Number::Int(b)) => Some(a.cmp(&b)),
            _ => self.to_f64().partial_cmp(&rhs.to_f64()),
        }
    }
}
