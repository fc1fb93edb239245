// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the sss-recover project.
// See the LICENSE file in the project root for full license information.

//! Exact Lagrange interpolation over the integers.
//!
//! Given k points with pairwise distinct abscissae, the unique polynomial of
//! degree < k through them is evaluated as
//!
//! ```text
//! f(x) = Σ_j  y_j · Π_{m≠j} (x − x_m)  /  Π_{m≠j} (x_j − x_m)
//! ```
//!
//! Every basis term is formed from its full numerator and denominator products
//! and kept as an exact fraction. The terms are summed as fractions and the
//! only division happens once, at the end, where a non-zero remainder is
//! reported as [`RecoveryError::InexactDivision`] instead of being truncated.
use crate::{errors::RecoveryError, polys::point::Point};
use itertools::Itertools;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use std::ops::Add;
use tracing::trace;

/// A reduced fraction with a positive denominator.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Fraction {
  num: BigInt,
  den: BigInt,
}

impl Fraction {
  fn zero() -> Self {
    Self {
      num: BigInt::zero(),
      den: BigInt::one(),
    }
  }

  // den must be non-zero
  fn new(num: BigInt, den: BigInt) -> Self {
    debug_assert!(!den.is_zero());
    let (num, den) = if den.is_negative() {
      (-num, -den)
    } else {
      (num, den)
    };
    let g = num.gcd(&den);
    if g.is_one() {
      Self { num, den }
    } else {
      Self {
        num: num / &g,
        den: den / &g,
      }
    }
  }

  fn into_integer(self) -> Result<BigInt, RecoveryError> {
    let (quotient, remainder) = self.num.div_rem(&self.den);
    if !remainder.is_zero() {
      return Err(RecoveryError::InexactDivision {
        numerator: self.num,
        denominator: self.den,
      });
    }
    Ok(quotient)
  }
}

impl Add for Fraction {
  type Output = Fraction;

  fn add(self, rhs: Fraction) -> Fraction {
    if self.den == rhs.den {
      return Fraction::new(self.num + rhs.num, self.den);
    }
    Fraction::new(
      self.num * &rhs.den + rhs.num * &self.den,
      self.den * rhs.den,
    )
  }
}

/// Returns the first abscissa that occurs more than once, if any.
fn first_duplicate_abscissa(points: &[Point]) -> Option<&BigInt> {
  points.iter().map(Point::x).duplicates().next()
}

/// The basis term `y_j · Π (x − x_m) / Π (x_j − x_m)` of `pj`, the j-th
/// entry of `points`, as a fraction.
fn basis_term(points: &[Point], j: usize, pj: &Point, x: &BigInt) -> Fraction {
  let xj = pj.x();
  let (numerator, denominator) = points
    .iter()
    .enumerate()
    .filter(|(m, _)| *m != j)
    .fold((BigInt::one(), BigInt::one()), |(num, den), (_, pm)| {
      (num * (x - pm.x()), den * (xj - pm.x()))
    });
  trace!(j, %numerator, %denominator, "lagrange basis term");
  Fraction::new(pj.y() * numerator, denominator)
}

/// Evaluates the interpolating polynomial of `points` at `x`.
///
/// # Errors
/// - `RecoveryError::InsufficientShares` if `points` is empty.
/// - `RecoveryError::DuplicateAbscissa` if two points share an x-coordinate.
/// - `RecoveryError::InexactDivision` if the value at `x` is not an integer,
///   which means the points do not lie on an integer polynomial of degree
///   below `points.len()`.
pub fn interpolate_at(points: &[Point], x: &BigInt) -> Result<BigInt, RecoveryError> {
  if points.is_empty() {
    return Err(RecoveryError::InsufficientShares {
      required: 1,
      available: 0,
    });
  }
  if let Some(dup) = first_duplicate_abscissa(points) {
    return Err(RecoveryError::DuplicateAbscissa { x: dup.clone() });
  }

  points
    .iter()
    .enumerate()
    .map(|(j, pj)| basis_term(points, j, pj, x))
    .fold(Fraction::zero(), |acc, term| acc + term)
    .into_integer()
}

/// Recovers the constant term `f(0)` of the polynomial through `points`.
pub fn interpolate(points: &[Point]) -> Result<BigInt, RecoveryError> {
  interpolate_at(points, &BigInt::zero())
}
