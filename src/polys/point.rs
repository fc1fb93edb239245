// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the sss-recover project.
// See the LICENSE file in the project root for full license information.

//! Integer points on a polynomial, one per share.
use num_bigint::BigInt;
use std::fmt;

/// A share: the polynomial's value `y` at the share index `x`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Point {
  x: BigInt,
  y: BigInt,
}

impl Point {
  /// Creates a point from its coordinates.
  pub fn new(x: BigInt, y: BigInt) -> Self {
    Self { x, y }
  }

  /// The abscissa (share index).
  pub fn x(&self) -> &BigInt {
    &self.x
  }

  /// The ordinate (share value).
  pub fn y(&self) -> &BigInt {
    &self.y
  }
}

impl<X: Into<BigInt>, Y: Into<BigInt>> From<(X, Y)> for Point {
  fn from((x, y): (X, Y)) -> Self {
    Self::new(x.into(), y.into())
  }
}

impl fmt::Display for Point {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.x, self.y)
  }
}
