// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the sss-recover project.
// See the LICENSE file in the project root for full license information.

//! Decoding of positional numerals in bases 2 through 36.
//!
//! Digits are drawn from the alphabet `0-9a-z` (case-insensitive), where a
//! symbol's position in the alphabet is its value. Numerals are big endian
//! and are folded with Horner's rule into a [`BigUint`], so the decoded value
//! is exact no matter how many digits the numeral has.
use crate::errors::RecoveryError;
use num_bigint::BigUint;
use num_traits::Zero;
use std::fmt;

/// The digit alphabet; a symbol's index is its digit value.
pub const ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyz";

/// Smallest supported base.
pub const MIN_BASE: u32 = 2;

/// Largest supported base, one per symbol in [`ALPHABET`].
pub const MAX_BASE: u32 = ALPHABET.len() as u32;

/// A validated radix in `MIN_BASE..=MAX_BASE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Radix(u32);

impl Radix {
  /// Creates a radix, rejecting bases the alphabet cannot express.
  pub fn new(base: impl Into<i128>) -> Result<Self, RecoveryError> {
    let base = base.into();
    match u32::try_from(base) {
      Ok(b) if (MIN_BASE..=MAX_BASE).contains(&b) => Ok(Self(b)),
      _ => Err(RecoveryError::InvalidBase { base }),
    }
  }

  /// Returns the underlying base.
  pub fn get(self) -> u32 {
    self.0
  }

  /// Returns the value of `c` in this radix.
  ///
  /// # Errors
  /// Returns `RecoveryError::InvalidDigit` if `c` is outside the alphabet or
  /// its value is not below the base.
  pub fn digit_value(self, c: char) -> Result<u32, RecoveryError> {
    let invalid = || RecoveryError::InvalidDigit {
      digit: c,
      base: self.0,
    };
    let value = ALPHABET
      .find(c.to_ascii_lowercase())
      .ok_or_else(invalid)? as u32;
    if value >= self.0 {
      return Err(invalid());
    }
    Ok(value)
  }

  /// Decodes a big-endian numeral written in this radix.
  ///
  /// # Errors
  /// Returns `RecoveryError::EmptyNumeral` for an empty string and
  /// `RecoveryError::InvalidDigit` for the first character that is not a
  /// digit of this radix.
  pub fn decode(self, digits: &str) -> Result<BigUint, RecoveryError> {
    if digits.is_empty() {
      return Err(RecoveryError::EmptyNumeral);
    }
    digits.chars().try_fold(BigUint::zero(), |acc, c| {
      let d = self.digit_value(c)?;
      Ok(acc * self.0 + d)
    })
  }
}

impl TryFrom<u32> for Radix {
  type Error = RecoveryError;

  fn try_from(base: u32) -> Result<Self, Self::Error> {
    Radix::new(base)
  }
}

impl fmt::Display for Radix {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Decodes `digits` as a base-`base` numeral.
///
/// The base is validated before any digit is inspected, so an out-of-range
/// base is reported even when the digits would also be invalid.
pub fn decode(digits: &str, base: impl Into<i128>) -> Result<BigUint, RecoveryError> {
  Radix::new(base)?.decode(digits)
}
