// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the sss-recover project.
// See the LICENSE file in the project root for full license information.

//! This module defines errors returned by the library.
use core::fmt::Debug;
use num_bigint::BigInt;
use thiserror::Error;

/// Errors returned while recovering a secret from shares
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RecoveryError {
  /// returned if the share file cannot be read
  #[error("FileReadError: cannot read {path}: {reason}")]
  FileReadError {
    /// The path that was requested
    path: String,
    /// The underlying I/O failure
    reason: String,
  },
  /// returned if the share file does not match the expected structure
  #[error("MalformedRecord: {reason}")]
  MalformedRecord {
    /// What was wrong with the record
    reason: String,
  },
  /// returned if a radix lies outside 2..=36
  #[error("InvalidBase: base {base} is outside 2..=36")]
  InvalidBase {
    /// The rejected base
    base: i128,
  },
  /// returned if a numeral contains a character that is not a digit in its base
  #[error("InvalidDigit: {digit:?} is not a digit in base {base}")]
  InvalidDigit {
    /// The offending character
    digit: char,
    /// The base the numeral was decoded in
    base: u32,
  },
  /// returned if a numeral has no digits at all
  #[error("EmptyNumeral")]
  EmptyNumeral,
  /// returned if two shares carry the same x-coordinate
  #[error("DuplicateAbscissa: more than one share at x = {x}")]
  DuplicateAbscissa {
    /// The repeated x-coordinate
    x: BigInt,
  },
  /// returned if the interpolated value is not an integer
  #[error("InexactDivision: {numerator} is not divisible by {denominator}")]
  InexactDivision {
    /// Numerator of the reduced result
    numerator: BigInt,
    /// Denominator of the reduced result
    denominator: BigInt,
  },
  /// returned if fewer shares are available than the threshold requires
  #[error("InsufficientShares: need {required}, have {available}")]
  InsufficientShares {
    /// The threshold k
    required: usize,
    /// How many shares were supplied
    available: usize,
  },
}
