// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the sss-recover project.
// See the LICENSE file in the project root for full license information.

//! Threshold selection and the end-to-end recovery pipeline.
use crate::{
  errors::RecoveryError,
  polys::{
    lagrange::{interpolate, interpolate_at},
    point::Point,
  },
  share_file::{Keys, ShareFile},
  start_span,
};
use num_bigint::BigInt;
use std::time::Instant;
use tracing::{debug, info, info_span, warn};

/// Returns the first `k` points in the order they were declared.
///
/// The points are never sorted; a different declaration order can select a
/// different subset.
///
/// # Errors
/// Returns `RecoveryError::InsufficientShares` if fewer than `k` points are
/// available.
pub fn select_threshold(points: &[Point], k: usize) -> Result<&[Point], RecoveryError> {
  points
    .get(..k)
    .ok_or(RecoveryError::InsufficientShares {
      required: k,
      available: points.len(),
    })
}

/// Knobs for [`recover`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecoverOptions {
  /// Evaluate every share beyond the threshold against the recovered
  /// polynomial and record whether it agrees.
  pub check_unused: bool,
}

/// Verdict on one share that did not take part in the reconstruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareCheck {
  /// The unused share.
  pub point: Point,
  /// The polynomial's value at the share's index, if it is an integer.
  pub expected: Option<BigInt>,
}

impl ShareCheck {
  /// Whether the share lies on the recovered polynomial.
  pub fn is_consistent(&self) -> bool {
    self.expected.as_ref() == Some(self.point.y())
  }
}

/// The outcome of a successful reconstruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recovery {
  keys: Keys,
  selected: Vec<Point>,
  unused: Vec<Point>,
  secret: BigInt,
  checks: Vec<ShareCheck>,
}

impl Recovery {
  /// The threshold descriptor the recovery ran with.
  pub fn keys(&self) -> Keys {
    self.keys
  }

  /// The k points the secret was interpolated from.
  pub fn selected(&self) -> &[Point] {
    &self.selected
  }

  /// Points past the threshold, in declared order.
  pub fn unused(&self) -> &[Point] {
    &self.unused
  }

  /// The recovered constant term.
  pub fn secret(&self) -> &BigInt {
    &self.secret
  }

  /// Per-share verdicts for the unused points; empty unless
  /// [`RecoverOptions::check_unused`] was set.
  pub fn checks(&self) -> &[ShareCheck] {
    &self.checks
  }
}

fn check_share(selected: &[Point], point: &Point) -> ShareCheck {
  let expected = match interpolate_at(selected, point.x()) {
    Ok(v) => Some(v),
    Err(e) => {
      debug!(x = %point.x(), error = %e, "unused share has no integer counterpart");
      None
    }
  };
  let check = ShareCheck {
    point: point.clone(),
    expected,
  };
  if !check.is_consistent() {
    warn!(x = %point.x(), "unused share does not lie on the recovered polynomial");
  }
  check
}

/// Recovers the secret from the points in declared order using the first
/// `k` of them.
pub fn recover_points(
  keys: Keys,
  points: Vec<Point>,
  options: &RecoverOptions,
) -> Result<Recovery, RecoveryError> {
  let (_span, t) = start_span!("recover_secret", k = keys.k, available = points.len());

  let selected = select_threshold(&points, keys.k)?.to_vec();
  let secret = interpolate(&selected)?;
  info!(elapsed_ms = %t.elapsed().as_millis(), "recover_secret");

  let unused = points[keys.k..].to_vec();
  let checks = if options.check_unused {
    unused.iter().map(|p| check_share(&selected, p)).collect()
  } else {
    Vec::new()
  };

  Ok(Recovery {
    keys,
    selected,
    unused,
    secret,
    checks,
  })
}

/// Decodes every share in `file` and recovers the secret.
pub fn recover(file: &ShareFile, options: &RecoverOptions) -> Result<Recovery, RecoveryError> {
  let (_span, t) = start_span!("decode_shares", records = file.shares().len());
  let points = file.decode_points()?;
  info!(elapsed_ms = %t.elapsed().as_millis(), "decode_shares");
  recover_points(file.keys(), points, options)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pts(raw: &[(i64, i64)]) -> Vec<Point> {
    raw.iter().map(|&p| Point::from(p)).collect()
  }

  #[test]
  fn test_select_first_k_in_declared_order() {
    let points = pts(&[(5, 1), (1, 2), (3, 3)]);
    let selected = select_threshold(&points, 2).unwrap();
    assert_eq!(selected, &points[..2]);
    assert_eq!(selected[0].x(), &BigInt::from(5));
  }

  #[test]
  fn test_select_insufficient() {
    let points = pts(&[(1, 2)]);
    assert_eq!(
      select_threshold(&points, 2),
      Err(RecoveryError::InsufficientShares {
        required: 2,
        available: 1
      })
    );
  }

  #[test]
  fn test_only_first_k_affect_secret() {
    // first two lie on f(x) = 3 + 2x, the third is garbage
    let points = pts(&[(3, 9), (1, 5), (2, 1000)]);
    let keys = Keys { n: 3, k: 2 };
    let recovery = recover_points(keys, points, &RecoverOptions::default()).unwrap();
    assert_eq!(recovery.secret(), &BigInt::from(3));
    assert_eq!(recovery.unused(), &pts(&[(2, 1000)])[..]);
    assert!(recovery.checks().is_empty());
  }

  #[test]
  fn test_check_unused_flags_inconsistent_share() {
    let points = pts(&[(1, 5), (2, 7), (3, 9), (4, 12)]);
    let keys = Keys { n: 4, k: 2 };
    let options = RecoverOptions { check_unused: true };
    let recovery = recover_points(keys, points, &options).unwrap();
    let verdicts: Vec<bool> = recovery.checks().iter().map(ShareCheck::is_consistent).collect();
    assert_eq!(verdicts, [true, false]);
    assert_eq!(recovery.checks()[1].expected, Some(BigInt::from(11)));
  }

  #[test]
  fn test_check_unused_with_non_integer_value() {
    // f(x) = x / 2 has an integer constant term but f(1) = 1/2
    let points = pts(&[(2, 1), (4, 2), (1, 0)]);
    let keys = Keys { n: 3, k: 2 };
    let options = RecoverOptions { check_unused: true };
    let recovery = recover_points(keys, points, &options).unwrap();
    assert_eq!(recovery.secret(), &BigInt::from(0));
    assert_eq!(recovery.checks()[0].expected, None);
    assert!(!recovery.checks()[0].is_consistent());
  }
}
