// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the sss-recover project.
// See the LICENSE file in the project root for full license information.

//! The on-disk description of a set of shares.
//!
//! A share file is a JSON object with one reserved member, `keys`, holding the
//! threshold descriptor, and one member per share keyed by its identifier:
//!
//! ```json
//! {
//!   "keys": { "n": 4, "k": 3 },
//!   "1": { "base": "10", "value": "4" },
//!   "2": { "base": "2", "value": "111" }
//! }
//! ```
//!
//! The share members are kept in document order, which is the order the
//! threshold selection walks them in.
use crate::{errors::RecoveryError, polys::point::Point, radix};
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, str::FromStr};
use tracing::{debug, info, warn};

/// Name of the reserved member carrying the threshold descriptor.
pub const KEYS_FIELD: &str = "keys";

/// Threshold descriptor: `k` of `n` shares reconstruct the secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys {
  /// Declared number of shares.
  pub n: usize,
  /// Number of shares needed to reconstruct.
  pub k: usize,
}

/// A base written either as a JSON number or as a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBase {
  Signed(i64),
  Unsigned(u64),
  Float(f64),
  Text(String),
}

/// Parses an optionally negative run of ASCII digits.
fn parse_integer(s: &str) -> Option<BigInt> {
  let digits = s.strip_prefix('-').unwrap_or(s);
  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  BigInt::from_str(s).ok()
}

// integers beyond i128 saturate
fn deserialize_base<'de, D>(deserializer: D) -> Result<i128, D::Error>
where
  D: serde::Deserializer<'de>,
{
  use serde::de::Error;
  match RawBase::deserialize(deserializer)? {
    RawBase::Signed(n) => Ok(i128::from(n)),
    RawBase::Unsigned(n) => Ok(i128::from(n)),
    RawBase::Float(f) => Err(D::Error::custom(format!("base {f} is not an integer"))),
    RawBase::Text(s) => {
      let n = parse_integer(s.trim())
        .ok_or_else(|| D::Error::custom(format!("base {s:?} is not an integer")))?;
      Ok(n.to_i128().unwrap_or(if n.is_negative() {
        i128::MIN
      } else {
        i128::MAX
      }))
    }
  }
}

/// A share before decoding: its value written in some base.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct EncodedShare {
  #[serde(deserialize_with = "deserialize_base")]
  base: i128,
  value: String,
}

impl EncodedShare {
  /// Creates an encoded share.
  pub fn new(base: i128, value: impl Into<String>) -> Self {
    Self {
      base,
      value: value.into(),
    }
  }

  /// The radix the value is written in.
  pub fn base(&self) -> i128 {
    self.base
  }

  /// The digit string.
  pub fn value(&self) -> &str {
    &self.value
  }

  /// Decodes this share into a point whose abscissa is `id`.
  pub fn decode(&self, id: &str) -> Result<Point, RecoveryError> {
    let x = parse_identifier(id)?;
    let y = radix::decode(&self.value, self.base)?;
    debug!(id, base = %self.base, digits = self.value.len(), "decoded share");
    Ok(Point::new(x, BigInt::from(y)))
  }
}

fn parse_identifier(id: &str) -> Result<BigInt, RecoveryError> {
  parse_integer(id).ok_or_else(|| RecoveryError::MalformedRecord {
    reason: format!("share identifier {id:?} is not an integer"),
  })
}

/// A parsed share file: the threshold descriptor and the shares in
/// declared order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareFile {
  keys: Keys,
  shares: Vec<(String, EncodedShare)>,
}

impl<'de> Deserialize<'de> for ShareFile {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    use serde::de::{self, MapAccess, Visitor};

    struct ShareFileVisitor;

    impl<'de> Visitor<'de> for ShareFileVisitor {
      type Value = ShareFile;

      fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object with a `keys` member and one member per share")
      }

      fn visit_map<V>(self, mut map: V) -> Result<ShareFile, V::Error>
      where
        V: MapAccess<'de>,
      {
        let mut keys = None;
        let mut shares: Vec<(String, EncodedShare)> = Vec::new();
        while let Some(name) = map.next_key::<String>()? {
          if name == KEYS_FIELD {
            if keys.is_some() {
              return Err(de::Error::duplicate_field(KEYS_FIELD));
            }
            keys = Some(map.next_value()?);
          } else {
            if shares.iter().any(|(id, _)| *id == name) {
              return Err(de::Error::custom(format!("duplicate share {name:?}")));
            }
            let share = map.next_value()?;
            shares.push((name, share));
          }
        }
        let keys = keys.ok_or_else(|| de::Error::missing_field(KEYS_FIELD))?;
        Ok(ShareFile { keys, shares })
      }
    }

    deserializer.deserialize_map(ShareFileVisitor)
  }
}

impl ShareFile {
  /// Creates a share file from its parts, checking the threshold descriptor.
  pub fn new(keys: Keys, shares: Vec<(String, EncodedShare)>) -> Result<Self, RecoveryError> {
    let file = Self { keys, shares };
    file.validate()?;
    Ok(file)
  }

  /// Parses a share file from JSON text.
  pub fn from_json(text: &str) -> Result<Self, RecoveryError> {
    let file: ShareFile =
      serde_json::from_str(text).map_err(|e| RecoveryError::MalformedRecord {
        reason: e.to_string(),
      })?;
    file.validate()?;
    Ok(file)
  }

  /// Reads and parses the share file at `path`.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, RecoveryError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| RecoveryError::FileReadError {
      path: path.display().to_string(),
      reason: e.to_string(),
    })?;
    let file = Self::from_json(&text)?;
    info!(
      path = %path.display(),
      n = file.keys.n,
      k = file.keys.k,
      records = file.shares.len(),
      "loaded share file"
    );
    Ok(file)
  }

  fn validate(&self) -> Result<(), RecoveryError> {
    let Keys { n, k } = self.keys;
    if k == 0 {
      return Err(RecoveryError::MalformedRecord {
        reason: "threshold k must be at least 1".to_string(),
      });
    }
    if k > n {
      return Err(RecoveryError::MalformedRecord {
        reason: format!("threshold k = {k} exceeds share count n = {n}"),
      });
    }
    for (id, _) in &self.shares {
      parse_identifier(id)?;
    }
    if self.shares.len() != n {
      warn!(
        declared = n,
        present = self.shares.len(),
        "share count differs from keys.n"
      );
    }
    Ok(())
  }

  /// The threshold descriptor.
  pub fn keys(&self) -> Keys {
    self.keys
  }

  /// The encoded shares with their identifiers, in declared order.
  pub fn shares(&self) -> &[(String, EncodedShare)] {
    &self.shares
  }

  /// Decodes every share into a point, preserving declared order.
  pub fn decode_points(&self) -> Result<Vec<Point>, RecoveryError> {
    self
      .shares
      .iter()
      .map(|(id, share)| share.decode(id))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const SAMPLE: &str = r#"{
    "keys": { "n": 4, "k": 3 },
    "1": { "base": "10", "value": "4" },
    "2": { "base": "2", "value": "111" },
    "3": { "base": "10", "value": "12" },
    "6": { "base": "4", "value": "213" }
  }"#;

  #[test]
  fn test_parse_sample() {
    let file = ShareFile::from_json(SAMPLE).unwrap();
    assert_eq!(file.keys(), Keys { n: 4, k: 3 });
    let ids: Vec<&str> = file.shares().iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3", "6"]);
    let points = file.decode_points().unwrap();
    assert_eq!(points[1], Point::from((2, 7)));
    assert_eq!(points[3], Point::from((6, 39)));
  }

  #[test]
  fn test_declared_order_is_kept() {
    let text = r#"{
      "9": { "base": 10, "value": "1" },
      "keys": { "n": 3, "k": 2 },
      "2": { "base": 10, "value": "2" },
      "5": { "base": 10, "value": "3" }
    }"#;
    let file = ShareFile::from_json(text).unwrap();
    let ids: Vec<&str> = file.shares().iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, ["9", "2", "5"]);
  }

  #[test]
  fn test_base_as_number_or_string() {
    let text = r#"{
      "keys": { "n": 2, "k": 2 },
      "1": { "base": 16, "value": "ff" },
      "2": { "base": " 16 ", "value": "FF" }
    }"#;
    let file = ShareFile::from_json(text).unwrap();
    let points = file.decode_points().unwrap();
    assert_eq!(points[0].y(), &BigInt::from(255));
    assert_eq!(points[1].y(), &BigInt::from(255));
  }

  fn assert_malformed(text: &str) {
    assert!(
      matches!(
        ShareFile::from_json(text),
        Err(RecoveryError::MalformedRecord { .. })
      ),
      "expected MalformedRecord for {text}"
    );
  }

  #[test]
  fn test_malformed_records() {
    // not json
    assert_malformed("{ keys: ");
    // not an object
    assert_malformed("[1, 2, 3]");
    // missing keys
    assert_malformed(r#"{ "1": { "base": "10", "value": "4" } }"#);
    // missing base
    assert_malformed(r#"{ "keys": { "n": 1, "k": 1 }, "1": { "value": "4" } }"#);
    // missing value
    assert_malformed(r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": "10" } }"#);
    // share is not an object
    assert_malformed(r#"{ "keys": { "n": 1, "k": 1 }, "1": "4" }"#);
    // non-numeric base
    assert_malformed(r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": "ten", "value": "4" } }"#);
    // non-integer bases
    assert_malformed(r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": 16.0, "value": "4" } }"#);
    assert_malformed(r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": "1_6", "value": "4" } }"#);
    assert_malformed(r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": true, "value": "4" } }"#);
    // identifier is not an integer
    assert_malformed(r#"{ "keys": { "n": 1, "k": 1 }, "one": { "base": "10", "value": "4" } }"#);
    // duplicate share
    assert_malformed(
      r#"{ "keys": { "n": 2, "k": 1 }, "1": { "base": "10", "value": "4" }, "1": { "base": "10", "value": "5" } }"#,
    );
    // k out of range
    assert_malformed(r#"{ "keys": { "n": 1, "k": 0 }, "1": { "base": "10", "value": "4" } }"#);
    assert_malformed(r#"{ "keys": { "n": 1, "k": 2 }, "1": { "base": "10", "value": "4" } }"#);
  }

  #[test]
  fn test_base_out_of_range_is_a_decode_error() {
    let text = r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": "37", "value": "4" } }"#;
    let file = ShareFile::from_json(text).unwrap();
    assert_eq!(
      file.decode_points(),
      Err(RecoveryError::InvalidBase { base: 37 })
    );
  }

  #[test]
  fn test_any_integer_base_outside_range_is_invalid_base() {
    let cases: [(&str, i128); 6] = [
      ("-1", -1),
      (r#""-1""#, -1),
      ("0", 0),
      ("4294967296", 4_294_967_296),
      ("18446744073709551615", 18_446_744_073_709_551_615),
      (r#""99999999999999999999999999999999999999999""#, i128::MAX),
    ];
    for (raw, base) in cases {
      let text = format!(r#"{{ "keys": {{ "n": 1, "k": 1 }}, "1": {{ "base": {raw}, "value": "4" }} }}"#);
      let file = ShareFile::from_json(&text).unwrap();
      assert_eq!(
        file.decode_points(),
        Err(RecoveryError::InvalidBase { base }),
        "base {raw}"
      );
    }
  }

  #[test]
  fn test_identifier_must_be_plain_decimal() {
    for id in ["1_0", "+1", " 1", "1 ", "", "-", "0x1", "1e2"] {
      let text = format!(r#"{{ "keys": {{ "n": 1, "k": 1 }}, "{id}": {{ "base": "10", "value": "4" }} }}"#);
      assert_malformed(&text);
    }
    let text = r#"{ "keys": { "n": 2, "k": 2 }, "-3": { "base": "10", "value": "4" }, "007": { "base": "10", "value": "5" } }"#;
    let points = ShareFile::from_json(text).unwrap().decode_points().unwrap();
    assert_eq!(points[0].x(), &BigInt::from(-3));
    assert_eq!(points[1].x(), &BigInt::from(7));
  }

  #[test]
  fn test_load_missing_file() {
    let err = ShareFile::load("/nonexistent/shares.json").unwrap_err();
    assert!(matches!(err, RecoveryError::FileReadError { .. }));
  }

  #[test]
  fn test_new_validates_threshold() {
    let shares = vec![("1".to_string(), EncodedShare::new(10, "4"))];
    assert!(ShareFile::new(Keys { n: 1, k: 1 }, shares.clone()).is_ok());
    assert!(ShareFile::new(Keys { n: 1, k: 3 }, shares).is_err());
  }
}
