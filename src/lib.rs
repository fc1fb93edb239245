// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the sss-recover project.
// See the LICENSE file in the project root for full license information.

//! This library recovers the secret of a Shamir secret sharing from a
//! threshold of shares. Share values are written in arbitrary bases (2 to 36),
//! decoded into big integers, and the constant term of the sharing polynomial
//! is obtained by exact Lagrange interpolation at zero.
#![deny(
  warnings,
  unused,
  future_incompatible,
  nonstandard_style,
  rust_2018_idioms,
  missing_docs
)]
#![forbid(unsafe_code)]

// public modules
pub mod errors;
pub mod polys;
pub mod radix;
pub mod recover;
pub mod report;
pub mod share_file;

/// Start a span + timer, return `(Span, Instant)`.
macro_rules! start_span {
    ($name:expr $(, $($fmt:tt)+)?) => {{
        let span       = info_span!($name $(, $($fmt)+)?);
        let span_clone = span.clone();    // lives as long as the guard
        let _guard      = span_clone.enter();
        (span, Instant::now())
    }};
}
pub(crate) use start_span;

pub use errors::RecoveryError;
pub use polys::{
  lagrange::{interpolate, interpolate_at},
  point::Point,
};
pub use radix::decode;
pub use recover::{RecoverOptions, Recovery, recover, select_threshold};
pub use share_file::{EncodedShare, Keys, ShareFile};
