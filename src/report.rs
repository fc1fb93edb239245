// Copyright (c) Microsoft Corporation.
// SPDX-License-Identifier: MIT
// This file is part of the sss-recover project.
// See the LICENSE file in the project root for full license information.

//! Rendering of a [`Recovery`] for humans or machines.
//!
//! All integers are written in base 10. The JSON form carries them as strings
//! since they routinely exceed the range of a JSON number.
use crate::{
  recover::{Recovery, ShareCheck},
  share_file::Keys,
};
use clap::ValueEnum;
use serde::Serialize;
use std::io::{self, Write};

/// Output format of the report.
#[derive(ValueEnum, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum ReportFormat {
  /// Plain text, one point per line followed by the secret
  #[default]
  Text,
  /// A single JSON object
  Json,
}

#[derive(Serialize)]
struct JsonPoint {
  x: String,
  y: String,
}

#[derive(Serialize)]
struct JsonCheck {
  x: String,
  y: String,
  consistent: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  expected: Option<String>,
}

#[derive(Serialize)]
struct JsonReport {
  threshold: Keys,
  points: Vec<JsonPoint>,
  secret: String,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  unused: Vec<JsonCheck>,
}

impl From<&ShareCheck> for JsonCheck {
  fn from(check: &ShareCheck) -> Self {
    JsonCheck {
      x: check.point.x().to_string(),
      y: check.point.y().to_string(),
      consistent: check.is_consistent(),
      expected: check.expected.as_ref().map(ToString::to_string),
    }
  }
}

fn write_text<W: Write>(recovery: &Recovery, out: &mut W) -> io::Result<()> {
  let Keys { n, k } = recovery.keys();
  writeln!(out, "Using {k} of {n} shares:")?;
  for p in recovery.selected() {
    writeln!(out, "  x = {}, y = {}", p.x(), p.y())?;
  }
  for check in recovery.checks() {
    match (&check.expected, check.is_consistent()) {
      (_, true) => writeln!(out, "  unused x = {}: consistent", check.point.x())?,
      (Some(expected), false) => writeln!(
        out,
        "  unused x = {}: inconsistent (expected y = {expected})",
        check.point.x()
      )?,
      (None, false) => writeln!(
        out,
        "  unused x = {}: inconsistent (no integer value at this x)",
        check.point.x()
      )?,
    }
  }
  writeln!(out, "secret = {}", recovery.secret())
}

fn write_json<W: Write>(recovery: &Recovery, out: &mut W) -> io::Result<()> {
  let report = JsonReport {
    threshold: recovery.keys(),
    points: recovery
      .selected()
      .iter()
      .map(|p| JsonPoint {
        x: p.x().to_string(),
        y: p.y().to_string(),
      })
      .collect(),
    secret: recovery.secret().to_string(),
    unused: recovery.checks().iter().map(JsonCheck::from).collect(),
  };
  serde_json::to_writer_pretty(&mut *out, &report)?;
  writeln!(out)
}

/// Writes the report for `recovery` to `out`.
pub fn write_report<W: Write>(recovery: &Recovery, format: ReportFormat, out: &mut W) -> io::Result<()> {
  match format {
    ReportFormat::Text => write_text(recovery, out),
    ReportFormat::Json => write_json(recovery, out),
  }
}

/// Renders the report for `recovery` into a string.
pub fn render(recovery: &Recovery, format: ReportFormat) -> String {
  let mut buf = Vec::new();
  write_report(recovery, format, &mut buf).expect("writing to a Vec cannot fail");
  String::from_utf8_lossy(&buf).into_owned()
}
