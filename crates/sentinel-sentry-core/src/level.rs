// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event and breadcrumb severity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Severity level of an event or breadcrumb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
	Fatal,
	Error,
	Warning,
	#[default]
	Info,
	Debug,
}

impl Level {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Fatal => "fatal",
			Self::Error => "error",
			Self::Warning => "warning",
			Self::Info => "info",
			Self::Debug => "debug",
		}
	}
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Level {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"fatal" => Ok(Self::Fatal),
			"error" => Ok(Self::Error),
			"warning" => Ok(Self::Warning),
			"info" => Ok(Self::Info),
			"debug" => Ok(Self::Debug),
			_ => Err(CoreError::InvalidLevel(s.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn rejects_unknown_level() {
		assert_eq!(
			"critical".parse::<Level>(),
			Err(CoreError::InvalidLevel("critical".to_string()))
		);
	}

	#[test]
	fn serializes_lowercase() {
		assert_eq!(serde_json::to_string(&Level::Warning).unwrap(), "\"warning\"");
	}

	proptest! {
		#[test]
		fn level_roundtrip(level in prop_oneof![
			Just(Level::Fatal),
			Just(Level::Error),
			Just(Level::Warning),
			Just(Level::Info),
			Just(Level::Debug),
		]) {
			let parsed: Level = level.to_string().parse().unwrap();
			prop_assert_eq!(level, parsed);
		}
	}
}
