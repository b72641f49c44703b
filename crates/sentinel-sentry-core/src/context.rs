// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Context blocks attached to events (user, OS, request).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User the event is attributed to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// IP address (sensitive - not displayed by default)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ip_address: Option<String>,
}

impl User {
	/// A user identified only by id.
	pub fn with_id(id: impl Into<String>) -> Self {
		Self {
			id: Some(id.into()),
			..Default::default()
		}
	}
}

/// Operating system context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsContext {
	/// "Windows", "macOS", "Linux"
	pub name: String,
}

/// The `contexts` block of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contexts {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub os: Option<OsContext>,
}

impl Contexts {
	pub fn is_empty(&self) -> bool {
		self.os.is_none()
	}
}

/// Request block for events raised inside a browser page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
	pub url: String,
	#[serde(default)]
	pub headers: BTreeMap<String, String>,
}
