// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The outbound event envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::breadcrumb::Breadcrumb;
use crate::context::{Contexts, RequestContext, User};
use crate::level::Level;

/// Exception block of an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionBlock {
	#[serde(rename = "type")]
	pub ty: String,
	/// Traceback text.
	pub value: String,
}

/// An event as submitted to the store endpoint.
///
/// Carries either `exception` or `message`. Empty `extra`, `breadcrumbs` and
/// `contexts` are left out of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
	pub event_id: String,
	pub timestamp: DateTime<Utc>,
	pub platform: String,
	pub logger: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub release: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dist: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub environment: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user: Option<User>,
	#[serde(default)]
	pub tags: BTreeMap<String, String>,
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub extra: BTreeMap<String, String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub breadcrumbs: Vec<Breadcrumb>,
	pub level: Level,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exception: Option<ExceptionBlock>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	#[serde(default, skip_serializing_if = "Contexts::is_empty")]
	pub contexts: Contexts,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub request: Option<RequestContext>,
}
