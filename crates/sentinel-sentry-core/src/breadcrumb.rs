// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Breadcrumbs (events leading up to a report) and the bounded trail holding them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::level::Level;

/// Maximum number of breadcrumbs kept in a trail.
pub const MAX_BREADCRUMBS: usize = 10;

/// A breadcrumb representing something that happened before an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
	/// Set when the breadcrumb is recorded into a trail.
	pub timestamp: DateTime<Utc>,
	/// "http", "navigation", "ui", "console"
	#[serde(skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub level: Option<Level>,
	#[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
	pub data: serde_json::Map<String, serde_json::Value>,
}

impl Default for Breadcrumb {
	fn default() -> Self {
		Self {
			timestamp: Utc::now(),
			category: None,
			message: None,
			level: None,
			data: serde_json::Map::new(),
		}
	}
}

impl Breadcrumb {
	pub fn new(category: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			category: Some(category.into()),
			message: Some(message.into()),
			..Default::default()
		}
	}

	pub fn level(mut self, level: Level) -> Self {
		self.level = Some(level);
		self
	}

	pub fn data(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.data.insert(key.into(), value.into());
		self
	}
}

/// Ordered, bounded breadcrumb sequence. The oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct BreadcrumbTrail {
	crumbs: VecDeque<Breadcrumb>,
	capacity: usize,
}

impl Default for BreadcrumbTrail {
	fn default() -> Self {
		Self::new(MAX_BREADCRUMBS)
	}
}

impl BreadcrumbTrail {
	pub fn new(capacity: usize) -> Self {
		Self {
			crumbs: VecDeque::with_capacity(capacity),
			capacity,
		}
	}

	/// Records a breadcrumb, stamping it with the current time.
	pub fn push(&mut self, mut breadcrumb: Breadcrumb) {
		if self.capacity == 0 {
			return;
		}
		breadcrumb.timestamp = Utc::now();
		while self.crumbs.len() >= self.capacity {
			self.crumbs.pop_front();
		}
		self.crumbs.push_back(breadcrumb);
	}

	/// Copy of the current trail, oldest first.
	pub fn snapshot(&self) -> Vec<Breadcrumb> {
		self.crumbs.iter().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.crumbs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.crumbs.is_empty()
	}

	pub fn clear(&mut self) {
		self.crumbs.clear();
	}
}
