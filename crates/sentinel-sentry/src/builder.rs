// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event envelope construction.
//!
//! Tags and extra are layered, later layers overwriting earlier ones:
//! platform context tags, then the client's global scope, then the values
//! passed with the capture call.

use std::collections::BTreeMap;

use chrono::Utc;
use sentinel_sentry_core::{generate_event_id, Breadcrumb, Contexts, Event, ExceptionBlock, Level, User};

use crate::config::Config;
use crate::platform::PlatformContext;

/// Platform marker. Ingest only fills in the client IP as the event origin
/// for a few platforms; this is one of them.
pub const PLATFORM: &str = "javascript";
/// Logger name stamped on every event.
pub const LOGGER: &str = "sentinel-sentry";
/// Tag naming where an exception report came from.
pub const SOURCE_TAG: &str = "source";

const DEFAULT_EXCEPTION_TYPE: &str = "error";
const DEFAULT_MESSAGE: &str = "N/A";

/// An error to report: origin label, message, traceback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionReport {
	/// Where the error came from, e.g. "panic", "crash", "lua".
	pub source: Option<String>,
	pub message: Option<String>,
	pub traceback: Option<String>,
	/// Reported as level `fatal` instead of `error`.
	pub fatal: bool,
	pub tags: BTreeMap<String, String>,
	pub extra: BTreeMap<String, String>,
}

impl ExceptionReport {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: Some(message.into()),
			..Default::default()
		}
	}

	/// The (source, message, traceback) triple handed over by an error hook.
	pub fn from_triple(
		source: impl Into<String>,
		message: impl Into<String>,
		traceback: impl Into<String>,
	) -> Self {
		Self {
			source: Some(source.into()),
			message: Some(message.into()),
			traceback: Some(traceback.into()),
			..Default::default()
		}
	}

	pub fn source(mut self, source: impl Into<String>) -> Self {
		self.source = Some(source.into());
		self
	}

	pub fn traceback(mut self, traceback: impl Into<String>) -> Self {
		self.traceback = Some(traceback.into());
		self
	}

	pub fn fatal(mut self, fatal: bool) -> Self {
		self.fatal = fatal;
		self
	}

	pub fn tag(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.tags.insert(key.into(), value.to_string());
		self
	}

	pub fn extra(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.extra.insert(key.into(), value.to_string());
		self
	}
}

/// A plain message to report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
	pub message: Option<String>,
	pub level: Option<Level>,
	pub tags: BTreeMap<String, String>,
	pub extra: BTreeMap<String, String>,
}

impl Message {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: Some(message.into()),
			..Default::default()
		}
	}

	pub fn level(mut self, level: Level) -> Self {
		self.level = Some(level);
		self
	}

	pub fn tag(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.tags.insert(key.into(), value.to_string());
		self
	}

	pub fn extra(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.extra.insert(key.into(), value.to_string());
		self
	}
}

/// What a capture call reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
	Exception(ExceptionReport),
	Message(Message),
}

/// Client-wide tags, extra and user, seeded from [`Config`] and updated at runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
	pub tags: BTreeMap<String, String>,
	pub extra: BTreeMap<String, String>,
	pub user: Option<User>,
}

impl Scope {
	pub fn from_config(config: &Config) -> Self {
		Self {
			tags: config.tags.clone(),
			extra: config.extra.clone(),
			user: config.user.clone(),
		}
	}
}

/// Assembles events from a capture payload and the client state.
pub struct EventBuilder<'a> {
	config: &'a Config,
	platform: &'a dyn PlatformContext,
}

impl<'a> EventBuilder<'a> {
	pub fn new(config: &'a Config, platform: &'a dyn PlatformContext) -> Self {
		Self { config, platform }
	}

	pub fn build(&self, kind: EventKind, scope: &Scope, breadcrumbs: Vec<Breadcrumb>) -> Event {
		let mut event = Event {
			event_id: generate_event_id(),
			timestamp: Utc::now(),
			platform: PLATFORM.to_string(),
			logger: LOGGER.to_string(),
			release: self.config.release.clone(),
			dist: self.config.dist.clone(),
			environment: self.config.environment.clone(),
			user: scope.user.clone(),
			tags: self.platform.context_tags(),
			extra: BTreeMap::new(),
			breadcrumbs: Vec::new(),
			level: Level::Info,
			exception: None,
			message: None,
			contexts: Contexts {
				os: self.platform.os(),
			},
			request: self.platform.request(),
		};

		let (call_tags, call_extra) = match kind {
			EventKind::Exception(report) => {
				event.level = if report.fatal { Level::Fatal } else { Level::Error };
				event.exception = Some(ExceptionBlock {
					ty: report
						.message
						.unwrap_or_else(|| DEFAULT_EXCEPTION_TYPE.to_string()),
					value: report.traceback.unwrap_or_default(),
				});
				if let Some(source) = report.source.filter(|s| !s.is_empty()) {
					event.tags.insert(SOURCE_TAG.to_string(), source);
				}
				(report.tags, report.extra)
			}
			EventKind::Message(message) => {
				event.message = Some(message.message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string()));
				event.level = message.level.unwrap_or_default();
				(message.tags, message.extra)
			}
		};

		merge_non_empty(&mut event.tags, &scope.tags);
		merge_non_empty(&mut event.tags, &call_tags);
		merge_non_empty(&mut event.extra, &scope.extra);
		merge_non_empty(&mut event.extra, &call_extra);

		event.breadcrumbs = breadcrumbs;
		event
	}
}

/// Copies `source` into `target`, skipping empty values.
fn merge_non_empty(target: &mut BTreeMap<String, String>, source: &BTreeMap<String, String>) {
	for (key, value) in source {
		if !value.is_empty() {
			target.insert(key.clone(), value.clone());
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::platform::{BrowserContext, EnvironmentInfo, NativeContext};
	use sentinel_sentry_core::EVENT_ID_LEN;

	fn config() -> Config {
		Config::builder("https://key@example.com/1")
			.release("1.2.3")
			.dist("42")
			.environment("test")
			.user(User::with_id("player-1"))
			.tag("a", "1")
			.build()
	}

	fn native() -> NativeContext {
		let info = EnvironmentInfo {
			application_path: "/opt/game".to_string(),
			engine_info: BTreeMap::from([("version".to_string(), "1.4.0".to_string())]),
			..Default::default()
		};
		NativeContext::with_info(info, "Linux")
	}

	fn build(kind: EventKind, config: &Config) -> Event {
		let platform = native();
		EventBuilder::new(config, &platform).build(kind, &Scope::from_config(config), Vec::new())
	}

	#[test]
	fn copies_identity_and_config_metadata() {
		let config = config();
		let event = build(EventKind::Message(Message::new("hi")), &config);

		assert_eq!(event.event_id.len(), EVENT_ID_LEN);
		assert_eq!(event.platform, PLATFORM);
		assert_eq!(event.logger, LOGGER);
		assert_eq!(event.release.as_deref(), Some("1.2.3"));
		assert_eq!(event.dist.as_deref(), Some("42"));
		assert_eq!(event.environment.as_deref(), Some("test"));
		assert_eq!(event.user, Some(User::with_id("player-1")));
		assert_eq!(event.contexts.os.as_ref().map(|os| os.name.as_str()), Some("Linux"));
		assert!(event.request.is_none());
	}

	#[test]
	fn call_tags_override_config_tags() {
		let config = config();
		let event = build(EventKind::Message(Message::new("hi").tag("a", "2")), &config);
		assert_eq!(event.tags["a"], "2");
	}

	#[test]
	fn config_tags_override_context_tags() {
		let config = Config::builder("https://key@example.com/1")
			.tag("engine_info.version", "override")
			.build();
		let event = build(EventKind::Message(Message::new("hi")), &config);
		assert_eq!(event.tags["engine_info.version"], "override");
		assert_eq!(event.tags["app_path"], "/opt/game");
	}

	#[test]
	fn empty_call_values_are_dropped() {
		let config = config();
		let event = build(
			EventKind::Message(Message::new("hi").tag("a", "").tag("b", "").extra("e", "")),
			&config,
		);
		assert_eq!(event.tags["a"], "1");
		assert!(!event.tags.contains_key("b"));
		assert!(event.extra.is_empty());
	}

	#[test]
	fn empty_extra_is_omitted_from_payload() {
		let config = config();
		let event = build(EventKind::Message(Message::new("hi")), &config);
		let json = serde_json::to_value(&event).unwrap();
		assert!(json.get("extra").is_none());
		assert!(json.get("breadcrumbs").is_none());
	}

	#[test]
	fn extra_merges_with_call_precedence() {
		let config = Config::builder("https://key@example.com/1")
			.extra("level_name", "forest")
			.extra("score", 10)
			.build();
		let event = build(
			EventKind::Message(Message::new("hi").extra("score", 99)),
			&config,
		);
		assert_eq!(event.extra["level_name"], "forest");
		assert_eq!(event.extra["score"], "99");
	}

	#[test]
	fn message_defaults() {
		let config = config();
		let event = build(EventKind::Message(Message::default()), &config);
		assert_eq!(event.message.as_deref(), Some("N/A"));
		assert_eq!(event.level, Level::Info);
		assert!(event.exception.is_none());
	}

	#[test]
	fn message_level_is_kept() {
		let config = config();
		let event = build(
			EventKind::Message(Message::new("careful").level(Level::Warning)),
			&config,
		);
		assert_eq!(event.level, Level::Warning);
	}

	#[test]
	fn exception_fields_and_source_tag() {
		let config = config();
		let report = ExceptionReport::from_triple("lua", "attempt to index nil", "main.script:12");
		let event = build(EventKind::Exception(report), &config);

		assert_eq!(event.level, Level::Error);
		let exception = event.exception.unwrap();
		assert_eq!(exception.ty, "attempt to index nil");
		assert_eq!(exception.value, "main.script:12");
		assert_eq!(event.tags[SOURCE_TAG], "lua");
		assert!(event.message.is_none());
	}

	#[test]
	fn empty_source_adds_no_tag() {
		let config = config();
		let report = ExceptionReport::from_triple("", "boom", "");
		let event = build(EventKind::Exception(report), &config);
		assert!(!event.tags.contains_key(SOURCE_TAG));
	}

	#[test]
	fn fatal_exception_and_defaults() {
		let config = config();
		let report = ExceptionReport {
			fatal: true,
			..Default::default()
		};
		let event = build(EventKind::Exception(report), &config);

		assert_eq!(event.level, Level::Fatal);
		let exception = event.exception.unwrap();
		assert_eq!(exception.ty, "error");
		assert_eq!(exception.value, "");
		assert!(!event.tags.contains_key(SOURCE_TAG));
	}

	#[test]
	fn breadcrumbs_are_attached_when_present() {
		let config = config();
		let platform = native();
		let crumbs = vec![Breadcrumb::new("ui", "click")];
		let event = EventBuilder::new(&config, &platform).build(
			EventKind::Message(Message::new("hi")),
			&Scope::from_config(&config),
			crumbs.clone(),
		);
		assert_eq!(event.breadcrumbs, crumbs);
	}

	#[test]
	fn browser_platform_adds_request_block() {
		let config = config();
		let platform = BrowserContext::new("https://game.example/", "Mozilla/5.0").renderer("WebGL");
		let event = EventBuilder::new(&config, &platform).build(
			EventKind::Message(Message::new("hi")),
			&Scope::from_config(&config),
			Vec::new(),
		);

		let request = event.request.unwrap();
		assert_eq!(request.url, "https://game.example/");
		assert_eq!(request.headers["User-Agent"], "Mozilla/5.0");
		assert_eq!(event.tags["renderer"], "WebGL");
		assert!(event.contexts.is_empty());
	}

	#[test]
	fn each_build_gets_a_fresh_id() {
		let config = config();
		let a = build(EventKind::Message(Message::new("hi")), &config);
		let b = build(EventKind::Message(Message::new("hi")), &config);
		assert_ne!(a.event_id, b.event_id);
	}
}
