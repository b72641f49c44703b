// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Environment context attached to events.
//!
//! A [`PlatformContext`] is chosen once at init. [`NativeContext`] describes a
//! process running directly on an OS; [`BrowserContext`] describes a build
//! running inside a web page, where the host supplies page URL, user agent and
//! renderer because the SDK cannot query them itself.

use std::collections::BTreeMap;

use sentinel_sentry_core::{OsContext, RequestContext};

/// Tag holding the application install path.
pub const APP_PATH_TAG: &str = "app_path";
/// Tag holding the running project's version.
pub const PROJECT_VERSION_TAG: &str = "project.version";
/// Tag holding the graphics renderer (browser targets).
pub const RENDERER_TAG: &str = "renderer";

/// Capability interface for platform-specific enrichment.
pub trait PlatformContext: Send + Sync {
	/// Tags describing the running environment.
	fn context_tags(&self) -> BTreeMap<String, String>;

	/// Request block for browser targets.
	fn request(&self) -> Option<RequestContext> {
		None
	}

	/// OS context for native targets.
	fn os(&self) -> Option<OsContext> {
		None
	}

	/// Browser targets set their own `User-Agent`; the transport must not.
	fn is_browser(&self) -> bool {
		false
	}
}

/// Facts about the host shared by all platform variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentInfo {
	pub application_path: String,
	pub engine_info: BTreeMap<String, String>,
	pub sys_info: BTreeMap<String, String>,
	pub project_version: String,
}

impl EnvironmentInfo {
	/// Non-empty fields as tags, engine and system info prefixed by section.
	pub fn tags(&self) -> BTreeMap<String, String> {
		let mut tags = BTreeMap::new();
		if !self.application_path.is_empty() {
			tags.insert(APP_PATH_TAG.to_string(), self.application_path.clone());
		}
		for (prefix, section) in [("engine_info", &self.engine_info), ("sys_info", &self.sys_info)] {
			for (key, value) in section.iter().filter(|(_, v)| !v.is_empty()) {
				tags.insert(format!("{prefix}.{key}"), value.clone());
			}
		}
		if !self.project_version.is_empty() {
			tags.insert(PROJECT_VERSION_TAG.to_string(), self.project_version.clone());
		}
		tags
	}
}

/// Context for a process running directly on an operating system.
#[derive(Debug, Clone, Default)]
pub struct NativeContext {
	info: EnvironmentInfo,
	os_name: String,
}

impl NativeContext {
	/// Detects what the standard library can tell about the host.
	pub fn detect() -> Self {
		let application_path = std::env::current_exe()
			.ok()
			.and_then(|exe| exe.parent().map(|dir| dir.display().to_string()))
			.unwrap_or_default();

		let mut sys_info = BTreeMap::new();
		sys_info.insert("system_name".to_string(), os_display_name().to_string());
		sys_info.insert("arch".to_string(), std::env::consts::ARCH.to_string());
		sys_info.insert("family".to_string(), std::env::consts::FAMILY.to_string());
		sys_info.insert(
			"language".to_string(),
			std::env::var("LANG").unwrap_or_default(),
		);

		let mut engine_info = BTreeMap::new();
		engine_info.insert(
			"version".to_string(),
			sentinel_common_http::SDK_VERSION.to_string(),
		);
		engine_info.insert(
			"is_debug".to_string(),
			cfg!(debug_assertions).to_string(),
		);

		Self {
			info: EnvironmentInfo {
				application_path,
				engine_info,
				sys_info,
				project_version: String::new(),
			},
			os_name: os_display_name().to_string(),
		}
	}

	/// Uses explicitly supplied facts instead of detection.
	pub fn with_info(info: EnvironmentInfo, os_name: impl Into<String>) -> Self {
		Self {
			info,
			os_name: os_name.into(),
		}
	}

	pub fn project_version(mut self, version: impl Into<String>) -> Self {
		self.info.project_version = version.into();
		self
	}

	pub fn engine_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.info.engine_info.insert(key.into(), value.into());
		self
	}

	pub fn info(&self) -> &EnvironmentInfo {
		&self.info
	}
}

impl PlatformContext for NativeContext {
	fn context_tags(&self) -> BTreeMap<String, String> {
		self.info.tags()
	}

	fn os(&self) -> Option<OsContext> {
		if self.os_name.is_empty() {
			return None;
		}
		Some(OsContext {
			name: self.os_name.clone(),
		})
	}
}

/// Context for a build running inside a web page.
#[derive(Debug, Clone, Default)]
pub struct BrowserContext {
	info: EnvironmentInfo,
	url: String,
	user_agent: String,
	renderer: Option<String>,
}

impl BrowserContext {
	pub fn new(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			user_agent: user_agent.into(),
			..Default::default()
		}
	}

	pub fn with_info(mut self, info: EnvironmentInfo) -> Self {
		self.info = info;
		self
	}

	/// Graphics renderer string, when the page exposes one.
	pub fn renderer(mut self, renderer: impl Into<String>) -> Self {
		self.renderer = Some(renderer.into());
		self
	}
}

impl PlatformContext for BrowserContext {
	fn context_tags(&self) -> BTreeMap<String, String> {
		let mut tags = self.info.tags();
		if let Some(renderer) = self.renderer.as_ref().filter(|r| !r.is_empty()) {
			tags.insert(RENDERER_TAG.to_string(), renderer.clone());
		}
		tags
	}

	fn request(&self) -> Option<RequestContext> {
		let mut headers = BTreeMap::new();
		headers.insert("User-Agent".to_string(), self.user_agent.clone());
		Some(RequestContext {
			url: self.url.clone(),
			headers,
		})
	}

	fn is_browser(&self) -> bool {
		true
	}
}

fn os_display_name() -> &'static str {
	match std::env::consts::OS {
		"linux" => "Linux",
		"macos" => "Darwin",
		"windows" => "Windows",
		"android" => "Android",
		"ios" => "iPhone OS",
		other => other,
	}
}
