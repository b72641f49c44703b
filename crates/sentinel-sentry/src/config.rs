// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client configuration.
//!
//! A [`Config`] is supplied once at init and owned by the client afterwards.
//! It can be assembled with [`Config::builder`], read from a TOML document
//! with [`Config::from_toml_str`], or taken from the environment with
//! [`Config::from_env`]:
//!
//! - `SENTINEL_DSN`: connection string (required)
//! - `SENTINEL_DEBUG`: "true"/"1"/"yes" enables verbose SDK logging
//! - `SENTINEL_DRY_RUN`: "true"/"1"/"yes" skips the network entirely
//! - `SENTINEL_RELEASE`, `SENTINEL_ENVIRONMENT`: copied onto every event

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use sentinel_sentry_core::User;
use serde::Deserialize;

use crate::builder::ExceptionReport;
use crate::crash::HardCrash;
use crate::error::{Result, SentryError};

/// Default timeout for a single send.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Called after an error reaches the process-wide handler.
pub type SoftCrashHook = Arc<dyn Fn(&ExceptionReport) + Send + Sync>;

/// Called after a crash dump from a previous run has been reported.
pub type HardCrashHook = Arc<dyn Fn(&HardCrash) + Send + Sync>;

/// Configuration for the Sentry client.
#[derive(Clone)]
pub struct Config {
	pub dsn: String,
	/// Log every significant step (init, payload, send result).
	pub debug: bool,
	/// Skip the network and resolve every send with `"(dry run)"`.
	pub dry_run: bool,
	pub send_timeout: Duration,
	pub release: Option<String>,
	pub dist: Option<String>,
	pub environment: Option<String>,
	pub user: Option<User>,
	pub tags: BTreeMap<String, String>,
	pub extra: BTreeMap<String, String>,
	pub on_soft_crash: Option<SoftCrashHook>,
	pub on_hard_crash: Option<HardCrashHook>,
	/// Forward reports to the GameAnalytics integration when the host has one.
	pub gameanalytics: bool,
}

impl fmt::Debug for Config {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Config")
			.field("dsn", &self.dsn)
			.field("debug", &self.debug)
			.field("dry_run", &self.dry_run)
			.field("send_timeout", &self.send_timeout)
			.field("release", &self.release)
			.field("dist", &self.dist)
			.field("environment", &self.environment)
			.field("user", &self.user)
			.field("tags", &self.tags)
			.field("extra", &self.extra)
			.field("on_soft_crash", &self.on_soft_crash.is_some())
			.field("on_hard_crash", &self.on_hard_crash.is_some())
			.field("gameanalytics", &self.gameanalytics)
			.finish()
	}
}

impl Config {
	/// Starts a builder for the given DSN.
	pub fn builder(dsn: impl Into<String>) -> ConfigBuilder {
		ConfigBuilder::new(dsn)
	}

	/// Reads a configuration from a TOML document.
	///
	/// Only the recognised option names are accepted; any other key is an error.
	/// Hooks cannot be expressed in a document and are left unset.
	pub fn from_toml_str(document: &str) -> Result<Self> {
		let doc: ConfigDocument = toml::from_str(document)?;
		Ok(doc.into())
	}

	/// Reads a configuration from `SENTINEL_*` environment variables.
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads a configuration through an arbitrary variable lookup.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let dsn = lookup("SENTINEL_DSN")
			.filter(|dsn| !dsn.trim().is_empty())
			.ok_or(SentryError::MissingConfig("SENTINEL_DSN"))?;
		let flag = |key: &str| {
			lookup(key)
				.map(|val| matches!(val.to_lowercase().as_str(), "true" | "1" | "yes"))
				.unwrap_or(false)
		};

		let mut builder = Config::builder(dsn)
			.debug(flag("SENTINEL_DEBUG"))
			.dry_run(flag("SENTINEL_DRY_RUN"));
		if let Some(release) = lookup("SENTINEL_RELEASE") {
			builder = builder.release(release);
		}
		if let Some(environment) = lookup("SENTINEL_ENVIRONMENT") {
			builder = builder.environment(environment);
		}
		Ok(builder.build())
	}
}

/// Builder for [`Config`].
pub struct ConfigBuilder {
	config: Config,
}

impl ConfigBuilder {
	pub fn new(dsn: impl Into<String>) -> Self {
		Self {
			config: Config {
				dsn: dsn.into(),
				debug: false,
				dry_run: false,
				send_timeout: DEFAULT_SEND_TIMEOUT,
				release: None,
				dist: None,
				environment: None,
				user: None,
				tags: BTreeMap::new(),
				extra: BTreeMap::new(),
				on_soft_crash: None,
				on_hard_crash: None,
				gameanalytics: false,
			},
		}
	}

	pub fn debug(mut self, debug: bool) -> Self {
		self.config.debug = debug;
		self
	}

	pub fn dry_run(mut self, dry_run: bool) -> Self {
		self.config.dry_run = dry_run;
		self
	}

	/// Sets the per-send timeout. Zero keeps [`DEFAULT_SEND_TIMEOUT`].
	pub fn send_timeout(mut self, timeout: Duration) -> Self {
		if !timeout.is_zero() {
			self.config.send_timeout = timeout;
		}
		self
	}

	/// Sets the release version.
	///
	/// Example: `1.2.3` or `git commit SHA`
	pub fn release(mut self, release: impl Into<String>) -> Self {
		self.config.release = Some(release.into());
		self
	}

	pub fn dist(mut self, dist: impl Into<String>) -> Self {
		self.config.dist = Some(dist.into());
		self
	}

	/// Sets the environment name.
	///
	/// Example: `production`, `staging`, `development`
	pub fn environment(mut self, environment: impl Into<String>) -> Self {
		self.config.environment = Some(environment.into());
		self
	}

	pub fn user(mut self, user: User) -> Self {
		self.config.user = Some(user);
		self
	}

	/// Adds a global tag attached to every event.
	pub fn tag(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.config.tags.insert(key.into(), value.to_string());
		self
	}

	/// Adds a global extra value attached to every event.
	pub fn extra(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.config.extra.insert(key.into(), value.to_string());
		self
	}

	pub fn on_soft_crash(mut self, hook: impl Fn(&ExceptionReport) + Send + Sync + 'static) -> Self {
		self.config.on_soft_crash = Some(Arc::new(hook));
		self
	}

	pub fn on_hard_crash(mut self, hook: impl Fn(&HardCrash) + Send + Sync + 'static) -> Self {
		self.config.on_hard_crash = Some(Arc::new(hook));
		self
	}

	pub fn gameanalytics(mut self, enabled: bool) -> Self {
		self.config.gameanalytics = enabled;
		self
	}

	pub fn build(self) -> Config {
		self.config
	}
}

/// The document form of [`Config`]. Unknown keys are rejected.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDocument {
	dsn: String,
	#[serde(default)]
	debug: bool,
	#[serde(default)]
	dry_run: bool,
	/// Seconds.
	send_timeout: Option<u64>,
	release: Option<String>,
	dist: Option<String>,
	environment: Option<String>,
	/// User id.
	user: Option<String>,
	#[serde(default)]
	tags: BTreeMap<String, String>,
	#[serde(default)]
	extra: BTreeMap<String, String>,
	#[serde(default)]
	gameanalytics: bool,
}

impl From<ConfigDocument> for Config {
	fn from(doc: ConfigDocument) -> Self {
		let mut builder = ConfigBuilder::new(doc.dsn)
			.debug(doc.debug)
			.dry_run(doc.dry_run)
			.gameanalytics(doc.gameanalytics);
		if let Some(secs) = doc.send_timeout {
			builder = builder.send_timeout(Duration::from_secs(secs));
		}
		let mut config = builder.build();
		config.release = doc.release;
		config.dist = doc.dist;
		config.environment = doc.environment;
		config.user = doc.user.map(User::with_id);
		config.tags = doc.tags;
		config.extra = doc.extra;
		config
	}
}
