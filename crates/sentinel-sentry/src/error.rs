// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the Sentry client.

use sentinel_sentry_core::CoreError;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, SentryError>;

/// Errors that can occur in the Sentry client.
#[derive(Debug, Error)]
pub enum SentryError {
	/// The DSN could not be parsed. Fatal at init.
	#[error("invalid configuration: {0}")]
	Config(#[from] CoreError),

	/// A configuration document could not be read.
	#[error("invalid configuration document: {0}")]
	ConfigDocument(#[from] toml::de::Error),

	/// A required configuration value is absent.
	#[error("missing configuration: {0}")]
	MissingConfig(&'static str),

	/// A capture was attempted before `init`.
	#[error("sentry client is not initialized")]
	NotInitialized,

	/// `init` was called more than once.
	#[error("sentry client is already initialized")]
	AlreadyInitialized,

	/// The rate limiter rejected the event; it was dropped.
	#[error("too many messages")]
	Throttled,

	/// The server answered 200 with a body that is not a store response.
	#[error("decode error: {0}")]
	Decode(String),

	/// The server answered with a status other than 200.
	#[error("response status {0}")]
	Status(u16),

	/// HTTP request failed (connect, timeout, body read).
	#[error("HTTP request failed: {0}")]
	Request(#[from] reqwest::Error),

	/// Failed to serialize the event.
	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// A real send was requested outside of a tokio runtime.
	#[error("no async runtime available to send the event")]
	NoRuntime,

	/// The send task went away before reporting a result.
	#[error("event delivery dropped before completion")]
	Dropped,

	/// A fault inside the automatic error or crash hook.
	#[error("error handler fault: {0}")]
	HandlerFault(String),

	/// Reading or writing a crash dump failed.
	#[error("crash store error: {0}")]
	CrashStore(#[from] std::io::Error),
}

impl SentryError {
	/// Returns true when the event was dropped by the local rate limiter.
	pub fn is_throttled(&self) -> bool {
		matches!(self, Self::Throttled)
	}

	/// Returns true for failures talking to or decoding from the server.
	pub fn is_transport_failure(&self) -> bool {
		matches!(
			self,
			Self::Status(_) | Self::Request(_) | Self::Decode(_)
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn throttled_is_distinct_from_transport_failures() {
		let throttled = SentryError::Throttled;
		assert!(throttled.is_throttled());
		assert!(!throttled.is_transport_failure());
		assert_eq!(throttled.to_string(), "too many messages");

		let status = SentryError::Status(503);
		assert!(status.is_transport_failure());
		assert!(!status.is_throttled());
		assert_eq!(status.to_string(), "response status 503");
	}

	#[test]
	fn decode_error_message() {
		let err = SentryError::Decode("expected value at line 1".to_string());
		assert_eq!(err.to_string(), "decode error: expected value at line 1");
	}

	#[test]
	fn dsn_error_converts_to_config_error() {
		let err: SentryError = CoreError::MissingProjectId.into();
		assert!(matches!(err, SentryError::Config(CoreError::MissingProjectId)));
	}
}
