// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for DSN and event parsing.

use thiserror::Error;

/// Errors produced while parsing DSNs and event fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
	#[error("invalid DSN: missing '://' after the protocol")]
	MissingScheme,

	#[error("invalid DSN: unsupported protocol '{0}' (expected http or https)")]
	UnsupportedProtocol(String),

	#[error("invalid DSN: missing public key before '@'")]
	MissingPublicKey,

	#[error("invalid DSN: missing host")]
	MissingHost,

	#[error("invalid DSN: port '{0}' is not a number")]
	InvalidPort(String),

	#[error("invalid DSN: missing project id path segment")]
	MissingProjectId,

	#[error("invalid level: {0}")]
	InvalidLevel(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
