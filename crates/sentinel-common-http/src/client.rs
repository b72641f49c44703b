// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client with consistent User-Agent header.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// SDK name sent in the User-Agent header.
pub const SDK_NAME: &str = "sentinel-sentry";
/// SDK version sent in the User-Agent header.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates a client builder with the standard SDK User-Agent header.
///
/// # Example
/// ```ignore
/// let client = sentinel_common_http::builder()
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Creates a client builder that leaves the User-Agent to the host.
///
/// Browser targets supply their own header and reject attempts to override it.
pub fn bare_builder() -> ClientBuilder {
	Client::builder()
}

/// Builds a client with the given timeout, optionally sending the SDK User-Agent.
pub fn client_with_timeout(timeout: Duration, send_user_agent: bool) -> reqwest::Result<Client> {
	let builder = if send_user_agent {
		builder()
	} else {
		bare_builder()
	};
	builder.timeout(timeout).build()
}

/// Returns the SDK User-Agent string.
///
/// Format: `sentinel-sentry/{version}`
pub fn user_agent() -> String {
	format!("{SDK_NAME}/{SDK_VERSION}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn user_agent_has_correct_format() {
		let ua = user_agent();
		let parts: Vec<&str> = ua.split('/').collect();
		assert_eq!(parts.len(), 2);
		assert_eq!(parts[0], "sentinel-sentry");
		assert_eq!(parts[1], SDK_VERSION);
	}

	#[test]
	fn clients_build_with_and_without_user_agent() {
		assert!(client_with_timeout(Duration::from_secs(30), true).is_ok());
		assert!(client_with_timeout(Duration::from_secs(30), false).is_ok());
	}
}
