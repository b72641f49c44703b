// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! DSN parsing into a validated ingestion endpoint.
//!
//! A DSN has the shape `{protocol}://{public_key}@{host}[:{port}]{path}{project_id}`
//! where `path` starts and ends with `/` and `project_id` is the last path segment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Wire protocol of an ingestion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
	Http,
	Https,
}

impl Protocol {
	/// Port used when the DSN does not name one.
	pub fn default_port(self) -> u16 {
		match self {
			Self::Http => 80,
			Self::Https => 443,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Http => "http",
			Self::Https => "https",
		}
	}
}

impl fmt::Display for Protocol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Protocol {
	type Err = CoreError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"http" => Ok(Self::Http),
			"https" => Ok(Self::Https),
			"" => Err(CoreError::MissingScheme),
			other => Err(CoreError::UnsupportedProtocol(other.to_string())),
		}
	}
}

/// Ingestion endpoint derived from a DSN.
///
/// Only [`Endpoint::parse`] constructs this type, so every field is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
	protocol: Protocol,
	public_key: String,
	host: String,
	port: u16,
	path: String,
	project_id: String,
	request_uri: String,
	server: String,
}

impl Endpoint {
	/// Parses a DSN string.
	pub fn parse(dsn: &str) -> Result<Self> {
		let dsn = dsn.trim();
		let (scheme, rest) = dsn.split_once("://").ok_or(CoreError::MissingScheme)?;
		let protocol: Protocol = scheme.parse()?;

		let (public_key, rest) = rest.split_once('@').ok_or(CoreError::MissingPublicKey)?;
		if public_key.is_empty() {
			return Err(CoreError::MissingPublicKey);
		}

		let slash = rest.find('/').ok_or(CoreError::MissingProjectId)?;
		let (authority, path_and_project) = rest.split_at(slash);
		if authority.is_empty() {
			return Err(CoreError::MissingHost);
		}

		// `path_and_project` always starts with '/', so rfind cannot miss.
		let split = path_and_project.rfind('/').unwrap_or(0) + 1;
		let (path, project_id) = path_and_project.split_at(split);
		if project_id.is_empty() {
			return Err(CoreError::MissingProjectId);
		}

		let (host, port) = match authority.split_once(':') {
			Some((host, port)) => {
				let port = port
					.parse::<u16>()
					.map_err(|_| CoreError::InvalidPort(port.to_string()))?;
				(host, port)
			}
			None => (authority, protocol.default_port()),
		};
		if host.is_empty() {
			return Err(CoreError::MissingHost);
		}

		let request_uri = format!("{path}api/{project_id}/store/");
		let server = format!("{protocol}://{host}:{port}{request_uri}");

		Ok(Self {
			protocol,
			public_key: public_key.to_string(),
			host: host.to_string(),
			port,
			path: path.to_string(),
			project_id: project_id.to_string(),
			request_uri,
			server,
		})
	}

	pub fn protocol(&self) -> Protocol {
		self.protocol
	}

	pub fn public_key(&self) -> &str {
		&self.public_key
	}

	pub fn host(&self) -> &str {
		&self.host
	}

	pub fn port(&self) -> u16 {
		self.port
	}

	/// Path prefix in front of the project id, always ending in `/`.
	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn project_id(&self) -> &str {
		&self.project_id
	}

	/// `{path}api/{project_id}/store/`
	pub fn request_uri(&self) -> &str {
		&self.request_uri
	}

	/// Full store URL without query parameters.
	pub fn server(&self) -> &str {
		&self.server
	}

	/// Store URL carrying the protocol version and public key as query parameters.
	pub fn store_url(&self) -> String {
		format!(
			"{}?sentry_version=7&sentry_key={}",
			self.server, self.public_key
		)
	}
}

impl FromStr for Endpoint {
	type Err = CoreError;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl fmt::Display for Endpoint {
	/// Formats the endpoint back into DSN form with an explicit port.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}://{}@{}:{}{}{}",
			self.protocol, self.public_key, self.host, self.port, self.path, self.project_id
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn parses_https_dsn_with_default_port() {
		let endpoint = Endpoint::parse("https://abc123@o1.ingest.sentry.io/42").unwrap();
		assert_eq!(endpoint.protocol(), Protocol::Https);
		assert_eq!(endpoint.public_key(), "abc123");
		assert_eq!(endpoint.host(), "o1.ingest.sentry.io");
		assert_eq!(endpoint.port(), 443);
		assert_eq!(endpoint.path(), "/");
		assert_eq!(endpoint.project_id(), "42");
		assert_eq!(endpoint.request_uri(), "/api/42/store/");
		assert_eq!(
			endpoint.server(),
			"https://o1.ingest.sentry.io:443/api/42/store/"
		);
	}

	#[test]
	fn parses_http_dsn_with_port_and_path_prefix() {
		let endpoint = Endpoint::parse("http://key@localhost:9000/sentry/7").unwrap();
		assert_eq!(endpoint.port(), 9000);
		assert_eq!(endpoint.path(), "/sentry/");
		assert_eq!(endpoint.request_uri(), "/sentry/api/7/store/");
		assert_eq!(endpoint.server(), "http://localhost:9000/sentry/api/7/store/");
	}

	#[test]
	fn http_defaults_to_port_80() {
		let endpoint = Endpoint::parse("http://key@example.com/1").unwrap();
		assert_eq!(endpoint.port(), 80);
	}

	#[test]
	fn store_url_carries_version_and_key() {
		let endpoint = Endpoint::parse("https://pub@example.com/3").unwrap();
		assert_eq!(
			endpoint.store_url(),
			"https://example.com:443/api/3/store/?sentry_version=7&sentry_key=pub"
		);
	}

	#[test]
	fn rejects_missing_at_sign() {
		assert_eq!(
			Endpoint::parse("https://example.com/1"),
			Err(CoreError::MissingPublicKey)
		);
	}

	#[test]
	fn rejects_missing_project_segment() {
		assert_eq!(
			Endpoint::parse("https://key@example.com/"),
			Err(CoreError::MissingProjectId)
		);
		assert_eq!(
			Endpoint::parse("https://key@example.com"),
			Err(CoreError::MissingProjectId)
		);
	}

	#[test]
	fn rejects_non_numeric_port() {
		assert_eq!(
			Endpoint::parse("https://key@example.com:abc/1"),
			Err(CoreError::InvalidPort("abc".to_string()))
		);
	}

	#[test]
	fn rejects_empty_parts() {
		assert_eq!(Endpoint::parse(""), Err(CoreError::MissingScheme));
		assert_eq!(Endpoint::parse("://key@host/1"), Err(CoreError::MissingScheme));
		assert_eq!(Endpoint::parse("https://@host/1"), Err(CoreError::MissingPublicKey));
		assert_eq!(Endpoint::parse("https://key@/1"), Err(CoreError::MissingHost));
		assert_eq!(Endpoint::parse("https://key@:80/1"), Err(CoreError::MissingHost));
	}

	#[test]
	fn rejects_unknown_protocol() {
		assert_eq!(
			Endpoint::parse("ftp://key@host/1"),
			Err(CoreError::UnsupportedProtocol("ftp".to_string()))
		);
	}

	proptest! {
		#[test]
		fn dsn_roundtrip(
			https in any::<bool>(),
			key in "[a-f0-9]{8,32}",
			host in "[a-z]{1,12}(\\.[a-z]{2,6}){0,2}",
			port in 1u16..=u16::MAX,
			prefix in prop_oneof![Just(String::new()), "[a-z]{1,8}/"],
			project in "[0-9]{1,7}",
		) {
			let protocol = if https { "https" } else { "http" };
			let dsn = format!("{protocol}://{key}@{host}:{port}/{prefix}{project}");
			let endpoint = Endpoint::parse(&dsn).unwrap();

			prop_assert_eq!(endpoint.public_key(), key.as_str());
			prop_assert_eq!(endpoint.host(), host.as_str());
			prop_assert_eq!(endpoint.port(), port);
			prop_assert_eq!(endpoint.project_id(), project.as_str());
			prop_assert_eq!(
				endpoint.server(),
				format!("{protocol}://{host}:{port}/{prefix}api/{project}/store/")
			);
			prop_assert_eq!(endpoint.to_string(), dsn.clone());
			prop_assert_eq!(Endpoint::parse(&endpoint.to_string()).unwrap(), endpoint);
		}
	}
}
