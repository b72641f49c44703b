// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Delivery of events to the store endpoint.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use sentinel_sentry_core::{Endpoint, Event};
use serde::Deserialize;
use tracing::info;

use crate::config::Config;
use crate::delivery::Delivery;
use crate::error::{Result, SentryError};

/// Event id reported for sends skipped in dry-run mode.
pub const DRY_RUN_ID: &str = "(dry run)";

/// Sends a single serialized event and returns the server-assigned id.
#[async_trait]
pub trait Transport: Send + Sync {
	async fn send(&self, event: &Event) -> Result<String>;
}

/// Response body of the store endpoint.
#[derive(Debug, Deserialize)]
struct StoreResponse {
	id: String,
}

/// Transport posting JSON events over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: Client,
	url: String,
}

impl HttpTransport {
	/// Builds a transport for `endpoint`.
	///
	/// `send_user_agent` is false on browser targets, which set their own header.
	pub fn new(endpoint: &Endpoint, timeout: Duration, send_user_agent: bool) -> Result<Self> {
		let client = sentinel_common_http::client_with_timeout(timeout, send_user_agent)?;
		Ok(Self {
			client,
			url: endpoint.store_url(),
		})
	}

	/// `{server}?sentry_version=7&sentry_key={public_key}`
	pub fn url(&self) -> &str {
		&self.url
	}
}

#[async_trait]
impl Transport for HttpTransport {
	async fn send(&self, event: &Event) -> Result<String> {
		let body = serde_json::to_vec(event)?;

		let response = self
			.client
			.post(&self.url)
			.header(CONTENT_TYPE, "application/json")
			.body(body)
			.send()
			.await?;

		let status = response.status();
		if status != StatusCode::OK {
			return Err(SentryError::Status(status.as_u16()));
		}

		let bytes = response.bytes().await?;
		let decoded: StoreResponse =
			serde_json::from_slice(&bytes).map_err(|e| SentryError::Decode(e.to_string()))?;
		Ok(decoded.id)
	}
}

/// Hands `event` to `transport` and returns its completion handle.
///
/// In dry-run mode the network is skipped and the handle is already resolved
/// with [`DRY_RUN_ID`]. Real sends run on a task spawned on the current tokio
/// runtime; without one the handle resolves with [`SentryError::NoRuntime`].
pub fn dispatch(transport: &Arc<dyn Transport>, event: Event, config: &Config) -> Delivery {
	let debug = config.debug;
	if debug {
		match serde_json::to_string(&event) {
			Ok(payload) => info!(event_id = %event.event_id, payload = %payload, "Sending event"),
			Err(e) => info!(event_id = %event.event_id, error = %e, "Event payload is not serializable"),
		}
	}

	if config.dry_run {
		if debug {
			info!(event_id = %event.event_id, "Dry run, event not sent");
		}
		return Delivery::ready(Ok(DRY_RUN_ID.to_string()));
	}

	let handle = match tokio::runtime::Handle::try_current() {
		Ok(handle) => handle,
		Err(_) => return Delivery::ready(Err(SentryError::NoRuntime)),
	};

	let (completion, delivery) = Delivery::pending();
	let transport = Arc::clone(transport);
	handle.spawn(async move {
		let result = transport.send(&event).await;
		if debug {
			match &result {
				Ok(id) => info!(event_id = %id, "Event sent"),
				Err(e) => info!(event_id = %event.event_id, error = %e, "Event send failed"),
			}
		}
		completion.complete(result);
	});
	delivery
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::builder::{EventBuilder, EventKind, Message, Scope};
	use crate::platform::NativeContext;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use wiremock::matchers::{body_partial_json, header, method, path, query_param};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	struct CountingTransport {
		calls: AtomicUsize,
	}

	#[async_trait]
	impl Transport for CountingTransport {
		async fn send(&self, event: &Event) -> Result<String> {
			self.calls.fetch_add(1, Ordering::SeqCst);
			Ok(event.event_id.clone())
		}
	}

	fn event(config: &Config) -> Event {
		let platform = NativeContext::detect();
		EventBuilder::new(config, &platform).build(
			EventKind::Message(Message::new("hi")),
			&Scope::from_config(config),
			Vec::new(),
		)
	}

	fn endpoint_for(server: &MockServer) -> Endpoint {
		let addr = server.address();
		Endpoint::parse(&format!("http://public@{}:{}/5", addr.ip(), addr.port())).unwrap()
	}

	#[test]
	fn dry_run_resolves_without_network_or_runtime() {
		let config = Config::builder("https://key@example.com/1").dry_run(true).build();
		let counting = Arc::new(CountingTransport {
			calls: AtomicUsize::new(0),
		});
		let transport: Arc<dyn Transport> = counting.clone();

		let mut delivery = dispatch(&transport, event(&config), &config);

		assert_eq!(delivery.try_result().unwrap().unwrap(), DRY_RUN_ID);
		assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn real_send_without_runtime_fails_fast() {
		let config = Config::builder("https://key@example.com/1").build();
		let transport: Arc<dyn Transport> = Arc::new(CountingTransport {
			calls: AtomicUsize::new(0),
		});
		let mut delivery = dispatch(&transport, event(&config), &config);
		assert!(matches!(delivery.try_result(), Some(Err(SentryError::NoRuntime))));
	}

	#[tokio::test]
	async fn dispatch_runs_transport_on_runtime() {
		let config = Config::builder("https://key@example.com/1").build();
		let transport: Arc<dyn Transport> = Arc::new(CountingTransport {
			calls: AtomicUsize::new(0),
		});
		let event = event(&config);
		let expected = event.event_id.clone();

		let id = dispatch(&transport, event, &config).await.unwrap();
		assert_eq!(id, expected);
	}

	#[test]
	fn transport_url_includes_version_and_key() {
		let endpoint = Endpoint::parse("https://pub@example.com/9").unwrap();
		let transport = HttpTransport::new(&endpoint, Duration::from_secs(30), true).unwrap();
		assert_eq!(
			transport.url(),
			"https://example.com:443/api/9/store/?sentry_version=7&sentry_key=pub"
		);
	}

	#[tokio::test]
	async fn posts_json_and_returns_server_id() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.and(path("/api/5/store/"))
			.and(query_param("sentry_version", "7"))
			.and(query_param("sentry_key", "public"))
			.and(header("content-type", "application/json"))
			.and(header("user-agent", sentinel_common_http::user_agent().as_str()))
			.and(body_partial_json(serde_json::json!({ "message": "hi", "level": "info" })))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "srv-123" })))
			.expect(1)
			.mount(&server)
			.await;

		let config = Config::builder("https://key@example.com/1").build();
		let transport = HttpTransport::new(&endpoint_for(&server), Duration::from_secs(5), true).unwrap();

		let id = transport.send(&event(&config)).await.unwrap();
		assert_eq!(id, "srv-123");
	}

	#[tokio::test]
	async fn non_200_status_is_reported() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(429))
			.mount(&server)
			.await;

		let config = Config::builder("https://key@example.com/1").build();
		let transport = HttpTransport::new(&endpoint_for(&server), Duration::from_secs(5), true).unwrap();

		let err = transport.send(&event(&config)).await.unwrap_err();
		assert!(matches!(err, SentryError::Status(429)));
		assert_eq!(err.to_string(), "response status 429");
	}

	#[tokio::test]
	async fn undecodable_body_is_a_decode_error() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(ResponseTemplate::new(200).set_body_string("not json"))
			.mount(&server)
			.await;

		let config = Config::builder("https://key@example.com/1").build();
		let transport = HttpTransport::new(&endpoint_for(&server), Duration::from_secs(5), true).unwrap();

		let err = transport.send(&event(&config)).await.unwrap_err();
		assert!(matches!(err, SentryError::Decode(_)));
		assert!(err.to_string().starts_with("decode error: "));
	}

	#[tokio::test]
	async fn timeout_surfaces_as_request_failure() {
		let server = MockServer::start().await;
		Mock::given(method("POST"))
			.respond_with(
				ResponseTemplate::new(200)
					.set_body_json(serde_json::json!({ "id": "late" }))
					.set_delay(Duration::from_secs(2)),
			)
			.mount(&server)
			.await;

		let config = Config::builder("https://key@example.com/1").build();
		let transport =
			HttpTransport::new(&endpoint_for(&server), Duration::from_millis(100), true).unwrap();

		let err = transport.send(&event(&config)).await.unwrap_err();
		assert!(matches!(err, SentryError::Request(_)));
		assert!(err.is_transport_failure());
	}
}
