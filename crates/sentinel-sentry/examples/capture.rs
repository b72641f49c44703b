// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: Capture a message and an exception using the sentinel-sentry SDK.
//!
//! Run with:
//!   SENTINEL_DSN=https://key@sentry.example.com/42 cargo run --example capture -p sentinel-sentry
//!
//! Set `SENTINEL_DRY_RUN=1` to skip the network and `RUST_LOG=info` with
//! `SENTINEL_DEBUG=1` to see every step.

use sentinel_sentry::{Breadcrumb, Config, ExceptionReport, Level, Message, User};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let config = Config::from_env()?;
	tracing::info!(dsn = %config.dsn, dry_run = config.dry_run, "Initializing Sentry client");

	let client = sentinel_sentry::init(config)?;
	client.set_user(User::with_id("user_example_123"));

	sentinel_sentry::set_tag("example", "true");
	sentinel_sentry::set_extra("build", env!("CARGO_PKG_VERSION"));

	sentinel_sentry::add_breadcrumb(Breadcrumb::new("startup", "Application started"));
	sentinel_sentry::add_breadcrumb(
		Breadcrumb::new("http", "GET /api/data failed")
			.level(Level::Warning)
			.data("status", 503),
	);

	let id = sentinel_sentry::capture_message(
		Message::new("Example message from sentinel-sentry").level(Level::Warning),
	)
	.await?;
	tracing::info!(event_id = %id, "Message captured");

	match sentinel_sentry::capture_exception(
		ExceptionReport::new("ExampleError")
			.source("example")
			.traceback(sentinel_sentry::capture_traceback())
			.tag("component", "capture-example"),
	)
	.await
	{
		Ok(id) => tracing::info!(event_id = %id, "Exception captured"),
		Err(e) if e.is_throttled() => tracing::warn!("Exception dropped by rate limiter"),
		Err(e) => return Err(e.into()),
	}

	Ok(())
}
