// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Process-wide client.
//!
//! [`init`] installs a single [`SentryClient`] for the life of the process.
//! Before that, setters are silently ignored and captures resolve with
//! [`SentryError::NotInitialized`].

use std::sync::{Mutex, OnceLock, PoisonError};

use sentinel_sentry_core::Breadcrumb;

use crate::builder::{ExceptionReport, Message};
use crate::client::{SentryClient, SentryClientBuilder};
use crate::config::Config;
use crate::delivery::Delivery;
use crate::error::{Result, SentryError};

static CLIENT: OnceLock<SentryClient> = OnceLock::new();
/// Held across the build so concurrent calls build at most one client.
static INIT: Mutex<()> = Mutex::new(());

/// Initializes the process-wide client with default collaborators.
pub fn init(config: Config) -> Result<SentryClient> {
	init_with(SentryClient::builder(config))
}

/// Initializes the process-wide client from a configured builder.
///
/// Fails with [`SentryError::AlreadyInitialized`] on a second call; the
/// first client stays in place.
pub fn init_with(builder: SentryClientBuilder) -> Result<SentryClient> {
	let _init = INIT.lock().unwrap_or_else(PoisonError::into_inner);
	if CLIENT.get().is_some() {
		return Err(SentryError::AlreadyInitialized);
	}
	let client = builder.build()?;
	CLIENT
		.set(client.clone())
		.map_err(|_| SentryError::AlreadyInitialized)?;
	Ok(client)
}

/// The process-wide client, once initialized.
pub fn client() -> Option<&'static SentryClient> {
	CLIENT.get()
}

pub fn capture_exception(report: ExceptionReport) -> Delivery {
	match CLIENT.get() {
		Some(client) => client.capture_exception(report),
		None => Delivery::ready(Err(SentryError::NotInitialized)),
	}
}

pub fn capture_message(message: Message) -> Delivery {
	match CLIENT.get() {
		Some(client) => client.capture_message(message),
		None => Delivery::ready(Err(SentryError::NotInitialized)),
	}
}

pub fn add_breadcrumb(breadcrumb: Breadcrumb) {
	if let Some(client) = CLIENT.get() {
		client.add_breadcrumb(breadcrumb);
	}
}

pub fn set_tag(key: impl Into<String>, value: impl ToString) {
	if let Some(client) = CLIENT.get() {
		client.set_tag(key, value);
	}
}

pub fn set_extra(key: impl Into<String>, value: impl ToString) {
	if let Some(client) = CLIENT.get() {
		client.set_extra(key, value);
	}
}
