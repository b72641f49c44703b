// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sentry client for capturing and reporting errors and messages.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use sentinel_sentry_core::{Breadcrumb, BreadcrumbTrail, Endpoint, User, MAX_BREADCRUMBS};
use tracing::{error, info};

use crate::builder::{EventBuilder, EventKind, ExceptionReport, Message, Scope};
use crate::config::Config;
use crate::crash::{replay_previous_crash, CrashStore};
use crate::delivery::Delivery;
use crate::error::{Result, SentryError};
use crate::panic_hook::{install_panic_hook, panic_message, while_reporting};
use crate::platform::{NativeContext, PlatformContext};
use crate::rate_limit::{Clock, RateLimiter, SystemClock};
use crate::transport::{dispatch, HttpTransport, Transport};

/// Builder for constructing a [`SentryClient`].
///
/// Defaults: [`NativeContext::detect`], an [`HttpTransport`] for the DSN, the
/// system clock, no crash store, and the panic hook installed.
pub struct SentryClientBuilder {
	config: Config,
	platform: Option<Box<dyn PlatformContext>>,
	transport: Option<Arc<dyn Transport>>,
	crash_store: Option<Box<dyn CrashStore>>,
	clock: Option<Arc<dyn Clock>>,
	install_panic_hook: bool,
}

impl SentryClientBuilder {
	pub fn new(config: Config) -> Self {
		Self {
			config,
			platform: None,
			transport: None,
			crash_store: None,
			clock: None,
			install_panic_hook: true,
		}
	}

	/// Sets the environment context attached to every event.
	pub fn platform(mut self, platform: impl PlatformContext + 'static) -> Self {
		self.platform = Some(Box::new(platform));
		self
	}

	/// Replaces the HTTP transport.
	pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
		self.transport = Some(transport);
		self
	}

	/// Store checked for a crash dump from a previous run at build time.
	pub fn crash_store(mut self, store: impl CrashStore + 'static) -> Self {
		self.crash_store = Some(Box::new(store));
		self
	}

	/// Clock driving the rate limiter window.
	pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = Some(clock);
		self
	}

	/// Whether to install the process-wide panic hook (default: true).
	pub fn install_panic_hook(mut self, install: bool) -> Self {
		self.install_panic_hook = install;
		self
	}

	/// Builds the client.
	///
	/// Fails only on an invalid DSN or an HTTP client that cannot be built.
	/// After the client is ready the panic hook is installed and any crash
	/// dump left by a previous run is reported.
	pub fn build(self) -> Result<SentryClient> {
		let endpoint = Endpoint::parse(&self.config.dsn)?;
		let platform = self
			.platform
			.unwrap_or_else(|| Box::new(NativeContext::detect()));
		let transport = match self.transport {
			Some(transport) => transport,
			None => Arc::new(HttpTransport::new(
				&endpoint,
				self.config.send_timeout,
				!platform.is_browser(),
			)?),
		};
		let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));

		let debug = self.config.debug;
		let client = SentryClient {
			inner: Arc::new(ClientInner {
				scope: RwLock::new(Scope::from_config(&self.config)),
				breadcrumbs: Mutex::new(BreadcrumbTrail::new(MAX_BREADCRUMBS)),
				limiter: Mutex::new(RateLimiter::new(clock)),
				config: self.config,
				endpoint,
				platform,
				transport,
			}),
		};

		if debug {
			info!(
				server = %client.inner.endpoint.server(),
				project_id = %client.inner.endpoint.project_id(),
				dry_run = client.inner.config.dry_run,
				gameanalytics = client.inner.config.gameanalytics,
				"Sentry client initialized"
			);
		}

		if self.install_panic_hook {
			install_panic_hook(client.clone());
			if debug {
				info!("Panic hook installed");
			}
		}

		if let Some(store) = self.crash_store {
			if let Some(delivery) = replay_previous_crash(&client, store.as_ref()) {
				delivery.on_complete(move |result| {
					if debug {
						match result {
							Ok(id) => info!(event_id = %id, "Previous crash reported"),
							Err(e) => info!(error = %e, "Previous crash not reported"),
						}
					}
				});
			}
		}

		Ok(client)
	}
}

/// Internal client state.
struct ClientInner {
	config: Config,
	endpoint: Endpoint,
	platform: Box<dyn PlatformContext>,
	transport: Arc<dyn Transport>,
	limiter: Mutex<RateLimiter>,
	scope: RwLock<Scope>,
	breadcrumbs: Mutex<BreadcrumbTrail>,
}

/// Client for reporting exceptions and messages to a Sentry endpoint.
///
/// Cloning is cheap; clones share tags, breadcrumbs and the rate limiter.
///
/// # Example
///
/// ```ignore
/// use sentinel_sentry::{Breadcrumb, Config, ExceptionReport, Level, Message, SentryClient};
///
/// let client = SentryClient::init(
///     Config::builder("https://key@sentry.example.com/42")
///         .release("1.0.0")
///         .environment("production")
///         .build(),
/// )?;
///
/// client.set_tag("server", "web-01");
/// client.add_breadcrumb(Breadcrumb::new("startup", "Application started"));
///
/// let id = client
///     .capture_message(Message::new("level loaded").level(Level::Info))
///     .await?;
///
/// if let Err(e) = load_save() {
///     client
///         .capture_exception(ExceptionReport::new("LoadError").traceback(e.to_string()))
///         .on_complete(|result| println!("reported: {result:?}"));
/// }
/// ```
#[derive(Clone)]
pub struct SentryClient {
	inner: Arc<ClientInner>,
}

impl SentryClient {
	/// Creates a builder for the given configuration.
	pub fn builder(config: Config) -> SentryClientBuilder {
		SentryClientBuilder::new(config)
	}

	/// Builds a client with default collaborators.
	pub fn init(config: Config) -> Result<Self> {
		Self::builder(config).build()
	}

	pub fn config(&self) -> &Config {
		&self.inner.config
	}

	pub fn endpoint(&self) -> &Endpoint {
		&self.inner.endpoint
	}

	/// Reports an exception. Level is `fatal` for fatal reports, else `error`.
	pub fn capture_exception(&self, report: ExceptionReport) -> Delivery {
		self.capture(EventKind::Exception(report))
	}

	/// Reports a message. Level defaults to `info`.
	pub fn capture_message(&self, message: Message) -> Delivery {
		self.capture(EventKind::Message(message))
	}

	/// Reports a (source, message, traceback) triple from an error hook.
	///
	/// Any fault while reporting is logged and returned through the delivery;
	/// the soft-crash hook runs either way.
	pub fn handle_error(
		&self,
		source: impl Into<String>,
		message: impl Into<String>,
		traceback: impl Into<String>,
	) -> Delivery {
		let report = ExceptionReport::from_triple(source, message, traceback);

		while_reporting(|| {
			let delivery = match panic::catch_unwind(AssertUnwindSafe(|| {
				self.capture_exception(report.clone())
			})) {
				Ok(delivery) => delivery,
				Err(payload) => {
					let fault = SentryError::HandlerFault(panic_message(payload.as_ref()));
					error!(error = %fault, "Failed to report error");
					Delivery::ready(Err(fault))
				}
			};

			if let Some(hook) = &self.inner.config.on_soft_crash {
				if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| hook(&report))) {
					let fault = SentryError::HandlerFault(panic_message(payload.as_ref()));
					error!(error = %fault, "Soft crash hook failed");
				}
			}

			delivery
		})
	}

	/// Records a breadcrumb, stamping it with the current time.
	pub fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
		self.inner
			.breadcrumbs
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.push(breadcrumb);
	}

	pub fn clear_breadcrumbs(&self) {
		self.inner
			.breadcrumbs
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.clear();
	}

	/// Sets a tag sent with every subsequent event.
	pub fn set_tag(&self, key: impl Into<String>, value: impl ToString) {
		self.write_scope(|scope| {
			scope.tags.insert(key.into(), value.to_string());
		});
	}

	pub fn remove_tag(&self, key: &str) {
		self.write_scope(|scope| {
			scope.tags.remove(key);
		});
	}

	/// Sets an extra value sent with every subsequent event.
	pub fn set_extra(&self, key: impl Into<String>, value: impl ToString) {
		self.write_scope(|scope| {
			scope.extra.insert(key.into(), value.to_string());
		});
	}

	pub fn set_user(&self, user: User) {
		self.write_scope(|scope| scope.user = Some(user));
	}

	pub fn clear_user(&self) {
		self.write_scope(|scope| scope.user = None);
	}

	fn write_scope(&self, f: impl FnOnce(&mut Scope)) {
		let mut scope = self
			.inner
			.scope
			.write()
			.unwrap_or_else(PoisonError::into_inner);
		f(&mut scope);
	}

	/// Builds and dispatches one event. A fault anywhere on the way resolves
	/// the delivery with [`SentryError::HandlerFault`].
	fn capture(&self, kind: EventKind) -> Delivery {
		while_reporting(|| {
			panic::catch_unwind(AssertUnwindSafe(|| self.build_and_dispatch(kind))).unwrap_or_else(
				|payload| {
					let fault = SentryError::HandlerFault(panic_message(payload.as_ref()));
					error!(error = %fault, "Failed to capture event");
					Delivery::ready(Err(fault))
				},
			)
		})
	}

	fn build_and_dispatch(&self, kind: EventKind) -> Delivery {
		let inner = &self.inner;
		let accepted = inner
			.limiter
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.offer();
		if !accepted {
			if inner.config.debug {
				info!("Event throttled by rate limiter");
			}
			return Delivery::ready(Err(SentryError::Throttled));
		}

		let breadcrumbs = inner
			.breadcrumbs
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.snapshot();
		let event = {
			let scope = inner.scope.read().unwrap_or_else(PoisonError::into_inner);
			EventBuilder::new(&inner.config, inner.platform.as_ref()).build(kind, &scope, breadcrumbs)
		};

		dispatch(&inner.transport, event, &inner.config)
	}
}
