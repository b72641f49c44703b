// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sentry reporting SDK.
//!
//! Captures exceptions and messages, enriches them with environment context,
//! rate-limits outbound traffic and delivers them to a Sentry store endpoint
//! identified by a DSN.
//!
//! # Quick Start
//!
//! ```ignore
//! use sentinel_sentry::{Breadcrumb, Config, ExceptionReport, Level, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     sentinel_sentry::init(
//!         Config::builder("https://public_key@sentry.example.com/42")
//!             .release(env!("CARGO_PKG_VERSION"))
//!             .environment("production")
//!             .tag("server", "web-01")
//!             .build(),
//!     )?;
//!
//!     sentinel_sentry::add_breadcrumb(Breadcrumb::new("startup", "Application started"));
//!
//!     let id = sentinel_sentry::capture_message(Message::new("ready").level(Level::Info)).await?;
//!     println!("reported {id}");
//!
//!     sentinel_sentry::capture_exception(
//!         ExceptionReport::new("SaveFailed").traceback("save.rs:41"),
//!     )
//!     .on_complete(|result| println!("{result:?}"));
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - **Panic Hook**: panics are reported with a demangled backtrace
//! - **Crash Replay**: a dump persisted by a previous run is reported on startup
//! - **Breadcrumbs**: the last 10 are attached to every event
//! - **Rate Limiting**: at most 10 events per 300 seconds
//! - **Dry Run**: every step except the network request

mod backtrace;
mod builder;
mod client;
mod config;
mod crash;
mod delivery;
mod error;
mod global;
mod panic_hook;
mod platform;
mod rate_limit;
mod transport;

pub use backtrace::{capture_traceback, parse_backtrace, render_traceback, TraceFrame};
pub use builder::{EventBuilder, EventKind, ExceptionReport, Message, Scope, LOGGER, PLATFORM};
pub use client::{SentryClient, SentryClientBuilder};
pub use config::{Config, ConfigBuilder, HardCrashHook, SoftCrashHook, DEFAULT_SEND_TIMEOUT};
pub use crash::{CrashDump, CrashHandle, CrashStore, FileCrashStore, HardCrash};
pub use delivery::Delivery;
pub use error::{Result, SentryError};
pub use global::{
	add_breadcrumb, capture_exception, capture_message, client, init, init_with, set_extra,
	set_tag,
};
pub use panic_hook::PANIC_SOURCE;
pub use platform::{BrowserContext, EnvironmentInfo, NativeContext, PlatformContext};
pub use rate_limit::{Clock, RateLimiter, SystemClock, TestClock, WINDOW_CAPACITY, WINDOW_SPAN};
pub use transport::{HttpTransport, Transport, DRY_RUN_ID};

// Re-export core types for convenience
pub use sentinel_sentry_core::{
	Breadcrumb, CoreError, Endpoint, Event, Level, OsContext, Protocol, RequestContext, User,
};
