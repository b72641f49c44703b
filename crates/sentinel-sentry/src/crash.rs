// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Crash dumps left behind by a previous run.
//!
//! The host's crash mechanism persists a dump when the process dies hard. On
//! the next start the client asks its [`CrashStore`] for that dump, reports it
//! as a fatal exception with source `"crash"`, hands it to the hard-crash hook
//! and releases it.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::builder::ExceptionReport;
use crate::client::SentryClient;
use crate::delivery::Delivery;
use crate::error::{Result, SentryError};
use crate::panic_hook::{panic_message, while_reporting};

/// Source label for replayed crash dumps.
pub const CRASH_SOURCE: &str = "crash";
/// Exception type reported for a replayed crash dump.
pub const CRASH_MESSAGE: &str = "hard crash";
/// Extra key carrying the dump's extra data.
pub const CRASH_EXTRA_KEY: &str = "crash.extra_data";

const DUMP_EXTENSION: &str = "crash";

/// What the hard-crash hook receives after a dump has been reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HardCrash {
	pub extra_data: String,
	pub backtrace: String,
}

/// Opaque reference to a persisted dump, valid until released.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrashHandle(String);

impl CrashHandle {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn id(&self) -> &str {
		&self.0
	}
}

/// Access to crash dumps persisted by the host.
pub trait CrashStore: Send + Sync {
	/// Returns the dump left by a previous run, if any.
	fn load_previous(&self) -> Result<Option<CrashHandle>>;

	fn extra_data(&self, handle: &CrashHandle) -> Result<String>;

	fn backtrace(&self, handle: &CrashHandle) -> Result<String>;

	/// Discards the dump so it is not reported again.
	fn release(&self, handle: CrashHandle) -> Result<()>;
}

/// On-disk dump format used by [`FileCrashStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrashDump {
	#[serde(default)]
	pub extra_data: String,
	#[serde(default)]
	pub backtrace: String,
}

/// A directory of `*.crash` JSON dumps, oldest reported first.
#[derive(Debug, Clone)]
pub struct FileCrashStore {
	dir: PathBuf,
}

static DUMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

impl FileCrashStore {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Writes `dump` into the store, creating the directory if needed.
	pub fn persist(&self, dump: &CrashDump) -> Result<PathBuf> {
		fs::create_dir_all(&self.dir)?;
		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map(|d| d.as_nanos())
			.unwrap_or_default();
		let seq = DUMP_SEQUENCE.fetch_add(1, Ordering::Relaxed);
		let path = self
			.dir
			.join(format!("{nanos:024}-{seq:08}.{DUMP_EXTENSION}"));
		fs::write(&path, serde_json::to_vec(dump)?)?;
		Ok(path)
	}

	fn read_dump(&self, handle: &CrashHandle) -> Result<CrashDump> {
		let bytes = fs::read(handle.id())?;
		Ok(serde_json::from_slice(&bytes)?)
	}
}

impl CrashStore for FileCrashStore {
	fn load_previous(&self) -> Result<Option<CrashHandle>> {
		let entries = match fs::read_dir(&self.dir) {
			Ok(entries) => entries,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
			Err(e) => return Err(e.into()),
		};

		let mut dumps = Vec::new();
		for entry in entries {
			let path = entry?.path();
			if path.extension().is_some_and(|ext| ext == DUMP_EXTENSION) && path.is_file() {
				dumps.push(path);
			}
		}
		dumps.sort();

		Ok(dumps
			.into_iter()
			.next()
			.map(|path| CrashHandle::new(path.to_string_lossy())))
	}

	fn extra_data(&self, handle: &CrashHandle) -> Result<String> {
		Ok(self.read_dump(handle)?.extra_data)
	}

	fn backtrace(&self, handle: &CrashHandle) -> Result<String> {
		Ok(self.read_dump(handle)?.backtrace)
	}

	fn release(&self, handle: CrashHandle) -> Result<()> {
		fs::remove_file(handle.id())?;
		Ok(())
	}
}

/// Reports the dump left by a previous run, if any.
///
/// Nothing here propagates: store failures are logged, unreadable fields are
/// reported empty, and a panicking hook is caught.
pub(crate) fn replay_previous_crash(
	client: &SentryClient,
	store: &dyn CrashStore,
) -> Option<Delivery> {
	let outcome =
		while_reporting(|| panic::catch_unwind(AssertUnwindSafe(|| replay(client, store))));
	match outcome {
		Ok(delivery) => delivery,
		Err(payload) => {
			let fault = SentryError::HandlerFault(panic_message(payload.as_ref()));
			error!(error = %fault, "Crash replay failed");
			None
		}
	}
}

/// Runs one step of the replay, turning a panic into [`SentryError::HandlerFault`].
fn isolated<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
	panic::catch_unwind(AssertUnwindSafe(f))
		.unwrap_or_else(|payload| Err(SentryError::HandlerFault(panic_message(payload.as_ref()))))
}

fn replay(client: &SentryClient, store: &dyn CrashStore) -> Option<Delivery> {
	let handle = match isolated(|| store.load_previous()) {
		Ok(Some(handle)) => handle,
		Ok(None) => return None,
		Err(e) => {
			error!(error = %e, "Failed to look up previous crash dump");
			return None;
		}
	};

	let debug = client.config().debug;
	if debug {
		info!(crash = %handle.id(), "Found crash dump from previous run");
	}

	let crash = HardCrash {
		extra_data: isolated(|| store.extra_data(&handle)).unwrap_or_else(|e| {
			error!(crash = %handle.id(), error = %e, "Failed to read crash extra data");
			String::new()
		}),
		backtrace: isolated(|| store.backtrace(&handle)).unwrap_or_else(|e| {
			error!(crash = %handle.id(), error = %e, "Failed to read crash backtrace");
			String::new()
		}),
	};

	let report = ExceptionReport::new(CRASH_MESSAGE)
		.source(CRASH_SOURCE)
		.traceback(crash.backtrace.clone())
		.fatal(true)
		.extra(CRASH_EXTRA_KEY, &crash.extra_data);
	let delivery = isolated(|| Ok(client.capture_exception(report))).unwrap_or_else(|e| {
		error!(crash = %handle.id(), error = %e, "Failed to report crash dump");
		Delivery::ready(Err(e))
	});

	if let Some(hook) = client.config().on_hard_crash.clone() {
		if let Err(e) = isolated(|| {
			hook(&crash);
			Ok(())
		}) {
			error!(error = %e, "Hard crash hook failed");
		}
	}

	let id = handle.id().to_string();
	if let Err(e) = isolated(|| store.release(handle)) {
		error!(crash = %id, error = %e, "Failed to release crash dump");
	}

	Some(delivery)
}
