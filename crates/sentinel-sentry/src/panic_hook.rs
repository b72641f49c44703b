// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Panic hook integration for automatic error reporting.

use std::any::Any;
use std::cell::Cell;
use std::panic::PanicHookInfo;

use crate::backtrace::capture_traceback;
use crate::client::SentryClient;

/// Source label for reports raised by the panic hook.
pub const PANIC_SOURCE: &str = "panic";

thread_local! {
	/// Set while this thread is inside the reporting path.
	static REPORTING: Cell<bool> = const { Cell::new(false) };
}

/// Runs `f` with the reporting guard set on this thread.
///
/// A panic raised inside `f` is not reported again by the panic hook, so it
/// unwinds to the caller's `catch_unwind` instead of re-entering the client.
pub(crate) fn while_reporting<R>(f: impl FnOnce() -> R) -> R {
	struct Restore(bool);

	impl Drop for Restore {
		fn drop(&mut self) {
			REPORTING.with(|flag| flag.set(self.0));
		}
	}

	let _restore = Restore(REPORTING.with(|flag| flag.replace(true)));
	f()
}

/// Whether this thread is inside the reporting path.
pub(crate) fn is_reporting() -> bool {
	REPORTING.with(Cell::get)
}

/// Install a panic hook that reports panics through `client`.
///
/// The previously installed hook still runs afterwards. Panics raised by the
/// reporting path itself are only passed on to the previous hook.
pub fn install_panic_hook(client: SentryClient) {
	let previous = std::panic::take_hook();

	std::panic::set_hook(Box::new(move |info| {
		if !is_reporting() {
			report_panic(&client, info);
		}
		previous(info);
	}));
}

fn report_panic(client: &SentryClient, info: &PanicHookInfo<'_>) {
	let message = panic_message(info.payload());
	let mut traceback = match info.location() {
		Some(l) => format!("panicked at {}:{}:{}\n", l.file(), l.line(), l.column()),
		None => String::new(),
	};
	traceback.push_str(&capture_traceback());

	// Nothing to wait for: the send runs on its own task, if at all.
	drop(client.handle_error(PANIC_SOURCE, message, traceback));
}

/// Extract the message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		s.to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"Box<dyn Any>".to_string()
	}
}
