// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Backtrace capture and rendering into traceback text for exception reports.

use rustc_demangle::demangle;
use std::backtrace::Backtrace;

/// A function frame extracted from a backtrace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFrame {
	pub function: String,
	/// Source location from the following `at` line, if any.
	pub location: Option<String>,
	pub in_app: bool,
}

/// Captures the current backtrace and renders it as traceback text.
pub fn capture_traceback() -> String {
	let backtrace = Backtrace::force_capture();
	render_traceback(&parse_backtrace(&format!("{backtrace:#}")))
}

/// Parses `std::backtrace::Backtrace` output into frames.
pub fn parse_backtrace(bt_string: &str) -> Vec<TraceFrame> {
	let mut frames: Vec<TraceFrame> = Vec::new();

	for line in bt_string.lines() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		// Location info belongs to the previous frame
		if let Some(location) = line.strip_prefix("at ") {
			if let Some(last) = frames.last_mut() {
				last.location = Some(location.trim().to_string());
			}
			continue;
		}

		if let Some(frame) = parse_frame_line(line) {
			frames.push(frame);
		}
	}

	frames
}

/// Renders frames one per line, application frames only when there are any.
pub fn render_traceback(frames: &[TraceFrame]) -> String {
	let has_app_frames = frames.iter().any(|f| f.in_app);
	let mut out = String::from("stack backtrace:");
	for frame in frames.iter().filter(|f| f.in_app || !has_app_frames) {
		out.push_str("\n\t");
		out.push_str(&frame.function);
		if let Some(location) = &frame.location {
			out.push_str("\n\t\tat ");
			out.push_str(location);
		}
	}
	out
}

/// Parse a single backtrace line (`"  N: function"` or `"function"`) into a frame.
fn parse_frame_line(line: &str) -> Option<TraceFrame> {
	let function_part = match line.split_once(':') {
		Some((prefix, rest)) if prefix.trim().parse::<u32>().is_ok() => rest.trim(),
		_ => line,
	};

	if function_part.is_empty() {
		return None;
	}

	let function = demangle(function_part).to_string();
	let in_app = is_in_app_frame(&function);
	Some(TraceFrame {
		function,
		location: None,
		in_app,
	})
}

/// Determine if a frame is from application code rather than the runtime.
fn is_in_app_frame(function: &str) -> bool {
	const SYSTEM_PREFIXES: &[&str] = &[
		"std::",
		"core::",
		"alloc::",
		"<std::",
		"<core::",
		"<alloc::",
		"tokio::",
		"<tokio::",
		"futures::",
		"<futures::",
		"tracing::",
		"<tracing::",
		"sentinel_sentry::",
		"<sentinel_sentry::",
		"rust_begin_unwind",
		"rust_panic",
		"__rust_",
		"_rust_",
	];

	const SYSTEM_CONTAINS: &[&str] = &[
		"::panic::",
		"::panicking::",
		"::thread::",
		"::rt::",
		"::runtime::",
		"::sys_common::",
	];

	!SYSTEM_PREFIXES.iter().any(|p| function.starts_with(p))
		&& !SYSTEM_CONTAINS.iter().any(|c| function.contains(c))
}
