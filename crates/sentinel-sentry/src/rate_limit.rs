// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sliding-window limiter gating outbound events.
//!
//! Every capture attempt records one timestamp. Once the window holds more
//! than [`WINDOW_CAPACITY`] entries, a new attempt is accepted only if the
//! oldest entry has aged past [`WINDOW_SPAN`].

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Number of timestamps kept before the limiter starts evicting.
pub const WINDOW_CAPACITY: usize = 10;

/// Age after which the oldest timestamp no longer blocks new sends.
pub const WINDOW_SPAN: Duration = Duration::from_secs(300);

/// Source of the current time for the limiter.
pub trait Clock: Send + Sync {
	fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> Instant {
		Instant::now()
	}
}

/// Manually advanced clock for tests and simulations.
#[derive(Debug, Clone)]
pub struct TestClock {
	origin: Instant,
	offset: Arc<Mutex<Duration>>,
}

impl Default for TestClock {
	fn default() -> Self {
		Self::new()
	}
}

impl TestClock {
	pub fn new() -> Self {
		Self {
			origin: Instant::now(),
			offset: Arc::new(Mutex::new(Duration::ZERO)),
		}
	}

	/// Moves the clock forward. Clones share the same offset.
	pub fn advance(&self, by: Duration) {
		let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
		*offset += by;
	}
}

impl Clock for TestClock {
	fn now(&self) -> Instant {
		self.origin + *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

/// Window of recent send attempts.
pub struct RateLimiter {
	window: VecDeque<Instant>,
	clock: Arc<dyn Clock>,
}

impl Default for RateLimiter {
	fn default() -> Self {
		Self::new(Arc::new(SystemClock))
	}
}

impl RateLimiter {
	pub fn new(clock: Arc<dyn Clock>) -> Self {
		Self {
			window: VecDeque::with_capacity(WINDOW_CAPACITY + 1),
			clock,
		}
	}

	/// Records a send attempt and reports whether it may proceed.
	pub fn offer(&mut self) -> bool {
		let now = self.clock.now();
		self.window.push_back(now);

		if self.window.len() > WINDOW_CAPACITY {
			let oldest = self.window[0];
			if now.saturating_duration_since(oldest) < WINDOW_SPAN {
				self.window.pop_back();
				return false;
			}
			self.window.pop_front();
		}
		true
	}

	/// Number of attempts currently remembered.
	pub fn len(&self) -> usize {
		self.window.len()
	}

	pub fn is_empty(&self) -> bool {
		self.window.is_empty()
	}
}
