// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Completion handle for a dispatched event.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::{Result, SentryError};

/// Resolves exactly once with the server-assigned event id or an error.
///
/// Results known at dispatch time (throttling, dry run, missing runtime) are
/// available immediately through [`Delivery::try_result`].
#[must_use = "a Delivery does nothing unless awaited; drop it to ignore the result"]
#[derive(Debug)]
pub struct Delivery {
	state: State,
}

#[derive(Debug)]
enum State {
	Ready(Option<Result<String>>),
	Pending(oneshot::Receiver<Result<String>>),
}

/// Sending half of a pending [`Delivery`].
#[derive(Debug)]
pub(crate) struct Completion {
	tx: oneshot::Sender<Result<String>>,
}

impl Completion {
	pub(crate) fn complete(self, result: Result<String>) {
		// The receiver may have been dropped by a caller that ignores results.
		let _ = self.tx.send(result);
	}
}

impl Delivery {
	pub(crate) fn ready(result: Result<String>) -> Self {
		Self {
			state: State::Ready(Some(result)),
		}
	}

	pub(crate) fn pending() -> (Completion, Self) {
		let (tx, rx) = oneshot::channel();
		(
			Completion { tx },
			Self {
				state: State::Pending(rx),
			},
		)
	}

	/// Takes the result if it is already known, without waiting.
	pub fn try_result(&mut self) -> Option<Result<String>> {
		match &mut self.state {
			State::Ready(result) => result.take(),
			State::Pending(rx) => match rx.try_recv() {
				Ok(result) => {
					self.state = State::Ready(None);
					Some(result)
				}
				Err(oneshot::error::TryRecvError::Empty) => None,
				Err(oneshot::error::TryRecvError::Closed) => {
					self.state = State::Ready(None);
					Some(Err(SentryError::Dropped))
				}
			},
		}
	}

	/// Invokes `callback` with the result.
	///
	/// A result that is already known is handed over before this returns;
	/// otherwise the callback runs on a task spawned on the current runtime.
	pub fn on_complete<F>(mut self, callback: F)
	where
		F: FnOnce(Result<String>) + Send + 'static,
	{
		if let Some(result) = self.try_result() {
			callback(result);
			return;
		}
		match tokio::runtime::Handle::try_current() {
			Ok(handle) => {
				handle.spawn(async move {
					callback(self.await);
				});
			}
			Err(_) => callback(Err(SentryError::NoRuntime)),
		}
	}
}

impl Future for Delivery {
	type Output = Result<String>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let this = self.get_mut();
		match &mut this.state {
			State::Ready(result) => Poll::Ready(result.take().unwrap_or(Err(SentryError::Dropped))),
			State::Pending(rx) => match Pin::new(rx).poll(cx) {
				Poll::Ready(result) => {
					this.state = State::Ready(None);
					Poll::Ready(result.unwrap_or(Err(SentryError::Dropped)))
				}
				Poll::Pending => Poll::Pending,
			},
		}
	}
}
