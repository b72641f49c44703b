// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the sentinel Sentry client.
//!
//! This crate holds the pieces of the event pipeline that need no I/O:
//! - DSN parsing into a validated [`Endpoint`]
//! - Event id generation
//! - The [`Event`] envelope and its context blocks
//! - Breadcrumbs and the bounded [`BreadcrumbTrail`]
//!
//! The client SDK (`sentinel-sentry`) builds on these types.

pub mod breadcrumb;
pub mod context;
pub mod dsn;
pub mod error;
pub mod event;
pub mod event_id;
pub mod level;

pub use breadcrumb::{Breadcrumb, BreadcrumbTrail, MAX_BREADCRUMBS};
pub use context::{Contexts, OsContext, RequestContext, User};
pub use dsn::{Endpoint, Protocol};
pub use error::{CoreError, Result};
pub use event::{Event, ExceptionBlock};
pub use event_id::{generate_event_id, EVENT_ID_LEN};
pub use level::Level;
