// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for the sentinel Sentry client.
//!
//! This crate provides a pre-configured HTTP client builder carrying the SDK
//! `User-Agent` header, plus a bare builder for hosts (browsers) that set
//! their own.

mod client;

pub use client::{bare_builder, builder, client_with_timeout, user_agent, SDK_NAME, SDK_VERSION};
