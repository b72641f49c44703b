// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Event identifier generation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

/// Length of a generated event id in hex characters.
pub const EVENT_ID_LEN: usize = 32;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generates a 32 character lowercase hex id suitable for `event_id`.
///
/// The seed mixes the current time, a per-process sequence number and a random
/// value. Collisions within one process run are not expected.
pub fn generate_event_id() -> String {
	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_nanos())
		.unwrap_or_default();
	let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);

	let mut id = digest_hex(&[
		&nanos.to_le_bytes(),
		&sequence.to_le_bytes(),
		&fastrand::u64(..).to_le_bytes(),
	]);
	while id.len() < EVENT_ID_LEN {
		id.push_str(&digest_hex(&[&fastrand::u64(..).to_le_bytes()]));
	}
	id.truncate(EVENT_ID_LEN);
	id
}

fn digest_hex(parts: &[&[u8]]) -> String {
	let mut hasher = Sha256::new();
	for part in parts {
		hasher.update(part);
	}
	hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	fn is_lower_hex(id: &str) -> bool {
		id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
	}

	#[test]
	fn ids_are_32_lowercase_hex_and_distinct() {
		let ids: Vec<String> = (0..10_000).map(|_| generate_event_id()).collect();

		for id in &ids {
			assert_eq!(id.len(), EVENT_ID_LEN, "bad length: {id}");
			assert!(is_lower_hex(id), "not lowercase hex: {id}");
		}

		let unique: HashSet<&String> = ids.iter().collect();
		assert_eq!(unique.len(), ids.len());
	}

	#[test]
	fn ids_are_distinct_across_threads() {
		let handles: Vec<_> = (0..4)
			.map(|_| std::thread::spawn(|| (0..500).map(|_| generate_event_id()).collect::<Vec<_>>()))
			.collect();

		let mut unique = HashSet::new();
		for handle in handles {
			for id in handle.join().unwrap() {
				assert!(unique.insert(id));
			}
		}
		assert_eq!(unique.len(), 2000);
	}
}
