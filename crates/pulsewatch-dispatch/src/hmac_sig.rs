// Copyright (c) 2026 Pulsewatch Authors. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request signing for the dispatch poll/report protocol (§6.2).
//!
//! The signed string is `<timestamp> LF <worker_id> LF <method> LF <path> LF
//! <raw_body>`, HMAC-SHA256'd under the shared pre-shared worker key and
//! hex-encoded — the same construction as this codebase's webhook signature
//! helper, extended with the extra fields the dispatch protocol signs over.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Window (§6.2) within which a request's `X-Worker-Timestamp` must fall of
/// server time for the request to be accepted.
pub const MAX_CLOCK_SKEW_SECS: i64 = 300;

fn signed_message(timestamp: i64, worker_id: &str, method: &str, path: &str, body: &[u8]) -> Vec<u8> {
	let mut message = Vec::with_capacity(worker_id.len() + method.len() + path.len() + body.len() + 32);
	message.extend_from_slice(timestamp.to_string().as_bytes());
	message.push(b'\n');
	message.extend_from_slice(worker_id.as_bytes());
	message.push(b'\n');
	message.extend_from_slice(method.as_bytes());
	message.push(b'\n');
	message.extend_from_slice(path.as_bytes());
	message.push(b'\n');
	message.extend_from_slice(body);
	message
}

/// Computes the hex-encoded HMAC-SHA256 signature for a dispatch request.
pub fn sign(key: &[u8], timestamp: i64, worker_id: &str, method: &str, path: &str, body: &[u8]) -> String {
	let message = signed_message(timestamp, worker_id, method, path, body);
	let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts a key of any size");
	mac.update(&message);
	hex::encode(mac.finalize().into_bytes())
}

/// Verifies a hex-encoded signature in constant time. Any malformed hex is
/// treated as a mismatch rather than an error.
pub fn verify(key: &[u8], timestamp: i64, worker_id: &str, method: &str, path: &str, body: &[u8], signature: &str) -> bool {
	let expected_bytes = match hex::decode(signature) {
		Ok(bytes) => bytes,
		Err(_) => return false,
	};

	let message = signed_message(timestamp, worker_id, method, path, body);
	let mut mac = match HmacSha256::new_from_slice(key) {
		Ok(mac) => mac,
		Err(_) => return false,
	};
	mac.update(&message);
	mac.verify_slice(&expected_bytes).is_ok()
}
