// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Log writer that masks token key material.
//!
//! Request URIs and similar fields can carry a full retrieval token. The
//! encryption-key half (43 base64url chars after `~`, or after `%7E` when
//! percent-encoded) is replaced before a line reaches the output.

use std::io::{self, Write};
use std::sync::LazyLock;

use regex::Regex;
use tracing_subscriber::fmt::MakeWriter;
use vanish_common_secret::REDACTED;

static TOKEN_KEY_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(~|%7[Ee])[A-Za-z0-9_-]{43}").unwrap());

/// Mask every token encryption key in `line`.
pub fn redact_token_keys(line: &str) -> std::borrow::Cow<'_, str> {
	TOKEN_KEY_REGEX.replace_all(line, |caps: &regex::Captures<'_>| {
		format!("{}{REDACTED}", &caps[1])
	})
}

/// A writer that redacts token keys line by line before writing to the underlying writer.
pub struct RedactingWriter<W: Write> {
	inner: W,
	buffer: Vec<u8>,
}

impl<W: Write> RedactingWriter<W> {
	fn write_redacted(&mut self, bytes: &[u8]) -> io::Result<()> {
		let text = String::from_utf8_lossy(bytes);
		self.inner.write_all(redact_token_keys(&text).as_bytes())
	}
}

impl<W: Write> Drop for RedactingWriter<W> {
	fn drop(&mut self) {
		let _ = self.flush();
	}
}

impl<W: Write> Write for RedactingWriter<W> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.buffer.extend_from_slice(buf);

		while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
			let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
			self.write_redacted(&line)?;
		}

		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		if !self.buffer.is_empty() {
			let rest = std::mem::take(&mut self.buffer);
			self.write_redacted(&rest)?;
		}
		self.inner.flush()
	}
}

/// A MakeWriter that wraps another MakeWriter and redacts token keys.
pub struct RedactingMakeWriter<M> {
	inner: M,
}

impl<M> RedactingMakeWriter<M> {
	pub fn new(inner: M) -> Self {
		Self { inner }
	}
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
	M: MakeWriter<'a>,
{
	type Writer = RedactingWriter<M::Writer>;

	fn make_writer(&'a self) -> Self::Writer {
		RedactingWriter {
			inner: self.inner.make_writer(),
			buffer: Vec::new(),
		}
	}
}
