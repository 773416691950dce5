// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Post body sanitising: HTML escaping and URL linkification.

use std::{fmt::Write, sync::LazyLock};

use regex::Regex;

use crate::error::{Error, Result};

/// Longest accepted message body, in characters, after trimming.
pub const MAX_BODY_LEN: usize = 4096;

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ')', ';', ':', '!', '?'];

static URL: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"https?://[^\s<>"']+"#).expect("url pattern is a valid regex"));

/// Validate a raw post body and turn it into the stored, display safe form.
pub fn sanitize(raw: &str) -> Result<String> {
	let trimmed = raw.trim();
	if trimmed.is_empty() {
		return Err(Error::BadInput("message body is empty".to_string()));
	}

	if trimmed.chars().count() > MAX_BODY_LEN {
		return Err(Error::BadInput(format!("message body exceeds {} characters", MAX_BODY_LEN)));
	}

	Ok(linkify(trimmed))
}

pub fn escape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			c => out.push(c),
		}
	}
	out
}

/// Escape `text` and wrap every `http://` or `https://` URL in an anchor.
pub fn linkify(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	let mut linked = 0;

	for found in URL.find_iter(text) {
		let url = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
		let scheme = if url.starts_with("https://") {
			"https://"
		} else {
			"http://"
		};

		// only punctuation after the scheme
		if url.len() == scheme.len() {
			continue;
		}

		out.push_str(&escape(&text[linked..found.start()]));
		let escaped = escape(url);
		let _ = write!(out, "<a href=\"{}\">{}</a>", escaped, escaped);
		linked = found.start() + url.len();
	}

	out.push_str(&escape(&text[linked..]));
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_escape() {
		assert_eq!(escape(r#"<b>"a" & 'b'</b>"#), "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;");
	}

	#[test]
	fn test_linkify_plain_text() {
		assert_eq!(linkify("hello world"), "hello world");
	}

	#[test]
	fn test_linkify_url() {
		assert_eq!(
			linkify("see https://reifydb.com/docs now"),
			r#"see <a href="https://reifydb.com/docs">https://reifydb.com/docs</a> now"#
		);
	}

	#[test]
	fn test_linkify_trailing_punctuation_stays_outside() {
		assert_eq!(linkify("go to http://a.io."), r#"go to <a href="http://a.io">http://a.io</a>."#);
	}

	#[test]
	fn test_linkify_escapes_query_string() {
		assert_eq!(linkify("http://a.io/?x=1&y=2"), r#"<a href="http://a.io/?x=1&amp;y=2">http://a.io/?x=1&amp;y=2</a>"#);
	}

	#[test]
	fn test_linkify_bare_scheme() {
		assert_eq!(linkify("just http:// here"), "just http:// here");
	}

	#[test]
	fn test_linkify_multiple_urls() {
		assert_eq!(
			linkify("http://a.io and <https://b.io>"),
			r#"<a href="http://a.io">http://a.io</a> and &lt;<a href="https://b.io">https://b.io</a>&gt;"#
		);
	}

	#[test]
	fn test_linkify_scheme_followed_by_punctuation() {
		assert_eq!(linkify("(see http://.)"), "(see http://.)");
	}

	#[test]
	fn test_linkify_url_at_start_and_end() {
		assert_eq!(
			linkify("https://a.io x http://b.io"),
			r#"<a href="https://a.io">https://a.io</a> x <a href="http://b.io">http://b.io</a>"#
		);
	}

	#[test]
	fn test_sanitize() {
		assert_eq!(sanitize("  hi <there>  ").unwrap(), "hi &lt;there&gt;");
		assert!(matches!(sanitize("   "), Err(Error::BadInput(_))));
		assert!(matches!(sanitize(&"x".repeat(MAX_BODY_LEN + 1)), Err(Error::BadInput(_))));
		assert!(sanitize(&"x".repeat(MAX_BODY_LEN)).is_ok());
	}
}
