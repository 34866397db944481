//! The client half of the opening HTTP/1.1 upgrade handshake.
//!
//! Only the fixed exchange RFC6455 section 4.1 requires is spoken
//! here: one GET request carrying the upgrade headers and the random
//! key, one `101 Switching Protocols` response whose
//! `Sec-WebSocket-Accept` must match. Subprotocol and extension
//! negotiation are out of scope.

use crate::header::{names, WebSocketAccept, WebSocketKey};
use crate::result::{WebSocketError, WebSocketResult};
use log::{debug, trace};
use std::io::{Read, Write};
use std::str::{from_utf8, FromStr};

/// The only protocol version this crate speaks.
pub const WEBSOCKET_VERSION: &str = "13";

/// The response head is tiny; anything past this is not a handshake.
const MAX_RESPONSE_BYTES: usize = 16 * 1024;

/// Writes the upgrade request for `resource` on `host`.
pub fn write_upgrade_request(
	writer: &mut dyn Write,
	resource: &str,
	host: &str,
	key: &WebSocketKey,
) -> WebSocketResult<()> {
	trace!("requesting upgrade for {} on {}", resource, host);
	write!(writer, "GET {} HTTP/1.1\r\n", resource)?;
	write!(writer, "Host: {}\r\n", host)?;
	write!(writer, "Upgrade: websocket\r\n")?;
	write!(writer, "Connection: Upgrade\r\n")?;
	write!(writer, "{}: {}\r\n", names::KEY, key.serialize())?;
	write!(writer, "{}: {}\r\n", names::VERSION, WEBSOCKET_VERSION)?;
	write!(writer, "\r\n")?;
	Ok(())
}

/// The parsed head of the server's handshake response.
#[derive(Debug)]
pub struct Response {
	/// The status code of the response line.
	pub status: u16,
	headers: Vec<(String, String)>,
}

impl Response {
	/// Reads a response head from `reader`, stopping at the blank line.
	///
	/// The head is consumed one byte at a time so that no frame byte
	/// after the handshake is swallowed by read-ahead buffering.
	pub fn read<R>(reader: &mut R) -> WebSocketResult<Response>
	where
		R: Read,
	{
		let mut raw = Vec::new();
		let mut byte = [0u8; 1];
		while !raw.ends_with(b"\r\n\r\n") {
			if raw.len() >= MAX_RESPONSE_BYTES {
				return Err(WebSocketError::ResponseError("handshake response too large"));
			}
			reader.read_exact(&mut byte)?;
			raw.push(byte[0]);
		}

		let text = from_utf8(&raw)?;
		let mut lines = text.split("\r\n");
		let status_line = match lines.next() {
			Some(line) if !line.is_empty() => line,
			_ => return Err(WebSocketError::ResponseError("missing status line")),
		};
		let status = parse_status_line(status_line)?;

		let mut headers = Vec::new();
		for line in lines {
			if line.is_empty() {
				break;
			}
			let colon = match line.find(':') {
				Some(at) => at,
				None => return Err(WebSocketError::ResponseError("malformed header line")),
			};
			let name = line[..colon].trim().to_string();
			let value = line[colon + 1..].trim().to_string();
			headers.push((name, value));
		}

		Ok(Response { status, headers })
	}

	/// Looks up a header by case-insensitive name.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(n, _)| n.eq_ignore_ascii_case(name))
			.map(|(_, v)| v.as_str())
	}

	/// Checks this response against the key the request carried.
	///
	/// The four checks of RFC6455 section 4.1: the status code, the
	/// `Upgrade` token, the `Connection` token, and the accept value
	/// derived from the key.
	pub fn validate(&self, key: &WebSocketKey) -> WebSocketResult<()> {
		if self.status != 101 {
			return Err(WebSocketError::ResponseError(
				"status code must be 101 Switching Protocols",
			));
		}

		if !self
			.header("Upgrade")
			.map(|v| has_token(v, "websocket"))
			.unwrap_or(false)
		{
			return Err(WebSocketError::ResponseError(
				"Upgrade field must be WebSocket",
			));
		}

		if !self
			.header("Connection")
			.map(|v| has_token(v, "upgrade"))
			.unwrap_or(false)
		{
			return Err(WebSocketError::ResponseError(
				"Connection field must be 'Upgrade'",
			));
		}

		let accept = match self.header(names::ACCEPT) {
			Some(value) => WebSocketAccept::from_str(value)?,
			None => {
				return Err(WebSocketError::ResponseError(
					"missing Sec-WebSocket-Accept",
				))
			}
		};
		if accept != WebSocketAccept::new(key) {
			return Err(WebSocketError::ResponseError(
				"Sec-WebSocket-Accept is invalid",
			));
		}

		debug!("handshake accepted");
		Ok(())
	}
}

fn parse_status_line(line: &str) -> WebSocketResult<u16> {
	let mut parts = line.splitn(3, ' ');
	match parts.next() {
		Some(version) if version.starts_with("HTTP/1.") => (),
		_ => return Err(WebSocketError::ResponseError("response is not HTTP/1.x")),
	}
	match parts.next().map(str::parse) {
		Some(Ok(status)) => Ok(status),
		_ => Err(WebSocketError::ResponseError("unreadable status code")),
	}
}

/// Whether a comma-separated header value contains `token`,
/// case-insensitively.
fn has_token(value: &str, token: &str) -> bool {
	value
		.split(',')
		.any(|part| part.trim().eq_ignore_ascii_case(token))
}
