//! The application-facing events surfaced by the client.

use crate::result::{WebSocketError, WebSocketResult};
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use std::str::from_utf8;

/// An application-level event decoded from the incoming frame stream.
///
/// `Text` and `Binary` carry a whole message: the client reassembles
/// fragmented messages before surfacing them. The control events map
/// one-to-one to their frames.
#[derive(Eq, PartialEq, Clone, Debug)]
pub enum Event {
	/// A message containing UTF-8 text data
	Text(String),
	/// A message containing binary data
	Binary(Vec<u8>),
	/// The peer is closing the connection, with an optional code and
	/// reason.
	Close(Option<CloseData>),
	/// A ping - should be responded to with a pong message. Usually
	/// the pong is sent with the same data as the received ping.
	Ping(Vec<u8>),
	/// A pong, sent in response to a ping.
	Pong(Vec<u8>),
}

impl Event {
	/// Checks if this event is a close event.
	///
	///```rust
	///# use websocket_client::Event;
	///assert!(Event::Close(None).is_close());
	///```
	pub fn is_close(&self) -> bool {
		matches!(self, Event::Close(_))
	}

	/// Checks if this event came from a control frame.
	pub fn is_control(&self) -> bool {
		matches!(self, Event::Close(_) | Event::Ping(_) | Event::Pong(_))
	}

	/// Checks if this event is a whole data message, text or binary.
	///
	///```rust
	///# use websocket_client::Event;
	///assert!(Event::Text("1337".to_string()).is_data());
	///assert!(Event::Binary(vec![]).is_data());
	///```
	pub fn is_data(&self) -> bool {
		!self.is_control()
	}

	/// Checks if this event is a ping.
	pub fn is_ping(&self) -> bool {
		matches!(self, Event::Ping(_))
	}

	/// Checks if this event is a pong.
	pub fn is_pong(&self) -> bool {
		matches!(self, Event::Pong(_))
	}
}

/// Represents the contents of a close frame: a status code and a UTF-8
/// reason.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct CloseData {
	/// The status code
	pub status_code: u16,
	/// The reason-phrase of the status code
	pub reason: String,
}

impl CloseData {
	/// Creates a new `CloseData` object.
	pub fn new(status_code: u16, reason: String) -> CloseData {
		CloseData {
			status_code,
			reason,
		}
	}

	/// Serializes this into a close frame payload: the status code in
	/// network byte order followed by the reason bytes.
	pub fn into_bytes(self) -> WebSocketResult<Vec<u8>> {
		let mut buf = Vec::with_capacity(2 + self.reason.len());
		buf.write_u16::<BigEndian>(self.status_code)?;
		buf.extend_from_slice(self.reason.as_bytes());
		Ok(buf)
	}

	/// Parses a close frame payload.
	///
	/// An empty payload carries no close data; a 1-byte payload cannot
	/// hold a status code and is rejected.
	pub fn from_payload(payload: &[u8]) -> WebSocketResult<Option<CloseData>> {
		match payload.len() {
			0 => Ok(None),
			1 => Err(WebSocketError::ProtocolError(
				"close frame payload of one byte holds no status code",
			)),
			_ => {
				let status_code = BigEndian::read_u16(&payload[..2]);
				let reason = from_utf8(&payload[2..])?.to_string();
				Ok(Some(CloseData::new(status_code, reason)))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_close_data_round_trip() {
		let data = CloseData::new(1000, "going away".to_string());
		let bytes = data.clone().into_bytes().unwrap();
		assert_eq!(&bytes[..2], &[0x03, 0xE8]);
		assert_eq!(&bytes[2..], b"going away");

		let parsed = CloseData::from_payload(&bytes).unwrap();
		assert_eq!(parsed, Some(data));
	}

	#[test]
	fn test_close_data_empty_payload() {
		assert_eq!(CloseData::from_payload(&[]).unwrap(), None);
	}

	#[test]
	fn test_close_data_short_payload() {
		assert!(CloseData::from_payload(&[0x03]).is_err());
	}

	#[test]
	fn test_close_data_code_only() {
		let parsed = CloseData::from_payload(&[0x03, 0xE8]).unwrap();
		assert_eq!(parsed, Some(CloseData::new(1000, String::new())));
	}

	#[test]
	fn test_close_data_invalid_utf8_reason() {
		assert!(CloseData::from_payload(&[0x03, 0xE8, 0xFF, 0xFE]).is_err());
	}

	#[test]
	fn test_event_predicates() {
		assert!(Event::Ping(vec![]).is_control());
		assert!(Event::Pong(vec![]).is_pong());
		assert!(Event::Close(None).is_control());
		assert!(Event::Text(String::new()).is_data());
		assert!(!Event::Binary(vec![]).is_control());
	}
}
