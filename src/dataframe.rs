//! The decoded frame model: opcodes and the frames handed to listeners.

/// Represents a WebSocket frame opcode.
///
/// Only the six values RFC6455 defines exist here; the reserved nibbles
/// (3-7 and 11-15) are rejected by the decoder before an `Opcode` is
/// ever constructed.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Opcode {
	/// A continuation frame of a fragmented message
	Continuation = 0,
	/// A UTF-8 text frame
	Text = 1,
	/// A binary frame
	Binary = 2,
	/// A close frame
	Close = 8,
	/// A ping frame
	Ping = 9,
	/// A pong frame
	Pong = 10,
}

impl Opcode {
	/// Attempts to form an `Opcode` from a nibble.
	///
	/// Returns the `Opcode`, or `None` if the nibble is reserved or out
	/// of range.
	pub fn from_nibble(op: u8) -> Option<Opcode> {
		Some(match op {
			0 => Opcode::Continuation,
			1 => Opcode::Text,
			2 => Opcode::Binary,
			8 => Opcode::Close,
			9 => Opcode::Ping,
			10 => Opcode::Pong,
			_ => return None,
		})
	}

	/// Whether this is a control opcode (close, ping or pong).
	///
	/// Control frames are never fragmented and carry at most 125 bytes
	/// of payload.
	pub fn is_control(self) -> bool {
		matches!(self, Opcode::Close | Opcode::Ping | Opcode::Pong)
	}

	/// Whether this is a data opcode (continuation, text or binary).
	pub fn is_data(self) -> bool {
		!self.is_control()
	}
}

/// Represents a single decoded WebSocket frame.
///
/// The payload held in a `Frame` is never masked: unmasking happens
/// inside the decoder before the frame is emitted. The decoder gives up
/// ownership of the payload when it emits the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
	/// Whether this frame constitutes the end of a message
	pub finished: bool,
	/// The opcode associated with this frame
	pub opcode: Opcode,
	/// The unmasked payload carried by this frame
	pub payload: Vec<u8>,
}

impl Frame {
	/// Creates a new `Frame` with the FIN bit set.
	pub fn new(opcode: Opcode, payload: Vec<u8>) -> Frame {
		Frame {
			finished: true,
			opcode,
			payload,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_opcode_nibbles() {
		assert_eq!(Opcode::from_nibble(0), Some(Opcode::Continuation));
		assert_eq!(Opcode::from_nibble(1), Some(Opcode::Text));
		assert_eq!(Opcode::from_nibble(2), Some(Opcode::Binary));
		assert_eq!(Opcode::from_nibble(8), Some(Opcode::Close));
		assert_eq!(Opcode::from_nibble(9), Some(Opcode::Ping));
		assert_eq!(Opcode::from_nibble(10), Some(Opcode::Pong));

		for reserved in (3..8).chain(11..16) {
			assert_eq!(Opcode::from_nibble(reserved), None);
		}
	}

	#[test]
	fn test_opcode_classes() {
		assert!(Opcode::Close.is_control());
		assert!(Opcode::Ping.is_control());
		assert!(Opcode::Pong.is_control());
		assert!(Opcode::Continuation.is_data());
		assert!(Opcode::Text.is_data());
		assert!(Opcode::Binary.is_data());
	}
}
