//! The frame codec: an incremental decoder for incoming bytes and a
//! serializer for outgoing frames, bound to one side of a connection.
//!
//! The decoder and encoder are usable on their own; [`FrameCodec`] ties
//! them to a [`Context`] so that the masking rules of RFC6455 section
//! 5.3 (clients mask, servers don't) are decided once, at construction,
//! by the layer that knows which side it is.

pub mod decoder;
pub mod encoder;
pub mod header;
pub mod mask;

use crate::dataframe::{Frame, Opcode};
use crate::result::{WebSocketResult, WebSocketError};
use log::debug;

pub use self::decoder::{FrameDecoder, DEFAULT_MAX_FRAME_SIZE};
pub use self::encoder::{build_frame, write_frame};

/// Even though a websocket connection may look perfectly symmetrical,
/// in reality there are small differences between clients and servers.
/// This type is passed to the codec to inform it of what role it is in.
///
/// For those familiar with the protocol, this decides whether outgoing
/// frames are masked.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Context {
	/// Act as a server: outgoing frames are sent in the clear.
	Server,
	/// Act as a client: every outgoing frame carries a fresh mask.
	Client,
}

/// A codec for one WebSocket connection.
///
/// Incoming bytes go through [`feed`](FrameCodec::feed), which invokes
/// the listener once per completed frame; outgoing frames are built
/// with [`build_frame`](FrameCodec::build_frame) or the per-opcode
/// helpers. The first decode error renders the codec dead: the
/// violation is surfaced once, and every later `feed` fails without
/// touching the stream state, so the owner is expected to drop the
/// connection.
#[derive(Debug)]
pub struct FrameCodec {
	decoder: FrameDecoder,
	context: Context,
	dead: bool,
}

impl FrameCodec {
	/// Creates a codec acting in the given role, with the default
	/// incoming frame size ceiling.
	pub fn new(context: Context) -> FrameCodec {
		FrameCodec::new_with_limits(context, DEFAULT_MAX_FRAME_SIZE)
	}

	/// Creates a codec that rejects incoming frames whose declared
	/// payload length exceeds `max_frame_size`.
	pub fn new_with_limits(context: Context, max_frame_size: usize) -> FrameCodec {
		FrameCodec {
			decoder: FrameDecoder::new_with_limits(max_frame_size),
			context,
			dead: false,
		}
	}

	/// Whether outgoing frames built by this codec are masked.
	pub fn is_masking(&self) -> bool {
		self.context == Context::Client
	}

	/// Feeds a delivery of incoming bytes to the decoder, invoking
	/// `listener` once per completed frame, in stream order, before
	/// this call returns.
	pub fn feed<F>(&mut self, chunk: &[u8], listener: F) -> WebSocketResult<()>
	where
		F: FnMut(Frame),
	{
		if self.dead {
			return Err(WebSocketError::ProtocolError(
				"frame codec already hit a protocol violation",
			));
		}
		let mut listener = listener;
		match self.decoder.feed(chunk, &mut listener) {
			Ok(()) => Ok(()),
			Err(e) => {
				debug!("frame decoder is dead: {}", e);
				self.dead = true;
				Err(e.into())
			}
		}
	}

	/// Builds a single complete frame, masked according to this codec's
	/// role.
	pub fn build_frame(&self, opcode: Opcode, payload: &[u8]) -> WebSocketResult<Vec<u8>> {
		encoder::build_frame(opcode, payload, self.is_masking()).map_err(Into::into)
	}

	/// Builds a text frame.
	pub fn build_text_frame(&self, text: &str) -> WebSocketResult<Vec<u8>> {
		self.build_frame(Opcode::Text, text.as_bytes())
	}

	/// Builds a binary frame.
	pub fn build_binary_frame(&self, payload: &[u8]) -> WebSocketResult<Vec<u8>> {
		self.build_frame(Opcode::Binary, payload)
	}

	/// Builds a close frame; the payload is the close code and reason
	/// bytes, or empty.
	pub fn build_close_frame(&self, payload: &[u8]) -> WebSocketResult<Vec<u8>> {
		self.build_frame(Opcode::Close, payload)
	}

	/// Builds a ping frame.
	pub fn build_ping_frame(&self, payload: &[u8]) -> WebSocketResult<Vec<u8>> {
		self.build_frame(Opcode::Ping, payload)
	}

	/// Builds a pong frame.
	pub fn build_pong_frame(&self, payload: &[u8]) -> WebSocketResult<Vec<u8>> {
		self.build_frame(Opcode::Pong, payload)
	}

	/// Builds a continuation frame.
	pub fn build_continuation_frame(&self, payload: &[u8]) -> WebSocketResult<Vec<u8>> {
		self.build_frame(Opcode::Continuation, payload)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::result::FrameError;

	#[test]
	fn test_roles_decide_masking() {
		assert!(FrameCodec::new(Context::Client).is_masking());
		assert!(!FrameCodec::new(Context::Server).is_masking());
	}

	#[test]
	fn test_per_opcode_builders() {
		let codec = FrameCodec::new(Context::Server);
		let cases: &[(WebSocketResult<Vec<u8>>, u8)] = &[
			(codec.build_text_frame("hi"), 0x81),
			(codec.build_binary_frame(b"hi"), 0x82),
			(codec.build_close_frame(b"hi"), 0x88),
			(codec.build_ping_frame(b"hi"), 0x89),
			(codec.build_pong_frame(b"hi"), 0x8A),
			(codec.build_continuation_frame(b"hi"), 0x80),
		];
		for (frame, first_byte) in cases {
			let frame = frame.as_ref().unwrap();
			assert_eq!(frame[0], *first_byte);
			assert_eq!(&frame[2..], b"hi");
		}
	}

	#[test]
	fn test_client_round_trip_through_server_codec() {
		let client = FrameCodec::new(Context::Client);
		let mut server = FrameCodec::new(Context::Server);

		let wire = client.build_text_frame("Hello").unwrap();
		// MASK bit set on the wire
		assert_eq!(wire[1] & 0x80, 0x80);

		let mut frames = Vec::new();
		server.feed(&wire, |frame| frames.push(frame)).unwrap();
		assert_eq!(frames, vec![Frame::new(Opcode::Text, b"Hello".to_vec())]);
	}

	#[test]
	fn test_first_error_latches_the_codec() {
		let mut codec = FrameCodec::new(Context::Client);
		let err = codec.feed(&[0xC1, 0x00], |_| panic!("invalid frame emitted"));
		match err {
			Err(WebSocketError::FrameError(FrameError::RsvNonZero)) => (),
			other => panic!("expected RsvNonZero, got {:?}", other),
		}

		// even valid bytes are refused afterwards
		let err = codec.feed(&[0x89, 0x00], |_| panic!("dead codec emitted"));
		match err {
			Err(WebSocketError::ProtocolError(_)) => (),
			other => panic!("expected a dead-codec error, got {:?}", other),
		}
	}
}
