//! The incremental frame decoder.
//!
//! Network reads deliver bytes in arbitrary slices: a delivery may stop
//! in the middle of a header field, carry several whole frames, or end
//! with the head of the next frame. The decoder here is a resumable
//! state machine that consumes every delivery completely, never looks
//! past the bytes it has been given, and hands each completed frame to
//! the listener exactly once, in stream order.

use crate::codec::header::{parse_header, FrameHeader};
use crate::codec::mask::apply_mask;
use crate::dataframe::Frame;
use crate::result::FrameError;
use std::mem;

/// Default ceiling on the declared payload length of a single incoming
/// frame.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1024 * 1024 * 100;

/// Where the decoder stands inside the current frame.
///
/// The header travels with the payload phase, so a payload can only be
/// filled once a complete, validated header exists.
#[derive(Debug, Clone, Copy)]
enum Phase {
	/// Accumulating header bytes in the scratch buffer.
	Header,
	/// Filling the payload of the frame described by this header.
	Payload(FrameHeader),
}

/// An incremental decoder for WebSocket frames.
///
/// One decoder serves one connection. Between frames it exclusively
/// owns its buffers; when a frame completes, ownership of the payload
/// moves to the listener and the decoder returns to its initial state.
///
/// After [`feed`](FrameDecoder::feed) returns an error the decoder is
/// in an unspecified state and must not be fed again; the connection it
/// served should be dropped.
#[derive(Debug)]
pub struct FrameDecoder {
	phase: Phase,
	scratch: Vec<u8>,
	payload: Vec<u8>,
	max_frame_size: u64,
}

impl Default for FrameDecoder {
	fn default() -> Self {
		FrameDecoder::new()
	}
}

impl FrameDecoder {
	/// Creates a decoder with the default frame size ceiling.
	pub fn new() -> FrameDecoder {
		FrameDecoder::new_with_limits(DEFAULT_MAX_FRAME_SIZE)
	}

	/// Creates a decoder that rejects frames whose declared payload
	/// length exceeds `max_frame_size`.
	pub fn new_with_limits(max_frame_size: usize) -> FrameDecoder {
		FrameDecoder {
			phase: Phase::Header,
			scratch: Vec::new(),
			payload: Vec::new(),
			max_frame_size: max_frame_size as u64,
		}
	}

	/// Consumes a delivery of bytes, invoking `listener` once for every
	/// frame it completes.
	///
	/// The listener runs synchronously on the caller's stack, before
	/// `feed` returns; frames are delivered in stream order. An empty
	/// `chunk` is a no-op. The first protocol violation is returned as
	/// an error and leaves the decoder unusable.
	pub fn feed<F>(&mut self, chunk: &[u8], listener: &mut F) -> Result<(), FrameError>
	where
		F: FnMut(Frame),
	{
		let mut rest = chunk;
		loop {
			match self.phase {
				Phase::Header => {
					if !rest.is_empty() {
						self.scratch.extend_from_slice(rest);
						rest = &[];
					}
					let (header, consumed) = match parse_header(&self.scratch)? {
						Some(parsed) => parsed,
						None => return Ok(()),
					};
					if header.len > self.max_frame_size {
						return Err(FrameError::FrameTooLarge(header.len));
					}
					self.scratch.drain(..consumed);
					if header.len == 0 {
						// nothing to wait for; any bytes left in
						// scratch start the next frame
						emit(header, Vec::new(), listener);
						if self.scratch.is_empty() {
							return Ok(());
						}
						continue;
					}
					self.payload = Vec::with_capacity(header.len as usize);
					self.phase = Phase::Payload(header);
				}
				Phase::Payload(header) => {
					// bytes that trailed the header are still in
					// scratch and come before the current delivery
					if !self.scratch.is_empty() {
						let want = header.len as usize - self.payload.len();
						let take = want.min(self.scratch.len());
						self.payload.extend_from_slice(&self.scratch[..take]);
						self.scratch.drain(..take);
					}
					let want = header.len as usize - self.payload.len();
					if want > 0 && !rest.is_empty() {
						let take = want.min(rest.len());
						self.payload.extend_from_slice(&rest[..take]);
						rest = &rest[take..];
					}
					if (self.payload.len() as u64) < header.len {
						return Ok(());
					}
					let payload = mem::take(&mut self.payload);
					self.phase = Phase::Header;
					emit(header, payload, listener);
					if self.scratch.is_empty() && rest.is_empty() {
						return Ok(());
					}
				}
			}
		}
	}
}

/// Unmasks the completed payload if needed and hands the frame over.
fn emit<F>(header: FrameHeader, mut payload: Vec<u8>, listener: &mut F)
where
	F: FnMut(Frame),
{
	if let Some(key) = header.mask {
		apply_mask(&mut payload, key);
	}
	listener(Frame {
		finished: header.finished,
		opcode: header.opcode,
		payload,
	});
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dataframe::Opcode;

	fn feed_chunks(decoder: &mut FrameDecoder, chunks: &[&[u8]]) -> Vec<Frame> {
		let mut frames = Vec::new();
		for chunk in chunks {
			decoder
				.feed(chunk, &mut |frame| frames.push(frame))
				.unwrap();
		}
		frames
	}

	#[test]
	fn test_unmasked_text() {
		let mut decoder = FrameDecoder::new();
		let frames = feed_chunks(&mut decoder, &[&[0x81, 0x05, 0x48, 0x65, 0x6C, 0x6C, 0x6F]]);
		assert_eq!(frames, vec![Frame::new(Opcode::Text, b"Hello".to_vec())]);
	}

	#[test]
	fn test_masked_text() {
		let mut decoder = FrameDecoder::new();
		let frames = feed_chunks(
			&mut decoder,
			&[&[
				0x81, 0x85, 0x37, 0xFA, 0x21, 0x3D, 0x7F, 0x9F, 0x4D, 0x51, 0x58,
			]],
		);
		assert_eq!(frames, vec![Frame::new(Opcode::Text, b"Hello".to_vec())]);
	}

	#[test]
	fn test_extended_length_split_payload() {
		let payload: Vec<u8> = (0..200).map(|i| i as u8).collect();
		let mut stream = vec![0x82, 0x7E, 0x00, 0xC8];
		stream.extend_from_slice(&payload);
		assert_eq!(stream.len(), 204);

		let mut decoder = FrameDecoder::new();
		let frames = feed_chunks(&mut decoder, &[&stream[..50], &stream[50..]]);
		assert_eq!(frames, vec![Frame::new(Opcode::Binary, payload)]);
	}

	#[test]
	fn test_two_frames_in_one_delivery() {
		let mut decoder = FrameDecoder::new();
		let frames = feed_chunks(&mut decoder, &[&[0x81, 0x03, 0x61, 0x62, 0x63, 0x89, 0x00]]);
		assert_eq!(
			frames,
			vec![
				Frame::new(Opcode::Text, b"abc".to_vec()),
				Frame::new(Opcode::Ping, Vec::new()),
			]
		);
	}

	#[test]
	fn test_header_split_across_deliveries() {
		let mut decoder = FrameDecoder::new();
		let frames = feed_chunks(
			&mut decoder,
			&[&[0x81], &[0x05], &[0x48, 0x65, 0x6C, 0x6C, 0x6F]],
		);
		assert_eq!(frames, vec![Frame::new(Opcode::Text, b"Hello".to_vec())]);
	}

	#[test]
	fn test_chunk_invariance() {
		// text + ping + masked binary, then the same stream byte by byte
		let mut stream = vec![0x81, 0x03, 0x61, 0x62, 0x63, 0x89, 0x00];
		stream.extend_from_slice(&[0x82, 0x84, 0x01, 0x02, 0x03, 0x04]);
		stream.extend_from_slice(&[0x11 ^ 0x01, 0x22 ^ 0x02, 0x33 ^ 0x03, 0x44 ^ 0x04]);

		let mut whole = FrameDecoder::new();
		let expected = feed_chunks(&mut whole, &[&stream]);
		assert_eq!(expected.len(), 3);
		assert_eq!(expected[2], Frame::new(Opcode::Binary, vec![0x11, 0x22, 0x33, 0x44]));

		let mut bytewise = FrameDecoder::new();
		let mut obtained = Vec::new();
		for byte in &stream {
			bytewise
				.feed(&[*byte], &mut |frame| obtained.push(frame))
				.unwrap();
		}
		assert_eq!(obtained, expected);
	}

	#[test]
	fn test_zero_payload_emits_synchronously() {
		let mut decoder = FrameDecoder::new();
		let mut emitted = 0;
		decoder
			.feed(&[0x89, 0x00], &mut |frame| {
				assert_eq!(frame.opcode, Opcode::Ping);
				assert!(frame.payload.is_empty());
				emitted += 1;
			})
			.unwrap();
		assert_eq!(emitted, 1);
	}

	#[test]
	fn test_fin_bit_surfaces_on_fragments() {
		let mut decoder = FrameDecoder::new();
		let frames = feed_chunks(&mut decoder, &[&[0x01, 0x02, 0x61, 0x62, 0x80, 0x01, 0x63]]);
		assert_eq!(
			frames,
			vec![
				Frame {
					finished: false,
					opcode: Opcode::Text,
					payload: b"ab".to_vec(),
				},
				Frame {
					finished: true,
					opcode: Opcode::Continuation,
					payload: b"c".to_vec(),
				},
			]
		);
	}

	#[test]
	fn test_rejection_emits_no_frame() {
		let cases: &[(&[u8], FrameError)] = &[
			(&[0xC1, 0x00], FrameError::RsvNonZero),
			(&[0x83, 0x00], FrameError::InvalidOpcode(3)),
			(&[0x0A, 0x00], FrameError::ExpectedFinal),
		];
		for (bytes, expected) in cases {
			let mut decoder = FrameDecoder::new();
			let result = decoder.feed(bytes, &mut |_| panic!("frame emitted for invalid input"));
			assert_eq!(result, Err(*expected));
		}
	}

	#[test]
	fn test_error_detected_mid_stream() {
		// a valid frame followed by a frame with RSV1 set
		let mut decoder = FrameDecoder::new();
		let mut frames = Vec::new();
		let result = decoder.feed(
			&[0x81, 0x01, 0x61, 0xC1, 0x00],
			&mut |frame| frames.push(frame),
		);
		assert_eq!(frames, vec![Frame::new(Opcode::Text, b"a".to_vec())]);
		assert_eq!(result, Err(FrameError::RsvNonZero));
	}

	#[test]
	fn test_frame_size_ceiling() {
		let mut decoder = FrameDecoder::new_with_limits(16);
		let result = decoder.feed(&[0x82, 0x11], &mut |_| panic!("oversized frame emitted"));
		assert_eq!(result, Err(FrameError::FrameTooLarge(17)));

		// at the ceiling the frame still goes through
		let mut decoder = FrameDecoder::new_with_limits(16);
		let mut frames = Vec::new();
		decoder
			.feed(&[0x82, 0x10], &mut |frame| frames.push(frame))
			.unwrap();
		decoder
			.feed(&[0u8; 16], &mut |frame| frames.push(frame))
			.unwrap();
		assert_eq!(frames, vec![Frame::new(Opcode::Binary, vec![0u8; 16])]);
	}

	#[test]
	fn test_empty_delivery_is_noop() {
		let mut decoder = FrameDecoder::new();
		decoder
			.feed(&[], &mut |_| panic!("frame emitted from empty delivery"))
			.unwrap();

		// and mid-frame as well
		decoder.feed(&[0x81, 0x02, 0x61], &mut |_| panic!()).unwrap();
		decoder.feed(&[], &mut |_| panic!()).unwrap();
		let mut frames = Vec::new();
		decoder
			.feed(&[0x62], &mut |frame| frames.push(frame))
			.unwrap();
		assert_eq!(frames, vec![Frame::new(Opcode::Text, b"ab".to_vec())]);
	}

	#[test]
	fn test_tail_of_one_frame_plus_head_of_next() {
		// delivery 1: all of frame A and the first header byte of B
		// delivery 2: the rest of B
		let mut decoder = FrameDecoder::new();
		let frames = feed_chunks(
			&mut decoder,
			&[&[0x81, 0x01, 0x61, 0x82], &[0x02, 0x01, 0x02]],
		);
		assert_eq!(
			frames,
			vec![
				Frame::new(Opcode::Text, b"a".to_vec()),
				Frame::new(Opcode::Binary, vec![1, 2]),
			]
		);
	}

	#[test]
	fn test_masked_zero_payload() {
		// an empty masked payload is still unmasked trivially
		let mut decoder = FrameDecoder::new();
		let frames = feed_chunks(&mut decoder, &[&[0x89, 0x80, 0x01, 0x02, 0x03, 0x04]]);
		assert_eq!(frames, vec![Frame::new(Opcode::Ping, Vec::new())]);
	}
}
