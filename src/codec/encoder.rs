//! Serialization of complete WebSocket frames.

use crate::codec::header::{write_header, FrameHeader};
use crate::codec::mask::{apply_mask, gen_mask};
use crate::dataframe::Opcode;
use crate::result::{FrameError, WebSocketResult, MAX_PAYLOAD_LENGTH};
use std::io::Write;

/// Builds a single complete frame carrying `payload` under `opcode`.
///
/// The frame always has FIN set and the reserved bits clear. With
/// `mask` the payload region is XORed in place with a freshly generated
/// random key; a client endpoint must pass `true`, a server `false`
/// (RFC6455 section 5.3).
pub fn build_frame(opcode: Opcode, payload: &[u8], mask: bool) -> Result<Vec<u8>, FrameError> {
	let header = frame_header(opcode, payload, if mask { Some(gen_mask()) } else { None })?;

	let payload_offset = header.payload_offset();
	let mut frame = Vec::with_capacity(payload_offset + payload.len());
	// writing into a Vec cannot fail
	let _ = write_header(&mut frame, &header);
	frame.extend_from_slice(payload);

	if let Some(key) = header.mask {
		apply_mask(&mut frame[payload_offset..], key);
	}
	Ok(frame)
}

/// Writes a single complete frame directly to `writer`.
///
/// The frame bytes are identical to [`build_frame`]'s; the buffer is
/// assembled first so the frame reaches the writer in one call.
pub fn write_frame(
	writer: &mut dyn Write,
	opcode: Opcode,
	payload: &[u8],
	mask: bool,
) -> WebSocketResult<()> {
	let frame = build_frame(opcode, payload, mask)?;
	writer.write_all(&frame)?;
	Ok(())
}

/// Validates the payload against `opcode` and assembles the header.
fn frame_header(
	opcode: Opcode,
	payload: &[u8],
	mask: Option<[u8; 4]>,
) -> Result<FrameHeader, FrameError> {
	let len = payload.len() as u64;
	if len >= MAX_PAYLOAD_LENGTH {
		return Err(FrameError::UnsupportedLength(len));
	}
	if opcode.is_control() && len > 125 {
		return Err(FrameError::ControlFrameTooLong(len));
	}
	Ok(FrameHeader {
		finished: true,
		opcode,
		mask,
		len,
	})
}
