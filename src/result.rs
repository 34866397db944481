//! The result and error types used throughout the crate.

use std::error::Error;
use std::fmt;
use std::io;
use std::str::Utf8Error;

/// The type used for WebSocket results
pub type WebSocketResult<T> = Result<T, WebSocketError>;

/// The ceiling on payload lengths the codec will represent.
///
/// A 64-bit extended length field at or above this value is rejected
/// with [`FrameError::UnsupportedLength`].
pub const MAX_PAYLOAD_LENGTH: u64 = 1 << 53;

/// A violation of the RFC6455 frame layout, detected while decoding an
/// incoming frame or building an outgoing one.
///
/// None of these are recoverable: on the decode side each one indicates
/// a malformed peer, and the codec that reported it must not be fed
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
	/// One of the RSV1/RSV2/RSV3 bits was set without a negotiated
	/// extension.
	RsvNonZero,
	/// The opcode nibble is not one of the six defined by RFC6455.
	InvalidOpcode(u8),
	/// A control frame (close/ping/pong) arrived without the FIN bit.
	ExpectedFinal,
	/// An extended length field holds a value at or above 2^53.
	UnsupportedLength(u64),
	/// A control frame declared a payload longer than 125 bytes.
	ControlFrameTooLong(u64),
	/// The declared payload length exceeds the configured frame size
	/// ceiling.
	FrameTooLarge(u64),
}

impl fmt::Display for FrameError {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			FrameError::RsvNonZero => fmt.write_str("reserved bits must be zero"),
			FrameError::InvalidOpcode(op) => write!(fmt, "invalid opcode {}", op),
			FrameError::ExpectedFinal => fmt.write_str("control frames must not be fragmented"),
			FrameError::UnsupportedLength(len) => {
				write!(fmt, "unsupported payload length {}", len)
			}
			FrameError::ControlFrameTooLong(len) => {
				write!(fmt, "control frame payload of {} bytes is too long", len)
			}
			FrameError::FrameTooLarge(len) => {
				write!(fmt, "frame of {} bytes exceeds the size ceiling", len)
			}
		}
	}
}

impl Error for FrameError {}

/// Represents a WebSocket error
#[derive(Debug)]
pub enum WebSocketError {
	/// A WebSocket protocol error
	ProtocolError(&'static str),
	/// An invalid incoming or outgoing frame
	FrameError(FrameError),
	/// An invalid response to the opening handshake
	ResponseError(&'static str),
	/// An unusable WebSocket URL
	UrlError(&'static str),
	/// No data available
	NoDataAvailable,
	/// An input/output error
	IoError(io::Error),
	/// A UTF-8 error
	Utf8Error(Utf8Error),
}

impl fmt::Display for WebSocketError {
	fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
		fmt.write_str("WebSocketError: ")?;
		match self {
			WebSocketError::ProtocolError(e) => write!(fmt, "WebSocket protocol error: {}", e),
			WebSocketError::FrameError(e) => write!(fmt, "WebSocket frame error: {}", e),
			WebSocketError::ResponseError(e) => write!(fmt, "WebSocket response error: {}", e),
			WebSocketError::UrlError(e) => write!(fmt, "WebSocket URL error: {}", e),
			WebSocketError::NoDataAvailable => fmt.write_str("no data available"),
			WebSocketError::IoError(_) => fmt.write_str("I/O failure"),
			WebSocketError::Utf8Error(_) => fmt.write_str("UTF-8 failure"),
		}
	}
}

impl Error for WebSocketError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match *self {
			WebSocketError::FrameError(ref error) => Some(error),
			WebSocketError::IoError(ref error) => Some(error),
			WebSocketError::Utf8Error(ref error) => Some(error),
			_ => None,
		}
	}
}

impl From<FrameError> for WebSocketError {
	fn from(err: FrameError) -> WebSocketError {
		WebSocketError::FrameError(err)
	}
}

impl From<io::Error> for WebSocketError {
	fn from(err: io::Error) -> WebSocketError {
		if err.kind() == io::ErrorKind::UnexpectedEof {
			return WebSocketError::NoDataAvailable;
		}
		WebSocketError::IoError(err)
	}
}

impl From<Utf8Error> for WebSocketError {
	fn from(err: Utf8Error) -> WebSocketError {
		WebSocketError::Utf8Error(err)
	}
}
