//! Contains the WebSocket client.

mod builder;

pub use self::builder::{ClientBuilder, ParseError, Url};

use crate::codec::{Context, FrameCodec};
use crate::dataframe::{Frame, Opcode};
use crate::message::{CloseData, Event};
use crate::result::{WebSocketError, WebSocketResult};
use crate::stream::{AsTcpStream, Shutdown, Stream};
use log::{debug, trace};
use std::collections::VecDeque;
use std::io::Result as IoResult;
use std::mem;
use std::net::SocketAddr;

/// How much is asked of the transport per read.
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Default ceiling on the size of one reassembled message.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024 * 1024 * 200;

const MAX_FRAMES_IN_ONE_MESSAGE: usize = 1024 * 1024;

/// Represents a WebSocket client, which can send frames and receive
/// application events.
///
/// The client wraps a `Stream` (anything that can be read from and
/// written to) and drives the frame codec over it: reads feed the
/// decoder, sends go through the client-masking encoder. Fragmented
/// data messages are reassembled before they are surfaced; control
/// frames come through as their own events, interleaved or not.
///
/// Use a [`ClientBuilder`] to obtain one with the opening handshake
/// already performed.
pub struct Client<S>
where
	S: Stream,
{
	stream: S,
	codec: FrameCodec,
	buffer: Vec<u8>,
	pending: VecDeque<Frame>,
	fragments: Vec<Frame>,
	fragmented_size: usize,
	max_message_size: usize,
}

impl<S> Client<S>
where
	S: Stream,
{
	/// Wraps a stream that has already completed the opening
	/// handshake. The codec acts in the client role: every frame sent
	/// is masked.
	pub fn unchecked(stream: S) -> Client<S> {
		Client {
			stream,
			codec: FrameCodec::new(Context::Client),
			buffer: vec![0; READ_CHUNK_SIZE],
			pending: VecDeque::new(),
			fragments: Vec::new(),
			fragmented_size: 0,
			max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
		}
	}

	/// Blocks until the next application event arrives.
	///
	/// Reads are fed to the decoder in whatever sizes the transport
	/// delivers; this returns as soon as the decoded frames complete an
	/// event. A clean transport EOF surfaces as
	/// [`WebSocketError::NoDataAvailable`].
	pub fn recv_event(&mut self) -> WebSocketResult<Event> {
		loop {
			while let Some(frame) = self.pending.pop_front() {
				if let Some(event) = self.handle_frame(frame)? {
					return Ok(event);
				}
			}

			let read = self.stream.read(&mut self.buffer)?;
			if read == 0 {
				debug!("transport closed");
				return Err(WebSocketError::NoDataAvailable);
			}
			trace!("feeding {} bytes to the decoder", read);

			let Client {
				codec,
				pending,
				buffer,
				..
			} = self;
			codec.feed(&buffer[..read], |frame| pending.push_back(frame))?;
		}
	}

	/// Returns an iterator over incoming events.
	/// This iterator will block until new events arrive and will never
	/// halt.
	pub fn incoming_events(&mut self) -> EventIterator<S> {
		EventIterator { inner: self }
	}

	/// Sends a text message.
	pub fn send_text(&mut self, text: &str) -> WebSocketResult<()> {
		let frame = self.codec.build_text_frame(text)?;
		self.send_raw(&frame)
	}

	/// Sends a binary message.
	pub fn send_binary(&mut self, payload: &[u8]) -> WebSocketResult<()> {
		let frame = self.codec.build_binary_frame(payload)?;
		self.send_raw(&frame)
	}

	/// Sends a ping; the peer usually answers with a pong carrying the
	/// same payload.
	pub fn send_ping(&mut self, payload: &[u8]) -> WebSocketResult<()> {
		let frame = self.codec.build_ping_frame(payload)?;
		self.send_raw(&frame)
	}

	/// Sends a pong, usually in response to a received ping.
	pub fn send_pong(&mut self, payload: &[u8]) -> WebSocketResult<()> {
		let frame = self.codec.build_pong_frame(payload)?;
		self.send_raw(&frame)
	}

	/// Sends a close frame, with or without close data. Frames may
	/// still be received after sending this.
	pub fn send_close(&mut self, data: Option<CloseData>) -> WebSocketResult<()> {
		let payload = match data {
			Some(data) => data.into_bytes()?,
			None => Vec::new(),
		};
		let frame = self.codec.build_close_frame(&payload)?;
		self.send_raw(&frame)
	}

	/// Sends a close frame with a status code and a text reason for
	/// why.
	pub fn send_close_because(&mut self, status_code: u16, reason: &str) -> WebSocketResult<()> {
		self.send_close(Some(CloseData::new(status_code, reason.to_string())))
	}

	fn send_raw(&mut self, frame: &[u8]) -> WebSocketResult<()> {
		self.stream.write_all(frame)?;
		self.stream.flush()?;
		Ok(())
	}

	/// Maps one decoded frame to at most one event, buffering message
	/// fragments until their final frame.
	fn handle_frame(&mut self, frame: Frame) -> WebSocketResult<Option<Event>> {
		match frame.opcode {
			// control frames may interleave with a fragmented message
			// and never touch the fragment buffer
			Opcode::Ping => Ok(Some(Event::Ping(frame.payload))),
			Opcode::Pong => Ok(Some(Event::Pong(frame.payload))),
			Opcode::Close => Ok(Some(Event::Close(CloseData::from_payload(&frame.payload)?))),
			Opcode::Continuation => {
				if self.fragments.is_empty() {
					return Err(WebSocketError::ProtocolError(
						"unexpected continuation frame",
					));
				}
				self.queue_fragment(frame)
			}
			Opcode::Text | Opcode::Binary => {
				if !self.fragments.is_empty() {
					return Err(WebSocketError::ProtocolError(
						"data frame interrupts a fragmented message",
					));
				}
				self.queue_fragment(frame)
			}
		}
	}

	fn queue_fragment(&mut self, frame: Frame) -> WebSocketResult<Option<Event>> {
		let finished = frame.finished;

		self.fragmented_size += frame.payload.len();
		if self.fragmented_size > self.max_message_size {
			return Err(WebSocketError::ProtocolError(
				"message exceeds the size ceiling",
			));
		}
		self.fragments.push(frame);
		if self.fragments.len() > MAX_FRAMES_IN_ONE_MESSAGE {
			return Err(WebSocketError::ProtocolError(
				"too many frames in one message",
			));
		}
		if !finished {
			return Ok(None);
		}

		let frames = mem::take(&mut self.fragments);
		let size = self.fragmented_size;
		self.fragmented_size = 0;

		let opcode = frames[0].opcode;
		let mut data = Vec::with_capacity(size);
		for frame in frames {
			data.extend_from_slice(&frame.payload);
		}

		if opcode == Opcode::Text {
			let text = String::from_utf8(data)
				.map_err(|e| WebSocketError::Utf8Error(e.utf8_error()))?;
			Ok(Some(Event::Text(text)))
		} else {
			Ok(Some(Event::Binary(data)))
		}
	}
}

impl<S> Client<S>
where
	S: AsTcpStream + Stream,
{
	/// Shuts down the client connection, will cause all pending and
	/// future IO to return immediately with an appropriate value.
	pub fn shutdown(&self) -> IoResult<()> {
		self.stream.as_tcp().shutdown(Shutdown::Both)
	}

	/// See [`TcpStream::peer_addr`]
	/// (https://doc.rust-lang.org/std/net/struct.TcpStream.html#method.peer_addr).
	pub fn peer_addr(&self) -> IoResult<SocketAddr> {
		self.stream.as_tcp().peer_addr()
	}

	/// See [`TcpStream::local_addr`]
	/// (https://doc.rust-lang.org/std/net/struct.TcpStream.html#method.local_addr).
	pub fn local_addr(&self) -> IoResult<SocketAddr> {
		self.stream.as_tcp().local_addr()
	}
}

/// An iterator over incoming events from a client.
pub struct EventIterator<'a, S>
where
	S: 'a + Stream,
{
	inner: &'a mut Client<S>,
}

impl<'a, S> Iterator for EventIterator<'a, S>
where
	S: Stream,
{
	type Item = WebSocketResult<Event>;

	/// Get the next event from the client. Always returns `Some`.
	fn next(&mut self) -> Option<Self::Item> {
		Some(self.inner.recv_event())
	}
}
