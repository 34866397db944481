//! Provides the default stream type for WebSocket connections.

use std::fmt::Arguments;
use std::io::{self, Read, Write};
pub use std::net::Shutdown;
use std::net::TcpStream;

/// Represents a stream that can be read from, and written to.
/// This is an abstraction around readable and writable things to be able
/// to speak websockets over tcp, unix sockets, in-memory pipes, etc.
pub trait Stream: Read + Write {}
impl<S> Stream for S where S: Read + Write {}

/// A `Stream` that can also be used as a borrow to a `TcpStream`,
/// so one can set options on the stream such as `nonblocking`, or shut
/// it down.
pub trait AsTcpStream {
	/// Get a borrow of the TcpStream
	fn as_tcp(&self) -> &TcpStream;
}

impl AsTcpStream for TcpStream {
	fn as_tcp(&self) -> &TcpStream {
		self
	}
}

/// If you would like to combine an input stream and an output stream into a single
/// stream to talk websockets over then this is the struct for you!
///
/// This is useful if you want to use different mediums for different directions.
pub struct ReadWritePair<R, W>(pub R, pub W)
where
	R: Read,
	W: Write;

impl<R, W> Read for ReadWritePair<R, W>
where
	R: Read,
	W: Write,
{
	#[inline(always)]
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		self.0.read(buf)
	}
	#[inline(always)]
	fn read_to_end(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
		self.0.read_to_end(buf)
	}
	#[inline(always)]
	fn read_to_string(&mut self, buf: &mut String) -> io::Result<usize> {
		self.0.read_to_string(buf)
	}
	#[inline(always)]
	fn read_exact(&mut self, buf: &mut [u8]) -> io::Result<()> {
		self.0.read_exact(buf)
	}
}

impl<R, W> Write for ReadWritePair<R, W>
where
	R: Read,
	W: Write,
{
	#[inline(always)]
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.1.write(buf)
	}
	#[inline(always)]
	fn flush(&mut self) -> io::Result<()> {
		self.1.flush()
	}
	#[inline(always)]
	fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
		self.1.write_all(buf)
	}
	#[inline(always)]
	fn write_fmt(&mut self, fmt: Arguments) -> io::Result<()> {
		self.1.write_fmt(fmt)
	}
}
