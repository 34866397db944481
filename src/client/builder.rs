//! Build clients with a builder-style API.

use crate::client::Client;
use crate::handshake::{write_upgrade_request, Response};
use crate::header::WebSocketKey;
use crate::result::{WebSocketError, WebSocketResult};
use crate::stream::Stream;
use log::debug;
use std::borrow::Cow;
use std::net::TcpStream;
pub use url::{ParseError, Url};
use url::Position;

/// Establishes WebSocket connections.
///
/// The builder parses the URL up front, opens the TCP connection, and
/// performs the opening handshake; what comes back is a [`Client`]
/// speaking frames.
///
///# Connecting to a Server
///
///```no_run
///use websocket_client::ClientBuilder;
///
///let mut client = ClientBuilder::new("ws://127.0.0.1:1234")
///    .unwrap()
///    .connect_insecure()
///    .unwrap();
///
///client.send_text("Hello, World!").unwrap();
///```
#[derive(Clone, Debug)]
pub struct ClientBuilder<'u> {
	url: Cow<'u, Url>,
	key: Option<WebSocketKey>,
}

impl<'u> ClientBuilder<'u> {
	/// Creates a builder from an already parsed URL.
	pub fn from_url(address: &'u Url) -> Self {
		ClientBuilder::init(Cow::Borrowed(address))
	}

	/// Creates a builder from a URL string.
	pub fn new(address: &str) -> Result<Self, ParseError> {
		let url = Url::parse(address)?;
		Ok(ClientBuilder::init(Cow::Owned(url)))
	}

	fn init(url: Cow<'u, Url>) -> Self {
		ClientBuilder { url, key: None }
	}

	/// Fixes the handshake key instead of generating a random one.
	/// Mainly useful for deterministic tests.
	pub fn key(mut self, key: [u8; 16]) -> Self {
		self.key = Some(WebSocketKey(key));
		self
	}

	fn establish_tcp(&self) -> WebSocketResult<TcpStream> {
		let host = match self.url.host_str() {
			Some(h) => h,
			None => return Err(WebSocketError::UrlError("the URL has no host name")),
		};
		let port = self.url.port().unwrap_or(80);

		let tcp_stream = TcpStream::connect((host, port))?;
		debug!("connected to {}:{}", host, port);
		Ok(tcp_stream)
	}

	/// Connects over plain TCP and performs the opening handshake.
	///
	/// Only `ws` URLs are accepted; `wss` needs a TLS stream this crate
	/// does not provide.
	pub fn connect_insecure(&mut self) -> WebSocketResult<Client<TcpStream>> {
		match self.url.scheme() {
			"ws" => (),
			"wss" => return Err(WebSocketError::UrlError("'wss' requires a TLS stream")),
			_ => return Err(WebSocketError::UrlError("the URL scheme must be 'ws'")),
		}
		let tcp_stream = self.establish_tcp()?;
		self.connect_on(tcp_stream)
	}

	/// Performs the opening handshake over an already established
	/// stream.
	pub fn connect_on<S>(&mut self, mut stream: S) -> WebSocketResult<Client<S>>
	where
		S: Stream,
	{
		let resource = self.url[Position::BeforePath..Position::AfterQuery].to_owned();

		let host = match (self.url.host_str(), self.url.port()) {
			(Some(host), Some(port)) => format!("{}:{}", host, port),
			(Some(host), None) => host.to_string(),
			(None, _) => return Err(WebSocketError::UrlError("the URL has no host name")),
		};

		let key = self.key.unwrap_or_else(WebSocketKey::new);

		write_upgrade_request(&mut stream, &resource, &host, &key)?;
		stream.flush()?;

		let response = Response::read(&mut stream)?;
		response.validate(&key)?;

		Ok(Client::unchecked(stream))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_rejects_non_ws_schemes() {
		assert!(ClientBuilder::new("wss://example.com")
			.unwrap()
			.connect_insecure()
			.is_err());
		assert!(ClientBuilder::new("http://example.com")
			.unwrap()
			.connect_insecure()
			.is_err());
	}

	#[test]
	fn test_resource_covers_path_and_query() {
		let url = Url::parse("ws://example.com/chat/room?user=a").unwrap();
		assert_eq!(&url[Position::BeforePath..Position::AfterQuery], "/chat/room?user=a");

		// a bare authority still yields the root resource
		let url = Url::parse("ws://example.com").unwrap();
		assert_eq!(&url[Position::BeforePath..Position::AfterQuery], "/");
	}
}
