//! A client-side WebSocket (RFC6455) endpoint built on a plain byte
//! stream.
//!
//! The heart of the crate is the frame codec: [`FrameDecoder`], an
//! incremental state machine that assembles frames out of whatever
//! slices the transport delivers, and the matching frame builders that
//! serialize masked client frames. [`Client`] and [`ClientBuilder`]
//! wrap the codec with the opening HTTP upgrade handshake and surface
//! whole messages, pings, pongs and closes as [`Event`]s.
//!
//! TLS, subprotocol negotiation and permessage-deflate are out of
//! scope; the codec consumes and produces plain bytes.
//!
//!```no_run
//!use websocket_client::{ClientBuilder, Event};
//!
//!let mut client = ClientBuilder::new("ws://127.0.0.1:1234")
//!    .unwrap()
//!    .connect_insecure()
//!    .unwrap();
//!
//!client.send_text("Hello, World!").unwrap();
//!
//!match client.recv_event().unwrap() {
//!    Event::Text(text) => println!("< {}", text),
//!    Event::Ping(payload) => client.send_pong(&payload).unwrap(),
//!    _ => {}
//!}
//!```

#![warn(missing_docs)]

#[macro_use]
extern crate bitflags;

pub mod client;
pub mod codec;
pub mod dataframe;
pub mod handshake;
pub mod header;
pub mod message;
pub mod result;
pub mod stream;

pub use crate::client::{Client, ClientBuilder};
pub use crate::codec::{Context, FrameCodec, FrameDecoder};
pub use crate::dataframe::{Frame, Opcode};
pub use crate::message::{CloseData, Event};
pub use crate::result::{FrameError, WebSocketError, WebSocketResult};
