//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! # Telnet Protocol Codec
//!
//! A [`tokio_util::codec`] `Decoder`/`Encoder` pair implementing RFC 854 and its
//! companion option RFCs: IAC escaping, control-command parsing, RFC 1143
//! option negotiation (the Q-method), and subnegotiation framing.
//!
//! ## Core Components
//!
//! - [`TelnetCodec`] drives the decode/encode DFA and owns the per-option
//!   RFC 1143 Q-method negotiation state.
//! - [`TelnetFrame`] is the wire vocabulary: data bytes, control commands,
//!   negotiation verbs paired with an option, and subnegotiation payloads.
//! - [`TelnetOption`] names the options this crate negotiates: TRANSMIT-BINARY,
//!   ECHO, SUPPRESS-GO-AHEAD, STATUS, TTYPE, END-OF-RECORD, NAWS, TSPEED,
//!   LFLOW, LINEMODE, XDISPLOC, NEW-ENVIRON, and CHARSET.
//! - [`TelnetEvent`] is the semantic stream application code consumes: data
//!   bytes, control commands, decoded [`TelnetArgument`] subnegotiations, and
//!   `OptionStatus` once a negotiation settles.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use telnetkit_codec::{TelnetCodec, TelnetEvent, TelnetFrame, TelnetOption};
//! use tokio_util::codec::{Decoder, Encoder};
//! use bytes::BytesMut;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut codec = TelnetCodec::new();
//!
//! let mut buffer = BytesMut::new();
//! codec.encode(TelnetFrame::Data(b'H'), &mut buffer)?;
//! codec.enable_local(TelnetOption::Echo);
//! for frame in codec.take_outgoing() {
//!     codec.encode(frame, &mut buffer)?;
//! }
//!
//! let mut input = BytesMut::from(&b"Hello\xFF\xFD\x01"[..]); // Data + DO Echo
//! while let Some(event) = codec.decode(&mut input)? {
//!     match event {
//!         TelnetEvent::Data(byte) => println!("received: {}", byte as char),
//!         TelnetEvent::OptionStatus(opt, side, enabled) => {
//!             println!("{opt} now {enabled} on the {side:?} side")
//!         }
//!         _ => {}
//!     }
//!     for frame in codec.take_outgoing() {
//!         codec.encode(frame, &mut buffer)?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## IAC escaping
//!
//! 0xFF (IAC) is the only byte with wire significance; a literal 0xFF data
//! byte is sent as `IAC IAC` and the decoder reverses that transparently — no
//! raw 0xFF ever reaches [`TelnetEvent::Data`] without having been the
//! escaped form.
//!
//! ## Error handling
//!
//! [`CodecError`] covers protocol-layer malformation (bad subnegotiation
//! framing, an unrecognized negotiation frame). Per the two-tier error model
//! this crate assumes, these are never fatal to a session — the layer above
//! logs and discards them; they never propagate past this crate on their own.

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]
// Using stable range APIs

mod args;
mod codec;
mod consts;
mod event;
mod frame;
mod options;
mod result;

pub use self::args::{TelnetArgument, charset, linemode, naws, newenviron, status, tspeed, ttype, xdisploc};
pub use self::codec::TelnetCodec;
pub use self::event::TelnetEvent;
pub use self::frame::TelnetFrame;
pub use self::options::{TelnetOption, TelnetSide};
pub use self::result::{CodecError, CodecResult, SubnegotiationErrorKind};
