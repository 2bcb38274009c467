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

//! # Telnet Session Protocol
//!
//! Turns a [`telnetkit_codec::TelnetCodec`] byte stream into a session a
//! shell can talk to: a negotiation opening appropriate to whether this
//! side accepted or initiated the connection, a [`TelnetReader`]/[`TelnetWriter`]
//! pair fed from a background task that owns the socket, and an idle
//! timeout that tears the session down if nothing happens for too long.
//!
//! # Example
//!
//! ```no_run
//! use telnetkit_session::{run_session, Role, SessionHandler, SessionOptions};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//! use tokio::net::TcpStream;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl SessionHandler for Echo {}
//!
//! # async fn run(stream: TcpStream) -> telnetkit_session::Result<()> {
//! run_session(stream, SessionOptions::default(), Role::Server, Arc::new(Echo), Box::new(
//!     |mut reader: telnetkit_session::TelnetReader, writer: telnetkit_session::TelnetWriter| async move {
//!         loop {
//!             let line = reader.read_line().await.map_err(|e| e.to_string())?;
//!             if line.is_empty() {
//!                 return Ok(());
//!             }
//!             writer.write(&line).await.map_err(|e| e.to_string())?;
//!         }
//!     },
//! ))
//! .await
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms, future_incompatible)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod handler;
mod info;
mod reader;
mod reader_unicode;
mod session;
mod writer;
mod writer_unicode;

pub use config::{ClientConfig, ServerConfig, SessionOptions};
pub use error::{Result, SessionError};
pub use handler::{CallbackHandler, SessionHandler};
pub use info::SessionInfo;
pub use reader::TelnetReader;
pub use reader_unicode::{utf8_decoder, Decoder, TelnetReaderUnicode};
pub use session::{run_session, Role, Shell};
pub use writer::TelnetWriter;
pub use writer_unicode::{utf8_encoder, Encoder, TelnetWriterUnicode};
