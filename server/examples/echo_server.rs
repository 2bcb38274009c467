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

//! Echoes each line a client sends, tagged with the NAWS window size once
//! the client reports one.
//!
//! ```bash
//! cargo run --example echo_server
//! telnet localhost 2323
//! ```

use async_trait::async_trait;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use telnetkit_server::TelnetServer;
use telnetkit_session::{ServerConfig, SessionHandler, TelnetReader, TelnetWriter};

struct EchoHandler {
    cols: AtomicU16,
    rows: AtomicU16,
}

#[async_trait]
impl SessionHandler for EchoHandler {
    async fn on_naws(&self, cols: u16, rows: u16) {
        self.cols.store(cols, Ordering::Relaxed);
        self.rows.store(rows, Ordering::Relaxed);
        tracing::info!(cols, rows, "client window resized");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::new("127.0.0.1:2323".parse()?);
    let server = TelnetServer::bind(config).await?;
    let handler = Arc::new(EchoHandler {
        cols: AtomicU16::new(80),
        rows: AtomicU16::new(24),
    });

    println!("Echo server listening on {}", server.bind_address());
    println!("Connect with: telnet localhost 2323");

    TelnetServer::serve(server.clone(), handler, |peer| {
        Box::new(move |mut reader: TelnetReader, writer: TelnetWriter| async move {
            writer
                .write_line(b"Welcome. Type a line and it will be echoed back.")
                .await
                .map_err(|e| e.to_string())?;
            loop {
                let line = reader.read_line().await.map_err(|e| e.to_string())?;
                if line.is_empty() {
                    tracing::info!(%peer, "client disconnected");
                    return Ok(());
                }
                let trimmed = String::from_utf8_lossy(&line);
                if trimmed.trim().eq_ignore_ascii_case("quit") {
                    writer
                        .write_line(b"Goodbye!")
                        .await
                        .map_err(|e| e.to_string())?;
                    return Ok(());
                }
                let mut reply = Vec::with_capacity(line.len() + 6);
                reply.extend_from_slice(b"echo: ");
                reply.extend_from_slice(&line);
                writer.write_line(&reply).await.map_err(|e| e.to_string())?;
            }
        }) as Box<dyn telnetkit_session::Shell>
    })
    .await;

    tokio::signal::ctrl_c().await?;
    println!("Shutting down...");
    server.shutdown().await;
    Ok(())
}
