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

//! Connects to a Telnet server and relays stdin/stdout, reconnecting a
//! handful of times if the initial connection is refused.
//!
//! ```bash
//! cargo run --example simple_client -- localhost 2323
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use telnetkit_client::{ClientSettings, ReconnectPolicy, connect};
use telnetkit_session::{SessionHandler, TelnetReader, TelnetWriter};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

struct PrintHandler;

#[async_trait]
impl SessionHandler for PrintHandler {
    async fn on_ttype(&self, name: &str) {
        eprintln!("(reported terminal type: {name})");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let host = args.get(1).cloned().unwrap_or_else(|| "localhost".to_string());
    let port: u16 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(2323);

    println!("Connecting to {host}:{port}...");

    let settings = ClientSettings::new(host, port).with_reconnect(ReconnectPolicy::retrying(
        Some(3),
        Duration::from_millis(250),
        Duration::from_secs(5),
    ));

    connect(
        settings,
        Arc::new(PrintHandler),
        Box::new(|mut reader: TelnetReader, writer: TelnetWriter| async move {
            let mut stdout = tokio::io::BufWriter::new(tokio::io::stdout());
            let mut input = BufReader::new(tokio::io::stdin()).lines();
            loop {
                tokio::select! {
                    line = reader.read_line() => {
                        let line = line.map_err(|e| e.to_string())?;
                        if line.is_empty() {
                            println!("\n=== Disconnected ===");
                            return Ok(());
                        }
                        stdout.write_all(&line).await.map_err(|e| e.to_string())?;
                        stdout.flush().await.map_err(|e| e.to_string())?;
                    }
                    next = input.next_line() => {
                        match next.map_err(|e| e.to_string())? {
                            Some(text) => writer.write_line(text.as_bytes()).await.map_err(|e| e.to_string())?,
                            None => return Ok(()),
                        }
                    }
                }
            }
        }),
    )
    .await?;

    Ok(())
}
