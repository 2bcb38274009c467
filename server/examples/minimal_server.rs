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

//! The smallest working Telnet server: accepts connections and logs window
//! resizes, with no shell behavior beyond holding the line open.
//!
//! ```bash
//! cargo run --example minimal_server
//! telnet localhost 2323
//! ```

use std::sync::Arc;
use telnetkit_server::TelnetServer;
use telnetkit_session::{CallbackHandler, ServerConfig, TelnetReader, TelnetWriter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::new("127.0.0.1:2323".parse()?);
    let server = TelnetServer::bind(config).await?;
    let handler = Arc::new(CallbackHandler::on_window_resize(|cols, rows| {
        println!("client window resized to {cols}x{rows}");
    }));

    println!("Minimal server running on {}", server.bind_address());
    println!("Press Ctrl+C to stop");

    TelnetServer::serve(server.clone(), handler, |_peer| {
        Box::new(|mut reader: TelnetReader, _writer: TelnetWriter| async move {
            loop {
                if reader.read_line().await.map_err(|e| e.to_string())?.is_empty() {
                    return Ok(());
                }
            }
        }) as Box<dyn telnetkit_session::Shell>
    })
    .await;

    tokio::signal::ctrl_c().await?;
    server.shutdown().await;
    Ok(())
}
