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

//! End-to-end tests that run a real [`telnetkit_server::TelnetServer`] and
//! drive it with [`telnetkit_client::connect`] over a loopback socket,
//! exercising the full codec/session/negotiation stack together rather than
//! any one crate in isolation.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use telnetkit_client::{ClientSettings, connect};
use telnetkit_server::TelnetServer;
use telnetkit_session::{ServerConfig, SessionHandler, TelnetReader, TelnetWriter};

struct NoopHandler;

#[async_trait]
impl SessionHandler for NoopHandler {}

async fn start_echo_server() -> Arc<TelnetServer> {
    let config = ServerConfig::new("127.0.0.1:0".parse().unwrap());
    let server = TelnetServer::bind(config).await.unwrap();
    TelnetServer::serve(server.clone(), Arc::new(NoopHandler), |_peer| {
        Box::new(|mut reader: TelnetReader, writer: TelnetWriter| async move {
            loop {
                let line = reader.read_line().await.map_err(|e| e.to_string())?;
                if line.is_empty() {
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
    server
}

#[tokio::test]
async fn client_round_trips_a_line_through_the_server() {
    let server = start_echo_server().await;
    let addr = server.bind_address();

    let (reply_tx, mut reply_rx) = tokio::sync::mpsc::channel::<Vec<u8>>(4);
    let settings = ClientSettings::new(addr.ip().to_string(), addr.port());
    let handle = tokio::spawn(connect(
        settings,
        Arc::new(NoopHandler),
        Box::new(move |mut reader: TelnetReader, writer: TelnetWriter| {
            let reply_tx = reply_tx.clone();
            async move {
                writer.write_line(b"hello").await.map_err(|e| e.to_string())?;
                let line = reader.read_line().await.map_err(|e| e.to_string())?;
                let _ = reply_tx.send(line).await;
                Ok(())
            }
        }),
    ));

    let reply = tokio::time::timeout(Duration::from_secs(2), reply_rx.recv())
        .await
        .expect("timed out waiting for echo")
        .expect("channel closed without a reply");
    assert_eq!(reply, b"echo: hello\r\n");

    let _ = tokio::time::timeout(Duration::from_secs(2), handle).await;
    server.shutdown().await;
}

#[tokio::test]
async fn server_tracks_connection_count_across_a_client_session() {
    let server = start_echo_server().await;
    let addr = server.bind_address();

    let settings = ClientSettings::new(addr.ip().to_string(), addr.port());
    let handle = tokio::spawn(connect(
        settings,
        Arc::new(NoopHandler),
        Box::new(|mut reader: TelnetReader, writer: TelnetWriter| async move {
            writer.write_line(b"ping").await.map_err(|e| e.to_string())?;
            let _ = reader.read_line().await.map_err(|e| e.to_string())?;
            Ok(())
        }),
    ));

    let _ = tokio::time::timeout(Duration::from_secs(2), handle).await;
    // run_one removes the entry from the connection map only after the
    // session task finishes; give it a beat to settle.
    for _ in 0..50 {
        if server.connection_count() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(server.connection_count(), 0);
    server.shutdown().await;
}

#[tokio::test]
async fn reconnect_policy_retries_until_a_server_appears() {
    use tokio::net::TcpListener;

    // Reserve a port, then drop the listener so the first connect attempts
    // are refused, and rebind it from a background task shortly after so a
    // retry succeeds.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        let server = start_echo_server_on(addr).await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        server.shutdown().await;
    });

    let settings = ClientSettings::new(addr.ip().to_string(), addr.port()).with_reconnect(
        telnetkit_client::ReconnectPolicy::retrying(Some(10), Duration::from_millis(50), Duration::from_millis(200)),
    );
    let result = tokio::time::timeout(
        Duration::from_secs(3),
        connect(
            settings,
            Arc::new(NoopHandler),
            Box::new(|_reader: TelnetReader, _writer: TelnetWriter| async { Ok(()) }),
        ),
    )
    .await
    .expect("connect did not finish before the test timeout");
    assert!(result.is_ok());
}

async fn start_echo_server_on(addr: std::net::SocketAddr) -> Arc<TelnetServer> {
    let config = ServerConfig::new(addr);
    let server = TelnetServer::bind(config).await.unwrap();
    TelnetServer::serve(server.clone(), Arc::new(NoopHandler), |_peer| {
        Box::new(|_reader: TelnetReader, _writer: TelnetWriter| async { Ok(()) })
            as Box<dyn telnetkit_session::Shell>
    })
    .await;
    server
}

#[tokio::test]
async fn connection_refused_without_a_listening_server_surfaces_as_connect_error() {
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let settings = ClientSettings::new(addr.ip().to_string(), addr.port());
    let shell: Box<dyn telnetkit_session::Shell> =
        Box::new(|_reader: TelnetReader, _writer: TelnetWriter| async { Ok(()) });
    let result = connect(settings, Arc::new(NoopHandler), shell).await;
    assert!(result.is_err());
}
