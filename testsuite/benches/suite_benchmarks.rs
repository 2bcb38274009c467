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

//! End-to-end throughput benchmark: a real client talking to a real server
//! over loopback, round-tripping lines through an echo shell.

use async_trait::async_trait;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::sync::Arc;
use telnetkit_client::{ClientSettings, connect};
use telnetkit_server::TelnetServer;
use telnetkit_session::{ServerConfig, SessionHandler, TelnetReader, TelnetWriter};
use tokio::runtime::Runtime;

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
                writer.write(&line).await.map_err(|e| e.to_string())?;
            }
        }) as Box<dyn telnetkit_session::Shell>
    })
    .await;
    server
}

fn bench_line_round_trip(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("end_to_end_round_trip");

    for count in [1usize, 10, 100].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, &count| {
            b.to_async(&rt).iter(|| async move {
                let server = start_echo_server().await;
                let addr = server.bind_address();

                let (done_tx, done_rx) = tokio::sync::oneshot::channel::<()>();
                let settings = ClientSettings::new(addr.ip().to_string(), addr.port());
                let handle = tokio::spawn(connect(
                    settings,
                    Arc::new(NoopHandler),
                    Box::new(move |mut reader: TelnetReader, writer: TelnetWriter| async move {
                        for _ in 0..black_box(count) {
                            writer.write_line(b"ping").await.map_err(|e| e.to_string())?;
                            let _ = reader.read_line().await.map_err(|e| e.to_string())?;
                        }
                        let _ = done_tx.send(());
                        Ok(())
                    }),
                ));

                let _ = done_rx.await;
                let _ = handle.await;
                server.shutdown().await;
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_line_round_trip);
criterion_main!(benches);
