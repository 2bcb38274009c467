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

//! Benchmarks for the session reader/writer path

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use telnetkit_session::{Role, SessionOptions, Shell, TelnetReader, TelnetWriter, run_session};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Runtime;

async fn connected_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let client = TcpStream::connect(addr).await.unwrap();
    let (server, _) = listener.accept().await.unwrap();
    (server, client)
}

fn bench_session_negotiation(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("session_negotiation");

    group.bench_function("open_and_close", |b| {
        b.to_async(&rt).iter(|| async {
            let (server, mut client) = connected_pair().await;
            let handler = std::sync::Arc::new(NoopHandler);
            let shell: Box<dyn Shell> =
                Box::new(|_reader: TelnetReader, _writer: TelnetWriter| async { Ok(()) });
            let handle = tokio::spawn(run_session(
                server,
                SessionOptions::default(),
                Role::Server,
                handler,
                shell,
            ));
            let mut buf = [0u8; 256];
            // Drain whatever the opening negotiation writes, then drop the
            // client so the session observes EOF and exits.
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                client.read(&mut buf),
            )
            .await;
            drop(client);
            let _ = handle.await;
        });
    });

    group.finish();
}

fn bench_write_line_sizes(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("write_line_sizes");

    for size in [16usize, 256, 4096].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let line = "x".repeat(size);
            b.to_async(&rt).iter(|| async {
                let (server, mut client) = connected_pair().await;
                let handler = std::sync::Arc::new(NoopHandler);
                let line = line.clone();
                let shell: Box<dyn Shell> =
                    Box::new(move |_reader: TelnetReader, writer: TelnetWriter| {
                        let line = line.clone();
                        async move {
                            writer
                                .write_line(line.as_bytes())
                                .await
                                .map_err(|e| e.to_string())?;
                            Ok(())
                        }
                    });
                let handle = tokio::spawn(run_session(
                    server,
                    SessionOptions::default(),
                    Role::Server,
                    handler,
                    shell,
                ));
                let mut buf = vec![0u8; size + 256];
                loop {
                    match tokio::time::timeout(
                        std::time::Duration::from_millis(50),
                        client.read(black_box(&mut buf)),
                    )
                    .await
                    {
                        Ok(Ok(0)) | Err(_) => break,
                        Ok(Ok(_)) => continue,
                        Ok(Err(_)) => break,
                    }
                }
                drop(client);
                let _ = handle.await;
            });
        });
    }

    group.finish();
}

struct NoopHandler;

#[async_trait::async_trait]
impl telnetkit_session::SessionHandler for NoopHandler {}

criterion_group!(benches, bench_session_negotiation, bench_write_line_sizes);
criterion_main!(benches);
