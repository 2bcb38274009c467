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

//! Benchmarks for the connect/retry path

use async_trait::async_trait;
use criterion::{Criterion, criterion_group, criterion_main};
use telnetkit_client::{ClientSettings, connect};
use telnetkit_session::{SessionHandler, Shell, TelnetReader, TelnetWriter};
use tokio::net::TcpListener;
use tokio::runtime::Runtime;

struct NoopHandler;

#[async_trait]
impl SessionHandler for NoopHandler {}

fn bench_connect_and_close(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    c.bench_function("connect_and_close", |b| {
        b.to_async(&rt).iter(|| async {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let accepted = tokio::spawn(async move {
                let _ = listener.accept().await;
            });

            let settings = ClientSettings::new(addr.ip().to_string(), addr.port());
            let shell: Box<dyn Shell> =
                Box::new(|_reader: TelnetReader, _writer: TelnetWriter| async { Ok(()) });
            let _ = connect(settings, std::sync::Arc::new(NoopHandler), shell).await;
            let _ = accepted.await;
        });
    });
}

criterion_group!(benches, bench_connect_and_close);
criterion_main!(benches);
