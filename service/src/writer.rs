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

//! [`TelnetWriter`]: a shell's handle onto the outbound half of a session.
//!
//! Every write is a message on a bounded channel into the session's run
//! loop, which owns the socket. The channel's own backpressure — `send`
//! suspending once the channel is full — is what gives `drain` its meaning:
//! a full round trip through the channel means everything sent before it
//! has at least been handed to the loop for encoding.

use crate::error::{Result, SessionError};
use crate::info::SessionInfo;
use telnetkit_codec::{TelnetFrame, TelnetOption};
use tokio::sync::{mpsc, oneshot};

const CR: u8 = 0x0D;
const LF: u8 = 0x0A;
const NUL: u8 = 0x00;

/// A message the writer hands to the session's run loop for encoding.
pub(crate) enum WriterMessage {
    /// Raw data bytes, IAC-escaped by the loop on the way to the socket.
    Data(Vec<u8>),
    /// A control frame (negotiation verb, command, or subnegotiation).
    Frame(TelnetFrame),
    /// Acknowledge receipt once every prior message has been processed.
    Drain(oneshot::Sender<()>),
    /// Close the connection after flushing anything already queued.
    Close,
}

/// A shell's handle onto a session's outbound stream.
#[derive(Clone)]
pub struct TelnetWriter {
    tx: mpsc::Sender<WriterMessage>,
    info: SessionInfo,
}

impl TelnetWriter {
    pub(crate) fn new(tx: mpsc::Sender<WriterMessage>, info: SessionInfo) -> Self {
        TelnetWriter { tx, info }
    }

    /// This session's negotiated metadata: peer address, terminal
    /// capabilities, and the values last reported for TTYPE/NAWS/TSPEED/
    /// XDISPLOC/CHARSET.
    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    async fn send(&self, message: WriterMessage) -> Result<()> {
        self.tx
            .send(message)
            .await
            .map_err(|_| SessionError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "session closed")))
    }

    /// Enqueues raw data bytes. `0xFF` bytes are IAC-escaped on the way out;
    /// no line-ending translation happens here, use [`Self::write_line`] for that.
    pub async fn write(&self, data: &[u8]) -> Result<()> {
        self.send(WriterMessage::Data(data.to_vec())).await
    }

    /// Enqueues `line`, translating embedded `LF` to `CRLF`, escaping a bare
    /// `CR` (one not immediately followed by `LF`) as `CR NUL` per RFC 854
    /// §2.4, and appending a trailing `CRLF` if `line` doesn't already end
    /// in one.
    pub async fn write_line(&self, line: &[u8]) -> Result<()> {
        let mut out = Vec::with_capacity(line.len() + 2);
        let mut i = 0;
        while i < line.len() {
            match line[i] {
                LF => {
                    out.push(CR);
                    out.push(LF);
                    i += 1;
                }
                CR if line.get(i + 1) == Some(&LF) => {
                    out.push(CR);
                    out.push(LF);
                    i += 2;
                }
                CR => {
                    out.push(CR);
                    out.push(NUL);
                    i += 1;
                }
                other => {
                    out.push(other);
                    i += 1;
                }
            }
        }
        if !out.ends_with(&[CR, LF]) {
            out.push(CR);
            out.push(LF);
        }
        self.write(&out).await
    }

    /// Writes each item in `lines` as its own terminated line.
    pub async fn write_lines<I, L>(&self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        for line in lines {
            self.write_line(line.as_ref()).await?;
        }
        Ok(())
    }

    /// Sends a raw [`TelnetFrame`] — a negotiation verb, command, or
    /// subnegotiation — unescaped, exactly as the codec encodes it.
    pub async fn send_frame(&self, frame: TelnetFrame) -> Result<()> {
        self.send(WriterMessage::Frame(frame)).await
    }

    /// Offers or requests `option`: `cmd` must be one of WILL/WONT/DO/DONT.
    pub async fn iac(&self, cmd: u8, option: TelnetOption) -> Result<()> {
        const WILL: u8 = 251;
        const WONT: u8 = 252;
        const DO: u8 = 253;
        const DONT: u8 = 254;
        let frame = match cmd {
            WILL => TelnetFrame::Will(option),
            WONT => TelnetFrame::Wont(option),
            DO => TelnetFrame::Do(option),
            DONT => TelnetFrame::Dont(option),
            other => {
                return Err(SessionError::Shell(format!("iac: 0x{other:02X} is not a negotiation verb")));
            }
        };
        self.send_frame(frame).await
    }

    /// Sends `IAC GA`.
    pub async fn send_ga(&self) -> Result<()> {
        self.send_frame(TelnetFrame::GoAhead).await
    }

    /// Sends `IAC EOR`.
    pub async fn send_eor(&self) -> Result<()> {
        self.send_frame(TelnetFrame::EndOfRecord).await
    }

    /// Waits until every message enqueued before this call has been handed
    /// to the socket.
    pub async fn drain(&self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.send(WriterMessage::Drain(ack_tx)).await?;
        ack_rx
            .await
            .map_err(|_| SessionError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "session closed")))
    }

    /// Requests the session close the connection once queued writes flush.
    pub async fn close(&self) -> Result<()> {
        self.send(WriterMessage::Close).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harness() -> (TelnetWriter, mpsc::Receiver<WriterMessage>) {
        let (tx, rx) = mpsc::channel(8);
        let addr: std::net::SocketAddr = "127.0.0.1:2323".parse().unwrap();
        let info = SessionInfo::new(addr, std::time::Duration::from_secs(60), 80, 24);
        (TelnetWriter::new(tx, info), rx)
    }

    #[tokio::test]
    async fn write_line_translates_lf_to_crlf() {
        let (writer, mut rx) = harness();
        writer.write_line(b"hello\n").await.unwrap();
        match rx.recv().await.unwrap() {
            WriterMessage::Data(bytes) => assert_eq!(bytes, b"hello\r\n"),
            _ => panic!("expected data message"),
        }
    }

    #[tokio::test]
    async fn write_line_appends_missing_terminator() {
        let (writer, mut rx) = harness();
        writer.write_line(b"no terminator").await.unwrap();
        match rx.recv().await.unwrap() {
            WriterMessage::Data(bytes) => assert_eq!(bytes, b"no terminator\r\n"),
            _ => panic!("expected data message"),
        }
    }

    #[tokio::test]
    async fn write_line_escapes_bare_cr_as_cr_nul() {
        let (writer, mut rx) = harness();
        writer.write_line(b"a\rb").await.unwrap();
        match rx.recv().await.unwrap() {
            WriterMessage::Data(bytes) => assert_eq!(bytes, [b'a', CR, NUL, b'b', CR, LF]),
            _ => panic!("expected data message"),
        }
    }

    #[tokio::test]
    async fn iac_rejects_non_negotiation_command() {
        let (writer, _rx) = harness();
        let err = writer.iac(0x00, TelnetOption::Echo).await.unwrap_err();
        assert!(matches!(err, SessionError::Shell(_)));
    }

    #[tokio::test]
    async fn drain_acknowledges_after_loop_responds() {
        let (writer, mut rx) = harness();
        let writer2 = writer.clone();
        let drained = tokio::spawn(async move { writer2.drain().await });
        match rx.recv().await.unwrap() {
            WriterMessage::Drain(ack) => ack.send(()).unwrap(),
            _ => panic!("expected drain message"),
        }
        drained.await.unwrap().unwrap();
    }
}
