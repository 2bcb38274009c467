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

//! The session protocol: opens negotiation per [`Role`], dispatches a
//! [`Shell`] onto its own task, and ferries bytes between the wire and the
//! shell's [`TelnetReader`]/[`TelnetWriter`] handles until one side closes
//! or the idle timeout fires.

use crate::config::SessionOptions;
use crate::error::{Result, SessionError};
use crate::handler::SessionHandler;
use crate::info::SessionInfo;
use crate::reader::{ReaderChannel, TelnetReader};
use crate::writer::{TelnetWriter, WriterMessage};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use telnetkit_codec::linemode::Linemode;
use telnetkit_codec::newenviron::{EnvironVar, NewEnviron};
use telnetkit_codec::status::{StatusCommand, TelnetOptionStatus};
use telnetkit_codec::tspeed::TerminalSpeed;
use telnetkit_codec::ttype::TerminalType;
use telnetkit_codec::xdisploc::XDisplayLocation;
use telnetkit_codec::{charset::Charset, naws::WindowSize};
use telnetkit_codec::{TelnetArgument, TelnetCodec, TelnetEvent, TelnetFrame, TelnetOption, TelnetSide};
use tokio::net::TcpStream;
use tokio::time::Instant;
use tokio_util::codec::Framed;
use tracing::{debug, instrument, warn};

/// Which end of the connection a session represents. Determines which
/// options this side volunteers versus solicits when the session opens.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    /// Accepted an incoming connection.
    Server,
    /// Opened an outgoing connection.
    Client,
}

/// The body of a session, spawned onto its own task once negotiation opens.
///
/// `run` receives a fresh [`TelnetReader`]/[`TelnetWriter`] pair and returns
/// an error message on failure; a panic or an `Err` both end the session
/// with [`SessionError::Shell`].
#[async_trait]
pub trait Shell: Send {
    /// Runs the shell to completion against `reader`/`writer`.
    async fn run(self: Box<Self>, reader: TelnetReader, writer: TelnetWriter) -> std::result::Result<(), String>;
}

#[async_trait]
impl<F, Fut> Shell for F
where
    F: FnOnce(TelnetReader, TelnetWriter) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = std::result::Result<(), String>> + Send,
{
    async fn run(self: Box<Self>, reader: TelnetReader, writer: TelnetWriter) -> std::result::Result<(), String> {
        (*self)(reader, writer).await
    }
}

/// Runs a telnet session end to end: opens negotiation, spawns `shell` onto
/// its own task, and relays data and subnegotiation events between it and
/// `stream` until the shell finishes, the peer disconnects, or the idle
/// timeout elapses.
#[instrument(skip(stream, options, handler, shell), fields(role = ?role))]
pub async fn run_session<H>(
    stream: TcpStream,
    options: SessionOptions,
    role: Role,
    handler: Arc<H>,
    shell: Box<dyn Shell>,
) -> Result<()>
where
    H: SessionHandler,
{
    let peer_addr = stream.peer_addr()?;
    let mut framed = Framed::new(stream, TelnetCodec::new());

    for frame in opening_frames(role, framed.codec_mut()) {
        send_frame(&mut framed, frame).await?;
    }

    let (cols, rows) = options.window_size();
    let info = SessionInfo::new(peer_addr, options.timeout(), cols, rows);
    if let Some(lang) = options.lang() {
        info.set_lang(lang);
    }

    let reader_channel = ReaderChannel::new(options.limit());
    let reader = TelnetReader::new(reader_channel.clone(), info.clone());
    let (writer_tx, mut writer_rx) = tokio::sync::mpsc::channel::<WriterMessage>(64);
    let writer = TelnetWriter::new(writer_tx, info.clone());

    let mut shell_task = tokio::spawn(shell.run(reader, writer.clone()));

    let idle = options.timeout();
    let mut idle_timer = Box::pin(tokio::time::sleep(idle));

    let outcome = loop {
        tokio::select! {
            biased;

            result = &mut shell_task => {
                drain_writer_queue(&mut writer_rx, &mut framed).await?;
                match result {
                    Ok(Ok(())) => break Ok(()),
                    Ok(Err(message)) => break Err(SessionError::Shell(message)),
                    Err(join_err) => break Err(SessionError::Shell(join_err.to_string())),
                }
            }

            () = &mut idle_timer => {
                debug!("session idle timeout elapsed");
                handler.on_timeout(&writer).await;
                drain_writer_queue(&mut writer_rx, &mut framed).await?;
                shell_task.abort();
                break Err(SessionError::Timeout(idle));
            }

            message = writer_rx.recv() => {
                match message {
                    Some(WriterMessage::Close) | None => {
                        shell_task.abort();
                        break Ok(());
                    }
                    Some(other) => apply_writer_message(other, &mut framed).await?,
                }
            }

            decoded = framed.next() => {
                match decoded {
                    Some(Ok(event)) => {
                        idle_timer.as_mut().reset(Instant::now() + idle);
                        handle_event(event, role, &options, handler.as_ref(), &writer, &reader_channel, &info, framed.codec()).await?;
                        let outgoing: Vec<TelnetFrame> = framed.codec_mut().take_outgoing();
                        for frame in outgoing {
                            send_frame(&mut framed, frame).await?;
                        }
                    }
                    Some(Err(codec_err)) => {
                        warn!("discarding malformed protocol data: {codec_err}");
                    }
                    None => {
                        shell_task.abort();
                        break Ok(());
                    }
                }
            }
        }
    };

    reader_channel.close().await;
    outcome
}

async fn drain_writer_queue(
    writer_rx: &mut tokio::sync::mpsc::Receiver<WriterMessage>,
    framed: &mut Framed<TcpStream, TelnetCodec>,
) -> Result<()> {
    while let Ok(message) = writer_rx.try_recv() {
        match message {
            WriterMessage::Close => break,
            other => apply_writer_message(other, framed).await?,
        }
    }
    Ok(())
}

async fn apply_writer_message(message: WriterMessage, framed: &mut Framed<TcpStream, TelnetCodec>) -> Result<()> {
    match message {
        WriterMessage::Data(bytes) => {
            for byte in bytes {
                send_frame(framed, TelnetFrame::Data(byte)).await?;
            }
        }
        WriterMessage::Frame(frame) => send_frame(framed, frame).await?,
        WriterMessage::Drain(ack) => {
            let _ = ack.send(());
        }
        WriterMessage::Close => {}
    }
    Ok(())
}

/// Encodes and flushes one frame, translating an (in practice unreachable)
/// encode failure into the session's fatal error type.
async fn send_frame(framed: &mut Framed<TcpStream, TelnetCodec>, frame: TelnetFrame) -> Result<()> {
    framed
        .send(frame)
        .await
        .map_err(|err| SessionError::Io(std::io::Error::new(std::io::ErrorKind::Other, err.to_string())))
}

/// The negotiation this side opens with, before any bytes arrive from the
/// peer. A server solicits the client's terminal capabilities; a client
/// volunteers them.
fn opening_frames(role: Role, codec: &mut TelnetCodec) -> Vec<TelnetFrame> {
    let mut frames = Vec::new();
    match role {
        Role::Server => {
            frames.extend(codec.enable_local(TelnetOption::Echo));
            frames.extend(codec.enable_local(TelnetOption::SuppressGoAhead));
            frames.extend(codec.enable_remote(TelnetOption::Ttype));
            frames.extend(codec.enable_remote(TelnetOption::Naws));
            frames.extend(codec.enable_remote(TelnetOption::Tspeed));
            frames.extend(codec.enable_remote(TelnetOption::Xdisploc));
            frames.extend(codec.enable_remote(TelnetOption::NewEnviron));
            frames.extend(codec.enable_remote(TelnetOption::Charset));
            frames.extend(codec.enable_remote(TelnetOption::Linemode));
        }
        Role::Client => {
            frames.extend(codec.enable_local(TelnetOption::Ttype));
            frames.extend(codec.enable_local(TelnetOption::Naws));
            frames.extend(codec.enable_local(TelnetOption::Tspeed));
            frames.extend(codec.enable_local(TelnetOption::Xdisploc));
            frames.extend(codec.enable_local(TelnetOption::NewEnviron));
            frames.extend(codec.enable_local(TelnetOption::Charset));
            frames.extend(codec.enable_remote(TelnetOption::Echo));
            frames.extend(codec.enable_remote(TelnetOption::SuppressGoAhead));
            frames.extend(codec.enable_remote(TelnetOption::TransmitBinary));
        }
    }
    frames
}

async fn handle_event<H: SessionHandler>(
    event: TelnetEvent,
    role: Role,
    options: &SessionOptions,
    handler: &H,
    writer: &TelnetWriter,
    reader_channel: &Arc<ReaderChannel>,
    info: &SessionInfo,
    codec: &TelnetCodec,
) -> Result<()> {
    match event {
        TelnetEvent::Data(byte) => reader_channel.push(byte).await,
        TelnetEvent::OptionStatus(option, TelnetSide::Remote, true) if role == Role::Server => {
            poke_for_subnegotiation(option, writer, options).await?;
        }
        TelnetEvent::Subnegotiate(argument) => {
            handle_subnegotiation(argument, handler, writer, options, info, codec).await?
        }
        _ => {}
    }
    Ok(())
}

/// Once a server has negotiated a capability-reporting option on, it has to
/// ask for the value: enabling TSPEED/XDISPLOC/NEW-ENVIRON/CHARSET/TTYPE
/// only opens the channel, it doesn't request data on its own. NAWS is the
/// exception — RFC 1073 has the client push window size unprompted.
async fn poke_for_subnegotiation(option: TelnetOption, writer: &TelnetWriter, options: &SessionOptions) -> Result<()> {
    let argument = match option {
        TelnetOption::Ttype => Some(TelnetArgument::Ttype(TerminalType::Send)),
        TelnetOption::Tspeed => Some(TelnetArgument::Tspeed(TerminalSpeed::Send)),
        TelnetOption::Xdisploc => Some(TelnetArgument::Xdisploc(XDisplayLocation::Send)),
        TelnetOption::NewEnviron => Some(TelnetArgument::NewEnviron(NewEnviron::Send(Vec::new()))),
        TelnetOption::Charset => {
            let preferred = options.lang().unwrap_or("UTF-8").as_bytes().to_vec();
            Some(TelnetArgument::Charset(Charset::Request {
                sep: b';',
                charsets: vec![preferred],
            }))
        }
        _ => None,
    };
    if let Some(argument) = argument {
        writer.send_frame(TelnetFrame::Subnegotiate(argument)).await?;
    }
    Ok(())
}

/// A terminal that never repeats a name would otherwise cycle the session
/// into sending SEND forever; cap how many distinct names a round of TTYPE
/// cycling will collect before giving up on seeing a repeat.
const MAX_TTYPE_ROUNDS: usize = 8;

async fn handle_subnegotiation<H: SessionHandler>(
    argument: TelnetArgument,
    handler: &H,
    writer: &TelnetWriter,
    options: &SessionOptions,
    info: &SessionInfo,
    codec: &TelnetCodec,
) -> Result<()> {
    match argument {
        TelnetArgument::Ttype(TerminalType::Is(name)) => {
            let is_new = info.record_ttype(&name);
            handler.on_ttype(&name).await;
            if is_new && info.ttype_history().len() < MAX_TTYPE_ROUNDS {
                writer
                    .send_frame(TelnetFrame::Subnegotiate(TelnetArgument::Ttype(TerminalType::Send)))
                    .await?;
            }
        }
        TelnetArgument::Ttype(TerminalType::Send) => {
            let name = options.term().unwrap_or("UNKNOWN").to_string();
            writer
                .send_frame(TelnetFrame::Subnegotiate(TelnetArgument::Ttype(TerminalType::Is(name))))
                .await?;
        }
        TelnetArgument::Tspeed(TerminalSpeed::Is { transmit, receive }) => {
            info.set_tspeed(transmit, receive);
            handler.on_tspeed(transmit, receive).await;
        }
        TelnetArgument::Tspeed(TerminalSpeed::Send) => {
            let (transmit, receive) = options.tspeed().unwrap_or((38400, 38400));
            writer
                .send_frame(TelnetFrame::Subnegotiate(TelnetArgument::Tspeed(TerminalSpeed::Is {
                    transmit,
                    receive,
                })))
                .await?;
        }
        TelnetArgument::Xdisploc(XDisplayLocation::Is(location)) => {
            info.set_xdisploc(location.clone());
            handler.on_xdisploc(&location).await
        }
        TelnetArgument::Xdisploc(XDisplayLocation::Send) => {
            let location = options.xdisploc().unwrap_or_default().to_string();
            writer
                .send_frame(TelnetFrame::Subnegotiate(TelnetArgument::Xdisploc(XDisplayLocation::Is(
                    location,
                ))))
                .await?;
        }
        TelnetArgument::Naws(WindowSize { cols, rows }) => {
            info.set_window_size(cols, rows);
            handler.on_naws(cols, rows).await
        }
        TelnetArgument::NewEnviron(NewEnviron::Is(vars) | NewEnviron::Info(vars)) => {
            let map: HashMap<Vec<u8>, Vec<u8>> = vars
                .into_iter()
                .filter_map(|var| var.value.map(|value| (var.name, value)))
                .collect();
            handler.on_environ(&map).await;
        }
        TelnetArgument::NewEnviron(NewEnviron::Send(names)) => {
            let names: Vec<Vec<u8>> = names.into_iter().map(|var| var.name).collect();
            let answers = handler.on_request_environ(&names).await;
            let vars = answers
                .into_iter()
                .map(|(name, value)| EnvironVar { name, value: Some(value), is_uservar: false })
                .collect();
            writer
                .send_frame(TelnetFrame::Subnegotiate(TelnetArgument::NewEnviron(NewEnviron::Is(vars))))
                .await?;
        }
        TelnetArgument::Charset(Charset::Request { charsets, .. }) => {
            let reply = match handler.on_request_charset(&charsets).await {
                Some(chosen) => Charset::Accepted(chosen),
                None => Charset::Rejected,
            };
            writer
                .send_frame(TelnetFrame::Subnegotiate(TelnetArgument::Charset(reply)))
                .await?;
        }
        TelnetArgument::Charset(Charset::Accepted(name)) => {
            info.set_charset(name.clone());
            handler.on_charset(&name).await
        }
        TelnetArgument::Status(TelnetOptionStatus { command: StatusCommand::Send, .. }) => {
            // `option_status_snapshot` reports (option, local_enabled, remote_enabled);
            // `TelnetOptionStatus` wants (do_state, will_state), i.e. (remote, local).
            let options_map: HashMap<TelnetOption, (bool, bool)> = codec
                .option_status_snapshot()
                .into_iter()
                .map(|(option, local_enabled, remote_enabled)| (option, (remote_enabled, local_enabled)))
                .collect();
            writer
                .send_frame(TelnetFrame::Subnegotiate(TelnetArgument::Status(TelnetOptionStatus {
                    command: StatusCommand::Is,
                    options: options_map,
                })))
                .await?;
        }
        TelnetArgument::Linemode(linemode) => match linemode {
            Linemode::Mode(flags) => info.set_linemode_mode(flags),
            Linemode::ForwardMask(mask) => info.set_linemode_forwardmask(mask),
            Linemode::Slc(table) => info.set_linemode_slc(table),
        },
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_opens_by_soliciting_client_capabilities() {
        let mut codec = TelnetCodec::new();
        let frames = opening_frames(Role::Server, &mut codec);
        assert!(frames.contains(&TelnetFrame::Will(TelnetOption::Echo)));
        assert!(frames.contains(&TelnetFrame::Do(TelnetOption::Ttype)));
    }

    #[test]
    fn client_opens_by_volunteering_capabilities_and_soliciting_echo_sga_binary() {
        let mut codec = TelnetCodec::new();
        let frames = opening_frames(Role::Client, &mut codec);
        assert!(frames.contains(&TelnetFrame::Will(TelnetOption::Ttype)));
        assert!(frames.contains(&TelnetFrame::Do(TelnetOption::Echo)));
        assert!(frames.contains(&TelnetFrame::Do(TelnetOption::SuppressGoAhead)));
        assert!(frames.contains(&TelnetFrame::Do(TelnetOption::TransmitBinary)));
    }

    #[test]
    fn server_opens_by_soliciting_linemode() {
        let mut codec = TelnetCodec::new();
        let frames = opening_frames(Role::Server, &mut codec);
        assert!(frames.contains(&TelnetFrame::Do(TelnetOption::Linemode)));
    }

    struct NoopHandler;

    #[async_trait]
    impl SessionHandler for NoopHandler {}

    fn test_writer() -> (TelnetWriter, SessionInfo, tokio::sync::mpsc::Receiver<WriterMessage>) {
        let (tx, rx) = tokio::sync::mpsc::channel(8);
        let addr: std::net::SocketAddr = "127.0.0.1:2323".parse().unwrap();
        let info = SessionInfo::new(addr, std::time::Duration::from_secs(60), 80, 24);
        (TelnetWriter::new(tx, info.clone()), info, rx)
    }

    #[tokio::test]
    async fn naws_subnegotiation_updates_session_info() {
        let (writer, info, _rx) = test_writer();
        let handler = NoopHandler;
        let options = SessionOptions::default();
        let codec = TelnetCodec::new();
        handle_subnegotiation(TelnetArgument::Naws(WindowSize { cols: 132, rows: 43 }), &handler, &writer, &options, &info, &codec)
            .await
            .unwrap();
        assert_eq!(info.window_size(), (132, 43));
    }

    #[tokio::test]
    async fn ttype_is_subnegotiation_updates_session_info() {
        let (writer, info, mut rx) = test_writer();
        let handler = NoopHandler;
        let options = SessionOptions::default();
        let codec = TelnetCodec::new();
        handle_subnegotiation(
            TelnetArgument::Ttype(TerminalType::Is("xterm-256color".to_string())),
            &handler,
            &writer,
            &options,
            &info,
            &codec,
        )
        .await
        .unwrap();
        assert_eq!(info.term(), Some("xterm-256color".to_string()));
        assert_eq!(info.ttype_history(), vec!["xterm-256color".to_string()]);
        // a first-time name re-triggers SEND to continue the cycling round
        match rx.recv().await.unwrap() {
            WriterMessage::Frame(TelnetFrame::Subnegotiate(TelnetArgument::Ttype(TerminalType::Send))) => {}
            _ => panic!("expected a TTYPE SEND re-poke"),
        }
    }

    #[tokio::test]
    async fn ttype_cycling_stops_once_a_name_repeats() {
        let (writer, info, mut rx) = test_writer();
        let handler = NoopHandler;
        let options = SessionOptions::default();
        let codec = TelnetCodec::new();
        for name in ["xterm", "xterm-256color", "xterm"] {
            handle_subnegotiation(
                TelnetArgument::Ttype(TerminalType::Is(name.to_string())),
                &handler,
                &writer,
                &options,
                &info,
                &codec,
            )
            .await
            .unwrap();
        }
        assert_eq!(info.ttype_history(), vec!["xterm".to_string(), "xterm-256color".to_string()]);
        // two re-pokes (after "xterm" and after "xterm-256color"), none after the repeat
        rx.recv().await.unwrap();
        rx.recv().await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn status_send_replies_with_current_option_states() {
        let (writer, info, mut rx) = test_writer();
        let handler = NoopHandler;
        let options = SessionOptions::default();
        let mut codec = TelnetCodec::new();
        let _ = codec.enable_local(TelnetOption::Echo);
        handle_subnegotiation(
            TelnetArgument::Status(TelnetOptionStatus { command: StatusCommand::Send, options: HashMap::new() }),
            &handler,
            &writer,
            &options,
            &info,
            &codec,
        )
        .await
        .unwrap();
        match rx.recv().await.unwrap() {
            WriterMessage::Frame(TelnetFrame::Subnegotiate(TelnetArgument::Status(status))) => {
                assert_eq!(status.command, StatusCommand::Is);
                assert!(!status.options.is_empty());
            }
            _ => panic!("expected a STATUS reply"),
        }
    }

    #[tokio::test]
    async fn linemode_mode_subnegotiation_updates_session_info() {
        use telnetkit_codec::linemode::ModeFlags;

        let (writer, info, _rx) = test_writer();
        let handler = NoopHandler;
        let options = SessionOptions::default();
        let codec = TelnetCodec::new();
        let flags = ModeFlags { edit: true, trapsig: true, ..Default::default() };
        handle_subnegotiation(TelnetArgument::Linemode(Linemode::Mode(flags)), &handler, &writer, &options, &info, &codec)
            .await
            .unwrap();
        assert_eq!(info.linemode_mode(), Some(flags));
    }
}
