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

//! [`SessionInfo`]: a shared, read-mostly snapshot of what a session has
//! learned about its peer, queryable from a shell without routing every
//! value through [`crate::SessionHandler`] callbacks.

use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use telnetkit_codec::linemode::{ModeFlags, SlcTable};

struct SessionInfoState {
    peer_addr: SocketAddr,
    timeout: Duration,
    term: Option<String>,
    ttype_history: Vec<String>,
    cols: u16,
    rows: u16,
    xdisploc: Option<String>,
    lang: Option<String>,
    tspeed: Option<(u32, u32)>,
    charset: Option<Vec<u8>>,
    linemode_mode: Option<ModeFlags>,
    linemode_forwardmask: Option<Vec<u8>>,
    linemode_slc: Option<SlcTable>,
}

/// A shell's handle onto session metadata: the peer address, the
/// negotiated terminal capabilities, and the values last reported for
/// TTYPE/NAWS/TSPEED/XDISPLOC/CHARSET. Updated by the session's decode loop
/// as subnegotiation replies arrive; cheap to clone and query from any task.
#[derive(Clone)]
pub struct SessionInfo {
    state: Arc<RwLock<SessionInfoState>>,
}

impl SessionInfo {
    pub(crate) fn new(peer_addr: SocketAddr, timeout: Duration, cols: u16, rows: u16) -> Self {
        SessionInfo {
            state: Arc::new(RwLock::new(SessionInfoState {
                peer_addr,
                timeout,
                term: None,
                ttype_history: Vec::new(),
                cols,
                rows,
                xdisploc: None,
                lang: None,
                tspeed: None,
                charset: None,
                linemode_mode: None,
                linemode_forwardmask: None,
                linemode_slc: None,
            })),
        }
    }

    /// The remote address of the connected peer.
    pub fn peer_addr(&self) -> SocketAddr {
        self.state.read().unwrap().peer_addr
    }

    /// The idle timeout configured for this session.
    pub fn timeout(&self) -> Duration {
        self.state.read().unwrap().timeout
    }

    /// The peer's terminal type, once reported via TTYPE.
    pub fn term(&self) -> Option<String> {
        self.state.read().unwrap().term.clone()
    }

    /// The peer's last-reported window size.
    pub fn window_size(&self) -> (u16, u16) {
        let state = self.state.read().unwrap();
        (state.cols, state.rows)
    }

    /// The peer's X display location, once reported via XDISPLOC.
    pub fn xdisploc(&self) -> Option<String> {
        self.state.read().unwrap().xdisploc.clone()
    }

    /// The language preference volunteered for CHARSET negotiation.
    pub fn lang(&self) -> Option<String> {
        self.state.read().unwrap().lang.clone()
    }

    /// The peer's transmit/receive baud rate, once reported via TSPEED.
    pub fn tspeed(&self) -> Option<(u32, u32)> {
        self.state.read().unwrap().tspeed
    }

    /// The charset the peer accepted, once a CHARSET negotiation completes.
    pub fn charset(&self) -> Option<Vec<u8>> {
        self.state.read().unwrap().charset.clone()
    }

    /// The ordered list of distinct terminal names the peer has reported,
    /// across one or more TTYPE cycling rounds.
    pub fn ttype_history(&self) -> Vec<String> {
        self.state.read().unwrap().ttype_history.clone()
    }

    /// The line-editing mode flags last negotiated via LINEMODE MODE.
    pub fn linemode_mode(&self) -> Option<ModeFlags> {
        self.state.read().unwrap().linemode_mode
    }

    /// The forward mask last negotiated via LINEMODE FORWARDMASK.
    pub fn linemode_forwardmask(&self) -> Option<Vec<u8>> {
        self.state.read().unwrap().linemode_forwardmask.clone()
    }

    /// The SLC function table last negotiated via LINEMODE SLC.
    pub fn linemode_slc(&self) -> Option<SlcTable> {
        self.state.read().unwrap().linemode_slc
    }

    pub(crate) fn set_term(&self, term: impl Into<String>) {
        self.state.write().unwrap().term = Some(term.into());
    }

    /// Records `name` as the peer's latest reported terminal type, and adds
    /// it to the cycling history if it hasn't been seen yet this round.
    /// Returns `true` if `name` was new, `false` if the peer has already
    /// reported it (the cycle has come back around).
    pub(crate) fn record_ttype(&self, name: impl Into<String>) -> bool {
        let name = name.into();
        let mut state = self.state.write().unwrap();
        state.term = Some(name.clone());
        if state.ttype_history.contains(&name) {
            false
        } else {
            state.ttype_history.push(name);
            true
        }
    }

    pub(crate) fn set_linemode_mode(&self, flags: ModeFlags) {
        self.state.write().unwrap().linemode_mode = Some(flags);
    }

    pub(crate) fn set_linemode_forwardmask(&self, mask: Vec<u8>) {
        self.state.write().unwrap().linemode_forwardmask = Some(mask);
    }

    pub(crate) fn set_linemode_slc(&self, table: SlcTable) {
        self.state.write().unwrap().linemode_slc = Some(table);
    }

    pub(crate) fn set_window_size(&self, cols: u16, rows: u16) {
        let mut state = self.state.write().unwrap();
        state.cols = cols;
        state.rows = rows;
    }

    pub(crate) fn set_xdisploc(&self, location: impl Into<String>) {
        self.state.write().unwrap().xdisploc = Some(location.into());
    }

    pub(crate) fn set_lang(&self, lang: impl Into<String>) {
        self.state.write().unwrap().lang = Some(lang.into());
    }

    pub(crate) fn set_tspeed(&self, transmit: u32, receive: u32) {
        self.state.write().unwrap().tspeed = Some((transmit, receive));
    }

    pub(crate) fn set_charset(&self, charset: Vec<u8>) {
        self.state.write().unwrap().charset = Some(charset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_defaults_until_subnegotiation_updates_them() {
        let addr: SocketAddr = "127.0.0.1:2323".parse().unwrap();
        let info = SessionInfo::new(addr, Duration::from_secs(60), 80, 24);
        assert_eq!(info.peer_addr(), addr);
        assert_eq!(info.timeout(), Duration::from_secs(60));
        assert_eq!(info.window_size(), (80, 24));
        assert_eq!(info.term(), None);
    }

    #[test]
    fn setters_are_visible_through_a_cloned_handle() {
        let addr: SocketAddr = "127.0.0.1:2323".parse().unwrap();
        let info = SessionInfo::new(addr, Duration::from_secs(60), 80, 24);
        let clone = info.clone();
        info.set_term("xterm-256color");
        info.set_window_size(132, 43);
        info.set_tspeed(38400, 38400);
        assert_eq!(clone.term(), Some("xterm-256color".to_string()));
        assert_eq!(clone.window_size(), (132, 43));
        assert_eq!(clone.tspeed(), Some((38400, 38400)));
    }

    #[test]
    fn record_ttype_builds_a_distinct_ordered_history_and_detects_the_cycle() {
        let addr: SocketAddr = "127.0.0.1:2323".parse().unwrap();
        let info = SessionInfo::new(addr, Duration::from_secs(60), 80, 24);
        assert!(info.record_ttype("xterm"));
        assert!(info.record_ttype("xterm-256color"));
        assert_eq!(info.ttype_history(), vec!["xterm".to_string(), "xterm-256color".to_string()]);
        assert_eq!(info.term(), Some("xterm-256color".to_string()));
        // the peer cycled back to the first name it reported
        assert!(!info.record_ttype("xterm"));
        assert_eq!(info.ttype_history(), vec!["xterm".to_string(), "xterm-256color".to_string()]);
    }
}
