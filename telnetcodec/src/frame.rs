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

use crate::TelnetOption;
use crate::args::TelnetArgument;

/// A single wire-level Telnet unit: a data byte, a command, a negotiation
/// verb paired with an option, or a subnegotiation payload.
///
/// `TelnetFrame` is the vocabulary the [`crate::options::TelnetOptions`]
/// Q-method state machine and the [`crate::codec::TelnetCodec`] encoder speak.
/// Application code generally deals with the higher-level [`crate::TelnetEvent`]
/// instead.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TelnetFrame {
    /// A single data byte.
    Data(u8),
    /// No Operation.
    NoOperation,
    /// End of urgent data stream.
    DataMark,
    /// Operator pressed the Break key or the Attention key.
    Break,
    /// Interrupt the current process.
    InterruptProcess,
    /// Cancel output from the current process.
    AbortOutput,
    /// Request acknowledgment.
    AreYouThere,
    /// Request that the operator erase the previous character.
    EraseCharacter,
    /// Request that the operator erase the previous line.
    EraseLine,
    /// End of input for half-duplex connections.
    GoAhead,
    /// End of Record (RFC 885) — marks the end of a prompt.
    EndOfRecord,
    /// Ask the peer to enable `option`.
    Do(TelnetOption),
    /// Ask the peer to disable `option`.
    Dont(TelnetOption),
    /// Offer to enable `option` locally.
    Will(TelnetOption),
    /// Refuse or disable `option` locally.
    Wont(TelnetOption),
    /// A complete `IAC SB .. IAC SE` subnegotiation.
    Subnegotiate(TelnetArgument),
}
