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

//! Reconnect policy layered on top of [`telnetkit_session::ClientConfig`].

use std::time::Duration;
use telnetkit_session::ClientConfig;

/// How many times (and how long) [`crate::connect`] will retry a failed
/// connection attempt before giving up.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconnectPolicy {
    pub(crate) enabled: bool,
    pub(crate) max_attempts: Option<u32>,
    pub(crate) minwait: Duration,
    pub(crate) maxwait: Duration,
}

impl ReconnectPolicy {
    /// A single connect attempt, no retry.
    pub fn none() -> Self {
        ReconnectPolicy {
            enabled: false,
            max_attempts: None,
            minwait: Duration::from_millis(250),
            maxwait: Duration::from_secs(5),
        }
    }

    /// Retries with exponential backoff between `minwait` and `maxwait`,
    /// bounded to at most `max_attempts` attempts (`None` for unbounded).
    pub fn retrying(max_attempts: Option<u32>, minwait: Duration, maxwait: Duration) -> Self {
        ReconnectPolicy {
            enabled: true,
            max_attempts,
            minwait,
            maxwait,
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Backoff wait before attempt number `attempt` (1-based), doubling from
    /// `minwait` and capped at `maxwait`.
    pub(crate) fn backoff(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        let scaled = self.minwait.saturating_mul(1u32 << shift);
        scaled.min(self.maxwait)
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ReconnectPolicy::none()
    }
}

/// Everything [`crate::connect`] needs: where to connect, the session
/// options to apply once connected, and the retry policy to apply if the
/// attempt fails.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientSettings {
    pub(crate) client: ClientConfig,
    pub(crate) reconnect: ReconnectPolicy,
}

impl ClientSettings {
    /// Settings for `host:port` with no reconnect on failure.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ClientSettings {
            client: ClientConfig::new(host, port),
            reconnect: ReconnectPolicy::none(),
        }
    }

    /// Replaces the underlying [`ClientConfig`] (session options, connect
    /// timeout).
    pub fn with_client_config(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    /// Sets the reconnect policy applied when a connection attempt fails.
    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    pub(crate) fn client_config(&self) -> &ClientConfig {
        &self.client
    }

    pub(crate) fn reconnect_policy(&self) -> &ReconnectPolicy {
        &self.reconnect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_until_capped() {
        let policy =
            ReconnectPolicy::retrying(None, Duration::from_millis(100), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(400));
        assert_eq!(policy.backoff(10), Duration::from_secs(1));
    }

    #[test]
    fn none_policy_is_disabled_with_no_cap() {
        let policy = ReconnectPolicy::none();
        assert!(!policy.is_enabled());
        assert_eq!(policy.max_attempts(), None);
    }

    #[test]
    fn settings_builder_overrides_reconnect_policy() {
        let settings = ClientSettings::new("localhost", 2323)
            .with_reconnect(ReconnectPolicy::retrying(Some(3), Duration::from_millis(50), Duration::from_secs(2)));
        assert!(settings.reconnect_policy().is_enabled());
        assert_eq!(settings.reconnect_policy().max_attempts(), Some(3));
    }
}
