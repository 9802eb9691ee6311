// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Imports
//==============================================================================

use ::std::time::Duration;

//==============================================================================
// Constants
//==============================================================================

/// Interval between unsolicited full-table advertisements.
/// RFC 2453 recommends 30 seconds; tests shorten this to converge quickly.
const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(30);

/// Minimum spacing between two triggered updates (RFC 2453 3.10.1).
const DEFAULT_TRIGGERED_HOLDDOWN: Duration = Duration::from_secs(2);

/// Upper bound on a single blocking receive.
const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_secs(1);

//==============================================================================
// Structures
//==============================================================================

/// RIP control-plane configuration descriptor.
#[derive(Clone, Debug)]
pub struct RipConfig {
    /// Interval between unsolicited advertisements.
    update_interval: Duration,
    /// Rate limit for triggered updates.
    triggered_holddown: Duration,
    /// Timeout for a single receive call.
    receive_timeout: Duration,
}

//==============================================================================
// Associated Functions
//==============================================================================

/// Associated functions for RIP configuration descriptors.
impl RipConfig {
    /// Creates a configuration descriptor, defaulting any omitted value.
    pub fn new(
        update_interval: Option<Duration>,
        triggered_holddown: Option<Duration>,
        receive_timeout: Option<Duration>,
    ) -> Self {
        let mut config: RipConfig = Self::default();
        if let Some(value) = update_interval {
            config.update_interval = value;
        }
        if let Some(value) = triggered_holddown {
            config.triggered_holddown = value;
        }
        if let Some(value) = receive_timeout {
            config.receive_timeout = value;
        }
        config
    }

    /// Returns the interval between unsolicited advertisements.
    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// Returns the rate limit for triggered updates.
    pub fn triggered_holddown(&self) -> Duration {
        self.triggered_holddown
    }

    /// Returns the timeout for a single receive call.
    pub fn receive_timeout(&self) -> Duration {
        self.receive_timeout
    }
}

//==============================================================================
// Trait Implementations
//==============================================================================

impl Default for RipConfig {
    fn default() -> Self {
        Self {
            update_interval: DEFAULT_UPDATE_INTERVAL,
            triggered_holddown: DEFAULT_TRIGGERED_HOLDDOWN,
            receive_timeout: DEFAULT_RECEIVE_TIMEOUT,
        }
    }
}
