// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Exports
//==============================================================================

pub mod message;

pub use self::message::{RipCommand, RipEntry, RipMessage, RIP_MAX_ENTRIES};

//==============================================================================
// Imports
//==============================================================================

use ::std::net::Ipv4Addr;

//==============================================================================
// Constants
//==============================================================================

/// Well-known UDP port for RIP (RFC 2453 4.1).
pub const RIP_PORT: u16 = 520;

/// Multicast group RIPv2 routers listen on.
pub const RIP_MULTICAST_ADDR: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 9);

/// Metric value denoting an unreachable destination.
pub const RIP_METRIC_INFINITY: u32 = 16;
