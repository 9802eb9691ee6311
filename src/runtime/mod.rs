// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Exports
//==============================================================================

pub mod types;

pub use self::types::MacAddress;

//==============================================================================
// Imports
//==============================================================================

use crate::fail::Fail;
use ::std::{net::Ipv4Addr, time::Duration};

//==============================================================================
// Structures
//==============================================================================

/// Outcome of a bounded receive call.
#[derive(Debug)]
pub enum Received {
    /// A frame arrived. `len` is the length on the wire, which may exceed the
    /// capacity of the buffer the frame was copied into (truncated delivery).
    Frame {
        len: usize,
        if_index: u32,
        src_mac: MacAddress,
        dst_mac: MacAddress,
    },
    /// The timeout elapsed with nothing to deliver.
    Timeout,
    /// The underlying device reached end of file.
    Eof,
}

//==============================================================================
// Traits
//==============================================================================

/// Hardware abstraction consumed by the router engine.
///
/// Implementations own the interface configuration, the monotonic clock, ARP
/// resolution, and the actual frame I/O. The engine never blocks anywhere but
/// inside [`receive`](RouterRuntime::receive), which is bounded by the
/// supplied timeout.
pub trait RouterRuntime {
    /// Returns the IPv4 address of every local interface, indexed by
    /// interface ordinal.
    fn local_addrs(&self) -> Vec<Ipv4Addr>;

    /// Returns milliseconds of monotonic time.
    fn ticks(&self) -> u64;

    /// Receives at most one IPv4 frame into `buf`, waiting up to `timeout`.
    fn receive(&self, buf: &mut [u8], timeout: Duration) -> Result<Received, Fail>;

    /// Transmits an IPv4 frame out of the given interface.
    fn transmit(&self, if_index: u32, buf: &[u8], dst_mac: MacAddress) -> Result<(), Fail>;

    /// Resolves an IPv4 address to a link-layer address on the given
    /// interface. Multicast groups resolve to their derived MAC.
    fn arp_lookup(&self, if_index: u32, addr: Ipv4Addr) -> Result<MacAddress, Fail>;
}
