// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Imports
//==============================================================================

use crate::fail::Fail;
use ::arrayvec::ArrayVec;
use ::byteorder::{ByteOrder, NetworkEndian};
use ::libc::{EBADMSG, ENOTSUP};
use ::num_traits::FromPrimitive;
use ::std::{convert::TryFrom, net::Ipv4Addr};

//==============================================================================
// Constants
//==============================================================================

/// Maximum number of entries in a RIP message (RFC 2453 3.6).
pub const RIP_MAX_ENTRIES: usize = 25;

/// Size of the fixed RIP header (in bytes).
pub const RIP_HEADER_SIZE: usize = 4;

/// Size of one RIP route entry (in bytes).
pub const RIP_ENTRY_SIZE: usize = 20;

/// Byte offset of the RIP payload within an IPv4 frame carrying a fixed
/// 20-byte IP header and an 8-byte UDP header.
pub const RIP_PAYLOAD_OFFSET: usize = 28;

/// Protocol version emitted and accepted.
const RIP_VERSION: u8 = 2;

/// Address family identifier for IPv4 (used in responses).
const AFI_INET: u16 = 2;

//==============================================================================
// Structures
//==============================================================================

/// RIP command field.
#[repr(u8)]
#[derive(num_derive::FromPrimitive, Copy, Clone, PartialEq, Eq, Debug)]
pub enum RipCommand {
    /// Request for (all or part of) the responder's routing table.
    Request = 1,
    /// Advertisement of routes.
    Response = 2,
}

/// One advertised route.
///
/// The subnet mask must be a canonical prefix mask (contiguous ones followed
/// by contiguous zeros); an unspecified next hop directs traffic through the
/// advertising neighbor. The metric is the semantic cost in [1, 16] where 16
/// means unreachable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RipEntry {
    /// Advertised IPv4 prefix.
    pub addr: Ipv4Addr,
    /// Subnet mask of the prefix.
    pub mask: Ipv4Addr,
    /// Gateway for the prefix.
    pub nexthop: Ipv4Addr,
    /// Cost of the route.
    pub metric: u32,
}

/// A RIP message in structured form.
///
/// The version and reserved fields are not stored: they are fixed on output
/// and validated on input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RipMessage {
    /// Command field.
    pub command: RipCommand,
    /// Route entries, densely packed.
    pub entries: ArrayVec<RipEntry, RIP_MAX_ENTRIES>,
}

//==============================================================================
// Associated Functions
//==============================================================================

/// Associated functions for RIP entries.
impl RipEntry {
    /// Returns the prefix length encoded by the subnet mask.
    pub fn prefix_len(&self) -> u8 {
        u32::from(self.mask).leading_ones() as u8
    }
}

/// Associated functions for RIP messages.
impl RipMessage {
    /// Instantiates an empty RIP message.
    pub fn new(command: RipCommand) -> Self {
        Self {
            command,
            entries: ArrayVec::new(),
        }
    }

    /// Computes the size of the target message's payload form.
    pub fn compute_size(&self) -> usize {
        RIP_HEADER_SIZE + RIP_ENTRY_SIZE * self.entries.len()
    }

    /// Parses an IPv4+UDP wrapped RIP frame into structured form.
    ///
    /// The frame is assumed to carry a fixed 20-byte IPv4 header and an
    /// 8-byte UDP header; neither checksum is validated here. The entry count
    /// is derived from the received length.
    pub fn parse(frame: &[u8]) -> Result<Self, Fail> {
        if frame.len() < RIP_PAYLOAD_OFFSET + RIP_HEADER_SIZE {
            return Err(Fail::new(EBADMSG, "RIP frame too small"));
        }

        // The IP header may not promise more bytes than were received.
        let total_length: u16 = NetworkEndian::read_u16(&frame[2..4]);
        if (total_length as usize) > frame.len() {
            return Err(Fail::new(EBADMSG, "total length exceeds frame"));
        }

        let command: RipCommand = match FromPrimitive::from_u8(frame[RIP_PAYLOAD_OFFSET]) {
            Some(command) => command,
            None => return Err(Fail::new(EBADMSG, "invalid RIP command")),
        };
        if frame[RIP_PAYLOAD_OFFSET + 1] != RIP_VERSION {
            return Err(Fail::new(ENOTSUP, "unsupported RIP version"));
        }
        if frame[RIP_PAYLOAD_OFFSET + 2] != 0 || frame[RIP_PAYLOAD_OFFSET + 3] != 0 {
            return Err(Fail::new(EBADMSG, "nonzero reserved field"));
        }

        let num_entries: usize =
            (frame.len() - RIP_PAYLOAD_OFFSET - RIP_HEADER_SIZE) / RIP_ENTRY_SIZE;
        if num_entries > RIP_MAX_ENTRIES {
            return Err(Fail::new(EBADMSG, "too many RIP entries"));
        }

        let expected_family: u16 = match command {
            RipCommand::Request => 0,
            RipCommand::Response => AFI_INET,
        };

        let mut entries: ArrayVec<RipEntry, RIP_MAX_ENTRIES> = ArrayVec::new();
        for i in 0..num_entries {
            let off: usize = RIP_PAYLOAD_OFFSET + RIP_HEADER_SIZE + i * RIP_ENTRY_SIZE;

            let family: u16 = NetworkEndian::read_u16(&frame[off..off + 2]);
            if family != expected_family {
                return Err(Fail::new(EBADMSG, "address family mismatch"));
            }
            let tag: u16 = NetworkEndian::read_u16(&frame[off + 2..off + 4]);
            if tag != 0 {
                return Err(Fail::new(EBADMSG, "nonzero route tag"));
            }

            let addr: u32 = NetworkEndian::read_u32(&frame[off + 4..off + 8]);
            let mask: u32 = NetworkEndian::read_u32(&frame[off + 8..off + 12]);
            if !is_prefix_mask(mask) {
                return Err(Fail::new(EBADMSG, "noncontiguous subnet mask"));
            }
            let nexthop: u32 = NetworkEndian::read_u32(&frame[off + 12..off + 16]);

            let metric: u32 = NetworkEndian::read_u32(&frame[off + 16..off + 20]);
            if !(1..=super::RIP_METRIC_INFINITY).contains(&metric) {
                return Err(Fail::new(EBADMSG, "metric out of range"));
            }

            entries.push(RipEntry {
                addr: Ipv4Addr::from(addr),
                mask: Ipv4Addr::from(mask),
                nexthop: Ipv4Addr::from(nexthop),
                metric,
            });
        }

        Ok(Self { command, entries })
    }

    /// Serializes the target message as a RIP payload starting at offset 0 of
    /// `buf`, filling in the fields the structured form does not store.
    /// Egress callers hand in the payload region of an already-wrapped frame.
    /// Returns the number of bytes written.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        buf[0] = self.command as u8;
        buf[1] = RIP_VERSION;
        buf[2] = 0;
        buf[3] = 0;

        let family: u16 = match self.command {
            RipCommand::Request => 0,
            RipCommand::Response => AFI_INET,
        };

        for (i, entry) in self.entries.iter().enumerate() {
            let off: usize = RIP_HEADER_SIZE + i * RIP_ENTRY_SIZE;
            NetworkEndian::write_u16(&mut buf[off..off + 2], family);
            NetworkEndian::write_u16(&mut buf[off + 2..off + 4], 0);
            buf[off + 4..off + 8].copy_from_slice(&entry.addr.octets());
            buf[off + 8..off + 12].copy_from_slice(&entry.mask.octets());
            buf[off + 12..off + 16].copy_from_slice(&entry.nexthop.octets());
            NetworkEndian::write_u32(&mut buf[off + 16..off + 20], entry.metric);
        }

        self.compute_size()
    }
}

//==============================================================================
// Standalone Functions
//==============================================================================

/// Checks that a mask is contiguous ones followed by contiguous zeros.
fn is_prefix_mask(mask: u32) -> bool {
    mask.count_ones() == mask.leading_ones()
}

//==============================================================================
// Trait Implementations
//==============================================================================

impl TryFrom<u8> for RipCommand {
    type Error = Fail;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match FromPrimitive::from_u8(n) {
            Some(command) => Ok(command),
            None => Err(Fail::new(EBADMSG, "invalid RIP command")),
        }
    }
}

//==============================================================================
// Unit Tests
//==============================================================================
