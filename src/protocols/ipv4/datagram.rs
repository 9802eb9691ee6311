// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Imports
//==============================================================================

use crate::{
    fail::Fail,
    protocols::{ip::IpProtocol, ipv4::checksum},
};
use ::byteorder::{ByteOrder, NetworkEndian};
use ::libc::EBADMSG;
use ::std::{convert::TryInto, net::Ipv4Addr};

//==============================================================================
// Constants
//==============================================================================

/// Default size of IPv4 headers (in bytes).
pub const IPV4_HEADER_DEFAULT_SIZE: usize = 20;

/// IPv4 header length when no options are present (in 32-bit words).
const IPV4_IHL_NO_OPTIONS: u8 = (IPV4_HEADER_DEFAULT_SIZE as u8) / 4;

/// Default time to live value.
const DEFAULT_IPV4_TTL: u8 = 64;

/// Version number for IPv4.
const IPV4_VERSION: u8 = 4;

/// Byte offset of the TTL field.
const TTL_OFFSET: usize = 8;

/// Byte offset of the header checksum field.
const CHECKSUM_OFFSET: usize = 10;

/// Byte offset of the source address field.
const SRC_ADDR_OFFSET: usize = 12;

/// Byte offset of the destination address field.
const DST_ADDR_OFFSET: usize = 16;

//==============================================================================
// Structures
//==============================================================================

/// Egress IPv4 datagram header.
///
/// Fields the router never varies (TOS, identification, fragmentation) are
/// fixed to zero at serialization time.
#[derive(Debug, Copy, Clone)]
pub struct Ipv4Header {
    /// Time to live.
    ttl: u8,
    /// Protocol used in the data portion of the datagram.
    protocol: IpProtocol,
    /// Source IP address.
    src_addr: Ipv4Addr,
    /// Destination IP address.
    dst_addr: Ipv4Addr,
}

//==============================================================================
// Associated Functions
//==============================================================================

/// Associated functions for IPv4 headers.
impl Ipv4Header {
    /// Instantiates an IPv4 header.
    pub fn new(src_addr: Ipv4Addr, dst_addr: Ipv4Addr, protocol: IpProtocol) -> Self {
        Self {
            ttl: DEFAULT_IPV4_TTL,
            protocol,
            src_addr,
            dst_addr,
        }
    }

    /// Overrides the time-to-live of the target header.
    pub fn set_ttl(&mut self, ttl: u8) {
        self.ttl = ttl;
    }

    /// Computes the size of the target IPv4 header.
    pub fn compute_size(&self) -> usize {
        IPV4_HEADER_DEFAULT_SIZE
    }

    /// Serializes the target IPv4 header, computing the header checksum.
    pub fn serialize(&self, buf: &mut [u8], payload_len: usize) {
        let buf: &mut [u8; IPV4_HEADER_DEFAULT_SIZE] = buf.try_into().expect("buffer too small");

        // Version + IHL.
        buf[0] = (IPV4_VERSION << 4) | IPV4_IHL_NO_OPTIONS;

        // Type of service.
        buf[1] = 0;

        // Total length.
        NetworkEndian::write_u16(
            &mut buf[2..4],
            (IPV4_HEADER_DEFAULT_SIZE + payload_len) as u16,
        );

        // Identification.
        NetworkEndian::write_u16(&mut buf[4..6], 0);

        // Fragment flags and offset.
        NetworkEndian::write_u16(&mut buf[6..8], 0);

        // Time to live.
        buf[TTL_OFFSET] = self.ttl;

        // Protocol.
        buf[9] = self.protocol as u8;

        // Checksum field is zero while the sum is taken.
        NetworkEndian::write_u16(&mut buf[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2], 0);

        // Source address.
        buf[SRC_ADDR_OFFSET..SRC_ADDR_OFFSET + 4].copy_from_slice(&self.src_addr.octets());

        // Destination address.
        buf[DST_ADDR_OFFSET..DST_ADDR_OFFSET + 4].copy_from_slice(&self.dst_addr.octets());

        // Header checksum.
        let state: u16 = checksum::sum(&buf[..]);
        NetworkEndian::write_u16(&mut buf[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2], !state);
    }
}

//==============================================================================
// Standalone Functions
//==============================================================================

/// Returns the TTL field of a raw IPv4 header.
pub fn ttl(packet: &[u8]) -> u8 {
    packet[TTL_OFFSET]
}

/// Returns the source address field of a raw IPv4 header.
pub fn src_addr(packet: &[u8]) -> Ipv4Addr {
    Ipv4Addr::from(NetworkEndian::read_u32(
        &packet[SRC_ADDR_OFFSET..SRC_ADDR_OFFSET + 4],
    ))
}

/// Returns the destination address field of a raw IPv4 header.
pub fn dst_addr(packet: &[u8]) -> Ipv4Addr {
    Ipv4Addr::from(NetworkEndian::read_u32(
        &packet[DST_ADDR_OFFSET..DST_ADDR_OFFSET + 4],
    ))
}

/// Rewrites a datagram in place for forwarding.
///
/// Validates the header checksum, decrements the TTL with wrapping
/// subtraction, and patches the checksum incrementally from the words that
/// changed. Callers reject TTL 0 before forwarding; a datagram arriving with
/// TTL 1 leaves with TTL 0 and a checksum to match.
pub fn forward(packet: &mut [u8]) -> Result<(), Fail> {
    if !checksum::validate_ipv4_header(packet) {
        return Err(Fail::new(EBADMSG, "invalid IPv4 header checksum"));
    }

    // TTL shares a 16-bit word with the protocol field.
    let old_word: u16 = NetworkEndian::read_u16(&packet[TTL_OFFSET..TTL_OFFSET + 2]);
    packet[TTL_OFFSET] = packet[TTL_OFFSET].wrapping_sub(1);
    let new_word: u16 = NetworkEndian::read_u16(&packet[TTL_OFFSET..TTL_OFFSET + 2]);

    // One's-complement addition is linear, so adding the complement of the
    // old word and the new word to the complemented stored checksum is
    // equivalent to recomputing the sum from scratch.
    let stored: u16 = NetworkEndian::read_u16(&packet[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2]);
    let state: u32 = (!stored as u32) + (!old_word as u32) + (new_word as u32);
    NetworkEndian::write_u16(
        &mut packet[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2],
        !checksum::fold(state),
    );

    Ok(())
}

//==============================================================================
// Unit Tests
//==============================================================================
