// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Imports
//==============================================================================

use ::byteorder::{ByteOrder, NetworkEndian};
use ::std::convert::TryInto;

//==============================================================================
// Constants
//==============================================================================

/// Size of a UDP header (in bytes).
pub const UDP_HEADER_SIZE: usize = 8;

//==============================================================================
// Structures
//==============================================================================

/// Egress UDP datagram header.
#[derive(Debug, Copy, Clone)]
pub struct UdpHeader {
    /// Sender's port.
    src_port: u16,
    /// Receiver's port.
    dest_port: u16,
}

//==============================================================================
// Associated Functions
//==============================================================================

/// Associated functions for UDP headers.
impl UdpHeader {
    /// Instantiates a UDP header.
    pub fn new(src_port: u16, dest_port: u16) -> Self {
        Self {
            src_port,
            dest_port,
        }
    }

    /// Computes the size of the target UDP header.
    pub fn compute_size(&self) -> usize {
        UDP_HEADER_SIZE
    }

    /// Serializes the target UDP header. The checksum is left disabled, as
    /// IPv4 permits.
    pub fn serialize(&self, buf: &mut [u8], payload_len: usize) {
        let buf: &mut [u8; UDP_HEADER_SIZE] = buf.try_into().expect("buffer too small");

        NetworkEndian::write_u16(&mut buf[0..2], self.src_port);
        NetworkEndian::write_u16(&mut buf[2..4], self.dest_port);
        NetworkEndian::write_u16(&mut buf[4..6], (UDP_HEADER_SIZE + payload_len) as u16);

        // Checksum disabled.
        NetworkEndian::write_u16(&mut buf[6..8], 0);
    }
}

//==============================================================================
// Unit Tests
//==============================================================================
