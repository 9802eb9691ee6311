// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Imports
//==============================================================================

use crate::fail::Fail;
use ::libc::ENOTSUP;
use ::num_traits::FromPrimitive;
use ::std::convert::TryFrom;

//==============================================================================
// Structures
//==============================================================================

/// Protocol numbers carried in the IPv4 protocol field.
#[repr(u8)]
#[derive(num_derive::FromPrimitive, Copy, Clone, PartialEq, Eq, Debug)]
pub enum IpProtocol {
    /// Internet Control Message Protocol.
    Icmp = 0x01,
    /// Transmission Control Protocol.
    Tcp = 0x06,
    /// User Datagram Protocol.
    Udp = 0x11,
}

//==============================================================================
// Trait Implementations
//==============================================================================

impl TryFrom<u8> for IpProtocol {
    type Error = Fail;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match FromPrimitive::from_u8(n) {
            Some(protocol) => Ok(protocol),
            None => Err(Fail::new(ENOTSUP, "unsupported IP protocol")),
        }
    }
}
