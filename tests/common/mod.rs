// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

pub mod runtime;

pub use runtime::DummyRuntime;

use ::ripstack::{
    protocols::{
        ip::IpProtocol,
        ipv4::Ipv4Header,
        rip::{RipMessage, RIP_MULTICAST_ADDR, RIP_PORT},
        udp::{UdpHeader, UDP_HEADER_SIZE},
    },
    runtime::MacAddress,
};
use ::std::{collections::HashMap, net::Ipv4Addr};

//==============================================================================
// Constants
//==============================================================================

pub const ROUTER_IF0_ADDR: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
pub const ROUTER_IF1_ADDR: Ipv4Addr = Ipv4Addr::new(10, 0, 1, 1);

pub const ALICE_MAC: MacAddress = MacAddress::new([0x12, 0x23, 0x45, 0x67, 0x89, 0xab]);
pub const ALICE_ADDR: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 2);
pub const BOB_MAC: MacAddress = MacAddress::new([0xab, 0x89, 0x67, 0x45, 0x23, 0x12]);
pub const BOB_ADDR: Ipv4Addr = Ipv4Addr::new(10, 0, 1, 2);
pub const CARRIE_MAC: MacAddress = MacAddress::new([0xef, 0xcd, 0xab, 0x89, 0x67, 0x45]);
pub const CARRIE_ADDR: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 7);

pub const ROUTER_MAC: MacAddress = MacAddress::new([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);

/// Derived group MAC for 224.0.0.9.
pub const MULTICAST_MAC: MacAddress = MacAddress::new([0x01, 0x00, 0x5e, 0x00, 0x00, 0x09]);

//==============================================================================
// Standalone Functions
//==============================================================================

/// Static ARP table shared by the scenarios.
pub fn arp() -> HashMap<Ipv4Addr, MacAddress> {
    let mut arp: HashMap<Ipv4Addr, MacAddress> = HashMap::new();
    arp.insert(ALICE_ADDR, ALICE_MAC);
    arp.insert(BOB_ADDR, BOB_MAC);
    arp.insert(CARRIE_ADDR, CARRIE_MAC);
    arp.insert(RIP_MULTICAST_ADDR, MULTICAST_MAC);
    arp
}

/// Builds an IPv4+UDP wrapped RIP frame as a neighbor would put it on the
/// wire.
pub fn rip_frame(src_addr: Ipv4Addr, dst_addr: Ipv4Addr, message: &RipMessage) -> Vec<u8> {
    let rip_len: usize = message.compute_size();
    let mut frame: Vec<u8> = vec![0; 28 + rip_len];
    message.serialize(&mut frame[28..]);
    UdpHeader::new(RIP_PORT, RIP_PORT).serialize(&mut frame[20..28], rip_len);
    let mut ip_header: Ipv4Header = Ipv4Header::new(src_addr, dst_addr, IpProtocol::Udp);
    ip_header.set_ttl(1);
    ip_header.serialize(&mut frame[..20], UDP_HEADER_SIZE + rip_len);
    frame
}

/// Builds a transit datagram with a valid header checksum and an opaque
/// payload.
pub fn transit_frame(src_addr: Ipv4Addr, dst_addr: Ipv4Addr, ttl: u8, payload: &[u8]) -> Vec<u8> {
    let mut frame: Vec<u8> = vec![0; 20 + payload.len()];
    frame[20..].copy_from_slice(payload);
    let mut ip_header: Ipv4Header = Ipv4Header::new(src_addr, dst_addr, IpProtocol::Udp);
    ip_header.set_ttl(ttl);
    ip_header.serialize(&mut frame[..20], payload.len());
    frame
}
