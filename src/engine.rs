// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Imports
//==============================================================================

use crate::{
    config::RipConfig,
    fail::Fail,
    protocols::{
        ip::IpProtocol,
        ipv4::{checksum, datagram, Ipv4Header, IPV4_HEADER_DEFAULT_SIZE},
        rip::{
            message::RIP_PAYLOAD_OFFSET, RipCommand, RipMessage, RIP_METRIC_INFINITY,
            RIP_MULTICAST_ADDR, RIP_PORT,
        },
        udp::{UdpHeader, UDP_HEADER_SIZE},
    },
    route::{prefix_mask, Route, RoutingTable},
    runtime::{MacAddress, Received, RouterRuntime},
};
use ::libc::EINVAL;
use ::std::net::Ipv4Addr;

//==============================================================================
// Constants
//==============================================================================

/// Size of the reusable receive and transmit buffers (in bytes).
const BUFFER_SIZE: usize = 2048;

/// Prefix length of the direct route installed for each local interface.
const DIRECT_ROUTE_PREFIX_LEN: u8 = 24;

/// Metric of directly attached networks.
const DIRECT_ROUTE_METRIC: u32 = 1;

/// TTL for RIP egress: advertisements never leave the local link.
const RIP_TTL: u8 = 1;

//==============================================================================
// Structures
//==============================================================================

/// The router control loop.
///
/// Owns the routing table, the advertisement timers, and two reusable frame
/// buffers. All I/O goes through the [`RouterRuntime`] the engine was built
/// over; the loop blocks only inside the bounded receive call.
pub struct Engine<RT: RouterRuntime> {
    /// Underlying hardware abstraction.
    rt: RT,
    /// Control-plane configuration.
    config: RipConfig,
    /// Local interface addresses, indexed by interface ordinal.
    addrs: Vec<Ipv4Addr>,
    /// The routing table.
    table: RoutingTable,
    /// Timestamp of the last unsolicited advertisement (ms).
    last_periodic: u64,
    /// Timestamp of the last triggered update (ms), if any was sent.
    last_triggered: Option<u64>,
    /// Inbound frame buffer.
    rx_buf: [u8; BUFFER_SIZE],
    /// Outbound assembly buffer.
    tx_buf: [u8; BUFFER_SIZE],
}

//==============================================================================
// Associated Functions
//==============================================================================

/// Associated functions for router engines.
impl<RT: RouterRuntime> Engine<RT> {
    /// Instantiates an engine over the given runtime, installing one direct
    /// route per local interface.
    pub fn new(rt: RT, config: RipConfig) -> Result<Self, Fail> {
        let addrs: Vec<Ipv4Addr> = rt.local_addrs();
        if addrs.is_empty() {
            return Err(Fail::new(EINVAL, "no local interfaces"));
        }

        let mut table: RoutingTable = RoutingTable::new();
        for (i, addr) in addrs.iter().enumerate() {
            let network: u32 = u32::from(*addr) & prefix_mask(DIRECT_ROUTE_PREFIX_LEN);
            table.upsert(Route {
                prefix: Ipv4Addr::from(network),
                prefix_len: DIRECT_ROUTE_PREFIX_LEN,
                if_index: i as u32,
                nexthop: Ipv4Addr::UNSPECIFIED,
                metric: DIRECT_ROUTE_METRIC,
            });
        }

        let last_periodic: u64 = rt.ticks();
        Ok(Self {
            rt,
            config,
            addrs,
            table,
            last_periodic,
            last_triggered: None,
            rx_buf: [0; BUFFER_SIZE],
            tx_buf: [0; BUFFER_SIZE],
        })
    }

    /// Returns the routing table of the target engine.
    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// Returns the underlying runtime of the target engine.
    pub fn rt(&self) -> &RT {
        &self.rt
    }

    /// Runs the control loop until the runtime reports end of file.
    pub fn run(&mut self) -> Result<(), Fail> {
        while self.poll()? {}
        Ok(())
    }

    /// Executes one iteration of the control loop: at most one periodic
    /// advertisement, then at most one received frame processed to
    /// completion. Returns false when the runtime reached end of file.
    pub fn poll(&mut self) -> Result<bool, Fail> {
        let now: u64 = self.rt.ticks();
        if now.saturating_sub(self.last_periodic) >= as_millis(self.config.update_interval()) {
            info!("periodic advertisement");
            self.advertise(None)?;
            self.last_periodic = now;
        }

        let timeout = self.config.receive_timeout();
        let received: Received = self.rt.receive(&mut self.rx_buf, timeout)?;
        let (len, if_index, src_mac) = match received {
            Received::Frame {
                len,
                if_index,
                src_mac,
                ..
            } => (len, if_index, src_mac),
            Received::Timeout => return Ok(true),
            Received::Eof => {
                info!("end of file, shutting down");
                return Ok(false);
            }
        };

        // Truncated deliveries, runt frames, and frames from interfaces we
        // are not configured for are dropped without a diagnostic.
        if len > self.rx_buf.len() || len < IPV4_HEADER_DEFAULT_SIZE {
            return Ok(true);
        }
        if (if_index as usize) >= self.addrs.len() {
            return Ok(true);
        }

        if !checksum::validate_ipv4_header(&self.rx_buf[..len]) {
            debug!("dropping frame with invalid header checksum");
            return Ok(true);
        }

        let src_addr: Ipv4Addr = datagram::src_addr(&self.rx_buf);
        let dst_addr: Ipv4Addr = datagram::dst_addr(&self.rx_buf);

        if self.is_local(dst_addr) {
            self.receive_rip(now, if_index, src_mac, src_addr, len)?;
        } else {
            self.forward_datagram(dst_addr, len)?;
        }
        Ok(true)
    }

    /// Returns whether an address is for local delivery: one of our
    /// interface addresses, or the RIP multicast group.
    fn is_local(&self, addr: Ipv4Addr) -> bool {
        addr == RIP_MULTICAST_ADDR || self.addrs.contains(&addr)
    }

    /// Handles a locally addressed frame: parse as RIP and dispatch on the
    /// command. Anything that does not parse is dropped.
    fn receive_rip(
        &mut self,
        now: u64,
        if_index: u32,
        src_mac: MacAddress,
        src_addr: Ipv4Addr,
        len: usize,
    ) -> Result<(), Fail> {
        let message: RipMessage = match RipMessage::parse(&self.rx_buf[..len]) {
            Ok(message) => message,
            Err(e) => {
                debug!("dropping local datagram from {}: {:?}", src_addr, e);
                return Ok(());
            }
        };

        match message.command {
            RipCommand::Request => self.answer_request(if_index, src_mac, src_addr),
            RipCommand::Response => self.process_response(now, if_index, src_addr, &message),
        }
    }

    /// Answers a whole-table request: the full dump, split horizon disabled,
    /// unicast straight back to the asking neighbor.
    fn answer_request(
        &mut self,
        if_index: u32,
        src_mac: MacAddress,
        src_addr: Ipv4Addr,
    ) -> Result<(), Fail> {
        info!("answering request from {}", src_addr);
        let local_addr: Ipv4Addr = self.addrs[if_index as usize];
        let messages: Vec<RipMessage> = self.table.dump(None);
        for message in &messages {
            self.send_rip(if_index, local_addr, src_addr, src_mac, message)?;
        }
        Ok(())
    }

    /// Merges an advertisement into the routing table (RFC 2453 3.9.2) and
    /// emits a rate-limited triggered update if anything changed.
    fn process_response(
        &mut self,
        now: u64,
        if_index: u32,
        src_addr: Ipv4Addr,
        message: &RipMessage,
    ) -> Result<(), Fail> {
        let mut triggered: bool = false;
        for entry in &message.entries {
            // Routes that would advance to infinity through us are ignored.
            let new_metric: u32 = entry.metric + 1;
            if new_metric >= RIP_METRIC_INFINITY {
                continue;
            }

            let prefix_len: u8 = entry.prefix_len();
            let candidate: Route = Route {
                prefix: entry.addr,
                prefix_len,
                if_index,
                nexthop: src_addr,
                metric: new_metric,
            };

            let install: bool = match self.table.lookup(entry.addr, prefix_len) {
                // Unknown prefix.
                None => true,
                // The advertising neighbor owns the route: refresh it.
                Some(existing) if existing.nexthop == src_addr => true,
                // Someone else's route: only a strict improvement wins.
                Some(existing) => new_metric < existing.metric,
            };
            if install {
                info!("installing {}", candidate);
                self.table.upsert(candidate);
                triggered = true;
            }
        }

        if triggered && self.holddown_elapsed(now) {
            info!("triggered update provoked on interface {}", if_index);
            self.advertise(Some(if_index))?;
            self.last_triggered = Some(now);
        }
        Ok(())
    }

    /// Returns whether enough time has passed since the last triggered
    /// update (RFC 2453 3.10.1).
    fn holddown_elapsed(&self, now: u64) -> bool {
        match self.last_triggered {
            None => true,
            Some(last) => {
                now.saturating_sub(last) >= as_millis(self.config.triggered_holddown())
            }
        }
    }

    /// Emits the full-table advertisement: per interface, the split-horizon
    /// dump, multicast to the RIP group. `skip_if` suppresses one interface
    /// entirely (the one a triggered update came in on).
    fn advertise(&mut self, skip_if: Option<u32>) -> Result<(), Fail> {
        for i in 0..self.addrs.len() as u32 {
            if skip_if == Some(i) {
                continue;
            }
            let dst_mac: MacAddress = match self.rt.arp_lookup(i, RIP_MULTICAST_ADDR) {
                Ok(mac) => mac,
                Err(e) => {
                    warn!("cannot resolve multicast group on interface {}: {:?}", i, e);
                    continue;
                }
            };
            let local_addr: Ipv4Addr = self.addrs[i as usize];
            let messages: Vec<RipMessage> = self.table.dump(Some(i));
            for message in &messages {
                self.send_rip(i, local_addr, RIP_MULTICAST_ADDR, dst_mac, message)?;
            }
        }
        Ok(())
    }

    /// Wraps one RIP message in UDP and IPv4 and transmits it.
    fn send_rip(
        &mut self,
        if_index: u32,
        src_addr: Ipv4Addr,
        dst_addr: Ipv4Addr,
        dst_mac: MacAddress,
        message: &RipMessage,
    ) -> Result<(), Fail> {
        let rip_len: usize = message.serialize(&mut self.tx_buf[RIP_PAYLOAD_OFFSET..]);
        let udp_len: usize = UDP_HEADER_SIZE + rip_len;

        let udp_header: UdpHeader = UdpHeader::new(RIP_PORT, RIP_PORT);
        udp_header.serialize(
            &mut self.tx_buf[IPV4_HEADER_DEFAULT_SIZE..RIP_PAYLOAD_OFFSET],
            rip_len,
        );

        let mut ip_header: Ipv4Header = Ipv4Header::new(src_addr, dst_addr, IpProtocol::Udp);
        ip_header.set_ttl(RIP_TTL);
        ip_header.serialize(&mut self.tx_buf[..IPV4_HEADER_DEFAULT_SIZE], udp_len);

        let total: usize = IPV4_HEADER_DEFAULT_SIZE + udp_len;
        self.rt.transmit(if_index, &self.tx_buf[..total], dst_mac)
    }

    /// Forwards a transit datagram by longest-prefix match.
    fn forward_datagram(&mut self, dst_addr: Ipv4Addr, len: usize) -> Result<(), Fail> {
        let route: Route = match self.table.query(dst_addr) {
            Some(route) => *route,
            None => {
                debug!("no route to {}", dst_addr);
                return Ok(());
            }
        };

        // A direct route delivers to the destination itself.
        let nexthop: Ipv4Addr = if route.is_direct() {
            dst_addr
        } else {
            route.nexthop
        };
        let dst_mac: MacAddress = match self.rt.arp_lookup(route.if_index, nexthop) {
            Ok(mac) => mac,
            Err(e) => {
                debug!("cannot resolve nexthop {}: {:?}", nexthop, e);
                return Ok(());
            }
        };

        if datagram::ttl(&self.rx_buf) == 0 {
            debug!("TTL exhausted on datagram for {}", dst_addr);
            return Ok(());
        }

        self.tx_buf[..len].copy_from_slice(&self.rx_buf[..len]);
        if let Err(e) = datagram::forward(&mut self.tx_buf[..len]) {
            debug!("dropping datagram for {}: {:?}", dst_addr, e);
            return Ok(());
        }
        debug!("forwarding {} via interface {}", dst_addr, route.if_index);
        self.rt.transmit(route.if_index, &self.tx_buf[..len], dst_mac)
    }
}

//==============================================================================
// Standalone Functions
//==============================================================================

/// Converts a duration to whole milliseconds for tick arithmetic.
fn as_millis(duration: ::std::time::Duration) -> u64 {
    duration.as_millis() as u64
}
