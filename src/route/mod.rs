// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Imports
//==============================================================================

use crate::protocols::rip::{RipCommand, RipEntry, RipMessage};
use ::std::{fmt, net::Ipv4Addr, slice};

//==============================================================================
// Constants
//==============================================================================

/// Entries packed into one dumped response message. One slot below the
/// protocol maximum, matching the advertisement batching this router has
/// always used on the wire.
const DUMP_MAX_ENTRIES: usize = 24;

//==============================================================================
// Structures
//==============================================================================

/// One routing table entry.
///
/// The caller promises `prefix` is network-aligned: no bit below
/// `prefix_len` is set. An unspecified nexthop marks a directly attached
/// network.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Route {
    /// Network address of the destination prefix.
    pub prefix: Ipv4Addr,
    /// Prefix length in bits, 0 to 32.
    pub prefix_len: u8,
    /// Egress interface ordinal.
    pub if_index: u32,
    /// Gateway, or unspecified for a direct route.
    pub nexthop: Ipv4Addr,
    /// Distance-vector cost, 1 to 16.
    pub metric: u32,
}

/// Routing table: an unordered collection of prefix entries keyed by
/// (prefix, prefix_len).
#[derive(Debug, Default)]
pub struct RoutingTable {
    routes: Vec<Route>,
}

//==============================================================================
// Associated Functions
//==============================================================================

/// Associated functions for routes.
impl Route {
    /// Returns whether the target route is directly attached.
    pub fn is_direct(&self) -> bool {
        self.nexthop.is_unspecified()
    }

    /// Returns the subnet mask implied by the prefix length.
    pub fn mask(&self) -> Ipv4Addr {
        Ipv4Addr::from(prefix_mask(self.prefix_len))
    }
}

/// Associated functions for routing tables.
impl RoutingTable {
    /// Instantiates an empty routing table.
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Returns the number of routes in the target table.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns whether the target table holds no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterates over the routes of the target table.
    pub fn iter(&self) -> slice::Iter<'_, Route> {
        self.routes.iter()
    }

    /// Inserts a route, replacing the entry with the same (prefix,
    /// prefix_len) key if one exists. Replacement overwrites the egress
    /// interface, the nexthop, and the metric.
    pub fn upsert(&mut self, route: Route) {
        for existing in self.routes.iter_mut() {
            if existing.prefix == route.prefix && existing.prefix_len == route.prefix_len {
                existing.if_index = route.if_index;
                existing.nexthop = route.nexthop;
                existing.metric = route.metric;
                return;
            }
        }
        self.routes.push(route);
    }

    /// Removes the route with the given key; no-op if absent.
    pub fn withdraw(&mut self, prefix: Ipv4Addr, prefix_len: u8) {
        self.routes
            .retain(|route| !(route.prefix == prefix && route.prefix_len == prefix_len));
    }

    /// Fetches the route with the given key.
    pub fn lookup(&self, prefix: Ipv4Addr, prefix_len: u8) -> Option<&Route> {
        self.routes
            .iter()
            .find(|route| route.prefix == prefix && route.prefix_len == prefix_len)
    }

    /// Longest-prefix-match query. Among covering prefixes the greatest
    /// length wins; equal lengths resolve to the earliest inserted entry.
    pub fn query(&self, addr: Ipv4Addr) -> Option<&Route> {
        let addr: u32 = u32::from(addr);
        let mut best: Option<&Route> = None;
        let mut best_len: Option<u8> = None;
        for route in self.routes.iter() {
            if let Some(len) = best_len {
                if route.prefix_len <= len {
                    continue;
                }
            }
            let mask: u32 = prefix_mask(route.prefix_len);
            if addr & mask == u32::from(route.prefix) & mask {
                best = Some(route);
                best_len = Some(route.prefix_len);
            }
        }
        best
    }

    /// Dumps the table as RIP response messages, at most 24 entries each,
    /// omitting routes learned through `exclude_if` (split horizon). Passing
    /// `None` disables the filter. An empty table still yields one empty
    /// response so a full-table advertisement is never silent.
    pub fn dump(&self, exclude_if: Option<u32>) -> Vec<RipMessage> {
        let mut messages: Vec<RipMessage> = Vec::new();
        let mut current: RipMessage = RipMessage::new(RipCommand::Response);
        for route in self.routes.iter() {
            if exclude_if == Some(route.if_index) {
                continue;
            }
            current.entries.push(RipEntry {
                addr: route.prefix,
                mask: route.mask(),
                nexthop: route.nexthop,
                metric: route.metric,
            });
            if current.entries.len() == DUMP_MAX_ENTRIES {
                messages.push(current);
                current = RipMessage::new(RipCommand::Response);
            }
        }
        if !current.entries.is_empty() || messages.is_empty() {
            messages.push(current);
        }
        messages
    }
}

//==============================================================================
// Standalone Functions
//==============================================================================

/// Returns the network mask selecting the high `len` bits, as a host-order
/// word.
pub fn prefix_mask(len: u8) -> u32 {
    match len {
        0 => 0,
        len if len >= 32 => u32::MAX,
        len => u32::MAX << (32 - len),
    }
}

//==============================================================================
// Trait Implementations
//==============================================================================

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_direct() {
            write!(
                f,
                "{}/{} dev {} metric {}",
                self.prefix, self.prefix_len, self.if_index, self.metric
            )
        } else {
            write!(
                f,
                "{}/{} via {} dev {} metric {}",
                self.prefix, self.prefix_len, self.nexthop, self.if_index, self.metric
            )
        }
    }
}

//==============================================================================
// Unit Tests
//==============================================================================
