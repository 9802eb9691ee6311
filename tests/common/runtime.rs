// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//==============================================================================
// Imports
//==============================================================================

use ::crossbeam_channel::{self, TryRecvError};
use ::ripstack::{
    fail::Fail,
    runtime::{MacAddress, Received, RouterRuntime},
};
use ::std::{
    cell::{Cell, RefCell},
    cmp,
    collections::HashMap,
    net::Ipv4Addr,
    rc::Rc,
    time::Duration,
};

//==============================================================================
// Structures
//==============================================================================

/// A frame queued for delivery to the engine.
pub struct InboundFrame {
    pub if_index: u32,
    pub src_mac: MacAddress,
    pub dst_mac: MacAddress,
    pub bytes: Vec<u8>,
}

/// A frame the engine transmitted.
#[derive(Debug)]
pub struct OutboundFrame {
    pub if_index: u32,
    pub dst_mac: MacAddress,
    pub bytes: Vec<u8>,
}

/// Shared Dummy Runtime
struct SharedDummyRuntime {
    /// Incoming queue of frames.
    incoming: crossbeam_channel::Receiver<InboundFrame>,
    /// Outgoing queue of frames.
    outgoing: crossbeam_channel::Sender<OutboundFrame>,
}

/// Dummy Runtime
#[derive(Clone)]
pub struct DummyRuntime {
    /// Shared member fields.
    inner: Rc<RefCell<SharedDummyRuntime>>,
    /// Hand-advanced monotonic clock (milliseconds).
    pub clock: Rc<Cell<u64>>,
    /// Interface addresses, indexed by interface ordinal.
    addrs: Vec<Ipv4Addr>,
    /// Static ARP table.
    arp: HashMap<Ipv4Addr, MacAddress>,
}

//==============================================================================
// Associated Functions
//==============================================================================

/// Associated functions for dummy runtimes.
impl DummyRuntime {
    /// Creates a dummy runtime.
    pub fn new(
        now: u64,
        addrs: Vec<Ipv4Addr>,
        incoming: crossbeam_channel::Receiver<InboundFrame>,
        outgoing: crossbeam_channel::Sender<OutboundFrame>,
        arp: HashMap<Ipv4Addr, MacAddress>,
    ) -> Self {
        let inner = SharedDummyRuntime { incoming, outgoing };
        Self {
            inner: Rc::new(RefCell::new(inner)),
            clock: Rc::new(Cell::new(now)),
            addrs,
            arp,
        }
    }

    /// Advances the clock by the given number of milliseconds.
    pub fn advance_clock(&self, ms: u64) {
        self.clock.set(self.clock.get() + ms);
    }
}

//==============================================================================
// Trait Implementations
//==============================================================================

/// Router runtime trait implementation for dummy runtimes.
impl RouterRuntime for DummyRuntime {
    fn local_addrs(&self) -> Vec<Ipv4Addr> {
        self.addrs.clone()
    }

    fn ticks(&self) -> u64 {
        self.clock.get()
    }

    fn receive(&self, buf: &mut [u8], _timeout: Duration) -> Result<Received, Fail> {
        match self.inner.borrow_mut().incoming.try_recv() {
            Ok(frame) => {
                let len: usize = frame.bytes.len();
                let copied: usize = cmp::min(len, buf.len());
                buf[..copied].copy_from_slice(&frame.bytes[..copied]);
                Ok(Received::Frame {
                    len,
                    if_index: frame.if_index,
                    src_mac: frame.src_mac,
                    dst_mac: frame.dst_mac,
                })
            }
            Err(TryRecvError::Empty) => Ok(Received::Timeout),
            Err(TryRecvError::Disconnected) => Ok(Received::Eof),
        }
    }

    fn transmit(&self, if_index: u32, buf: &[u8], dst_mac: MacAddress) -> Result<(), Fail> {
        let frame = OutboundFrame {
            if_index,
            dst_mac,
            bytes: buf.to_vec(),
        };
        self.inner.borrow_mut().outgoing.try_send(frame).unwrap();
        Ok(())
    }

    fn arp_lookup(&self, _if_index: u32, addr: Ipv4Addr) -> Result<MacAddress, Fail> {
        match self.arp.get(&addr) {
            Some(mac) => Ok(*mac),
            None => Err(Fail::new(libc::EHOSTUNREACH, "no ARP entry")),
        }
    }
}
