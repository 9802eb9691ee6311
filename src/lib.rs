// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Software IPv4 router with an embedded RIPv2 control plane.
//!
//! The [`engine::Engine`] drives a single-threaded control loop over a
//! [`runtime::RouterRuntime`] implementation: inbound frames are validated,
//! RIP traffic feeds the routing table, and transit traffic is forwarded by
//! longest-prefix match with an incremental checksum rewrite.

#[macro_use]
extern crate log;

pub mod config;
pub mod engine;
pub mod fail;
pub mod protocols;
pub mod route;
pub mod runtime;
