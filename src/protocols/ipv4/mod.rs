// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

pub mod checksum;
pub mod datagram;

pub use self::datagram::{forward, Ipv4Header, IPV4_HEADER_DEFAULT_SIZE};
