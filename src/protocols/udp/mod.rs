// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

pub mod datagram;

pub use self::datagram::{UdpHeader, UDP_HEADER_SIZE};
