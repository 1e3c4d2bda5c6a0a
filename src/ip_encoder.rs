// File: ip_encoder.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - ssrforge contributors

use std::fmt;
use std::net::Ipv4Addr;

use crate::error::SsrfError;

/// Alternate textual renderings of an IPv4 literal.
///
/// Every encoding resolves to the same network address under a
/// standards-compliant resolver; only the written form changes. This is
/// what slips past blocklists that compare host strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpEncoding {
    /// Single 32-bit decimal integer, e.g. `2130706433`.
    Int,
    /// IPv4-mapped IPv6 form, e.g. `[::ffff:127.0.0.1]`.
    Ipv6,
    /// Single 32-bit octal integer, e.g. `017700000001`.
    Oct,
    /// Single 32-bit hexadecimal integer, e.g. `0x7f000001`.
    Hex,
    /// Hexadecimal per octet, e.g. `0x7f.0x0.0x0.0x1`.
    DottedHex,
    /// Octal per octet, e.g. `0177.00.00.01`.
    DottedOct,
}

impl IpEncoding {
    /// All registry names, in the order they are documented.
    pub const NAMES: [&'static str; 6] = ["int", "ipv6", "oct", "hex", "dotted_hex", "dotted_oct"];

    /// Look up an encoding by registry name.
    ///
    /// Unknown names are a configuration error, surfaced eagerly by the
    /// construction validator rather than at request time.
    pub fn from_name(name: &str) -> Result<Self, SsrfError> {
        match name {
            "int" => Ok(IpEncoding::Int),
            "ipv6" => Ok(IpEncoding::Ipv6),
            "oct" => Ok(IpEncoding::Oct),
            "hex" => Ok(IpEncoding::Hex),
            "dotted_hex" => Ok(IpEncoding::DottedHex),
            "dotted_oct" => Ok(IpEncoding::DottedOct),
            other => Err(SsrfError::InvalidIpEncoding(other.to_string())),
        }
    }

    /// Render `addr` in this encoding.
    pub fn encode(&self, addr: Ipv4Addr) -> String {
        let [a, b, c, d] = addr.octets();
        let packed = u32::from(addr);
        match self {
            IpEncoding::Int => format!("{}", packed),
            IpEncoding::Ipv6 => format!("[::ffff:{}.{}.{}.{}]", a, b, c, d),
            IpEncoding::Oct => format!("0{:o}", packed),
            IpEncoding::Hex => format!("0x{:08x}", packed),
            IpEncoding::DottedHex => format!("0x{:x}.0x{:x}.0x{:x}.0x{:x}", a, b, c, d),
            IpEncoding::DottedOct => format!("0{:o}.0{:o}.0{:o}.0{:o}", a, b, c, d),
        }
    }
}

impl fmt::Display for IpEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IpEncoding::Int => "int",
            IpEncoding::Ipv6 => "ipv6",
            IpEncoding::Oct => "oct",
            IpEncoding::Hex => "hex",
            IpEncoding::DottedHex => "dotted_hex",
            IpEncoding::DottedOct => "dotted_oct",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
#[path = "ip_encoder_tests.rs"]
mod tests;
