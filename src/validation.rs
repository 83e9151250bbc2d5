//! Address validation for EDL entries.
//!
//! An entry is kept only when its address column holds something a firewall
//! can consume:
//! - a single IPv4 or IPv6 host address
//! - an IPv4 or IPv6 network in CIDR form, host bits allowed (`10.0.0.5/24`)
//! - an IPv4 network with a dotted netmask or hostmask suffix

use anyhow::Result;
use ipnet::{IpNet, Ipv4Net};
use std::net::{IpAddr, Ipv4Addr};

/// Return `true` if `text` is a valid host address or network.
///
/// Never panics and never errors: anything that fails to parse is simply
/// invalid.
///
/// # Examples
/// ```
/// use edlman::validation::is_valid_address;
/// assert!(is_valid_address("192.168.1.1"));
/// assert!(is_valid_address("10.0.0.5/24"));
/// assert!(is_valid_address("2001:db8::/32"));
/// assert!(!is_valid_address("not-an-ip"));
/// assert!(!is_valid_address(""));
/// ```
pub fn is_valid_address(text: &str) -> bool {
    parse_address(text).is_ok()
}

/// Parse an address or network, returning the network it denotes.
///
/// Plain addresses become /32 (IPv4) or /128 (IPv6) networks. Host bits in
/// CIDR input are preserved, not rejected.
///
/// # Examples
/// ```
/// use edlman::validation::parse_address;
/// assert_eq!(parse_address("10.0.0.1").unwrap().to_string(), "10.0.0.1/32");
/// assert_eq!(parse_address("10.0.0.5/24").unwrap().to_string(), "10.0.0.5/24");
/// assert!(parse_address("10.0.0.0/33").is_err());
/// ```
pub fn parse_address(text: &str) -> Result<IpNet> {
    if let Ok(ip) = text.parse::<IpAddr>() {
        return Ok(IpNet::from(ip));
    }

    let Some((addr, suffix)) = text.split_once('/') else {
        anyhow::bail!("Invalid IP address: {}", text);
    };

    if let Ok(net) = text.parse::<IpNet>() {
        return Ok(net);
    }

    // Dotted mask suffix, IPv4 only
    if let (Ok(addr), Ok(mask)) = (addr.parse::<Ipv4Addr>(), suffix.parse::<Ipv4Addr>()) {
        if let Some(prefix) = mask_to_prefix(u32::from(mask)) {
            return Ipv4Net::new(addr, prefix)
                .map(IpNet::V4)
                .map_err(|_| anyhow::anyhow!("Invalid CIDR: {}", text));
        }
    }

    anyhow::bail!("Invalid CIDR: {}", text)
}

/// Convert a netmask (`255.255.255.0`) or hostmask (`0.0.0.255`) into a
/// prefix length. Non-contiguous masks yield `None`.
fn mask_to_prefix(mask: u32) -> Option<u8> {
    if mask.leading_ones() + mask.trailing_zeros() == 32 {
        return Some(mask.leading_ones() as u8);
    }
    let host = !mask;
    if host.leading_ones() + host.trailing_zeros() == 32 {
        return Some(host.leading_ones() as u8);
    }
    None
}
