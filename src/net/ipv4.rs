//! IPv4 Protocol Implementation
//!
//! Only 20-byte headers without options are accepted or produced, always
//! at the fixed position behind the Ethernet header.
//!
//! # References
//! - RFC 791: Internet Protocol (IPv4)
//! - RFC 1071: Computing the Internet Checksum

use core::net::Ipv4Addr;

use super::buffer::{read_be16, write_be16};
use super::ethernet::{self, ETHERTYPE_IPV4};

/// Field offsets
pub const IP_VERSION_IHL: usize = 14;
pub const IP_TOS: usize = 15;
pub const IP_TOTAL_LEN: usize = 16;
pub const IP_ID: usize = 18;
pub const IP_FLAGS: usize = 20;
pub const IP_TTL: usize = 22;
pub const IP_PROTOCOL: usize = 23;
pub const IP_CHECKSUM: usize = 24;
pub const IP_SRC: usize = 26;
pub const IP_DST: usize = 30;

/// Header size (no options)
pub const IP_HEADER_LEN: usize = 20;

/// Version 4, five 32-bit words of header
pub const VERSION_IHL_NO_OPTIONS: u8 = 0x45;

/// IPv4 Protocol Numbers (IANA assigned)
pub mod protocol {
    pub const ICMP: u8 = 1;
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
}

/// Don't-fragment bit, as the high byte of the flags/offset field
pub const FLAG_DONT_FRAGMENT: u8 = 0x40;

/// TTL of headers built from scratch
pub const DEFAULT_TTL: u8 = 128;

/// TTL of headers turned around from a request
pub const REPLY_TTL: u8 = 64;

/// Shortest frame `is_ip` accepts: Ethernet + IPv4 + UDP headers
pub const MIN_IP_FRAME_LEN: usize = 42;

/// What `checksum` is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumKind {
    /// Plain header checksum
    Ip,
    /// Range starts at the IPv4 source address; pseudo-header folded in
    Udp,
    /// Range starts at the IPv4 source address; pseudo-header folded in
    Tcp,
}

impl ChecksumKind {
    fn pseudo_protocol(self) -> Option<u8> {
        match self {
            ChecksumKind::Ip => None,
            ChecksumKind::Udp => Some(protocol::UDP),
            ChecksumKind::Tcp => Some(protocol::TCP),
        }
    }
}

/// Internet checksum over `len` bytes of `buf` from `start` (RFC 1071)
///
/// For UDP and TCP the range starts 8 bytes early, at the IPv4 source
/// address, so the addresses are summed straight from the header; the
/// protocol number and the segment length (`len - 8`) complete the
/// pseudo-header. The checksum field inside the range must be zero unless
/// the caller is verifying.
pub fn checksum(buf: &[u8], start: usize, len: usize, kind: ChecksumKind) -> u16 {
    let mut sum: u32 = match kind.pseudo_protocol() {
        Some(proto) => u32::from(proto) + (len as u32).saturating_sub(8),
        None => 0,
    };

    let mut words = buf[start..start + len].chunks_exact(2);
    for word in &mut words {
        sum += u32::from(u16::from_be_bytes([word[0], word[1]]));
    }
    // odd trailing byte is the high half of a zero-padded word
    if let [last] = words.remainder() {
        sum += u32::from(*last) << 8;
    }

    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}

/// IPv4 frame without options addressed to `local`
pub fn is_ip(buf: &[u8], len: usize, local: Ipv4Addr) -> bool {
    len >= MIN_IP_FRAME_LEN
        && buf.len() >= IP_DST + 4
        && ethernet::ethertype(buf) == ETHERTYPE_IPV4
        && buf[IP_VERSION_IHL] == VERSION_IHL_NO_OPTIONS
        && buf[IP_DST..IP_DST + 4] == local.octets()
}

pub fn total_length(buf: &[u8]) -> u16 {
    read_be16(buf, IP_TOTAL_LEN)
}

pub fn set_total_length(buf: &mut [u8], len: u16) {
    write_be16(buf, IP_TOTAL_LEN, len);
}

pub fn source(buf: &[u8]) -> Ipv4Addr {
    Ipv4Addr::new(buf[IP_SRC], buf[IP_SRC + 1], buf[IP_SRC + 2], buf[IP_SRC + 3])
}

pub fn destination(buf: &[u8]) -> Ipv4Addr {
    Ipv4Addr::new(buf[IP_DST], buf[IP_DST + 1], buf[IP_DST + 2], buf[IP_DST + 3])
}

/// Mark the header don't-fragment with the reply TTL and recompute its checksum
pub fn refresh_reply_header(buf: &mut [u8]) {
    write_be16(buf, IP_CHECKSUM, 0);
    buf[IP_FLAGS] = FLAG_DONT_FRAGMENT;
    buf[IP_FLAGS + 1] = 0;
    buf[IP_TTL] = REPLY_TTL;
    let ck = checksum(buf, IP_VERSION_IHL, IP_HEADER_LEN, ChecksumKind::Ip);
    write_be16(buf, IP_CHECKSUM, ck);
}

/// Turn a request header into its reply: send back to the source, from us
pub fn swap_ip(buf: &mut [u8], local: Ipv4Addr) {
    buf.copy_within(IP_SRC..IP_SRC + 4, IP_DST);
    buf[IP_SRC..IP_SRC + 4].copy_from_slice(&local.octets());
    refresh_reply_header(buf);
}

/// Write a complete header from scratch
pub fn build_header(
    buf: &mut [u8],
    total_len: u16,
    identifier: u16,
    proto: u8,
    src: Ipv4Addr,
    dst: Ipv4Addr,
) {
    buf[IP_VERSION_IHL] = VERSION_IHL_NO_OPTIONS;
    buf[IP_TOS] = 0x00;
    set_total_length(buf, total_len);
    write_be16(buf, IP_ID, identifier);
    buf[IP_FLAGS] = FLAG_DONT_FRAGMENT;
    buf[IP_FLAGS + 1] = 0;
    buf[IP_TTL] = DEFAULT_TTL;
    buf[IP_PROTOCOL] = proto;
    buf[IP_SRC..IP_SRC + 4].copy_from_slice(&src.octets());
    buf[IP_DST..IP_DST + 4].copy_from_slice(&dst.octets());
    write_be16(buf, IP_CHECKSUM, 0);
    let ck = checksum(buf, IP_VERSION_IHL, IP_HEADER_LEN, ChecksumKind::Ip);
    write_be16(buf, IP_CHECKSUM, ck);
}
