//ICMP (Internet Control Message Protocol) - RFC 792
//
//Only echo is handled: a request is turned into its reply in place.

use core::net::Ipv4Addr;

use super::ethernet;
use super::ipv4::{self, protocol, IP_PROTOCOL};

/// Field offsets
pub const ICMP_TYPE: usize = 34;
pub const ICMP_CODE: usize = 35;
pub const ICMP_CHECKSUM: usize = 36;

pub const ECHO_REPLY: u8 = 0;
pub const ECHO_REQUEST: u8 = 8;

/// Ethernet + IPv4 + type, code and checksum
pub const MIN_ICMP_FRAME_LEN: usize = 38;

pub fn is_echo_request(buf: &[u8]) -> bool {
    buf.len() > ICMP_TYPE && buf[IP_PROTOCOL] == protocol::ICMP && buf[ICMP_TYPE] == ECHO_REQUEST
}

/// Rewrite an echo request into its reply.
///
/// The payload is left untouched, so the frame keeps its length.
pub fn make_echo_reply(buf: &mut [u8], mac: &[u8; 6], ip: Ipv4Addr) {
    ethernet::swap_mac(buf, mac);
    ipv4::swap_ip(buf, ip);
    buf[ICMP_TYPE] = ECHO_REPLY;
    patch_echo_checksum(buf);
}

/// Adjust the stored checksum for the type byte going from 8 to 0.
///
/// The type is the high byte of the first word, so the sum drops by 0x0800
/// and the checksum rises by the same amount: add 8 to the checksum's first
/// byte and carry into the second.
pub fn patch_echo_checksum(buf: &mut [u8]) {
    if buf[ICMP_CHECKSUM] > 0xFF - 0x08 {
        buf[ICMP_CHECKSUM + 1] = buf[ICMP_CHECKSUM + 1].wrapping_add(1);
    }
    buf[ICMP_CHECKSUM] = buf[ICMP_CHECKSUM].wrapping_add(0x08);
}
