//! UDP (User Datagram Protocol) - RFC 768
//!
//! Replies only: the datagram goes back to whoever sent the frame in the
//! buffer, from the same source port, to a caller-chosen destination port.
//!
//! ```text
//! 0      7 8     15 16    23 24    31
//! +--------+--------+--------+--------+
//! |   Source Port   |   Dest Port     |
//! +--------+--------+--------+--------+
//! |     Length      |    Checksum     |
//! +--------+--------+--------+--------+
//! |          Data (variable)          |
//! +--------+--------+--------+--------+
//! ```

use core::net::Ipv4Addr;

use super::buffer::{read_be16, write_be16};
use super::ethernet::{self, HEADER_SIZE};
use super::ipv4::{self, checksum, ChecksumKind, IP_HEADER_LEN, IP_SRC};

/// Field offsets
pub const UDP_SRC_PORT: usize = 34;
pub const UDP_DST_PORT: usize = 36;
pub const UDP_LENGTH: usize = 38;
pub const UDP_CHECKSUM: usize = 40;
pub const UDP_DATA: usize = 42;

/// UDP header size (always 8 bytes)
pub const UDP_HEADER_LEN: usize = 8;

/// Largest payload a reply carries; longer data is cut off
pub const MAX_UDP_PAYLOAD: usize = 220;

pub fn src_port(buf: &[u8]) -> u16 {
    read_be16(buf, UDP_SRC_PORT)
}

pub fn dst_port(buf: &[u8]) -> u16 {
    read_be16(buf, UDP_DST_PORT)
}

/// Frame length a reply carrying `data` will have
pub fn reply_frame_len(data: &[u8]) -> usize {
    UDP_DATA + data.len().min(MAX_UDP_PAYLOAD)
}

/// Turn the received frame into a datagram carrying `data` to `port`.
///
/// Returns the number of frame bytes to transmit.
pub fn make_reply(buf: &mut [u8], data: &[u8], port: u16, mac: &[u8; 6], ip: Ipv4Addr) -> usize {
    let data = &data[..data.len().min(MAX_UDP_PAYLOAD)];
    let len = data.len();

    ethernet::swap_mac(buf, mac);
    ipv4::set_total_length(buf, (IP_HEADER_LEN + UDP_HEADER_LEN + len) as u16);
    ipv4::swap_ip(buf, ip);

    write_be16(buf, UDP_DST_PORT, port);
    write_be16(buf, UDP_LENGTH, (UDP_HEADER_LEN + len) as u16);
    write_be16(buf, UDP_CHECKSUM, 0);
    buf[UDP_DATA..UDP_DATA + len].copy_from_slice(data);

    // both addresses + header + data
    let ck = checksum(buf, IP_SRC, 8 + UDP_HEADER_LEN + len, ChecksumKind::Udp);
    write_be16(buf, UDP_CHECKSUM, ck);

    HEADER_SIZE + IP_HEADER_LEN + UDP_HEADER_LEN + len
}
