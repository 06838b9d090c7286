//! TCP (Transmission Control Protocol) - RFC 793
//!
//! Single-data-packet TCP: there is no connection table and no
//! retransmission. Every segment is built by rewriting the segment just
//! received, so a request is answered with at most one data segment, which
//! also carries FIN.
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          Source Port          |       Destination Port        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                        Sequence Number                        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                    Acknowledgment Number                      |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |  Data |       |C|E|U|A|P|R|S|F|                               |
//! | Offset| Rsrvd |W|C|R|C|S|S|Y|I|            Window             |
//! |       |       |R|E|G|K|H|T|N|N|                               |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |           Checksum            |         Urgent Pointer        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```

use core::net::Ipv4Addr;

use super::buffer::{read_be16, write_be16};
use super::ipv4::{self, protocol, IP_HEADER_LEN, IP_PROTOCOL};

/// Field offsets
pub const TCP_SRC_PORT: usize = 34;
pub const TCP_DST_PORT: usize = 36;
pub const TCP_SEQ: usize = 38;
pub const TCP_ACK: usize = 42;
pub const TCP_HEADER_LEN: usize = 46;
pub const TCP_FLAGS: usize = 47;
pub const TCP_WINDOW: usize = 48;
pub const TCP_CHECKSUM: usize = 50;
pub const TCP_URGENT: usize = 52;
pub const TCP_OPTIONS: usize = 54;

/// Payload of an option-less segment starts where options would
pub const TCP_DATA: usize = TCP_OPTIONS;

/// TCP flags
pub mod flags {
    pub const FIN: u8 = 0x01;
    pub const SYN: u8 = 0x02;
    pub const RST: u8 = 0x04;
    pub const PSH: u8 = 0x08;
    pub const ACK: u8 = 0x10;
    pub const URG: u8 = 0x20;
    pub const SYN_ACK: u8 = SYN | ACK;
}

/// Header without options
pub const TCP_HEADER_LEN_PLAIN: usize = 20;

/// Maximum segment size option, the only option ever sent
pub const MSS_OPTION: [u8; 4] = [2, 4, 0x05, 0x80];
pub const MSS_OPTION_LEN: usize = MSS_OPTION.len();

/// Data offset byte for 20- and 24-byte headers
pub const HEADER_LEN_PLAIN: u8 = 0x50;
pub const HEADER_LEN_WITH_MSS: u8 = 0x60;

/// Window advertised by originated segments (600-byte frame buffer)
pub const ADVERTISED_WINDOW: u16 = 600 - IP_HEADER_LEN as u16 - 14;

/// First value of the rolling sequence seed
pub const INITIAL_SEQUENCE_SEED: u8 = 0x0a;

/// TCP segment to local `port`; only the low byte of the port is configurable
pub fn is_for_port(buf: &[u8], port: u8) -> bool {
    buf.len() > TCP_FLAGS
        && buf[IP_PROTOCOL] == protocol::TCP
        && buf[TCP_DST_PORT] == 0
        && buf[TCP_DST_PORT + 1] == port
}

pub fn tcp_flags(buf: &[u8]) -> u8 {
    buf[TCP_FLAGS]
}

pub fn src_port(buf: &[u8]) -> u16 {
    read_be16(buf, TCP_SRC_PORT)
}

pub fn dst_port(buf: &[u8]) -> u16 {
    read_be16(buf, TCP_DST_PORT)
}

pub fn sequence(buf: &[u8]) -> u32 {
    u32::from_be_bytes([buf[TCP_SEQ], buf[TCP_SEQ + 1], buf[TCP_SEQ + 2], buf[TCP_SEQ + 3]])
}

pub fn acknowledgment(buf: &[u8]) -> u32 {
    u32::from_be_bytes([buf[TCP_ACK], buf[TCP_ACK + 1], buf[TCP_ACK + 2], buf[TCP_ACK + 3]])
}

/// Header length in bytes, from the data offset nibble
pub fn header_length(buf: &[u8]) -> u16 {
    u16::from(buf[TCP_HEADER_LEN] >> 4) * 4
}

/// Payload bytes carried by the segment, never negative
pub fn data_length(buf: &[u8]) -> u16 {
    ipv4::total_length(buf)
        .saturating_sub(IP_HEADER_LEN as u16)
        .saturating_sub(header_length(buf))
}

/// Lengths of the segment most recently examined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LengthInfo {
    pub header_len: u16,
    pub data_len: u16,
}

impl LengthInfo {
    pub fn from_frame(buf: &[u8]) -> Self {
        Self {
            header_len: header_length(buf),
            data_len: data_length(buf),
        }
    }

    /// Offset of the payload in the frame, or 0 when there is none
    pub fn data_pointer(&self) -> usize {
        if self.data_len == 0 {
            0
        } else {
            TCP_SRC_PORT + usize::from(self.header_len)
        }
    }
}

/// Add `increment` to the acknowledgment field, taking the peer's sequence
/// number as the base.
///
/// Big-endian byte-wise addition from the least significant byte. With
/// `copy_peer_seq` the old acknowledgment (our sequence as the peer last
/// saw it) moves into the sequence field; otherwise the sequence is zeroed.
pub fn advance_ack(buf: &mut [u8], increment: u16, copy_peer_seq: bool) {
    let mut carry = u32::from(increment);
    for i in (0..4).rev() {
        carry += u32::from(buf[TCP_SEQ + i]);
        let peer_ack = buf[TCP_ACK + i];
        buf[TCP_ACK + i] = carry as u8;
        buf[TCP_SEQ + i] = if copy_peer_seq { peer_ack } else { 0 };
        carry >>= 8;
    }
}

/// Fresh local sequence number `0.0.seed.0`; the seed then moves on by 2.
///
/// Stepping the third byte by 2 leaves room for 512 bytes per exchange
/// before two exchanges could overlap.
pub fn write_initial_sequence(buf: &mut [u8], seed: &mut u8) {
    buf[TCP_SEQ..TCP_SEQ + 4].copy_from_slice(&[0, 0, *seed, 0]);
    *seed = seed.wrapping_add(2);
}

/// Set the data offset, with or without the MSS option
pub fn write_header_length(buf: &mut [u8], negotiate_mss: bool) {
    if negotiate_mss {
        buf[TCP_OPTIONS..TCP_OPTIONS + MSS_OPTION_LEN].copy_from_slice(&MSS_OPTION);
        buf[TCP_HEADER_LEN] = HEADER_LEN_WITH_MSS;
    } else {
        buf[TCP_HEADER_LEN] = HEADER_LEN_PLAIN;
    }
}

/// Turn the received segment's header into our reply header.
///
/// Ports are swapped with the local port written into the low byte of the
/// source, the acknowledgment advances by `ack_increment`, and the sequence
/// is either the peer's acknowledgment (`copy_peer_seq`) or a fresh value
/// from `seed`. The checksum is left zeroed.
pub fn set_reply_header(
    buf: &mut [u8],
    ack_increment: u16,
    negotiate_mss: bool,
    copy_peer_seq: bool,
    local_port: u8,
    seed: &mut u8,
) {
    buf.copy_within(TCP_SRC_PORT..TCP_SRC_PORT + 2, TCP_DST_PORT);
    buf[TCP_SRC_PORT] = 0;
    buf[TCP_SRC_PORT + 1] = local_port;

    advance_ack(buf, ack_increment, copy_peer_seq);
    if !copy_peer_seq {
        write_initial_sequence(buf, seed);
    }

    write_be16(buf, TCP_CHECKSUM, 0);
    write_header_length(buf, negotiate_mss);
}

/// Copy `data` into the payload area at `pos`; returns the position after it,
/// or `None` if the buffer ends first.
pub fn fill_data(buf: &mut [u8], pos: usize, data: &[u8]) -> Option<usize> {
    let start = TCP_DATA.checked_add(pos)?;
    let end = start.checked_add(data.len())?;
    buf.get_mut(start..end)?.copy_from_slice(data);
    Some(pos + data.len())
}

/// Parameters of a segment originated rather than replied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutboundSegment {
    pub dest_mac: [u8; 6],
    pub dest_ip: Ipv4Addr,
    pub dest_port: u16,
    pub src_port: u16,
    pub flags: u8,
    /// Fresh sequence number plus the MSS option (opening a connection)
    pub negotiate_mss: bool,
    /// Zero the acknowledgment field (an originating SYN)
    pub clear_ack: bool,
    /// Added to the acknowledgment as in a reply; 0 leaves both fields alone
    pub ack_increment: u16,
    /// Payload bytes already placed at the data offset
    pub data_len: u16,
}

impl OutboundSegment {
    /// A bare SYN opening a connection to `dest_ip:dest_port`
    pub fn syn(dest_mac: [u8; 6], dest_ip: Ipv4Addr, dest_port: u16, src_port: u16) -> Self {
        Self {
            dest_mac,
            dest_ip,
            dest_port,
            src_port,
            flags: flags::SYN,
            negotiate_mss: true,
            clear_ack: true,
            ack_increment: 0,
            data_len: 0,
        }
    }
}
