//! ARP (Address Resolution Protocol) - RFC 826
//!
//! Packet format: [HW Type (2)][Proto Type (2)][HW Len (1)][Proto Len (1)]
//!                [Operation (2)][Sender MAC (6)][Sender IP (4)]
//!                [Target MAC (6)][Target IP (4)]
//!
//! No cache is kept: requests for our address are answered in place and
//! outbound requests are fire-and-forget.

use core::net::Ipv4Addr;

use super::buffer::{read_be16, write_be16};
use super::ethernet::{self, BROADCAST_MAC, ETHERTYPE_ARP, ETHERTYPE_IPV4, ETH_DST_MAC, ETH_SRC_MAC};

/// Field offsets (behind the Ethernet header)
pub const ARP_HW_TYPE: usize = 14;
pub const ARP_PROTO_TYPE: usize = 16;
pub const ARP_HW_LEN: usize = 18;
pub const ARP_PROTO_LEN: usize = 19;
pub const ARP_OPCODE: usize = 20;
pub const ARP_SENDER_MAC: usize = 22;
pub const ARP_SENDER_IP: usize = 28;
pub const ARP_TARGET_MAC: usize = 32;
pub const ARP_TARGET_IP: usize = 38;

/// ARP hardware type for Ethernet
pub const HW_TYPE_ETHERNET: u16 = 1;

/// ARP operation codes
pub const ARP_REQUEST: u16 = 1;
pub const ARP_REPLY: u16 = 2;

/// Ethernet + ARP, the size of every frame this module sends
pub const ARP_FRAME_LEN: usize = 42;

/// Shortest received length `is_arp` accepts
pub const MIN_ARP_LEN: usize = 41;

/// ARP frame whose target protocol address is `local`
pub fn is_arp(buf: &[u8], len: usize, local: Ipv4Addr) -> bool {
    len >= MIN_ARP_LEN
        && buf.len() >= ARP_FRAME_LEN
        && ethernet::ethertype(buf) == ETHERTYPE_ARP
        && buf[ARP_TARGET_IP..ARP_TARGET_IP + 4] == local.octets()
}

pub fn opcode(buf: &[u8]) -> u16 {
    read_be16(buf, ARP_OPCODE)
}

pub fn sender_ip(buf: &[u8]) -> Ipv4Addr {
    let ip = &buf[ARP_SENDER_IP..ARP_SENDER_IP + 4];
    Ipv4Addr::new(ip[0], ip[1], ip[2], ip[3])
}

/// Rewrite a request for our address into the reply.
///
/// Everything except the addresses and the opcode is echoed from the request.
pub fn make_reply(buf: &mut [u8], mac: &[u8; 6], ip: Ipv4Addr) {
    ethernet::swap_mac(buf, mac);
    write_be16(buf, ARP_OPCODE, ARP_REPLY);
    buf.copy_within(ARP_SENDER_MAC..ARP_SENDER_MAC + 6, ARP_TARGET_MAC);
    buf[ARP_SENDER_MAC..ARP_SENDER_MAC + 6].copy_from_slice(mac);
    buf.copy_within(ARP_SENDER_IP..ARP_SENDER_IP + 4, ARP_TARGET_IP);
    buf[ARP_SENDER_IP..ARP_SENDER_IP + 4].copy_from_slice(&ip.octets());
}

/// Build a broadcast "who has `target`" request from scratch.
pub fn build_request(buf: &mut [u8], mac: &[u8; 6], ip: Ipv4Addr, target: Ipv4Addr) {
    buf[ETH_DST_MAC..ETH_DST_MAC + 6].copy_from_slice(&BROADCAST_MAC);
    buf[ETH_SRC_MAC..ETH_SRC_MAC + 6].copy_from_slice(mac);
    ethernet::set_ethertype(buf, ETHERTYPE_ARP);

    write_be16(buf, ARP_HW_TYPE, HW_TYPE_ETHERNET);
    write_be16(buf, ARP_PROTO_TYPE, ETHERTYPE_IPV4);
    buf[ARP_HW_LEN] = 6;
    buf[ARP_PROTO_LEN] = 4;
    write_be16(buf, ARP_OPCODE, ARP_REQUEST);

    buf[ARP_SENDER_MAC..ARP_SENDER_MAC + 6].copy_from_slice(mac);
    buf[ARP_SENDER_IP..ARP_SENDER_IP + 4].copy_from_slice(&ip.octets());
    buf[ARP_TARGET_MAC..ARP_TARGET_MAC + 6].fill(0);
    buf[ARP_TARGET_IP..ARP_TARGET_IP + 4].copy_from_slice(&target.octets());
}
