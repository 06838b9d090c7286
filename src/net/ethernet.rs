//Ethernet Frame Layer (OSI Layer 2)
//
//Frame structure: [Dest MAC (6)][Src MAC (6)][EtherType (2)][Payload (46-1500)]
//The CRC is generated and stripped by the MAC; it never reaches the buffer.

use super::buffer::{read_be16, write_be16};

/// Field offsets
pub const ETH_DST_MAC: usize = 0;
pub const ETH_SRC_MAC: usize = 6;
pub const ETH_TYPE: usize = 12;

/// Ethernet frame header size (excluding CRC)
pub const HEADER_SIZE: usize = 14;

/// EtherType constants
pub const ETHERTYPE_IPV4: u16 = 0x0800;
pub const ETHERTYPE_ARP: u16 = 0x0806;

/// Broadcast MAC address (FF:FF:FF:FF:FF:FF)
pub const BROADCAST_MAC: [u8; 6] = [0xFF; 6];

pub fn ethertype(buf: &[u8]) -> u16 {
    read_be16(buf, ETH_TYPE)
}

pub fn set_ethertype(buf: &mut [u8], ethertype: u16) {
    write_be16(buf, ETH_TYPE, ethertype);
}

/// Address the frame back to its sender, from us.
pub fn swap_mac(buf: &mut [u8], own: &[u8; 6]) {
    buf.copy_within(ETH_SRC_MAC..ETH_SRC_MAC + 6, ETH_DST_MAC);
    buf[ETH_SRC_MAC..ETH_SRC_MAC + 6].copy_from_slice(own);
}

/// Address an IPv4 frame to `dst`, from us.
pub fn set_mac(buf: &mut [u8], dst: &[u8; 6], own: &[u8; 6]) {
    buf[ETH_DST_MAC..ETH_DST_MAC + 6].copy_from_slice(dst);
    buf[ETH_SRC_MAC..ETH_SRC_MAC + 6].copy_from_slice(own);
    set_ethertype(buf, ETHERTYPE_IPV4);
}
