// ENC28J60 Driver Constants

// On-chip Buffer Memory
pub const BUFFER_SIZE: usize = 8192; // 8KB shared by the RX ring and TX area
pub const BUFFER_END: u16 = 0x1FFF;
pub const RX_START: u16 = 0x0000;
pub const DEFAULT_RX_SIZE: u16 = 0x19FF; // RX 0x0000-0x19FE, TX 0x19FF-0x1FFF

// Packet Size Limits
pub const MAX_FRAMELEN: u16 = 1518;
pub const CRC_SIZE: u16 = 4;
/// Per-packet control byte in front of a TX frame plus the 7-byte status
/// vector the chip appends after it.
pub const TX_OVERHEAD: u16 = 1 + 7;

// Receive Status Vector (bytes in front of every frame in the ring)
pub const RSV_LENGTH: usize = 6;
pub const RSV_RECEIVED_OK: u8 = 0x80; // low status byte, bit 7

// EIE
pub const EIE_INTIE: u8 = 0x80;
pub const EIE_PKTIE: u8 = 0x40;

// EIR
pub const EIR_PKTIF: u8 = 0x40;
pub const EIR_TXIF: u8 = 0x08;
pub const EIR_TXERIF: u8 = 0x02;
pub const EIR_RXERIF: u8 = 0x01;

// ESTAT
pub const ESTAT_CLKRDY: u8 = 0x01;

// ECON2
pub const ECON2_AUTOINC: u8 = 0x80;
pub const ECON2_PKTDEC: u8 = 0x40;

// ECON1
pub const ECON1_TXRST: u8 = 0x80;
pub const ECON1_RXRST: u8 = 0x40;
pub const ECON1_TXRTS: u8 = 0x08;
pub const ECON1_RXEN: u8 = 0x04;
pub const ECON1_BSEL1: u8 = 0x02;
pub const ECON1_BSEL0: u8 = 0x01;

// ERXFCON
pub const ERXFCON_UCEN: u8 = 0x80; // Unicast to our MAC
pub const ERXFCON_CRCEN: u8 = 0x20; // Drop frames with bad CRC
pub const ERXFCON_PMEN: u8 = 0x10; // Pattern match
pub const ERXFCON_BCEN: u8 = 0x01; // All broadcast

// Pattern match filter: accept a broadcast only when it is ARP.
//
// Bytes under the mask (offsets 0-5 and 12-13):
//   ff ff ff ff ff ff .. .. .. .. .. .. 08 06
// mask 0b0011_0000_0011_1111, IP checksum over the masked bytes 0xF7F9.
pub const ARP_PATTERN_MASK: [u8; 2] = [0x3F, 0x30];
pub const ARP_PATTERN_CHECKSUM: u16 = 0xF7F9;

// MACON1
pub const MACON1_TXPAUS: u8 = 0x08;
pub const MACON1_RXPAUS: u8 = 0x04;
pub const MACON1_MARXEN: u8 = 0x01;

// MACON3
pub const MACON3_PADCFG0: u8 = 0x20; // Pad short frames to 60 bytes
pub const MACON3_TXCRCEN: u8 = 0x10; // Append CRC
pub const MACON3_FRMLNEN: u8 = 0x02; // Check length/type field

// Inter-packet gaps (half duplex, datasheet defaults)
pub const MAIPG_NON_BACK_TO_BACK: u16 = 0x0C12;
pub const MABBIPG_BACK_TO_BACK: u8 = 0x12;

// MICMD / MISTAT
pub const MICMD_MIIRD: u8 = 0x01;
pub const MISTAT_BUSY: u8 = 0x01;

// PHCON2
pub const PHCON2_HDLDIS: u16 = 0x0100; // No loopback of our own frames

// PHSTAT2
pub const PHSTAT2_LSTAT: u16 = 0x0400; // Link up

// PHLCON: LED A / LED B configuration
pub const PHLCON_LEDS_ON: u16 = 0x0880;
pub const PHLCON_LEDS_OFF: u16 = 0x0990;
pub const PHLCON_LINK_ACTIVITY: u16 = 0x0476; // A = link, B = rx/tx activity

/// Blink sequence written at init before the LEDs settle on link/activity.
pub const LED_SEQUENCE: [u16; 5] = [
    PHLCON_LEDS_ON,
    PHLCON_LEDS_OFF,
    PHLCON_LEDS_ON,
    PHLCON_LEDS_OFF,
    PHLCON_LINK_ACTIVITY,
];

// ECOCON
pub const ECOCON_MASK: u8 = 0x07;
