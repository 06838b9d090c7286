// ENC28J60 Register Map
//
// Control register encoding used throughout the driver:
//   bits 0-4  address inside the bank
//   bits 5-6  bank number
//   bit  7    MAC/MII register (chip shifts out a dummy byte before the data)

pub const ADDR_MASK: u8 = 0x1F;
pub const BANK_MASK: u8 = 0x60;
pub const MAC_MII_FLAG: u8 = 0x80;

/// First in-bank address of the registers mirrored on every bank.
pub const COMMON_BASE: u8 = 0x1B;

const fn eth(bank: u8, addr: u8) -> u8 {
    (bank << 5) | addr
}

const fn mac_mii(bank: u8, addr: u8) -> u8 {
    MAC_MII_FLAG | (bank << 5) | addr
}

/// In-bank address the opcode byte carries.
pub const fn address(reg: u8) -> u8 {
    reg & ADDR_MASK
}

/// Bank the register lives in.
pub const fn bank(reg: u8) -> u8 {
    (reg & BANK_MASK) >> 5
}

/// Registers present at the same address in all four banks.
pub const fn is_common(reg: u8) -> bool {
    address(reg) >= COMMON_BASE
}

/// MAC and MII registers answer reads with a dummy byte first.
pub const fn is_mac_mii(reg: u8) -> bool {
    reg & MAC_MII_FLAG != 0
}

// SPI opcodes (high three bits of the first byte)
pub const OP_READ_CTRL_REG: u8 = 0x00;
pub const OP_READ_BUF_MEM: u8 = 0x3A;
pub const OP_WRITE_CTRL_REG: u8 = 0x40;
pub const OP_WRITE_BUF_MEM: u8 = 0x7A;
pub const OP_BIT_FIELD_SET: u8 = 0x80;
pub const OP_BIT_FIELD_CLR: u8 = 0xA0;
pub const OP_SOFT_RESET: u8 = 0xFF;

// Common registers (all banks)
pub const EIE: u8 = 0x1B; // Ethernet Interrupt Enable
pub const EIR: u8 = 0x1C; // Ethernet Interrupt Request (flags)
pub const ESTAT: u8 = 0x1D; // Ethernet Status
pub const ECON2: u8 = 0x1E; // Ethernet Control 2
pub const ECON1: u8 = 0x1F; // Ethernet Control 1 (holds the bank select bits)

// Bank 0: buffer pointers
pub const ERDPTL: u8 = eth(0, 0x00); // Read pointer
pub const ERDPTH: u8 = eth(0, 0x01);
pub const EWRPTL: u8 = eth(0, 0x02); // Write pointer
pub const EWRPTH: u8 = eth(0, 0x03);
pub const ETXSTL: u8 = eth(0, 0x04); // TX start
pub const ETXSTH: u8 = eth(0, 0x05);
pub const ETXNDL: u8 = eth(0, 0x06); // TX end
pub const ETXNDH: u8 = eth(0, 0x07);
pub const ERXSTL: u8 = eth(0, 0x08); // RX start
pub const ERXSTH: u8 = eth(0, 0x09);
pub const ERXNDL: u8 = eth(0, 0x0A); // RX end
pub const ERXNDH: u8 = eth(0, 0x0B);
pub const ERXRDPTL: u8 = eth(0, 0x0C); // RX read pointer (frees ring space)
pub const ERXRDPTH: u8 = eth(0, 0x0D);
pub const ERXWRPTL: u8 = eth(0, 0x0E); // RX write pointer (chip owned)
pub const ERXWRPTH: u8 = eth(0, 0x0F);

// Bank 1: receive filters
pub const EPMM0: u8 = eth(1, 0x08); // Pattern match mask bytes 0..7
pub const EPMM1: u8 = eth(1, 0x09);
pub const EPMCSL: u8 = eth(1, 0x10); // Pattern match checksum
pub const EPMCSH: u8 = eth(1, 0x11);
pub const EPMOL: u8 = eth(1, 0x14); // Pattern match offset
pub const EPMOH: u8 = eth(1, 0x15);
pub const ERXFCON: u8 = eth(1, 0x18); // Receive filter control
pub const EPKTCNT: u8 = eth(1, 0x19); // Pending packet count

// Bank 2: MAC and MII
pub const MACON1: u8 = mac_mii(2, 0x00);
pub const MACON2: u8 = mac_mii(2, 0x01);
pub const MACON3: u8 = mac_mii(2, 0x02);
pub const MACON4: u8 = mac_mii(2, 0x03);
pub const MABBIPG: u8 = mac_mii(2, 0x04); // Back-to-back inter-packet gap
pub const MAIPGL: u8 = mac_mii(2, 0x06); // Non-back-to-back inter-packet gap
pub const MAIPGH: u8 = mac_mii(2, 0x07);
pub const MAMXFLL: u8 = mac_mii(2, 0x0A); // Maximum frame length
pub const MAMXFLH: u8 = mac_mii(2, 0x0B);
pub const MICMD: u8 = mac_mii(2, 0x12); // MII command
pub const MIREGADR: u8 = mac_mii(2, 0x14); // MII (PHY) register address
pub const MIWRL: u8 = mac_mii(2, 0x16); // MII write data; writing MIWRH starts the write
pub const MIWRH: u8 = mac_mii(2, 0x17);
pub const MIRDL: u8 = mac_mii(2, 0x18); // MII read data
pub const MIRDH: u8 = mac_mii(2, 0x19);

// Bank 3: station address and status
pub const MAADR1: u8 = mac_mii(3, 0x00);
pub const MAADR0: u8 = mac_mii(3, 0x01);
pub const MAADR3: u8 = mac_mii(3, 0x02);
pub const MAADR2: u8 = mac_mii(3, 0x03);
pub const MAADR5: u8 = mac_mii(3, 0x04);
pub const MAADR4: u8 = mac_mii(3, 0x05);
pub const MISTAT: u8 = mac_mii(3, 0x0A); // MII status
pub const EREVID: u8 = eth(3, 0x12); // Silicon revision
pub const ECOCON: u8 = eth(3, 0x15); // Clock output control

/// Station address registers in wire order of the MAC (byte 0 first).
///
/// The chip stores the address back to front: the first MAC byte lands in
/// MAADR5, the last in MAADR0.
pub const MAC_REGISTERS: [u8; 6] = [MAADR5, MAADR4, MAADR3, MAADR2, MAADR1, MAADR0];

// PHY registers (reached through MIREGADR / MIWR / MIRD)
pub const PHCON1: u8 = 0x00;
pub const PHSTAT1: u8 = 0x01;
pub const PHHID1: u8 = 0x02;
pub const PHHID2: u8 = 0x03;
pub const PHCON2: u8 = 0x10;
pub const PHSTAT2: u8 = 0x11;
pub const PHIE: u8 = 0x12;
pub const PHIR: u8 = 0x13;
pub const PHLCON: u8 = 0x14;
