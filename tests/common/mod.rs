// Shared test fixtures: a register-level ENC28J60 simulator behind the
// SpiBus seam, a recording NetworkDevice, and raw frame builders.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::rc::Rc;

use ethershield::drivers::net::enc28j60::{Enc28j60, Enc28j60Config};
use ethershield::drivers::net::{BusConfig, LinkStatus, NetworkDevice, SpiBus};

pub const CHIP_MAC: [u8; 6] = [0x54, 0x55, 0x58, 0x10, 0x00, 0x24];
pub const LOCAL_IP: Ipv4Addr = Ipv4Addr::new(203, 0, 113, 5);
pub const PEER_MAC: [u8; 6] = [0x02, 0x1A, 0x2B, 0x3C, 0x4D, 0x5E];
pub const PEER_IP: Ipv4Addr = Ipv4Addr::new(203, 0, 113, 20);
pub const WWW_PORT: u8 = 80;

pub const REVISION: u8 = 0x06;
const CLOCK_READY_POLLS: u32 = 3;
const PHY_BUSY_POLLS: u32 = 2;

const MEM_SIZE: usize = 8192;
const FAKE_CRC: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];

// register addresses as (bank, in-bank address)
const ERDPTL: usize = 0x00;
const EWRPTL: usize = 0x02;
const ETXSTL: usize = 0x04;
const ETXNDL: usize = 0x06;
const ERXSTL: usize = 0x08;
const ERXNDL: usize = 0x0A;
const EPKTCNT: usize = 0x19;
const MICMD: usize = 0x12;
const MIREGADR: usize = 0x14;
const MIWRL: usize = 0x16;
const MIWRH: usize = 0x17;
const MIRDL: usize = 0x18;
const MIRDH: usize = 0x19;
const MISTAT: usize = 0x0A;
const EREVID: usize = 0x12;
const EIR: usize = 0x1C;
const ESTAT: usize = 0x1D;
const ECON2: usize = 0x1E;
const ECON1: usize = 0x1F;

pub const PHSTAT2: u8 = 0x11;
pub const PHLCON: u8 = 0x14;
pub const PHCON2: u8 = 0x10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Opcode,
    ReadCtrl { addr: usize, dummy_pending: bool, value: Option<u8> },
    WriteCtrl(usize),
    BitSet(usize),
    BitClear(usize),
    ReadBuf,
    WriteBuf,
    Done,
}

struct ChipState {
    banks: [[u8; 32]; 4],
    mem: Vec<u8>,
    phy: [u16; 32],
    phy_busy: u32,
    clock_polls_left: u32,
    selected: bool,
    phase: Phase,
    current: Vec<u8>,
    transactions: Vec<Vec<u8>>,
    sent: Vec<Vec<u8>>,
    control_bytes: Vec<u8>,
    rx_write: Option<u16>,
    phy_writes: Vec<(u8, u16)>,
    resets: u32,
    bus_config: Option<BusConfig>,
    tx_error: bool,
    stall_tx: bool,
    phy_stuck: bool,
    clock_stuck: bool,
    fail_bus: bool,
    protocol_errors: Vec<String>,
}

impl ChipState {
    fn new() -> Self {
        let mut state = Self {
            banks: [[0; 32]; 4],
            mem: vec![0; MEM_SIZE],
            phy: [0; 32],
            phy_busy: 0,
            clock_polls_left: 0,
            selected: false,
            phase: Phase::Opcode,
            current: Vec::new(),
            transactions: Vec::new(),
            sent: Vec::new(),
            control_bytes: Vec::new(),
            rx_write: None,
            phy_writes: Vec::new(),
            resets: 0,
            bus_config: None,
            tx_error: false,
            stall_tx: false,
            phy_stuck: false,
            clock_stuck: false,
            fail_bus: false,
            protocol_errors: Vec::new(),
        };
        state.banks[0][ECON2] = 0x80;
        state
    }

    fn bank(&self) -> usize {
        usize::from(self.banks[0][ECON1] & 0x03)
    }

    /// (bank, addr) slot in the register file; mirrored registers live in bank 0
    fn slot(&self, addr: usize) -> (usize, usize) {
        if addr >= 0x1B { (0, addr) } else { (self.bank(), addr) }
    }

    fn reg16(&self, bank: usize, low: usize) -> u16 {
        u16::from_le_bytes([self.banks[bank][low], self.banks[bank][low + 1]])
    }

    fn set_reg16(&mut self, bank: usize, low: usize, value: u16) {
        let [l, h] = value.to_le_bytes();
        self.banks[bank][low] = l;
        self.banks[bank][low + 1] = h;
    }

    fn is_mac_mii(&self, addr: usize) -> bool {
        match self.slot(addr) {
            (2, a) => a <= 0x19,
            (3, a) => a <= 0x05 || a == MISTAT,
            _ => false,
        }
    }

    fn rx_start(&self) -> u16 {
        self.reg16(0, ERXSTL)
    }

    fn rx_end(&self) -> u16 {
        self.reg16(0, ERXNDL)
    }

    fn ring_next(&self, at: u16) -> u16 {
        if at == self.rx_end() { self.rx_start() } else { at + 1 }
    }

    fn ring_advance(&self, at: u16, n: usize) -> u16 {
        let start = usize::from(self.rx_start());
        let size = usize::from(self.rx_end()) - start + 1;
        (start + (usize::from(at) - start + n) % size) as u16
    }

    fn soft_reset(&mut self) {
        self.banks = [[0; 32]; 4];
        self.banks[0][ECON2] = 0x80;
        self.clock_polls_left = CLOCK_READY_POLLS;
        self.rx_write = None;
        self.phy_busy = 0;
        self.resets += 1;
    }

    fn read_ctrl(&mut self, addr: usize) -> u8 {
        let (bank, a) = self.slot(addr);
        match (bank, a) {
            (0, ESTAT) => {
                let value = self.banks[0][ESTAT] & !0x01;
                if self.clock_stuck {
                    value
                } else if self.clock_polls_left > 0 {
                    self.clock_polls_left -= 1;
                    value
                } else {
                    value | 0x01
                }
            }
            (3, MISTAT) => {
                if self.phy_stuck {
                    0x01
                } else if self.phy_busy > 0 {
                    self.phy_busy -= 1;
                    0x01
                } else {
                    0x00
                }
            }
            (3, EREVID) => REVISION,
            _ => self.banks[bank][a],
        }
    }

    fn write_ctrl(&mut self, addr: usize, value: u8) {
        let (bank, a) = self.slot(addr);
        self.banks[bank][a] = value;
        match (bank, a) {
            (2, MICMD) if value & 0x01 != 0 => {
                let reg = usize::from(self.banks[2][MIREGADR] & 0x1F);
                let [l, h] = self.phy[reg].to_le_bytes();
                self.banks[2][MIRDL] = l;
                self.banks[2][MIRDH] = h;
                self.phy_busy = PHY_BUSY_POLLS;
            }
            (2, MIWRH) => {
                let reg = self.banks[2][MIREGADR] & 0x1F;
                let data = u16::from_le_bytes([self.banks[2][MIWRL], value]);
                self.phy[usize::from(reg)] = data;
                self.phy_writes.push((reg, data));
                self.phy_busy = PHY_BUSY_POLLS;
            }
            _ => {}
        }
    }

    fn bit_op(&mut self, addr: usize, mask: u8, set: bool) {
        if self.is_mac_mii(addr) {
            self.protocol_errors.push(format!("bit-field op on MAC/MII register {:#04x}", addr));
        }
        let (bank, a) = self.slot(addr);
        if !set {
            self.banks[bank][a] &= !mask;
            return;
        }
        self.banks[bank][a] |= mask;
        if (bank, a) == (0, ECON2) && mask & 0x40 != 0 {
            self.banks[1][EPKTCNT] = self.banks[1][EPKTCNT].saturating_sub(1);
            self.banks[0][ECON2] &= !0x40;
        }
        if (bank, a) == (0, ECON1) && mask & 0x08 != 0 {
            self.transmit();
        }
    }

    fn transmit(&mut self) {
        let start = usize::from(self.reg16(0, ETXSTL));
        let end = usize::from(self.reg16(0, ETXNDL));
        self.control_bytes.push(self.mem[start]);
        self.sent.push(self.mem[start + 1..=end].to_vec());
        if self.tx_error {
            self.banks[0][EIR] |= 0x02;
        } else {
            self.banks[0][ECON1] &= !0x08;
            self.banks[0][EIR] |= 0x08;
        }
    }

    fn step(&mut self, byte: u8) {
        let phase = self.phase;
        self.phase = match phase {
            Phase::Opcode => {
                let arg = usize::from(byte & 0x1F);
                match byte {
                    0xFF => {
                        self.soft_reset();
                        Phase::Done
                    }
                    0x3A => Phase::ReadBuf,
                    0x7A => Phase::WriteBuf,
                    _ => match byte & 0xE0 {
                        0x00 => Phase::ReadCtrl {
                            addr: arg,
                            dummy_pending: self.is_mac_mii(arg),
                            value: None,
                        },
                        0x40 => Phase::WriteCtrl(arg),
                        0x80 => Phase::BitSet(arg),
                        0xA0 => Phase::BitClear(arg),
                        _ => {
                            self.protocol_errors.push(format!("unknown opcode {:#04x}", byte));
                            Phase::Done
                        }
                    },
                }
            }
            Phase::WriteCtrl(addr) => {
                self.write_ctrl(addr, byte);
                Phase::Done
            }
            Phase::BitSet(addr) => {
                self.bit_op(addr, byte, true);
                Phase::Done
            }
            Phase::BitClear(addr) => {
                self.bit_op(addr, byte, false);
                Phase::Done
            }
            Phase::WriteBuf => {
                let at = self.reg16(0, EWRPTL);
                self.mem[usize::from(at) % MEM_SIZE] = byte;
                self.set_reg16(0, EWRPTL, at.wrapping_add(1));
                Phase::WriteBuf
            }
            phase => {
                self.protocol_errors.push(format!("unexpected byte {:#04x} in {:?}", byte, phase));
                phase
            }
        };
    }

    fn next_read(&mut self) -> u8 {
        let phase = self.phase;
        match phase {
            Phase::ReadCtrl { addr, dummy_pending: true, value } => {
                self.phase = Phase::ReadCtrl { addr, dummy_pending: false, value };
                0xA5
            }
            Phase::ReadCtrl { addr, dummy_pending: false, value } => {
                let value = match value {
                    Some(v) => v,
                    None => self.read_ctrl(addr),
                };
                self.phase = Phase::ReadCtrl { addr, dummy_pending: false, value: Some(value) };
                value
            }
            Phase::ReadBuf => {
                let at = self.reg16(0, ERDPTL);
                let byte = self.mem[usize::from(at) % MEM_SIZE];
                let next = self.ring_next(at);
                self.set_reg16(0, ERDPTL, next);
                byte
            }
            phase => {
                self.protocol_errors.push(format!("read in {:?}", phase));
                0xFF
            }
        }
    }
}

/// Simulated chip; clones share the same state
#[derive(Clone)]
pub struct SimChip(Rc<RefCell<ChipState>>);

impl SimChip {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(ChipState::new())))
    }

    /// Queue a frame in the RX ring as the MAC would, with the given status word
    pub fn inject_with_status(&self, frame: &[u8], status: u16) -> u16 {
        let mut s = self.0.borrow_mut();
        let at = match s.rx_write {
            Some(at) => at,
            None => s.rx_start(),
        };
        let stored_len = frame.len() + FAKE_CRC.len();
        let mut next = s.ring_advance(at, 6 + stored_len);
        if next % 2 == 1 {
            next = s.ring_next(next);
        }

        let mut bytes = Vec::with_capacity(6 + stored_len);
        bytes.extend_from_slice(&next.to_le_bytes());
        bytes.extend_from_slice(&(stored_len as u16).to_le_bytes());
        bytes.extend_from_slice(&status.to_le_bytes());
        bytes.extend_from_slice(frame);
        bytes.extend_from_slice(&FAKE_CRC);

        let mut p = at;
        for b in bytes {
            s.mem[usize::from(p)] = b;
            p = s.ring_next(p);
        }
        s.rx_write = Some(next);
        s.banks[1][EPKTCNT] += 1;
        next
    }

    /// Queue a frame received without error; returns its next-packet pointer
    pub fn inject(&self, frame: &[u8]) -> u16 {
        self.inject_with_status(frame, 0x0080)
    }

    /// Queue a frame the MAC flagged (CRC error, received-OK clear)
    pub fn inject_bad(&self, frame: &[u8]) -> u16 {
        self.inject_with_status(frame, 0x0010)
    }

    /// Start the ring write position somewhere other than ERXST
    pub fn set_rx_write(&self, at: u16) {
        self.0.borrow_mut().rx_write = Some(at);
    }

    pub fn packet_count(&self) -> u8 {
        self.0.borrow().banks[1][EPKTCNT]
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.0.borrow().sent.clone()
    }

    pub fn take_sent(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.0.borrow_mut().sent)
    }

    pub fn control_bytes(&self) -> Vec<u8> {
        self.0.borrow().control_bytes.clone()
    }

    /// Register value by bank and in-bank address (mirrored ones: any bank)
    pub fn reg(&self, bank: usize, addr: usize) -> u8 {
        let s = self.0.borrow();
        if addr >= 0x1B { s.banks[0][addr] } else { s.banks[bank][addr] }
    }

    pub fn reg16(&self, bank: usize, low: usize) -> u16 {
        self.0.borrow().reg16(bank, low)
    }

    pub fn selected_bank(&self) -> u8 {
        self.0.borrow().banks[0][ECON1] & 0x03
    }

    pub fn phy(&self, reg: u8) -> u16 {
        self.0.borrow().phy[usize::from(reg)]
    }

    pub fn set_phy(&self, reg: u8, value: u16) {
        self.0.borrow_mut().phy[usize::from(reg)] = value;
    }

    pub fn phy_writes(&self) -> Vec<(u8, u16)> {
        self.0.borrow().phy_writes.clone()
    }

    pub fn mem(&self, at: usize, len: usize) -> Vec<u8> {
        self.0.borrow().mem[at..at + len].to_vec()
    }

    pub fn transactions(&self) -> Vec<Vec<u8>> {
        self.0.borrow().transactions.clone()
    }

    pub fn clear_transactions(&self) {
        self.0.borrow_mut().transactions.clear();
    }

    /// Bank-select sequences (BFC ECON1, BSEL1|BSEL0) seen on the bus
    pub fn bank_switches(&self) -> usize {
        self.0
            .borrow()
            .transactions
            .iter()
            .filter(|t| t.as_slice() == [0xA0 | 0x1F, 0x03])
            .count()
    }

    pub fn resets(&self) -> u32 {
        self.0.borrow().resets
    }

    pub fn bus_config(&self) -> Option<BusConfig> {
        self.0.borrow().bus_config
    }

    pub fn is_selected(&self) -> bool {
        self.0.borrow().selected
    }

    pub fn protocol_errors(&self) -> Vec<String> {
        self.0.borrow().protocol_errors.clone()
    }

    pub fn set_tx_error(&self, on: bool) {
        self.0.borrow_mut().tx_error = on;
    }

    pub fn set_stall_tx(&self, on: bool) {
        self.0.borrow_mut().stall_tx = on;
    }

    pub fn set_phy_stuck(&self, on: bool) {
        self.0.borrow_mut().phy_stuck = on;
    }

    pub fn set_clock_stuck(&self, on: bool) {
        self.0.borrow_mut().clock_stuck = on;
    }

    pub fn set_fail_bus(&self, on: bool) {
        self.0.borrow_mut().fail_bus = on;
    }
}

impl SpiBus for SimChip {
    type Error = SimError;

    fn configure(&mut self, config: &BusConfig) -> Result<(), SimError> {
        let mut s = self.0.borrow_mut();
        if s.fail_bus {
            return Err(SimError);
        }
        s.bus_config = Some(*config);
        Ok(())
    }

    fn select(&mut self) -> Result<(), SimError> {
        let mut s = self.0.borrow_mut();
        if s.selected {
            s.protocol_errors.push("select while selected".to_string());
        }
        s.selected = true;
        s.phase = Phase::Opcode;
        s.current.clear();
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), SimError> {
        let mut s = self.0.borrow_mut();
        if !s.selected {
            s.protocol_errors.push("deselect while idle".to_string());
        }
        s.selected = false;
        s.phase = Phase::Opcode;
        let done = std::mem::take(&mut s.current);
        s.transactions.push(done);
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SimError> {
        let mut s = self.0.borrow_mut();
        if s.fail_bus {
            return Err(SimError);
        }
        if !s.selected {
            s.protocol_errors.push("write without chip select".to_string());
            return Ok(());
        }
        for &b in bytes {
            s.current.push(b);
            s.step(b);
        }
        Ok(())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<(), SimError> {
        let mut s = self.0.borrow_mut();
        if s.fail_bus {
            return Err(SimError);
        }
        if !s.selected {
            s.protocol_errors.push("read without chip select".to_string());
        }
        for slot in buffer.iter_mut() {
            *slot = s.next_read();
        }
        Ok(())
    }

    fn tx_ready(&mut self) -> Result<bool, SimError> {
        Ok(!self.0.borrow().stall_tx)
    }
}

pub fn init_driver(chip: &SimChip) -> Enc28j60<SimChip> {
    Enc28j60::new(chip.clone(), Enc28j60Config::new(CHIP_MAC)).expect("driver init")
}

/// In-memory device: frames queued in `inbox`, transmissions recorded in `sent`
#[derive(Default)]
pub struct RecordingDevice {
    pub inbox: VecDeque<Vec<u8>>,
    pub sent: Vec<Vec<u8>>,
    pub fail_transmit: bool,
}

impl NetworkDevice for RecordingDevice {
    type Error = SimError;

    fn mac_address(&self) -> [u8; 6] {
        CHIP_MAC
    }

    fn transmit(&mut self, frame: &[u8]) -> Result<(), SimError> {
        if self.fail_transmit {
            return Err(SimError);
        }
        self.sent.push(frame.to_vec());
        Ok(())
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, SimError> {
        let Some(frame) = self.inbox.pop_front() else {
            return Ok(0);
        };
        let len = frame.len().min(buffer.len().saturating_sub(1));
        buffer[..len].copy_from_slice(&frame[..len]);
        Ok(len)
    }

    fn link_status(&mut self) -> Result<LinkStatus, SimError> {
        Ok(LinkStatus::Up)
    }

    fn device_name(&self) -> &str {
        "recording"
    }

    fn is_ready(&self) -> bool {
        true
    }
}

/// RFC 1071 checksum, independent of the crate's implementation
pub fn inet_checksum(chunks: &[&[u8]]) -> u16 {
    let mut bytes = Vec::new();
    for chunk in chunks {
        bytes.extend_from_slice(chunk);
    }
    if bytes.len() % 2 == 1 {
        bytes.push(0);
    }
    let mut sum: u32 = bytes
        .chunks(2)
        .map(|w| u32::from(u16::from_be_bytes([w[0], w[1]])))
        .sum();
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}

/// TCP/UDP checksum with an explicit pseudo-header
pub fn transport_checksum(frame: &[u8], proto: u8, segment_len: usize) -> u16 {
    let pseudo_tail = [0, proto, (segment_len >> 8) as u8, segment_len as u8];
    inet_checksum(&[&frame[26..34], &pseudo_tail, &frame[34..34 + segment_len]])
}

fn eth_header(dst: &[u8; 6], src: &[u8; 6], ethertype: u16) -> Vec<u8> {
    let mut frame = Vec::new();
    frame.extend_from_slice(dst);
    frame.extend_from_slice(src);
    frame.extend_from_slice(&ethertype.to_be_bytes());
    frame
}

fn ip_header(total_len: u16, proto: u8, src: Ipv4Addr, dst: Ipv4Addr) -> Vec<u8> {
    let mut header = vec![0x45, 0x00];
    header.extend_from_slice(&total_len.to_be_bytes());
    header.extend_from_slice(&[0x4E, 0x21, 0x40, 0x00, 64, proto, 0, 0]);
    header.extend_from_slice(&src.octets());
    header.extend_from_slice(&dst.octets());
    let ck = inet_checksum(&[&header]);
    header[10..12].copy_from_slice(&ck.to_be_bytes());
    header
}

/// Broadcast "who has `target`" from the peer
pub fn arp_request(target: Ipv4Addr) -> Vec<u8> {
    let mut frame = eth_header(&[0xFF; 6], &PEER_MAC, 0x0806);
    frame.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 6, 4, 0x00, 0x01]);
    frame.extend_from_slice(&PEER_MAC);
    frame.extend_from_slice(&PEER_IP.octets());
    frame.extend_from_slice(&[0; 6]);
    frame.extend_from_slice(&target.octets());
    frame
}

/// Echo request from the peer to us with a correct checksum
pub fn echo_request(id: u16, seq: u16, payload: &[u8]) -> Vec<u8> {
    let mut icmp = vec![8, 0, 0, 0];
    icmp.extend_from_slice(&id.to_be_bytes());
    icmp.extend_from_slice(&seq.to_be_bytes());
    icmp.extend_from_slice(payload);
    let ck = inet_checksum(&[&icmp]);
    icmp[2..4].copy_from_slice(&ck.to_be_bytes());

    let mut frame = eth_header(&CHIP_MAC, &PEER_MAC, 0x0800);
    frame.extend(ip_header(20 + icmp.len() as u16, 1, PEER_IP, LOCAL_IP));
    frame.extend(icmp);
    frame
}

/// Datagram from the peer to us
pub fn udp_datagram(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let udp_len = 8 + payload.len();
    let mut frame = eth_header(&CHIP_MAC, &PEER_MAC, 0x0800);
    frame.extend(ip_header(20 + udp_len as u16, 17, PEER_IP, LOCAL_IP));
    frame.extend_from_slice(&src_port.to_be_bytes());
    frame.extend_from_slice(&dst_port.to_be_bytes());
    frame.extend_from_slice(&(udp_len as u16).to_be_bytes());
    frame.extend_from_slice(&[0, 0]);
    frame.extend_from_slice(payload);
    let ck = transport_checksum(&frame, 17, udp_len);
    frame[40..42].copy_from_slice(&ck.to_be_bytes());
    frame
}

/// Segment from the peer's `src_port` to our port with a 20-byte header
pub fn tcp_segment(src_port: u16, flags: u8, seq: u32, ack: u32, payload: &[u8]) -> Vec<u8> {
    let tcp_len = 20 + payload.len();
    let mut frame = eth_header(&CHIP_MAC, &PEER_MAC, 0x0800);
    frame.extend(ip_header(20 + tcp_len as u16, 6, PEER_IP, LOCAL_IP));
    frame.extend_from_slice(&src_port.to_be_bytes());
    frame.extend_from_slice(&u16::from(WWW_PORT).to_be_bytes());
    frame.extend_from_slice(&seq.to_be_bytes());
    frame.extend_from_slice(&ack.to_be_bytes());
    frame.extend_from_slice(&[0x50, flags, 0x16, 0xD0, 0, 0, 0, 0]);
    frame.extend_from_slice(payload);
    let ck = transport_checksum(&frame, 6, tcp_len);
    frame[50..52].copy_from_slice(&ck.to_be_bytes());
    frame
}

/// SYN from the peer carrying its own MSS option (24-byte header)
pub fn tcp_syn(src_port: u16, seq: u32) -> Vec<u8> {
    let mut frame = eth_header(&CHIP_MAC, &PEER_MAC, 0x0800);
    frame.extend(ip_header(44, 6, PEER_IP, LOCAL_IP));
    frame.extend_from_slice(&src_port.to_be_bytes());
    frame.extend_from_slice(&u16::from(WWW_PORT).to_be_bytes());
    frame.extend_from_slice(&seq.to_be_bytes());
    frame.extend_from_slice(&[0; 4]);
    frame.extend_from_slice(&[0x60, 0x02, 0xFA, 0xF0, 0, 0, 0, 0]);
    frame.extend_from_slice(&[2, 4, 0x05, 0xB4]);
    let ck = transport_checksum(&frame, 6, 24);
    frame[50..52].copy_from_slice(&ck.to_be_bytes());
    frame
}

/// Copy `frame` into a zeroed buffer of `size` bytes
pub fn buffer_with(frame: &[u8], size: usize) -> Vec<u8> {
    let mut buf = vec![0u8; size];
    buf[..frame.len()].copy_from_slice(frame);
    buf
}
