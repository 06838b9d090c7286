// ENC28J60 Network Driver Implementation
//
// Every register and buffer access is one SPI transaction: select, opcode
// byte (with the 5-bit in-bank address for control registers), data,
// deselect. Control registers live in four banks selected through ECON1;
// the driver caches the selected bank so it only touches ECON1 on a change.

use core::fmt;

use crate::serial_println;
use super::{BusConfig, LinkStatus, NetworkDevice, SpiBus, Unbounded, WaitPolicy};

pub mod consts;
pub mod registers;

use consts::*;
use registers::*;

/// Hardware condition a busy-wait is polling for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitKind {
    /// SPI transmit register drained
    TxReady,
    /// Oscillator start-up after reset (ESTAT.CLKRDY)
    ClockReady,
    /// PHY register operation finished (MISTAT.BUSY clear)
    PhyBusy,
}

impl fmt::Display for WaitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitKind::TxReady => write!(f, "SPI transmit ready"),
            WaitKind::ClockReady => write!(f, "oscillator ready"),
            WaitKind::PhyBusy => write!(f, "PHY not busy"),
        }
    }
}

/// Errors surfaced by the driver
///
/// Chip-level irregularities (empty ring, bad CRC, transmit error) are
/// handled internally and never show up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError<E> {
    /// The SPI bus itself failed
    Bus(E),
    /// The wait policy gave up on a hardware busy-wait
    Timeout(WaitKind),
}

impl<E: fmt::Debug> fmt::Display for DriverError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Bus(err) => write!(f, "SPI bus error: {:?}", err),
            DriverError::Timeout(kind) => write!(f, "timed out waiting for {}", kind),
        }
    }
}

/// Split of the 8KB buffer memory into the RX ring and the TX area.
///
/// Programmed once at init and never moved afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferLayout {
    rx_start: u16,
    rx_end: u16,
    tx_start: u16,
    tx_end: u16,
}

impl BufferLayout {
    /// RX ring of `rx_size` bytes at the bottom of memory, TX gets the rest.
    ///
    /// Returns `None` when the TX area could not hold one maximum-size frame
    /// with its control byte and status vector.
    pub const fn with_rx_size(rx_size: u16) -> Option<Self> {
        let max_rx = BUFFER_SIZE as u16 - (MAX_FRAMELEN + TX_OVERHEAD);
        if rx_size == 0 || rx_size > max_rx {
            return None;
        }
        Some(Self {
            rx_start: RX_START,
            rx_end: RX_START + rx_size - 1,
            tx_start: RX_START + rx_size,
            tx_end: BUFFER_END,
        })
    }

    pub const fn rx_start(&self) -> u16 {
        self.rx_start
    }

    pub const fn rx_end(&self) -> u16 {
        self.rx_end
    }

    pub const fn tx_start(&self) -> u16 {
        self.tx_start
    }

    pub const fn tx_end(&self) -> u16 {
        self.tx_end
    }

    pub const fn rx_size(&self) -> u16 {
        self.rx_end - self.rx_start + 1
    }

    pub const fn tx_size(&self) -> u16 {
        self.tx_end - self.tx_start + 1
    }
}

impl Default for BufferLayout {
    fn default() -> Self {
        Self {
            rx_start: RX_START,
            rx_end: RX_START + DEFAULT_RX_SIZE - 1,
            tx_start: RX_START + DEFAULT_RX_SIZE,
            tx_end: BUFFER_END,
        }
    }
}

/// Everything the driver needs at init
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enc28j60Config {
    /// Station address, in wire order
    pub mac: [u8; 6],
    pub layout: BufferLayout,
    /// Passed untouched to [`SpiBus::configure`]
    pub bus: BusConfig,
    /// ECOCON value for the CLKOUT pin, if the board uses it
    pub clkout: Option<u8>,
}

impl Enc28j60Config {
    pub fn new(mac: [u8; 6]) -> Self {
        Self {
            mac,
            layout: BufferLayout::default(),
            bus: BusConfig::default(),
            clkout: None,
        }
    }
}

/// Receive status vector the chip writes in front of every frame in the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxDescriptor {
    /// Ring address of the following frame's descriptor
    pub next_packet: u16,
    /// Frame length including the 4-byte CRC
    pub frame_length: u16,
    pub status: u16,
}

impl RxDescriptor {
    /// Decode the little-endian on-chip layout
    pub fn from_bytes(raw: &[u8; RSV_LENGTH]) -> Self {
        Self {
            next_packet: u16::from_le_bytes([raw[0], raw[1]]),
            frame_length: u16::from_le_bytes([raw[2], raw[3]]),
            status: u16::from_le_bytes([raw[4], raw[5]]),
        }
    }

    pub fn received_ok(&self) -> bool {
        (self.status as u8) & RSV_RECEIVED_OK != 0
    }

    /// Frame length without the trailing CRC
    pub fn payload_len(&self) -> u16 {
        self.frame_length.saturating_sub(CRC_SIZE)
    }
}

/// ENC28J60 Network Controller Driver
pub struct Enc28j60<B: SpiBus, P: WaitPolicy = Unbounded> {
    bus: B,
    /// Bounds every hardware busy-wait
    policy: P,
    /// Bank most recently selected in ECON1
    bank: u8,
    /// Ring address of the next unread descriptor
    next_packet: u16,
    /// MAC address of the device
    mac_addr: [u8; 6],
    layout: BufferLayout,
    /// Device initialized flag
    initialized: bool,
}

impl<B: SpiBus> Enc28j60<B, Unbounded> {
    /// Reset and initialize the chip, waiting on the hardware as long as it takes
    pub fn new(bus: B, config: Enc28j60Config) -> Result<Self, DriverError<B::Error>> {
        Self::with_policy(bus, Unbounded, config)
    }
}

impl<B: SpiBus, P: WaitPolicy> Enc28j60<B, P> {
    /// Reset and initialize the chip, bounding busy-waits with `policy`
    pub fn with_policy(
        bus: B,
        policy: P,
        config: Enc28j60Config,
    ) -> Result<Self, DriverError<B::Error>> {
        let mut driver = Self {
            bus,
            policy,
            bank: 0,
            next_packet: config.layout.rx_start(),
            mac_addr: config.mac,
            layout: config.layout,
            initialized: false,
        };

        if let Err(err) = driver.initialize(&config) {
            serial_println!("[ENC28J60] Failed to initialize device: {}", err);
            return Err(err);
        }

        Ok(driver)
    }

    /// Give the bus back, e.g. to share it with another chip
    pub fn release(self) -> B {
        self.bus
    }

    pub fn layout(&self) -> BufferLayout {
        self.layout
    }

    /// Bank the driver believes ECON1 currently selects
    pub fn current_bank(&self) -> u8 {
        self.bank
    }

    /// Ring address of the next descriptor `packet_received` will read
    pub fn next_packet_ptr(&self) -> u16 {
        self.next_packet
    }

    fn initialize(&mut self, config: &Enc28j60Config) -> Result<(), DriverError<B::Error>> {
        serial_println!("[ENC28J60] Starting device initialization...");

        self.bus.configure(&config.bus).map_err(DriverError::Bus)?;

        // Step 1: Software reset, then wait for the oscillator
        self.soft_reset()?;
        self.poll_until(WaitKind::ClockReady, |drv| {
            Ok(drv.read_register(ESTAT)? & ESTAT_CLKRDY != 0)
        })?;

        // Step 2: Partition buffer memory
        self.configure_buffers()?;

        // Step 3: Receive filters
        self.configure_filters()?;

        // Step 4: MAC
        self.configure_mac()?;
        self.write_mac_address()?;

        // Step 5: PHY and LEDs
        self.configure_phy()?;

        if let Some(clk) = config.clkout {
            self.set_clkout(clk)?;
        }

        // Step 6: Interrupts, then reception last
        self.bit_set(EIE, EIE_INTIE | EIE_PKTIE)?;
        self.bit_set(ECON1, ECON1_RXEN)?;

        self.initialized = true;
        let revision = self.revision()?;
        serial_println!(
            "[ENC28J60] Initialization complete (rev {:#04x}), MAC {:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            revision,
            self.mac_addr[0], self.mac_addr[1], self.mac_addr[2],
            self.mac_addr[3], self.mac_addr[4], self.mac_addr[5]
        );

        Ok(())
    }

    fn soft_reset(&mut self) -> Result<(), DriverError<B::Error>> {
        serial_println!("[ENC28J60] Performing software reset...");
        self.transaction(|drv| {
            drv.bus.write(&[OP_SOFT_RESET]).map_err(DriverError::Bus)?;
            drv.wait_tx_ready()
        })?;
        // ECON1 comes out of reset with bank 0 selected
        self.bank = 0;
        Ok(())
    }

    fn configure_buffers(&mut self) -> Result<(), DriverError<B::Error>> {
        let layout = self.layout;
        serial_println!(
            "[ENC28J60] RX ring {:#06x}-{:#06x}, TX area {:#06x}-{:#06x}",
            layout.rx_start(), layout.rx_end(), layout.tx_start(), layout.tx_end()
        );

        self.next_packet = layout.rx_start();
        self.write_register16(ERXSTL, layout.rx_start())?;
        self.write_register16(ERXRDPTL, layout.rx_start())?;
        self.write_register16(ERXNDL, layout.rx_end())?;
        self.write_register16(ETXSTL, layout.tx_start())?;
        self.write_register16(ETXNDL, layout.tx_end())?;
        Ok(())
    }

    /// Unicast frames for our MAC with a good CRC, plus broadcast ARP.
    ///
    /// The pattern matcher checks the broadcast destination and the ARP
    /// ethertype so other broadcast traffic never reaches the ring.
    fn configure_filters(&mut self) -> Result<(), DriverError<B::Error>> {
        self.write_register(ERXFCON, ERXFCON_UCEN | ERXFCON_CRCEN | ERXFCON_PMEN)?;
        self.write_register(EPMM0, ARP_PATTERN_MASK[0])?;
        self.write_register(EPMM1, ARP_PATTERN_MASK[1])?;
        self.write_register16(EPMCSL, ARP_PATTERN_CHECKSUM)?;
        Ok(())
    }

    fn configure_mac(&mut self) -> Result<(), DriverError<B::Error>> {
        self.write_register(MACON1, MACON1_MARXEN | MACON1_TXPAUS | MACON1_RXPAUS)?;
        // bring MAC out of reset
        self.write_register(MACON2, 0x00)?;
        self.write_register(MACON3, MACON3_PADCFG0 | MACON3_TXCRCEN | MACON3_FRMLNEN)?;
        self.write_register16(MAIPGL, MAIPG_NON_BACK_TO_BACK)?;
        self.write_register(MABBIPG, MABBIPG_BACK_TO_BACK)?;
        self.write_register16(MAMXFLL, MAX_FRAMELEN)?;
        Ok(())
    }

    fn write_mac_address(&mut self) -> Result<(), DriverError<B::Error>> {
        let mac = self.mac_addr;
        for (reg, byte) in MAC_REGISTERS.into_iter().zip(mac) {
            self.write_register(reg, byte)?;
        }
        Ok(())
    }

    fn configure_phy(&mut self) -> Result<(), DriverError<B::Error>> {
        self.phy_write(PHCON2, PHCON2_HDLDIS)?;
        for leds in LED_SEQUENCE {
            self.phy_write(PHLCON, leds)?;
        }
        Ok(())
    }

    /// Silicon revision (EREVID)
    pub fn revision(&mut self) -> Result<u8, DriverError<B::Error>> {
        self.read_register(EREVID)
    }

    /// Drive the CLKOUT pin; only the low three bits of `clk` are used
    pub fn set_clkout(&mut self, clk: u8) -> Result<(), DriverError<B::Error>> {
        self.write_register(ECOCON, clk & ECOCON_MASK)
    }

    /// Frames waiting in the RX ring (EPKTCNT)
    pub fn packet_count(&mut self) -> Result<u8, DriverError<B::Error>> {
        self.read_register(EPKTCNT)
    }

    /// Copy the next frame out of the RX ring.
    ///
    /// Returns the number of bytes copied into `buffer`, or 0 when the ring
    /// is empty or the frame was received with an error. At most
    /// `buffer.len() - 1` bytes are copied; the byte after the frame is set
    /// to zero. Each descriptor read is released back to the chip exactly once.
    pub fn packet_received(&mut self, buffer: &mut [u8]) -> Result<usize, DriverError<B::Error>> {
        // EIR.PKTIF is unreliable (Rev. B silicon errata), the counter is not
        if self.read_register(EPKTCNT)? == 0 {
            return Ok(0);
        }

        self.write_register16(ERDPTL, self.next_packet)?;
        let mut raw = [0u8; RSV_LENGTH];
        self.read_buffer(&mut raw)?;
        let descriptor = RxDescriptor::from_bytes(&raw);
        self.next_packet = descriptor.next_packet;

        let mut len = usize::from(descriptor.payload_len()).min(buffer.len().saturating_sub(1));
        if !descriptor.received_ok() {
            serial_println!(
                "[ENC28J60] RX error: status={:#06x}, dropping {} bytes",
                descriptor.status, descriptor.frame_length
            );
            len = 0;
        } else if len > 0 {
            self.read_buffer(&mut buffer[..len])?;
            buffer[len] = 0;
        }

        #[cfg(feature = "trace-frames")]
        serial_println!("[ENC28J60] Received packet: {} bytes, next at {:#06x}", len, self.next_packet);

        // Move ERXRDPT past the frame to free its ring space, then drop the count
        self.write_register16(ERXRDPTL, self.next_packet)?;
        self.bit_set(ECON2, ECON2_PKTDEC)?;

        Ok(len)
    }

    /// Hand a frame to the MAC for transmission.
    ///
    /// Returns once the chip has the frame; completion is not awaited.
    pub fn packet_send(&mut self, frame: &[u8]) -> Result<(), DriverError<B::Error>> {
        let frame = if frame.len() > usize::from(MAX_FRAMELEN) {
            serial_println!("[ENC28J60] TX frame of {} bytes truncated to {}", frame.len(), MAX_FRAMELEN);
            &frame[..usize::from(MAX_FRAMELEN)]
        } else {
            frame
        };
        let start = self.layout.tx_start();
        // length is bounded by MAX_FRAMELEN above
        let end = start + frame.len() as u16;

        self.write_register16(EWRPTL, start)?;
        self.write_register16(ETXNDL, end)?;
        // per-packet control byte: 0 = use MACON3 settings
        self.write_op(OP_WRITE_BUF_MEM, 0, 0x00)?;
        if !frame.is_empty() {
            self.write_buffer(frame)?;
        }
        self.bit_set(ECON1, ECON1_TXRTS)?;

        // Rev. B silicon errata: a transmit error leaves TXRTS stuck
        if self.read_register(EIR)? & EIR_TXERIF != 0 {
            serial_println!("[ENC28J60] TX error flagged, clearing transmit request");
            self.bit_clear(ECON1, ECON1_TXRTS)?;
        }

        #[cfg(feature = "trace-frames")]
        serial_println!("[ENC28J60] Transmitted packet: {} bytes", frame.len());

        Ok(())
    }

    /// Read a control register, switching banks if needed
    pub fn read_register(&mut self, reg: u8) -> Result<u8, DriverError<B::Error>> {
        self.set_bank(reg)?;
        self.read_op(OP_READ_CTRL_REG, reg)
    }

    /// Write a control register, switching banks if needed
    pub fn write_register(&mut self, reg: u8, value: u8) -> Result<(), DriverError<B::Error>> {
        self.set_bank(reg)?;
        self.write_op(OP_WRITE_CTRL_REG, reg, value)
    }

    /// Write a low/high register pair, low byte first
    fn write_register16(&mut self, reg_low: u8, value: u16) -> Result<(), DriverError<B::Error>> {
        let [low, high] = value.to_le_bytes();
        self.write_register(reg_low, low)?;
        self.write_register(reg_low + 1, high)
    }

    fn bit_set(&mut self, reg: u8, mask: u8) -> Result<(), DriverError<B::Error>> {
        self.set_bank(reg)?;
        self.write_op(OP_BIT_FIELD_SET, reg, mask)
    }

    fn bit_clear(&mut self, reg: u8, mask: u8) -> Result<(), DriverError<B::Error>> {
        self.set_bank(reg)?;
        self.write_op(OP_BIT_FIELD_CLR, reg, mask)
    }

    /// Write a PHY register and wait for the MII to finish
    pub fn phy_write(&mut self, addr: u8, value: u16) -> Result<(), DriverError<B::Error>> {
        let [low, high] = value.to_le_bytes();
        self.write_register(MIREGADR, addr)?;
        self.write_register(MIWRL, low)?;
        // writing the high byte starts the operation
        self.write_register(MIWRH, high)?;
        self.wait_phy_idle()
    }

    /// Read a PHY register
    pub fn phy_read(&mut self, addr: u8) -> Result<u16, DriverError<B::Error>> {
        self.write_register(MIREGADR, addr)?;
        self.write_register(MICMD, MICMD_MIIRD)?;
        self.wait_phy_idle()?;
        self.write_register(MICMD, 0x00)?;
        let low = self.read_register(MIRDL)?;
        let high = self.read_register(MIRDH)?;
        Ok(u16::from_le_bytes([low, high]))
    }

    fn wait_phy_idle(&mut self) -> Result<(), DriverError<B::Error>> {
        self.poll_until(WaitKind::PhyBusy, |drv| {
            Ok(drv.read_register(MISTAT)? & MISTAT_BUSY == 0)
        })
    }

    /// Select the bank holding `reg`; the mirrored registers need none.
    fn set_bank(&mut self, reg: u8) -> Result<(), DriverError<B::Error>> {
        if is_common(reg) {
            return Ok(());
        }
        let target = bank(reg);
        if target != self.bank {
            self.write_op(OP_BIT_FIELD_CLR, ECON1, ECON1_BSEL1 | ECON1_BSEL0)?;
            self.bank = 0;
            self.write_op(OP_BIT_FIELD_SET, ECON1, target)?;
            self.bank = target;
        }
        Ok(())
    }

    fn read_op(&mut self, op: u8, reg: u8) -> Result<u8, DriverError<B::Error>> {
        self.transaction(|drv| {
            drv.bus.write(&[op | address(reg)]).map_err(DriverError::Bus)?;
            drv.wait_tx_ready()?;
            let mut data = [0u8; 2];
            let data = if is_mac_mii(reg) { &mut data[..] } else { &mut data[..1] };
            drv.bus.read(data).map_err(DriverError::Bus)?;
            Ok(data[data.len() - 1])
        })
    }

    fn write_op(&mut self, op: u8, reg: u8, value: u8) -> Result<(), DriverError<B::Error>> {
        self.transaction(|drv| {
            drv.bus.write(&[op | address(reg)]).map_err(DriverError::Bus)?;
            drv.wait_tx_ready()?;
            drv.bus.write(&[value]).map_err(DriverError::Bus)?;
            drv.wait_tx_ready()
        })
    }

    fn read_buffer(&mut self, data: &mut [u8]) -> Result<(), DriverError<B::Error>> {
        self.transaction(|drv| {
            drv.bus.write(&[OP_READ_BUF_MEM]).map_err(DriverError::Bus)?;
            drv.wait_tx_ready()?;
            drv.bus.read(data).map_err(DriverError::Bus)
        })
    }

    fn write_buffer(&mut self, data: &[u8]) -> Result<(), DriverError<B::Error>> {
        self.transaction(|drv| {
            drv.bus.write(&[OP_WRITE_BUF_MEM]).map_err(DriverError::Bus)?;
            drv.wait_tx_ready()?;
            drv.bus.write(data).map_err(DriverError::Bus)?;
            drv.wait_tx_ready()
        })
    }

    /// Run `op` with the chip selected, releasing it even if `op` failed
    fn transaction<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, DriverError<B::Error>>,
    ) -> Result<T, DriverError<B::Error>> {
        self.bus.select().map_err(DriverError::Bus)?;
        let result = op(self);
        self.bus.deselect().map_err(DriverError::Bus)?;
        result
    }

    fn wait_tx_ready(&mut self) -> Result<(), DriverError<B::Error>> {
        self.poll_until(WaitKind::TxReady, |drv| drv.bus.tx_ready().map_err(DriverError::Bus))
    }

    /// Poll `ready` until it reports true or the wait policy gives up
    fn poll_until(
        &mut self,
        kind: WaitKind,
        mut ready: impl FnMut(&mut Self) -> Result<bool, DriverError<B::Error>>,
    ) -> Result<(), DriverError<B::Error>> {
        let mut attempts: u32 = 0;
        loop {
            if ready(self)? {
                return Ok(());
            }
            attempts = attempts.saturating_add(1);
            if !self.policy.retry(attempts) {
                serial_println!("[ENC28J60] Gave up waiting for {} after {} polls", kind, attempts);
                return Err(DriverError::Timeout(kind));
            }
        }
    }
}

impl<B: SpiBus, P: WaitPolicy> NetworkDevice for Enc28j60<B, P> {
    type Error = DriverError<B::Error>;

    fn mac_address(&self) -> [u8; 6] {
        self.mac_addr
    }

    fn transmit(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        self.packet_send(frame)
    }

    fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        self.packet_received(buffer)
    }

    fn link_status(&mut self) -> Result<LinkStatus, Self::Error> {
        if !self.initialized {
            return Ok(LinkStatus::Unknown);
        }
        // PHSTAT2.LSTAT reflects the current link state
        if self.phy_read(PHSTAT2)? & PHSTAT2_LSTAT != 0 {
            Ok(LinkStatus::Up)
        } else {
            Ok(LinkStatus::Down)
        }
    }

    fn device_name(&self) -> &str {
        "ENC28J60"
    }

    fn is_ready(&self) -> bool {
        self.initialized
    }
}
