// Network Device Abstraction Layer
pub mod enc28j60;

use core::fmt;

/// link status of a network interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Up,
    Down,
    Unknown,
}

/// Network device trait that all network drivers must implement
///
/// Frames cross this boundary as raw Ethernet bytes without the trailing CRC.
pub trait NetworkDevice {
    /// Failure surfaced by the transport under the device (bus errors, timeouts)
    type Error: fmt::Debug;

    /// Get the MAC address of this device
    fn mac_address(&self) -> [u8; 6];

    /// Transmit a frame
    ///
    /// # Arguments
    /// * `frame` - The raw Ethernet frame to transmit (including header)
    ///
    /// # Returns
    /// * `Ok(())` once the device has accepted the frame for transmission
    /// * `Err(Self::Error)` if the transport failed
    fn transmit(&mut self, frame: &[u8]) -> Result<(), Self::Error>;

    /// Receive a frame if one is available
    ///
    /// # Returns
    /// * `Ok(len)` with `len` bytes copied into `buffer`; `0` means nothing
    ///   usable was pending
    fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error>;

    /// Get the current link status
    fn link_status(&mut self) -> Result<LinkStatus, Self::Error>;

    /// Get device name/identifier
    fn device_name(&self) -> &str;

    /// Check if the device is initialized and ready
    fn is_ready(&self) -> bool;
}

/// Clock polarity/phase of the SPI link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpiMode {
    #[default]
    Mode0,
    Mode1,
    Mode2,
    Mode3,
}

/// Bus parameters handed through to [`SpiBus::configure`] at init.
///
/// The driver never interprets these; they belong to the board's SPI block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// Chip-select line / peripheral slot of the controller
    pub device_id: u8,
    pub mode: SpiMode,
    pub baud_rate: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            mode: SpiMode::Mode0,
            baud_rate: 3_000_000,
        }
    }
}

/// Byte-level access to a synchronous serial bus with a per-chip select line.
///
/// One chip transaction is `select`, one or more `write`/`read` calls, then
/// `deselect`. The driver polls [`SpiBus::tx_ready`] after every write.
pub trait SpiBus {
    type Error: fmt::Debug;

    /// Apply clock/mode settings and enable the peripheral.
    fn configure(&mut self, config: &BusConfig) -> Result<(), Self::Error>;

    /// Assert the chip-select line.
    fn select(&mut self) -> Result<(), Self::Error>;

    /// Release the chip-select line.
    fn deselect(&mut self) -> Result<(), Self::Error>;

    /// Shift `bytes` out, discarding whatever comes back.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Clock `buffer.len()` bytes in.
    fn read(&mut self, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Whether the transmit shift register has drained.
    fn tx_ready(&mut self) -> Result<bool, Self::Error>;
}

/// Decides how long a hardware busy-wait may spin.
///
/// `retry` is consulted after every unsuccessful poll with the number of
/// polls made so far; returning `false` abandons the wait.
pub trait WaitPolicy {
    fn retry(&mut self, attempts: u32) -> bool;
}

/// Poll until the hardware answers, however long that takes.
///
/// Completion is left to the datasheet's latency guarantees; a chip that
/// never answers hangs the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl WaitPolicy for Unbounded {
    fn retry(&mut self, _attempts: u32) -> bool {
        true
    }
}

/// Give up after a fixed number of polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounded {
    pub max_attempts: u32,
}

impl Bounded {
    pub const fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }
}

impl WaitPolicy for Bounded {
    fn retry(&mut self, attempts: u32) -> bool {
        attempts < self.max_attempts
    }
}

impl<P: WaitPolicy + ?Sized> WaitPolicy for &mut P {
    fn retry(&mut self, attempts: u32) -> bool {
        (**self).retry(attempts)
    }
}
