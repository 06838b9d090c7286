//! ENC28J60 Ethernet support for small microcontrollers.
//!
//! Two layers:
//! - [`drivers::net::enc28j60`] talks to the MAC+PHY chip over SPI: register
//!   banking, PHY access, and the on-chip receive ring.
//! - [`net`] answers ARP, ping, one-shot UDP and single-segment TCP by
//!   rewriting headers in place inside one caller-owned frame buffer.
//!
//! The board glue owns the SPI peripheral and the main loop; it hands a
//! [`drivers::net::SpiBus`] to the driver and a frame buffer to the stack.

#![cfg_attr(not(test), no_std)]

pub mod serial;

// Network drivers
pub mod drivers;

// Protocol engine
pub mod net;
