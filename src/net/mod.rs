//! In-place protocol engine
//!
//! Each protocol module knows the fixed offsets of its header inside an
//! Ethernet frame and rewrites a received frame into the answer. [`stack`]
//! strings them together over a [`crate::drivers::net::NetworkDevice`].

pub mod buffer;
pub mod ethernet;
pub mod arp;
pub mod ipv4;
pub mod icmp;
pub mod udp;
pub mod tcp;
pub mod stack;

pub use stack::{Inbound, NetConfig, NetError, SharedStack, Stack};
