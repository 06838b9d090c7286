//! Network Stack Integration
//!
//! [`Stack`] ties the local identity, the two counters the protocols need
//! (TCP sequence seed and IPv4 identifier) and the device together. Every
//! exchange works on one caller-owned frame buffer: receive into it, check
//! what arrived, rewrite it into the answer, transmit it.

use core::fmt;
use core::net::Ipv4Addr;
use spin::Mutex;

use crate::drivers::net::NetworkDevice;
use crate::serial_println;
use super::arp::{self, ARP_FRAME_LEN};
use super::buffer::write_be16;
use super::ethernet::{self, HEADER_SIZE};
use super::icmp::{self, MIN_ICMP_FRAME_LEN};
use super::ipv4::{self, checksum, protocol, ChecksumKind, IP_HEADER_LEN, IP_SRC};
use super::tcp::{
    self, flags, LengthInfo, OutboundSegment, ADVERTISED_WINDOW, INITIAL_SEQUENCE_SEED,
    MSS_OPTION_LEN, TCP_ACK, TCP_CHECKSUM, TCP_DATA, TCP_DST_PORT, TCP_FLAGS,
    TCP_HEADER_LEN_PLAIN, TCP_SRC_PORT, TCP_URGENT, TCP_WINDOW,
};
use super::udp;

/// Ethernet + IPv4 + plain TCP header
const TCP_FRAME_LEN: usize = HEADER_SIZE + IP_HEADER_LEN + TCP_HEADER_LEN_PLAIN;

/// Local identity of the interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetConfig {
    pub mac: [u8; 6],
    pub ip: Ipv4Addr,
    /// Listening TCP port; only 1-255 can be expressed
    pub port: u8,
}

impl NetConfig {
    pub const fn new(mac: [u8; 6], ip: Ipv4Addr, port: u8) -> Self {
        Self { mac, ip, port }
    }
}

/// Errors surfaced by the protocol engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetError<E> {
    /// The device refused the frame
    Device(E),
    /// The frame buffer cannot hold the frame about to be built
    BufferTooSmall { needed: usize, available: usize },
}

impl<E: fmt::Debug> fmt::Display for NetError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::Device(err) => write!(f, "device error: {:?}", err),
            NetError::BufferTooSmall { needed, available } => write!(
                f,
                "frame buffer too small: need {} bytes, have {}",
                needed, available
            ),
        }
    }
}

/// Outcome of [`Stack::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    /// Nothing usable was pending
    Idle,
    /// An ARP request or echo request was answered in place
    Answered,
    /// A frame arrived but was not addressed to us
    Ignored,
    /// IPv4 traffic for us, `len` bytes in the buffer, left to the caller
    Ip { len: usize },
}

/// The protocol engine, owning the device it talks through
pub struct Stack<D: NetworkDevice> {
    device: D,
    config: NetConfig,
    /// Third byte of the next fresh TCP sequence number
    seq_seed: u8,
    /// Identifier of the next IPv4 header built from scratch
    ip_identifier: u16,
    /// Lengths of the segment last passed to `read_length_info`
    length_info: LengthInfo,
}

/// Engine and device behind one lock; the bus session is not reentrant
pub type SharedStack<D> = Mutex<Stack<D>>;

impl<D: NetworkDevice> Stack<D> {
    pub fn new(device: D, config: NetConfig) -> Self {
        serial_println!(
            "[NET] {} up as {} (tcp port {})",
            device.device_name(), config.ip, config.port
        );
        Self {
            device,
            config,
            seq_seed: INITIAL_SEQUENCE_SEED,
            ip_identifier: 1,
            length_info: LengthInfo::default(),
        }
    }

    /// Wrap the engine for sharing between contexts
    pub fn into_shared(self) -> SharedStack<D> {
        Mutex::new(self)
    }

    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    /// Third byte the next fresh sequence number will carry
    pub fn sequence_seed(&self) -> u8 {
        self.seq_seed
    }

    /// Identifier the next built IPv4 header will carry
    pub fn ip_identifier(&self) -> u16 {
        self.ip_identifier
    }

    /// Receive one frame into `buf`; returns its length, 0 if none
    pub fn receive(&mut self, buf: &mut [u8]) -> Result<usize, NetError<D::Error>> {
        self.device.receive(buf).map_err(NetError::Device)
    }

    /// Receive one frame and answer ARP and ping on the spot.
    ///
    /// Anything else addressed to us is handed back as [`Inbound::Ip`].
    pub fn poll(&mut self, buf: &mut [u8]) -> Result<Inbound, NetError<D::Error>> {
        let len = self.receive(buf)?;
        if len == 0 {
            return Ok(Inbound::Idle);
        }
        if self.is_arp(buf, len) {
            if arp::opcode(buf) == arp::ARP_REQUEST {
                self.send_arp_reply(buf)?;
                return Ok(Inbound::Answered);
            }
            return Ok(Inbound::Ignored);
        }
        if !self.is_ip(buf, len) {
            return Ok(Inbound::Ignored);
        }
        if icmp::is_echo_request(buf) {
            self.send_echo_reply(buf, len)?;
            return Ok(Inbound::Answered);
        }
        Ok(Inbound::Ip { len })
    }

    /// ARP frame asking about our address
    pub fn is_arp(&self, buf: &[u8], len: usize) -> bool {
        arp::is_arp(buf, len, self.config.ip)
    }

    /// IPv4 frame without options addressed to us
    pub fn is_ip(&self, buf: &[u8], len: usize) -> bool {
        ipv4::is_ip(buf, len, self.config.ip)
    }

    /// TCP segment for our listening port
    pub fn is_for_us(&self, buf: &[u8]) -> bool {
        tcp::is_for_port(buf, self.config.port)
    }

    /// Answer the ARP request in `buf`
    pub fn send_arp_reply(&mut self, buf: &mut [u8]) -> Result<(), NetError<D::Error>> {
        ensure_capacity(buf, ARP_FRAME_LEN)?;
        let peer = arp::sender_ip(buf);
        arp::make_reply(buf, &self.config.mac, self.config.ip);
        self.transmit(&buf[..ARP_FRAME_LEN])?;
        serial_println!("[ARP] Replied to {}", peer);
        Ok(())
    }

    /// Answer the echo request of `len` bytes in `buf`
    pub fn send_echo_reply(&mut self, buf: &mut [u8], len: usize) -> Result<(), NetError<D::Error>> {
        ensure_capacity(buf, len.max(MIN_ICMP_FRAME_LEN))?;
        let peer = ipv4::source(buf);
        icmp::make_echo_reply(buf, &self.config.mac, self.config.ip);
        self.transmit(&buf[..len])?;
        serial_println!("[ICMP] Echo reply to {} ({} bytes)", peer, len);
        Ok(())
    }

    /// Send `data` back to the sender of the datagram in `buf`, to `port`.
    ///
    /// At most 220 bytes of `data` go out.
    pub fn send_udp(&mut self, buf: &mut [u8], data: &[u8], port: u16) -> Result<(), NetError<D::Error>> {
        ensure_capacity(buf, udp::reply_frame_len(data))?;
        let frame_len = udp::make_reply(buf, data, port, &self.config.mac, self.config.ip);
        self.transmit(&buf[..frame_len])?;
        serial_println!("[UDP] Sent {} bytes to {}:{}", frame_len - udp::UDP_DATA, ipv4::destination(buf), port);
        Ok(())
    }

    /// Rewrite the received TCP header into our reply header.
    ///
    /// See [`tcp::set_reply_header`]; the sequence seed and local port come
    /// from this stack.
    pub fn set_tcp_header(
        &mut self,
        buf: &mut [u8],
        ack_increment: u16,
        negotiate_mss: bool,
        copy_peer_seq: bool,
    ) -> Result<(), NetError<D::Error>> {
        let option_len = if negotiate_mss { MSS_OPTION_LEN } else { 0 };
        ensure_capacity(buf, TCP_FRAME_LEN + option_len)?;
        self.write_reply_header(buf, ack_increment, negotiate_mss, copy_peer_seq);
        Ok(())
    }

    /// Accept the connection the SYN in `buf` asks for
    pub fn send_syn_ack(&mut self, buf: &mut [u8]) -> Result<(), NetError<D::Error>> {
        ensure_capacity(buf, TCP_FRAME_LEN + MSS_OPTION_LEN)?;
        ethernet::swap_mac(buf, &self.config.mac);
        ipv4::set_total_length(buf, (IP_HEADER_LEN + TCP_HEADER_LEN_PLAIN + MSS_OPTION_LEN) as u16);
        ipv4::swap_ip(buf, self.config.ip);
        buf[TCP_FLAGS] = flags::SYN_ACK;
        self.write_reply_header(buf, 1, true, false);
        self.finish_tcp(buf, TCP_HEADER_LEN_PLAIN + MSS_OPTION_LEN)?;
        serial_println!("[TCP] SYN-ACK to {}:{}", ipv4::destination(buf), tcp::dst_port(buf));
        Ok(())
    }

    /// Record the header and payload length of the segment in `buf`
    pub fn read_length_info(&mut self, buf: &[u8]) {
        self.length_info = LengthInfo::from_frame(buf);
    }

    /// Payload offset of the segment last passed to `read_length_info`,
    /// or 0 if it carried no payload
    pub fn data_pointer(&self) -> usize {
        self.length_info.data_pointer()
    }

    /// Payload length recorded by `read_length_info`
    pub fn data_length(&self) -> u16 {
        self.length_info.data_len
    }

    /// Acknowledge the segment in `buf`.
    ///
    /// Call `read_length_info` first: a segment without payload is
    /// acknowledged as one control bit, one with payload by its length.
    pub fn send_ack(&mut self, buf: &mut [u8]) -> Result<(), NetError<D::Error>> {
        ensure_capacity(buf, TCP_FRAME_LEN)?;
        ethernet::swap_mac(buf, &self.config.mac);
        buf[TCP_FLAGS] = flags::ACK;
        let increment = match self.length_info.data_len {
            0 => 1,
            len => len,
        };
        self.write_reply_header(buf, increment, false, true);
        ipv4::set_total_length(buf, (IP_HEADER_LEN + TCP_HEADER_LEN_PLAIN) as u16);
        ipv4::swap_ip(buf, self.config.ip);
        self.finish_tcp(buf, TCP_HEADER_LEN_PLAIN)?;

        #[cfg(feature = "trace-frames")]
        serial_println!("[TCP] ACK to {}:{}", ipv4::destination(buf), tcp::dst_port(buf));

        Ok(())
    }

    /// Send `data_len` payload bytes already in the buffer, closing the exchange.
    ///
    /// Must follow `send_ack` on the same buffer: only the flags, lengths and
    /// checksums change, the addresses and numbers it set are reused. FIN
    /// goes out with the data, so no further segment follows.
    pub fn send_ack_with_data(&mut self, buf: &mut [u8], data_len: u16) -> Result<(), NetError<D::Error>> {
        let data_len = usize::from(data_len);
        ensure_capacity(buf, TCP_FRAME_LEN + data_len)?;
        buf[TCP_FLAGS] = flags::ACK | flags::PSH | flags::FIN;
        ipv4::set_total_length(buf, (IP_HEADER_LEN + TCP_HEADER_LEN_PLAIN + data_len) as u16);
        ipv4::refresh_reply_header(buf);
        write_be16(buf, TCP_CHECKSUM, 0);
        self.finish_tcp(buf, TCP_HEADER_LEN_PLAIN + data_len)?;
        serial_println!("[TCP] Sent {} bytes to {} with FIN", data_len, ipv4::destination(buf));
        Ok(())
    }

    /// Answer the request in `buf` with `data`: acknowledge it, then send the
    /// data with FIN
    pub fn send_response(&mut self, buf: &mut [u8], data: &[u8]) -> Result<(), NetError<D::Error>> {
        let data_len = u16::try_from(data.len()).map_err(|_| NetError::BufferTooSmall {
            needed: TCP_FRAME_LEN + data.len(),
            available: buf.len(),
        })?;
        self.read_length_info(buf);
        let end = Self::fill_tcp_data(buf, 0, data)?;
        self.send_ack(buf)?;
        debug_assert_eq!(end, data.len());
        self.send_ack_with_data(buf, data_len)
    }

    /// Copy `data` into the payload area at `pos`; returns the position after it.
    pub fn fill_tcp_data(buf: &mut [u8], pos: usize, data: &[u8]) -> Result<usize, NetError<D::Error>> {
        tcp::fill_data(buf, pos, data).ok_or(NetError::BufferTooSmall {
            needed: TCP_DATA.saturating_add(pos).saturating_add(data.len()),
            available: buf.len(),
        })
    }

    /// Originate a TCP segment instead of replying to one.
    ///
    /// Payload bytes, if any, must already be in the buffer: at the data
    /// offset (54), or right after the MSS option (58) when
    /// `negotiate_mss` is set, since the option is written at 54.
    pub fn send_package(&mut self, buf: &mut [u8], segment: &OutboundSegment) -> Result<(), NetError<D::Error>> {
        let mut data_len = usize::from(segment.data_len);
        let option_len = if segment.negotiate_mss { MSS_OPTION_LEN } else { 0 };
        ensure_capacity(buf, TCP_FRAME_LEN + option_len + data_len)?;

        ethernet::set_mac(buf, &segment.dest_mac, &self.config.mac);
        write_be16(buf, TCP_DST_PORT, segment.dest_port);
        write_be16(buf, TCP_SRC_PORT, segment.src_port);

        if segment.ack_increment != 0 {
            tcp::advance_ack(buf, segment.ack_increment, true);
        }
        if segment.negotiate_mss {
            tcp::write_initial_sequence(buf, &mut self.seq_seed);
            data_len += MSS_OPTION_LEN;
        }
        tcp::write_header_length(buf, segment.negotiate_mss);

        let identifier = self.next_ip_identifier();
        ipv4::build_header(
            buf,
            (IP_HEADER_LEN + TCP_HEADER_LEN_PLAIN + data_len) as u16,
            identifier,
            protocol::TCP,
            self.config.ip,
            segment.dest_ip,
        );

        if segment.clear_ack {
            buf[TCP_ACK..TCP_ACK + 4].fill(0);
        }
        write_be16(buf, TCP_CHECKSUM, 0);
        buf[TCP_FLAGS] = segment.flags;
        write_be16(buf, TCP_WINDOW, ADVERTISED_WINDOW);
        write_be16(buf, TCP_URGENT, 0);

        self.finish_tcp(buf, TCP_HEADER_LEN_PLAIN + data_len)?;
        serial_println!(
            "[TCP] Sent flags {:#04x} to {}:{} ({} bytes)",
            segment.flags, segment.dest_ip, segment.dest_port, data_len
        );
        Ok(())
    }

    /// Broadcast a request for the hardware address of `target`
    pub fn send_arp_request(&mut self, buf: &mut [u8], target: Ipv4Addr) -> Result<(), NetError<D::Error>> {
        ensure_capacity(buf, ARP_FRAME_LEN)?;
        arp::build_request(buf, &self.config.mac, self.config.ip, target);
        self.transmit(&buf[..ARP_FRAME_LEN])?;
        serial_println!("[ARP] Who has {}? Tell {}", target, self.config.ip);
        Ok(())
    }

    /// Reply TCP header without a capacity check; callers check first
    fn write_reply_header(
        &mut self,
        buf: &mut [u8],
        ack_increment: u16,
        negotiate_mss: bool,
        copy_peer_seq: bool,
    ) {
        tcp::set_reply_header(
            buf,
            ack_increment,
            negotiate_mss,
            copy_peer_seq,
            self.config.port,
            &mut self.seq_seed,
        );
    }

    fn next_ip_identifier(&mut self) -> u16 {
        let id = self.ip_identifier;
        self.ip_identifier = self.ip_identifier.wrapping_add(1);
        id
    }

    /// Checksum `segment_len` bytes of TCP header and payload, then send the frame
    fn finish_tcp(&mut self, buf: &mut [u8], segment_len: usize) -> Result<(), NetError<D::Error>> {
        // both addresses + segment
        let ck = checksum(buf, IP_SRC, 8 + segment_len, ChecksumKind::Tcp);
        write_be16(buf, TCP_CHECKSUM, ck);
        self.transmit(&buf[..HEADER_SIZE + IP_HEADER_LEN + segment_len])
    }

    fn transmit(&mut self, frame: &[u8]) -> Result<(), NetError<D::Error>> {
        self.device.transmit(frame).map_err(|err| {
            serial_println!("[NET] Transmit of {} bytes failed: {:?}", frame.len(), err);
            NetError::Device(err)
        })
    }
}

fn ensure_capacity<E>(buf: &[u8], needed: usize) -> Result<(), NetError<E>> {
    if buf.len() < needed {
        return Err(NetError::BufferTooSmall {
            needed,
            available: buf.len(),
        });
    }
    Ok(())
}
